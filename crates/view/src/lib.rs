pub mod markup;
pub mod page;

pub use markup::to_html;
pub use page::{PLACEHOLDER, ViewInputs, render_page};
