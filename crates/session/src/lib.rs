pub mod session;
pub mod state;
pub mod store;

pub use session::{Notice, Session};
pub use state::SessionState;
pub use store::{SessionHandle, SessionId, SessionStore};
