pub mod kind;
pub mod upload;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use kind::{ACCEPTED_EXTENSIONS, ImageKind};
pub use upload::{IntakeError, UploadedImage};
