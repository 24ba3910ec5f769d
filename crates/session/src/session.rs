use intake::UploadedImage;
use std::fmt;

use crate::state::SessionState;

/// One-shot banner for the next render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Error(String),
    Warning(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Notice::Error(msg) | Notice::Warning(msg) => msg,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Everything one user's page holds between requests.
#[derive(Debug, Default)]
pub struct Session {
    image: Option<UploadedImage>,
    state: SessionState,
    notice: Option<Notice>,
    extracting: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn image(&self) -> Option<&UploadedImage> {
        self.image.as_ref()
    }

    pub fn select_image(&mut self, image: UploadedImage) {
        self.image = Some(image);
    }

    pub fn deselect_image(&mut self) {
        self.image = None;
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    /// Claim the session's single extraction slot. False while another
    /// extraction for this session is still running.
    pub fn begin_extraction(&mut self) -> bool {
        if self.extracting {
            return false;
        }
        self.extracting = true;
        true
    }

    pub fn finish_extraction(&mut self) {
        self.extracting = false;
    }

    pub fn is_extracting(&self) -> bool {
        self.extracting
    }

    pub fn notify(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    /// Notices are shown exactly once.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake::testing::sample_png;

    #[test]
    fn test_notice_is_consumed() {
        let mut session = Session::new();
        session.notify(Notice::Error("Error processing image: boom".to_string()));

        assert_eq!(
            session.take_notice().map(|n| n.to_string()),
            Some("Error processing image: boom".to_string())
        );
        assert_eq!(session.take_notice(), None);
    }

    #[test]
    fn test_one_extraction_at_a_time() {
        let mut session = Session::new();

        assert!(session.begin_extraction());
        assert!(session.is_extracting());
        assert!(!session.begin_extraction());

        session.finish_extraction();
        assert!(!session.is_extracting());
        assert!(session.begin_extraction());
    }

    #[test]
    fn test_image_selection_does_not_touch_result() {
        let mut session = Session::new();
        session.state_mut().record_success("kept".to_string());

        let image = UploadedImage::accept("photo.png", sample_png(2, 2)).unwrap();
        session.select_image(image);
        assert!(session.image().is_some());
        assert_eq!(session.state().result(), Some("kept"));

        session.deselect_image();
        assert!(session.image().is_none());
        assert_eq!(session.state().result(), Some("kept"));
    }
}
