/// Single-slot cache of the last successful extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Empty,
    HasResult(String),
}

impl SessionState {
    /// Overwrites any previous result.
    pub fn record_success(&mut self, text: String) {
        *self = SessionState::HasResult(text);
    }

    pub fn clear(&mut self) {
        *self = SessionState::Empty;
    }

    /// Apply a finished extraction. Failures leave the state untouched.
    pub fn apply<E>(&mut self, outcome: Result<String, E>) -> Result<(), E> {
        let text = outcome?;
        self.record_success(text);
        Ok(())
    }

    pub fn result(&self) -> Option<&str> {
        match self {
            SessionState::Empty => None,
            SessionState::HasResult(text) => Some(text),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, SessionState::Empty)
    }
}
