/// Inline message shown by a view after its last action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    None,
    Error(String),
    Success(String),
}

impl Status {
    pub fn message(&self) -> Option<&str> {
        match self {
            Status::None => None,
            Status::Error(message) | Status::Success(message) => Some(message),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Status::Error(_))
    }
}
