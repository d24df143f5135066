use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// Hit testing reached a node that no layout pass has positioned yet.
    NotLaidOut { id: String },
    /// An item has no text to paint.
    InvalidContent { id: String },
    /// A child id is listed that the project does not hold.
    MissingNode { id: String },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::NotLaidOut { id } => write!(f, "node {id} has not been laid out"),
            LayoutError::InvalidContent { id } => write!(f, "item {id} has no text to render"),
            LayoutError::MissingNode { id } => write!(f, "node {id} is not part of the project"),
        }
    }
}

impl std::error::Error for LayoutError {}
