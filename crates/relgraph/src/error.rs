#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    #[error("circular dependency detected ({remaining_edges} edge(s) could not be ordered)")]
    CircularDependency { remaining_edges: usize },

    #[error("graph was modified; enumeration operation may not execute")]
    InvalidatedEnumeration,

    #[error("operation is not supported: {operation}")]
    Unsupported { operation: &'static str },
}

impl GraphError {
    pub(crate) fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    pub fn is_circular_dependency(&self) -> bool {
        matches!(self, Self::CircularDependency { .. })
    }
}

pub type Result<T> = std::result::Result<T, GraphError>;
