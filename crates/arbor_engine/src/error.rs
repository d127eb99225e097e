//! Engine error types

use thiserror::Error;

/// Errors raised by scene graph and camera operations
///
/// Only invalid arguments surface here. Degenerate numeric input falls back
/// to a defined value and structural misses report through `bool`/`Option`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// An id did not resolve to a live node
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// A node was attached to itself
    #[error("Node {0} cannot be its own child")]
    SelfParenting(String),

    /// Attaching the node would make it its own ancestor
    #[error("Attaching {child} under {parent} would create a cycle")]
    CycleDetected {
        /// Would-be parent
        parent: String,
        /// Would-be child
        child: String,
    },

    /// A parameter was outside its valid domain
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Convenience result alias for scene operations
pub type SceneResult<T> = Result<T, SceneError>;
