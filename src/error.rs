//! Error types for vertex group operations.
//!
//! Multi-group operations never abort on a single failure: each leaf error below is recorded
//! against the group it concerns and collected into a batch report.

use thiserror::Error;

/// Result type for vertex group operations.
pub type Result<T> = std::result::Result<T, Error>;

/// A filter or rename was requested with a blank query.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("filter query is empty")]
pub struct EmptyQueryError;

/// A rename would give a group the name of another group on the same mesh.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("cannot rename '{from}' to '{to}': a group with that name already exists")]
pub struct NameCollisionError {
    /// Current group name.
    pub from: String,
    /// Requested group name.
    pub to: String,
}

/// A group selected for separation has no member vertices.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("vertex group '{group}' has no assigned vertices")]
pub struct EmptyGroupError {
    /// Name of the empty group.
    pub group: String,
}

/// The host rejected a mesh write. The message is reported verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HostWriteError {
    pub message: String,
}

impl HostWriteError {
    pub fn new(message: impl Into<String>) -> Self {
        HostWriteError {
            message: message.into(),
        }
    }
}

/// Any error produced by this crate.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    EmptyQuery(#[from] EmptyQueryError),
    #[error(transparent)]
    NameCollision(#[from] NameCollisionError),
    #[error(transparent)]
    EmptyGroup(#[from] EmptyGroupError),
    #[error(transparent)]
    HostWrite(#[from] HostWriteError),
    /// A group handle no longer refers to a group on the mesh.
    #[error("vertex group {0} does not exist")]
    MissingGroup(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_errors_convert_and_display_verbatim() {
        let err: Error = HostWriteError::new("mesh is locked").into();
        assert_eq!(err.to_string(), "mesh is locked");

        let err: Error = NameCollisionError {
            from: "Head".into(),
            to: "Torso".into(),
        }
        .into();
        assert!(matches!(err, Error::NameCollision(_)));
        assert_eq!(
            err.to_string(),
            "cannot rename 'Head' to 'Torso': a group with that name already exists"
        );
    }
}
