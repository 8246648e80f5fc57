//! Error types for projection operations

use thiserror::Error;

/// Result type for projection operations
pub type Result<T> = std::result::Result<T, ProjectionError>;

/// Errors that can occur while building, caching or summarizing projections
///
/// Every variant carries owned strings so the error is `Clone`: concurrent
/// callers collapsed by the single-flight guard all receive the same value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProjectionError {
    /// The requested building does not exist
    #[error("Building not found: {0}")]
    BuildingNotFound(String),

    /// Requested date range is rejected at an input boundary
    #[error("Invalid date range: {0}")]
    InvalidRange(String),

    /// A multi-building summary was requested without any building
    #[error("At least one building identifier is required")]
    EmptyBuildingList,

    /// A multi-building summary exceeded the accepted building count
    #[error("Too many buildings: {count} requested, at most {max} allowed")]
    TooManyBuildings { count: usize, max: usize },

    /// Loading bills, residences or buildings failed
    #[error("Data access error: {0}")]
    DataAccess(String),

    /// The cache backend failed
    #[error("Cache error: {0}")]
    Cache(String),

    /// A payload could not be serialized or deserialized
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ProjectionError {
    /// Whether the error was caused by caller input rather than infrastructure
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ProjectionError::InvalidRange(_)
                | ProjectionError::EmptyBuildingList
                | ProjectionError::TooManyBuildings { .. }
        )
    }

    /// Whether the error reports a missing building
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProjectionError::BuildingNotFound(_))
    }
}

impl From<serde_json::Error> for ProjectionError {
    fn from(err: serde_json::Error) -> Self {
        ProjectionError::Serialization(err.to_string())
    }
}
