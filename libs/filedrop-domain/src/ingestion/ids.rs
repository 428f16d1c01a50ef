use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::ingestion::error::IngestionError;

/// Caller-supplied file identifier
///
/// The identifier is the uploaded filename. It is used verbatim as the storage
/// key (one path segment under the uploads and processed roots) and as the
/// status registry key, so it is validated to be a single, plain path segment.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(String);

impl FileId {
    /// Validate and wrap a filename
    ///
    /// # Errors
    ///
    /// Returns `IngestionError::InvalidIdentifier` if the name is empty, is `.`
    /// or `..`, or contains a path separator or NUL byte.
    pub fn new(name: impl Into<String>) -> Result<Self, IngestionError> {
        let name = name.into();

        if name.is_empty() {
            return Err(IngestionError::invalid_identifier(name, "name is empty"));
        }
        if name == "." || name == ".." {
            return Err(IngestionError::invalid_identifier(
                name,
                "name refers to a directory",
            ));
        }
        if name.contains(['/', '\\', '\0']) {
            return Err(IngestionError::invalid_identifier(
                name,
                "name must not contain path separators",
            ));
        }

        Ok(Self(name))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for FileId {
    type Error = IngestionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for FileId {
    type Error = IngestionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Identifier of a single pipeline run
///
/// RunId wraps a UUID v7 so runs sort by acceptance time. A new one is
/// generated for every accepted upload, including re-uploads of the same file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(Uuid);

impl RunId {
    /// Generate a new time-ordered RunId
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RunId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_filename_is_accepted() {
        let id = FileId::new("report.txt").unwrap();
        assert_eq!(id.as_str(), "report.txt");
        assert_eq!(id.to_string(), "report.txt");
    }

    #[test]
    fn test_filename_with_spaces_and_dots_is_accepted() {
        assert!(FileId::new("my report..v2.tar.gz").is_ok());
        assert!(FileId::new(".hidden").is_ok());
    }

    #[test]
    fn test_traversal_names_are_rejected() {
        for name in ["", ".", "..", "../etc/passwd", "a/b", "/abs", "dir\\file", "nul\0byte"] {
            let err = FileId::new(name).unwrap_err();
            assert!(
                matches!(err, IngestionError::InvalidIdentifier { .. }),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_run_ids_are_unique() {
        assert_ne!(RunId::new(), RunId::new());
    }

    #[test]
    fn test_run_id_display() {
        assert_eq!(RunId::new().to_string().len(), 36);
    }
}
