//! Error types for `DirSift`

use arrayvec::ArrayString;
use thiserror::Error;

/// Maximum length of error messages
pub const MAX_ERROR_LENGTH: usize = 256;

/// Custom result type for `DirSift` operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for `DirSift`
///
/// # Design
/// - Message buffers are stack-allocated with a fixed `MAX_ERROR_LENGTH`
/// - Configuration errors are distinct variants so callers can tell them apart
#[derive(Debug, Error)]
pub enum Error {
    /// IO operation failed
    #[error("Error: {0}")]
    Io(#[from] std::io::Error),

    /// Two flags asked for contradictory file attributes
    #[error("Error: mutually exclusive file attributes")]
    TypeConflict,

    /// Owner constraint names a user unknown to the system
    #[error("Error: user '{0}' does not exist")]
    UnknownUser(Box<ArrayString<MAX_ERROR_LENGTH>>),

    /// Group constraint names a group unknown to the system
    #[error("Error: group '{0}' does not exist")]
    UnknownGroup(Box<ArrayString<MAX_ERROR_LENGTH>>),

    /// Name pattern failed to compile
    #[error("Error: {0}")]
    Pattern(#[from] regex::Error),

    /// Accumulated path exceeded the fixed buffer capacity
    #[error("Error: path length exceeded 4096 bytes")]
    PathTooLong,

    /// Start directory is missing or not a directory
    #[error("Error: {0}")]
    StartDir(Box<ArrayString<MAX_ERROR_LENGTH>>),
}

impl Error {
    /// Create an unknown-user error carrying the offending name
    #[must_use]
    pub fn unknown_user(name: &str) -> Self {
        Self::UnknownUser(Box::new(Self::clipped(name)))
    }

    /// Create an unknown-group error carrying the offending name
    #[must_use]
    pub fn unknown_group(name: &str) -> Self {
        Self::UnknownGroup(Box::new(Self::clipped(name)))
    }

    /// Create a start-directory error with a prebuilt message
    #[must_use]
    pub fn start_dir(msg: &str) -> Self {
        Self::StartDir(Box::new(Self::clipped(msg)))
    }

    /// Get a user-friendly error message with action items
    #[must_use]
    pub fn user_message(&self) -> ArrayString<MAX_ERROR_LENGTH> {
        let tip = match self {
            Self::Io(_) => "Check the file path and permissions",
            Self::TypeConflict => "Pick at most one file type flag",
            Self::UnknownUser(_) => "Check the user name spelling",
            Self::UnknownGroup(_) => "Check the group name spelling",
            Self::Pattern(_) => "Patterns use extended regular expression syntax",
            Self::PathTooLong => "Search from a directory closer to the files",
            Self::StartDir(_) => "Check that the start directory exists and is readable",
        };
        Self::clipped(&format!("{self}\nTip: {tip}"))
    }

    /// Copy `msg` into a fixed-size buffer, truncating at a char boundary
    fn clipped(msg: &str) -> ArrayString<MAX_ERROR_LENGTH> {
        let mut buf = ArrayString::new();
        let mut end = msg.len().min(MAX_ERROR_LENGTH);
        while !msg.is_char_boundary(end) {
            end -= 1;
        }
        let _ = buf.try_push_str(&msg[..end]);
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_user_keeps_name() {
        let err = Error::unknown_user("nosuch");
        assert_eq!(err.to_string(), "Error: user 'nosuch' does not exist");
    }

    #[test]
    fn test_type_conflict_message() {
        assert_eq!(Error::TypeConflict.to_string(), "Error: mutually exclusive file attributes");
    }

    #[test]
    fn test_user_message_has_tip() {
        let msg = Error::PathTooLong.user_message();
        assert!(msg.starts_with("Error: path length exceeded"));
        assert!(msg.contains("\nTip: "));
    }

    #[test]
    fn test_clipped_truncates_long_input() {
        let long = "x".repeat(MAX_ERROR_LENGTH * 2);
        let err = Error::start_dir(&long);
        assert_eq!(err.to_string().len(), "Error: ".len() + MAX_ERROR_LENGTH);
    }

    #[test]
    fn test_clipped_respects_char_boundaries() {
        let long = "é".repeat(MAX_ERROR_LENGTH);
        let err = Error::unknown_group(&long);
        assert!(err.to_string().contains('é'));
    }
}
