use crate::model::{ICON_ERROR, ResultEntry};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    ListFailed(String),

    #[error("{0}")]
    SearchFailed(String),

    #[error("failed to launch `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid package name '{0}'")]
    InvalidPackageName(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("cannot parse package line '{0}'")]
    Parse(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Renders the error as the single row shown to the user.
    pub fn to_entry(&self) -> ResultEntry {
        match self {
            Error::ListFailed(message) => {
                ResultEntry::new("Error listing packages", message.as_str(), ICON_ERROR)
            }
            Error::SearchFailed(message) => {
                ResultEntry::new("Error searching packages", message.as_str(), ICON_ERROR)
            }
            other => ResultEntry::new("Error", format!("An error occurred: {}", other), ICON_ERROR),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_failures_keep_the_raw_diagnostic() {
        let entry = Error::ListFailed("choco not found".into()).to_entry();
        assert_eq!(entry.title, "Error listing packages");
        assert_eq!(entry.subtitle, "choco not found");

        let entry = Error::SearchFailed("offline".into()).to_entry();
        assert_eq!(entry.title, "Error searching packages");
        assert_eq!(entry.subtitle, "offline");
    }

    #[test]
    fn other_errors_become_generic_entries() {
        let entry = Error::InvalidPackageName("a;b".into()).to_entry();
        assert_eq!(entry.title, "Error");
        assert_eq!(entry.subtitle, "An error occurred: invalid package name 'a;b'");
        assert_eq!(entry.icon_path, ICON_ERROR);
    }
}
