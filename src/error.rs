//! Typed failures for playback navigation, metadata providers and persistence

use thiserror::Error;

/// Failures raised by navigation over the playlist.
///
/// All of these are user-correctable (or a normal empty state) and are turned
/// into a short inline reply at the command boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    #[error("the playlist is empty")]
    Empty,

    #[error("no playlist entry matches '{0}'")]
    NotFound(String),

    #[error("position {position} is outside 1..={len}")]
    OutOfRange { position: i64, len: usize },
}

impl PlaybackError {
    pub fn user_message(&self) -> String {
        match self {
            Self::Empty => {
                "❌ The playlist is empty. Add Spotify links to the playlist file and use `!refresh`."
                    .to_string()
            }
            Self::NotFound(query) => format!("❌ No track in the playlist matches '{}'.", query),
            Self::OutOfRange { len, .. } => {
                format!("❌ Invalid position. Use a number between 1 and {}.", len)
            }
        }
    }
}

/// Failures from the metadata providers.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider returned status {0}")]
    Status(u16),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider call timed out")]
    Timeout,

    #[error("invalid content identifier: {0}")]
    InvalidId(String),

    #[error("catalog request failed: {0}")]
    Catalog(String),
}

/// Failures writing cursor or favorites state to disk.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Text that could not be turned into a command
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandParseError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}'")]
    Unknown(String),

    #[error("'{command}' needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("'{0}' is not a number")]
    InvalidNumber(String),
}

impl CommandParseError {
    pub fn user_message(&self) -> String {
        match self {
            Self::Empty | Self::Unknown(_) => {
                format!("❌ {}. Use `!help` to list commands.", capitalize(&self.to_string()))
            }
            _ => format!("❌ {}.", capitalize(&self.to_string())),
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_message_names_valid_bounds() {
        let err = PlaybackError::OutOfRange { position: 9, len: 3 };
        assert_eq!(err.to_string(), "position 9 is outside 1..=3");
        assert!(err.user_message().contains("between 1 and 3"));
    }

    #[test]
    fn not_found_message_echoes_query() {
        let err = PlaybackError::NotFound("zzz".to_string());
        assert!(err.user_message().contains("'zzz'"));
    }

    #[test]
    fn parse_errors_read_as_sentences() {
        assert_eq!(
            CommandParseError::Unknown("dance".to_string()).user_message(),
            "❌ Unknown command 'dance'. Use `!help` to list commands."
        );
        assert_eq!(
            CommandParseError::MissingArgument { command: "goto", argument: "a position" }.user_message(),
            "❌ 'goto' needs a position."
        );
    }

    #[test]
    fn io_error_converts_into_persistence_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: PersistenceError = io_err.into();
        assert!(matches!(err, PersistenceError::Io(_)));
    }
}
