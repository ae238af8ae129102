use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum OpsError {
    #[error("Validation Error: {0}")]
    Validation(String),
    #[error("HTTP Error: status {status}")]
    Http { status: u16, message: Option<String> },
    #[error("Transport Error: {0}")]
    Transport(String),
    #[error("Decode Error: {0}")]
    Decode(String),
    #[error("Export Error: {0}")]
    Export(String),
    #[error("Config Error: {0}")]
    Config(String),
    #[error("Snapshot Error: {0}")]
    Snapshot(String),
}

pub type OpsResult<T> = Result<T, OpsError>;

impl From<std::io::Error> for OpsError {
    fn from(err: std::io::Error) -> Self {
        OpsError::Export(format!("IO error: {}", err))
    }
}

impl From<csv::Error> for OpsError {
    fn from(err: csv::Error) -> Self {
        OpsError::Export(format!("CSV error: {}", err))
    }
}

pub struct ErrorMessage {
    pub title: String,
    pub message: String,
    pub suggestion: Option<String>,
    pub recoverable: bool,
}

impl OpsError {
    pub fn to_user_message(&self) -> ErrorMessage {
        match self {
            OpsError::Validation(msg) => ErrorMessage {
                title: "Nothing Selected".to_string(),
                message: msg.clone(),
                suggestion: Some("Select at least one card and try again.".to_string()),
                recoverable: true,
            },
            OpsError::Http { status, message } => ErrorMessage {
                title: "Request Failed".to_string(),
                message: match message {
                    Some(msg) => format!("Server responded with {}: {}", status, msg),
                    None => format!("Server responded with {}", status),
                },
                suggestion: Some("Refresh the table and try again.".to_string()),
                recoverable: *status >= 500,
            },
            OpsError::Transport(msg) => ErrorMessage {
                title: "Connection Failed".to_string(),
                message: format!("Unable to reach the review API: {}", msg),
                suggestion: Some("Check that the backend is running.".to_string()),
                recoverable: true,
            },
            OpsError::Decode(msg) => ErrorMessage {
                title: "Unexpected Response".to_string(),
                message: format!("The review API sent a malformed response: {}", msg),
                suggestion: None,
                recoverable: false,
            },
            OpsError::Export(msg) => ErrorMessage {
                title: "Export Failed".to_string(),
                message: format!("Unable to write the export file: {}", msg),
                suggestion: Some("Check the export directory and permissions.".to_string()),
                recoverable: true,
            },
            OpsError::Config(msg) => ErrorMessage {
                title: "Invalid Configuration".to_string(),
                message: msg.clone(),
                suggestion: Some("Check REVIEW_API_URL or --api-url.".to_string()),
                recoverable: false,
            },
            OpsError::Snapshot(msg) => ErrorMessage {
                title: "Card Data Unavailable".to_string(),
                message: format!("Unable to reload the card snapshot: {}", msg),
                suggestion: Some("Check the --cards file.".to_string()),
                recoverable: true,
            },
        }
    }

    pub fn is_recoverable(&self) -> bool {
        self.to_user_message().recoverable
    }

    /// Error text supplied by the backend, if the response carried one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            OpsError::Http {
                message: Some(msg), ..
            } => Some(msg.as_str()),
            _ => None,
        }
    }
}

pub fn validation_error(msg: &str) -> OpsError {
    OpsError::Validation(msg.to_string())
}

pub fn export_error(msg: &str) -> OpsError {
    OpsError::Export(msg.to_string())
}

pub fn config_error(msg: &str) -> OpsError {
    OpsError::Config(msg.to_string())
}

pub fn snapshot_error(msg: &str) -> OpsError {
    OpsError::Snapshot(msg.to_string())
}

pub struct ErrorContext {
    pub operation: String,
    pub card_id: Option<String>,
    pub card_count: Option<usize>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl ErrorContext {
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            card_id: None,
            card_count: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn with_card_id(mut self, card_id: &str) -> Self {
        self.card_id = Some(card_id.to_string());
        self
    }

    pub fn with_card_count(mut self, count: usize) -> Self {
        self.card_count = Some(count);
        self
    }

    pub fn describe(&self) -> String {
        let mut context = format!("Operation: {}", self.operation);

        if let Some(card_id) = &self.card_id {
            context.push_str(&format!(", Card: {}", card_id));
        }

        if let Some(count) = self.card_count {
            context.push_str(&format!(", Cards: {}", count));
        }

        context.push_str(&format!(
            ", Time: {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S")
        ));

        context
    }
}

pub fn log_error(error: &OpsError, context: &ErrorContext) {
    let user_message = error.to_user_message();

    tracing::error!(
        context = %context.describe(),
        recoverable = user_message.recoverable,
        suggestion = user_message.suggestion.as_deref().unwrap_or(""),
        "{} - {}",
        user_message.title,
        user_message.message
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_only_from_http() {
        let err = OpsError::Http {
            status: 422,
            message: Some("Card 9 is locked".to_string()),
        };
        assert_eq!(err.server_message(), Some("Card 9 is locked"));
        assert!(err.to_user_message().message.contains("422"));
        assert!(!err.is_recoverable());

        let err = OpsError::Transport("connection refused".to_string());
        assert_eq!(err.server_message(), None);
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_validation_maps_to_nothing_selected() {
        let message = validation_error("No cards selected").to_user_message();
        assert_eq!(message.title, "Nothing Selected");
        assert_eq!(message.message, "No cards selected");
        assert!(message.recoverable);
    }

    #[test]
    fn test_error_context_describe() {
        let context = ErrorContext::new("move")
            .with_card_id("abc")
            .with_card_count(3);
        let text = context.describe();
        assert!(text.starts_with("Operation: move, Card: abc, Cards: 3, Time: "));
    }
}
