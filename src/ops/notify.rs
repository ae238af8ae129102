use crate::models::ActionType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    #[default]
    Default,
    Destructive,
}

/// A toast-style message for the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<Variant>,
}

impl Notification {
    pub fn no_selection(action: ActionType) -> Self {
        Self {
            title: "No cards selected".to_string(),
            description: format!("Please select at least one card to {}.", action.verb()),
            variant: Some(Variant::Destructive),
        }
    }

    pub fn success(action: ActionType, count: usize) -> Self {
        Self {
            title: "Success".to_string(),
            description: action.success_description(count),
            variant: None,
        }
    }

    pub fn failure(action: ActionType) -> Self {
        Self {
            title: "Error".to_string(),
            description: format!("Failed to {} cards. Please try again.", action.verb()),
            variant: Some(Variant::Destructive),
        }
    }

    /// Failure carrying the backend's own wording.
    pub fn failure_with_message(message: &str) -> Self {
        Self {
            title: "Error".to_string(),
            description: message.to_string(),
            variant: Some(Variant::Destructive),
        }
    }

    pub fn is_destructive(&self) -> bool {
        self.variant == Some(Variant::Destructive)
    }
}

/// Sink for user-facing notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Prints notifications for a terminal user; destructive ones go to stderr.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        tracing::debug!(title = %notification.title, "notify");
        if notification.is_destructive() {
            eprintln!("{}: {}", notification.title, notification.description);
        } else {
            println!("{}: {}", notification.title, notification.description);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_and_failure_are_distinct() {
        let ok = Notification::success(ActionType::Delete, 2);
        let err = Notification::failure(ActionType::Delete);
        assert_eq!(ok.description, "Deleted 2 cards");
        assert!(!ok.is_destructive());
        assert!(err.is_destructive());
        assert_ne!(ok.title, err.title);
    }

    #[test]
    fn test_notification_json_shape() {
        let json = serde_json::to_value(Notification::no_selection(ActionType::Archive)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "title": "No cards selected",
                "description": "Please select at least one card to archive.",
                "variant": "destructive"
            })
        );

        let json = serde_json::to_value(Notification::success(ActionType::Archive, 1)).unwrap();
        assert!(json.get("variant").is_none());
    }
}
