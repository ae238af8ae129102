pub mod actions;
pub mod api;
pub mod context;
pub mod csv_export;
pub mod emit;
pub mod error;
pub mod notify;


pub use actions::{ActionOutcome, ReviewActions};
pub use api::{CardsApi, HttpCardsApi};
pub use context::{ActionContext, Refresher};
pub use csv_export::{encode, export_file_name, CSV_MIME_TYPE};
pub use emit::{DirectoryEmitter, FileEmitter};
pub use error::{ErrorContext, ErrorMessage, OpsError, OpsResult};
pub use notify::{ConsoleNotifier, Notification, Notifier, Variant};

// Re-export commonly used types
pub use crate::models::{ActionType, Card, EventContext, FieldSchema};
