pub mod config;
pub mod models;
pub mod ops;
pub mod snapshot;

pub use config::ApiConfig;
pub use models::{ActionType, Card, EventContext, FieldSchema, FieldValue};
pub use ops::{
    ActionContext, ActionOutcome, CardsApi, ConsoleNotifier, DirectoryEmitter, FileEmitter,
    HttpCardsApi, Notification, Notifier, OpsError, OpsResult, Refresher, ReviewActions,
};
