use crate::models::{Card, EventContext, FieldSchema};
use crate::ops::emit::FileEmitter;
use crate::ops::error::OpsResult;
use crate::ops::notify::Notifier;
use async_trait::async_trait;

/// Re-fetches the table data after a successful mutation.
#[async_trait]
pub trait Refresher: Send + Sync {
    async fn refresh(&self) -> OpsResult<()>;
}

/// Everything a handler needs from the surrounding view, passed explicitly
/// on each call.
pub struct ActionContext<'a> {
    pub notifier: &'a dyn Notifier,
    pub refresher: &'a dyn Refresher,
    pub emitter: &'a dyn FileEmitter,
    pub event: &'a EventContext,
    pub schema: &'a FieldSchema,
    pub cards: &'a [Card],
}
