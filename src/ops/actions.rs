use crate::models::ActionType;
use crate::ops::api::CardsApi;
use crate::ops::context::ActionContext;
use crate::ops::csv_export::{self, CSV_MIME_TYPE};
use crate::ops::error::{log_error, validation_error, ErrorContext, OpsResult};
use crate::ops::notify::Notification;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Nothing was selected; no request was made.
    NoSelection,
    Succeeded { affected: usize },
    Failed,
}

impl ActionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ActionOutcome::Succeeded { .. })
    }
}

/// The table's action handlers.
///
/// Holds only the API client; per-call view state arrives in an
/// [`ActionContext`].
pub struct ReviewActions<A: CardsApi> {
    api: A,
}

impl<A: CardsApi> ReviewActions<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub async fn archive_selected(&self, ctx: &ActionContext<'_>, ids: &[String]) -> ActionOutcome {
        if !check_selection(ctx, ActionType::Archive, ids) {
            return ActionOutcome::NoSelection;
        }
        let result = self.api.archive_cards(ids).await;
        self.finish(ctx, ActionType::Archive, ids.len(), result).await
    }

    pub async fn mark_exported_selected(
        &self,
        ctx: &ActionContext<'_>,
        ids: &[String],
    ) -> ActionOutcome {
        if !check_selection(ctx, ActionType::MarkExported, ids) {
            return ActionOutcome::NoSelection;
        }
        let result = self.api.mark_exported(ids).await;
        self.finish(ctx, ActionType::MarkExported, ids.len(), result).await
    }

    pub async fn delete_selected(&self, ctx: &ActionContext<'_>, ids: &[String]) -> ActionOutcome {
        if !check_selection(ctx, ActionType::Delete, ids) {
            return ActionOutcome::NoSelection;
        }
        let result = self.api.delete_cards(ids).await;
        self.finish(ctx, ActionType::Delete, ids.len(), result).await
    }

    /// Saves each card as reviewed, one request at a time. Stops at the first
    /// failure; cards before it stay moved on the server.
    pub async fn move_selected(&self, ctx: &ActionContext<'_>, ids: &[String]) -> ActionOutcome {
        if !check_selection(ctx, ActionType::Move, ids) {
            return ActionOutcome::NoSelection;
        }

        for id in ids {
            if let Err(e) = self.api.save_review(id).await {
                log_error(
                    &e,
                    &ErrorContext::new("move")
                        .with_card_id(id)
                        .with_card_count(ids.len()),
                );
                ctx.notifier.notify(Notification::failure(ActionType::Move));
                return ActionOutcome::Failed;
            }
        }

        self.finish(ctx, ActionType::Move, ids.len(), Ok(())).await
    }

    /// Writes the CSV for the selection, then marks the cards exported.
    pub async fn export_selected(&self, ctx: &ActionContext<'_>, ids: &[String]) -> ActionOutcome {
        if !check_selection(ctx, ActionType::Export, ids) {
            return ActionOutcome::NoSelection;
        }

        if let Err(e) = write_csv(ctx, ids) {
            log_error(&e, &ErrorContext::new("export").with_card_count(ids.len()));
            ctx.notifier.notify(Notification::failure(ActionType::Export));
            return ActionOutcome::Failed;
        }

        match self.api.mark_exported(ids).await {
            Ok(()) => self.finish(ctx, ActionType::Export, ids.len(), Ok(())).await,
            Err(e) => {
                log_error(&e, &ErrorContext::new("export").with_card_count(ids.len()));
                let notification = match e.server_message() {
                    Some(msg) => Notification::failure_with_message(msg),
                    None => Notification::failure(ActionType::Export),
                };
                ctx.notifier.notify(notification);
                ActionOutcome::Failed
            }
        }
    }

    async fn finish(
        &self,
        ctx: &ActionContext<'_>,
        action: ActionType,
        count: usize,
        result: OpsResult<()>,
    ) -> ActionOutcome {
        if let Err(e) = result {
            log_error(
                &e,
                &ErrorContext::new(&action.to_string()).with_card_count(count),
            );
            ctx.notifier.notify(Notification::failure(action));
            return ActionOutcome::Failed;
        }

        tracing::info!(%action, count, "action succeeded");
        if let Err(e) = ctx.refresher.refresh().await {
            tracing::warn!(%action, error = %e, "refresh after action failed");
        }
        ctx.notifier.notify(Notification::success(action, count));
        ActionOutcome::Succeeded { affected: count }
    }
}

fn require_selection(ids: &[String]) -> OpsResult<()> {
    if ids.is_empty() {
        return Err(validation_error("No cards selected"));
    }
    Ok(())
}

fn check_selection(ctx: &ActionContext<'_>, action: ActionType, ids: &[String]) -> bool {
    match require_selection(ids) {
        Ok(()) => true,
        Err(e) => {
            let message = e.to_user_message();
            tracing::info!(%action, title = %message.title, "{}", message.message);
            ctx.notifier.notify(Notification::no_selection(action));
            false
        }
    }
}

fn write_csv(ctx: &ActionContext<'_>, ids: &[String]) -> OpsResult<()> {
    let csv = csv_export::encode(ids, ctx.cards, ctx.schema, ctx.event.label())?;
    let name = csv_export::export_file_name_today();
    ctx.emitter.emit_file(&name, CSV_MIME_TYPE, csv.as_bytes())
}
