//! JSON files standing in for the table's data source in headless use.

use crate::models::{Card, FieldSchema};
use crate::ops::context::Refresher;
use crate::ops::error::{snapshot_error, OpsResult};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// Reads a JSON array of cards.
pub fn load_cards(path: &Path) -> Result<Vec<Card>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read cards from {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse cards in {}", path.display()))
}

/// Reads a JSON object of field id to label, keeping key order.
pub fn load_schema(path: &Path) -> Result<FieldSchema> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read field schema from {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse field schema in {}", path.display()))
}

/// Card data backed by a snapshot file; a refresh re-reads the file and
/// replaces the held cards.
pub struct SnapshotRefresher {
    path: Option<PathBuf>,
    cards: RwLock<Vec<Card>>,
}

impl SnapshotRefresher {
    /// Loads the snapshot up front. Without a path the card list stays empty.
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let cards = match &path {
            Some(p) => load_cards(p)?,
            None => Vec::new(),
        };
        Ok(Self {
            path,
            cards: RwLock::new(cards),
        })
    }

    pub async fn cards(&self) -> Vec<Card> {
        self.cards.read().await.clone()
    }
}

#[async_trait]
impl Refresher for SnapshotRefresher {
    async fn refresh(&self) -> OpsResult<()> {
        let Some(path) = &self.path else {
            tracing::debug!("no card snapshot configured, skipping refresh");
            return Ok(());
        };

        let path = path.clone();
        let cards = tokio::task::spawn_blocking(move || load_cards(&path))
            .await
            .map_err(|e| snapshot_error(&format!("join error: {e}")))?
            .map_err(|e| snapshot_error(&format!("{:#}", e)))?;

        tracing::info!(cards = cards.len(), "card snapshot reloaded");
        *self.cards.write().await = cards;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::error::OpsError;
    use tempfile::TempDir;

    #[test]
    fn test_load_cards_and_schema() {
        let temp_dir = TempDir::new().unwrap();
        let cards_path = temp_dir.path().join("cards.json");
        let schema_path = temp_dir.path().join("schema.json");
        fs::write(
            &cards_path,
            r#"[{"id": "1", "fields": {"name": {"value": "Ada"}}}, {"id": "2"}]"#,
        )
        .unwrap();
        fs::write(&schema_path, r#"{"school": "School", "name": "Name"}"#).unwrap();

        let cards = load_cards(&cards_path).unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].field("name"), Some("Ada"));

        let schema = load_schema(&schema_path).unwrap();
        assert_eq!(schema.ids().collect::<Vec<_>>(), vec!["school", "name"]);
    }

    #[test]
    fn test_load_cards_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.json");
        fs::write(&path, "{not json").unwrap();

        let err = load_cards(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("broken.json"));
    }

    #[tokio::test]
    async fn test_refresh_without_snapshot_is_noop() {
        let refresher = SnapshotRefresher::load(None).unwrap();
        assert!(refresher.refresh().await.is_ok());
        assert!(refresher.cards().await.is_empty());
    }

    #[tokio::test]
    async fn test_refresh_replaces_held_cards() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cards.json");
        fs::write(&path, r#"[{"id": "1"}, {"id": "2"}]"#).unwrap();

        let refresher = SnapshotRefresher::load(Some(path.clone())).unwrap();
        assert_eq!(refresher.cards().await.len(), 2);

        fs::write(&path, r#"[{"id": "2"}]"#).unwrap();
        refresher.refresh().await.unwrap();

        let cards = refresher.cards().await;
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].id, "2");
    }

    #[tokio::test]
    async fn test_refresh_missing_file_is_snapshot_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cards.json");
        fs::write(&path, "[]").unwrap();
        let refresher = SnapshotRefresher::load(Some(path.clone())).unwrap();

        fs::remove_file(&path).unwrap();
        let err = refresher.refresh().await.unwrap_err();

        assert!(matches!(err, OpsError::Snapshot(_)));
        assert_eq!(err.to_user_message().title, "Card Data Unavailable");
    }
}
