//! # File Backends
//!
//! Local stand-ins for the hosted menu collection and orders collection.
//!
//! - [`FileMenuSource`] reads a JSON array of menu documents.
//! - [`JsonlOrderSink`] appends one order document per line.

use std::path::PathBuf;

use async_trait::async_trait;
use morsel_core::OrderSnapshot;
use morsel_order::error::MenuResult;
use morsel_order::{MenuDocument, MenuSource, OrderDocument, OrderSink, SinkError};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

// =============================================================================
// Menu Source
// =============================================================================

/// Menu collection backed by a JSON file.
///
/// ```json
/// [
///   { "id": "ramen", "name": "Ramen", "price": 12.0, "isAvailable": true },
///   { "id": "gyoza", "name": "Gyoza", "price": 6.5 }
/// ]
/// ```
#[derive(Debug, Clone)]
pub struct FileMenuSource {
    path: PathBuf,
}

impl FileMenuSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileMenuSource { path: path.into() }
    }
}

#[async_trait]
impl MenuSource for FileMenuSource {
    async fn fetch(&self) -> MenuResult<Vec<MenuDocument>> {
        let raw = tokio::fs::read_to_string(&self.path).await?;
        let documents: Vec<MenuDocument> = serde_json::from_str(&raw)?;
        debug!(path = %self.path.display(), count = documents.len(), "Menu file read");
        Ok(documents)
    }
}

// =============================================================================
// Order Sink
// =============================================================================

/// Orders collection backed by an append-only JSON-lines file.
#[derive(Debug, Clone)]
pub struct JsonlOrderSink {
    path: PathBuf,
}

impl JsonlOrderSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonlOrderSink { path: path.into() }
    }

    async fn append(&self, line: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.write_all(b"\n").await?;
        file.flush().await
    }
}

#[async_trait]
impl OrderSink for JsonlOrderSink {
    async fn submit(&self, order: &OrderSnapshot) -> Result<(), SinkError> {
        let document = OrderDocument::from(order);
        let line = serde_json::to_string(&document)
            .map_err(|e| SinkError::new(format!("Could not encode order: {}", e)))?;

        self.append(&line)
            .await
            .map_err(|e| SinkError::new(format!("Could not write order: {}", e)))?;

        info!(order_id = %document.id, path = %self.path.display(), "Order written");
        Ok(())
    }
}
