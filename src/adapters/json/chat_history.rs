//! JSON-file chat history.

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::sync::Mutex;

use super::file_io::{read_json_or_default, write_json_atomic};
use crate::domain::errors::DomainResult;
use crate::domain::models::ChatEntry;
use crate::domain::ports::ChatHistoryRepository;

/// Chat log kept as a single JSON array
pub struct JsonChatHistory {
    path: PathBuf,
    pretty: bool,
    write_lock: Mutex<()>,
}

impl JsonChatHistory {
    pub fn new(path: impl Into<PathBuf>, pretty: bool) -> Self {
        Self {
            path: path.into(),
            pretty,
            write_lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> DomainResult<Vec<ChatEntry>> {
        read_json_or_default(&self.path).await
    }
}

#[async_trait]
impl ChatHistoryRepository for JsonChatHistory {
    async fn append(&self, entry: &ChatEntry) -> DomainResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;
        entries.push(entry.clone());
        write_json_atomic(&self.path, &entries, self.pretty).await
    }

    async fn list(&self, course: Option<&str>, limit: Option<usize>) -> DomainResult<Vec<ChatEntry>> {
        let mut entries: Vec<ChatEntry> = self
            .load()
            .await?
            .into_iter()
            .filter(|e| course.is_none_or(|c| e.course == c))
            .collect();

        if let Some(limit) = limit {
            let skip = entries.len().saturating_sub(limit);
            entries.drain(..skip);
        }
        Ok(entries)
    }

    async fn clear(&self, course: Option<&str>) -> DomainResult<usize> {
        let _guard = self.write_lock.lock().await;
        let entries = self.load().await?;
        let before = entries.len();
        let kept: Vec<ChatEntry> = match course {
            Some(c) => entries.into_iter().filter(|e| e.course != c).collect(),
            None => Vec::new(),
        };
        let removed = before - kept.len();
        if removed > 0 {
            write_json_atomic(&self.path, &kept, self.pretty).await?;
        }
        Ok(removed)
    }
}
