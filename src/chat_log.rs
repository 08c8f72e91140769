//! Conversation log sinks.
//!
//! The engine itself never persists anything; `Engine::process_logged` hands
//! each exchange to a [`ChatLog`] and carries on if the sink fails.

use crate::api::EngineResponse;
use crate::error::{Error, Result};
use crate::Intent;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// One `(user message, bot response, intent)` exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatLogEntry {
    pub user_message: String,
    pub bot_response: String,
    pub intent: Intent,
    pub created_at: DateTime<Utc>,
}

impl ChatLogEntry {
    pub fn new(user_message: &str, response: &EngineResponse) -> Self {
        ChatLogEntry {
            user_message: user_message.to_string(),
            bot_response: response.message.clone(),
            intent: response.intent,
            created_at: Utc::now(),
        }
    }
}

/// A destination for conversation log entries.
pub trait ChatLog: Send + Sync {
    fn record(&self, entry: &ChatLogEntry) -> Result<()>;
}

/// Emits every entry as an `info` event on the `orderbot::chat` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingChatLog;

impl ChatLog for TracingChatLog {
    fn record(&self, entry: &ChatLogEntry) -> Result<()> {
        tracing::info!(
            target: "orderbot::chat",
            intent = %entry.intent,
            user_message = %entry.user_message,
            created_at = %entry.created_at,
            "chat message"
        );
        Ok(())
    }
}

/// Appends entries as JSON lines to a file.
#[derive(Debug)]
pub struct JsonLinesChatLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl JsonLinesChatLog {
    /// Open `path` for appending, creating it if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| Error::Io { path: path.clone(), source })?;
        Ok(JsonLinesChatLog { path, file: Mutex::new(file) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ChatLog for JsonLinesChatLog {
    fn record(&self, entry: &ChatLogEntry) -> Result<()> {
        let mut line = serde_json::to_string(entry).map_err(|e| Error::ChatLog(e.to_string()))?;
        line.push('\n');
        self.file
            .lock()
            .write_all(line.as_bytes())
            .map_err(|source| Error::Io { path: self.path.clone(), source })
    }
}

/// Keeps entries in memory; handy for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryChatLog {
    entries: Mutex<Vec<ChatLogEntry>>,
}

impl MemoryChatLog {
    /// Snapshot of everything recorded so far, oldest first.
    pub fn entries(&self) -> Vec<ChatLogEntry> {
        self.entries.lock().clone()
    }
}

impl ChatLog for MemoryChatLog {
    fn record(&self, entry: &ChatLogEntry) -> Result<()> {
        self.entries.lock().push(entry.clone());
        Ok(())
    }
}
