extern crate self as orderbot;

use serde::{Deserialize, Serialize};

#[macro_use]
mod macros;
mod api;
mod chat_log;
mod engine;
mod error;
mod rules;
pub mod source;

pub use api::{
    Action, Engine, EngineResponse, ExtractionStrategy, IntentSource, ItemView, MatchTrace, Options, ProcessDetails,
    ProcessVerbose, SharedEngine, SuggestionView,
};
pub use chat_log::{ChatLog, ChatLogEntry, JsonLinesChatLog, MemoryChatLog, TracingChatLog};
pub use engine::{CatalogIndex, MatchKind, MatchStrategies, RunMetrics};
pub use error::{Error, Result};

// --- Data model -------------------------------------------------------------

/// A single orderable entry of the menu snapshot.
///
/// Extra columns a storefront may carry (description, image, rating) are
/// ignored on deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub category: String,
    #[serde(default = "default_true")]
    pub is_veg: bool,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

fn default_true() -> bool {
    true
}

impl MenuItem {
    /// Convenience constructor for an available item.
    pub fn new(id: i64, name: impl Into<String>, price: f64, category: impl Into<String>, is_veg: bool) -> Self {
        MenuItem { id, name: name.into(), price, category: category.into(), is_veg, is_available: true }
    }
}

/// A resolved catalog item paired with a requested quantity (always >= 1).
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub item: MenuItem,
    pub quantity: u32,
}

/// The classified purpose of an utterance. Exactly one per processed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    PlaceOrder,
    ViewCart,
    ClearCart,
    ShowMenu,
    Greeting,
    Help,
    Remove,
    Add,
    Unknown,
}

impl Intent {
    /// Wire name of the intent, e.g. `"place_order"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Intent::PlaceOrder => "place_order",
            Intent::ViewCart => "view_cart",
            Intent::ClearCart => "clear_cart",
            Intent::ShowMenu => "show_menu",
            Intent::Greeting => "greeting",
            Intent::Help => "help",
            Intent::Remove => "remove",
            Intent::Add => "add",
            Intent::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lowercase and trim: the normal form every textual comparison runs on.
pub(crate) fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}
