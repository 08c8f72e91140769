use crate::chat_log::{ChatLog, ChatLogEntry};
use crate::engine::{self, CatalogIndex, ItemExtractor, ItemMatcher, MatchStrategies, RunMetrics};
use crate::error::{Error, Result};
use crate::{Intent, MenuItem, normalize};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

pub use crate::engine::{ExtractionStrategy, IntentSource, MatchTrace};

/// Options that affect matching and suggestions.
///
/// Every field has a default, so a partial JSON object is a valid
/// configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Minimum similarity ratio (`0.0..=1.0`) for an approximate name match.
    pub similarity_cutoff: f64,
    /// Minimum character length of a keyword-index word and of a suggestion
    /// query word.
    pub min_keyword_len: usize,
    /// Maximum number of suggestions in a response.
    pub max_suggestions: usize,
    /// Enabled steps of the item match cascade.
    pub strategies: MatchStrategies,
}

impl Default for Options {
    fn default() -> Self {
        Options { similarity_cutoff: 0.5, min_keyword_len: 3, max_suggestions: 5, strategies: MatchStrategies::all() }
    }
}

impl Options {
    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.similarity_cutoff) {
            return Err(Error::InvalidOption {
                name: "similarity_cutoff",
                value: self.similarity_cutoff.to_string(),
            });
        }
        if self.min_keyword_len == 0 {
            return Err(Error::InvalidOption { name: "min_keyword_len", value: "0".to_string() });
        }
        if self.max_suggestions == 0 {
            return Err(Error::InvalidOption { name: "max_suggestions", value: "0".to_string() });
        }
        Ok(())
    }
}

/// What the caller should do with a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Greeting,
    Help,
    ShowMenu,
    AddToCart,
    NotFound,
    RemoveFromCart,
    Clarify,
    ViewCart,
    ClearCart,
    PlaceOrder,
    Unknown,
}

impl Action {
    /// Wire name of the action, e.g. `"add_to_cart"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Greeting => "greeting",
            Action::Help => "help",
            Action::ShowMenu => "show_menu",
            Action::AddToCart => "add_to_cart",
            Action::NotFound => "not_found",
            Action::RemoveFromCart => "remove_from_cart",
            Action::Clarify => "clarify",
            Action::ViewCart => "view_cart",
            Action::ClearCart => "clear_cart",
            Action::PlaceOrder => "place_order",
            Action::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved line item as sent over the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemView {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
}

/// A suggested menu item as sent over the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionView {
    pub id: i64,
    pub name: String,
    pub price: f64,
}

/// The complete result of processing one message.
///
/// Carries no hidden state and serializes directly to the wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineResponse {
    pub intent: Intent,
    /// Display text; may contain simple `**bold**` markup.
    pub message: String,
    pub items: Vec<ItemView>,
    pub action: Option<Action>,
    /// At most `Options::max_suggestions` entries, in catalog order.
    pub suggestions: Vec<SuggestionView>,
}

impl EngineResponse {
    pub(crate) fn new(intent: Intent) -> Self {
        EngineResponse { intent, message: String::new(), items: Vec::new(), action: None, suggestions: Vec::new() }
    }
}

/// Additional details returned by [`Engine::process_verbose`].
#[derive(Debug, Clone)]
pub struct ProcessDetails {
    /// The lowercased, trimmed utterance every stage worked on.
    pub normalized: String,
    pub source: IntentSource,
    /// Strategy that produced the items, if extraction ran and found any.
    pub strategy: Option<ExtractionStrategy>,
    /// Per-match trace of the extraction, empty if extraction did not run.
    pub trace: Vec<MatchTrace>,
    pub metrics: RunMetrics,
}

/// Result of [`Engine::process_verbose`].
#[derive(Debug, Clone)]
pub struct ProcessVerbose {
    pub response: EngineResponse,
    pub details: ProcessDetails,
}

/// The order-parsing engine: an immutable catalog index plus options.
///
/// Processing is a pure function of `(catalog, utterance)`; an `Engine` can be
/// shared freely across threads. To follow menu changes, build a new engine
/// and swap it in (see [`SharedEngine`]).
///
/// # Example
/// ```
/// use orderbot::{Action, Engine, Intent, source};
///
/// let engine = Engine::new(source::default_menu());
/// let out = engine.process("order 2 veg burgers and a coke");
///
/// assert_eq!(out.intent, Intent::Add);
/// assert_eq!(out.action, Some(Action::AddToCart));
/// assert_eq!(out.items[0].quantity, 2);
/// ```
#[derive(Debug, Clone)]
pub struct Engine {
    catalog: CatalogIndex,
    options: Options,
}

impl Engine {
    /// Build an engine over `menu` with default [`Options`].
    pub fn new(menu: impl IntoIterator<Item = MenuItem>) -> Self {
        let options = Options::default();
        Engine { catalog: CatalogIndex::new(menu, options.min_keyword_len), options }
    }

    /// Build an engine over `menu` with validated `options`.
    pub fn with_options(menu: impl IntoIterator<Item = MenuItem>, options: Options) -> Result<Self> {
        options.validate()?;
        Ok(Engine { catalog: CatalogIndex::new(menu, options.min_keyword_len), options })
    }

    pub fn catalog(&self) -> &CatalogIndex {
        &self.catalog
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Process one message. Never fails: unrecognized input yields
    /// `Intent::Unknown` with a generic message.
    pub fn process(&self, utterance: &str) -> EngineResponse {
        self.run(utterance).response
    }

    /// Process one message and return extra details about how the response
    /// was reached.
    pub fn process_verbose(&self, utterance: &str) -> ProcessVerbose {
        self.run(utterance)
    }

    /// Process one message and record `(utterance, message, intent)` in `log`.
    ///
    /// The log is best effort: a failing sink is reported through `tracing`
    /// and never affects the response.
    pub fn process_logged(&self, utterance: &str, log: &dyn ChatLog) -> EngineResponse {
        let response = self.process(utterance);
        if let Err(err) = log.record(&ChatLogEntry::new(utterance, &response)) {
            tracing::warn!(error = %err, "failed to record chat log entry");
        }
        response
    }

    fn run(&self, utterance: &str) -> ProcessVerbose {
        let start = Instant::now();
        let extractor =
            ItemExtractor::new(&self.catalog, ItemMatcher::new(self.options.similarity_cutoff, self.options.strategies));

        let classification = engine::classify(&extractor, utterance);
        let source = classification.source;
        let classified = Instant::now();

        let reply = engine::respond(&self.catalog, &extractor, &self.options, utterance, classification);
        let done = Instant::now();

        let (strategy, trace) = reply.extraction.map(|e| (e.strategy, e.trace)).unwrap_or_default();
        let details = ProcessDetails {
            normalized: normalize(utterance),
            source,
            strategy,
            trace,
            metrics: RunMetrics {
                total: done - start,
                classify: classified - start,
                respond: done - classified,
            },
        };

        ProcessVerbose { response: reply.response, details }
    }
}

/// An engine reference that can be rebuilt while other threads keep
/// processing.
///
/// Readers clone the current `Arc<Engine>` under a short read lock; a rebuild
/// constructs the new engine first and then swaps the pointer, so a reader
/// sees either the old or the new catalog, never a half-built one.
#[derive(Debug)]
pub struct SharedEngine {
    inner: RwLock<Arc<Engine>>,
}

impl SharedEngine {
    pub fn new(engine: Engine) -> Self {
        SharedEngine { inner: RwLock::new(Arc::new(engine)) }
    }

    /// The engine currently in service.
    pub fn current(&self) -> Arc<Engine> {
        Arc::clone(&self.inner.read())
    }

    pub fn process(&self, utterance: &str) -> EngineResponse {
        self.current().process(utterance)
    }

    /// Rebuild over a fresh menu snapshot, keeping the current options.
    pub fn rebuild(&self, menu: impl IntoIterator<Item = MenuItem>) -> Result<()> {
        let options = self.current().options().clone();
        let engine = Engine::with_options(menu, options)?;
        self.replace(engine);
        Ok(())
    }

    /// Swap in a fully built engine.
    pub fn replace(&self, engine: Engine) {
        let items = engine.catalog().len();
        *self.inner.write() = Arc::new(engine);
        tracing::info!(items, "catalog swapped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat_log::MemoryChatLog;
    use crate::source::default_menu;

    fn engine() -> Engine {
        Engine::new(default_menu())
    }

    fn items_of(response: &EngineResponse) -> Vec<(&str, u32)> {
        response.items.iter().map(|i| (i.name.as_str(), i.quantity)).collect()
    }

    fn some_menu() -> Vec<MenuItem> {
        vec![
            MenuItem::new(1, "Awesome Fries", 99.0, "Sides", true),
            MenuItem::new(2, "Handsome Burger", 149.0, "Burgers", false),
            MenuItem::new(3, "Wholesome Bowl", 199.0, "Bowls", true),
            MenuItem::new(4, "Toothsome Tart", 89.0, "Desserts", true),
            MenuItem::new(5, "Lonesome Latte", 129.0, "Beverages", true),
            MenuItem::new(6, "Gruesome Grill", 299.0, "Mains", false),
        ]
    }

    #[test]
    fn order_with_quantities() {
        let out = engine().process("Order 2 veg burgers and a coke");
        assert_eq!(out.intent, Intent::Add);
        assert_eq!(out.action, Some(Action::AddToCart));
        assert_eq!(items_of(&out), vec![("Veg Burger", 2), ("Coke", 1)]);
        assert!(out.message.contains("2x Veg Burger, 1x Coke"));
        assert!(out.suggestions.is_empty());
    }

    #[test]
    fn longest_match_precedence() {
        let engine = Engine::new(vec![
            MenuItem::new(1, "Burger", 99.0, "Burgers", true),
            MenuItem::new(2, "Chicken Burger", 199.0, "Burgers", false),
        ]);
        let out = engine.process("add a chicken burger");
        assert_eq!(items_of(&out), vec![("Chicken Burger", 1)]);
    }

    #[test]
    fn place_my_order_is_not_an_add() {
        let out = engine().process("place my order");
        assert_eq!(out.intent, Intent::PlaceOrder);
        assert_eq!(out.action, Some(Action::PlaceOrder));
        assert!(out.items.is_empty());
    }

    #[test]
    fn misspelled_item_is_resolved() {
        let out = engine().process("i want margherita piza");
        assert_eq!(out.intent, Intent::Add);
        assert_eq!(items_of(&out), vec![("Margherita Pizza", 1)]);
    }

    #[test]
    fn implicit_order_without_verb() {
        let out = engine().process("two cokes please");
        assert_eq!(out.intent, Intent::Add);
        assert_eq!(items_of(&out), vec![("Coke", 2)]);
    }

    #[test]
    fn remove_resolves_or_asks() {
        let out = engine().process("remove coffee");
        assert_eq!(out.intent, Intent::Remove);
        assert_eq!(out.action, Some(Action::RemoveFromCart));
        assert_eq!(items_of(&out), vec![("Cold Coffee", 1)]);
        assert!(out.message.contains("Removed from cart: Cold Coffee"));

        let out = engine().process("remove xyz");
        assert_eq!(out.intent, Intent::Remove);
        assert_eq!(out.action, Some(Action::Clarify));
        assert!(out.items.is_empty());
    }

    #[test]
    fn garbage_is_unknown() {
        for input in ["", "   ", "???"] {
            let out = engine().process(input);
            assert_eq!(out.intent, Intent::Unknown, "input {input:?}");
            assert_eq!(out.action, Some(Action::Unknown));
            assert!(out.items.is_empty());
            assert!(out.suggestions.is_empty());
            assert!(out.message.starts_with("I didn't quite understand that."));
        }
    }

    #[test]
    fn add_without_match_is_not_found() {
        let out = engine().process("add xyz");
        assert_eq!(out.intent, Intent::Add);
        assert_eq!(out.action, Some(Action::NotFound));
        assert!(out.items.is_empty());
        assert!(out.message.starts_with("Sorry, I couldn't find that item"));
    }

    #[test]
    fn suggestions_are_capped() {
        let engine = Engine::new(some_menu());

        let out = engine.process("want some");
        assert_eq!(out.action, Some(Action::NotFound));
        let ids: Vec<i64> = out.suggestions.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert!(out.message.contains("• Awesome Fries (₹99)"));

        let out = engine.process("some");
        assert_eq!(out.intent, Intent::Unknown);
        assert_eq!(out.suggestions.len(), 5);
        assert!(out.message.starts_with("I'm not sure what you mean."));
    }

    #[test]
    fn informational_intents() {
        let engine = engine();
        let out = engine.process("hello");
        assert_eq!((out.intent, out.action), (Intent::Greeting, Some(Action::Greeting)));

        let out = engine.process("what can you do");
        assert_eq!((out.intent, out.action), (Intent::Help, Some(Action::Help)));

        let out = engine.process("show menu");
        assert_eq!((out.intent, out.action), (Intent::ShowMenu, Some(Action::ShowMenu)));
        assert!(out.message.contains("**Burgers:**"));
        assert!(out.message.contains("🟢 Veg Burger - ₹149"));
        assert!(out.message.contains("🔴 Chicken Burger - ₹199"));

        let out = engine.process("show my cart");
        assert_eq!((out.intent, out.action), (Intent::ViewCart, Some(Action::ViewCart)));

        let out = engine.process("clear cart");
        assert_eq!((out.intent, out.action), (Intent::ClearCart, Some(Action::ClearCart)));
    }

    #[test]
    fn processing_is_idempotent() {
        let engine = engine();
        for input in ["order 2 veg burgers and a coke", "hi", "xyz", "remove coffee", "some"] {
            assert_eq!(engine.process(input), engine.process(input));
        }
    }

    #[test]
    fn quantities_are_always_positive() {
        let engine = engine();
        for input in [
            "0 coke",
            "add 0 veg burger",
            "order 99999999999 cokes",
            "half dozen mojito and 3 naan bread",
            "a dozen gulab jamun, 2 mango lassi",
            "coke coke coke",
        ] {
            let out = engine.process(input);
            assert!(out.items.iter().all(|i| i.quantity >= 1), "input {input:?}: {:?}", out.items);
        }
    }

    #[test]
    fn response_serializes_to_wire_shape() {
        let out = engine().process("add 3 french fries");
        let json = serde_json::to_value(&out).unwrap();

        assert_eq!(json["intent"], "add");
        assert_eq!(json["action"], "add_to_cart");
        assert_eq!(json["items"][0]["name"], "French Fries");
        assert_eq!(json["items"][0]["quantity"], 3);
        assert_eq!(json["items"][0]["id"], 6);
        assert_eq!(json["items"][0]["price"], 99.0);
        assert_eq!(json["suggestions"], serde_json::json!([]));

        let back: EngineResponse = serde_json::from_value(json).unwrap();
        assert_eq!(back, out);
    }

    #[test]
    fn action_names_match_the_wire_format() {
        let actions = [
            Action::Greeting,
            Action::Help,
            Action::ShowMenu,
            Action::AddToCart,
            Action::NotFound,
            Action::RemoveFromCart,
            Action::Clarify,
            Action::ViewCart,
            Action::ClearCart,
            Action::PlaceOrder,
            Action::Unknown,
        ];
        for action in actions {
            assert_eq!(serde_json::to_value(action).unwrap(), action.as_str());
            assert_eq!(action.to_string(), action.as_str());
        }
        assert_eq!(Action::AddToCart.as_str(), "add_to_cart");
    }

    #[test]
    fn verbose_matches_plain_processing() {
        let engine = engine();
        let verbose = engine.process_verbose("order 2 veg burgers and a coke");
        assert_eq!(verbose.response, engine.process("order 2 veg burgers and a coke"));
        assert_eq!(verbose.details.source, IntentSource::Pattern("add"));
        assert_eq!(verbose.details.strategy, Some(ExtractionStrategy::DirectScan));
        assert_eq!(verbose.details.trace.len(), 2);
        assert!(verbose.details.metrics.classify <= verbose.details.metrics.total);

        let verbose = engine.process_verbose("I want margherita piza");
        assert_eq!(verbose.details.normalized, "i want margherita piza");
        assert_eq!(verbose.details.strategy, Some(ExtractionStrategy::Segments));
        assert_eq!(verbose.details.trace[0].kind, Some(crate::MatchKind::Fuzzy));

        let verbose = engine.process_verbose("hi");
        assert_eq!(verbose.details.strategy, None);
        assert!(verbose.details.trace.is_empty());
    }

    #[test]
    fn options_are_validated() {
        let bad = Options { similarity_cutoff: 1.5, ..Options::default() };
        assert!(matches!(
            Engine::with_options(default_menu(), bad),
            Err(Error::InvalidOption { name: "similarity_cutoff", .. })
        ));
        let bad = Options { min_keyword_len: 0, ..Options::default() };
        assert!(bad.validate().is_err());
        let bad = Options { max_suggestions: 0, ..Options::default() };
        assert!(bad.validate().is_err());
        assert!(Options::default().validate().is_ok());
    }

    #[test]
    fn options_change_behavior() {
        let exact_only = Options { strategies: MatchStrategies::EXACT, ..Options::default() };
        let engine = Engine::with_options(default_menu(), exact_only).unwrap();
        let out = engine.process("i want margherita piza");
        assert_eq!(out.action, Some(Action::NotFound));

        let two = Options { max_suggestions: 2, ..Options::default() };
        let engine = Engine::with_options(some_menu(), two).unwrap();
        assert_eq!(engine.process("some").suggestions.len(), 2);
    }

    #[test]
    fn shared_engine_swaps_catalogs() {
        let shared = SharedEngine::new(engine());
        assert_eq!(shared.process("add coke").action, Some(Action::AddToCart));

        let before = shared.current();
        shared.rebuild(some_menu()).unwrap();
        assert_eq!(shared.process("add coke").action, Some(Action::NotFound));
        // a reader holding the old engine keeps a consistent view
        assert_eq!(before.process("add coke").action, Some(Action::AddToCart));
    }

    #[test]
    fn shared_engine_serves_concurrent_readers() {
        let shared = SharedEngine::new(engine());
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..50 {
                        let out = shared.process("add coke");
                        assert_eq!(out.intent, Intent::Add);
                    }
                });
            }
            scope.spawn(|| {
                for _ in 0..10 {
                    shared.rebuild(default_menu()).unwrap();
                }
            });
        });
        assert_eq!(shared.current().catalog().len(), 20);
    }

    #[test]
    fn logged_processing_records_the_exchange() {
        let log = MemoryChatLog::default();
        let out = engine().process_logged("hi", &log);
        let entries = log.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].user_message, "hi");
        assert_eq!(entries[0].bot_response, out.message);
        assert_eq!(entries[0].intent, Intent::Greeting);
    }

    #[test]
    fn failing_log_never_fails_the_response() {
        struct Broken;
        impl ChatLog for Broken {
            fn record(&self, _entry: &ChatLogEntry) -> Result<()> {
                Err(Error::ChatLog("sink offline".to_string()))
            }
        }

        let out = engine().process_logged("place order", &Broken);
        assert_eq!(out.intent, Intent::PlaceOrder);
    }
}
