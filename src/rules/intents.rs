use once_cell::sync::Lazy;
use regex::Regex;

use crate::Intent;

/// One entry of the intent table: every pattern is a word-boundary regex run
/// against the normalized utterance.
#[derive(Debug)]
pub(crate) struct IntentRule {
    pub name: &'static str,
    pub intent: Intent,
    pub patterns: Vec<&'static Regex>,
}

impl IntentRule {
    pub fn matches(&self, normalized: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(normalized))
    }
}

/// The intent table in precedence order.
///
/// The order is part of the contract: administrative intents come first so the
/// broad verbs of `remove` and `add` ("order", "get", "drop") cannot shadow
/// commands such as "place my order" or "clear cart".
pub(crate) static INTENT_RULES: Lazy<Vec<IntentRule>> = Lazy::new(|| {
    vec![
        intent_rule! {
            name: "place_order",
            intent: Intent::PlaceOrder,
            patterns: [
                r"\b(place order|confirm order|checkout|check out|place my order|finalize|done ordering|that's all|submit order|complete order|place)\b",
            ],
        },
        intent_rule! {
            name: "view_cart",
            intent: Intent::ViewCart,
            patterns: [
                r"\b(view cart|show cart|what's in my cart|my cart|cart items|show my order|what did i order)\b",
            ],
        },
        intent_rule! {
            name: "clear_cart",
            intent: Intent::ClearCart,
            patterns: [r"\b(clear cart|empty cart|reset cart|start over|remove all|clear all)\b"],
        },
        intent_rule! {
            name: "show_menu",
            intent: Intent::ShowMenu,
            patterns: [
                r"\b(show menu|see menu|what do you have|list items|food list|available items|what's available)\b",
            ],
        },
        intent_rule! {
            name: "greeting",
            intent: Intent::Greeting,
            patterns: [r"\b(hi|hello|hey|good morning|good evening|howdy|greetings)\b"],
        },
        intent_rule! {
            name: "help",
            intent: Intent::Help,
            patterns: [r"\b(help|what can you do|commands|how to order)\b"],
        },
        intent_rule! {
            name: "remove",
            intent: Intent::Remove,
            patterns: [r"\b(remove|delete|cancel|drop|no more|take out|take off|don't want)\b"],
        },
        intent_rule! {
            name: "add",
            intent: Intent::Add,
            patterns: [
                r"\b(add|order|want|give|get|i'll have|i'd like|bring|include)\b",
                r"\b(can i get|can i have|i need|please add|put)\b",
            ],
        },
    ]
});

/// Return the first rule whose patterns match `normalized`.
pub(crate) fn first_match(normalized: &str) -> Option<&'static IntentRule> {
    INTENT_RULES.iter().find(|rule| rule.matches(normalized))
}
