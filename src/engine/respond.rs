//! Dialogue policy: `(intent, extraction, suggestions) -> EngineResponse`.
//!
//! Cart and order state belong to the caller; for `view_cart`, `clear_cart`
//! and `place_order` the engine only acknowledges the intent through the
//! response `action`.

use super::catalog::CatalogIndex;
use super::classify::Classification;
use super::extract::{Extraction, ItemExtractor};
use crate::api::{Action, EngineResponse, ItemView, Options, SuggestionView};
use crate::{Intent, LineItem, MenuItem, normalize};
use std::collections::BTreeSet;
use std::fmt::Write as _;

const GREETING: &str = "Hello! 👋 Welcome to FoodieBot! I can help you order food.\n\
Try saying things like:\n\
• \"Order 2 veg burgers and one coke\"\n\
• \"Add one pizza\"\n\
• \"Remove coffee\"\n\
• \"Place order\"\n\
• \"Show menu\"";

const HELP: &str = "Here's what I can do:\n\
🍔 **Add items**: \"Order 2 burgers and a coke\"\n\
❌ **Remove items**: \"Remove coffee\"\n\
🛒 **View cart**: \"Show my cart\"\n\
🗑️ **Clear cart**: \"Clear cart\"\n\
✅ **Place order**: \"Place my order\"\n\
📋 **See menu**: \"Show menu\"\n\n\
Just type naturally, I'll understand! 😊";

const NOT_FOUND: &str =
    "Sorry, I couldn't find that item on our menu. Try saying \"show menu\" to see available items.";

const CLARIFY_REMOVE: &str = "Which item would you like to remove? Please specify the item name.";

const VIEW_CART: &str = "🛒 Here's your current cart:";

const CLEAR_CART: &str = "🗑️ Cart cleared! Start fresh by ordering something.";

const PLACE_ORDER: &str =
    "🎉 Great! Let me confirm your order. Please review your cart and confirm to place the order.";

const NOT_UNDERSTOOD: &str = "I didn't quite understand that. 🤔\n\
Try commands like:\n\
• \"Order 2 burgers\"\n\
• \"Show menu\"\n\
• \"Help\"";

/// Response plus the extraction behind it (for verbose traces).
#[derive(Debug, Clone)]
pub(crate) struct Reply {
    pub response: EngineResponse,
    pub extraction: Option<Extraction>,
}

pub(crate) fn respond(
    catalog: &CatalogIndex,
    extractor: &ItemExtractor<'_>,
    options: &Options,
    utterance: &str,
    classification: Classification,
) -> Reply {
    let Classification { intent, extraction, .. } = classification;
    let mut response = EngineResponse::new(intent);

    let needs_items = matches!(intent, Intent::Add | Intent::Remove);
    let extraction = if needs_items { Some(extraction.unwrap_or_else(|| extractor.extract(utterance))) } else { extraction };
    let items = extraction.as_ref().map(|e| e.items.as_slice()).unwrap_or_default();

    match intent {
        Intent::Greeting => {
            response.message = GREETING.to_string();
            response.action = Some(Action::Greeting);
        }
        Intent::Help => {
            response.message = HELP.to_string();
            response.action = Some(Action::Help);
        }
        Intent::ShowMenu => {
            response.message = render_menu(catalog.items());
            response.action = Some(Action::ShowMenu);
        }
        Intent::Add if !items.is_empty() => {
            let listed: Vec<String> = items.iter().map(|li| format!("{}x {}", li.quantity, li.item.name)).collect();
            response.message = format!(
                "✅ Added to cart: {}\n\nAnything else you'd like to add? Say \"place order\" when ready!",
                listed.join(", ")
            );
            response.items = items.iter().map(item_view).collect();
            response.action = Some(Action::AddToCart);
        }
        Intent::Add => {
            let suggestions = suggest(catalog, utterance, options.min_keyword_len, options.max_suggestions);
            response.message = if suggestions.is_empty() {
                NOT_FOUND.to_string()
            } else {
                format!("🤔 I couldn't find that exact item. Did you mean one of these?\n{}", bullet_list(&suggestions))
            };
            response.suggestions = suggestions.into_iter().map(suggestion_view).collect();
            response.action = Some(Action::NotFound);
        }
        Intent::Remove if !items.is_empty() => {
            let listed: Vec<&str> = items.iter().map(|li| li.item.name.as_str()).collect();
            response.message = format!("🗑️ Removed from cart: {}", listed.join(", "));
            response.items = items.iter().map(item_view).collect();
            response.action = Some(Action::RemoveFromCart);
        }
        Intent::Remove => {
            response.message = CLARIFY_REMOVE.to_string();
            response.action = Some(Action::Clarify);
        }
        Intent::ViewCart => {
            response.message = VIEW_CART.to_string();
            response.action = Some(Action::ViewCart);
        }
        Intent::ClearCart => {
            response.message = CLEAR_CART.to_string();
            response.action = Some(Action::ClearCart);
        }
        Intent::PlaceOrder => {
            response.message = PLACE_ORDER.to_string();
            response.action = Some(Action::PlaceOrder);
        }
        Intent::Unknown => {
            let suggestions = suggest(catalog, utterance, options.min_keyword_len, options.max_suggestions);
            response.message = if suggestions.is_empty() {
                NOT_UNDERSTOOD.to_string()
            } else {
                format!(
                    "I'm not sure what you mean. Here are some items you might be looking for:\n{}\n\nTry: \"Order [item name]\" or say \"help\" for commands.",
                    bullet_list(&suggestions)
                )
            };
            response.suggestions = suggestions.into_iter().map(suggestion_view).collect();
            response.action = Some(Action::Unknown);
        }
    }

    Reply { response, extraction }
}

/// Items whose name contains any utterance word of at least `min_len`
/// characters, in catalog order, at most `cap` of them.
pub(crate) fn suggest<'c>(catalog: &'c CatalogIndex, utterance: &str, min_len: usize, cap: usize) -> Vec<&'c MenuItem> {
    let normalized = normalize(utterance);
    let ids: BTreeSet<usize> = normalized
        .split_whitespace()
        .filter(|w| w.chars().count() >= min_len)
        .flat_map(|w| catalog.ids_with_word_containing(w))
        .collect();
    ids.into_iter().take(cap).map(|id| catalog.item(id)).collect()
}

/// Menu grouped by category (first-seen order) with price and veg marker.
fn render_menu(items: &[MenuItem]) -> String {
    let mut categories: Vec<(&str, Vec<&MenuItem>)> = Vec::new();
    for item in items {
        match categories.iter_mut().find(|(category, _)| *category == item.category) {
            Some((_, group)) => group.push(item),
            None => categories.push((item.category.as_str(), vec![item])),
        }
    }

    let mut text = String::from("📋 Here's our menu:\n\n");
    for (category, group) in categories {
        let _ = writeln!(text, "**{category}:**");
        for item in group {
            let marker = if item.is_veg { "🟢" } else { "🔴" };
            let _ = writeln!(text, "  {marker} {} - {}", item.name, price(item.price));
        }
        text.push('\n');
    }
    text
}

fn bullet_list(items: &[&MenuItem]) -> String {
    items.iter().map(|item| format!("• {} ({})", item.name, price(item.price))).collect::<Vec<_>>().join("\n")
}

fn price(amount: f64) -> String {
    format!("₹{amount}")
}

fn item_view(line: &LineItem) -> ItemView {
    ItemView { id: line.item.id, name: line.item.name.clone(), price: line.item.price, quantity: line.quantity }
}

fn suggestion_view(item: &MenuItem) -> SuggestionView {
    SuggestionView { id: item.id, name: item.name.clone(), price: item.price }
}
