//! Static rule tables consulted by the engine.
//!
//! - `intents`: the ordered intent pattern table (first match wins).
//! - `lexicon`: number words, connector and stop-word patterns shared by the
//!   quantity parser and the item extractor.

pub(crate) mod intents;
pub(crate) mod lexicon;
