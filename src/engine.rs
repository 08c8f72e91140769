//! Order-parsing engine.
//!
//! This module wires the parsing pipeline together. Each stage lives in its
//! own file under `src/engine/`, and the public entry points are in `api.rs`.
//!
//! ## How the parts work together
//!
//! ```text
//! menu snapshot ── CatalogIndex::new             (catalog.rs)
//!                        │  exact names, keyword index, longest-first names
//!                        v
//! utterance ── classify ─┬─ intent table (first match wins)   (classify.rs)
//!                        └─ no rule? → ItemExtractor::extract (extract.rs)
//!                                        ├─ direct scan + parse_quantity (quantity.rs)
//!                                        └─ segments + ItemMatcher       (matcher.rs)
//!                                                         └─ ratio       (similarity.rs)
//!                        │
//!                        v
//!               respond (respond.rs) ── EngineResponse
//! ```
//!
//! Everything downstream of the catalog is a pure function of
//! `(CatalogIndex, utterance)`: no I/O, no shared mutable state, so the same
//! input against the same catalog always yields the same response.
//!
//! ## Responsibilities by module
//!
//! - `catalog.rs`: read-only lookup structures over a menu snapshot.
//! - `quantity.rs`: count requested by the text preceding an item mention.
//! - `similarity.rs`: edit-distance-style similarity ratio.
//! - `matcher.rs`: exact → containment → similarity → keyword cascade.
//! - `extract.rs`: direct scan with consumed spans, segment fallback.
//! - `classify.rs`: ordered intent rules with extraction as fallback signal.
//! - `respond.rs`: dialogue policy and suggestion lookup.
//! - `metrics.rs`: per-message timings for verbose runs.
//!
//! ## Debugging
//!
//! Run with `ORDERBOT_LOG=orderbot=debug` to see which rule fired, which
//! extraction strategy won and how each segment was resolved.

#[path = "engine/catalog.rs"]
mod catalog;
#[path = "engine/classify.rs"]
mod classify;
#[path = "engine/extract.rs"]
mod extract;
#[path = "engine/matcher.rs"]
mod matcher;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/quantity.rs"]
mod quantity;
#[path = "engine/respond.rs"]
mod respond;
#[path = "engine/similarity.rs"]
mod similarity;

pub use catalog::CatalogIndex;
pub(crate) use classify::classify;
pub use classify::IntentSource;
pub(crate) use extract::ItemExtractor;
pub use extract::{ExtractionStrategy, MatchTrace};
pub(crate) use matcher::ItemMatcher;
pub use matcher::{MatchKind, MatchStrategies};
pub use metrics::RunMetrics;
pub(crate) use respond::respond;
