//! Intent classification.
//!
//! The ordered intent table is evaluated first; the first rule with any
//! matching pattern decides. When no rule fires, item extraction acts as the
//! tie-breaker: an utterance that names catalog items ("two cokes please") is
//! an implicit `add`, anything else is `unknown`.

use super::extract::{Extraction, ItemExtractor};
use crate::rules::intents;
use crate::{Intent, normalize};

/// How the intent of a message was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentSource {
    /// A pattern of the named intent rule matched.
    Pattern(&'static str),
    /// No rule matched but items were extracted.
    Extraction,
    /// Neither rules nor extraction produced anything.
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Classification {
    pub intent: Intent,
    pub source: IntentSource,
    /// Extraction already run while classifying, reused by the dialogue policy.
    pub extraction: Option<Extraction>,
}

pub(crate) fn classify(extractor: &ItemExtractor<'_>, utterance: &str) -> Classification {
    let normalized = normalize(utterance);

    if let Some(rule) = intents::first_match(&normalized) {
        tracing::debug!(rule = rule.name, "intent pattern matched");
        return Classification { intent: rule.intent, source: IntentSource::Pattern(rule.name), extraction: None };
    }

    let extraction = extractor.extract(&normalized);
    let (intent, source) =
        if extraction.is_empty() { (Intent::Unknown, IntentSource::Fallback) } else { (Intent::Add, IntentSource::Extraction) };
    tracing::debug!(intent = %intent, "no intent pattern matched");

    Classification { intent, source, extraction: Some(extraction) }
}
