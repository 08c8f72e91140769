#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

/// Build an [`IntentRule`](crate::rules::intents::IntentRule) from a name, the
/// intent it yields and one or more word-boundary patterns.
#[macro_export]
macro_rules! intent_rule {
    (
        name: $name:expr,
        intent: $intent:expr,
        patterns: [ $($pat:literal),+ $(,)? ]
        $(,)?
    ) => {{
        $crate::rules::intents::IntentRule {
            name: $name,
            intent: $intent,
            patterns: vec![ $($crate::regex!($pat)),+ ],
        }
    }};
}
