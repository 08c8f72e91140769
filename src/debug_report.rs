use orderbot::{IntentSource, MatchTrace, ProcessVerbose};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_run(input: &str, run: &ProcessVerbose, color: bool) {
    let palette = ansi::Palette::new(color);
    let response = &run.response;
    let details = &run.details;
    println!("\n{}", palette.bold(palette.paint(format!("💬 Message: \"{}\"", input), ansi::CYAN)));

    println!("\n{}", palette.paint("━━━ Intent ━━━", ansi::GRAY));
    let source = match details.source {
        IntentSource::Pattern(rule) => format!("pattern '{rule}'"),
        IntentSource::Extraction => "items extracted, no pattern".to_string(),
        IntentSource::Fallback => "fallback".to_string(),
    };
    println!(
        "  {} {} {}",
        palette.bold(palette.paint(response.intent.as_str(), ansi::GREEN)),
        palette.dim("│ via"),
        palette.paint(source, ansi::BLUE)
    );

    println!("\n{}", palette.paint("━━━ Extraction ━━━", ansi::GRAY));
    print_extraction(run, &palette);

    println!("\n{}", palette.paint("━━━ Response ━━━", ansi::GRAY));
    print_response(run, &palette);

    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    println!(
        "  Total: {}  │  Classify: {}  │  Respond: {}",
        palette.paint(format!("{:?}", details.metrics.total), ansi::GREEN),
        palette.paint(format!("{:?}", details.metrics.classify), ansi::CYAN),
        palette.dim(format!("{:?}", details.metrics.respond)),
    );
    println!();
}

fn print_extraction(run: &ProcessVerbose, palette: &ansi::Palette) {
    let details = &run.details;
    if details.trace.is_empty() {
        println!("{}", palette.dim("  Not run"));
        return;
    }

    match details.strategy {
        Some(strategy) => println!("  {} {}", palette.dim("strategy:"), palette.paint(format!("{strategy:?}"), ansi::BLUE)),
        None => println!("  {}", palette.paint("No item resolved", ansi::YELLOW)),
    }
    for (idx, step) in details.trace.iter().enumerate() {
        println!("  {} {}", palette.paint(format!("[{}]", idx), ansi::GRAY), fmt_trace(step, palette));
    }
}

fn fmt_trace(step: &MatchTrace, palette: &ansi::Palette) -> String {
    let target = match (&step.item, step.kind) {
        (Some(item), Some(kind)) => format!("{} {}", palette.paint(item, ansi::GREEN), palette.dim(format!("({kind:?})"))),
        (Some(item), None) => palette.paint(item, ansi::GREEN),
        (None, _) => palette.dim("✗ no match"),
    };
    format!(
        "{} {} {} {}",
        palette.paint(format!("{}x", step.quantity), ansi::YELLOW),
        palette.paint(format!("\"{}\"", step.segment), ansi::CYAN),
        palette.dim("→"),
        target
    )
}

fn print_response(run: &ProcessVerbose, palette: &ansi::Palette) {
    let response = &run.response;
    if let Some(action) = response.action {
        println!("  {} {}", palette.dim("action:"), palette.paint(action.as_str(), ansi::BLUE));
    }
    for line in response.message.lines() {
        println!("  {}", render_markup(line, palette));
    }

    if !response.items.is_empty() {
        println!("\n  {}", palette.dim("items:"));
        for item in &response.items {
            println!(
                "    {} {} {}",
                palette.paint(format!("{}x", item.quantity), ansi::YELLOW),
                palette.bold(&item.name),
                palette.dim(format!("#{} ₹{}", item.id, item.price))
            );
        }
    }

    if !response.suggestions.is_empty() {
        println!("\n  {}", palette.dim("suggestions:"));
        for item in &response.suggestions {
            println!("    {} {}", palette.paint(&item.name, ansi::CYAN), palette.dim(format!("#{} ₹{}", item.id, item.price)));
        }
    }
}

/// `**bold**` spans of a message line rendered with the palette.
fn render_markup(line: &str, palette: &ansi::Palette) -> String {
    line.split("**")
        .enumerate()
        .map(|(idx, part)| if idx % 2 == 1 { palette.bold(part) } else { part.to_string() })
        .collect()
}
