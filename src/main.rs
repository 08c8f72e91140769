mod debug_report;

use orderbot::{ChatLog, ChatLogEntry, Engine, Error, JsonLinesChatLog, Options, TracingChatLog, source};
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "ORDERBOT_LOG";

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    init_tracing(config.debug);

    if let Err(err) = run(config) {
        eprintln!("error: {err}");
        let code = if matches!(err, Error::InvalidOption { .. }) { 2 } else { 1 };
        std::process::exit(code);
    }
}

struct CliConfig {
    input: Option<String>,
    menu: Option<PathBuf>,
    options: Option<PathBuf>,
    cutoff: Option<f64>,
    min_keyword_len: Option<usize>,
    max_suggestions: Option<usize>,
    log_file: Option<PathBuf>,
    json: bool,
    color: bool,
    debug: bool,
}

fn run(config: CliConfig) -> Result<(), Error> {
    let menu = match &config.menu {
        Some(path) => source::load_menu(path)?,
        None => source::default_menu(),
    };

    let mut options = match &config.options {
        Some(path) => source::load_options(path)?,
        None => Options::default(),
    };
    if let Some(cutoff) = config.cutoff {
        options.similarity_cutoff = cutoff;
    }
    if let Some(len) = config.min_keyword_len {
        options.min_keyword_len = len;
    }
    if let Some(cap) = config.max_suggestions {
        options.max_suggestions = cap;
    }

    let engine = Engine::with_options(menu, options)?;
    let log: Box<dyn ChatLog> = match &config.log_file {
        Some(path) => Box::new(JsonLinesChatLog::open(path)?),
        None => Box::new(TracingChatLog),
    };

    match &config.input {
        Some(input) => handle(&engine, log.as_ref(), input, &config),
        None => {
            for line in io::stdin().lock().lines() {
                let line = line.map_err(|source| Error::Io { path: PathBuf::from("<stdin>"), source })?;
                if line.trim().is_empty() {
                    continue;
                }
                handle(&engine, log.as_ref(), &line, &config)?;
            }
            Ok(())
        }
    }
}

fn handle(engine: &Engine, log: &dyn ChatLog, input: &str, config: &CliConfig) -> Result<(), Error> {
    let verbose = engine.process_verbose(input);
    if let Err(err) = log.record(&ChatLogEntry::new(input, &verbose.response)) {
        tracing::warn!(error = %err, "failed to record chat log entry");
    }

    if config.json {
        let line = serde_json::to_string(&verbose.response)
            .map_err(|source| Error::Json { path: PathBuf::from("<stdout>"), source })?;
        writeln!(io::stdout().lock(), "{line}").map_err(|source| Error::Io { path: PathBuf::from("<stdout>"), source })
    } else {
        debug_report::print_run(input, &verbose, config.color);
        Ok(())
    }
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("orderbot=debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(true)
        .init();
}

fn parse_args() -> Result<CliConfig, String> {
    let mut config = CliConfig {
        input: None,
        menu: None,
        options: None,
        cutoff: None,
        min_keyword_len: None,
        max_suggestions: None,
        log_file: None,
        json: false,
        color: io::stdout().is_terminal(),
        debug: false,
    };
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag.to_string(), Some(value.to_string())),
            _ => (arg.clone(), None),
        };
        let mut value = |name: &str| -> Result<String, String> {
            inline.clone().or_else(|| args.next()).ok_or_else(|| format!("error: {name} expects a value"))
        };

        match flag.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("orderbot {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => config.color = true,
            "--no-color" => config.color = false,
            "--json" => config.json = true,
            "--debug" => config.debug = true,
            "--menu" => config.menu = Some(PathBuf::from(value("--menu")?)),
            "--options" => config.options = Some(PathBuf::from(value("--options")?)),
            "--log-file" => config.log_file = Some(PathBuf::from(value("--log-file")?)),
            "--cutoff" => config.cutoff = Some(parse_number("--cutoff", &value("--cutoff")?)?),
            "--min-keyword-len" => {
                config.min_keyword_len = Some(parse_number("--min-keyword-len", &value("--min-keyword-len")?)?)
            }
            "--max-suggestions" => {
                config.max_suggestions = Some(parse_number("--max-suggestions", &value("--max-suggestions")?)?)
            }
            "--" => {
                let rest = args.by_ref().collect::<Vec<_>>().join(" ");
                set_input(&mut config, rest)?;
                break;
            }
            _ if arg.starts_with('-') && arg.len() > 1 => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                let rest = std::iter::once(arg).chain(args.by_ref()).collect::<Vec<_>>().join(" ");
                set_input(&mut config, rest)?;
                break;
            }
        }
    }

    Ok(config)
}

fn set_input(config: &mut CliConfig, input: String) -> Result<(), String> {
    if input.trim().is_empty() {
        return Err(format!("error: empty utterance\n\n{}", help_text()));
    }
    if config.input.is_some() {
        return Err("error: utterance provided multiple times".to_string());
    }
    config.input = Some(input);
    Ok(())
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: &str) -> Result<T, String> {
    value.parse().map_err(|_| format!("error: invalid value '{value}' for {flag}"))
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "orderbot {version}

Rule-based food-ordering message parser.

Usage:
  orderbot [OPTIONS] [--] <utterance...>
  orderbot [OPTIONS] < transcript.txt

Without an utterance, every non-empty line of stdin is processed as a
separate message.

Options:
  --menu <file>              Menu snapshot as a JSON array. Default: built-in menu.
  --options <file>           Engine options as a JSON object.
  --cutoff <ratio>           Similarity cutoff for fuzzy matches (0.0-1.0).
  --min-keyword-len <n>      Minimum length of keyword and suggestion words.
  --max-suggestions <n>      Maximum number of suggestions per response.
  --json                     Print each response as one JSON object per line.
  --log-file <file>          Append the conversation as JSON lines to <file>.
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  --debug                    Log engine decisions to stderr (overrides {log_env}).
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Environment:
  {log_env}               Log filter, e.g. orderbot=debug. Default: warn.

Exit codes:
  0  Success.
  1  Internal error (unreadable menu, options or log file).
  2  Invalid arguments or options.
",
        version = env!("CARGO_PKG_VERSION"),
        log_env = LOG_ENV,
    )
}
