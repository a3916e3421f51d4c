use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
    thread,
    time::Duration,
};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use colored::Colorize;
use log::{debug, info};
use serde_json::Value;
use tabled::{Table, Tabled, settings::Style as TableStyle};

use glitter::{
    Logging, PROJECT_NAME, PROJECT_VERSION,
    ansi::{self, STYLES, Style},
    config::{Config, ConfigureArgs, configure, show_configuration},
    escape,
    ui::{
        PromptSpec, Spinner, ValidAnswer, build_grid, labels_from_json, prompt, prompt_path,
        prompt_secure, prompt_yes_no, rows_from_json,
    },
};

#[derive(Parser)]
#[command(version = PROJECT_VERSION, about, long_about = None)]
pub struct UserArgs {
    #[command(subcommand)]
    command: Command,

    /// Verbose
    #[arg(short, long)]
    verbose: bool,

    /// Never emit escape sequences
    #[arg(long)]
    no_ansi: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Show the closest 256 color palette entry for a hex color
    Color {
        /// 3 or 6 hex digits, e.g. 0FF or 22d3ee
        hex: String,

        /// Paint the background instead of the foreground
        #[arg(long, short)]
        background: bool,
    },

    /// List the named text styles and colors
    Styles,

    /// Render a JSON array of flat objects as a table
    Grid {
        /// JSON file to read (stdin when omitted)
        file: Option<PathBuf>,

        /// JSON object mapping column keys to header labels
        #[arg(long)]
        labels: Option<String>,
    },

    /// Ask a free-form question
    Ask {
        question: String,

        #[arg(long)]
        default: Option<String>,

        #[arg(long)]
        allow_empty: bool,

        /// Accept exactly this answer (repeatable)
        #[arg(long = "valid")]
        valid: Vec<String>,

        /// Accept answers matching this regular expression (repeatable)
        #[arg(long = "pattern")]
        patterns: Vec<String>,

        /// Offer this word for Tab completion (repeatable)
        #[arg(long = "word")]
        words: Vec<String>,
    },

    /// Ask a yes/no question
    #[command(visible_alias = "yn")]
    Confirm {
        question: String,

        #[arg(long)]
        default: Option<String>,
    },

    /// Ask for a secret without echoing it
    Secret {
        question: String,

        #[arg(long)]
        allow_empty: bool,
    },

    /// Ask for a filesystem path with path completion
    Path {
        question: String,

        #[arg(long)]
        default: Option<String>,
    },

    /// Show a spinner while simulated work runs
    Spin {
        message: String,

        /// How long the simulated work takes
        #[arg(long, default_value_t = 3)]
        seconds: u64,

        /// Make the simulated work fail
        #[arg(long)]
        fail: bool,
    },

    /// Show Config
    #[command(visible_alias = "show-config")]
    ShowConfiguration,

    /// Change persisted settings
    Configure(ConfigureArgs),
}

fn init_logging(verbose: bool, debug_mode: bool) -> Result<()> {
    if verbose {
        Logging::new().with_debug_mode(true).start()
    } else {
        let file_name = format!("{PROJECT_NAME}.log");
        Logging::new()
            .with_file(file_name)
            .with_debug_mode(debug_mode)
            .start()
    }
}

fn show_color(hex: &str, background: bool) {
    let channels = ansi::channels(hex);
    let index = channels.index();
    let sequence = if background {
        ansi::bg_hex_color(hex)
    } else {
        ansi::hex_color(hex)
    };

    let swatch = if background { "      " } else { "██████" };
    println!(
        "{sequence}{swatch}{} {} -> {}",
        Style::Reset.sequence(),
        hex.bold(),
        index.to_string().cyan()
    );
    println!(
        "  r={} g={} b={} ({} bits per channel)",
        channels.red, channels.green, channels.blue, channels.bpc
    );
}

#[derive(Tabled)]
struct StyleRow {
    name: &'static str,
    code: u8,
    sequence: String,
}

fn show_styles() {
    let rows = STYLES.iter().map(|&(_, name, code)| StyleRow {
        name,
        code,
        sequence: format!("ESC[{code}m"),
    });

    let mut table = Table::new(rows);
    table.with(TableStyle::modern());
    println!("{table}");
}

fn show_grid(file: Option<&PathBuf>, labels: Option<&str>) -> Result<()> {
    let input = match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Unable to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Unable to read rows from stdin")?;
            buf
        }
    };

    let value: Value = serde_json::from_str(&input).context("Rows are not valid JSON")?;
    let rows = rows_from_json(&value)?;
    let labels = labels
        .map(|l| -> Result<_> {
            let value: Value = serde_json::from_str(l).context("Labels are not valid JSON")?;
            Ok(labels_from_json(&value)?)
        })
        .transpose()?;

    debug!("rendering {} rows", rows.len());
    print!("{}", build_grid(rows, labels)?);
    Ok(())
}

fn ask(
    question: &str,
    mut spec: PromptSpec,
    valid: Vec<String>,
    patterns: &[String],
    words: &[String],
) -> Result<()> {
    spec.valid_answers = valid.into_iter().map(ValidAnswer::from).collect();
    for pattern in patterns {
        spec.valid_answers.push(ValidAnswer::pattern(pattern)?);
    }

    let words: Vec<&str> = words.iter().map(String::as_str).collect();
    let answer = prompt(question, &spec, &words, None)?;
    println!("{answer}");
    Ok(())
}

fn spin(config: &Config, message: &str, seconds: u64, fail: bool) -> Result<()> {
    let result = Spinner::new(message)
        .with_interval(config.spinner_interval())
        .run(|| {
            thread::sleep(Duration::from_secs(seconds));
            if fail {
                Err(anyhow!("simulated failure after {seconds}s"))
            } else {
                Ok(seconds)
            }
        });

    match result {
        Ok(seconds) => {
            info!("simulated work finished after {seconds}s");
            Ok(())
        }
        Err(e) => Err(e.context(format!("{} failed", message.red()))),
    }
}

fn main() -> Result<()> {
    let args = UserArgs::parse();

    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("{} {e:#}", "Ignoring configuration:".yellow());
        Config::default()
    });

    init_logging(args.verbose, config.debug)?;

    config.apply();
    if args.no_ansi {
        escape::set_enabled(false);
    }
    colored::control::set_override(escape::is_enabled());

    match args.command {
        Command::Color { hex, background } => {
            show_color(&hex, background);
            Ok(())
        }
        Command::Styles => {
            show_styles();
            Ok(())
        }
        Command::Grid { file, labels } => show_grid(file.as_ref(), labels.as_deref()),
        Command::Ask {
            question,
            default,
            allow_empty,
            valid,
            patterns,
            words,
        } => {
            let spec = PromptSpec::builder()
                .maybe_default_answer(default)
                .allow_empty(allow_empty)
                .build();
            ask(&question, spec, valid, &patterns, &words)
        }
        Command::Confirm { question, default } => {
            let yes = prompt_yes_no(&question, default.as_deref())?;
            println!("{}", if yes { "yes".green() } else { "no".red() });
            Ok(())
        }
        Command::Secret {
            question,
            allow_empty,
        } => {
            let spec = PromptSpec::builder().allow_empty(allow_empty).build();
            let secret = prompt_secure(&question, &spec)?;
            println!("received {} characters", secret.chars().count());
            Ok(())
        }
        Command::Path { question, default } => {
            let spec = PromptSpec::builder().maybe_default_answer(default).build();
            let path = prompt_path(&question, &spec)?;
            println!("{path}");
            Ok(())
        }
        Command::Spin {
            message,
            seconds,
            fail,
        } => spin(&config, &message, seconds, fail),
        Command::ShowConfiguration => show_configuration(),
        Command::Configure(args) => configure(&args),
    }
}
