use std::{fs, io::Write, path::Path, time::Duration};

use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use tabled::{
    Table, Tabled,
    settings::{Margin, Rotate, Style},
};

use crate::{
    common::{print_header, project_config_dir},
    escape,
    ui::editor,
};

const CONFIG_FILE_NAME: &str = "config.json";

#[derive(clap::Args, Default)]
pub struct ConfigureArgs {
    /// Force escape sequences on or off, overriding platform detection
    #[arg(long)]
    pub ansi: Option<bool>,

    /// Clear a previous --ansi override and detect from the platform again
    #[arg(long, conflicts_with = "ansi")]
    pub ansi_auto: bool,

    /// Delay between spinner frames, in milliseconds
    #[arg(long)]
    pub spinner_interval_ms: Option<u64>,

    /// Character appended after a unique completion (empty for none)
    #[arg(long)]
    pub completion_append: Option<String>,

    /// Log at debug level
    #[arg(long)]
    pub debug: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Escape sequence override; `None` keeps platform detection.
    #[serde(default)]
    pub ansi: Option<bool>,
    #[serde(default = "default_spinner_interval_ms")]
    pub spinner_interval_ms: u64,
    #[serde(default = "default_completion_append")]
    pub completion_append: Option<char>,
    #[serde(default)]
    pub debug: bool,
}

fn default_spinner_interval_ms() -> u64 {
    500
}

#[allow(clippy::unnecessary_wraps)]
fn default_completion_append() -> Option<char> {
    Some(' ')
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ansi: None,
            spinner_interval_ms: default_spinner_interval_ms(),
            completion_append: default_completion_append(),
            debug: false,
        }
    }
}

#[derive(Tabled)]
struct ConfigDisplay {
    ansi: String,
    escapes_active: bool,
    spinner_interval_ms: u64,
    completion_append: String,
    debug: bool,
}

impl From<&Config> for ConfigDisplay {
    fn from(config: &Config) -> Self {
        Self {
            ansi: config
                .ansi
                .map_or_else(|| "auto".to_string(), |a| if a { "on" } else { "off" }.to_string()),
            escapes_active: escape::is_enabled(),
            spinner_interval_ms: config.spinner_interval_ms,
            completion_append: match config.completion_append {
                None => "none".to_string(),
                Some(' ') => "space".to_string(),
                Some(c) => c.to_string(),
            },
            debug: config.debug,
        }
    }
}

impl Config {
    pub(crate) fn load_existing(config_file: &Path) -> Result<Self> {
        let config_string = fs::read_to_string(config_file)
            .with_context(|| format!("Unable to read {}", config_file.display()))?;

        let config: Config = serde_json::from_str(&config_string)
            .context("Unable to deserialize configuration data")?;

        Ok(config)
    }

    pub(crate) fn save_to(&self, config_file: &Path) -> Result<()> {
        let config_string =
            serde_json::to_string_pretty(self).context("Unable to serialize configuration data")?;

        let mut fd = fs::OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(config_file)
            .with_context(|| format!("Unable to write {}", config_file.display()))?;

        fd.write_all(config_string.as_bytes()).with_context(|| {
            format!("Failed to write configuration to {}", config_file.display())
        })?;

        info!("configuration saved to {}", config_file.display());
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        let config_file = project_config_dir()?.join(CONFIG_FILE_NAME);
        self.save_to(&config_file)
    }

    pub fn load() -> Result<Self> {
        let config_file = project_config_dir()?.join(CONFIG_FILE_NAME);

        if config_file.exists() {
            Config::load_existing(&config_file)
        } else {
            //
            // doesn't exist yet
            //
            Ok(Config::default())
        }
    }

    #[must_use]
    pub fn spinner_interval(&self) -> Duration {
        Duration::from_millis(self.spinner_interval_ms)
    }

    /// Pushes the settings into the process-wide escape capability and
    /// line-editor state.
    pub fn apply(&self) {
        if let Some(ansi) = self.ansi {
            escape::set_enabled(ansi);
        }
        editor::set_append_character(self.completion_append);
    }

    pub(crate) fn update(&mut self, args: &ConfigureArgs) {
        // Update only the fields that were explicitly provided
        if let Some(ansi) = args.ansi {
            self.ansi = Some(ansi);
        }
        if args.ansi_auto {
            self.ansi = None;
        }
        if let Some(ms) = args.spinner_interval_ms {
            self.spinner_interval_ms = ms;
        }
        if let Some(append) = &args.completion_append {
            self.completion_append = append.chars().next();
        }
        if let Some(debug) = args.debug {
            self.debug = debug;
        }
    }
}

fn display_configuration(config: &Config) {
    let display = ConfigDisplay::from(config);
    let mut table = Table::new([display]);
    table
        .with(Rotate::Left)
        .with(Style::modern())
        .with(Margin::new(4, 0, 0, 0));

    print_header();
    println!("{table}");
}

////////////////////////////////////////////////////////////////////////////////
// PUBLIC
////////////////////////////////////////////////////////////////////////////////

pub fn show_configuration() -> Result<()> {
    let config = Config::load()?;

    display_configuration(&config);

    Ok(())
}

pub fn configure(args: &ConfigureArgs) -> Result<()> {
    let mut config = Config::load()?;

    config.update(args);
    config.save()?;

    display_configuration(&config);

    Ok(())
}
