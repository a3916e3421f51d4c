//! Interactive command-line primitives.
//!
//! - `prompt` - validated line input with autocompletion
//! - `spinner` - activity indicator around a unit of work
//! - `grid` - bordered text tables

pub mod editor;
mod grid;
mod prompt;
pub mod reader;
mod spinner;

pub use editor::{Completer, FilesystemCompleter, SharedCompleter, WordList};
pub use grid::{Grid, Record, build_grid, labels_from_json, rows_from_json};
pub use prompt::{
    PromptSpec, Prompter, ValidAnswer, prompt, prompt_path, prompt_secure, prompt_yes_no,
};
pub use reader::{LineReader, ScriptedReader, TerminalReader};
pub use spinner::{DEFAULT_INTERVAL, Spinner, spinner};
