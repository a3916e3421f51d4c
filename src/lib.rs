pub mod ansi;
mod common;
pub mod config;
pub mod cursor;
mod error;
pub mod escape;
mod logging;
pub mod screen;
pub mod ui;

pub use common::{PROJECT_NAME, PROJECT_VERSION};
pub use error::{GlitterError, Result};
pub use escape::Escape;
pub use logging::Logging;
