//! Platform-conditional escape sequence emission.
//!
//! Every control sequence in the crate goes through [`Escape`]. On platforms
//! whose consoles do not understand VT100 sequences the emitter degrades to
//! the empty string, so callers never need to branch themselves.

use std::{
    fmt::Display,
    sync::{
        OnceLock,
        atomic::{AtomicBool, Ordering},
    },
};

use log::debug;

const ESC: char = '\x1b';

static CAPABILITY: OnceLock<AtomicBool> = OnceLock::new();

fn capability() -> &'static AtomicBool {
    CAPABILITY.get_or_init(|| {
        let escape = Escape::for_platform(std::env::consts::OS);
        debug!(
            "escape sequences {} for platform {}",
            if escape.is_enabled() { "enabled" } else { "disabled" },
            std::env::consts::OS
        );
        AtomicBool::new(escape.is_enabled())
    })
}

/// Overrides the process-wide capability resolved from the platform.
pub fn set_enabled(enabled: bool) {
    capability().store(enabled, Ordering::SeqCst);
}

/// Returns whether escape sequences are currently emitted.
pub fn is_enabled() -> bool {
    capability().load(Ordering::SeqCst)
}

/// Wraps raw control-code bodies into `ESC [ <body>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Escape {
    enabled: bool,
}

impl Escape {
    pub const ENABLED: Self = Self { enabled: true };
    pub const DISABLED: Self = Self { enabled: false };

    /// Resolves the capability for a platform identifier such as
    /// `std::env::consts::OS` or a target triple.
    #[must_use]
    pub fn for_platform(os: &str) -> Self {
        let os = os.to_ascii_lowercase();
        Self {
            enabled: !(os.starts_with("win") || os.contains("mingw")),
        }
    }

    /// The emitter backed by the process-wide capability.
    #[must_use]
    pub fn current() -> Self {
        Self {
            enabled: is_enabled(),
        }
    }

    #[must_use]
    pub fn is_enabled(self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn emit<D: Display>(self, body: D) -> String {
        if self.enabled {
            format!("{ESC}[{body}")
        } else {
            String::new()
        }
    }

    /// Select Graphic Rendition: appends the `m` final byte to `code`.
    #[must_use]
    pub fn sgr<D: Display>(self, code: D) -> String {
        self.emit(format_args!("{code}m"))
    }
}

impl Default for Escape {
    fn default() -> Self {
        Self::current()
    }
}
