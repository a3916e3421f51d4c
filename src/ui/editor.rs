//! Process-wide line-editor state.
//!
//! The active completion provider, the character appended after a unique
//! completion, and the echo flag are shared by every prompt in the process.
//! They are only ever changed through the guards below, which put the
//! previous value back when dropped, including during unwinding.

use std::{
    fs,
    path::Path,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
};

use log::debug;

/// Produces completion candidates for the word being typed.
pub trait Completer: Send + Sync {
    fn complete(&self, word: &str) -> Vec<String>;
}

impl<F> Completer for F
where
    F: Fn(&str) -> Vec<String> + Send + Sync,
{
    fn complete(&self, word: &str) -> Vec<String> {
        self(word)
    }
}

pub type SharedCompleter = Arc<dyn Completer>;

/// Case-sensitive prefix filter over a fixed list of words.
#[derive(Debug, Clone, Default)]
pub struct WordList {
    words: Vec<String>,
}

impl WordList {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }
}

impl Completer for WordList {
    fn complete(&self, word: &str) -> Vec<String> {
        self.words
            .iter()
            .filter(|w| w.starts_with(word))
            .cloned()
            .collect()
    }
}

/// Completes filesystem paths.
///
/// The typed prefix is split at its last separator: entries of that directory
/// (the working directory when there is none) whose names start with the
/// remainder are returned with the directory part kept verbatim. Hidden
/// entries are only offered once the remainder itself starts with a dot.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilesystemCompleter;

impl Completer for FilesystemCompleter {
    fn complete(&self, word: &str) -> Vec<String> {
        let split = word.rfind(std::path::is_separator).map_or(0, |i| i + 1);
        let (dir_part, name_part) = word.split_at(split);
        let dir = if dir_part.is_empty() {
            Path::new(".")
        } else {
            Path::new(dir_part)
        };

        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("unable to list {} for completion: {e}", dir.display());
                return Vec::new();
            }
        };

        let mut candidates: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| name.starts_with(name_part))
            .filter(|name| name_part.starts_with('.') || !name.starts_with('.'))
            .map(|name| format!("{dir_part}{name}"))
            .collect();
        candidates.sort();
        candidates
    }
}

struct CompletionState {
    provider: Option<SharedCompleter>,
    append_character: Option<char>,
}

static COMPLETION: Mutex<CompletionState> = Mutex::new(CompletionState {
    provider: None,
    append_character: Some(' '),
});

static ECHO: AtomicBool = AtomicBool::new(true);

fn completion_state() -> MutexGuard<'static, CompletionState> {
    COMPLETION.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Returns the active completion provider, if any.
pub fn completion_provider() -> Option<SharedCompleter> {
    completion_state().provider.clone()
}

/// Asks the active provider for candidates. Empty when none is installed.
pub fn complete(word: &str) -> Vec<String> {
    // Released before calling out so providers may themselves use the editor.
    let provider = completion_provider();
    provider.map(|p| p.complete(word)).unwrap_or_default()
}

/// Character appended after a unique completion.
pub fn append_character() -> Option<char> {
    completion_state().append_character
}

/// Changes the append character for the rest of the process.
pub fn set_append_character(append: Option<char>) {
    completion_state().append_character = append;
}

/// Whether typed input is echoed back.
pub fn echo_enabled() -> bool {
    ECHO.load(Ordering::SeqCst)
}

/// Installs a completion provider until dropped.
#[must_use = "the previous provider is restored when the guard is dropped"]
pub struct CompletionGuard {
    previous: Option<SharedCompleter>,
}

impl CompletionGuard {
    pub fn install(provider: SharedCompleter) -> Self {
        let previous = completion_state().provider.replace(provider);
        Self { previous }
    }
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        completion_state().provider = self.previous.take();
    }
}

/// Overrides the append character until dropped.
#[must_use = "the previous append character is restored when the guard is dropped"]
pub struct AppendCharacterGuard {
    previous: Option<char>,
}

impl AppendCharacterGuard {
    pub fn set(append: Option<char>) -> Self {
        let mut state = completion_state();
        let previous = std::mem::replace(&mut state.append_character, append);
        Self { previous }
    }
}

impl Drop for AppendCharacterGuard {
    fn drop(&mut self) {
        completion_state().append_character = self.previous;
    }
}

/// Disables echo of typed input until dropped.
#[must_use = "echo is restored when the guard is dropped"]
pub struct EchoGuard {
    previous: bool,
}

impl EchoGuard {
    pub fn disable() -> Self {
        Self {
            previous: ECHO.swap(false, Ordering::SeqCst),
        }
    }
}

impl Drop for EchoGuard {
    fn drop(&mut self) {
        ECHO.store(self.previous, Ordering::SeqCst);
    }
}

/// Serializes tests that touch the process-wide editor state.
#[cfg(test)]
pub(crate) fn test_lock() -> MutexGuard<'static, ()> {
    static LOCK: Mutex<()> = Mutex::new(());
    LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}
