//! Validated line prompts with autocompletion.

use std::sync::Arc;

use bon::Builder;
use log::debug;
use regex::Regex;

use super::{
    editor::{
        AppendCharacterGuard, CompletionGuard, EchoGuard, FilesystemCompleter, SharedCompleter,
        WordList,
    },
    reader::{LineReader, TerminalReader},
};
use crate::error::{GlitterError, Result};

const YES_NO_PATTERN: &str = "(?i)^[yn]";

/// One acceptable answer.
#[derive(Debug, Clone)]
pub enum ValidAnswer {
    /// Matches only the exact string.
    Literal(String),
    /// Matches wherever the pattern finds a match in the answer.
    Pattern(Regex),
}

impl ValidAnswer {
    pub fn literal<S: Into<String>>(answer: S) -> Self {
        Self::Literal(answer.into())
    }

    pub fn pattern(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(Self::Pattern)
            .map_err(|e| GlitterError::invalid(format!("invalid answer pattern {pattern:?}: {e}")))
    }

    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            Self::Literal(answer) => answer == candidate,
            Self::Pattern(pattern) => pattern.is_match(candidate),
        }
    }
}

impl From<&str> for ValidAnswer {
    fn from(answer: &str) -> Self {
        Self::literal(answer)
    }
}

impl From<String> for ValidAnswer {
    fn from(answer: String) -> Self {
        Self::Literal(answer)
    }
}

impl From<Regex> for ValidAnswer {
    fn from(pattern: Regex) -> Self {
        Self::Pattern(pattern)
    }
}

/// Which answers a prompt accepts.
#[derive(Debug, Clone, Default, Builder)]
pub struct PromptSpec {
    /// Substituted when the user submits an empty line.
    #[builder(into)]
    pub default_answer: Option<String>,
    /// Accept an empty answer (after default substitution).
    #[builder(default)]
    pub allow_empty: bool,
    /// When non-empty, the answer must match at least one entry.
    #[builder(default)]
    pub valid_answers: Vec<ValidAnswer>,
}

impl PromptSpec {
    fn default_answer(&self) -> Option<&str> {
        self.default_answer.as_deref().filter(|d| !d.is_empty())
    }

    /// The text shown before the cursor, e.g. `Continue? [y]> `.
    #[must_use]
    pub fn question(&self, question: &str) -> String {
        match self.default_answer() {
            Some(default) => format!("{} [{}]> ", question.trim(), default.trim()),
            None => format!("{}> ", question.trim()),
        }
    }

    /// Applies the acceptance policy to a raw line. Returns the accepted
    /// answer, or `None` when the user has to be asked again.
    #[must_use]
    pub fn evaluate(&self, raw: &str) -> Option<String> {
        let answer = match self.default_answer() {
            Some(default) if raw.is_empty() => default,
            _ => raw,
        };

        if answer.is_empty() {
            return self.allow_empty.then(String::new);
        }

        if !self.valid_answers.is_empty() && !self.valid_answers.iter().any(|v| v.matches(answer))
        {
            return None;
        }

        Some(answer.to_string())
    }
}

/// Runs prompts against a [`LineReader`].
pub struct Prompter<R> {
    reader: R,
}

impl Prompter<TerminalReader> {
    #[must_use]
    pub fn terminal() -> Self {
        Self::new(TerminalReader::new())
    }
}

impl<R: LineReader> Prompter<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Asks `question` until an answer satisfies `spec`.
    ///
    /// Tab completion offers the words of `wordlist` starting with the typed
    /// text, unless a custom `completer` is given. The completer is installed
    /// only for the duration of each read.
    pub fn prompt(
        &mut self,
        question: &str,
        spec: &PromptSpec,
        wordlist: &[&str],
        completer: Option<SharedCompleter>,
    ) -> Result<String> {
        let display = spec.question(question);
        let completer =
            completer.unwrap_or_else(|| Arc::new(WordList::new(wordlist.iter().copied())));

        loop {
            let raw = {
                let _completion = CompletionGuard::install(Arc::clone(&completer));
                self.reader.read_line(&display)?
            };

            if let Some(answer) = spec.evaluate(&raw) {
                return Ok(answer);
            }
            debug!("rejected answer {raw:?} to {question:?}");
        }
    }

    /// Asks a yes/no question. Anything starting with `y` or `n` (either
    /// case) is accepted; only `n` answers are false.
    pub fn yes_no(&mut self, question: &str, default_answer: Option<&str>) -> Result<bool> {
        let spec = PromptSpec {
            default_answer: default_answer.map(ToString::to_string),
            allow_empty: false,
            valid_answers: vec![ValidAnswer::pattern(YES_NO_PATTERN)?],
        };

        let answer = self.prompt(question, &spec, &[], None)?;
        Ok(!answer.starts_with(['n', 'N']))
    }

    /// Like [`Prompter::prompt`] with echo disabled for the read. A newline
    /// is written afterwards on every path.
    pub fn secure(&mut self, question: &str, spec: &PromptSpec) -> Result<String> {
        let answer = {
            let _echo = EchoGuard::disable();
            self.prompt(question, spec, &[], None)
        };

        let newline = self.reader.newline();
        let answer = answer?;
        newline?;
        Ok(answer)
    }

    /// Like [`Prompter::prompt`] but completes filesystem paths, without
    /// appending anything after a unique match.
    pub fn path(&mut self, question: &str, spec: &PromptSpec) -> Result<String> {
        let _append = AppendCharacterGuard::set(None);
        self.prompt(question, spec, &[], Some(Arc::new(FilesystemCompleter)))
    }
}

/// [`Prompter::prompt`] on the terminal.
pub fn prompt(
    question: &str,
    spec: &PromptSpec,
    wordlist: &[&str],
    completer: Option<SharedCompleter>,
) -> Result<String> {
    Prompter::terminal().prompt(question, spec, wordlist, completer)
}

/// [`Prompter::yes_no`] on the terminal.
pub fn prompt_yes_no(question: &str, default_answer: Option<&str>) -> Result<bool> {
    Prompter::terminal().yes_no(question, default_answer)
}

/// [`Prompter::secure`] on the terminal.
pub fn prompt_secure(question: &str, spec: &PromptSpec) -> Result<String> {
    Prompter::terminal().secure(question, spec)
}

/// [`Prompter::path`] on the terminal.
pub fn prompt_path(question: &str, spec: &PromptSpec) -> Result<String> {
    Prompter::terminal().path(question, spec)
}

#[cfg(test)]
mod tests {
    use std::fs::File;

    use super::*;
    use crate::ui::{
        editor::{self, test_lock},
        reader::ScriptedReader,
    };

    fn scripted(answers: &[&str]) -> Prompter<ScriptedReader> {
        Prompter::new(ScriptedReader::new(answers.iter().copied()))
    }

    #[test]
    fn test_question_formatting() {
        let spec = PromptSpec::builder().default_answer(" y ").build();
        assert_eq!(spec.question("  Continue?  "), "Continue? [y]> ");

        let spec = PromptSpec::default();
        assert_eq!(spec.question("Name"), "Name> ");

        let spec = PromptSpec::builder().default_answer("").build();
        assert_eq!(spec.question("Name"), "Name> ");
    }

    #[test]
    fn test_evaluate_policy() {
        let spec = PromptSpec::default();
        assert_eq!(spec.evaluate("hello").as_deref(), Some("hello"));
        assert_eq!(spec.evaluate(""), None);

        let spec = PromptSpec::builder().allow_empty(true).build();
        assert_eq!(spec.evaluate("").as_deref(), Some(""));

        let spec = PromptSpec::builder().default_answer("fallback").build();
        assert_eq!(spec.evaluate("").as_deref(), Some("fallback"));
        assert_eq!(spec.evaluate("given").as_deref(), Some("given"));
    }

    #[test]
    fn test_default_answer_must_still_be_valid() {
        let spec = PromptSpec::builder()
            .default_answer("maybe")
            .valid_answers(vec!["yes".into(), "no".into()])
            .build();
        assert_eq!(spec.evaluate(""), None);
    }

    #[test]
    fn test_literal_answers_are_exact() {
        let literal = ValidAnswer::from("a.c");
        assert!(literal.matches("a.c"));
        assert!(!literal.matches("abc"));
        assert!(!literal.matches("a.cd"));
        assert!(!literal.matches("xa.c"));
    }

    #[test]
    fn test_pattern_answers_search() {
        let pattern = ValidAnswer::pattern("[0-9]+").unwrap();
        assert!(pattern.matches("abc123"));
        assert!(!pattern.matches("abc"));

        assert!(matches!(
            ValidAnswer::pattern("("),
            Err(GlitterError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_prompt_reasks_until_valid() {
        let _lock = test_lock();
        let spec = PromptSpec::builder()
            .valid_answers(vec!["red".into(), "blue".into()])
            .build();
        let mut prompter = scripted(&["", "green", "Red", "blue"]);

        let answer = prompter.prompt("Color", &spec, &[], None).unwrap();

        assert_eq!(answer, "blue");
        let reader = prompter.into_inner();
        assert_eq!(reader.transcript().len(), 4);
        assert!(reader.transcript().iter().all(|r| r.prompt == "Color> "));
    }

    #[test]
    fn test_prompt_accepts_empty_when_allowed() {
        let _lock = test_lock();
        let spec = PromptSpec::builder().allow_empty(true).build();
        let mut prompter = scripted(&[""]);

        assert_eq!(prompter.prompt("Notes", &spec, &[], None).unwrap(), "");
    }

    #[test]
    fn test_prompt_fails_when_input_closes() {
        let _lock = test_lock();
        let mut prompter = scripted(&["", ""]);

        let err = prompter
            .prompt("Name", &PromptSpec::default(), &[], None)
            .unwrap_err();
        assert!(matches!(err, GlitterError::InputClosed));
    }

    #[test]
    fn test_yes_no() {
        let _lock = test_lock();

        assert!(scripted(&["y"]).yes_no("Continue?", None).unwrap());
        assert!(!scripted(&["n"]).yes_no("Continue?", None).unwrap());
        assert!(scripted(&[""]).yes_no("Continue?", Some("y")).unwrap());
        assert!(!scripted(&[""]).yes_no("Continue?", Some("n")).unwrap());
        assert!(scripted(&["YES"]).yes_no("Continue?", None).unwrap());
        assert!(!scripted(&["Nope"]).yes_no("Continue?", None).unwrap());
        assert!(!scripted(&["maybe", "", "no"]).yes_no("Continue?", None).unwrap());
    }

    #[test]
    fn test_wordlist_completion_is_scoped_to_the_read() {
        let _lock = test_lock();
        let reader = ScriptedReader::new(["apple"]).with_completion_probe("ap");
        let mut prompter = Prompter::new(reader);

        prompter
            .prompt(
                "Fruit",
                &PromptSpec::default(),
                &["apple", "apricot", "banana"],
                None,
            )
            .unwrap();

        let record = prompter.reader().transcript().first().unwrap().clone();
        assert_eq!(record.completions, vec!["apple", "apricot"]);
        assert!(editor::completion_provider().is_none());
    }

    #[test]
    fn test_custom_completer_replaces_wordlist() {
        let _lock = test_lock();
        let reader = ScriptedReader::new(["x"]).with_completion_probe("ap");
        let mut prompter = Prompter::new(reader);
        let custom: SharedCompleter = Arc::new(|word: &str| vec![format!("{word}!")]);

        prompter
            .prompt("Fruit", &PromptSpec::default(), &["apple"], Some(custom))
            .unwrap();

        let record = prompter.reader().transcript().first().unwrap().clone();
        assert_eq!(record.completions, vec!["ap!"]);
    }

    #[test]
    fn test_nested_provider_survives_prompt() {
        let _lock = test_lock();
        let _outer = CompletionGuard::install(Arc::new(WordList::new(["outer"])));

        let mut prompter = scripted(&["ok"]);
        prompter
            .prompt("Q", &PromptSpec::default(), &["inner"], None)
            .unwrap();

        assert_eq!(editor::complete(""), vec!["outer"]);
    }

    #[test]
    fn test_interrupt_propagates_and_restores_state() {
        let _lock = test_lock();
        let reader = ScriptedReader::new(["", ""]).interrupt_when_exhausted();
        let mut prompter = Prompter::new(reader);

        let err = prompter
            .secure("Password", &PromptSpec::default())
            .unwrap_err();

        assert!(matches!(err, GlitterError::Interrupted));
        assert!(editor::echo_enabled());
        assert!(editor::completion_provider().is_none());
        assert_eq!(prompter.reader().newlines(), 1);
    }

    #[test]
    fn test_secure_disables_echo_during_read() {
        let _lock = test_lock();
        let mut prompter = scripted(&["hunter2"]);

        let answer = prompter.secure("Password", &PromptSpec::default()).unwrap();

        assert_eq!(answer, "hunter2");
        let reader = prompter.into_inner();
        assert!(reader.transcript().iter().all(|r| !r.echo));
        assert_eq!(reader.newlines(), 1);
        assert!(editor::echo_enabled());
    }

    #[test]
    fn test_path_completes_filesystem_without_append() {
        let _lock = test_lock();
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("notes.md")).unwrap();
        File::create(dir.path().join("other.md")).unwrap();

        let probe = format!("{}/no", dir.path().display());
        let reader = ScriptedReader::new(["/tmp"]).with_completion_probe(probe);
        let mut prompter = Prompter::new(reader);
        let before = editor::append_character();

        let answer = prompter.path("File", &PromptSpec::default()).unwrap();

        assert_eq!(answer, "/tmp");
        let record = prompter.reader().transcript().first().unwrap().clone();
        assert_eq!(
            record.completions,
            vec![format!("{}/notes.md", dir.path().display())]
        );
        assert_eq!(record.append_character, None);
        assert_eq!(editor::append_character(), before);
    }

    #[test]
    fn test_path_restores_append_character_when_interrupted() {
        let _lock = test_lock();
        let _previous = AppendCharacterGuard::set(Some('/'));
        let reader = ScriptedReader::new(Vec::<String>::new()).interrupt_when_exhausted();
        let mut prompter = Prompter::new(reader);

        let result = prompter.path("File", &PromptSpec::default());

        assert!(matches!(result, Err(GlitterError::Interrupted)));
        let record = prompter.reader().transcript().first().unwrap().clone();
        assert_eq!(record.append_character, None);
        assert_eq!(editor::append_character(), Some('/'));
    }
}
