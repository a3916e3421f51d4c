//! Blocking line input.
//!
//! [`LineReader`] is the seam between the prompt loop and the terminal. The
//! terminal implementation edits the line in raw mode and consults the
//! process-wide editor state for completion and echo; the scripted one feeds
//! canned answers and records what the editor state looked like at each read.

use std::{
    collections::VecDeque,
    io::{self, BufRead, IsTerminal, Write},
};

use crossterm::{
    cursor::MoveToColumn,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    queue,
    style::Print,
    terminal::{self, Clear, ClearType, disable_raw_mode, enable_raw_mode},
};
use log::debug;
use tui_input::{Input, backend::crossterm::EventHandler};

use super::editor;
use crate::error::{GlitterError, Result};

/// Reads one line of user input.
pub trait LineReader {
    /// Shows `prompt` and blocks until a line is submitted. The returned line
    /// has no trailing newline.
    fn read_line(&mut self, prompt: &str) -> Result<String>;

    /// Ends the current output line. Used after reads whose Enter key was
    /// not echoed.
    fn newline(&mut self) -> Result<()>;
}

impl<R: LineReader + ?Sized> LineReader for &mut R {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        (**self).read_line(prompt)
    }

    fn newline(&mut self) -> Result<()> {
        (**self).newline()
    }
}

/// Restores cooked mode on drop.
struct RawMode;

impl RawMode {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// Reads from the controlling terminal, or plain stdin when it is not a tty.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalReader;

impl TerminalReader {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn read_piped(prompt: &str) -> Result<String> {
        let mut stdout = io::stdout();
        write!(stdout, "{prompt}")?;
        stdout.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(GlitterError::InputClosed);
        }

        let trimmed = line.trim_end_matches(['\n', '\r']);
        Ok(trimmed.to_string())
    }

    fn read_interactive(prompt: &str) -> Result<String> {
        let _raw = RawMode::enable()?;
        let mut stdout = io::stdout();
        let mut input = Input::default();

        render(&mut stdout, prompt, &input, terminal_width())?;

        loop {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }

            match key.code {
                KeyCode::Enter => {
                    end_line(&mut stdout)?;
                    return Ok(input.value().to_string());
                }
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    end_line(&mut stdout)?;
                    return Err(GlitterError::Interrupted);
                }
                KeyCode::Char('d')
                    if key.modifiers.contains(KeyModifiers::CONTROL)
                        && input.value().is_empty() =>
                {
                    end_line(&mut stdout)?;
                    return Err(GlitterError::InputClosed);
                }
                KeyCode::Tab => {
                    // Completing would reveal hidden input.
                    if editor::echo_enabled()
                        && let Some(completed) = complete_at_cursor(&mut stdout, &input)?
                    {
                        input = completed;
                    }
                }
                _ => {
                    input.handle_event(&Event::Key(key));
                }
            }

            render(&mut stdout, prompt, &input, terminal_width())?;
        }
    }
}

impl LineReader for TerminalReader {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        if io::stdin().is_terminal() {
            Self::read_interactive(prompt)
        } else {
            Self::read_piped(prompt)
        }
    }

    fn newline(&mut self) -> Result<()> {
        let mut stdout = io::stdout();
        writeln!(stdout)?;
        stdout.flush()?;
        Ok(())
    }
}

fn terminal_width() -> usize {
    terminal::size().map_or(80, |(columns, _)| usize::from(columns))
}

/// Ends the line the reader was editing. Hidden reads leave this to the
/// caller, which writes the newline on every path.
fn end_line<W: Write>(out: &mut W) -> io::Result<()> {
    if editor::echo_enabled() {
        queue!(out, Print("\r\n"))?;
    }
    out.flush()
}

/// Draws the prompt and the visible part of the input on the current row.
/// Input wider than the space left after the prompt scrolls horizontally so
/// the line never wraps.
fn render<W: Write>(out: &mut W, prompt: &str, input: &Input, width: usize) -> io::Result<()> {
    queue!(
        out,
        MoveToColumn(0),
        Clear(ClearType::CurrentLine),
        Print(prompt)
    )?;

    if editor::echo_enabled() {
        let prompt_width = prompt.chars().count();
        let available = width.saturating_sub(prompt_width).saturating_sub(1).max(1);
        let scroll = calculate_scroll(input.cursor(), available);
        let visible: String = input.value().chars().skip(scroll).take(available).collect();
        let column = prompt_width
            .saturating_add(input.cursor())
            .saturating_sub(scroll);
        queue!(
            out,
            Print(visible),
            MoveToColumn(u16::try_from(column).unwrap_or(u16::MAX))
        )?;
    }

    out.flush()
}

fn calculate_scroll(cursor: usize, width: usize) -> usize {
    if cursor >= width {
        cursor.saturating_sub(width).saturating_add(1)
    } else {
        0
    }
}

/// Completes the word before the cursor. Returns the edited input, or `None`
/// when nothing changed.
///
/// A unique match gets the append character unless the text after the cursor
/// already starts with it, in which case the cursor steps over it instead.
fn complete_at_cursor<W: Write>(out: &mut W, input: &Input) -> io::Result<Option<Input>> {
    let value = input.value();
    let byte_cursor = value
        .char_indices()
        .nth(input.cursor())
        .map_or(value.len(), |(i, _)| i);
    let (head, tail) = value.split_at(byte_cursor);

    let word_start = head
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map_or(0, |(i, c)| i.saturating_add(c.len_utf8()));
    let (before, word) = head.split_at(word_start);

    let candidates = editor::complete(word);
    debug!("{} completion candidates for {word:?}", candidates.len());

    let (replacement, step_over) = match candidates.as_slice() {
        [] => return Ok(None),
        [only] => match editor::append_character() {
            Some(append) if tail.starts_with(append) => (only.clone(), 1),
            Some(append) => (format!("{only}{append}"), 0),
            None => (only.clone(), 0),
        },
        many => {
            let common = longest_common_prefix(many);
            if common.len() > word.len() {
                (common.to_string(), 0)
            } else {
                queue!(out, Print("\r\n"), Print(many.join("  ")), Print("\r\n"))?;
                return Ok(None);
            }
        }
    };

    let edited = format!("{before}{replacement}");
    let cursor = edited.chars().count().saturating_add(step_over);
    Ok(Some(Input::new(format!("{edited}{tail}")).with_cursor(cursor)))
}

fn longest_common_prefix(words: &[String]) -> &str {
    let Some((first, rest)) = words.split_first() else {
        return "";
    };

    let mut end = first.len();
    for word in rest {
        end = first
            .char_indices()
            .zip(word.chars())
            .find(|((_, a), b)| a != b)
            .map_or_else(|| first.len().min(word.len()), |((i, _), _)| i)
            .min(end);
    }

    first.get(..end).unwrap_or_default()
}

/// What the editor state looked like during one scripted read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadRecord {
    pub prompt: String,
    pub echo: bool,
    pub append_character: Option<char>,
    /// Candidates offered for the probe word, if one was configured.
    pub completions: Vec<String>,
}

/// Replays a fixed sequence of answers.
///
/// Once the answers run out the reader fails with [`GlitterError::InputClosed`]
/// (or [`GlitterError::Interrupted`] when configured), so a prompt that keeps
/// rejecting input terminates instead of looping forever.
#[derive(Debug, Default)]
pub struct ScriptedReader {
    answers: VecDeque<String>,
    interrupt_when_exhausted: bool,
    probe: Option<String>,
    transcript: Vec<ReadRecord>,
    newlines: usize,
}

impl ScriptedReader {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Simulates Ctrl+C after the last answer.
    #[must_use]
    pub fn interrupt_when_exhausted(mut self) -> Self {
        self.interrupt_when_exhausted = true;
        self
    }

    /// Asks the active completion provider for `word` on every read.
    #[must_use]
    pub fn with_completion_probe<S: Into<String>>(mut self, word: S) -> Self {
        self.probe = Some(word.into());
        self
    }

    #[must_use]
    pub fn transcript(&self) -> &[ReadRecord] {
        &self.transcript
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    /// Number of line endings written outside of reads.
    #[must_use]
    pub fn newlines(&self) -> usize {
        self.newlines
    }
}

impl LineReader for ScriptedReader {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        self.transcript.push(ReadRecord {
            prompt: prompt.to_string(),
            echo: editor::echo_enabled(),
            append_character: editor::append_character(),
            completions: self
                .probe
                .as_deref()
                .map(editor::complete)
                .unwrap_or_default(),
        });

        match self.answers.pop_front() {
            Some(answer) => Ok(answer),
            None if self.interrupt_when_exhausted => Err(GlitterError::Interrupted),
            None => Err(GlitterError::InputClosed),
        }
    }

    fn newline(&mut self) -> Result<()> {
        self.newlines = self.newlines.saturating_add(1);
        Ok(())
    }
}
