//! Inline activity indicator shown while a unit of work runs.
//!
//! The work runs on the calling thread while a scoped thread animates the
//! status line. The outcome is handed over through a one-shot channel; the
//! animation renders the final `ok`/`fail` line before the call returns.

use std::{
    io::{self, Stdout, Write},
    sync::mpsc::{self, RecvTimeoutError},
    thread,
    time::Duration,
};

use log::{debug, warn};

use crate::{ansi::Style, escape::Escape};

/// Delay between animation frames.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(500);

const FRAMES: [&str; 8] = [
    "    ", ".   ", "..  ", "... ", "....", " ...", "  ..", "   .",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Success,
    Failure,
}

struct Decoration {
    pre: String,
    post: String,
    ok: String,
    fail: String,
}

impl Decoration {
    fn new(escape: Escape, message: &str) -> Self {
        let sgr = |style: Style| escape.sgr(style.code());
        let (bold, white, reset) = (sgr(Style::Bold), sgr(Style::White), sgr(Style::Reset));

        let post = format!("{bold}{white}] {reset}{message}");
        Self {
            pre: format!("\r{bold}{white} [{reset}"),
            ok: format!("\r{bold}{white} [{} ok {post}\n", sgr(Style::Green)),
            fail: format!("\r{bold}{white} [{}fail{post}\n", sgr(Style::Red)),
            post,
        }
    }
}

/// Animates a status line until a unit of work finishes.
pub struct Spinner<W = Stdout> {
    message: String,
    interval: Duration,
    escape: Escape,
    writer: W,
}

impl Spinner<Stdout> {
    #[must_use]
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
            interval: DEFAULT_INTERVAL,
            escape: Escape::current(),
            writer: io::stdout(),
        }
    }
}

impl<W> Spinner<W>
where
    W: Write + Send,
{
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    #[must_use]
    pub fn with_escape(mut self, escape: Escape) -> Self {
        self.escape = escape;
        self
    }

    #[must_use]
    pub fn with_writer<NewW>(self, writer: NewW) -> Spinner<NewW>
    where
        NewW: Write + Send,
    {
        Spinner {
            message: self.message,
            interval: self.interval,
            escape: self.escape,
            writer,
        }
    }

    /// Runs `work` while the spinner animates, then prints `ok` or `fail`.
    ///
    /// The work's result is returned unchanged, and only after the final
    /// status line has been written. A panic inside `work` is shown as a
    /// failure before it resumes unwinding.
    pub fn run<T, E, F>(self, work: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let Self {
            message,
            interval,
            escape,
            mut writer,
        } = self;
        let decoration = Decoration::new(escape, &message);

        thread::scope(|scope| {
            let (done, outcome) = mpsc::channel::<Outcome>();

            let animation = scope.spawn(move || {
                if let Err(e) = animate(&mut writer, &decoration, interval, &outcome) {
                    warn!("spinner output failed: {e}");
                }
            });

            let result = work();
            let finished = if result.is_ok() {
                Outcome::Success
            } else {
                Outcome::Failure
            };
            // The animation only stops listening after it has seen an outcome.
            let _ = done.send(finished);

            if animation.join().is_err() {
                warn!("spinner animation thread panicked");
            }
            result
        })
    }
}

fn animate<W: Write>(
    writer: &mut W,
    decoration: &Decoration,
    interval: Duration,
    outcome: &mpsc::Receiver<Outcome>,
) -> io::Result<()> {
    let mut step = 0usize;

    let finished = loop {
        let frame = FRAMES.get(step % FRAMES.len()).copied().unwrap_or_default();
        write!(writer, "{}{frame}{}", decoration.pre, decoration.post)?;
        writer.flush()?;
        step = step.wrapping_add(1);

        match outcome.recv_timeout(interval) {
            Ok(outcome) => break outcome,
            Err(RecvTimeoutError::Timeout) => {}
            // The sender is gone without a verdict: the work panicked.
            Err(RecvTimeoutError::Disconnected) => break Outcome::Failure,
        }
    };

    debug!("spinner finished after {step} frames: {finished:?}");
    let line = match finished {
        Outcome::Success => &decoration.ok,
        Outcome::Failure => &decoration.fail,
    };
    writer.write_all(line.as_bytes())?;
    writer.flush()
}

/// Runs `work` behind a spinner on stdout. See [`Spinner::run`].
pub fn spinner<T, E, F>(message: &str, work: F) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E>,
{
    Spinner::new(message).run(work)
}

#[cfg(test)]
mod tests {
    use std::panic::{self, AssertUnwindSafe};

    use super::*;

    fn fast(message: &str) -> Spinner<Stdout> {
        Spinner::new(message)
            .with_interval(Duration::from_millis(5))
            .with_escape(Escape::DISABLED)
    }

    #[test]
    fn test_success_returns_value_and_prints_ok_last() {
        let mut out = Vec::new();

        let result: Result<u32, String> = fast("Working").with_writer(&mut out).run(|| {
            thread::sleep(Duration::from_millis(30));
            Ok(42)
        });

        assert_eq!(result, Ok(42));
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with("\r [ ok ] Working\n"), "{text:?}");
        assert_eq!(text.matches('\n').count(), 1);
        assert!(text.starts_with("\r [    ] Working"));
    }

    #[test]
    fn test_failure_is_propagated_unchanged() {
        #[derive(Debug, PartialEq)]
        struct Boom(&'static str);

        let mut out = Vec::new();
        let result: Result<(), Boom> = fast("Deploying")
            .with_writer(&mut out)
            .run(|| Err(Boom("disk full")));

        assert_eq!(result, Err(Boom("disk full")));
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with("\r [fail] Deploying\n"), "{text:?}");
    }

    #[test]
    fn test_error_identity_survives() {
        let mut out = Vec::new();
        let original = std::io::Error::other("connection reset");
        let message = original.to_string();

        let err = fast("Fetching")
            .with_writer(&mut out)
            .run(|| Err::<(), _>(original))
            .unwrap_err();

        assert_eq!(err.kind(), std::io::ErrorKind::Other);
        assert_eq!(err.to_string(), message);
    }

    #[test]
    fn test_frames_cycle_while_work_runs() {
        let mut out = Vec::new();

        fast("Waiting")
            .with_writer(&mut out)
            .run(|| {
                thread::sleep(Duration::from_millis(100));
                Ok::<_, ()>(())
            })
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\r [.   ] Waiting"));
        assert!(text.contains("\r [..  ] Waiting"));
    }

    #[test]
    fn test_decoration_is_styled_when_enabled() {
        let decoration = Decoration::new(Escape::ENABLED, "msg");

        assert_eq!(decoration.pre, "\r\x1b[1m\x1b[37m [\x1b[0m");
        assert_eq!(decoration.post, "\x1b[1m\x1b[37m] \x1b[0mmsg");
        assert!(decoration.ok.contains("\x1b[32m ok "));
        assert!(decoration.fail.contains("\x1b[31mfail"));
    }

    #[test]
    fn test_panicking_work_still_renders_failure() {
        let mut out = Vec::new();

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            fast("Exploding")
                .with_writer(&mut out)
                .run(|| -> Result<(), ()> { panic!("boom") })
        }));

        assert!(result.is_err());
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with("\r [fail] Exploding\n"), "{text:?}");
    }
}
