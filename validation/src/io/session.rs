//! Interactive session: settings, field text, and the event loop.
//!
//! The session owns everything the interactive front end needs across its
//! lifetime. Events are consumed one at a time from an [`EventSource`]; each
//! performs at most one state transition and at most one write.

use std::io::Write;

use anyhow::{Context, Result};
use tracing::{debug, info, instrument, warn};

use crate::core::args::Settings;
use crate::core::interactive::{Action, Event, State, transition};
use crate::io::console::Console;
use crate::io::write::{WriteOutcome, write_request};

/// Blocking source of window events.
pub trait EventSource {
    /// Wait for the next event. Sources that run dry report [`Event::Close`].
    ///
    /// An error here ends the loop as if the window had been closed.
    fn next_event(&mut self) -> Result<Event>;

    /// Called after an edit so the window can redraw the field.
    fn field_changed(&mut self, _text: &[u8]) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug)]
pub struct Session {
    settings: Settings,
    field: Vec<u8>,
    state: State,
}

impl Session {
    /// New session with the field pre-filled from the resolved message.
    pub fn new(settings: Settings) -> Self {
        let field = settings.message.clone();
        Self {
            settings,
            field,
            state: State::Uninitialized,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn field(&self) -> &[u8] {
        &self.field
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Apply one event. Returns the write outcome if this event terminated
    /// the session.
    pub fn dispatch<W: Write>(
        &mut self,
        event: &Event,
        console: &mut Console<W>,
    ) -> Result<Option<WriteOutcome>> {
        let (next, action) = transition(self.state, event);
        debug!(from = ?self.state, to = ?next, ?action, "dispatch");
        self.state = next;
        match action {
            Action::None => Ok(None),
            Action::UpdateField => {
                if let Event::Edit(text) = event {
                    self.field = text.clone();
                }
                Ok(None)
            }
            Action::WriteAndExit => {
                match event {
                    Event::Trigger => console.line("INFO: Button clicked.")?,
                    Event::Close => console.line("INFO: Window closed.")?,
                    _ => {}
                }
                self.write_field(console).map(Some)
            }
        }
    }

    fn write_field<W: Write>(&self, console: &mut Console<W>) -> Result<WriteOutcome> {
        let output = self.settings.output.display();
        console.line(format_args!(
            "INFO: Attempting to write message to {output}"
        ))?;
        let outcome = write_request(&self.settings.request_with(&self.field));
        if outcome.succeeded {
            console.line(format_args!(
                "GUI SUCCESS: Wrote '{}'",
                String::from_utf8_lossy(&self.field)
            ))?;
        } else {
            console.line(format_args!("GUI FAILURE: Could not write to {output}"))?;
            if let Some(diagnostic) = &outcome.diagnostic {
                console.line(format_args!("DEBUG: {diagnostic}"))?;
            }
        }
        Ok(outcome)
    }
}

/// Pump events until the session terminates.
pub fn run_event_loop<S, W>(
    session: &mut Session,
    source: &mut S,
    console: &mut Console<W>,
) -> Result<WriteOutcome>
where
    S: EventSource,
    W: Write,
{
    loop {
        let event = match source.next_event() {
            Ok(event) => event,
            Err(err) => {
                warn!(error = %format!("{err:#}"), "window input failed; closing");
                Event::Close
            }
        };
        let edited = matches!(event, Event::Edit(_));
        if let Some(outcome) = session.dispatch(&event, console)? {
            return Ok(outcome);
        }
        if edited {
            source.field_changed(session.field())?;
        }
    }
}

/// Drive the interactive front end to its single write.
///
/// A positive timeout short-circuits straight to the write and
/// `open_window` is never called. Otherwise the window is opened, the loop
/// runs, and the write happens on trigger or close. The caller decides how
/// the process ends.
#[instrument(skip_all, fields(timeout_secs = settings.timeout_secs))]
pub fn run_interactive<S, W, F>(
    settings: Settings,
    console: &mut Console<W>,
    open_window: F,
) -> Result<WriteOutcome>
where
    S: EventSource,
    W: Write,
    F: FnOnce(&[u8]) -> Result<S>,
{
    console.line(format_args!(
        "INFO: App started. Timeout={}",
        settings.timeout_secs
    ))?;
    let mut session = Session::new(settings);

    if session.settings().timeout_secs > 0 {
        console.line("INFO: Non-interactive mode detected due to timeout.")?;
        info!("timeout short-circuit");
        return session
            .dispatch(&Event::TimeoutElapsed, console)?
            .context("timeout did not trigger a write");
    }

    let mut window = open_window(session.field()).context("create window")?;
    session.dispatch(&Event::WindowCreated, console)?;
    console.line("INFO: Window shown.")?;
    console.line("INFO: Entering standard message loop.")?;
    run_event_loop(&mut session, &mut window, console)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedEvents;
    use std::fs;
    use std::path::Path;

    fn settings(output: &Path, timeout_secs: u64) -> Settings {
        Settings {
            message: b"prefilled".to_vec(),
            output: output.to_path_buf(),
            timeout_secs,
        }
    }

    fn console_text(console: Console<Vec<u8>>) -> String {
        String::from_utf8(console.into_inner()).expect("utf8")
    }

    #[test]
    fn trigger_writes_edited_field() {
        let temp = tempfile::tempdir().expect("tempdir");
        let out = temp.path().join("gui.txt");
        let mut console = Console::new(Vec::new());

        let outcome = run_interactive(settings(&out, 0), &mut console, |_| {
            Ok(ScriptedEvents::new(vec![
                Event::Edit(b"edited".to_vec()),
                Event::Trigger,
            ]))
        })
        .expect("run");

        assert!(outcome.succeeded);
        assert_eq!(fs::read_to_string(&out).expect("read"), "edited\n");
        let text = console_text(console);
        assert!(text.contains("INFO: Button clicked."));
        assert!(text.contains("GUI SUCCESS: Wrote 'edited'"));
    }

    #[test]
    fn close_writes_prefilled_field() {
        let temp = tempfile::tempdir().expect("tempdir");
        let out = temp.path().join("gui.txt");
        let mut console = Console::new(Vec::new());

        let outcome = run_interactive(settings(&out, 0), &mut console, |field| {
            assert_eq!(field, b"prefilled");
            Ok(ScriptedEvents::new(vec![Event::Close]))
        })
        .expect("run");

        assert!(outcome.succeeded);
        assert_eq!(fs::read_to_string(&out).expect("read"), "prefilled\n");
    }

    #[test]
    fn timeout_never_opens_window() {
        let temp = tempfile::tempdir().expect("tempdir");
        let out = temp.path().join("gui.txt");
        let mut console = Console::new(Vec::new());

        let outcome = run_interactive::<ScriptedEvents, _, _>(
            settings(&out, 3),
            &mut console,
            |_| panic!("window must not be created"),
        )
        .expect("run");

        assert!(outcome.succeeded);
        assert_eq!(fs::read_to_string(&out).expect("read"), "prefilled\n");
        let text = console_text(console);
        assert!(text.contains("Non-interactive mode"));
        assert!(!text.contains("Window shown"));
    }

    #[test]
    fn window_failure_is_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let out = temp.path().join("gui.txt");
        let mut console = Console::new(Vec::new());

        let result = run_interactive::<ScriptedEvents, _, _>(
            settings(&out, 0),
            &mut console,
            |_| Err(anyhow::anyhow!("no display")),
        );

        let err = result.expect_err("window failure");
        assert!(format!("{err:#}").contains("no display"));
        assert!(!out.exists());
    }

    #[test]
    fn write_failure_reports_diagnostic() {
        let temp = tempfile::tempdir().expect("tempdir");
        let out = temp.path().join("missing").join("gui.txt");
        let mut console = Console::new(Vec::new());

        let outcome = run_interactive(settings(&out, 0), &mut console, |_| {
            Ok(ScriptedEvents::new(vec![Event::Trigger]))
        })
        .expect("run");

        assert!(!outcome.succeeded);
        let text = console_text(console);
        assert!(text.contains("GUI FAILURE: Could not write to"));
        assert!(text.contains("DEBUG: "));
    }

    #[test]
    fn exactly_one_write_then_absorbing() {
        let temp = tempfile::tempdir().expect("tempdir");
        let out = temp.path().join("gui.txt");
        let mut console = Console::new(Vec::new());
        let mut session = Session::new(settings(&out, 0));

        assert!(
            session
                .dispatch(&Event::WindowCreated, &mut console)
                .expect("create")
                .is_none()
        );
        assert!(
            session
                .dispatch(&Event::Trigger, &mut console)
                .expect("trigger")
                .is_some()
        );
        assert_eq!(session.state(), State::Terminating);

        fs::remove_file(&out).expect("remove");
        assert!(
            session
                .dispatch(&Event::Close, &mut console)
                .expect("close")
                .is_none()
        );
        assert!(!out.exists());
    }

    #[test]
    fn exhausted_source_closes() {
        let temp = tempfile::tempdir().expect("tempdir");
        let out = temp.path().join("gui.txt");
        let mut console = Console::new(Vec::new());

        let outcome = run_interactive(settings(&out, 0), &mut console, |_| {
            Ok(ScriptedEvents::new(vec![Event::Edit(b"last".to_vec())]))
        })
        .expect("run");

        assert!(outcome.succeeded);
        assert_eq!(fs::read_to_string(&out).expect("read"), "last\n");
        assert!(console_text(console).contains("INFO: Window closed."));
    }

    #[test]
    fn edits_are_redrawn_before_trigger() {
        let temp = tempfile::tempdir().expect("tempdir");
        let out = temp.path().join("gui.txt");
        let mut console = Console::new(Vec::new());
        let mut session = Session::new(settings(&out, 0));
        session
            .dispatch(&Event::WindowCreated, &mut console)
            .expect("create");
        let mut source = ScriptedEvents::new(vec![
            Event::Edit(b"one".to_vec()),
            Event::Edit(b"two".to_vec()),
            Event::Trigger,
        ]);

        let outcome = run_event_loop(&mut session, &mut source, &mut console).expect("loop");

        assert!(outcome.succeeded);
        assert_eq!(source.redraws, vec![b"one".to_vec(), b"two".to_vec()]);
        assert_eq!(session.field(), b"two");
    }

    struct BrokenInput {
        reads: usize,
    }

    impl EventSource for BrokenInput {
        fn next_event(&mut self) -> Result<Event> {
            self.reads += 1;
            match self.reads {
                1 => Ok(Event::Edit(b"caf\xe9".to_vec())),
                _ => Err(anyhow::anyhow!("stream did not contain valid UTF-8")),
            }
        }
    }

    #[test]
    fn input_error_closes_and_still_writes() {
        let temp = tempfile::tempdir().expect("tempdir");
        let out = temp.path().join("gui.txt");
        let mut console = Console::new(Vec::new());

        let outcome = run_interactive(settings(&out, 0), &mut console, |_| {
            Ok(BrokenInput { reads: 0 })
        })
        .expect("run");

        assert!(outcome.succeeded);
        assert_eq!(fs::read(&out).expect("read"), b"caf\xe9\n");
        let text = String::from_utf8_lossy(&console.into_inner()).into_owned();
        assert!(text.contains("INFO: Window closed."));
        assert!(text.contains("GUI SUCCESS: Wrote 'caf\u{fffd}'"));
    }
}
