use crate::practice::evaluator::Key;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(25);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input
{
    Key(Key),
    Quit,
}

/// Maps a terminal key event onto practice input. Only single printable
/// characters count as typing; Esc and Ctrl+C leave the view.
pub fn translate(event: KeyEvent) -> Option<Input>
{
    if event.kind == KeyEventKind::Release {
        return None;
    }
    let input = match event.code {
        KeyCode::Esc => Input::Quit,
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => Input::Quit,
        KeyCode::Backspace => Input::Key(Key::Backspace),
        KeyCode::Char(ch)
            if !event
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
                && !ch.is_control() =>
        {
            Input::Key(Key::Char(ch))
        }
        _ => Input::Key(Key::Other),
    };
    Some(input)
}

/// Reads terminal events on a background thread and hands them to the view
/// through a channel. Lives exactly as long as the view; dropping it stops
/// and joins the reader.
pub struct KeyListener
{
    receiver: Receiver<Input>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl KeyListener
{
    pub fn spawn() -> Self
    {
        let (sender, receiver) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let handle = thread::spawn(move || read_loop(sender, flag));
        Self {
            receiver,
            stop,
            handle: Some(handle),
        }
    }

    /// Waits up to `timeout` for the next input. `Ok(None)` on timeout;
    /// `Err` once the reader has gone away.
    pub fn next(&self, timeout: Duration) -> Result<Option<Input>, RecvTimeoutError>
    {
        match self.receiver.recv_timeout(timeout) {
            Ok(input) => Ok(Some(input)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Inputs already queued, without waiting.
    pub fn drain(&self) -> Vec<Input>
    {
        self.receiver.try_iter().collect()
    }
}

impl Drop for KeyListener
{
    fn drop(&mut self)
    {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        debug!("key listener stopped");
    }
}

fn read_loop(sender: Sender<Input>, stop: Arc<AtomicBool>)
{
    while !stop.load(Ordering::Relaxed) {
        match event::poll(POLL_INTERVAL) {
            Ok(false) => continue,
            Ok(true) => {}
            Err(err) => {
                warn!(error = %err, "terminal event poll failed");
                break;
            }
        }
        let event = match event::read() {
            Ok(event) => event,
            Err(err) => {
                warn!(error = %err, "terminal event read failed");
                break;
            }
        };
        if let Event::Key(key) = event {
            if let Some(input) = translate(key) {
                if sender.send(input).is_err() {
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent
    {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn printable_chars_are_typing_input()
    {
        assert_eq!(
            translate(press(KeyCode::Char('a'), KeyModifiers::NONE)),
            Some(Input::Key(Key::Char('a')))
        );
        assert_eq!(
            translate(press(KeyCode::Char('A'), KeyModifiers::SHIFT)),
            Some(Input::Key(Key::Char('A')))
        );
        assert_eq!(
            translate(press(KeyCode::Char(' '), KeyModifiers::NONE)),
            Some(Input::Key(Key::Char(' ')))
        );
    }

    #[test]
    fn escape_and_ctrl_c_quit()
    {
        assert_eq!(translate(press(KeyCode::Esc, KeyModifiers::NONE)), Some(Input::Quit));
        assert_eq!(
            translate(press(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Input::Quit)
        );
    }

    #[test]
    fn named_and_modified_keys_are_other()
    {
        for event in [
            press(KeyCode::F(5), KeyModifiers::NONE),
            press(KeyCode::Left, KeyModifiers::NONE),
            press(KeyCode::Tab, KeyModifiers::NONE),
            press(KeyCode::Char('s'), KeyModifiers::CONTROL),
            press(KeyCode::Char('x'), KeyModifiers::ALT),
        ] {
            assert_eq!(translate(event), Some(Input::Key(Key::Other)));
        }
    }

    #[test]
    fn backspace_and_release_events()
    {
        assert_eq!(
            translate(press(KeyCode::Backspace, KeyModifiers::NONE)),
            Some(Input::Key(Key::Backspace))
        );
        let mut release = press(KeyCode::Char('a'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(translate(release), None);
    }
}
