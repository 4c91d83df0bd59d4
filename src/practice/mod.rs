pub mod evaluator;
pub mod input;
pub mod keyboard;
pub mod render;
pub mod session;
pub mod timer;

use crate::api::WordBackend;
use crate::error::AppError;
use crate::practice::evaluator::{Key, Outcome, Phase};
use crate::practice::input::{Input, KeyListener};
use crate::practice::session::{PracticeSession, SessionState};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};
use tracing::{info, warn};

const TICK: Duration = Duration::from_millis(33);

#[derive(Default)]
struct Stats
{
    keystrokes: u32,
    backspaces: u32,
}

struct TerminalGuard
{
    stdout: Stdout,
}

impl TerminalGuard
{
    /// Raw mode is switched back off if the alternate screen can't be entered.
    fn enter() -> io::Result<Self>
    {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        undo_on_error(execute!(stdout, EnterAlternateScreen, Hide), || {
            if let Err(err) = terminal::disable_raw_mode() {
                warn!(error = %err, "couldn't leave raw mode");
            }
        })?;
        Ok(Self { stdout })
    }

    fn stdout(&mut self) -> &mut Stdout
    {
        &mut self.stdout
    }
}

impl Drop for TerminalGuard
{
    fn drop(&mut self)
    {
        let _ = execute!(self.stdout, Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

fn undo_on_error<T>(result: io::Result<T>, undo: impl FnOnce()) -> io::Result<T>
{
    if result.is_err() {
        undo();
    }
    result
}

/// Returns `SessionExpired` without touching the terminal when the backend
/// rejects the token.
pub fn run(backend: &dyn WordBackend) -> Result<(), AppError>
{
    let mut rng = rand::thread_rng();
    let mut session = PracticeSession::new();

    println!("Loading words...");
    match session.start(backend, &mut rng) {
        SessionState::Failed => {
            println!("Couldn't load your words. Please try again later.");
            return Ok(());
        }
        SessionState::Unauthorized => return Err(AppError::SessionExpired),
        SessionState::Empty => {
            println!("No words found.");
            println!("Add some vocabulary first: vocab-typing words");
            return Ok(());
        }
        SessionState::Active => {}
    }
    info!(words = session.words().len(), "practice started");

    let start = Instant::now();
    let mut stats = Stats::default();
    {
        let mut term = TerminalGuard::enter()?;
        let listener = KeyListener::spawn();
        let result = practice_loop(&mut term, &listener, &mut session, &mut stats, &mut rng);
        session.shutdown();
        drop(listener);
        drop(term);
        result?;
    }

    print_summary(session.completed(), &stats, start.elapsed());
    info!(completed = session.completed(), "practice finished");
    Ok(())
}

fn practice_loop(
    term: &mut TerminalGuard,
    listener: &KeyListener,
    session: &mut PracticeSession,
    stats: &mut Stats,
    rng: &mut impl rand::Rng,
) -> Result<(), AppError>
{
    let mut dirty = true;
    loop {
        if session.tick(Instant::now(), rng) {
            dirty = true;
        }
        if dirty {
            draw_ui(term.stdout(), session)?;
            dirty = false;
        }

        let first = match listener.next(TICK) {
            Ok(Some(input)) => input,
            Ok(None) => continue,
            Err(_) => {
                warn!("key listener disconnected");
                return Ok(());
            }
        };

        for input in std::iter::once(first).chain(listener.drain()) {
            let key = match input {
                Input::Quit => return Ok(()),
                Input::Key(key) => key,
            };
            match key {
                Key::Char(_) => stats.keystrokes += 1,
                Key::Backspace => stats.backspaces += 1,
                Key::Other => {}
            }
            if session.handle_key(key, Instant::now()) != Outcome::Ignored {
                dirty = true;
            }
        }
    }
}

fn draw_ui(stdout: &mut Stdout, session: &PracticeSession) -> Result<(), AppError>
{
    let evaluator = session.evaluator();
    let mut lines = Vec::new();
    lines.push("Vocab Typing - Practice".to_string());
    lines.push(format!("Score: {}", session.completed()));
    lines.push(String::new());

    match session.active_word() {
        Some(word) => {
            lines.push(format!("  {}", word.meaning));
            lines.push(String::new());
            let shown = render::capitalize_first(&evaluator.glyphs());
            lines.push(format!("  {}", render::render_glyphs(&shown)));
        }
        None => lines.push("  Loading word...".to_string()),
    }

    let typed = evaluator.typed();
    if evaluator.phase() == Phase::Complete && session.advance_pending() {
        lines.push("  Correct! Next word...".to_string());
    } else if typed.chars().count() > evaluator.glyphs().len() {
        lines.push(format!("  Typed: {typed}"));
    } else {
        lines.push(String::new());
    }
    lines.push(String::new());

    lines.extend(keyboard::render(evaluator.expected_char()));
    lines.push(String::new());
    lines.push("Type the word seen above. Backspace corrects, ESC leaves.".to_string());

    let output = format!("{}\r\n", lines.join("\r\n"));
    queue!(stdout, MoveTo(0, 0), Clear(ClearType::All))?;
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

fn print_summary(completed: u32, stats: &Stats, elapsed: Duration)
{
    println!("Practice finished");
    println!("Duration: {:>5.1}s", elapsed.as_secs_f32());
    println!("Words completed: {completed}");
    println!("WPM: {:>5.1}", compute_wpm(completed, elapsed));
    println!("Keystrokes: {}", stats.keystrokes);
    println!("Backspaces: {}", stats.backspaces);
}

fn compute_wpm(words: u32, elapsed: Duration) -> f32
{
    match elapsed.as_secs_f32() {
        secs if secs > 0.0 => words as f32 * 60.0 / secs,
        _ => 0.0,
    }
}
