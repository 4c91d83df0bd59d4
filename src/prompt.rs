use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use std::io::{self, Write};

pub fn read_line(label: &str) -> io::Result<String>
{
    print!("{label}");
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Reads a line without echoing it. Returns `None` when the user cancels
/// with ESC or Ctrl+C.
pub fn read_secret(label: &str) -> io::Result<Option<String>>
{
    print!("{label}");
    io::stdout().flush()?;

    terminal::enable_raw_mode()?;
    let result = read_secret_raw();
    let _ = terminal::disable_raw_mode();
    println!();
    result
}

fn read_secret_raw() -> io::Result<Option<String>>
{
    let mut secret = String::new();
    loop {
        let Event::Key(KeyEvent { code, modifiers, kind, .. }) = event::read()? else {
            continue;
        };
        if kind == KeyEventKind::Release {
            continue;
        }
        match code {
            KeyCode::Enter => return Ok(Some(secret)),
            KeyCode::Esc => return Ok(None),
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Ok(None),
            KeyCode::Backspace => {
                secret.pop();
            }
            KeyCode::Char(ch) => secret.push(ch),
            _ => {}
        }
    }
}
