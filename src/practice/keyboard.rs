use crate::practice::render::{Cell, KEY_IDLE, KEY_TARGET, render_row};

const ROWS: [&str; 4] = ["1234567890-=", "QWERTYUIOP[]\\", "ASDFGHJKL;'", "ZXCVBNM,./"];
const ROW_INDENT: [usize; 4] = [0, 2, 3, 4];
const SPACE_WIDTH: usize = 27;
const SPACE_INDENT: usize = 10;

/// Whether `key` lights up while `expected` is the next character to type.
pub fn is_target(key: char, expected: Option<char>) -> bool
{
    match expected {
        Some(ch) if ch == ' ' => key == ' ',
        Some(ch) => key.to_lowercase().eq(ch.to_lowercase()),
        None => false,
    }
}

/// One string per keyboard row plus the space bar.
pub fn render(expected: Option<char>) -> Vec<String>
{
    let mut lines = Vec::with_capacity(ROWS.len() + 1);
    for (row, indent) in ROWS.iter().zip(ROW_INDENT) {
        let mut cells: Vec<Cell> = (0..indent).map(|_| Cell::plain(' ')).collect();
        for key in row.chars() {
            let bg = if is_target(key, expected) { KEY_TARGET } else { KEY_IDLE };
            for ch in [' ', key, ' '] {
                cells.push(Cell { ch, fg: None, bg: Some(bg) });
            }
            cells.push(Cell::plain(' '));
        }
        lines.push(render_row(&cells));
    }

    let bg = if is_target(' ', expected) { KEY_TARGET } else { KEY_IDLE };
    let mut space: Vec<Cell> = (0..SPACE_INDENT).map(|_| Cell::plain(' ')).collect();
    space.extend((0..SPACE_WIDTH).map(|_| Cell { ch: ' ', fg: None, bg: Some(bg) }));
    lines.push(render_row(&space));
    lines
}
