use crate::practice::evaluator::GlyphState;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Rgb
{
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

pub const MATCHED: Rgb = Rgb { r: 0, g: 220, b: 120 };
pub const MISMATCHED: Rgb = Rgb { r: 255, g: 0, b: 0 };
pub const CURRENT: Rgb = Rgb { r: 255, g: 215, b: 0 };
pub const PENDING: Rgb = Rgb { r: 110, g: 110, b: 110 };
pub const KEY_IDLE: Rgb = Rgb { r: 50, g: 50, b: 60 };
pub const KEY_TARGET: Rgb = Rgb { r: 200, g: 150, b: 0 };

#[derive(Clone, Copy)]
pub struct Cell
{
    pub ch: char,
    pub fg: Option<Rgb>,
    pub bg: Option<Rgb>,
}

impl Cell
{
    pub fn plain(ch: char) -> Self
    {
        Self { ch, fg: None, bg: None }
    }
}

pub fn glyph_color(state: GlyphState) -> Rgb
{
    match state {
        GlyphState::Matched => MATCHED,
        GlyphState::Mismatched => MISMATCHED,
        GlyphState::Current => CURRENT,
        GlyphState::Pending => PENDING,
    }
}

/// Uppercases the first letter for display when that keeps it a single
/// character; letters such as `ß` or `ﬁ` are shown as stored.
pub fn capitalize_first(glyphs: &[(char, GlyphState)]) -> Vec<(char, GlyphState)>
{
    let mut shown = glyphs.to_vec();
    if let Some(first) = shown.first_mut() {
        let mut upper = first.0.to_uppercase();
        if let (Some(ch), None) = (upper.next(), upper.next()) {
            first.0 = ch;
        }
    }
    shown
}

/// Renders the target word with one color per position, spaced for
/// readability.
pub fn render_glyphs(glyphs: &[(char, GlyphState)]) -> String
{
    let mut cells = Vec::with_capacity(glyphs.len() * 2);
    for (index, &(ch, state)) in glyphs.iter().enumerate() {
        if index > 0 {
            cells.push(Cell::plain(' '));
        }
        let shown = if ch == ' ' && state == GlyphState::Current { '_' } else { ch };
        cells.push(Cell {
            ch: shown,
            fg: Some(glyph_color(state)),
            bg: None,
        });
    }
    render_row(&cells)
}

/// Emits escape codes only where the style changes between cells.
pub fn render_row(row: &[Cell]) -> String
{
    let mut line = String::with_capacity(row.len() + 16);
    let mut active: (Option<Rgb>, Option<Rgb>) = (None, None);
    for cell in row {
        let style = (cell.fg, cell.bg);
        if style != active {
            line.push_str("\x1b[0m");
            if let Some(color) = cell.fg {
                line.push_str(&ansi_fg(color));
            }
            if let Some(color) = cell.bg {
                line.push_str(&ansi_bg(color));
            }
            active = style;
        }
        line.push(cell.ch);
    }
    if active != (None, None) {
        line.push_str("\x1b[0m");
    }
    line
}

fn ansi_fg(color: Rgb) -> String
{
    format!("\x1b[38;2;{};{};{}m", color.r, color.g, color.b)
}

fn ansi_bg(color: Rgb) -> String
{
    format!("\x1b[48;2;{};{};{}m", color.r, color.g, color.b)
}
