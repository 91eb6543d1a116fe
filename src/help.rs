use crate::terminal::Terminal;
use crossterm::style::Color;

const BORDER: Color = Color::White;
const TEXT: Color = Color::Grey;

/// Draw `text` in a bordered box centred on the buffer
pub fn render_help_overlay(term: &mut Terminal, text: &str) {
    let lines: Vec<&str> = text.lines().collect();
    if lines.is_empty() {
        return;
    }
    let (width, height) = term.size();
    let inner = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) + 2;
    let box_w = inner + 2;
    let box_h = lines.len() + 2;
    let left = (width as usize).saturating_sub(box_w) as i32 / 2;
    let top = (height as usize).saturating_sub(box_h) as i32 / 2;
    let right = left + box_w as i32 - 1;
    let bottom = top + box_h as i32 - 1;

    let rule = "─".repeat(inner);
    term.set(left, top, '┌', Some(BORDER), false);
    term.set_str(left + 1, top, &rule, Some(BORDER), false);
    term.set(right, top, '┐', Some(BORDER), false);

    for (i, line) in lines.iter().enumerate() {
        let y = top + 1 + i as i32;
        term.set(left, y, '│', Some(BORDER), false);
        term.set_str(left + 1, y, &format!(" {:<w$} ", line, w = inner - 2), Some(TEXT), false);
        term.set(right, y, '│', Some(BORDER), false);
    }

    term.set(left, bottom, '└', Some(BORDER), false);
    term.set_str(left + 1, bottom, &rule, Some(BORDER), false);
    term.set(right, bottom, '┘', Some(BORDER), false);
}
