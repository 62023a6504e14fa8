use std::io::Write;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::queue;

use super::view::BrowserView;
use crate::search::Hit;

/// One list line: document id, then the compact source
pub fn format_hit(hit: &Hit, width: usize) -> String {
    truncate(&format!("{}  {}", hit.id, hit.source), width)
}

/// Cut `text` to at most `width` characters
pub fn truncate(text: &str, width: usize) -> String {
    match text.char_indices().nth(width) {
        Some((end, _)) if width > 0 => {
            let mut cut: String = text[..end].chars().take(width - 1).collect();
            cut.push('…');
            cut
        }
        Some(_) => String::new(),
        None => text.to_string(),
    }
}

/// Draw the whole view
pub fn draw<W: Write>(out: &mut W, view: &BrowserView) -> std::io::Result<()> {
    let (cols, rows) = terminal::size()?;
    let width = cols as usize;

    queue!(out, Hide, MoveTo(0, 0), Clear(ClearType::All))?;

    for (line, (row, hit)) in view.visible_rows().enumerate() {
        queue!(out, MoveTo(0, line as u16))?;
        let text = format_hit(hit, width);
        if row == view.selected() {
            queue!(
                out,
                SetAttribute(Attribute::Reverse),
                Print(text),
                SetAttribute(Attribute::Reset)
            )?;
        } else {
            queue!(out, Print(text))?;
        }
    }

    let hint_row = rows.saturating_sub(2);
    let status_row = rows.saturating_sub(1);
    queue!(
        out,
        MoveTo(0, hint_row),
        Print(truncate(&view.hint_line(), width)),
        MoveTo(0, status_row),
        SetAttribute(Attribute::Reverse),
        Print(format!("{:<width$}", truncate(&view.status_line(), width))),
        SetAttribute(Attribute::Reset)
    )?;

    // The filter is edited on the status row, cursor included
    if let Some(filter) = view.filter() {
        let prompt = format!("/{}", filter.text());
        let column = 1 + filter.text()[..filter.cursor()].chars().count();
        queue!(
            out,
            MoveTo(0, status_row),
            Clear(ClearType::CurrentLine),
            Print(truncate(&prompt, width)),
            MoveTo(column.min(width.saturating_sub(1)) as u16, status_row),
            Show
        )?;
    }

    out.flush()
}
