use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::theme::Theme;

/// What a key did to a text buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    /// Not a text-editing key; the caller may handle it.
    Ignored,
    /// Only the cursor moved.
    Moved,
    /// The buffer's contents changed.
    Changed,
}

// ── Cursor helpers ────────────────────────────────────────────────────

fn prev_char(s: &str, pos: usize) -> usize {
    s[..pos].char_indices().next_back().map_or(0, |(i, _)| i)
}

fn next_char(s: &str, pos: usize) -> usize {
    s[pos..]
        .chars()
        .next()
        .map_or(s.len(), |c| pos + c.len_utf8())
}

/// Byte offset of the start of the word left of `pos`.
pub fn word_left(s: &str, pos: usize) -> usize {
    let trimmed = s[..pos].trim_end();
    trimmed
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map_or(0, |(i, c)| i + c.len_utf8())
}

/// Byte offset of the start of the word right of `pos`.
pub fn word_right(s: &str, pos: usize) -> usize {
    let rest = &s[pos..];
    let Some(gap) = rest.find(char::is_whitespace) else {
        return s.len();
    };
    match rest[gap..].find(|c: char| !c.is_whitespace()) {
        Some(start) => pos + gap + start,
        None => s.len(),
    }
}

/// Line-editing keys shared by the filter box and the comment box.
///
/// Ctrl+Left/Right jump by word, Ctrl+W deletes a word, Ctrl+U clears to
/// the start of the line.
pub fn apply_text_edit(
    buf: &mut String,
    cursor: &mut usize,
    code: KeyCode,
    modifiers: KeyModifiers,
) -> Edit {
    *cursor = (*cursor).min(buf.len());
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);

    match code {
        KeyCode::Left if ctrl => *cursor = word_left(buf, *cursor),
        KeyCode::Right if ctrl => *cursor = word_right(buf, *cursor),
        KeyCode::Left => *cursor = prev_char(buf, *cursor),
        KeyCode::Right => *cursor = next_char(buf, *cursor),
        KeyCode::Home => *cursor = 0,
        KeyCode::End => *cursor = buf.len(),

        KeyCode::Char('w') if ctrl => {
            let start = word_left(buf, *cursor);
            buf.drain(start..*cursor);
            *cursor = start;
            return Edit::Changed;
        }
        KeyCode::Char('u') if ctrl => {
            buf.drain(..*cursor);
            *cursor = 0;
            return Edit::Changed;
        }
        KeyCode::Backspace => {
            if *cursor == 0 {
                return Edit::Moved;
            }
            let start = prev_char(buf, *cursor);
            buf.drain(start..*cursor);
            *cursor = start;
            return Edit::Changed;
        }
        KeyCode::Delete => {
            if *cursor == buf.len() {
                return Edit::Moved;
            }
            let end = next_char(buf, *cursor);
            buf.drain(*cursor..end);
            return Edit::Changed;
        }
        KeyCode::Char(c) if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            buf.insert(*cursor, c);
            *cursor += c.len_utf8();
            return Edit::Changed;
        }
        _ => return Edit::Ignored,
    }
    Edit::Moved
}

/// The buffer with a block cursor drawn at `cursor`.
pub fn format_with_cursor(buf: &str, cursor: usize) -> String {
    let (before, after) = buf.split_at(cursor.min(buf.len()));
    format!("{before}\u{2588}{after}")
}

// ── Rendering helpers ─────────────────────────────────────────────────

/// Clear a centred `width`×`height` panel, draw its border, and return the
/// inner area.
pub fn render_modal(
    frame: &mut Frame,
    title: Line<'_>,
    border: Style,
    width: u16,
    height: u16,
) -> Rect {
    let area = frame.area();
    let w = width.min(area.width.saturating_sub(2));
    let h = height.min(area.height.saturating_sub(2));
    let panel = Rect::new(
        area.x + area.width.saturating_sub(w) / 2,
        area.y + area.height.saturating_sub(h) / 2,
        w,
        h,
    );

    frame.render_widget(Clear, panel);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border);
    let inner = block.inner(panel);
    frame.render_widget(block, panel);
    inner
}

/// A one-line bordered text box. While `editing`, the cursor is shown and
/// the border is highlighted; an empty idle box shows `placeholder`.
pub fn render_input(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    (buf, cursor): (&str, usize),
    editing: bool,
    placeholder: &str,
    theme: &Theme,
) {
    let (text, style) = if editing {
        (
            format_with_cursor(buf, cursor),
            Style::default().fg(theme.text_primary),
        )
    } else if buf.is_empty() {
        (placeholder.to_string(), Style::default().fg(theme.form_dim))
    } else {
        (buf.to_string(), Style::default().fg(theme.text_primary))
    };
    let border = if editing {
        Style::default().fg(theme.form_highlight)
    } else {
        theme.unfocused_border()
    };
    let block = Block::default()
        .title(Span::styled(format!(" {title} "), border))
        .borders(Borders::ALL)
        .border_style(border);
    frame.render_widget(Paragraph::new(Span::styled(text, style)).block(block), area);
}

/// A hint bar of alternating key and description spans.
pub fn render_hints(frame: &mut Frame, area: Rect, hints: &[(&str, &str)], theme: &Theme) {
    let key = theme.accent();
    let desc = theme.secondary();
    let spans: Vec<Span<'_>> = hints
        .iter()
        .flat_map(|(k, d)| [Span::styled(format!(" {k} "), key), Span::styled(*d, desc)])
        .collect();
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edit(buf: &mut String, cursor: &mut usize, code: KeyCode, mods: KeyModifiers) -> Edit {
        apply_text_edit(buf, cursor, code, mods)
    }

    #[test]
    fn word_left_skips_trailing_space() {
        assert_eq!(word_left("fix login bug", 13), 10);
        assert_eq!(word_left("fix login  ", 11), 4);
        assert_eq!(word_left("fix", 3), 0);
        assert_eq!(word_left("", 0), 0);
    }

    #[test]
    fn word_right_lands_on_next_word() {
        assert_eq!(word_right("fix login bug", 0), 4);
        assert_eq!(word_right("fix login bug", 5), 10);
        assert_eq!(word_right("fix login bug", 10), 13);
    }

    #[test]
    fn typing_inserts_at_cursor() {
        let mut buf = String::from("Critcal");
        let mut cursor = 4;
        let result = edit(&mut buf, &mut cursor, KeyCode::Char('i'), KeyModifiers::NONE);
        assert_eq!(result, Edit::Changed);
        assert_eq!(buf, "Critical");
        assert_eq!(cursor, 5);
    }

    #[test]
    fn shifted_characters_are_typed() {
        let mut buf = String::new();
        let mut cursor = 0;
        edit(&mut buf, &mut cursor, KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert_eq!(buf, "A");
    }

    #[test]
    fn control_chords_are_not_typed() {
        let mut buf = String::from("abc");
        let mut cursor = 3;
        let result = edit(&mut buf, &mut cursor, KeyCode::Char('a'), KeyModifiers::CONTROL);
        assert_eq!(result, Edit::Ignored);
        assert_eq!(buf, "abc");
    }

    #[test]
    fn backspace_and_delete_remove_one_char() {
        let mut buf = String::from("bugg");
        let mut cursor = 4;
        assert_eq!(
            edit(&mut buf, &mut cursor, KeyCode::Backspace, KeyModifiers::NONE),
            Edit::Changed
        );
        assert_eq!(buf, "bug");

        cursor = 0;
        edit(&mut buf, &mut cursor, KeyCode::Delete, KeyModifiers::NONE);
        assert_eq!(buf, "ug");
        assert_eq!(cursor, 0);
    }

    #[test]
    fn backspace_at_start_changes_nothing() {
        let mut buf = String::from("x");
        let mut cursor = 0;
        assert_eq!(
            edit(&mut buf, &mut cursor, KeyCode::Backspace, KeyModifiers::NONE),
            Edit::Moved
        );
        assert_eq!(buf, "x");
    }

    #[test]
    fn ctrl_w_and_ctrl_u_delete_back() {
        let mut buf = String::from("needs more tests");
        let mut cursor = buf.len();
        edit(&mut buf, &mut cursor, KeyCode::Char('w'), KeyModifiers::CONTROL);
        assert_eq!(buf, "needs more ");
        assert_eq!(cursor, 11);
        edit(&mut buf, &mut cursor, KeyCode::Char('u'), KeyModifiers::CONTROL);
        assert_eq!(buf, "");
        assert_eq!(cursor, 0);
    }

    #[test]
    fn cursor_moves_over_multibyte_chars() {
        let mut buf = String::from("né");
        let mut cursor = buf.len();
        edit(&mut buf, &mut cursor, KeyCode::Left, KeyModifiers::NONE);
        assert_eq!(cursor, 1);
        edit(&mut buf, &mut cursor, KeyCode::Right, KeyModifiers::NONE);
        assert_eq!(cursor, 3);
        edit(&mut buf, &mut cursor, KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(buf, "n");
    }

    #[test]
    fn home_end_and_word_jumps_only_move() {
        let mut buf = String::from("one two");
        let mut cursor = 3;
        assert_eq!(
            edit(&mut buf, &mut cursor, KeyCode::Home, KeyModifiers::NONE),
            Edit::Moved
        );
        assert_eq!(cursor, 0);
        edit(&mut buf, &mut cursor, KeyCode::Right, KeyModifiers::CONTROL);
        assert_eq!(cursor, 4);
        edit(&mut buf, &mut cursor, KeyCode::End, KeyModifiers::NONE);
        assert_eq!(cursor, 7);
        assert_eq!(buf, "one two");
    }

    #[test]
    fn cursor_is_drawn_in_place() {
        assert_eq!(format_with_cursor("abc", 0), "\u{2588}abc");
        assert_eq!(format_with_cursor("abc", 1), "a\u{2588}bc");
        assert_eq!(format_with_cursor("abc", 9), "abc\u{2588}");
    }
}
