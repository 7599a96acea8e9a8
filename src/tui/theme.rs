use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

use crate::store::{Priority, TaskStatus};

/// Semantic colour theme for the entire TUI.
///
/// Every colour used by the renderer is stored here so the user can
/// override any of them via `[theme]` in `config.toml`.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Borders ───────────────────────────────────────────────
    pub border_focused: Color,
    pub border_unfocused: Color,

    // ── Text ──────────────────────────────────────────────────
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_accent: Color,

    // ── Task status ───────────────────────────────────────────
    pub status_open: Color,
    pub status_in_progress: Color,
    pub status_closed: Color,

    // ── Priority badges ───────────────────────────────────────
    pub priority_low: Color,
    pub priority_medium: Color,
    pub priority_high: Color,
    pub priority_urgent: Color,

    // ── Table ─────────────────────────────────────────────────
    pub hover_row: Color,
    pub label_badge: Color,
    pub header: Color,

    // ── Tabs ──────────────────────────────────────────────────
    pub tab_active: Color,
    pub tab_inactive: Color,

    // ── Modals ────────────────────────────────────────────────
    pub detail_border: Color,
    pub confirm_border: Color,
    pub form_highlight: Color,
    pub form_dim: Color,

    // ── Misc ──────────────────────────────────────────────────
    pub spinner: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            border_focused: Color::Cyan,
            border_unfocused: Color::DarkGray,

            text_primary: Color::White,
            text_secondary: Color::DarkGray,
            text_accent: Color::Cyan,

            status_open: Color::Cyan,
            status_in_progress: Color::Yellow,
            status_closed: Color::Green,

            priority_low: Color::Green,
            priority_medium: Color::Yellow,
            priority_high: Color::Rgb(255, 165, 0),
            priority_urgent: Color::Red,

            hover_row: Color::Rgb(60, 40, 20),
            label_badge: Color::LightBlue,
            header: Color::Gray,

            tab_active: Color::Cyan,
            tab_inactive: Color::DarkGray,

            detail_border: Color::Cyan,
            confirm_border: Color::Yellow,
            form_highlight: Color::Yellow,
            form_dim: Color::DarkGray,

            spinner: Color::Yellow,
        }
    }
}

impl Theme {
    /// Style for a focused panel border.
    pub fn focused_border(&self) -> Style {
        Style::default().fg(self.border_focused)
    }

    /// Style for an unfocused panel border.
    pub fn unfocused_border(&self) -> Style {
        Style::default().fg(self.border_unfocused)
    }

    pub fn task_status_style(&self, status: TaskStatus) -> Style {
        let color = match status {
            TaskStatus::Open => self.status_open,
            TaskStatus::InProgress => self.status_in_progress,
            TaskStatus::Closed => self.status_closed,
        };
        Style::default().fg(color)
    }

    pub fn priority_style(&self, priority: Priority) -> Style {
        let color = match priority {
            Priority::Low => self.priority_low,
            Priority::Medium => self.priority_medium,
            Priority::High => self.priority_high,
            Priority::Urgent => self.priority_urgent,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    /// Background of the hovered table row.
    pub fn hover_style(&self) -> Style {
        Style::default().bg(self.hover_row)
    }

    pub fn label_style(&self) -> Style {
        Style::default().fg(self.label_badge)
    }

    pub fn header_style(&self) -> Style {
        Style::default()
            .fg(self.header)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    }

    /// Style for the active tab label.
    pub fn tab_active_style(&self) -> Style {
        Style::default()
            .fg(self.tab_active)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    }

    /// Style for an inactive tab label.
    pub fn tab_inactive_style(&self) -> Style {
        Style::default().fg(self.tab_inactive)
    }

    pub fn secondary(&self) -> Style {
        Style::default().fg(self.text_secondary)
    }

    pub fn primary(&self) -> Style {
        Style::default().fg(self.text_primary)
    }

    pub fn accent(&self) -> Style {
        Style::default()
            .fg(self.text_accent)
            .add_modifier(Modifier::BOLD)
    }
}

// ── Config deserialization ────────────────────────────────────────────

/// All-optional mirror of [`Theme`] for `config.toml` `[theme]` section.
///
/// Only `Some` fields override the default; everything else keeps its default.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct ThemeConfig {
    pub border_focused: Option<String>,
    pub border_unfocused: Option<String>,

    pub text_primary: Option<String>,
    pub text_secondary: Option<String>,
    pub text_accent: Option<String>,

    pub status_open: Option<String>,
    pub status_in_progress: Option<String>,
    pub status_closed: Option<String>,

    pub priority_low: Option<String>,
    pub priority_medium: Option<String>,
    pub priority_high: Option<String>,
    pub priority_urgent: Option<String>,

    pub hover_row: Option<String>,
    pub label_badge: Option<String>,
    pub header: Option<String>,

    pub tab_active: Option<String>,
    pub tab_inactive: Option<String>,

    pub detail_border: Option<String>,
    pub confirm_border: Option<String>,
    pub form_highlight: Option<String>,
    pub form_dim: Option<String>,

    pub spinner: Option<String>,
}

/// Parse a colour string into a ratatui `Color`.
///
/// Supports named colours (`"cyan"`, `"red"`, `"dark_gray"`, etc.) and
/// `"rgb(R,G,B)"` syntax.
fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if let Some(inner) = s.strip_prefix("rgb(").and_then(|r| r.strip_suffix(')')) {
        let parts: Vec<&str> = inner.split(',').collect();
        if parts.len() == 3 {
            let r = parts[0].trim().parse::<u8>().ok()?;
            let g = parts[1].trim().parse::<u8>().ok()?;
            let b = parts[2].trim().parse::<u8>().ok()?;
            return Some(Color::Rgb(r, g, b));
        }
        return None;
    }

    // Named colours (case-insensitive, with underscore tolerance)
    let lower = s.to_lowercase().replace('-', "_");
    match lower.as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "gray" | "grey" => Some(Color::Gray),
        "dark_gray" | "dark_grey" | "darkgray" | "darkgrey" => Some(Color::DarkGray),
        "light_red" | "lightred" => Some(Color::LightRed),
        "light_green" | "lightgreen" => Some(Color::LightGreen),
        "light_yellow" | "lightyellow" => Some(Color::LightYellow),
        "light_blue" | "lightblue" => Some(Color::LightBlue),
        "light_magenta" | "lightmagenta" => Some(Color::LightMagenta),
        "light_cyan" | "lightcyan" => Some(Color::LightCyan),
        "white" => Some(Color::White),
        _ => None,
    }
}

/// Overwrite `target` if `source` parses to a valid colour.
fn apply(target: &mut Color, source: Option<&String>) {
    if let Some(s) = source
        && let Some(color) = parse_color(s)
    {
        *target = color;
    }
}

impl ThemeConfig {
    /// Build a `Theme` starting from defaults, overriding any fields that were
    /// set in the config file.
    pub fn build(&self) -> Theme {
        let mut t = Theme::default();

        apply(&mut t.border_focused, self.border_focused.as_ref());
        apply(&mut t.border_unfocused, self.border_unfocused.as_ref());
        apply(&mut t.text_primary, self.text_primary.as_ref());
        apply(&mut t.text_secondary, self.text_secondary.as_ref());
        apply(&mut t.text_accent, self.text_accent.as_ref());
        apply(&mut t.status_open, self.status_open.as_ref());
        apply(&mut t.status_in_progress, self.status_in_progress.as_ref());
        apply(&mut t.status_closed, self.status_closed.as_ref());
        apply(&mut t.priority_low, self.priority_low.as_ref());
        apply(&mut t.priority_medium, self.priority_medium.as_ref());
        apply(&mut t.priority_high, self.priority_high.as_ref());
        apply(&mut t.priority_urgent, self.priority_urgent.as_ref());
        apply(&mut t.hover_row, self.hover_row.as_ref());
        apply(&mut t.label_badge, self.label_badge.as_ref());
        apply(&mut t.header, self.header.as_ref());
        apply(&mut t.tab_active, self.tab_active.as_ref());
        apply(&mut t.tab_inactive, self.tab_inactive.as_ref());
        apply(&mut t.detail_border, self.detail_border.as_ref());
        apply(&mut t.confirm_border, self.confirm_border.as_ref());
        apply(&mut t.form_highlight, self.form_highlight.as_ref());
        apply(&mut t.form_dim, self.form_dim.as_ref());
        apply(&mut t.spinner, self.spinner.as_ref());

        t
    }
}
