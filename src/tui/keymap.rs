use crossterm::event::{KeyCode, KeyModifiers};

use crate::board::Focus;
use crate::store::TaskStatus;

// ── Actions ──────────────────────────────────────────────────────────

/// Every discrete action the board can perform in response to a key press.
///
/// Which actions are reachable depends on the table a key is looked up in;
/// the execution code in `App` maps each one onto a `Board` operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Global
    Quit,
    ShowHelp,

    // Table
    HoverUp,
    HoverDown,
    OpenDetail,
    NextTab,
    PrevTab,
    EditFilter,
    LoadMore,

    // Detail
    PrevTask,
    NextTask,
    CloseDetail,
    ProposeStatus(TaskStatus),
    EditComment,

    // Confirmation
    Confirm,
    Cancel,
}

// ── Help categories ──────────────────────────────────────────────────

/// Logical groupings shown in the help overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HelpCategory {
    General,
    Table,
    Detail,
    Confirmation,
}

impl HelpCategory {
    fn label(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Table => "Task Table",
            Self::Detail => "Task Details",
            Self::Confirmation => "Confirm Status Change",
        }
    }

    /// Fixed display order for the help overlay.
    const ORDERED: &[Self] = &[Self::General, Self::Table, Self::Detail, Self::Confirmation];
}

// ── Keybinding ───────────────────────────────────────────────────────

/// A single key → action mapping with metadata for the help overlay.
#[derive(Debug, Clone)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
    pub action: Action,
    /// Human-readable key label shown in help (e.g. `"Ctrl+C"`).
    pub label: &'static str,
    /// Short description shown next to the label in the help overlay.
    pub description: &'static str,
    pub category: HelpCategory,
}

/// A single row in the help overlay.
#[derive(Debug, Clone)]
pub struct HelpEntry {
    pub label: &'static str,
    pub description: &'static str,
}

// ── KeyMap ────────────────────────────────────────────────────────────

/// Declarative registry of every key binding, one table per focus.
///
/// A key is looked up only in the table for the current [`Focus`], so a key
/// that means something in the detail view can never leak into the table
/// and vice versa. `global` is consulted after the focus table.
pub struct KeyMap {
    pub global: Vec<KeyBinding>,
    pub table: Vec<KeyBinding>,
    pub detail: Vec<KeyBinding>,
    pub confirm: Vec<KeyBinding>,
}

impl KeyMap {
    pub fn default_keymap() -> Self {
        Self {
            global: default_global_bindings(),
            table: default_table_bindings(),
            detail: default_detail_bindings(),
            confirm: default_confirm_bindings(),
        }
    }

    /// Resolve a key press for the given focus.
    pub fn lookup(&self, focus: Focus, code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
        let bindings = match focus {
            Focus::Table => &self.table,
            Focus::Detail => &self.detail,
            Focus::Confirm => &self.confirm,
        };
        lookup(bindings, code, modifiers).or_else(|| {
            // Confirmation is modal: nothing else is reachable but quitting.
            if focus == Focus::Confirm {
                lookup(&self.global, code, modifiers).filter(|a| *a == Action::Quit)
            } else {
                lookup(&self.global, code, modifiers)
            }
        })
    }

    /// Generate grouped help entries in display order.
    pub fn help_entries(&self) -> Vec<(&'static str, Vec<HelpEntry>)> {
        let mut out = Vec::new();

        for &cat in HelpCategory::ORDERED {
            let mut entries: Vec<HelpEntry> = Vec::new();

            for kb in self
                .global
                .iter()
                .chain(&self.table)
                .chain(&self.detail)
                .chain(&self.confirm)
            {
                if kb.category == cat
                    && !kb.description.is_empty()
                    && !entries.iter().any(|e| e.label == kb.label)
                {
                    entries.push(HelpEntry {
                        label: kb.label,
                        description: kb.description,
                    });
                }
            }

            // Text boxes handle their own keys; list them for completeness.
            if cat == HelpCategory::Detail {
                entries.push(HelpEntry {
                    label: "  Enter",
                    description: "Submit comment (while typing)",
                });
            }

            if !entries.is_empty() {
                out.push((cat.label(), entries));
            }
        }

        out
    }
}

// ── Lookup helper ────────────────────────────────────────────────────

fn lookup(bindings: &[KeyBinding], code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
    // Shift is already folded into printable characters (`?` arrives as Shift+?).
    let modifiers = if matches!(code, KeyCode::Char(_)) {
        modifiers - KeyModifiers::SHIFT
    } else {
        modifiers
    };
    bindings
        .iter()
        .find(|kb| kb.code == code && kb.modifiers == modifiers)
        .map(|kb| kb.action)
}

fn bind(
    code: KeyCode,
    action: Action,
    label: &'static str,
    description: &'static str,
    category: HelpCategory,
) -> KeyBinding {
    KeyBinding {
        code,
        modifiers: KeyModifiers::NONE,
        action,
        label,
        description,
        category,
    }
}

// ── Default bindings ─────────────────────────────────────────────────

#[allow(clippy::enum_glob_use)]
fn default_global_bindings() -> Vec<KeyBinding> {
    use Action::*;
    use HelpCategory::*;

    vec![
        bind(KeyCode::Char('?'), ShowHelp, "  ?", "This help screen", General),
        bind(KeyCode::Char('q'), Quit, "  q", "Quit", General),
        KeyBinding {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            action: Quit,
            label: "  Ctrl+C",
            description: "Quit",
            category: General,
        },
    ]
}

#[allow(clippy::enum_glob_use)]
fn default_table_bindings() -> Vec<KeyBinding> {
    use Action::*;
    use HelpCategory::*;

    vec![
        bind(KeyCode::Up, HoverUp, "  ↑/↓", "Move between rows (wraps)", Table),
        bind(KeyCode::Down, HoverDown, "", "", Table),
        bind(KeyCode::Enter, OpenDetail, "  Enter", "Open task details", Table),
        bind(KeyCode::Tab, NextTab, "  Tab/S-Tab", "Next / previous status tab", Table),
        KeyBinding {
            code: KeyCode::BackTab,
            modifiers: KeyModifiers::SHIFT,
            action: PrevTab,
            label: "",
            description: "",
            category: Table,
        },
        bind(KeyCode::BackTab, PrevTab, "", "", Table),
        bind(KeyCode::Char('l'), NextTab, "  h/l", "Previous / next status tab", Table),
        bind(KeyCode::Char('h'), PrevTab, "", "", Table),
        bind(KeyCode::Char('/'), EditFilter, "  /", "Search tasks", Table),
        bind(KeyCode::Char('m'), LoadMore, "  m", "Load more tasks", Table),
    ]
}

#[allow(clippy::enum_glob_use)]
fn default_detail_bindings() -> Vec<KeyBinding> {
    use Action::*;
    use HelpCategory::*;

    vec![
        bind(KeyCode::Left, PrevTask, "  ←/→", "Previous / next task (wraps)", Detail),
        bind(KeyCode::Right, NextTask, "", "", Detail),
        bind(KeyCode::Esc, CloseDetail, "  Esc", "Close details", Detail),
        bind(
            KeyCode::Char('1'),
            ProposeStatus(TaskStatus::Open),
            "  1/2/3",
            "Set status Open / In Progress / Closed",
            Detail,
        ),
        bind(
            KeyCode::Char('2'),
            ProposeStatus(TaskStatus::InProgress),
            "",
            "",
            Detail,
        ),
        bind(
            KeyCode::Char('3'),
            ProposeStatus(TaskStatus::Closed),
            "",
            "",
            Detail,
        ),
        bind(KeyCode::Char('c'), EditComment, "  c", "Write a comment", Detail),
    ]
}

#[allow(clippy::enum_glob_use)]
fn default_confirm_bindings() -> Vec<KeyBinding> {
    use Action::*;
    use HelpCategory::*;

    vec![
        bind(KeyCode::Char('y'), Confirm, "  y/Enter", "Proceed", Confirmation),
        bind(KeyCode::Enter, Confirm, "", "", Confirmation),
        bind(KeyCode::Char('n'), Cancel, "  n/Esc", "Cancel", Confirmation),
        bind(KeyCode::Esc, Cancel, "", "", Confirmation),
        bind(
            KeyCode::Char('1'),
            ProposeStatus(TaskStatus::Open),
            "  1/2/3",
            "Pick a different status",
            Confirmation,
        ),
        bind(
            KeyCode::Char('2'),
            ProposeStatus(TaskStatus::InProgress),
            "",
            "",
            Confirmation,
        ),
        bind(
            KeyCode::Char('3'),
            ProposeStatus(TaskStatus::Closed),
            "",
            "",
            Confirmation,
        ),
    ]
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn key(km: &KeyMap, focus: Focus, code: KeyCode) -> Option<Action> {
        km.lookup(focus, code, KeyModifiers::NONE)
    }

    #[test]
    fn shifted_printable_keys_still_match() {
        let km = KeyMap::default_keymap();
        assert_eq!(
            km.lookup(Focus::Table, KeyCode::Char('?'), KeyModifiers::SHIFT),
            Some(Action::ShowHelp)
        );
        assert_eq!(
            km.lookup(Focus::Table, KeyCode::Up, KeyModifiers::SHIFT),
            None
        );
    }

    #[test]
    fn arrows_route_by_focus() {
        let km = KeyMap::default_keymap();
        assert_eq!(key(&km, Focus::Table, KeyCode::Up), Some(Action::HoverUp));
        assert_eq!(key(&km, Focus::Table, KeyCode::Down), Some(Action::HoverDown));
        assert_eq!(key(&km, Focus::Table, KeyCode::Left), None);
        assert_eq!(key(&km, Focus::Table, KeyCode::Right), None);

        assert_eq!(key(&km, Focus::Detail, KeyCode::Up), None);
        assert_eq!(key(&km, Focus::Detail, KeyCode::Down), None);
        assert_eq!(key(&km, Focus::Detail, KeyCode::Left), Some(Action::PrevTask));
        assert_eq!(key(&km, Focus::Detail, KeyCode::Right), Some(Action::NextTask));
    }

    #[test]
    fn enter_and_escape_route_by_focus() {
        let km = KeyMap::default_keymap();
        assert_eq!(key(&km, Focus::Table, KeyCode::Enter), Some(Action::OpenDetail));
        assert_eq!(key(&km, Focus::Table, KeyCode::Esc), None);
        assert_eq!(key(&km, Focus::Detail, KeyCode::Enter), None);
        assert_eq!(key(&km, Focus::Detail, KeyCode::Esc), Some(Action::CloseDetail));
    }

    #[test]
    fn status_shortcuts_only_in_detail() {
        let km = KeyMap::default_keymap();
        assert_eq!(key(&km, Focus::Table, KeyCode::Char('2')), None);
        assert_eq!(
            key(&km, Focus::Detail, KeyCode::Char('1')),
            Some(Action::ProposeStatus(TaskStatus::Open))
        );
        assert_eq!(
            key(&km, Focus::Detail, KeyCode::Char('2')),
            Some(Action::ProposeStatus(TaskStatus::InProgress))
        );
        assert_eq!(
            key(&km, Focus::Detail, KeyCode::Char('3')),
            Some(Action::ProposeStatus(TaskStatus::Closed))
        );
    }

    #[test]
    fn confirmation_is_modal() {
        let km = KeyMap::default_keymap();
        assert_eq!(key(&km, Focus::Confirm, KeyCode::Char('y')), Some(Action::Confirm));
        assert_eq!(key(&km, Focus::Confirm, KeyCode::Enter), Some(Action::Confirm));
        assert_eq!(key(&km, Focus::Confirm, KeyCode::Esc), Some(Action::Cancel));
        assert_eq!(key(&km, Focus::Confirm, KeyCode::Right), None);
        assert_eq!(key(&km, Focus::Confirm, KeyCode::Char('?')), None);
        assert_eq!(key(&km, Focus::Confirm, KeyCode::Char('q')), Some(Action::Quit));
    }

    #[test]
    fn global_keys_reach_table_and_detail() {
        let km = KeyMap::default_keymap();
        for focus in [Focus::Table, Focus::Detail] {
            assert_eq!(key(&km, focus, KeyCode::Char('q')), Some(Action::Quit));
            assert_eq!(key(&km, focus, KeyCode::Char('?')), Some(Action::ShowHelp));
            assert_eq!(
                km.lookup(focus, KeyCode::Char('c'), KeyModifiers::CONTROL),
                Some(Action::Quit)
            );
        }
    }

    #[test]
    fn shift_tab_reported_either_way() {
        let km = KeyMap::default_keymap();
        assert_eq!(
            km.lookup(Focus::Table, KeyCode::BackTab, KeyModifiers::SHIFT),
            Some(Action::PrevTab)
        );
        assert_eq!(key(&km, Focus::Table, KeyCode::BackTab), Some(Action::PrevTab));
    }

    #[test]
    fn help_entries_cover_all_categories() {
        let km = KeyMap::default_keymap();
        let labels: Vec<&str> = km.help_entries().iter().map(|(l, _)| *l).collect();
        assert_eq!(
            labels,
            ["General", "Task Table", "Task Details", "Confirm Status Change"]
        );
    }

    #[test]
    fn help_entries_no_duplicates() {
        let km = KeyMap::default_keymap();
        for (_, entries) in km.help_entries() {
            let mut seen = std::collections::HashSet::new();
            for e in &entries {
                assert!(seen.insert(e.label), "duplicate help label: {:?}", e.label);
            }
        }
    }
}
