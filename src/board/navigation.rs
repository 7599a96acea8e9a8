use crate::store::TaskId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Prev,
    Next,
}

/// Move one position in a ring of `len` items. `None` when the ring is empty.
pub fn wrap(index: usize, len: usize, step: Step) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match step {
        Step::Next if index + 1 >= len => 0,
        Step::Next => index + 1,
        Step::Prev if index == 0 || index > len => len - 1,
        Step::Prev => index - 1,
    })
}

/// Row hover and the task open in the detail view.
///
/// `selected == None` means the table has focus.
#[derive(Debug, Default, Clone)]
pub struct Navigator {
    hovered: usize,
    selected: Option<TaskId>,
}

impl Navigator {
    pub fn hovered(&self) -> usize {
        self.hovered
    }

    pub fn selected(&self) -> Option<TaskId> {
        self.selected
    }

    /// Called whenever the visible rows change.
    pub fn reset_hover(&mut self) {
        self.hovered = 0;
    }

    pub fn hover(&mut self, index: usize, len: usize) -> bool {
        if index >= len {
            return false;
        }
        self.hovered = index;
        true
    }

    pub fn move_hover(&mut self, step: Step, len: usize) {
        if let Some(next) = wrap(self.hovered, len, step) {
            self.hovered = next;
        }
    }

    pub fn open(&mut self, id: TaskId) {
        self.selected = Some(id);
    }

    pub fn open_hovered(&mut self, rows: &[TaskId]) -> Option<TaskId> {
        let id = *rows.get(self.hovered)?;
        self.open(id);
        Some(id)
    }

    pub fn close(&mut self) {
        self.selected = None;
    }

    /// Open the neighbour of the selected task within `rows`, wrapping at
    /// either end. A selection that is no longer among the rows counts as
    /// sitting just before the first one.
    pub fn step_selection(&mut self, step: Step, rows: &[TaskId]) -> Option<TaskId> {
        let current = self.selected?;
        let next = match rows.iter().position(|&id| id == current) {
            Some(index) => wrap(index, rows.len(), step)?,
            None => match step {
                Step::Next if !rows.is_empty() => 0,
                Step::Prev if !rows.is_empty() => rows.len() - 1,
                _ => return None,
            },
        };
        self.selected = Some(rows[next]);
        self.hovered = next;
        Some(rows[next])
    }
}
