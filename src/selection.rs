/// Index of the highlighted server, always within `0..len`.
///
/// `None` only when there is nothing to select.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    index: Option<usize>,
    len: usize,
}

impl Selection {
    pub fn new(len: usize) -> Self {
        Self {
            index: (len > 0).then_some(0),
            len,
        }
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Cursor moved onto `index`.
    pub fn highlight(&mut self, index: usize) {
        self.index = self.clamp(index);
    }

    /// Entry at `index` was chosen. Returns the resulting selection.
    pub fn activate(&mut self, index: usize) -> Option<usize> {
        self.highlight(index);
        self.index
    }

    pub fn next(&mut self) {
        if let Some(i) = self.index {
            self.highlight(i.saturating_add(1));
        }
    }

    pub fn previous(&mut self) {
        if let Some(i) = self.index {
            self.highlight(i.saturating_sub(1));
        }
    }

    fn clamp(&self, index: usize) -> Option<usize> {
        self.len.checked_sub(1).map(|last| index.min(last))
    }
}
