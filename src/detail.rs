/// In-place expansion for a rendered list. At most one card is expanded, and
/// the state is keyed by position in the list it was created for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expansion {
    expanded: Option<usize>,
    len: usize,
}

impl Expansion {
    /// Fresh state for a newly rendered list of `len` cards: all collapsed.
    pub fn for_list(len: usize) -> Self {
        Expansion { expanded: None, len }
    }

    /// Flip card `index`. Expanding one card collapses any other.
    /// Returns whether `index` is expanded afterwards; out-of-range is a no-op.
    pub fn toggle(&mut self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        if self.expanded == Some(index) {
            self.expanded = None;
            false
        } else {
            self.expanded = Some(index);
            true
        }
    }

    pub fn expanded(&self) -> Option<usize> {
        self.expanded
    }
}

/// Full-screen detail overlay. Holds the position of the open entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overlay {
    open: Option<usize>,
}

impl Overlay {
    pub fn open(&mut self, index: usize) {
        self.open = Some(index);
    }

    /// Safe to call when already closed.
    pub fn close(&mut self) {
        self.open = None;
    }

    pub fn current(&self) -> Option<usize> {
        self.open
    }
}
