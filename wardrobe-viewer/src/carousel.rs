//! Cyclic window over the catalog

/// Direction of a window shift
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// The contiguous, wrapping range of catalog indices currently on stage.
///
/// The carousel has no ends: shifting past the last item wraps to the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselWindow {
    start: usize,
    len: usize,
    capacity: usize,
}

impl CarouselWindow {
    pub fn new(len: usize, capacity: usize) -> Self {
        Self {
            start: 0,
            len,
            capacity,
        }
    }

    pub fn with_start(len: usize, capacity: usize, start: usize) -> Self {
        Self {
            start: if len == 0 { 0 } else { start % len },
            len,
            capacity,
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    /// Catalog length
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Visible catalog indices in slot order; fewer than `capacity` when the
    /// catalog is shorter
    pub fn visible_indices(&self) -> Vec<usize> {
        (0..self.capacity.min(self.len))
            .map(|i| (self.start + i) % self.len)
            .collect()
    }

    /// Slot currently showing `catalog_index`, if visible
    pub fn slot_of(&self, catalog_index: usize) -> Option<usize> {
        if catalog_index >= self.len {
            return None;
        }
        let offset = (catalog_index + self.len - self.start) % self.len;
        (offset < self.capacity.min(self.len)).then_some(offset)
    }

    pub fn advance(&self, direction: Direction) -> Self {
        if self.len == 0 {
            return *self;
        }
        let start = match direction {
            Direction::Forward => (self.start + 1) % self.len,
            Direction::Backward => (self.start + self.len - 1) % self.len,
        };
        Self { start, ..*self }
    }
}
