/// Back-to-front ordering of distinct items. The last item is the topmost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackOrder<T> {
    items: Vec<T>,
}

impl<T> Default for StackOrder<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Copy + Eq> StackOrder<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places `item` on top, removing any earlier occurrence first.
    pub fn move_to_end(&mut self, item: T) {
        if let Some(pos) = self.position(item) {
            self.items.remove(pos);
        }
        self.items.push(item);
    }

    pub fn remove(&mut self, item: T) -> bool {
        let before = self.items.len();
        self.items.retain(|existing| *existing != item);
        self.items.len() != before
    }

    pub fn position(&self, item: T) -> Option<usize> {
        self.items.iter().position(|existing| *existing == item)
    }

    pub fn contains(&self, item: T) -> bool {
        self.position(item).is_some()
    }

    pub fn last(&self) -> Option<T> {
        self.items.last().copied()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = T> + '_ {
        self.items.iter().copied()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}
