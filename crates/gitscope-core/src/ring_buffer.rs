//! Fixed-capacity ring buffer.

/// A queue of at most `capacity` elements that evicts its oldest element
/// when full. Storage is allocated once up front.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    slots: Vec<Option<T>>,
    head: usize,
    len: usize,
}

impl<T> RingBuffer<T> {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self {
            slots,
            head: 0,
            len: 0,
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append `item`, returning the element evicted to make room.
    ///
    /// With zero capacity the item itself is handed back.
    pub fn push(&mut self, item: T) -> Option<T> {
        let capacity = self.capacity();
        if capacity == 0 {
            return Some(item);
        }
        if self.len == capacity {
            let evicted = self.slots[self.head].replace(item);
            self.head = (self.head + 1) % capacity;
            evicted
        } else {
            let tail = (self.head + self.len) % capacity;
            self.slots[tail] = Some(item);
            self.len += 1;
            None
        }
    }

    /// Remove and return the oldest element.
    pub fn pop_oldest(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let item = self.slots[self.head].take();
        self.head = (self.head + 1) % self.capacity();
        self.len -= 1;
        item
    }

    /// Elements from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        let capacity = self.capacity();
        (0..self.len).filter_map(move |i| self.slots[(self.head + i) % capacity].as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_until_full() {
        let mut ring = RingBuffer::with_capacity(3);
        assert!(ring.is_empty());
        assert_eq!(ring.push(1), None);
        assert_eq!(ring.push(2), None);
        assert_eq!(ring.push(3), None);
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_evicts_oldest_when_full() {
        let mut ring = RingBuffer::with_capacity(2);
        ring.push('a');
        ring.push('b');
        assert_eq!(ring.push('c'), Some('a'));
        assert_eq!(ring.push('d'), Some('b'));
        assert_eq!(ring.iter().copied().collect::<String>(), "cd");
        assert_eq!(ring.capacity(), 2);
    }

    #[test]
    fn test_pop_oldest_wraps() {
        let mut ring = RingBuffer::with_capacity(2);
        ring.push(1);
        ring.push(2);
        ring.push(3);
        assert_eq!(ring.pop_oldest(), Some(2));
        ring.push(4);
        assert_eq!(ring.pop_oldest(), Some(3));
        assert_eq!(ring.pop_oldest(), Some(4));
        assert_eq!(ring.pop_oldest(), None);
    }

    #[test]
    fn test_zero_capacity() {
        let mut ring = RingBuffer::with_capacity(0);
        assert_eq!(ring.push(1), Some(1));
        assert!(ring.is_empty());
        assert_eq!(ring.pop_oldest(), None);
    }
}
