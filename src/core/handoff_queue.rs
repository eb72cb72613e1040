use parking_lot::Mutex;

/// A multi-producer, single-consumer handoff point between pipeline stages.
///
/// Workers only ever append. The owning thread only ever drains, swapping the
/// whole backlog out under the lock so the hold time does not depend on how
/// many items are waiting.
pub struct HandoffQueue<T> {
    items: Mutex<Vec<T>>,
}

impl<T> HandoffQueue<T> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
        }
    }

    /// Appends a single item.
    pub fn push(&self, item: T) {
        self.items.lock().push(item);
    }

    /// Appends every item of `items` under one lock acquisition.
    pub fn extend<I: IntoIterator<Item = T>>(&self, items: I) {
        self.items.lock().extend(items);
    }

    /// Removes and returns everything queued so far, oldest first.
    pub fn drain_all(&self) -> Vec<T> {
        std::mem::take(&mut *self.items.lock())
    }

    /// Number of items currently waiting.
    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    /// Returns `true` if nothing is waiting.
    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }
}

impl<T> Default for HandoffQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn drain_returns_items_in_push_order() {
        let queue = HandoffQueue::new();
        queue.push(1);
        queue.extend([2, 3]);
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.drain_all(), vec![1, 2, 3]);
        assert!(queue.is_empty());
    }

    #[test]
    fn concurrent_producers_lose_nothing() {
        let queue = Arc::new(HandoffQueue::new());
        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let queue = queue.clone();
                thread::spawn(move || {
                    for i in 0..100 {
                        queue.push(worker * 100 + i);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let mut drained = queue.drain_all();
        drained.sort_unstable();
        assert_eq!(drained, (0..400).collect::<Vec<_>>());
    }
}
