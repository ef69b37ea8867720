//! Message id allocation.

use std::collections::HashSet;

/// Hands out ids in `[1, id_max]` so that no two in-flight messages share one.
///
/// Fresh ids are taken in increasing order; once the range is used up, released ids are
/// recycled. Id `0` is never allocated and means "no request" in the client.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    id_max: u64,
    next: u64,
    free: Vec<u64>,
    in_flight: HashSet<u64>,
}

impl IdAllocator {
    /// Allocator for ids `1..=id_max`.
    pub fn new(id_max: u64) -> Self {
        Self {
            id_max,
            next: 1,
            free: Vec::new(),
            in_flight: HashSet::new(),
        }
    }

    /// Largest id this allocator hands out.
    pub fn id_max(&self) -> u64 {
        self.id_max
    }

    /// Reserve an id, or `None` if every id is in flight.
    pub fn allocate(&mut self) -> Option<u64> {
        let id = if self.next <= self.id_max {
            self.next += 1;
            self.next - 1
        } else {
            self.free.pop()?
        };
        self.in_flight.insert(id);
        Some(id)
    }

    /// Return `id` to the pool. Returns `false` if it was not in flight.
    pub fn release(&mut self, id: u64) -> bool {
        if self.in_flight.remove(&id) {
            self.free.push(id);
            true
        } else {
            false
        }
    }

    /// Release every in-flight id.
    pub fn release_all(&mut self) {
        self.free.extend(self.in_flight.drain());
    }

    /// Whether `id` is waiting for a response.
    pub fn is_in_flight(&self, id: u64) -> bool {
        self.in_flight.contains(&id)
    }

    /// Number of ids waiting for a response.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_while_in_flight() {
        let mut ids = IdAllocator::new(3);
        let taken: Vec<u64> = (0..3).filter_map(|_| ids.allocate()).collect();
        assert_eq!(taken, vec![1, 2, 3]);
        assert_eq!(ids.allocate(), None);

        assert!(ids.release(2));
        assert!(!ids.release(2));
        assert_eq!(ids.allocate(), Some(2));
        assert_eq!(ids.allocate(), None);
    }

    #[test]
    fn test_release_all() {
        let mut ids = IdAllocator::new(2);
        ids.allocate();
        ids.allocate();
        ids.release_all();
        assert_eq!(ids.in_flight(), 0);

        let mut again = vec![ids.allocate().unwrap(), ids.allocate().unwrap()];
        again.sort();
        assert_eq!(again, vec![1, 2]);
    }

    #[test]
    fn test_unknown_release_is_ignored() {
        let mut ids = IdAllocator::new(5);
        assert!(!ids.release(0));
        assert!(!ids.release(4));
        assert_eq!(ids.allocate(), Some(1));
        assert!(ids.is_in_flight(1));
    }
}
