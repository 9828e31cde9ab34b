//! Fixed-capacity sample history
//!
//! Stores the most recent `N` samples; pushing into a full history
//! overwrites the oldest one. Indexing is oldest-first so a renderer can
//! draw a sparkline left to right.

/// Ring buffer of the last `N` samples
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History<const N: usize> {
    samples: [u64; N],
    /// Slot the next sample is written to
    head: usize,
    len: usize,
}

impl<const N: usize> Default for History<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> History<N> {
    /// Create an empty history
    pub const fn new() -> Self {
        Self {
            samples: [0; N],
            head: 0,
            len: 0,
        }
    }

    /// Append a sample, overwriting the oldest one when full
    pub fn push(&mut self, sample: u64) {
        if N == 0 {
            return;
        }
        self.samples[self.head] = sample;
        self.head = (self.head + 1) % N;
        if self.len < N {
            self.len += 1;
        }
    }

    /// Number of stored samples
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Maximum number of samples kept
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Sample at `index`, where 0 is the oldest stored sample
    pub fn get(&self, index: usize) -> Option<u64> {
        if index >= self.len {
            return None;
        }
        let start = (self.head + N - self.len) % N;
        Some(self.samples[(start + index) % N])
    }

    /// Most recent sample
    pub fn latest(&self) -> Option<u64> {
        self.len.checked_sub(1).and_then(|i| self.get(i))
    }

    /// Largest stored sample (0 when empty), used to scale graphs
    pub fn peak(&self) -> u64 {
        self.iter().max().unwrap_or(0)
    }

    /// Iterate oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        (0..self.len).filter_map(move |i| self.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let history = History::<4>::new();
        assert!(history.is_empty());
        assert_eq!(history.get(0), None);
        assert_eq!(history.latest(), None);
        assert_eq!(history.peak(), 0);
    }

    #[test]
    fn test_push_below_capacity() {
        let mut history = History::<4>::new();
        history.push(10);
        history.push(20);
        assert_eq!(history.len(), 2);
        assert_eq!(history.get(0), Some(10));
        assert_eq!(history.get(1), Some(20));
        assert_eq!(history.latest(), Some(20));
    }

    #[test]
    fn test_overwrites_oldest() {
        let mut history = History::<3>::new();
        for sample in 1..=5 {
            history.push(sample);
        }
        assert_eq!(history.len(), 3);
        let mut collected = [0u64; 3];
        for (slot, sample) in collected.iter_mut().zip(history.iter()) {
            *slot = sample;
        }
        assert_eq!(collected, [3, 4, 5]);
        assert_eq!(history.peak(), 5);
    }

    #[test]
    fn test_sixty_sample_window() {
        let mut history = History::<60>::new();
        for sample in 0..100 {
            history.push(sample);
        }
        assert_eq!(history.len(), 60);
        assert_eq!(history.get(0), Some(40));
        assert_eq!(history.latest(), Some(99));
    }
}
