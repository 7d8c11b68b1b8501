use std::collections::VecDeque;

/// Rolling history of samples for sparkline rendering.
///
/// Holds at most `capacity` values in insertion order; appending to a full
/// buffer evicts the oldest value first. Values are stored as-is, including
/// NaN and infinities.
#[derive(Debug, Clone, PartialEq)]
pub struct RollingBuffer<T = f64> {
    samples:  VecDeque<T>,
    capacity: usize,
}

impl<T: Clone> RollingBuffer<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a new sample, evicting the oldest if at capacity.
    pub fn push(&mut self, value: T) {
        if self.capacity == 0 {
            return;
        }
        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    /// Return a new buffer with `value` appended; `self` is left untouched.
    #[must_use]
    pub fn pushed(&self, value: T) -> Self {
        let mut next = self.clone();
        next.push(value);
        next
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() >= self.capacity
    }

    /// Most recent sample, if any.
    pub fn latest(&self) -> Option<&T> {
        self.samples.back()
    }

    /// Oldest-to-newest iteration.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &T> + Clone + '_ {
        self.samples.iter()
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.samples.iter().cloned().collect()
    }
}

impl RollingBuffer<f64> {
    /// Mean of the finite samples in the window, or `None` if there are none.
    pub fn average(&self) -> Option<f64> {
        let (sum, count) = self
            .samples
            .iter()
            .filter(|v| v.is_finite())
            .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
        (count > 0).then(|| sum / count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_is_min_of_appends_and_capacity() {
        for n in [0usize, 1, 5, 10, 11, 37] {
            let mut buf = RollingBuffer::new(10);
            for i in 0..n {
                buf.push(i as f64);
            }
            assert_eq!(buf.len(), n.min(10));
            let expected: Vec<f64> = (n.saturating_sub(10)..n).map(|i| i as f64).collect();
            assert_eq!(buf.to_vec(), expected);
        }
    }

    #[test]
    fn pushed_leaves_full_input_untouched() {
        let mut full = RollingBuffer::new(3);
        for v in [1.0, 2.0, 3.0] {
            full.push(v);
        }
        let next = full.pushed(4.0);

        assert_eq!(full.to_vec(), vec![1.0, 2.0, 3.0]);
        assert_eq!(next.to_vec(), vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn evicts_oldest_once_capacity_is_exceeded() {
        let mut buf = RollingBuffer::new(120);
        buf.push(70.0);
        buf.push(71.5);
        assert_eq!(buf.to_vec(), vec![70.0, 71.5]);

        for i in 0..118 {
            buf.push(100.0 + i as f64);
        }
        assert_eq!(buf.len(), 120);
        assert_eq!(buf.iter().next(), Some(&70.0));

        buf.push(999.0);
        assert_eq!(buf.len(), 120);
        assert_eq!(buf.iter().next(), Some(&71.5));
        assert_eq!(buf.latest(), Some(&999.0));
    }

    #[test]
    fn stores_non_finite_values_as_is() {
        let buf = RollingBuffer::new(4).pushed(f64::NAN).pushed(f64::INFINITY);
        let v = buf.to_vec();
        assert!(v[0].is_nan());
        assert_eq!(v[1], f64::INFINITY);
    }

    #[test]
    fn zero_capacity_stays_empty() {
        let mut buf = RollingBuffer::new(0);
        buf.push(1.0);
        assert!(buf.is_empty());
        assert!(buf.is_full());
    }

    #[test]
    fn average_of_window() {
        let buf = RollingBuffer::new(2).pushed(1.0).pushed(2.0).pushed(4.0);
        assert_eq!(buf.average(), Some(3.0));
        assert_eq!(RollingBuffer::<f64>::new(2).average(), None);
    }

    #[test]
    fn average_skips_non_finite_samples() {
        let buf = RollingBuffer::new(4).pushed(2.0).pushed(f64::NAN).pushed(4.0);
        assert_eq!(buf.average(), Some(3.0));
        assert_eq!(RollingBuffer::new(1).pushed(f64::INFINITY).average(), None);
    }
}
