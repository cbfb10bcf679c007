use crate::model::Reading;
use std::collections::VecDeque;

/// Fixed-capacity FIFO of readings, oldest first
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    entries: VecDeque<Reading>,
    capacity: usize,
}

impl HistoryBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a reading. Returns the evicted entry when the buffer was full.
    pub fn push(&mut self, reading: Reading) -> Option<Reading> {
        let evicted = if self.entries.len() >= self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(reading);
        evicted
    }

    /// The last `limit` entries, still oldest first
    pub fn latest(&self, limit: usize) -> Vec<Reading> {
        let skip = self.entries.len().saturating_sub(limit);
        self.entries.iter().skip(skip).cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reading> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries = VecDeque::with_capacity(self.capacity);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DevicePayload, Status};
    use chrono::{Duration, TimeZone, Utc};

    fn reading(n: i64) -> Reading {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Reading::stamp(
            DevicePayload {
                temp: (n as f64).into(),
                hum: 50.0.into(),
                soil: 40.0.into(),
                status: Status::Safe,
            },
            base + Duration::seconds(n),
        )
    }

    #[test]
    fn test_push_below_capacity() {
        let mut buffer = HistoryBuffer::new(3);
        assert!(buffer.push(reading(1)).is_none());
        assert!(buffer.push(reading(2)).is_none());
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn test_fifo_eviction() {
        let mut buffer = HistoryBuffer::new(3);
        for n in 1..=3 {
            buffer.push(reading(n));
        }

        let evicted = buffer.push(reading(4)).unwrap();
        assert_eq!(evicted, reading(1));
        assert_eq!(buffer.len(), 3);

        let temps: Vec<f64> = buffer.iter().filter_map(|r| r.temp.as_f64()).collect();
        assert_eq!(temps, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_capacity_invariant() {
        let mut buffer = HistoryBuffer::new(1000);
        for n in 0..2500 {
            buffer.push(reading(n));
            assert!(buffer.len() <= 1000);
        }

        assert_eq!(buffer.len(), 1000);
        let expected: Vec<Reading> = (1500..2500).map(reading).collect();
        assert_eq!(buffer.latest(1000), expected);
    }

    #[test]
    fn test_latest() {
        let mut buffer = HistoryBuffer::new(10);
        for n in 0..5 {
            buffer.push(reading(n));
        }

        assert_eq!(buffer.latest(2), vec![reading(3), reading(4)]);
        assert_eq!(buffer.latest(100).len(), 5);
        assert!(buffer.latest(0).is_empty());
    }

    #[test]
    fn test_clear() {
        let mut buffer = HistoryBuffer::new(4);
        buffer.push(reading(1));
        buffer.clear();

        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), 4);
    }

    #[test]
    fn test_random_workload_keeps_newest() {
        use rand::Rng;
        let mut rng = rand::thread_rng();

        for _ in 0..20 {
            let capacity = rng.gen_range(1..64);
            let pushes = rng.gen_range(0..256);
            let mut buffer = HistoryBuffer::new(capacity);
            for n in 0..pushes {
                buffer.push(reading(n));
            }

            let kept = (pushes as usize).min(capacity);
            assert_eq!(buffer.len(), kept);
            let expected: Vec<Reading> = (pushes - kept as i64..pushes).map(reading).collect();
            assert_eq!(buffer.latest(capacity), expected);
        }
    }

    #[test]
    fn test_zero_capacity_is_raised() {
        let mut buffer = HistoryBuffer::new(0);
        buffer.push(reading(1));
        buffer.push(reading(2));
        assert_eq!(buffer.latest(5), vec![reading(2)]);
    }
}
