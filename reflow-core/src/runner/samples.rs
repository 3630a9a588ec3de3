//! Bounded temperature time series
//!
//! Samples collected during a run for graphing. The buffer is a small
//! ring: the boards this runs on cannot afford an unbounded series, and
//! the UI only shows recent history anyway.

use heapless::Deque;

/// Maximum retained samples (oldest evicted first)
pub const SAMPLE_CAPACITY: usize = 50;

/// Minimum spacing between recorded samples (minutes, ~9 s)
pub const MIN_SAMPLE_SPACING_MIN: f32 = 0.15;

/// One temperature reading on the run timeline
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sample {
    /// Time since the run started (minutes)
    pub time_minutes: f32,
    /// Measured temperature (°C)
    pub temperature: f32,
}

/// Append-only bounded sample ring
#[derive(Debug, Default)]
pub struct SampleBuffer {
    samples: Deque<Sample, SAMPLE_CAPACITY>,
}

impl SampleBuffer {
    pub fn new() -> Self {
        Self {
            samples: Deque::new(),
        }
    }

    /// Record a sample if enough time has passed since the previous one
    ///
    /// Returns whether the sample was kept. When the buffer is full the
    /// oldest entry is dropped first.
    pub fn record(&mut self, time_minutes: f32, temperature: f32) -> bool {
        if let Some(last) = self.samples.back() {
            if time_minutes - last.time_minutes < MIN_SAMPLE_SPACING_MIN {
                return false;
            }
        }

        if self.samples.is_full() {
            let _ = self.samples.pop_front();
        }
        let _ = self.samples.push_back(Sample {
            time_minutes,
            temperature,
        });
        true
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples in chronological order
    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    /// Most recent sample, if any
    pub fn last(&self) -> Option<&Sample> {
        self.samples.back()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spacing_gate() {
        let mut buffer = SampleBuffer::new();

        assert!(buffer.record(0.0, 25.0));
        // Too soon after the previous sample
        assert!(!buffer.record(0.1, 26.0));
        assert!(buffer.record(0.15, 26.0));
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn keeps_most_recent_fifty() {
        let mut buffer = SampleBuffer::new();

        for i in 0..60 {
            assert!(buffer.record(i as f32 * 0.2, 25.0 + i as f32));
        }

        assert_eq!(buffer.len(), SAMPLE_CAPACITY);
        // The ten oldest were evicted
        let first = buffer.iter().next().unwrap();
        assert!((first.time_minutes - 2.0).abs() < 1e-6);
        assert_eq!(buffer.last().unwrap().temperature, 84.0);
    }

    #[test]
    fn clear_empties_buffer() {
        let mut buffer = SampleBuffer::new();
        buffer.record(0.0, 25.0);
        buffer.clear();
        assert!(buffer.is_empty());
        // After clearing, the spacing gate restarts
        assert!(buffer.record(0.01, 25.0));
    }
}
