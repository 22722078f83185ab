//! Stateful preprocessing for noisy sensor readings
//!
//! Room-temperature probes bounce. Before a reading reaches a host widget it
//! can be smoothed and rate-limited by a chain of preprocessors: each stage
//! either transforms the sample or suppresses it entirely, and a suppressed
//! sample leaves the previously displayed value in place.
//!
//! Stage order matters. Averaging before debouncing means the debounce
//! decision is made on the smoothed value, so one outlier can neither force
//! nor block an update.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// One stage of the pipeline.
#[derive(Debug, Clone)]
pub enum Preprocessor {
    /// Arithmetic mean over a ring of the most recent samples. Emits on
    /// every call, using however many samples have arrived so far.
    MovingAverage {
        window: usize,
        samples: VecDeque<f64>,
    },
    /// Suppresses emission until `min_interval` has elapsed since the last
    /// one. The first sample ever seen always passes.
    Debounce {
        min_interval: Duration,
        last_emit: Option<Instant>,
    },
}

impl Preprocessor {
    /// Moving average over the last `window` samples.
    pub fn moving_average(window: usize) -> Self {
        Self::MovingAverage {
            window: window.max(1),
            samples: VecDeque::new(),
        }
    }

    /// Debounce with the given minimum interval between emissions.
    pub fn debounce(min_interval: Duration) -> Self {
        Self::Debounce {
            min_interval,
            last_emit: None,
        }
    }

    /// Feed one sample, returning the stage's emission if any.
    pub fn feed(&mut self, sample: f64) -> Option<f64> {
        match self {
            Preprocessor::MovingAverage { window, samples } => {
                if samples.len() == *window {
                    samples.pop_front();
                }
                samples.push_back(sample);
                Some(samples.iter().sum::<f64>() / samples.len() as f64)
            }
            Preprocessor::Debounce {
                min_interval,
                last_emit,
            } => {
                let now = Instant::now();
                match last_emit {
                    Some(last) if now.duration_since(*last) < *min_interval => None,
                    _ => {
                        *last_emit = Some(now);
                        Some(sample)
                    }
                }
            }
        }
    }
}

/// Ordered chain of preprocessors; a stage returning `None` short-circuits.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    stages: Vec<Preprocessor>,
}

impl Pipeline {
    pub fn new(stages: impl IntoIterator<Item = Preprocessor>) -> Self {
        Self {
            stages: stages.into_iter().collect(),
        }
    }

    /// Whether the pipeline has any stages at all.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run one sample through every stage in order.
    pub fn feed(&mut self, sample: f64) -> Option<f64> {
        self.stages
            .iter_mut()
            .try_fold(sample, |value, stage| stage.feed(value))
    }
}

/// Declarative pipeline configuration for the temperature sensor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Moving-average window size; absent disables smoothing.
    #[serde(default)]
    pub moving_average: Option<usize>,
    /// Minimum interval between displayed updates; absent disables it.
    #[serde(default, with = "humantime_serde::option")]
    pub debounce: Option<Duration>,
}

impl FilterConfig {
    /// Build the pipeline, smoothing first so debounce sees clean values.
    pub fn build(&self) -> Pipeline {
        let mut stages = Vec::new();
        if let Some(window) = self.moving_average {
            stages.push(Preprocessor::moving_average(window));
        }
        if let Some(interval) = self.debounce {
            stages.push(Preprocessor::debounce(interval));
        }
        Pipeline::new(stages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_moving_average_partial_window() {
        let mut avg = Preprocessor::moving_average(3);
        assert_eq!(avg.feed(10.0), Some(10.0));
        assert_eq!(avg.feed(20.0), Some(15.0));
        assert_eq!(avg.feed(30.0), Some(20.0));
        // Ring is full, the oldest sample falls out.
        assert_eq!(avg.feed(40.0), Some(30.0));
    }

    #[test]
    fn test_debounce_first_call_emits() {
        let mut debounce = Preprocessor::debounce(Duration::from_secs(60));
        assert_eq!(debounce.feed(21.5), Some(21.5));
        // Second sample arrives immediately and is suppressed.
        assert_eq!(debounce.feed(22.0), None);
    }

    #[test]
    fn test_debounce_emits_after_interval() {
        let mut debounce = Preprocessor::debounce(Duration::ZERO);
        assert_eq!(debounce.feed(21.5), Some(21.5));
        assert_eq!(debounce.feed(22.0), Some(22.0));
    }

    #[test]
    fn test_pipeline_average_then_debounce() {
        let mut pipeline = Pipeline::new([
            Preprocessor::moving_average(2),
            Preprocessor::debounce(Duration::from_secs(60)),
        ]);
        // First sample passes both stages.
        assert_eq!(pipeline.feed(20.0), Some(20.0));
        // Smoothed but suppressed by the debounce stage.
        assert_eq!(pipeline.feed(30.0), None);
    }

    #[test]
    fn test_empty_pipeline_is_identity() {
        let mut pipeline = Pipeline::default();
        assert_eq!(pipeline.feed(19.5), Some(19.5));
    }

    #[test]
    fn test_config_builds_configured_stages() {
        let config = FilterConfig {
            moving_average: Some(5),
            debounce: Some(Duration::from_secs(30)),
        };
        let pipeline = config.build();
        assert!(!pipeline.is_empty());
        assert!(FilterConfig::default().build().is_empty());
    }
}
