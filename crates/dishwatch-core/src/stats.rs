//! Series summaries and stability grading for the experiment commands.

use std::collections::BTreeSet;

use serde::Serialize;
use statrs::statistics::Statistics;

/// Summary of one numeric series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSummary {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Sample standard deviation; needs at least two samples.
    pub std_dev: Option<f64>,
    /// `std_dev / mean * 100`; absent when the mean is zero.
    pub coefficient_of_variation_pct: Option<f64>,
}

impl SeriesSummary {
    /// Summarize `samples`. Returns `None` for an empty series.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let mean = Statistics::mean(samples);
        let std_dev = (samples.len() > 1).then(|| Statistics::std_dev(samples));
        let coefficient_of_variation_pct = match std_dev {
            Some(sd) if mean != 0.0 => Some(sd / mean * 100.0),
            _ => None,
        };
        Some(Self {
            count: samples.len(),
            mean,
            min: Statistics::min(samples),
            max: Statistics::max(samples),
            std_dev,
            coefficient_of_variation_pct,
        })
    }
}

/// Three-step grade used for both variability and jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Low,
    Moderate,
    High,
}

/// Grade download variability by coefficient of variation (percent).
pub fn grade_variability(cv_pct: f64) -> Level {
    if cv_pct > 30.0 {
        Level::High
    } else if cv_pct > 15.0 {
        Level::Moderate
    } else {
        Level::Low
    }
}

/// Grade latency jitter by standard deviation (ms).
pub fn grade_jitter(jitter_ms: f64) -> Level {
    if jitter_ms > 20.0 {
        Level::High
    } else if jitter_ms > 10.0 {
        Level::Moderate
    } else {
        Level::Low
    }
}

/// Headline and advice lines for a variability grade.
pub fn variability_advice(level: Level) -> (&'static str, &'static str) {
    match level {
        Level::High => (
            "High download speed variability (CV > 30%)",
            "Your connection may not be suitable for consistent streaming",
        ),
        Level::Moderate => (
            "Moderate download speed variability (CV 15-30%)",
            "Occasional buffering may occur during video streaming",
        ),
        Level::Low => (
            "Low download speed variability (CV < 15%)",
            "Good for streaming and downloads",
        ),
    }
}

/// Headline and advice lines for a jitter grade.
pub fn jitter_advice(level: Level) -> (&'static str, &'static str) {
    match level {
        Level::High => (
            "High latency jitter (>20ms)",
            "May affect real-time applications (gaming, video calls)",
        ),
        Level::Moderate => (
            "Moderate latency jitter (10-20ms)",
            "Acceptable for most applications",
        ),
        Level::Low => (
            "Low latency jitter (<10ms)",
            "Excellent for real-time applications",
        ),
    }
}

/// Connection states seen over a run, sorted and de-duplicated.
pub fn distinct_states<'a, I>(states: I) -> BTreeSet<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    states.into_iter().collect()
}
