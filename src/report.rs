use chrono::{DateTime, Local};
use itertools::{Itertools, MinMaxResult};
use serde::Serialize;
use std::fmt;

use crate::clock::FinalMetrics;
use crate::metrics::{mean, std_dev};
use crate::time_series::TimeSeriesSample;
use crate::typing_session::ScoreAccumulator;

/// Everything the results surface needs once a session is over
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionReport {
    pub wpm: u32,
    pub accuracy: u32,
    pub duration_secs: u64,
    pub elapsed_secs: f64,
    pub total_words: f64,
    pub correct_characters: u64,
    pub total_typed_characters: u64,
    pub peak_wpm: u32,
    pub mean_wpm: f64,
    /// Standard deviation of the sampled wpm; lower is steadier
    pub consistency: f64,
    pub samples: Vec<TimeSeriesSample>,
    pub finished_at: DateTime<Local>,
}

/// Axis ranges for plotting wpm and accuracy on one chart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartBounds {
    pub x: [f64; 2],
    pub y: [f64; 2],
}

pub struct ResultsReporter;

impl ResultsReporter {
    pub fn report(
        metrics: &FinalMetrics,
        score: &ScoreAccumulator,
        samples: &[TimeSeriesSample],
        duration_secs: u64,
    ) -> SessionReport {
        let sampled_wpm: Vec<f64> = samples.iter().map(|s| s.wpm as f64).collect();

        SessionReport {
            wpm: metrics.wpm,
            accuracy: metrics.accuracy,
            duration_secs,
            elapsed_secs: metrics.elapsed.as_secs_f64(),
            total_words: score.total_words,
            correct_characters: score.correct_characters,
            total_typed_characters: score.total_typed_characters,
            peak_wpm: samples
                .iter()
                .map(|s| s.wpm)
                .chain([metrics.wpm])
                .max()
                .unwrap_or(metrics.wpm),
            mean_wpm: mean(&sampled_wpm).unwrap_or(metrics.wpm as f64),
            consistency: std_dev(&sampled_wpm).unwrap_or(0.0),
            samples: samples.to_vec(),
            finished_at: Local::now(),
        }
    }
}

impl SessionReport {
    pub fn wpm_points(&self) -> Vec<(f64, f64)> {
        self.samples.iter().map(TimeSeriesSample::wpm_point).collect()
    }

    pub fn accuracy_points(&self) -> Vec<(f64, f64)> {
        self.samples
            .iter()
            .map(TimeSeriesSample::accuracy_point)
            .collect()
    }

    pub fn chart_bounds(&self) -> ChartBounds {
        let x = match self.samples.iter().map(|s| s.elapsed_secs).minmax() {
            MinMaxResult::NoElements => [0.0, self.duration_secs as f64],
            MinMaxResult::OneElement(t) => [0.0, t.max(1) as f64],
            MinMaxResult::MinMax(lo, hi) => [lo as f64, hi as f64],
        };

        // accuracy shares the axis, so it always reaches at least 100
        let top = self.peak_wpm.max(100);
        let y = [0.0, (top.div_ceil(10) * 10) as f64];

        ChartBounds { x, y }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for SessionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} wpm   {}% acc   {:.2} sd",
            self.wpm, self.accuracy, self.consistency
        )?;
        writeln!(
            f,
            "peak {} wpm, {:.1} words, {}/{} chars correct in {}s",
            self.peak_wpm,
            self.total_words,
            self.correct_characters,
            self.total_typed_characters,
            self.duration_secs
        )?;
        if !self.samples.is_empty() {
            write!(
                f,
                "timeline: {}",
                self.samples
                    .iter()
                    .map(|s| format!("{}s {}wpm {}%", s.elapsed_secs, s.wpm, s.accuracy))
                    .join(", ")
            )?;
        }
        Ok(())
    }
}

/// Format an axis label without trailing zeros for whole numbers
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}
