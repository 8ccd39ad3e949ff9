//! Speed and accuracy formulas. Everything here is a pure function of the
//! counters handed in, so callers can sample them at any time.

/// Round to the nearest integer, halves going up.
fn round_half_up(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        (value + 0.5).floor() as u32
    } else {
        0
    }
}

/// Words per minute over `elapsed_secs`; zero until any time has passed.
pub fn words_per_minute(elapsed_secs: f64, total_words: f64) -> u32 {
    if elapsed_secs > 0.0 {
        round_half_up(total_words / (elapsed_secs / 60.0))
    } else {
        0
    }
}

/// Share of typed characters that were correct, as a whole percentage.
pub fn accuracy_percent(correct: u64, total: u64) -> u32 {
    if total > 0 {
        round_half_up(100.0 * correct as f64 / total as f64)
    } else {
        0
    }
}

pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        None
    } else {
        Some(data.iter().sum::<f64>() / data.len() as f64)
    }
}

/// Population standard deviation, used as a consistency score for samples.
pub fn std_dev(data: &[f64]) -> Option<f64> {
    let data_mean = mean(data)?;
    let variance = data
        .iter()
        .map(|value| {
            let diff = data_mean - value;
            diff * diff
        })
        .sum::<f64>()
        / data.len() as f64;

    Some(variance.sqrt())
}
