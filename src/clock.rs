use log::{debug, info};
use std::time::{Duration, Instant};

use crate::metrics::{accuracy_percent, words_per_minute};
use crate::session::{SessionConfig, SessionState};
use crate::time_series::TimeSeriesSample;
use crate::typing_session::ScoreAccumulator;

/// Period of the countdown tick
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// What the display surface gets on every tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveMetrics {
    pub elapsed_secs: u64,
    pub remaining_secs: u64,
    pub wpm: u32,
    pub accuracy: u32,
}

/// Metrics computed once, when time runs out
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinalMetrics {
    pub elapsed: Duration,
    pub wpm: u32,
    pub accuracy: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClockEvent {
    Tick(LiveMetrics),
    Finished(FinalMetrics),
}

/// Countdown for one session: owns the tick schedule, the sampled history and
/// the Running -> Finished transition.
///
/// The clock never reads the system time itself. Callers pass `now` in, which
/// keeps it deterministic under test.
#[derive(Debug, Clone)]
pub struct SessionClock {
    duration_secs: u64,
    sample_interval_secs: u64,
    state: SessionState,
    started_at: Option<Instant>,
    next_tick: Option<Instant>,
    history: Vec<TimeSeriesSample>,
    live: Option<LiveMetrics>,
}

impl SessionClock {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            duration_secs: config.duration_secs,
            sample_interval_secs: config.sample_interval_secs,
            state: SessionState::Idle,
            started_at: None,
            next_tick: None,
            history: Vec::new(),
            live: None,
        }
    }

    /// Begin counting down. Only an idle clock can be started.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.state != SessionState::Idle {
            return false;
        }
        self.state = SessionState::Running;
        self.started_at = Some(now);
        self.next_tick = Some(now + TICK_INTERVAL);
        self.history.clear();
        self.live = None;
        info!("session started, {}s on the clock", self.duration_secs);
        true
    }

    /// Drop the tick schedule; later polls do nothing.
    pub fn cancel(&mut self) {
        if self.next_tick.take().is_some() {
            debug!("tick schedule cancelled");
        }
    }

    /// Cancel and return to a fresh idle clock for `config`.
    pub fn reset(&mut self, config: &SessionConfig) {
        self.cancel();
        *self = Self::new(config);
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    pub fn history(&self) -> &[TimeSeriesSample] {
        &self.history
    }

    /// Latest tick published, if any
    pub fn live(&self) -> Option<LiveMetrics> {
        self.live
    }

    pub fn next_tick_at(&self) -> Option<Instant> {
        self.next_tick
    }

    /// Whole seconds left, as shown by the countdown
    pub fn remaining_secs(&self) -> u64 {
        match (self.state, self.live) {
            (SessionState::Finished, _) => 0,
            (_, Some(live)) => live.remaining_secs,
            (_, None) => self.duration_secs,
        }
    }

    /// Fire the pending tick if it is due.
    pub fn poll(&mut self, now: Instant, score: &ScoreAccumulator) -> Option<ClockEvent> {
        let due = self.next_tick?;
        if now < due {
            return None;
        }
        self.tick(now, score)
    }

    fn tick(&mut self, now: Instant, score: &ScoreAccumulator) -> Option<ClockEvent> {
        let started_at = self.started_at?;
        let elapsed = now.saturating_duration_since(started_at);
        let elapsed_secs = elapsed.as_secs();

        if elapsed_secs >= self.duration_secs {
            return Some(ClockEvent::Finished(self.finish(elapsed, score)));
        }

        let live = LiveMetrics {
            elapsed_secs,
            remaining_secs: self.duration_secs - elapsed_secs,
            wpm: words_per_minute(elapsed_secs as f64, score.total_words),
            accuracy: accuracy_percent(score.correct_characters, score.total_typed_characters),
        };
        self.live = Some(live);

        let is_new_second = self
            .history
            .last()
            .map_or(true, |last| last.elapsed_secs < elapsed_secs);
        if elapsed_secs % self.sample_interval_secs == 0 && is_new_second {
            self.history.push(TimeSeriesSample::new(
                elapsed_secs,
                live.wpm,
                live.accuracy,
            ));
        }

        self.next_tick = Some(started_at + Duration::from_secs(elapsed_secs + 1));
        Some(ClockEvent::Tick(live))
    }

    fn finish(&mut self, elapsed: Duration, score: &ScoreAccumulator) -> FinalMetrics {
        self.cancel();
        self.state = SessionState::Finished;

        let metrics = FinalMetrics {
            elapsed,
            wpm: words_per_minute(elapsed.as_secs_f64(), score.total_words),
            accuracy: accuracy_percent(score.correct_characters, score.total_typed_characters),
        };
        info!(
            "session finished after {:.2}s: {} wpm, {}% accuracy, {} samples",
            elapsed.as_secs_f64(),
            metrics.wpm,
            metrics.accuracy,
            self.history.len()
        );
        metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn clock(duration_secs: u64) -> SessionClock {
        SessionClock::new(&SessionConfig::new(duration_secs).unwrap())
    }

    fn score(words: f64, correct: u64, total: u64) -> ScoreAccumulator {
        ScoreAccumulator {
            correct_characters: correct,
            total_typed_characters: total,
            total_words: words,
        }
    }

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn test_new_clock_is_idle() {
        let c = clock(30);

        assert_eq!(c.state(), SessionState::Idle);
        assert_eq!(c.remaining_secs(), 30);
        assert!(c.next_tick_at().is_none());
        assert!(c.history().is_empty());
    }

    #[test]
    fn test_poll_before_start_does_nothing() {
        let mut c = clock(30);
        assert!(c.poll(Instant::now(), &score(0.0, 0, 0)).is_none());
    }

    #[test]
    fn test_start_schedules_first_tick() {
        let mut c = clock(30);
        let t0 = Instant::now();

        assert!(c.start(t0));
        assert!(!c.start(t0));

        assert_eq!(c.state(), SessionState::Running);
        assert_eq!(c.next_tick_at(), Some(t0 + secs(1)));
        assert!(c.poll(t0 + Duration::from_millis(999), &score(0.0, 0, 0)).is_none());
    }

    #[test]
    fn test_tick_publishes_live_metrics() {
        let mut c = clock(30);
        let t0 = Instant::now();
        c.start(t0);

        let event = c.poll(t0 + secs(1), &score(1.0, 3, 4));

        assert_eq!(
            event,
            Some(ClockEvent::Tick(LiveMetrics {
                elapsed_secs: 1,
                remaining_secs: 29,
                wpm: 60,
                accuracy: 75,
            }))
        );
        assert_eq!(c.remaining_secs(), 29);
        // 1 is not a multiple of the 2 second interval
        assert!(c.history().is_empty());
    }

    #[test]
    fn test_samples_on_interval_only() {
        let mut c = clock(30);
        let t0 = Instant::now();
        c.start(t0);

        for n in 1..=6 {
            c.poll(t0 + secs(n), &score(n as f64, n, n));
        }

        let elapsed: Vec<u64> = c.history().iter().map(|s| s.elapsed_secs).collect();
        assert_eq!(elapsed, vec![2, 4, 6]);
        assert!(c.history().iter().all(|s| s.wpm == 60 && s.accuracy == 100));
    }

    #[test]
    fn test_custom_sample_interval() {
        let config = SessionConfig::new(30)
            .and_then(|c| c.with_sample_interval(3))
            .unwrap();
        let mut c = SessionClock::new(&config);
        let t0 = Instant::now();
        c.start(t0);

        for n in 1..=7 {
            c.poll(t0 + secs(n), &score(0.0, 0, 0));
        }

        let elapsed: Vec<u64> = c.history().iter().map(|s| s.elapsed_secs).collect();
        assert_eq!(elapsed, vec![3, 6]);
    }

    #[test]
    fn test_late_poll_does_not_duplicate_samples() {
        let mut c = clock(30);
        let t0 = Instant::now();
        c.start(t0);

        c.poll(t0 + secs(2), &score(0.0, 0, 0));
        // next tick is at 3s, so a jittery poll inside second 2 is ignored
        assert!(c
            .poll(t0 + Duration::from_millis(2_900), &score(0.0, 0, 0))
            .is_none());
        // a poll long after skips straight to the current second
        c.poll(t0 + Duration::from_millis(4_500), &score(0.0, 0, 0));

        let elapsed: Vec<u64> = c.history().iter().map(|s| s.elapsed_secs).collect();
        assert_eq!(elapsed, vec![2, 4]);
        assert_eq!(c.next_tick_at(), Some(t0 + secs(5)));
    }

    #[test]
    fn test_finishes_when_time_is_up() {
        let mut c = clock(15);
        let t0 = Instant::now();
        c.start(t0);

        let event = c.poll(t0 + secs(15), &score(10.0, 45, 50));

        assert_matches!(
            event,
            Some(ClockEvent::Finished(FinalMetrics { wpm: 40, accuracy: 90, .. }))
        );
        assert_eq!(c.state(), SessionState::Finished);
        assert_eq!(c.remaining_secs(), 0);
        assert!(c.next_tick_at().is_none());
        assert!(c.poll(t0 + secs(16), &score(10.0, 45, 50)).is_none());
    }

    #[test]
    fn test_final_wpm_uses_exact_elapsed_time() {
        let mut c = clock(60);
        let t0 = Instant::now();
        c.start(t0);

        let event = c.poll(t0 + Duration::from_millis(60_000), &score(40.0, 0, 0));
        assert_matches!(
            event,
            Some(ClockEvent::Finished(FinalMetrics { wpm: 40, .. }))
        );

        let mut c = clock(60);
        c.start(t0);
        // 40 words over 80s would be 30 wpm; a truncated minute would say 40
        let event = c.poll(t0 + Duration::from_millis(80_000), &score(40.0, 0, 0));
        assert_matches!(
            event,
            Some(ClockEvent::Finished(FinalMetrics { wpm: 30, .. }))
        );
    }

    #[test]
    fn test_cancel_stops_ticks() {
        let mut c = clock(30);
        let t0 = Instant::now();
        c.start(t0);

        c.cancel();

        assert!(c.poll(t0 + secs(5), &score(0.0, 0, 0)).is_none());
        assert_eq!(c.state(), SessionState::Running);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut c = clock(30);
        let t0 = Instant::now();
        c.start(t0);
        c.poll(t0 + secs(2), &score(1.0, 1, 1));
        assert_eq!(c.history().len(), 1);

        c.reset(&SessionConfig::new(60).unwrap());

        assert_eq!(c.state(), SessionState::Idle);
        assert_eq!(c.duration_secs(), 60);
        assert!(c.history().is_empty());
        assert!(c.live().is_none());
        assert!(c.poll(t0 + secs(3), &score(1.0, 1, 1)).is_none());
    }
}
