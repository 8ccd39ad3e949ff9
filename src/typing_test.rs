use log::info;
use std::time::Instant;

use crate::clock::{ClockEvent, LiveMetrics, SessionClock};
use crate::error::ConfigurationError;
use crate::report::{ResultsReporter, SessionReport};
use crate::session::{SessionConfig, SessionState, DURATION_OPTIONS};
use crate::typing_session::{InputChange, RenderModel, ScoreAccumulator, TypingSession};
use crate::word_source::WordSource;

/// A complete timed typing test: one session, its clock, and the results once
/// time runs out. Front ends drive it entirely through method calls.
#[derive(Debug)]
pub struct TypingTest<S: WordSource> {
    config: SessionConfig,
    pending_duration: Option<u64>,
    session: TypingSession<S>,
    clock: SessionClock,
    report: Option<SessionReport>,
}

impl<S: WordSource> TypingTest<S> {
    pub fn new(config: SessionConfig, source: S) -> Self {
        Self {
            session: TypingSession::new(&config, source),
            clock: SessionClock::new(&config),
            config,
            pending_duration: None,
            report: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.clock.state()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Duration chosen while running, applied on the next restart
    pub fn pending_duration(&self) -> Option<u64> {
        self.pending_duration
    }

    pub fn session(&self) -> &TypingSession<S> {
        &self.session
    }

    pub fn clock(&self) -> &SessionClock {
        &self.clock
    }

    pub fn score(&self) -> &ScoreAccumulator {
        self.session.score()
    }

    pub fn current_word(&self) -> &str {
        self.session.current_word()
    }

    pub fn render_model(&self) -> RenderModel {
        self.session.render_model()
    }

    pub fn live_metrics(&self) -> Option<LiveMetrics> {
        self.clock.live()
    }

    pub fn report(&self) -> Option<&SessionReport> {
        self.report.as_ref()
    }

    pub fn duration_options() -> &'static [u64] {
        &DURATION_OPTIONS
    }

    /// Feed one raw input buffer mutation. Returns `None` once the test is
    /// finished and input is disabled.
    pub fn apply_input_change(
        &mut self,
        previous_len: usize,
        buffer: &str,
        now: Instant,
    ) -> Option<InputChange> {
        if self.state() == SessionState::Finished {
            return None;
        }

        let change = self.session.apply_input_change(previous_len, buffer);
        if change.started {
            self.clock.start(now);
        }
        Some(change)
    }

    /// Drive the countdown; call at least once per tick interval.
    pub fn on_tick(&mut self, now: Instant) -> Option<ClockEvent> {
        let event = self.clock.poll(now, self.session.score())?;

        if let ClockEvent::Finished(metrics) = event {
            self.report = Some(ResultsReporter::report(
                &metrics,
                self.session.score(),
                self.clock.history(),
                self.config.duration_secs,
            ));
        }
        Some(event)
    }

    /// Select a new duration. Takes effect immediately unless a session is
    /// running, in which case it waits for the next restart. Returns whether
    /// the test was reinitialized.
    pub fn on_duration_selected(&mut self, duration_secs: u64) -> Result<bool, ConfigurationError> {
        let config = SessionConfig::new(duration_secs)?
            .with_sample_interval(self.config.sample_interval_secs)?
            .with_batch_size(self.config.batch_size)?;

        if self.state() == SessionState::Running {
            info!("duration {duration_secs}s queued until restart");
            self.pending_duration = Some(duration_secs);
            return Ok(false);
        }

        self.config = config;
        self.pending_duration = None;
        self.reinitialize();
        Ok(true)
    }

    /// Abandon the current session and start over from idle.
    pub fn on_restart(&mut self) {
        if let Some(duration_secs) = self.pending_duration.take() {
            self.config.duration_secs = duration_secs;
        }
        self.reinitialize();
    }

    fn reinitialize(&mut self) {
        // the tick schedule must be gone before any state is reset
        self.clock.cancel();
        self.clock.reset(&self.config);
        self.session.reset(&self.config);
        self.report = None;
        info!("session reset, duration {}s", self.config.duration_secs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::word_source::PromptWordSource;
    use assert_matches::assert_matches;
    use std::time::Duration;

    fn typing_test(duration_secs: u64) -> TypingTest<PromptWordSource> {
        TypingTest::new(
            SessionConfig::new(duration_secs).unwrap(),
            PromptWordSource::new("the cat sat on the mat").unwrap(),
        )
    }

    #[test]
    fn test_starts_idle() {
        let t = typing_test(30);

        assert_eq!(t.state(), SessionState::Idle);
        assert_eq!(t.current_word(), "the");
        assert!(t.report().is_none());
        assert_eq!(TypingTest::<PromptWordSource>::duration_options(), &[15, 30, 60, 120]);
    }

    #[test]
    fn test_first_keystroke_starts_clock() {
        let mut t = typing_test(30);
        let t0 = Instant::now();

        let change = t.apply_input_change(0, "t", t0).unwrap();

        assert!(change.started);
        assert_eq!(t.state(), SessionState::Running);
        assert_eq!(t.clock().next_tick_at(), Some(t0 + Duration::from_secs(1)));
    }

    #[test]
    fn test_tick_before_start_is_ignored() {
        let mut t = typing_test(30);
        assert!(t.on_tick(Instant::now() + Duration::from_secs(5)).is_none());
        assert_eq!(t.state(), SessionState::Idle);
    }

    #[test]
    fn test_finish_produces_report_and_disables_input() {
        let mut t = typing_test(15);
        let t0 = Instant::now();
        t.apply_input_change(0, "the ", t0);

        let event = t.on_tick(t0 + Duration::from_secs(15));

        assert_matches!(event, Some(ClockEvent::Finished(_)));
        assert_eq!(t.state(), SessionState::Finished);
        let report = t.report().unwrap();
        assert_eq!(report.wpm, 4);
        assert_eq!(report.accuracy, 75);

        assert!(t.apply_input_change(0, "c", t0).is_none());
        assert_eq!(t.score().total_typed_characters, 4);
    }

    #[test]
    fn test_duration_change_while_idle_reinitializes() {
        let mut t = typing_test(30);

        assert!(t.on_duration_selected(60).unwrap());

        assert_eq!(t.config().duration_secs, 60);
        assert_eq!(t.clock().duration_secs(), 60);
        assert_eq!(t.clock().remaining_secs(), 60);
    }

    #[test]
    fn test_duration_change_while_running_waits_for_restart() {
        let mut t = typing_test(30);
        let t0 = Instant::now();
        t.apply_input_change(0, "t", t0);

        assert!(!t.on_duration_selected(120).unwrap());

        assert_eq!(t.state(), SessionState::Running);
        assert_eq!(t.config().duration_secs, 30);
        assert_eq!(t.pending_duration(), Some(120));

        t.on_restart();

        assert_eq!(t.config().duration_secs, 120);
        assert_eq!(t.pending_duration(), None);
        assert_eq!(t.state(), SessionState::Idle);
    }

    #[test]
    fn test_invalid_duration_rejected() {
        let mut t = typing_test(30);
        assert_matches!(
            t.on_duration_selected(0),
            Err(ConfigurationError::InvalidDuration(0))
        );
        assert_eq!(t.config().duration_secs, 30);
    }

    #[test]
    fn test_restart_cancels_pending_tick() {
        let mut t = typing_test(30);
        let t0 = Instant::now();
        t.apply_input_change(0, "th", t0);
        t.on_tick(t0 + Duration::from_secs(2));
        assert_eq!(t.clock().history().len(), 1);

        t.on_restart();

        assert_eq!(t.state(), SessionState::Idle);
        assert!(t.clock().next_tick_at().is_none());
        assert!(t.on_tick(t0 + Duration::from_secs(3)).is_none());
        assert!(t.clock().history().is_empty());
        assert_eq!(*t.score(), ScoreAccumulator::default());
    }

    #[test]
    fn test_restart_after_finish_enables_input() {
        let mut t = typing_test(15);
        let t0 = Instant::now();
        t.apply_input_change(0, "t", t0);
        t.on_tick(t0 + Duration::from_secs(15));
        assert_eq!(t.state(), SessionState::Finished);

        t.on_restart();

        assert!(t.report().is_none());
        let t1 = t0 + Duration::from_secs(20);
        let change = t.apply_input_change(0, "c", t1).unwrap();
        assert!(change.started);
        assert_eq!(t.state(), SessionState::Running);
    }
}
