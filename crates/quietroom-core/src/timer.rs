//! Focus/break session timer.
//!
//! A four-phase state machine advanced by simulated tick deltas, never by a
//! wall clock: Idle, Focus (counting down a work session), Paused (a frozen
//! Focus session), and Break. Completion is reported once from [`SessionTimer::tick`]
//! and the timer returns to Idle.

use serde::{Deserialize, Serialize};

/// Default focus session length in minutes.
pub const DEFAULT_FOCUS_MINUTES: u32 = 25;

/// Default short break length in minutes.
pub const DEFAULT_BREAK_MINUTES: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerPhase {
    Idle,
    Focus,
    Paused,
    Break,
}

/// Which kind of session just completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionKind {
    Focus,
    Break,
}

/// Countdown timer for focus sessions and breaks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionTimer {
    phase: TimerPhase,
    remaining_seconds: f32,
    total_seconds: f32,
}

impl Default for SessionTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionTimer {
    pub fn new() -> Self {
        let total = (DEFAULT_FOCUS_MINUTES * 60) as f32;
        SessionTimer {
            phase: TimerPhase::Idle,
            remaining_seconds: total,
            total_seconds: total,
        }
    }

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    /// Seconds left, rounded up for display.
    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds.max(0.0).ceil() as u32
    }

    pub fn total_seconds(&self) -> u32 {
        self.total_seconds as u32
    }

    /// Begin a focus session, replacing whatever was running.
    pub fn start_focus(&mut self, minutes: u32) {
        self.phase = TimerPhase::Focus;
        self.total_seconds = (minutes * 60) as f32;
        self.remaining_seconds = self.total_seconds;
    }

    /// Begin a break, replacing whatever was running.
    pub fn start_break(&mut self, minutes: u32) {
        self.phase = TimerPhase::Break;
        self.total_seconds = (minutes * 60) as f32;
        self.remaining_seconds = self.total_seconds;
    }

    /// Freeze a running focus session. No effect in any other phase.
    pub fn pause(&mut self) {
        if self.phase == TimerPhase::Focus {
            self.phase = TimerPhase::Paused;
        }
    }

    /// Resume a paused focus session. No effect in any other phase.
    pub fn resume(&mut self) {
        if self.phase == TimerPhase::Paused {
            self.phase = TimerPhase::Focus;
        }
    }

    /// Abandon the current session and return to Idle.
    pub fn stop(&mut self) {
        self.phase = TimerPhase::Idle;
        self.remaining_seconds = self.total_seconds;
    }

    /// Advance by `dt_seconds` of simulated time. Returns the completed
    /// session kind on the tick the countdown reaches zero.
    pub fn tick(&mut self, dt_seconds: f32) -> Option<SessionKind> {
        let kind = match self.phase {
            TimerPhase::Focus => SessionKind::Focus,
            TimerPhase::Break => SessionKind::Break,
            TimerPhase::Idle | TimerPhase::Paused => return None,
        };
        self.remaining_seconds -= dt_seconds;
        if self.remaining_seconds <= 0.0 {
            self.phase = TimerPhase::Idle;
            self.remaining_seconds = self.total_seconds;
            Some(kind)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- Transitions ---

    #[test]
    fn test_starts_idle() {
        let timer = SessionTimer::new();
        assert_eq!(timer.phase(), TimerPhase::Idle);
        assert_eq!(timer.remaining_seconds(), DEFAULT_FOCUS_MINUTES * 60);
    }

    #[test]
    fn test_pause_only_from_focus() {
        let mut timer = SessionTimer::new();
        timer.pause();
        assert_eq!(timer.phase(), TimerPhase::Idle);

        timer.start_break(DEFAULT_BREAK_MINUTES);
        timer.pause();
        assert_eq!(timer.phase(), TimerPhase::Break);

        timer.start_focus(25);
        timer.pause();
        assert_eq!(timer.phase(), TimerPhase::Paused);
    }

    #[test]
    fn test_resume_only_from_paused() {
        let mut timer = SessionTimer::new();
        timer.resume();
        assert_eq!(timer.phase(), TimerPhase::Idle);

        timer.start_focus(25);
        timer.pause();
        timer.resume();
        assert_eq!(timer.phase(), TimerPhase::Focus);
    }

    #[test]
    fn test_stop_resets_remaining() {
        let mut timer = SessionTimer::new();
        timer.start_focus(10);
        timer.tick(120.0);
        assert_eq!(timer.remaining_seconds(), 480);
        timer.stop();
        assert_eq!(timer.phase(), TimerPhase::Idle);
        assert_eq!(timer.remaining_seconds(), 600);
    }

    // --- Countdown ---

    #[test]
    fn test_idle_and_paused_do_not_count_down() {
        let mut timer = SessionTimer::new();
        assert_eq!(timer.tick(1000.0), None);
        assert_eq!(timer.remaining_seconds(), DEFAULT_FOCUS_MINUTES * 60);

        timer.start_focus(25);
        timer.pause();
        assert_eq!(timer.tick(1000.0), None);
        assert_eq!(timer.remaining_seconds(), 25 * 60);
    }

    #[test]
    fn test_focus_completion_reported_once() {
        let mut timer = SessionTimer::new();
        timer.start_focus(1);
        assert_eq!(timer.tick(59.0), None);
        assert_eq!(timer.tick(1.0), Some(SessionKind::Focus));
        assert_eq!(timer.phase(), TimerPhase::Idle);
        assert_eq!(timer.tick(60.0), None);
    }

    #[test]
    fn test_break_completion() {
        let mut timer = SessionTimer::new();
        timer.start_break(5);
        assert_eq!(timer.tick(300.0), Some(SessionKind::Break));
        assert_eq!(timer.phase(), TimerPhase::Idle);
    }

    #[test]
    fn test_remaining_rounds_up_for_display() {
        let mut timer = SessionTimer::new();
        timer.start_focus(1);
        timer.tick(0.25);
        assert_eq!(timer.remaining_seconds(), 60);
        timer.tick(1.0);
        assert_eq!(timer.remaining_seconds(), 59);
    }
}
