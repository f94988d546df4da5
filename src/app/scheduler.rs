//! Two fixed-rate tasks (logic and UI) driven by elapsed monotonic time.
//!
//! Each task accumulates real elapsed time and fires at most once per
//! [`PeriodicTask::advance`] call. Whole periods that were missed while the host
//! was late are dropped and counted, never replayed, so a slow frame cannot
//! stack up work.

use std::time::Duration;

use crate::core::config::SchedulerConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodicTask {
    period: Duration,
    accumulated: Duration,
    fired: u64,
    skipped: u64,
}

impl PeriodicTask {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            accumulated: Duration::ZERO,
            fired: 0,
            skipped: 0,
        }
    }

    /// Non-positive or non-finite rates produce a task that never fires, and so
    /// do rates too slow for a `Duration` period.
    pub fn from_hz(hz: f32) -> Self {
        let period = if hz.is_finite() && hz > 0.0 {
            Duration::try_from_secs_f64(1.0 / f64::from(hz)).unwrap_or(Duration::MAX)
        } else {
            Duration::MAX
        };
        Self::new(period)
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn fired(&self) -> u64 {
        self.fired
    }

    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    pub fn advance(&mut self, dt: Duration) -> bool {
        if self.period.is_zero() {
            self.fired += 1;
            return true;
        }
        self.accumulated = self.accumulated.saturating_add(dt);
        if self.accumulated < self.period {
            return false;
        }
        self.accumulated -= self.period;
        if self.accumulated >= self.period {
            let period_ns = self.period.as_nanos();
            let backlog_ns = self.accumulated.as_nanos();
            self.skipped += (backlog_ns / period_ns) as u64;
            self.accumulated = Duration::from_nanos((backlog_ns % period_ns) as u64);
        }
        self.fired += 1;
        true
    }

    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
    }
}

/// Which ticks are due after one `advance`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickPlan {
    pub logic: bool,
    pub ui: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DualRateScheduler {
    logic: PeriodicTask,
    ui: PeriodicTask,
    steps_per_logic: u32,
}

impl Default for DualRateScheduler {
    fn default() -> Self {
        Self::from(&SchedulerConfig::default())
    }
}

impl From<&SchedulerConfig> for DualRateScheduler {
    fn from(cfg: &SchedulerConfig) -> Self {
        let ratio = if cfg.logic_hz > 0.0 && cfg.ui_hz > 0.0 {
            (cfg.ui_hz / cfg.logic_hz).round()
        } else {
            1.0
        };
        Self {
            logic: PeriodicTask::from_hz(cfg.logic_hz),
            ui: PeriodicTask::from_hz(cfg.ui_hz),
            steps_per_logic: if ratio.is_finite() { ratio.max(1.0) as u32 } else { 1 },
        }
    }
}

impl DualRateScheduler {
    pub fn advance(&mut self, dt: Duration) -> TickPlan {
        TickPlan {
            logic: self.logic.advance(dt),
            ui: self.ui.advance(dt),
        }
    }

    /// UI ticks used to cover the distance produced by one logic tick.
    pub fn steps_per_logic(&self) -> u32 {
        self.steps_per_logic
    }

    pub fn logic(&self) -> &PeriodicTask {
        &self.logic
    }

    pub fn ui(&self) -> &PeriodicTask {
        &self.ui
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn fires_once_per_period() {
        let mut t = PeriodicTask::from_hz(20.0);
        assert!(!t.advance(ms(30)));
        assert!(t.advance(ms(30)));
        assert!(!t.advance(ms(30)));
        assert!(t.advance(ms(30)));
        assert_eq!(t.fired(), 2);
        assert_eq!(t.skipped(), 0);
    }

    #[test]
    fn late_frames_drop_backlog() {
        let mut t = PeriodicTask::from_hz(20.0);
        // 180ms late: one run, two whole periods dropped, 30ms carried.
        assert!(t.advance(ms(180)));
        assert_eq!(t.fired(), 1);
        assert_eq!(t.skipped(), 2);
        assert!(!t.advance(ms(10)));
        assert!(t.advance(ms(10)));
    }

    #[test]
    fn remainder_carries_over_for_drift() {
        let mut t = PeriodicTask::from_hz(20.0);
        let mut fired = 0;
        // 70ms frames: 20ms of drift carries forward and is never lost.
        for _ in 0..10 {
            if t.advance(ms(70)) {
                fired += 1;
            }
        }
        assert_eq!(fired + t.skipped(), 14);
    }

    #[test]
    fn disabled_rate_never_fires() {
        let mut t = PeriodicTask::from_hz(0.0);
        for _ in 0..100 {
            assert!(!t.advance(Duration::from_secs(3600)));
        }
    }

    #[test]
    fn vanishing_rate_never_fires() {
        let mut t = PeriodicTask::from_hz(1e-20);
        assert_eq!(t.period(), Duration::MAX);
        assert!(!t.advance(Duration::from_secs(3600)));

        let mut s = DualRateScheduler::from(&SchedulerConfig {
            logic_hz: 1e-20,
            ui_hz: 60.0,
        });
        let plan = s.advance(ms(20));
        assert!(!plan.logic);
        assert!(plan.ui);
    }

    #[test]
    fn dual_rate_ratio() {
        let mut s = DualRateScheduler::default();
        assert_eq!(s.steps_per_logic(), 3);
        let mut logic = 0;
        let mut ui = 0;
        for _ in 0..60 {
            let plan = s.advance(Duration::from_micros(16_667));
            logic += plan.logic as u32;
            ui += plan.ui as u32;
        }
        assert_eq!(ui, 60);
        assert_eq!(logic, 20);
    }

    #[test]
    fn ratio_never_below_one() {
        let s = DualRateScheduler::from(&SchedulerConfig {
            logic_hz: 60.0,
            ui_hz: 20.0,
        });
        assert_eq!(s.steps_per_logic(), 1);
    }
}
