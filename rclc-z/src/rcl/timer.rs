use std::sync::Arc;

use crate::lifecycle::Lifecycle;
use crate::rcl::clock::{Clock, ClockType};
use crate::rcl::context::Context;
use crate::ret::{RclError, Result};

/// Invoked with the timer and the nanoseconds elapsed since the previous call.
pub type TimerCallback = Arc<dyn Fn(&mut Timer, i64) + Send + Sync>;

struct TimerImpl {
    clock: ClockType,
    period: i64,
    last_call_time: i64,
    next_call_time: i64,
    callback: Option<TimerCallback>,
    canceled: bool,
}

impl std::fmt::Debug for TimerImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerImpl")
            .field("clock", &self.clock)
            .field("period", &self.period)
            .field("next_call_time", &self.next_call_time)
            .field("canceled", &self.canceled)
            .finish_non_exhaustive()
    }
}

impl TimerImpl {
    /// Periods that were missed entirely are skipped rather than replayed.
    fn update(&mut self, now: i64) {
        self.last_call_time = now;
        if self.period == 0 {
            self.next_call_time = now;
            return;
        }
        self.next_call_time = self.next_call_time.saturating_add(self.period);
        if now >= self.next_call_time {
            let behind = (now - self.next_call_time) / self.period + 1;
            self.next_call_time = self
                .next_call_time
                .saturating_add(behind.saturating_mul(self.period));
        }
    }
}

#[derive(Debug, Default)]
pub struct Timer {
    state: Lifecycle<TimerImpl>,
}

impl Timer {
    /// Start a periodic timer on `clock`.
    ///
    /// With `autostart` unset the timer begins canceled and must be
    /// [`reset`](Timer::reset) before it fires.
    pub fn init(
        &mut self,
        clock: &Clock,
        context: &Context,
        period: i64,
        callback: Option<TimerCallback>,
        autostart: bool,
    ) -> Result<()> {
        if period < 0 {
            return Err(RclError::invalid_argument(format!(
                "timer period must be non-negative, got {period}"
            )));
        }
        let kind = clock
            .clock_type()
            .ok_or_else(|| RclError::invalid_argument("clock is not initialized"))?;
        if !context.is_valid() {
            return Err(RclError::error("context is not valid"));
        }
        let now = kind.now()?;
        self.state.start(TimerImpl {
            clock: kind,
            period,
            last_call_time: now,
            next_call_time: now.saturating_add(period),
            callback,
            canceled: !autostart,
        })
    }

    pub fn is_valid(&self) -> bool {
        self.state.is_live()
    }

    fn inner(&self) -> Result<&TimerImpl> {
        self.state.get("timer")
    }

    fn inner_mut(&mut self) -> Result<&mut TimerImpl> {
        self.state.get_mut("timer")
    }

    pub fn period(&self) -> Result<i64> {
        Ok(self.inner()?.period)
    }

    pub fn is_canceled(&self) -> Result<bool> {
        Ok(self.inner()?.canceled)
    }

    pub fn is_ready(&self) -> Result<bool> {
        let x = self.inner()?;
        Ok(!x.canceled && x.next_call_time <= x.clock.now()?)
    }

    /// Negative when the timer is overdue.
    pub fn time_until_next_call(&self) -> Result<i64> {
        let x = self.inner()?;
        if x.canceled {
            return Err(RclError::error("timer is canceled"));
        }
        Ok(x.next_call_time - x.clock.now()?)
    }

    pub fn time_since_last_call(&self) -> Result<i64> {
        let x = self.inner()?;
        Ok(x.clock.now()? - x.last_call_time)
    }

    /// Advance the timer and run its callback.
    pub fn call(&mut self) -> Result<()> {
        let x = self.inner_mut()?;
        if x.canceled {
            return Err(RclError::error("timer is canceled"));
        }
        let now = x.clock.now()?;
        let since_last_call = now - x.last_call_time;
        x.update(now);
        if let Some(cb) = x.callback.clone() {
            cb(self, since_last_call);
        }
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<()> {
        self.inner_mut()?.canceled = true;
        Ok(())
    }

    /// Restart the period from now and clear cancellation.
    pub fn reset(&mut self) -> Result<()> {
        let x = self.inner_mut()?;
        let now = x.clock.now()?;
        x.next_call_time = now.saturating_add(x.period);
        x.canceled = false;
        Ok(())
    }

    /// Swap the callback, returning the previous one.
    pub fn exchange_callback(&mut self, callback: Option<TimerCallback>) -> Result<Option<TimerCallback>> {
        let x = self.inner_mut()?;
        Ok(std::mem::replace(&mut x.callback, callback))
    }

    pub fn fini(&mut self) -> Result<()> {
        self.state
            .finish()
            .map(|_| ())
            .ok_or_else(|| RclError::error("timer is not initialized"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timer_impl(period: i64) -> TimerImpl {
        TimerImpl {
            clock: ClockType::Steady,
            period,
            last_call_time: 0,
            next_call_time: period,
            callback: None,
            canceled: false,
        }
    }

    #[test]
    fn test_update_on_time() {
        let mut x = timer_impl(100);
        x.update(100);
        assert_eq!(x.next_call_time, 200);
        assert_eq!(x.last_call_time, 100);
    }

    #[test]
    fn test_update_skips_missed_periods() {
        let mut x = timer_impl(100);
        x.update(450);
        assert_eq!(x.next_call_time, 500);
    }

    #[test]
    fn test_update_zero_period() {
        let mut x = timer_impl(0);
        x.update(42);
        assert_eq!(x.next_call_time, 42);
    }
}
