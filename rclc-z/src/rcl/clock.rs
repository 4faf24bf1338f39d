use std::sync::OnceLock;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use crate::lifecycle::Lifecycle;
use crate::ret::{RclError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum ClockType {
    #[strum(serialize = "steady")]
    Steady,
    #[strum(serialize = "system")]
    System,
}

impl ClockType {
    pub(crate) fn now(self) -> Result<i64> {
        match self {
            Self::Steady => Ok(steady_epoch().elapsed().as_nanos() as i64),
            Self::System => SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as i64)
                .map_err(|e| RclError::error(format!("system clock before epoch: {e}"))),
        }
    }
}

fn steady_epoch() -> Instant {
    static EPOCH: OnceLock<Instant> = OnceLock::new();
    *EPOCH.get_or_init(Instant::now)
}

/// Nanosecond time source used by timers.
#[derive(Debug, Default)]
pub struct Clock {
    state: Lifecycle<ClockType>,
}

impl Clock {
    pub fn init(&mut self, kind: ClockType) -> Result<()> {
        if kind == ClockType::Steady {
            steady_epoch();
        }
        self.state.start(kind)
    }

    pub fn is_valid(&self) -> bool {
        self.state.is_live()
    }

    pub fn clock_type(&self) -> Option<ClockType> {
        self.state.live().copied()
    }

    /// Current time in nanoseconds.
    pub fn now(&self) -> Result<i64> {
        match self.state.live() {
            Some(kind) => kind.now(),
            None => Err(RclError::invalid_argument("clock is not initialized")),
        }
    }

    pub fn fini(&mut self) -> Result<()> {
        self.state
            .finish()
            .map(|_| ())
            .ok_or_else(|| RclError::error("clock is not initialized"))
    }
}
