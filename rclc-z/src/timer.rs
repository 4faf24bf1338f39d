use crate::allocator::default_allocator;
use crate::init::Support;
use crate::rcl::{Timer, TimerCallback};
use crate::ret::{RclError, Result};

/// Periodic timer on the support's steady clock, started immediately.
pub fn timer_init_default(
    timer: &mut Timer,
    support: &Support<'_>,
    timeout_ns: u64,
    callback: TimerCallback,
) -> Result<()> {
    timer_init_default2(timer, support, timeout_ns, callback, true)
}

/// Like [`timer_init_default`], with `autostart` unset the timer starts
/// canceled.
pub fn timer_init_default2(
    timer: &mut Timer,
    support: &Support<'_>,
    timeout_ns: u64,
    callback: TimerCallback,
    autostart: bool,
) -> Result<()> {
    if !support.is_valid() {
        return Err(RclError::invalid_argument("support is not initialized"));
    }
    let period = i64::try_from(timeout_ns).map_err(|_| {
        RclError::invalid_argument(format!("timer period {timeout_ns}ns is out of range"))
    })?;
    timer
        .init(
            &support.clock,
            &support.context,
            period,
            Some(callback),
            autostart,
        )
        .inspect_err(|e| tracing::error!("[timer_init_default] {e}"))
}

/// Heap-allocate an uninitialized timer with the default allocator.
pub fn alloc_zero_initialized_timer() -> Option<Box<Timer>> {
    default_allocator().allocate::<Timer>()
}

pub fn timer_free(timer: Box<Timer>) -> Result<()> {
    default_allocator().deallocate(timer);
    Ok(())
}
