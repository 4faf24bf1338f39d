use std::sync::Arc;

use crate::ffi::{BorrowMutPtr, BorrowPtr, into_raw};
use crate::init::Support;
use crate::rcl::Timer;
use crate::rclc_try;
use crate::ret::{RclError, rcl_ret_t};
use crate::timer;

#[allow(non_camel_case_types)]
pub type rclc_timer_callback_t = Option<unsafe extern "C" fn(*mut Timer, i64)>;

/// # Safety
/// Pointers must be null or valid; the callback must be safe to call with
/// the timer.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rclc_timer_init_default(
    timer: *mut Timer,
    support: *const Support<'static>,
    timeout_ns: u64,
    callback: rclc_timer_callback_t,
) -> rcl_ret_t {
    tracing::trace!("rclc_timer_init_default");
    rclc_try! {
        let timer = unsafe { timer.borrow_mut_ptr("timer")? };
        let support = unsafe { support.borrow_ptr("support")? };
        let callback = callback.ok_or_else(|| RclError::invalid_argument("callback is null"))?;
        let callback = Arc::new(move |t: &mut Timer, last_call: i64| unsafe {
            callback(t as *mut Timer, last_call)
        });
        timer::timer_init_default(timer, support, timeout_ns, callback)?;
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn rclc_alloc_zero_initialized_timer() -> *mut Timer {
    into_raw(timer::alloc_zero_initialized_timer())
}

/// # Safety
/// `timer` must be null or come from [`rclc_alloc_zero_initialized_timer`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rclc_timer_free(timer: *mut Timer) -> rcl_ret_t {
    rclc_try! {
        timer::timer_free(unsafe { timer.own_ptr("timer")? })?;
    }
}

/// # Safety
/// `timer` must be null or valid.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rclc_timer_fini(timer: *mut Timer) -> rcl_ret_t {
    tracing::trace!("rclc_timer_fini");
    rclc_try! {
        unsafe { timer.borrow_mut_ptr("timer")? }.fini()?;
    }
}

/// # Safety
/// `timer` must be null or valid.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rclc_timer_call(timer: *mut Timer) -> rcl_ret_t {
    tracing::trace!("rclc_timer_call");
    rclc_try! {
        unsafe { timer.borrow_mut_ptr("timer")? }.call()?;
    }
}

/// # Safety
/// Pointers must be null or valid.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rclc_timer_is_ready(timer: *const Timer, is_ready: *mut bool) -> rcl_ret_t {
    rclc_try! {
        let timer = unsafe { timer.borrow_ptr("timer")? };
        let is_ready = unsafe { is_ready.borrow_mut_ptr("is_ready")? };
        *is_ready = timer.is_ready()?;
    }
}
