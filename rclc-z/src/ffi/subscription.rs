use std::ffi::c_char;

use crate::allocator::Allocator;
use crate::ffi::qos::{CQosProfile, Profile};
use crate::ffi::{BorrowMutPtr, BorrowPtr, cstr_to_str, into_raw};
use crate::rcl::{Node, QosProfile, Subscription, TypeSupport};
use crate::rclc_try;
use crate::ret::{RclError, Result, rcl_ret_t};
use crate::subscription;

unsafe fn init_with(
    subscription: *mut Subscription,
    node: *const Node,
    type_support: *const TypeSupport,
    topic_name: *const c_char,
    profile: Profile,
) -> Result<()> {
    let sub = unsafe { subscription.borrow_mut_ptr("subscription")? };
    let node = unsafe { node.borrow_ptr("node")? };
    let ts = unsafe { type_support.borrow_ptr("type_support")? };
    let topic = unsafe { cstr_to_str(topic_name, "topic_name")? };
    match profile {
        Profile::Default => subscription::subscription_init_default(sub, node, ts, topic)?,
        Profile::BestEffort => {
            subscription::subscription_init_best_effort(sub, node, ts, topic)?
        }
        Profile::Custom(qos) => subscription::subscription_init(sub, node, ts, topic, &qos)?,
    }
    Ok(())
}

/// # Safety
/// Pointers must be null or valid.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rclc_subscription_init_default(
    subscription: *mut Subscription,
    node: *const Node,
    type_support: *const TypeSupport,
    topic_name: *const c_char,
) -> rcl_ret_t {
    tracing::trace!("rclc_subscription_init_default");
    rclc_try! {
        unsafe { init_with(subscription, node, type_support, topic_name, Profile::Default)? };
    }
}

/// # Safety
/// Pointers must be null or valid.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rclc_subscription_init_best_effort(
    subscription: *mut Subscription,
    node: *const Node,
    type_support: *const TypeSupport,
    topic_name: *const c_char,
) -> rcl_ret_t {
    tracing::trace!("rclc_subscription_init_best_effort");
    rclc_try! {
        unsafe { init_with(subscription, node, type_support, topic_name, Profile::BestEffort)? };
    }
}

/// # Safety
/// Pointers must be null or valid.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rclc_subscription_init(
    subscription: *mut Subscription,
    node: *const Node,
    type_support: *const TypeSupport,
    topic_name: *const c_char,
    qos: *const CQosProfile,
) -> rcl_ret_t {
    tracing::trace!("rclc_subscription_init");
    rclc_try! {
        let qos = QosProfile::try_from(unsafe { qos.borrow_ptr("qos")? })?;
        unsafe { init_with(subscription, node, type_support, topic_name, Profile::Custom(qos))? };
    }
}

/// # Safety
/// `allocator` must be null or valid.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rclc_alloc_zero_initialized_subscription(
    allocator: *const Allocator,
) -> *mut Subscription {
    match unsafe { allocator.borrow_ptr("allocator") } {
        Ok(allocator) => into_raw(subscription::alloc_zero_initialized_subscription(allocator)),
        Err(_) => std::ptr::null_mut(),
    }
}

/// # Safety
/// `subscription` must be null or come from
/// [`rclc_alloc_zero_initialized_subscription`] with `allocator`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rclc_subscription_free(
    subscription: *mut Subscription,
    allocator: *const Allocator,
) -> rcl_ret_t {
    rclc_try! {
        let allocator = unsafe { allocator.borrow_ptr("allocator")? };
        let sub = unsafe { subscription.own_ptr("subscription")? };
        subscription::subscription_free(sub, allocator)?;
    }
}

/// # Safety
/// `subscription` must be null or valid.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rclc_subscription_fini(subscription: *mut Subscription) -> rcl_ret_t {
    tracing::trace!("rclc_subscription_fini");
    rclc_try! {
        unsafe { subscription.borrow_mut_ptr("subscription")? }.fini()?;
    }
}

/// Take the oldest pending payload without blocking.
///
/// On success `*taken` tells whether a sample was available; if so `*data`
/// and `*len` describe a buffer that must be released with
/// [`rclc_serialized_free`].
///
/// # Safety
/// Pointers must be null or valid.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rclc_take_serialized(
    subscription: *const Subscription,
    data: *mut *mut u8,
    len: *mut usize,
    taken: *mut bool,
) -> rcl_ret_t {
    tracing::trace!("rclc_take_serialized");
    rclc_try! {
        let sub = unsafe { subscription.borrow_ptr("subscription")? };
        let data = unsafe { data.borrow_mut_ptr("data")? };
        let len = unsafe { len.borrow_mut_ptr("len")? };
        let taken = unsafe { taken.borrow_mut_ptr("taken")? };
        match sub.take_serialized()? {
            Some(payload) => {
                let payload = payload.into_boxed_slice();
                *len = payload.len();
                *data = Box::into_raw(payload).cast::<u8>();
                *taken = true;
            }
            None => {
                *data = std::ptr::null_mut();
                *len = 0;
                *taken = false;
            }
        }
    }
}

/// # Safety
/// `data` and `len` must come from [`rclc_take_serialized`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rclc_serialized_free(data: *mut u8, len: usize) -> rcl_ret_t {
    rclc_try! {
        if data.is_null() {
            return Err(RclError::invalid_argument("data is null"));
        }
        let slice = std::ptr::slice_from_raw_parts_mut(data, len);
        drop(unsafe { Box::from_raw(slice) });
    }
}
