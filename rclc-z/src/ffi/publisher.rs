use std::ffi::c_char;

use crate::allocator::Allocator;
use crate::ffi::qos::{CQosProfile, Profile};
use crate::ffi::{BorrowMutPtr, BorrowPtr, cstr_to_str, into_raw};
use crate::publisher;
use crate::rcl::{Node, Publisher, QosProfile, TypeHash, TypeSupport};
use crate::rclc_try;
use crate::ret::{RclError, Result, rcl_ret_t};

/// Describe a message type. A null `type_hash` stands for the zero hash.
///
/// # Safety
/// Strings must be null or valid.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rclc_type_support_create(
    type_name: *const c_char,
    type_hash: *const c_char,
) -> *mut TypeSupport {
    let build = || -> crate::ret::Result<TypeSupport> {
        let name = unsafe { cstr_to_str(type_name, "type_name")? };
        let hash = if type_hash.is_null() {
            TypeHash::zero()
        } else {
            let rihs = unsafe { cstr_to_str(type_hash, "type_hash")? };
            TypeHash::from_rihs_string(rihs).ok_or_else(|| {
                RclError::invalid_argument(format!("'{rihs}' is not a RIHS01 hash"))
            })?
        };
        Ok(TypeSupport::new(name, hash))
    };
    match build() {
        Ok(ts) => Box::into_raw(Box::new(ts)),
        Err(e) => {
            tracing::error!("rclc_type_support_create: {e}");
            std::ptr::null_mut()
        }
    }
}

/// # Safety
/// `type_support` must be null or come from [`rclc_type_support_create`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rclc_type_support_destroy(type_support: *mut TypeSupport) -> rcl_ret_t {
    rclc_try! {
        drop(unsafe { type_support.own_ptr("type_support")? });
    }
}

unsafe fn init_with(
    publisher: *mut Publisher,
    node: *const Node,
    type_support: *const TypeSupport,
    topic_name: *const c_char,
    profile: Profile,
) -> Result<()> {
    let publisher = unsafe { publisher.borrow_mut_ptr("publisher")? };
    let node = unsafe { node.borrow_ptr("node")? };
    let type_support = unsafe { type_support.borrow_ptr("type_support")? };
    let topic_name = unsafe { cstr_to_str(topic_name, "topic_name")? };
    match profile {
        Profile::Default => {
            publisher::publisher_init_default(publisher, node, type_support, topic_name)?
        }
        Profile::BestEffort => {
            publisher::publisher_init_best_effort(publisher, node, type_support, topic_name)?
        }
        Profile::Custom(qos) => {
            publisher::publisher_init(publisher, node, type_support, topic_name, &qos)?
        }
    }
    Ok(())
}

/// # Safety
/// Pointers must be null or valid.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rclc_publisher_init_default(
    publisher: *mut Publisher,
    node: *const Node,
    type_support: *const TypeSupport,
    topic_name: *const c_char,
) -> rcl_ret_t {
    tracing::trace!("rclc_publisher_init_default");
    rclc_try! {
        unsafe { init_with(publisher, node, type_support, topic_name, Profile::Default)? };
    }
}

/// # Safety
/// Pointers must be null or valid.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rclc_publisher_init_best_effort(
    publisher: *mut Publisher,
    node: *const Node,
    type_support: *const TypeSupport,
    topic_name: *const c_char,
) -> rcl_ret_t {
    tracing::trace!("rclc_publisher_init_best_effort");
    rclc_try! {
        unsafe { init_with(publisher, node, type_support, topic_name, Profile::BestEffort)? };
    }
}

/// # Safety
/// Pointers must be null or valid.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rclc_publisher_init(
    publisher: *mut Publisher,
    node: *const Node,
    type_support: *const TypeSupport,
    topic_name: *const c_char,
    qos: *const CQosProfile,
) -> rcl_ret_t {
    tracing::trace!("rclc_publisher_init");
    rclc_try! {
        let qos = QosProfile::try_from(unsafe { qos.borrow_ptr("qos")? })?;
        unsafe { init_with(publisher, node, type_support, topic_name, Profile::Custom(qos))? };
    }
}

/// # Safety
/// `allocator` must be null or valid.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rclc_publisher_alloc(allocator: *const Allocator) -> *mut Publisher {
    match unsafe { allocator.borrow_ptr("allocator") } {
        Ok(allocator) => into_raw(publisher::publisher_alloc(allocator)),
        Err(_) => std::ptr::null_mut(),
    }
}

/// # Safety
/// `publisher` must be null or come from [`rclc_publisher_alloc`] with `allocator`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rclc_publisher_free(
    publisher: *mut Publisher,
    allocator: *const Allocator,
) -> rcl_ret_t {
    rclc_try! {
        let allocator = unsafe { allocator.borrow_ptr("allocator")? };
        publisher::publisher_free(unsafe { publisher.own_ptr("publisher")? }, allocator)?;
    }
}

/// # Safety
/// `publisher` must be null or valid.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rclc_publisher_fini(publisher: *mut Publisher) -> rcl_ret_t {
    tracing::trace!("rclc_publisher_fini");
    rclc_try! {
        unsafe { publisher.borrow_mut_ptr("publisher")? }.fini()?;
    }
}

/// Send `len` bytes of CDR-encoded payload.
///
/// # Safety
/// `data` must point to `len` readable bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rclc_publish_serialized(
    publisher: *const Publisher,
    data: *const u8,
    len: usize,
) -> rcl_ret_t {
    tracing::trace!("rclc_publish_serialized");
    rclc_try! {
        let publisher = unsafe { publisher.borrow_ptr("publisher")? };
        if data.is_null() {
            return Err(RclError::invalid_argument("data is null"));
        }
        let payload = unsafe { std::slice::from_raw_parts(data, len) };
        publisher.publish_serialized(payload.to_vec())?;
    }
}
