use std::ffi::c_char;

use crate::allocator::Allocator;
use crate::ffi::{BorrowMutPtr, BorrowPtr, cstr_to_str, into_raw};
use crate::init::Support;
use crate::node;
use crate::rcl::Node;
use crate::rclc_try;
use crate::ret::rcl_ret_t;

/// # Safety
/// `allocator` must be null or valid.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rclc_node_alloc(allocator: *const Allocator) -> *mut Node {
    match unsafe { allocator.borrow_ptr("allocator") } {
        Ok(allocator) => into_raw(allocator.allocate::<Node>()),
        Err(_) => std::ptr::null_mut(),
    }
}

/// # Safety
/// `node` must be null or come from [`rclc_node_alloc`] with `allocator`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rclc_node_free(node: *mut Node, allocator: *const Allocator) -> rcl_ret_t {
    rclc_try! {
        let allocator = unsafe { allocator.borrow_ptr("allocator")? };
        allocator.deallocate(unsafe { node.own_ptr("node")? });
    }
}

/// A null `namespace` means the root namespace.
///
/// # Safety
/// Pointers must be null or valid.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rclc_node_init_default(
    node: *mut Node,
    name: *const c_char,
    namespace: *const c_char,
    support: *const Support<'static>,
) -> rcl_ret_t {
    tracing::trace!("rclc_node_init_default");
    rclc_try! {
        let node = unsafe { node.borrow_mut_ptr("node")? };
        let name = unsafe { cstr_to_str(name, "name")? };
        let namespace = if namespace.is_null() {
            ""
        } else {
            unsafe { cstr_to_str(namespace, "namespace")? }
        };
        let support = unsafe { support.borrow_ptr("support")? };
        node::node_init_default(node, name, namespace, support)?;
    }
}

/// # Safety
/// `node` must be null or valid.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rclc_node_fini(node: *mut Node) -> rcl_ret_t {
    tracing::trace!("rclc_node_fini");
    rclc_try! {
        unsafe { node.borrow_mut_ptr("node")? }.fini()?;
    }
}
