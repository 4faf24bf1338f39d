use std::ffi::{c_char, c_int};

use crate::allocator::{self, Allocator};
use crate::ffi::{BorrowMutPtr, BorrowPtr, args_from_argv, into_raw};
use crate::init::{self, Support};
use crate::rcl::{Context, InitOptions};
use crate::rclc_try;
use crate::ret::rcl_ret_t;

#[unsafe(no_mangle)]
pub extern "C" fn rclc_get_default_allocator() -> *const Allocator {
    allocator::default_allocator()
}

#[unsafe(no_mangle)]
pub extern "C" fn rclc_allocator_alloc_default() -> *mut Allocator {
    tracing::trace!("rclc_allocator_alloc_default");
    into_raw(allocator::allocator_alloc_default())
}

/// # Safety
/// `allocator` must be null or come from [`rclc_allocator_alloc_default`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rclc_allocator_free(allocator: *mut Allocator) -> rcl_ret_t {
    tracing::trace!("rclc_allocator_free");
    rclc_try! {
        allocator::allocator_free(unsafe { allocator.own_ptr("allocator")? })?;
    }
}

/// # Safety
/// Pointers must be null or valid; `allocator` must outlive the support.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rclc_support_init(
    support: *mut Support<'static>,
    argc: c_int,
    argv: *const *const c_char,
    allocator: *const Allocator,
) -> rcl_ret_t {
    tracing::trace!("rclc_support_init");
    rclc_try! {
        let support = unsafe { support.borrow_mut_ptr("support")? };
        let allocator = unsafe { allocator.borrow_ptr("allocator")? };
        let args = unsafe { args_from_argv(argc, argv)? };
        init::support_init(support, &args, allocator)?;
    }
}

/// # Safety
/// Pointers must be null or valid; `allocator` must outlive the support.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rclc_support_init_with_options(
    support: *mut Support<'static>,
    argc: c_int,
    argv: *const *const c_char,
    init_options: *const InitOptions,
    allocator: *const Allocator,
) -> rcl_ret_t {
    tracing::trace!("rclc_support_init_with_options");
    rclc_try! {
        let support = unsafe { support.borrow_mut_ptr("support")? };
        let options = unsafe { init_options.borrow_ptr("init_options")? };
        let allocator = unsafe { allocator.borrow_ptr("allocator")? };
        let args = unsafe { args_from_argv(argc, argv)? };
        init::support_init_with_options(support, &args, options, allocator)?;
    }
}

/// # Safety
/// `support` must be null or valid.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rclc_support_fini(support: *mut Support<'static>) -> rcl_ret_t {
    tracing::trace!("rclc_support_fini");
    rclc_try! {
        init::support_fini(unsafe { support.borrow_mut_ptr("support")? })?;
    }
}

/// # Safety
/// `allocator` must be null or valid.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rclc_support_alloc(allocator: *const Allocator) -> *mut Support<'static> {
    tracing::trace!("rclc_support_alloc");
    match unsafe { allocator.borrow_ptr("allocator") } {
        Ok(allocator) => into_raw(init::support_alloc(allocator)),
        Err(e) => {
            tracing::error!("rclc_support_alloc: {e}");
            std::ptr::null_mut()
        }
    }
}

/// # Safety
/// `support` must be null or come from [`rclc_support_alloc`] with the same
/// `allocator`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rclc_support_free(
    support: *mut Support<'static>,
    allocator: *const Allocator,
) -> rcl_ret_t {
    tracing::trace!("rclc_support_free");
    rclc_try! {
        let allocator = unsafe { allocator.borrow_ptr("allocator")? };
        let support = unsafe { support.own_ptr("support")? };
        init::support_free(support, allocator)?;
    }
}

/// # Safety
/// `support` must be null or valid.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rclc_get_context(support: *mut Support<'static>) -> *mut Context {
    match unsafe { support.borrow_mut_ptr("support") } {
        Ok(support) => init::get_context(support) as *mut Context,
        Err(_) => std::ptr::null_mut(),
    }
}

/// # Safety
/// `context` must be null or valid.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rclc_context_is_valid(context: *const Context) -> bool {
    unsafe { context.borrow_ptr("context") }.is_ok_and(Context::is_valid)
}

#[unsafe(no_mangle)]
pub extern "C" fn rclc_init_options_alloc() -> *mut InitOptions {
    tracing::trace!("rclc_init_options_alloc");
    into_raw(allocator::default_allocator().allocate::<InitOptions>())
}

/// # Safety
/// `init_options` must be null or come from [`rclc_init_options_alloc`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rclc_init_options_set_domain_id(
    init_options: *mut InitOptions,
    domain_id: usize,
) -> rcl_ret_t {
    tracing::trace!("rclc_init_options_set_domain_id");
    rclc_try! {
        unsafe { init_options.borrow_mut_ptr("init_options")? }.set_domain_id(domain_id);
    }
}

/// # Safety
/// `init_options` must be null or come from [`rclc_init_options_alloc`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rclc_init_options_free(init_options: *mut InitOptions) -> rcl_ret_t {
    tracing::trace!("rclc_init_options_free");
    rclc_try! {
        let init_options = unsafe { init_options.own_ptr("init_options")? };
        allocator::default_allocator().deallocate(init_options);
    }
}
