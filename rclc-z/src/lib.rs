#![allow(clippy::missing_safety_doc)]
#![allow(clippy::not_unsafe_ptr_arg_deref)]

//! Convenience layer over a zenoh-backed client library.
//!
//! A [`Support`] bundles everything a process needs to start creating
//! entities: a runtime context, a steady clock and an allocator. The
//! `*_init_default` style helpers then create nodes, publishers,
//! subscriptions and timers on top of it with sensible defaults. The same
//! operations are exported with a C ABI from [`ffi`].

mod lifecycle;

pub mod allocator;
pub mod ffi;
pub mod init;
pub mod node;
pub mod publisher;
pub mod rcl;
pub mod ret;
pub mod subscription;
pub mod timer;

pub use allocator::{Allocator, default_allocator};
pub use init::{Support, get_context, support_fini, support_init, support_init_with_options};
pub use ret::{RclError, Result, RetCode, rcl_ret_t};
