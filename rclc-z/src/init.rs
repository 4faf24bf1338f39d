//! The support context: everything a process needs before it can create
//! nodes, publishers, subscriptions and timers.

use crate::allocator::Allocator;
use crate::rcl::{Clock, ClockType, Context, InitOptions};
use crate::ret::{RclError, Result};

/// Bundles the runtime context, a steady clock and the allocator used by
/// the heap helpers. The allocator is borrowed and must outlive the support.
#[derive(Debug, Default)]
pub struct Support<'a> {
    pub context: Context,
    pub clock: Clock,
    pub allocator: Option<&'a Allocator>,
}

impl<'a> Support<'a> {
    /// Valid between a successful init and the matching fini.
    pub fn is_valid(&self) -> bool {
        self.context.is_valid() && self.clock.is_valid()
    }
}

/// Initialize `support` with default init options.
///
/// `args` are the process arguments, program name included.
pub fn support_init<'a, S: AsRef<str>>(
    support: &mut Support<'a>,
    args: &[S],
    allocator: &'a Allocator,
) -> Result<()> {
    support_init_with_options(support, args, &InitOptions::default(), allocator)
}

/// Initialize `support` with caller-supplied init options.
///
/// Errors from the runtime are returned unchanged. The allocator is only
/// recorded once the context is up; a failure after that point shuts the
/// context down again and forgets the allocator.
pub fn support_init_with_options<'a, S: AsRef<str>>(
    support: &mut Support<'a>,
    args: &[S],
    options: &InitOptions,
    allocator: &'a Allocator,
) -> Result<()> {
    if let Err(e) = support.context.init(args, options) {
        tracing::error!("[support_init_with_options] context init failed: {e}");
        return Err(e);
    }
    support.allocator = Some(allocator);
    if let Err(e) = support.clock.init(ClockType::Steady) {
        tracing::error!("[support_init_with_options] clock init failed: {e}");
        if let Err(shutdown) = support.context.shutdown() {
            tracing::warn!("[support_init_with_options] context shutdown failed: {shutdown}");
        }
        support.allocator = None;
        return Err(e);
    }
    Ok(())
}

/// Tear down the clock and the context. Any failure, including a repeated
/// call, is reported as a generic error.
pub fn support_fini(support: &mut Support<'_>) -> Result<()> {
    let mut failed = false;
    if let Err(e) = support.clock.fini() {
        tracing::error!("[support_fini] clock fini failed: {e}");
        failed = true;
    }
    if let Err(e) = support.context.shutdown() {
        tracing::error!("[support_fini] context shutdown failed: {e}");
        failed = true;
    }
    if failed {
        return Err(RclError::error("support teardown failed"));
    }
    Ok(())
}

/// Heap-allocate a default support; `None` when the allocator fails.
pub fn support_alloc<'a>(allocator: &Allocator) -> Option<Box<Support<'a>>> {
    allocator.allocate::<Support<'a>>()
}

pub fn support_free(support: Box<Support<'_>>, allocator: &Allocator) -> Result<()> {
    allocator.deallocate(support);
    Ok(())
}

/// Borrow the runtime context of `support`.
pub fn get_context<'s>(support: &'s mut Support<'_>) -> &'s mut Context {
    &mut support.context
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_support_is_not_valid() {
        let support = Support::default();
        assert!(!support.is_valid());
        assert!(support.allocator.is_none());
    }

    #[test]
    fn test_fini_uninitialized_fails() {
        let mut support = Support::default();
        let err = support_fini(&mut support).unwrap_err();
        assert_eq!(err.code(), crate::ret::RetCode::Error);
    }

    #[test]
    fn test_clock_failure_rolls_back() {
        let allocator = Allocator::new();
        let mut support = Support::default();
        support.clock.init(ClockType::Steady).unwrap();
        let err = support_init(&mut support, &["prog"], &allocator).unwrap_err();
        assert_eq!(err.code(), crate::ret::RetCode::Error);
        assert!(!support.context.is_valid());
        assert!(support.allocator.is_none());
        support.clock.fini().unwrap();
    }

    #[test]
    fn test_alloc_free() {
        let allocator = Allocator::new();
        let support = support_alloc(&allocator).unwrap();
        assert!(!support.is_valid());
        assert_eq!(allocator.live_allocations(), 1);
        support_free(support, &allocator).unwrap();
        assert_eq!(allocator.live_allocations(), 0);
    }
}
