use std::alloc::Layout;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::ret::Result;

/// Allocator handed to the support context and to the heap helpers.
///
/// Allocations go through the global allocator; failure is reported as
/// `None` instead of aborting. The allocator keeps a count of the blocks it
/// handed out that have not been returned yet.
#[derive(Debug, Default)]
pub struct Allocator {
    live: AtomicUsize,
}

static DEFAULT_ALLOCATOR: Allocator = Allocator::new();

/// The process-wide default allocator.
pub fn default_allocator() -> &'static Allocator {
    &DEFAULT_ALLOCATOR
}

impl Allocator {
    pub const fn new() -> Self {
        Self {
            live: AtomicUsize::new(0),
        }
    }

    /// Allocate a default-initialized `T` on the heap.
    pub fn allocate<T: Default>(&self) -> Option<Box<T>> {
        let layout = Layout::new::<T>();
        let boxed = if layout.size() == 0 {
            Box::<T>::default()
        } else {
            // SAFETY: the layout has a non-zero size.
            let ptr = unsafe { std::alloc::alloc(layout) } as *mut T;
            if ptr.is_null() {
                tracing::error!("failed to allocate {} bytes", layout.size());
                return None;
            }
            // SAFETY: `ptr` was allocated by the global allocator with the
            // layout of `T`, which is what `Box` expects.
            unsafe {
                ptr.write(T::default());
                Box::from_raw(ptr)
            }
        };
        self.live.fetch_add(1, Ordering::AcqRel);
        Some(boxed)
    }

    /// Return a block obtained from [`Allocator::allocate`].
    pub fn deallocate<T>(&self, value: Box<T>) {
        drop(value);
        let _ = self
            .live
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
    }

    pub fn live_allocations(&self) -> usize {
        self.live.load(Ordering::Acquire)
    }
}

/// Heap-allocate an allocator for callers that cannot keep one on the stack.
pub fn allocator_alloc_default() -> Option<Box<Allocator>> {
    default_allocator().allocate::<Allocator>()
}

pub fn allocator_free(allocator: Box<Allocator>) -> Result<()> {
    default_allocator().deallocate(allocator);
    Ok(())
}
