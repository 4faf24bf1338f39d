//! Receive queue behind a subscription.
//!
//! A keep-last queue holds at most `depth` samples and evicts the oldest one
//! when a new sample arrives on a full queue. Keep-all queues are unbounded.

use std::collections::VecDeque;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

pub(crate) struct BoundedQueue<T> {
    data: Mutex<VecDeque<T>>,
    not_empty: Condvar,
    /// `usize::MAX` for keep-all.
    capacity: usize,
}

impl<T> BoundedQueue<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            data: Mutex::new(VecDeque::with_capacity(capacity.min(1024))),
            not_empty: Condvar::new(),
            capacity,
        }
    }

    pub fn unbounded() -> Self {
        Self::new(usize::MAX)
    }

    /// Push `item`, returning `true` when the oldest element was dropped.
    pub fn push(&self, item: T) -> bool {
        let mut data = self.data.lock();
        let dropped = data.len() >= self.capacity && data.pop_front().is_some();
        data.push_back(item);
        self.not_empty.notify_one();
        dropped
    }

    pub fn try_recv(&self) -> Option<T> {
        self.data.lock().pop_front()
    }

    /// `None` once `timeout` elapsed with nothing to take.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<T> {
        let mut data = self.data.lock();
        if data.is_empty() {
            let result = self.not_empty.wait_for(&mut data, timeout);
            if result.timed_out() && data.is_empty() {
                return None;
            }
        }
        data.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.data.lock().is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.lock().len()
    }
}
