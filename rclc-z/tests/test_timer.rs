use std::sync::Arc;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use rclc_z::allocator::Allocator;
use rclc_z::init::{Support, support_fini, support_init};
use rclc_z::rcl::{Timer, TimerCallback};
use rclc_z::ret::RetCode;
use rclc_z::timer::{
    alloc_zero_initialized_timer, timer_free, timer_init_default, timer_init_default2,
};

const MS: u64 = 1_000_000;

struct TestTimerFixture<'a> {
    support: Support<'a>,
}

impl<'a> TestTimerFixture<'a> {
    fn new(allocator: &'a Allocator) -> Self {
        let mut support = Support::default();
        support_init(&mut support, &["test_timer"], allocator).unwrap();
        Self { support }
    }
}

impl Drop for TestTimerFixture<'_> {
    fn drop(&mut self) {
        let _ = support_fini(&mut self.support);
    }
}

fn counting_callback() -> (TimerCallback, Arc<AtomicUsize>) {
    let count = Arc::new(AtomicUsize::new(0));
    let cb: TimerCallback = {
        let count = count.clone();
        Arc::new(move |_: &mut Timer, _: i64| {
            count.fetch_add(1, Ordering::SeqCst);
        })
    };
    (cb, count)
}

#[test]
fn test_timer_init_default() {
    let allocator = Allocator::new();
    let fixture = TestTimerFixture::new(&allocator);
    let (cb, count) = counting_callback();

    let mut timer = Timer::default();
    timer_init_default(&mut timer, &fixture.support, 10 * MS, cb).unwrap();
    assert!(timer.is_valid());
    assert_eq!(timer.period().unwrap(), (10 * MS) as i64);
    assert!(!timer.is_canceled().unwrap());
    assert!(!timer.is_ready().unwrap());

    thread::sleep(Duration::from_millis(20));
    assert!(timer.is_ready().unwrap());
    timer.call().unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert!(!timer.is_ready().unwrap());
    assert!(timer.time_until_next_call().unwrap() > 0);

    timer.fini().unwrap();
    assert!(!timer.is_valid());
    assert_eq!(timer.fini().unwrap_err().code(), RetCode::Error);
}

#[test]
fn test_timer_callback_sees_elapsed_time() {
    let allocator = Allocator::new();
    let fixture = TestTimerFixture::new(&allocator);
    let last = Arc::new(AtomicI64::new(-1));
    let cb: TimerCallback = {
        let last = last.clone();
        Arc::new(move |timer: &mut Timer, since_last_call: i64| {
            assert!(timer.is_valid());
            last.store(since_last_call, Ordering::SeqCst);
        })
    };

    let mut timer = Timer::default();
    timer_init_default(&mut timer, &fixture.support, 5 * MS, cb).unwrap();
    thread::sleep(Duration::from_millis(10));
    timer.call().unwrap();
    assert!(last.load(Ordering::SeqCst) >= (10 * MS) as i64);
    timer.fini().unwrap();
}

#[test]
fn test_timer_cancel_and_reset() {
    let allocator = Allocator::new();
    let fixture = TestTimerFixture::new(&allocator);
    let (cb, count) = counting_callback();

    let mut timer = Timer::default();
    timer_init_default(&mut timer, &fixture.support, MS, cb).unwrap();
    timer.cancel().unwrap();
    assert!(timer.is_canceled().unwrap());
    thread::sleep(Duration::from_millis(5));
    assert!(!timer.is_ready().unwrap());
    assert_eq!(timer.call().unwrap_err().code(), RetCode::Error);
    assert_eq!(timer.time_until_next_call().unwrap_err().code(), RetCode::Error);
    assert_eq!(count.load(Ordering::SeqCst), 0);

    timer.reset().unwrap();
    assert!(!timer.is_canceled().unwrap());
    thread::sleep(Duration::from_millis(5));
    timer.call().unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 1);
    timer.fini().unwrap();
}

#[test]
fn test_timer_without_autostart() {
    let allocator = Allocator::new();
    let fixture = TestTimerFixture::new(&allocator);
    let (cb, _count) = counting_callback();

    let mut timer = Timer::default();
    timer_init_default2(&mut timer, &fixture.support, MS, cb, false).unwrap();
    assert!(timer.is_canceled().unwrap());
    timer.fini().unwrap();
}

#[test]
fn test_timer_exchange_callback() {
    let allocator = Allocator::new();
    let fixture = TestTimerFixture::new(&allocator);
    let (first, first_count) = counting_callback();
    let (second, second_count) = counting_callback();

    let mut timer = Timer::default();
    timer_init_default(&mut timer, &fixture.support, 0, first).unwrap();
    let previous = timer.exchange_callback(Some(second)).unwrap();
    assert!(previous.is_some());
    timer.call().unwrap();
    assert_eq!(first_count.load(Ordering::SeqCst), 0);
    assert_eq!(second_count.load(Ordering::SeqCst), 1);
    timer.fini().unwrap();
}

#[test]
fn test_timer_invalid_arguments() {
    let allocator = Allocator::new();
    let fixture = TestTimerFixture::new(&allocator);
    let (cb, _count) = counting_callback();

    let mut timer = Timer::default();
    let err = timer_init_default(&mut timer, &fixture.support, u64::MAX, cb.clone()).unwrap_err();
    assert_eq!(err.code(), RetCode::InvalidArgument);

    let dead = Support::default();
    let err = timer_init_default(&mut timer, &dead, MS, cb).unwrap_err();
    assert_eq!(err.code(), RetCode::InvalidArgument);
    assert!(!timer.is_valid());
    assert_eq!(timer.call().unwrap_err().code(), RetCode::Error);
}

#[test]
fn test_timer_alloc_and_free() {
    let timer = alloc_zero_initialized_timer().unwrap();
    assert!(!timer.is_valid());
    timer_free(timer).unwrap();
}
