use rclc_z::allocator::Allocator;
use rclc_z::init::{
    Support, get_context, support_alloc, support_fini, support_free, support_init,
    support_init_with_options,
};
use rclc_z::rcl::InitOptions;
use rclc_z::ret::RetCode;

const NO_ARGS: [&str; 0] = [];

#[test]
fn test_support_init_and_fini() {
    let allocator = Allocator::new();
    let mut support = Support::default();
    support_init(&mut support, &NO_ARGS, &allocator).unwrap();
    assert!(support.is_valid());
    assert!(support.allocator.is_some());
    assert!(support.clock.is_valid());

    support_fini(&mut support).unwrap();
    assert!(!support.is_valid());
}

#[test]
fn test_support_fini_twice_is_an_error() {
    let allocator = Allocator::new();
    let mut support = Support::default();
    support_init(&mut support, &NO_ARGS, &allocator).unwrap();
    support_fini(&mut support).unwrap();
    let err = support_fini(&mut support).unwrap_err();
    assert_eq!(err.code(), RetCode::Error);
}

#[test]
fn test_support_init_with_options() {
    let allocator = Allocator::new();
    let options = InitOptions::new().with_domain_id(42);
    let mut support = Support::default();
    support_init_with_options(&mut support, &["prog", "--ros-args"], &options, &allocator).unwrap();
    assert_eq!(support.context.domain_id(), Some(42));
    support_fini(&mut support).unwrap();
}

#[test]
fn test_support_init_rejects_bad_arguments() {
    let allocator = Allocator::new();
    let mut support = Support::default();
    let err = support_init(&mut support, &["prog", "--ros-args", "--bogus"], &allocator)
        .unwrap_err();
    assert_eq!(err.code(), RetCode::InvalidArgument);
    assert!(!support.is_valid());
    assert!(support.allocator.is_none());
}

#[test]
fn test_support_reinit_after_fini_is_an_error() {
    let allocator = Allocator::new();
    let mut support = Support::default();
    support_init(&mut support, &NO_ARGS, &allocator).unwrap();
    support_fini(&mut support).unwrap();
    assert!(support_init(&mut support, &NO_ARGS, &allocator).is_err());
}

#[test]
fn test_get_context() {
    let allocator = Allocator::new();
    let mut support = Support::default();
    assert!(!get_context(&mut support).is_valid());

    support_init(&mut support, &NO_ARGS, &allocator).unwrap();
    let first = get_context(&mut support).instance_id();
    assert!(get_context(&mut support).is_valid());
    assert_eq!(get_context(&mut support).instance_id(), first);
    support_fini(&mut support).unwrap();
}

#[test]
fn test_support_alloc_and_free() {
    let allocator = Allocator::new();
    let mut support = support_alloc(&allocator).unwrap();
    assert!(!support.is_valid());
    support_init(&mut support, &NO_ARGS, &allocator).unwrap();
    support_fini(&mut support).unwrap();
    support_free(support, &allocator).unwrap();
    assert_eq!(allocator.live_allocations(), 0);
}
