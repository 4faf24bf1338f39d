use std::thread;
use std::time::{Duration, Instant};

use rclc_z::allocator::Allocator;
use rclc_z::init::{Support, support_fini, support_init};
use rclc_z::node::node_init_default;
use rclc_z::publisher::{publisher_init, publisher_init_default};
use rclc_z::rcl::qos::{QosDurability, QosHistory, QosReliability};
use rclc_z::rcl::{MessageTypeInfo, Node, Publisher, QosProfile, Subscription, TypeSupport};
use rclc_z::ret::RetCode;
use rclc_z::subscription::{
    alloc_zero_initialized_subscription, subscription_free, subscription_init,
    subscription_init_best_effort, subscription_init_default,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Int32 {
    data: i32,
}

impl MessageTypeInfo for Int32 {
    fn type_name() -> &'static str {
        "std_msgs::msg::dds_::Int32_"
    }
}

struct TestSubscriptionFixture<'a> {
    support: Support<'a>,
    node: Node,
}

impl<'a> TestSubscriptionFixture<'a> {
    fn new(allocator: &'a Allocator) -> Self {
        let mut support = Support::default();
        support_init(&mut support, &["test_subscription"], allocator).unwrap();
        let mut node = Node::default();
        node_init_default(&mut node, "subscription_node", "", &support).unwrap();
        Self { support, node }
    }
}

impl Drop for TestSubscriptionFixture<'_> {
    fn drop(&mut self) {
        let _ = self.node.fini();
        let _ = support_fini(&mut self.support);
    }
}

fn wait_until_ready(sub: &Subscription, max_wait: Duration) {
    let deadline = Instant::now() + max_wait;
    while !sub.is_ready() && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(10));
    }
}

#[test]
fn test_subscription_init_default() {
    let allocator = Allocator::new();
    let fixture = TestSubscriptionFixture::new(&allocator);
    let ts = TypeSupport::of::<Int32>();

    let mut sub = Subscription::default();
    subscription_init_default(&mut sub, &fixture.node, &ts, "chatter").unwrap();
    assert!(sub.is_valid());
    assert_eq!(sub.topic_name(), Some("/chatter"));
    assert_eq!(sub.qos(), Some(&QosProfile::default()));
    assert!(!sub.is_ready());
    assert_eq!(sub.take::<Int32>().unwrap(), None);

    sub.fini().unwrap();
    assert!(!sub.is_valid());
    assert_eq!(sub.fini().unwrap_err().code(), RetCode::Error);
}

#[test]
fn test_subscription_init_best_effort() {
    let allocator = Allocator::new();
    let fixture = TestSubscriptionFixture::new(&allocator);
    let ts = TypeSupport::of::<Int32>();

    let mut sub = Subscription::default();
    subscription_init_best_effort(&mut sub, &fixture.node, &ts, "chatter").unwrap();
    assert_eq!(sub.qos().unwrap().reliability, QosReliability::BestEffort);
    sub.fini().unwrap();
}

#[test]
fn test_pub_sub_round_trip() {
    let allocator = Allocator::new();
    let fixture = TestSubscriptionFixture::new(&allocator);
    let ts = TypeSupport::of::<Int32>();

    let mut sub = Subscription::default();
    subscription_init_default(&mut sub, &fixture.node, &ts, "round_trip").unwrap();
    let mut publisher = Publisher::default();
    publisher_init_default(&mut publisher, &fixture.node, &ts, "round_trip").unwrap();

    publisher.publish(&Int32 { data: 42 }).unwrap();
    let msg: Int32 = sub.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(msg, Int32 { data: 42 });

    publisher.publish(&Int32 { data: 43 }).unwrap();
    wait_until_ready(&sub, Duration::from_secs(5));
    let (msg, info) = sub.take_with_info::<Int32>().unwrap().unwrap();
    assert_eq!(msg.data, 43);
    let info = info.unwrap();
    assert_eq!(info.publisher_gid, publisher.gid().unwrap());
    assert_eq!(info.publication_sequence_number, 2);

    publisher.fini().unwrap();
    sub.fini().unwrap();
}

#[test]
fn test_keep_last_drops_oldest() {
    let allocator = Allocator::new();
    let fixture = TestSubscriptionFixture::new(&allocator);
    let ts = TypeSupport::of::<Int32>();

    let qos = QosProfile::default().with_history(QosHistory::KeepLast(2));
    let mut sub = Subscription::default();
    subscription_init(&mut sub, &fixture.node, &ts, "keep_last", &qos).unwrap();
    let mut publisher = Publisher::default();
    publisher_init(&mut publisher, &fixture.node, &ts, "keep_last", &qos).unwrap();

    for data in 0..5 {
        publisher.publish(&Int32 { data }).unwrap();
    }
    thread::sleep(Duration::from_millis(200));

    let mut received = Vec::new();
    while let Some(msg) = sub.take::<Int32>().unwrap() {
        received.push(msg.data);
    }
    assert_eq!(received, [3, 4]);

    publisher.fini().unwrap();
    sub.fini().unwrap();
}

#[test]
fn test_take_serialized() {
    let allocator = Allocator::new();
    let fixture = TestSubscriptionFixture::new(&allocator);
    let ts = TypeSupport::of::<Int32>();

    let mut sub = Subscription::default();
    subscription_init_default(&mut sub, &fixture.node, &ts, "serialized").unwrap();
    let mut publisher = Publisher::default();
    publisher_init_default(&mut publisher, &fixture.node, &ts, "serialized").unwrap();

    let payload = rclc_z::rcl::type_support::serialize(&Int32 { data: -1 }).unwrap();
    publisher.publish_serialized(payload.clone()).unwrap();
    wait_until_ready(&sub, Duration::from_secs(5));
    assert_eq!(sub.take_serialized().unwrap(), Some(payload));
    assert_eq!(sub.take_serialized().unwrap(), None);

    publisher.fini().unwrap();
    sub.fini().unwrap();
}

#[test]
fn test_recv_timeout_times_out() {
    let allocator = Allocator::new();
    let fixture = TestSubscriptionFixture::new(&allocator);
    let ts = TypeSupport::of::<Int32>();

    let mut sub = Subscription::default();
    subscription_init_default(&mut sub, &fixture.node, &ts, "silent").unwrap();
    let err = sub.recv_timeout::<Int32>(Duration::from_millis(50)).unwrap_err();
    assert_eq!(err.code(), RetCode::Timeout);
    sub.fini().unwrap();
}

#[test]
fn test_subscription_invalid_arguments() {
    let allocator = Allocator::new();
    let fixture = TestSubscriptionFixture::new(&allocator);
    let ts = TypeSupport::of::<Int32>();

    let mut sub = Subscription::default();
    let err = subscription_init_default(&mut sub, &fixture.node, &ts, "").unwrap_err();
    assert_eq!(err.code(), RetCode::InvalidArgument);

    let dead = Node::default();
    let err = subscription_init_default(&mut sub, &dead, &ts, "chatter").unwrap_err();
    assert_eq!(err.code(), RetCode::InvalidArgument);

    let qos = QosProfile::default().with_durability(QosDurability::TransientLocal);
    let err = subscription_init(&mut sub, &fixture.node, &ts, "chatter", &qos).unwrap_err();
    assert_eq!(err.code(), RetCode::Unsupported);

    let qos = QosProfile::default().with_history(QosHistory::KeepLast(0));
    let err = subscription_init(&mut sub, &fixture.node, &ts, "chatter", &qos).unwrap_err();
    assert_eq!(err.code(), RetCode::InvalidArgument);
    assert!(!sub.is_valid());
}

#[test]
fn test_subscription_alloc_and_free() {
    let allocator = Allocator::new();
    let sub = alloc_zero_initialized_subscription(&allocator).unwrap();
    assert!(!sub.is_valid());
    subscription_free(sub, &allocator).unwrap();
    assert_eq!(allocator.live_allocations(), 0);
}
