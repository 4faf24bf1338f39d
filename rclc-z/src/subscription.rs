use crate::allocator::Allocator;
use crate::rcl::{Node, QosProfile, Subscription, SubscriptionOptions, TypeSupport};
use crate::ret::{RclError, Result};

fn check_args(node: &Node, topic_name: &str) -> Result<()> {
    if !node.is_valid() {
        return Err(RclError::invalid_argument("node is not initialized"));
    }
    if topic_name.is_empty() {
        return Err(RclError::invalid_argument("topic name is empty"));
    }
    Ok(())
}

pub fn subscription_init_default(
    subscription: &mut Subscription,
    node: &Node,
    type_support: &TypeSupport,
    topic_name: &str,
) -> Result<()> {
    subscription_init(subscription, node, type_support, topic_name, &QosProfile::default())
}

pub fn subscription_init_best_effort(
    subscription: &mut Subscription,
    node: &Node,
    type_support: &TypeSupport,
    topic_name: &str,
) -> Result<()> {
    let qos = QosProfile::best_effort();
    subscription_init(subscription, node, type_support, topic_name, &qos)
}

pub fn subscription_init(
    subscription: &mut Subscription,
    node: &Node,
    type_support: &TypeSupport,
    topic_name: &str,
    qos: &QosProfile,
) -> Result<()> {
    check_args(node, topic_name)?;
    let options = SubscriptionOptions { qos: *qos };
    subscription
        .init(node, type_support, topic_name, &options)
        .inspect_err(|e| tracing::error!("[subscription_init] '{topic_name}': {e}"))
}

pub fn alloc_zero_initialized_subscription(allocator: &Allocator) -> Option<Box<Subscription>> {
    allocator.allocate::<Subscription>()
}

pub fn subscription_free(subscription: Box<Subscription>, allocator: &Allocator) -> Result<()> {
    allocator.deallocate(subscription);
    Ok(())
}
