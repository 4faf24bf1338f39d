use crate::allocator::Allocator;
use crate::rcl::{Node, Publisher, PublisherOptions, QosProfile, TypeSupport};
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

/// Reliable publisher with the default profile.
pub fn publisher_init_default(
    publisher: &mut Publisher,
    node: &Node,
    type_support: &TypeSupport,
    topic_name: &str,
) -> Result<()> {
    publisher_init(publisher, node, type_support, topic_name, &QosProfile::default())
}

/// Default profile with best effort reliability.
pub fn publisher_init_best_effort(
    publisher: &mut Publisher,
    node: &Node,
    type_support: &TypeSupport,
    topic_name: &str,
) -> Result<()> {
    let qos = QosProfile::best_effort();
    publisher_init(publisher, node, type_support, topic_name, &qos)
}

pub fn publisher_init(
    publisher: &mut Publisher,
    node: &Node,
    type_support: &TypeSupport,
    topic_name: &str,
    qos: &QosProfile,
) -> Result<()> {
    check_args(node, topic_name)?;
    let options = PublisherOptions { qos: *qos };
    publisher
        .init(node, type_support, topic_name, &options)
        .inspect_err(|e| tracing::error!("[publisher_init] '{topic_name}': {e}"))
}

/// Heap-allocate an uninitialized publisher.
pub fn publisher_alloc(allocator: &Allocator) -> Option<Box<Publisher>> {
    allocator.allocate::<Publisher>()
}

pub fn publisher_free(publisher: Box<Publisher>, allocator: &Allocator) -> Result<()> {
    allocator.deallocate(publisher);
    Ok(())
}
