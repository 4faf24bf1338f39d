//! Client-library primitives over a zenoh session.
//!
//! This is the runtime the facade functions forward to: everything here
//! follows the classic init/fini discipline on caller-owned handles.

pub mod arguments;
pub mod attachment;
pub mod clock;
pub mod context;
pub mod entity;
pub mod init_options;
pub mod node;
pub mod publisher;
pub mod qos;
pub(crate) mod queue;
pub mod subscription;
pub mod timer;
pub mod topic_name;
pub mod type_support;

pub use clock::{Clock, ClockType};
pub use context::Context;
pub use init_options::InitOptions;
pub use node::{Node, NodeOptions};
pub use publisher::{Publisher, PublisherOptions};
pub use qos::QosProfile;
pub use subscription::{MessageInfo, Subscription, SubscriptionOptions};
pub use timer::{Timer, TimerCallback};
pub use type_support::{MessageTypeInfo, TypeHash, TypeSupport};
