use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use zenoh::Wait;
use zenoh::liveliness::LivelinessToken;
use zenoh::sample::Sample;

use crate::lifecycle::Lifecycle;
use crate::rcl::attachment::{Attachment, GidArray};
use crate::rcl::entity::{EndpointEntity, EntityKind};
use crate::rcl::node::Node;
use crate::rcl::qos::{QosHistory, QosProfile};
use crate::rcl::queue::BoundedQueue;
use crate::rcl::type_support::{self, TypeSupport};
use crate::ret::{RclError, Result};

#[derive(Debug, Clone, Default)]
pub struct SubscriptionOptions {
    pub qos: QosProfile,
}

/// Metadata the publisher attached to a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageInfo {
    pub source_timestamp: i64,
    pub publication_sequence_number: i64,
    pub publisher_gid: GidArray,
}

impl From<Attachment> for MessageInfo {
    fn from(value: Attachment) -> Self {
        Self {
            source_timestamp: value.source_timestamp,
            publication_sequence_number: value.sequence_number,
            publisher_gid: value.source_gid,
        }
    }
}

struct SubscriptionImpl {
    entity: EndpointEntity,
    queue: Arc<BoundedQueue<Sample>>,
    subscriber: zenoh::pubsub::Subscriber<()>,
    _lv_token: LivelinessToken,
}

#[derive(Default)]
pub struct Subscription {
    state: Lifecycle<SubscriptionImpl>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.state.live() {
            Some(x) => write!(f, "Subscription({})", x.entity.topic),
            None => write!(f, "Subscription(<not live>)"),
        }
    }
}

impl Subscription {
    pub fn init(
        &mut self,
        node: &Node,
        type_support: &TypeSupport,
        topic: &str,
        options: &SubscriptionOptions,
    ) -> Result<()> {
        if !self.state.is_uninitialized() {
            return Err(RclError::error(
                "subscription is already initialized or was finalized",
            ));
        }
        options.qos.check_supported()?;
        let topic = node.resolve_topic_name(topic)?;
        let node_impl = node.inner()?;

        let entity = EndpointEntity {
            id: node_impl.counter.increment(),
            node: node_impl.entity.clone(),
            kind: EntityKind::Subscription,
            topic,
            type_support: type_support.clone(),
            qos: options.qos,
        };
        let key_expr = entity.topic_key_expr()?;
        tracing::debug!("[SUB] key expression {key_expr}, {}", entity.qos);

        let queue = Arc::new(match entity.qos.history {
            QosHistory::KeepLast(depth) => BoundedQueue::new(depth),
            QosHistory::KeepAll => BoundedQueue::unbounded(),
        });
        let subscriber = {
            let queue = queue.clone();
            let topic = entity.topic.clone();
            node_impl
                .session
                .declare_subscriber(key_expr)
                .callback(move |sample| {
                    if queue.push(sample) {
                        tracing::debug!(
                            "[SUB] {topic}: queue full at {}, dropped oldest sample",
                            queue.len()
                        );
                    }
                })
                .wait()?
        };
        let lv_token = node_impl
            .session
            .liveliness()
            .declare_token(entity.liveliness_key_expr()?)
            .wait()?;
        tracing::debug!("[SUB] ready on {}", entity.topic);

        self.state.start(SubscriptionImpl {
            entity,
            queue,
            subscriber,
            _lv_token: lv_token,
        })
    }

    pub fn is_valid(&self) -> bool {
        self.state.is_live()
    }

    fn inner(&self) -> Result<&SubscriptionImpl> {
        self.state.get("subscription")
    }

    pub fn topic_name(&self) -> Option<&str> {
        self.state.live().map(|x| x.entity.topic.as_str())
    }

    pub fn qos(&self) -> Option<&QosProfile> {
        self.state.live().map(|x| &x.entity.qos)
    }

    /// Whether a sample is waiting to be taken.
    pub fn is_ready(&self) -> bool {
        self.state.live().is_some_and(|x| !x.queue.is_empty())
    }

    fn take_sample(&self) -> Result<Option<Sample>> {
        Ok(self.inner()?.queue.try_recv())
    }

    /// Raw CDR payload of the oldest pending sample, `None` if there is none.
    pub fn take_serialized(&self) -> Result<Option<Vec<u8>>> {
        Ok(self
            .take_sample()?
            .map(|sample| sample.payload().to_bytes().into_owned()))
    }

    pub fn take<M: DeserializeOwned>(&self) -> Result<Option<M>> {
        Ok(self.take_with_info()?.map(|(msg, _)| msg))
    }

    /// Like [`Subscription::take`], also returning the publisher metadata
    /// when the sample carried any.
    pub fn take_with_info<M: DeserializeOwned>(&self) -> Result<Option<(M, Option<MessageInfo>)>> {
        let Some(sample) = self.take_sample()? else {
            return Ok(None);
        };
        decode(&sample).map(Some)
    }

    /// Block until a sample arrives or `timeout` elapses.
    pub fn recv_timeout<M: DeserializeOwned>(&self, timeout: Duration) -> Result<M> {
        match self.inner()?.queue.recv_timeout(timeout) {
            Some(sample) => decode(&sample).map(|(msg, _)| msg),
            None => Err(RclError::Timeout),
        }
    }

    pub fn fini(&mut self) -> Result<()> {
        let x = self
            .state
            .finish()
            .ok_or_else(|| RclError::error("subscription is not initialized"))?;
        x.subscriber.undeclare().wait()?;
        Ok(())
    }
}

fn decode<M: DeserializeOwned>(sample: &Sample) -> Result<(M, Option<MessageInfo>)> {
    let msg = type_support::deserialize(&sample.payload().to_bytes())?;
    let info = match sample.attachment().map(Attachment::try_from) {
        Some(Ok(attachment)) => Some(attachment.into()),
        Some(Err(e)) => {
            tracing::warn!("[SUB] ignoring malformed attachment: {e}");
            None
        }
        None => None,
    };
    Ok((msg, info))
}
