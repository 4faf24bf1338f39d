use std::sync::atomic::{AtomicI64, Ordering};

use serde::Serialize;
use zenoh::Wait;
use zenoh::liveliness::LivelinessToken;
use zenoh::qos::CongestionControl;

use crate::lifecycle::Lifecycle;
use crate::rcl::attachment::{Attachment, GidArray};
use crate::rcl::entity::{EndpointEntity, EntityKind};
use crate::rcl::node::Node;
use crate::rcl::qos::{QosProfile, QosReliability};
use crate::rcl::type_support::{self, TypeSupport};
use crate::ret::{RclError, Result};

#[derive(Debug, Clone, Default)]
pub struct PublisherOptions {
    pub qos: QosProfile,
}

struct PublisherImpl {
    entity: EndpointEntity,
    gid: GidArray,
    sn: AtomicI64,
    inner: zenoh::pubsub::Publisher<'static>,
    _lv_token: LivelinessToken,
}

impl PublisherImpl {
    fn next_attachment(&self) -> Attachment {
        Attachment::stamped(self.sn.fetch_add(1, Ordering::Relaxed) + 1, self.gid)
    }
}

#[derive(Default)]
pub struct Publisher {
    state: Lifecycle<PublisherImpl>,
}

impl std::fmt::Debug for Publisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.state.live() {
            Some(x) => write!(f, "Publisher({})", x.entity.topic),
            None => write!(f, "Publisher(<not live>)"),
        }
    }
}

impl Publisher {
    pub fn init(
        &mut self,
        node: &Node,
        type_support: &TypeSupport,
        topic: &str,
        options: &PublisherOptions,
    ) -> Result<()> {
        if !self.state.is_uninitialized() {
            return Err(RclError::error(
                "publisher is already initialized or was finalized",
            ));
        }
        options.qos.check_supported()?;
        let topic = node.resolve_topic_name(topic)?;
        let node_impl = node.inner()?;

        let entity = EndpointEntity {
            id: node_impl.counter.increment(),
            node: node_impl.entity.clone(),
            kind: EntityKind::Publisher,
            topic,
            type_support: type_support.clone(),
            qos: options.qos,
        };
        let key_expr = entity.topic_key_expr()?;
        tracing::debug!("[PUB] key expression {key_expr}, {}", entity.qos);

        let congestion_control = match entity.qos.reliability {
            QosReliability::Reliable => CongestionControl::Block,
            QosReliability::BestEffort => CongestionControl::Drop,
        };
        let inner = node_impl
            .session
            .declare_publisher(key_expr)
            .congestion_control(congestion_control)
            .wait()?;
        let lv_token = node_impl
            .session
            .liveliness()
            .declare_token(entity.liveliness_key_expr()?)
            .wait()?;
        let gid = entity.gid()?;
        tracing::debug!("[PUB] ready on {}", entity.topic);

        self.state.start(PublisherImpl {
            entity,
            gid,
            sn: AtomicI64::new(0),
            inner,
            _lv_token: lv_token,
        })
    }

    pub fn is_valid(&self) -> bool {
        self.state.is_live()
    }

    fn inner(&self) -> Result<&PublisherImpl> {
        self.state.get("publisher")
    }

    pub fn topic_name(&self) -> Option<&str> {
        self.state.live().map(|x| x.entity.topic.as_str())
    }

    pub fn qos(&self) -> Option<&QosProfile> {
        self.state.live().map(|x| &x.entity.qos)
    }

    pub fn gid(&self) -> Option<GidArray> {
        self.state.live().map(|x| x.gid)
    }

    /// CDR-encode `msg` and send it.
    pub fn publish<M: Serialize>(&self, msg: &M) -> Result<()> {
        let payload = type_support::serialize(msg)?;
        self.publish_serialized(payload)
    }

    /// Send an already CDR-encoded payload.
    pub fn publish_serialized(&self, payload: impl Into<zenoh::bytes::ZBytes>) -> Result<()> {
        let x = self.inner()?;
        let attachment = x.next_attachment();
        tracing::trace!("[PUB] sn={} on {}", attachment.sequence_number, x.entity.topic);
        x.inner.put(payload).attachment(attachment).wait()?;
        Ok(())
    }

    pub fn fini(&mut self) -> Result<()> {
        let x = self
            .state
            .finish()
            .ok_or_else(|| RclError::error("publisher is not initialized"))?;
        x.inner.undeclare().wait()?;
        Ok(())
    }
}
