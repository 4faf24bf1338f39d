//! Key expressions under which nodes and endpoints are announced.

use sha2::Digest;
use zenoh::key_expr::KeyExpr;
use zenoh::session::ZenohId;

use crate::rcl::attachment::GidArray;
use crate::rcl::qos::QosProfile;
use crate::rcl::type_support::TypeSupport;
use crate::ret::{RclError, Result};

pub const ADMIN_SPACE: &str = "@ros2_lv";
const EMPTY_NAMESPACE: &str = "%";
const EMPTY_ENCLAVE: &str = "%";

#[derive(Debug, Hash, strum::Display, Eq, PartialEq, Clone, Copy)]
pub enum EntityKind {
    #[strum(serialize = "NN")]
    Node,
    #[strum(serialize = "MP")]
    Publisher,
    #[strum(serialize = "MS")]
    Subscription,
}

fn mangle(name: &str) -> String {
    name.replace('/', "%")
}

fn to_key_expr(s: String) -> Result<KeyExpr<'static>> {
    KeyExpr::try_from(s).map_err(|e| RclError::error(format!("invalid key expression: {e}")))
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeEntity {
    pub domain_id: usize,
    pub z_id: ZenohId,
    pub id: usize,
    pub name: String,
    pub namespace: String,
}

impl NodeEntity {
    fn mangled_namespace(&self) -> String {
        match self.namespace.as_str() {
            "" | "/" => EMPTY_NAMESPACE.to_string(),
            ns => mangle(ns),
        }
    }

    // <ADMIN_SPACE>/<domain_id>/<zid>/<nid>/<nid>/NN/<enclave>/<namespace>/<node_name>
    pub fn liveliness_key_expr(&self) -> Result<KeyExpr<'static>> {
        let Self {
            domain_id,
            z_id,
            id,
            name,
            ..
        } = self;
        let kind = EntityKind::Node;
        let namespace = self.mangled_namespace();
        to_key_expr(format!(
            "{ADMIN_SPACE}/{domain_id}/{z_id}/{id}/{id}/{kind}/{EMPTY_ENCLAVE}/{namespace}/{name}"
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EndpointEntity {
    pub id: usize,
    pub node: NodeEntity,
    pub kind: EntityKind,
    /// Fully qualified topic name.
    pub topic: String,
    pub type_support: TypeSupport,
    pub qos: QosProfile,
}

impl EndpointEntity {
    // <ADMIN_SPACE>/<domain_id>/<zid>/<nid>/<eid>/<kind>/<enclave>/<namespace>/<node_name>/<topic>/<type>/<hash>/<qos>
    pub fn liveliness_key_expr(&self) -> Result<KeyExpr<'static>> {
        let node = &self.node;
        let namespace = node.mangled_namespace();
        to_key_expr(format!(
            "{ADMIN_SPACE}/{}/{}/{}/{}/{}/{EMPTY_ENCLAVE}/{namespace}/{}/{}/{}/{}/{}",
            node.domain_id,
            node.z_id,
            node.id,
            self.id,
            self.kind,
            mangle(&node.name),
            mangle(&self.topic),
            mangle(&self.type_support.name),
            self.type_support.hash,
            self.qos.encode(),
        ))
    }

    // <domain_id>/<topic>/<type>/<hash>
    pub fn topic_key_expr(&self) -> Result<KeyExpr<'static>> {
        let topic = self.topic.trim_matches('/');
        to_key_expr(format!(
            "{}/{}/{}/{}",
            self.node.domain_id,
            mangle(topic),
            self.type_support.name,
            self.type_support.hash
        ))
    }

    /// Stable 16-byte id derived from the liveliness key.
    pub fn gid(&self) -> Result<GidArray> {
        let key = self.liveliness_key_expr()?;
        let hash = sha2::Sha256::digest(key.as_str().as_bytes());
        let mut gid = GidArray::default();
        let len = gid.len();
        gid.copy_from_slice(&hash[..len]);
        Ok(gid)
    }
}
