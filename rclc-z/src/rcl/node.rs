use std::sync::Arc;

use zenoh::liveliness::LivelinessToken;
use zenoh::{Session, Wait};

use crate::lifecycle::Lifecycle;
use crate::rcl::arguments::Arguments;
use crate::rcl::context::{Context, EntityCounter};
use crate::rcl::entity::NodeEntity;
use crate::rcl::topic_name;
use crate::ret::{RclError, Result};

#[derive(Debug, Clone)]
pub struct NodeOptions {
    /// Node-local arguments, parsed like the process arguments.
    pub arguments: Vec<String>,
    /// Whether the context's arguments apply to this node too.
    pub use_global_arguments: bool,
}

impl Default for NodeOptions {
    fn default() -> Self {
        Self {
            arguments: Vec::new(),
            use_global_arguments: true,
        }
    }
}

pub(crate) struct NodeImpl {
    pub entity: NodeEntity,
    pub session: Arc<Session>,
    pub counter: Arc<EntityCounter>,
    local_args: Arguments,
    global_args: Option<Arguments>,
    _lv_token: LivelinessToken,
}

impl NodeImpl {
    fn args(&self) -> impl Iterator<Item = &Arguments> {
        std::iter::once(&self.local_args).chain(self.global_args.as_ref())
    }
}

#[derive(Default)]
pub struct Node {
    state: Lifecycle<NodeImpl>,
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.state.live() {
            Some(x) => write!(f, "Node({:?})", x.entity),
            None => write!(f, "Node(<not live>)"),
        }
    }
}

impl Node {
    pub fn init(
        &mut self,
        name: &str,
        namespace: &str,
        context: &Context,
        options: &NodeOptions,
    ) -> Result<()> {
        if !self.state.is_uninitialized() {
            return Err(RclError::error("node is already initialized or was finalized"));
        }
        topic_name::validate_node_name(name)?;
        topic_name::validate_namespace(namespace)?;
        let ctx = context.inner()?;

        let local_args = Arguments::parse(&options.arguments)?;
        let global_args = options
            .use_global_arguments
            .then(|| ctx.arguments.clone());
        let arg_sets: Vec<&Arguments> = std::iter::once(&local_args)
            .chain(global_args.as_ref())
            .collect();
        let name = arg_sets
            .iter()
            .find_map(|a| a.node_name_remap(name))
            .unwrap_or(name)
            .to_string();
        let namespace = arg_sets
            .iter()
            .find_map(|a| a.namespace_remap(&name))
            .unwrap_or(namespace);
        let namespace = topic_name::normalize_namespace(namespace)?;

        let entity = NodeEntity {
            domain_id: ctx.domain_id,
            z_id: ctx.session.zid(),
            id: ctx.counter.increment(),
            name,
            namespace,
        };
        let lv_token = ctx
            .session
            .liveliness()
            .declare_token(entity.liveliness_key_expr()?)
            .wait()?;
        tracing::debug!("node {} ready", fully_qualified(&entity));

        self.state.start(NodeImpl {
            entity,
            session: ctx.session.clone(),
            counter: ctx.counter.clone(),
            local_args,
            global_args,
            _lv_token: lv_token,
        })
    }

    pub fn is_valid(&self) -> bool {
        self.state.is_live()
    }

    pub(crate) fn inner(&self) -> Result<&NodeImpl> {
        self.state.get("node")
    }

    pub fn name(&self) -> Option<&str> {
        self.state.live().map(|x| x.entity.name.as_str())
    }

    pub fn namespace(&self) -> Option<&str> {
        self.state.live().map(|x| x.entity.namespace.as_str())
    }

    pub fn fully_qualified_name(&self) -> Option<String> {
        self.state.live().map(|x| fully_qualified(&x.entity))
    }

    /// Expand `topic` and apply remap rules, local ones first.
    pub fn resolve_topic_name(&self, topic: &str) -> Result<String> {
        let x = self.inner()?;
        let NodeEntity {
            name, namespace, ..
        } = &x.entity;
        let qualified = topic_name::qualify_topic_name(topic, namespace, name)?;
        Ok(x
            .args()
            .find_map(|a| a.remap_topic(&qualified, namespace, name))
            .unwrap_or(qualified))
    }

    pub fn fini(&mut self) -> Result<()> {
        let inner = self
            .state
            .finish()
            .ok_or_else(|| RclError::error("node is not initialized"))?;
        tracing::debug!("node {} finalized", fully_qualified(&inner.entity));
        Ok(())
    }
}

fn fully_qualified(entity: &NodeEntity) -> String {
    match entity.namespace.as_str() {
        "/" => format!("/{}", entity.name),
        ns => format!("{ns}/{}", entity.name),
    }
}
