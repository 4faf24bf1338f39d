use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use zenoh::{Session, Wait};

use crate::lifecycle::Lifecycle;
use crate::rcl::arguments::Arguments;
use crate::rcl::init_options::InitOptions;
use crate::ret::{RclError, Result};

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

/// Hands out entity ids unique within one context.
#[derive(Debug, Default)]
pub struct EntityCounter(AtomicUsize);

impl EntityCounter {
    pub fn increment(&self) -> usize {
        self.0.fetch_add(1, Ordering::AcqRel)
    }
}

pub(crate) struct ContextImpl {
    pub session: Arc<Session>,
    pub domain_id: usize,
    pub instance_id: u64,
    pub arguments: Arguments,
    pub counter: Arc<EntityCounter>,
}

impl std::fmt::Debug for ContextImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextImpl")
            .field("zid", &self.session.zid())
            .field("domain_id", &self.domain_id)
            .field("instance_id", &self.instance_id)
            .finish_non_exhaustive()
    }
}

/// Runtime context: one session to the middleware plus the global arguments.
#[derive(Debug, Default)]
pub struct Context {
    pub(crate) state: Lifecycle<ContextImpl>,
}

impl Context {
    /// Open the session described by `options`.
    ///
    /// `args` are the full process arguments including the program name.
    pub fn init<S: AsRef<str>>(&mut self, args: &[S], options: &InitOptions) -> Result<()> {
        if !self.state.is_uninitialized() {
            return Err(RclError::error("context is already initialized or was shut down"));
        }
        let arguments = Arguments::parse(args)?;
        zenoh::init_log_from_env_or(arguments.log_level().unwrap_or("error"));

        let domain_id = options.domain_id()?;
        let config = options.zenoh_config()?;
        let session = zenoh::open(config).wait()?;
        let instance_id = NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(
            "context {instance_id} opened session {} on domain {domain_id}",
            session.zid()
        );

        self.state.start(ContextImpl {
            session: Arc::new(session),
            domain_id,
            instance_id,
            arguments,
            counter: Arc::new(EntityCounter::default()),
        })
    }

    pub fn is_valid(&self) -> bool {
        self.state.is_live()
    }

    /// Close the session. Shutting down twice is an error.
    pub fn shutdown(&mut self) -> Result<()> {
        let inner = self
            .state
            .finish()
            .ok_or_else(|| RclError::error("context is not initialized"))?;
        tracing::debug!("shutting down context {}", inner.instance_id);
        inner.session.close().wait()?;
        Ok(())
    }

    /// Zero once the context is no longer valid.
    pub fn instance_id(&self) -> u64 {
        self.state.live().map_or(0, |x| x.instance_id)
    }

    pub fn domain_id(&self) -> Option<usize> {
        self.state.live().map(|x| x.domain_id)
    }

    pub fn arguments(&self) -> Option<&Arguments> {
        self.state.live().map(|x| &x.arguments)
    }

    pub(crate) fn inner(&self) -> Result<&ContextImpl> {
        self.state.get("context")
    }
}
