use crate::init::Support;
use crate::rcl::{Node, NodeOptions};
use crate::ret::{RclError, Result};

/// Create `node` in `namespace` with default node options.
pub fn node_init_default(
    node: &mut Node,
    name: &str,
    namespace: &str,
    support: &Support<'_>,
) -> Result<()> {
    node_init_with_options(node, name, namespace, support, &NodeOptions::default())
}

pub fn node_init_with_options(
    node: &mut Node,
    name: &str,
    namespace: &str,
    support: &Support<'_>,
    options: &NodeOptions,
) -> Result<()> {
    if name.is_empty() {
        return Err(RclError::invalid_argument("node name is empty"));
    }
    if !support.is_valid() {
        return Err(RclError::invalid_argument("support is not initialized"));
    }
    node.init(name, namespace, &support.context, options)
        .inspect_err(|e| tracing::error!("[node_init_with_options] {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ret::RetCode;

    #[test]
    fn test_requires_live_support() {
        let support = Support::default();
        let mut node = Node::default();
        let err = node_init_default(&mut node, "node", "", &support).unwrap_err();
        assert_eq!(err.code(), RetCode::InvalidArgument);
        assert!(!node.is_valid());
    }
}
