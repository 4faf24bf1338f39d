//! Name validation and expansion for nodes, namespaces and topics.

use crate::ret::RclError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    EmptyTopic,
    InvalidTopic(String),
    InvalidNamespace(String),
    InvalidNodeName(String),
}

impl std::fmt::Display for NameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTopic => write!(f, "topic name is empty"),
            Self::InvalidTopic(s) => write!(f, "invalid topic name: {s}"),
            Self::InvalidNamespace(s) => write!(f, "invalid namespace: {s}"),
            Self::InvalidNodeName(s) => write!(f, "invalid node name: {s}"),
        }
    }
}

impl std::error::Error for NameError {}

impl From<NameError> for RclError {
    fn from(value: NameError) -> Self {
        RclError::InvalidArgument(value.to_string())
    }
}

/// A name token starts with a letter or underscore and continues with
/// alphanumerics or underscores.
fn is_valid_token(token: &str) -> bool {
    let mut bytes = token.bytes();
    match bytes.next() {
        Some(b) if b.is_ascii_alphabetic() || b == b'_' => {}
        _ => return false,
    }
    bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

fn all_tokens_valid(path: &str) -> Option<&str> {
    path.split('/')
        .filter(|part| !part.is_empty())
        .find(|part| !is_valid_token(part))
}

pub fn validate_node_name(name: &str) -> Result<(), NameError> {
    if name.is_empty() {
        return Err(NameError::InvalidNodeName("node name is empty".to_string()));
    }
    if !is_valid_token(name) {
        return Err(NameError::InvalidNodeName(format!("'{name}'")));
    }
    Ok(())
}

pub fn validate_namespace(namespace: &str) -> Result<(), NameError> {
    if namespace.is_empty() || namespace == "/" {
        return Ok(());
    }
    if namespace.ends_with('/') {
        return Err(NameError::InvalidNamespace(format!(
            "'{namespace}' ends with '/'"
        )));
    }
    if namespace.contains("//") {
        return Err(NameError::InvalidNamespace(format!(
            "'{namespace}' has an empty token"
        )));
    }
    if let Some(bad) = all_tokens_valid(namespace) {
        return Err(NameError::InvalidNamespace(format!(
            "'{namespace}' has invalid token '{bad}'"
        )));
    }
    Ok(())
}

/// Turns a validated namespace into its absolute form: "" becomes "/" and
/// "ns" becomes "/ns".
pub fn normalize_namespace(namespace: &str) -> Result<String, NameError> {
    validate_namespace(namespace)?;
    Ok(if namespace.is_empty() {
        "/".to_string()
    } else if namespace.starts_with('/') {
        namespace.to_string()
    } else {
        format!("/{namespace}")
    })
}

/// Expand `topic` into a fully qualified name.
///
/// Absolute names are kept, `~` names are placed under the node and
/// relative names under the namespace.
pub fn qualify_topic_name(
    topic: &str,
    namespace: &str,
    node_name: &str,
) -> Result<String, NameError> {
    if topic.is_empty() {
        return Err(NameError::EmptyTopic);
    }
    validate_node_name(node_name)?;
    let namespace = normalize_namespace(namespace)?;
    let prefix = namespace.trim_end_matches('/');

    let qualified = if let Some(private) = topic.strip_prefix('~') {
        let rest = private.strip_prefix('/').unwrap_or(private);
        if rest.is_empty() {
            format!("{prefix}/{node_name}")
        } else {
            format!("{prefix}/{node_name}/{rest}")
        }
    } else if topic.starts_with('/') {
        topic.to_string()
    } else {
        format!("{prefix}/{topic}")
    };

    let qualified = match qualified.strip_suffix('/') {
        Some(stripped) => stripped.to_string(),
        None => qualified,
    };
    if qualified.is_empty() || qualified.contains("//") {
        return Err(NameError::InvalidTopic(format!("'{topic}'")));
    }
    if let Some(bad) = all_tokens_valid(&qualified) {
        return Err(NameError::InvalidTopic(format!(
            "'{topic}' has invalid token '{bad}'"
        )));
    }
    Ok(qualified)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualify() {
        assert_eq!(qualify_topic_name("/chatter", "/ns", "node").unwrap(), "/chatter");
        assert_eq!(qualify_topic_name("chatter", "", "node").unwrap(), "/chatter");
        assert_eq!(qualify_topic_name("chatter", "/", "node").unwrap(), "/chatter");
        assert_eq!(qualify_topic_name("chatter", "/ns", "node").unwrap(), "/ns/chatter");
        assert_eq!(qualify_topic_name("chatter", "ns", "node").unwrap(), "/ns/chatter");
        assert_eq!(qualify_topic_name("~", "/ns", "node").unwrap(), "/ns/node");
        assert_eq!(qualify_topic_name("~/priv", "/", "node").unwrap(), "/node/priv");
        assert_eq!(qualify_topic_name("a/b/", "/ns", "node").unwrap(), "/ns/a/b");
    }

    #[test]
    fn test_qualify_rejects() {
        assert_eq!(qualify_topic_name("", "/", "node"), Err(NameError::EmptyTopic));
        assert!(qualify_topic_name("/", "/", "node").is_err());
        assert!(qualify_topic_name("1abc", "/", "node").is_err());
        assert!(qualify_topic_name("a//b", "/", "node").is_err());
        assert!(qualify_topic_name("chat ter", "/", "node").is_err());
        assert!(qualify_topic_name("chatter", "/ns/", "node").is_err());
        assert!(qualify_topic_name("chatter", "/", "9node").is_err());
    }

    #[test]
    fn test_namespace() {
        assert_eq!(normalize_namespace("").unwrap(), "/");
        assert_eq!(normalize_namespace("a/b").unwrap(), "/a/b");
        assert!(normalize_namespace("/a//b").is_err());
        assert!(normalize_namespace("/a-b").is_err());
    }
}
