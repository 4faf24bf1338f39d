//! Command line handling for the `--ros-args` section of the process arguments.

use crate::rcl::topic_name;
use crate::ret::{RclError, Result};

const ROS_ARGS_FLAG: &str = "--ros-args";
const ROS_ARGS_END_TOKEN: &str = "--";
const REMAP_FLAG: &str = "--remap";
const SHORT_REMAP_FLAG: &str = "-r";
const LOG_LEVEL_FLAG: &str = "--log-level";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemapTarget {
    Topic { from: String, to: String },
    NodeName(String),
    Namespace(String),
}

/// A single `[node:]from:=to` rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemapRule {
    pub node: Option<String>,
    pub target: RemapTarget,
}

impl RemapRule {
    fn applies_to(&self, node_name: &str) -> bool {
        self.node.as_deref().is_none_or(|n| n == node_name)
    }
}

impl std::str::FromStr for RemapRule {
    type Err = RclError;

    fn from_str(rule: &str) -> Result<Self> {
        let invalid = || RclError::invalid_argument(format!("invalid remap rule '{rule}'"));
        let (lhs, rhs) = rule.split_once(":=").ok_or_else(invalid)?;
        if rhs.is_empty() || rhs.contains(":=") {
            return Err(invalid());
        }
        let (node, from) = match lhs.split_once(':') {
            Some((node, from)) => {
                topic_name::validate_node_name(node).map_err(|_| invalid())?;
                (Some(node.to_string()), from)
            }
            None => (None, lhs),
        };
        if from.is_empty() || from.contains(':') {
            return Err(invalid());
        }
        let target = match from {
            "__node" | "__name" => {
                topic_name::validate_node_name(rhs).map_err(|_| invalid())?;
                RemapTarget::NodeName(rhs.to_string())
            }
            "__ns" => {
                if !rhs.starts_with('/') {
                    return Err(invalid());
                }
                topic_name::validate_namespace(rhs).map_err(|_| invalid())?;
                RemapTarget::Namespace(rhs.to_string())
            }
            _ => {
                // Both sides must qualify under some node to be usable later.
                topic_name::qualify_topic_name(from, "/", "node").map_err(|_| invalid())?;
                topic_name::qualify_topic_name(rhs, "/", "node").map_err(|_| invalid())?;
                RemapTarget::Topic {
                    from: from.to_string(),
                    to: rhs.to_string(),
                }
            }
        };
        Ok(RemapRule { node, target })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arguments {
    remap_rules: Vec<RemapRule>,
    log_level: Option<String>,
    unparsed_args: Vec<String>,
}

fn parse_log_level(level: &str) -> Result<String> {
    let level = level.to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(level),
        "warning" => Ok("warn".to_string()),
        "fatal" => Ok("error".to_string()),
        _ => Err(RclError::invalid_argument(format!(
            "unknown log level '{level}'"
        ))),
    }
}

impl Arguments {
    /// Parse the process arguments, program name included.
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        let mut parsed = Arguments::default();
        let mut in_ros_args = false;
        let mut iter = args.iter().map(AsRef::as_ref);

        while let Some(arg) = iter.next() {
            if !in_ros_args {
                if arg == ROS_ARGS_FLAG {
                    in_ros_args = true;
                } else {
                    parsed.unparsed_args.push(arg.to_string());
                }
                continue;
            }
            match arg {
                ROS_ARGS_FLAG => {}
                ROS_ARGS_END_TOKEN => in_ros_args = false,
                REMAP_FLAG | SHORT_REMAP_FLAG => {
                    let rule = iter.next().ok_or_else(|| {
                        RclError::invalid_argument(format!("{arg} expects a rule"))
                    })?;
                    parsed.remap_rules.push(rule.parse()?);
                }
                LOG_LEVEL_FLAG => {
                    let level = iter.next().ok_or_else(|| {
                        RclError::invalid_argument(format!("{arg} expects a level"))
                    })?;
                    parsed.log_level = Some(parse_log_level(level)?);
                }
                other => {
                    return Err(RclError::invalid_argument(format!(
                        "unknown ROS argument '{other}'"
                    )));
                }
            }
        }

        tracing::debug!(
            "parsed arguments: {} remap rule(s), log level {:?}",
            parsed.remap_rules.len(),
            parsed.log_level
        );
        Ok(parsed)
    }

    pub fn remap_rules(&self) -> &[RemapRule] {
        &self.remap_rules
    }

    pub fn log_level(&self) -> Option<&str> {
        self.log_level.as_deref()
    }

    pub fn unparsed_args(&self) -> &[String] {
        &self.unparsed_args
    }

    /// Last rule wins, matching command line override order.
    fn find<'a, F, T>(&'a self, node_name: &str, f: F) -> Option<T>
    where
        F: Fn(&'a RemapTarget) -> Option<T>,
    {
        self.remap_rules
            .iter()
            .rev()
            .filter(|rule| rule.applies_to(node_name))
            .find_map(|rule| f(&rule.target))
    }

    pub fn node_name_remap(&self, node_name: &str) -> Option<&str> {
        self.find(node_name, |t| match t {
            RemapTarget::NodeName(name) => Some(name.as_str()),
            _ => None,
        })
    }

    pub fn namespace_remap(&self, node_name: &str) -> Option<&str> {
        self.find(node_name, |t| match t {
            RemapTarget::Namespace(ns) => Some(ns.as_str()),
            _ => None,
        })
    }

    /// Apply the topic rules to an already qualified topic name.
    pub fn remap_topic(
        &self,
        qualified: &str,
        namespace: &str,
        node_name: &str,
    ) -> Option<String> {
        self.find(node_name, |t| match t {
            RemapTarget::Topic { from, to } => {
                let from = topic_name::qualify_topic_name(from, namespace, node_name).ok()?;
                if from != qualified {
                    return None;
                }
                topic_name::qualify_topic_name(to, namespace, node_name).ok()
            }
            _ => None,
        })
    }
}
