//! Classification of control-plane subcommands.
//!
//! Load-balancer subcommands follow `lbaas-<resource>-<operation>`. The first
//! argument carrying the `lbaas-` prefix is parsed into a closed set of
//! resource and operation kinds; anything else is [`Subcommand::Unclassifiable`].

use crate::constants::control_plane::SUBCOMMAND_PREFIX;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Load-balancer resource addressed by a subcommand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    LoadBalancer,
    Listener,
    Pool,
    Member,
    HealthMonitor,
    L7Policy,
    L7Rule,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LoadBalancer => "loadbalancer",
            Self::Listener => "listener",
            Self::Pool => "pool",
            Self::Member => "member",
            Self::HealthMonitor => "healthmonitor",
            Self::L7Policy => "l7policy",
            Self::L7Rule => "l7rule",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "loadbalancer" => Ok(Self::LoadBalancer),
            "listener" => Ok(Self::Listener),
            "pool" => Ok(Self::Pool),
            "member" => Ok(Self::Member),
            "healthmonitor" => Ok(Self::HealthMonitor),
            "l7policy" => Ok(Self::L7Policy),
            "l7rule" => Ok(Self::L7Rule),
            _ => Err(format!("Invalid resource kind: {s}")),
        }
    }
}

/// Operation performed by a subcommand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Create,
    Update,
    Delete,
    Show,
    List,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Show => "show",
            Self::List => "list",
        }
    }

    /// Check if this operation changes control-plane state
    pub fn is_mutating(&self) -> bool {
        matches!(self, Self::Create | Self::Update | Self::Delete)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OperationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            "show" => Ok(Self::Show),
            "list" => Ok(Self::List),
            _ => Err(format!("Invalid operation kind: {s}")),
        }
    }
}

/// Parsed `lbaas-<resource>-<operation>` subcommand
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subcommand {
    Classified {
        resource: ResourceKind,
        operation: OperationKind,
    },
    /// No `lbaas-` token, or one outside the known grammar
    Unclassifiable { token: Option<String> },
}

impl Subcommand {
    /// Classify a concrete command line by its first `lbaas-` argument
    pub fn classify(command: &str) -> Self {
        let Some(token) = command
            .split_whitespace()
            .find(|arg| arg.starts_with(SUBCOMMAND_PREFIX))
        else {
            return Self::Unclassifiable { token: None };
        };

        Self::parse_token(token)
    }

    /// Parse a single `lbaas-<resource>-<operation>` token
    pub fn parse_token(token: &str) -> Self {
        let parsed = token
            .strip_prefix(SUBCOMMAND_PREFIX)
            .and_then(|rest| rest.split_once('-'))
            .and_then(|(resource, operation)| {
                Some((resource.parse().ok()?, operation.parse().ok()?))
            });

        match parsed {
            Some((resource, operation)) => Self::Classified {
                resource,
                operation,
            },
            None => Self::Unclassifiable {
                token: Some(token.to_string()),
            },
        }
    }

    pub fn resource(&self) -> Option<ResourceKind> {
        match self {
            Self::Classified { resource, .. } => Some(*resource),
            Self::Unclassifiable { .. } => None,
        }
    }

    pub fn operation(&self) -> Option<OperationKind> {
        match self {
            Self::Classified { operation, .. } => Some(*operation),
            Self::Unclassifiable { .. } => None,
        }
    }

    /// Check if this is `lbaas-<resource>-<operation>` for the given pair
    pub fn is(&self, resource: ResourceKind, operation: OperationKind) -> bool {
        self.resource() == Some(resource) && self.operation() == Some(operation)
    }
}
