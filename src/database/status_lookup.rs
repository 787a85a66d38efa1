//! Provisioning-status lookup against the LBaaS v2 tables.

use crate::command::ResourceKind;
use crate::error::{BatchError, Result};
use regex::Regex;
use sqlx::MySqlPool;
use std::sync::LazyLock;
use tracing::debug;

static UUID_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-fA-F-]{36}$").expect("uuid pattern is valid"));

/// How a resource is addressed in the lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupKey<'a> {
    Id(&'a str),
    Name(&'a str),
}

impl<'a> LookupKey<'a> {
    /// Treat UUID-shaped references as ids and everything else as names
    pub fn from_reference(reference: &'a str) -> Self {
        if UUID_SHAPE.is_match(reference) {
            Self::Id(reference)
        } else {
            Self::Name(reference)
        }
    }

    fn column(&self) -> &'static str {
        match self {
            Self::Id(_) => "id",
            Self::Name(_) => "name",
        }
    }

    fn value(&self) -> &'a str {
        match self {
            Self::Id(v) | Self::Name(v) => v,
        }
    }
}

/// Table holding the provisioning status of `kind`, if it has one
pub fn table_for(kind: ResourceKind) -> Option<&'static str> {
    match kind {
        ResourceKind::LoadBalancer => Some("lbaas_loadbalancers"),
        ResourceKind::Pool => Some("lbaas_pools"),
        ResourceKind::Listener => Some("lbaas_listeners"),
        ResourceKind::HealthMonitor => Some("lbaas_healthmonitors"),
        ResourceKind::Member => Some("lbaas_members"),
        ResourceKind::L7Policy => Some("lbaas_l7policies"),
        ResourceKind::L7Rule => None,
    }
}

/// Build the single-row status query for `kind` addressed by `key`
pub fn status_query(kind: ResourceKind, key: &LookupKey<'_>) -> Result<String> {
    let table = table_for(kind).ok_or_else(|| {
        BatchError::Database(format!("no status table known for resource kind {kind}"))
    })?;
    Ok(format!(
        "SELECT provisioning_status FROM {table} WHERE {} = ?",
        key.column()
    ))
}

#[derive(Clone)]
pub struct ProvisioningStatusLookup {
    pool: MySqlPool,
}

impl ProvisioningStatusLookup {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Provisioning status of the one resource matching `reference`.
    ///
    /// Zero or several matching rows are an error.
    pub async fn provisioning_status(&self, kind: ResourceKind, reference: &str) -> Result<String> {
        let key = LookupKey::from_reference(reference);
        let sql = status_query(kind, &key)?;

        let rows: Vec<String> = sqlx::query_scalar(&sql)
            .bind(key.value())
            .fetch_all(&self.pool)
            .await?;
        debug!(kind = %kind, reference = %reference, rows = rows.len(), "Status lookup finished");

        match rows.as_slice() {
            [status] => Ok(status.clone()),
            _ => Err(BatchError::Database(format!(
                "{kind} {reference} has {} records",
                rows.len()
            ))),
        }
    }
}
