//! # Database Operations
//!
//! Optional direct reads of provisioning status from the networking service's
//! MySQL database. Only used when all five connection parameters are given;
//! otherwise status is always read through the control-plane CLI.
//!
//! ## Key Components
//!
//! - [`connection`] - Connection pool built from [`DatabaseConfig`](crate::config::DatabaseConfig)
//! - [`status_lookup`] - Single-row provisioning-status lookup by id or name
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use lbaas_batchops::command::ResourceKind;
//! use lbaas_batchops::config::DatabaseConfig;
//! use lbaas_batchops::database::{DatabaseConnection, ProvisioningStatusLookup};
//!
//! # async fn example(config: &DatabaseConfig) -> lbaas_batchops::Result<()> {
//! let connection = DatabaseConnection::connect(config).await?;
//! let lookup = ProvisioningStatusLookup::new(connection.pool().clone());
//! let status = lookup.provisioning_status(ResourceKind::LoadBalancer, "lb1").await?;
//! println!("lb1 is {status}");
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod status_lookup;

pub use connection::DatabaseConnection;
pub use status_lookup::{LookupKey, ProvisioningStatusLookup};
