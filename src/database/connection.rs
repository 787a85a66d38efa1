use crate::config::DatabaseConfig;
use crate::error::{BatchError, Result};
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::{MySqlPool, Row};
use std::time::Duration;
use tracing::info;

const MAX_CONNECTIONS: u32 = 2;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

pub struct DatabaseConnection {
    pool: MySqlPool,
}

impl DatabaseConnection {
    /// Connect using a fully specified database configuration
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let options = Self::connect_options(config)?;

        let pool = MySqlPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(options)
            .await?;

        info!(
            host = config.hostname.as_deref().unwrap_or(""),
            database = config.dbname.as_deref().unwrap_or(""),
            "Connected to status database"
        );

        Ok(Self { pool })
    }

    /// Build connect options; every parameter must be present
    pub fn connect_options(config: &DatabaseConfig) -> Result<MySqlConnectOptions> {
        let (Some(username), Some(password), Some(dbname), Some(hostname), Some(port)) = (
            config.username.as_deref(),
            config.password.as_deref(),
            config.dbname.as_deref(),
            config.hostname.as_deref(),
            config.port,
        ) else {
            return Err(BatchError::configuration(
                "database lookup requires username, password, dbname, hostname and port",
            ));
        };

        let port = u16::try_from(port)
            .map_err(|_| BatchError::configuration(format!("database port {port} is out of range")))?;

        Ok(MySqlConnectOptions::new()
            .host(hostname)
            .port(port)
            .username(username)
            .password(password)
            .database(dbname))
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<bool> {
        let row = sqlx::query("SELECT 1 AS health")
            .fetch_one(&self.pool)
            .await?;

        let health: i64 = row.try_get("health")?;
        Ok(health == 1)
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}
