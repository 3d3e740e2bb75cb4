use reqwest::Url;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tracing::{debug, info};

use crate::config::DatabaseConfig;
use crate::retry::{RetryPolicy, retry_fixed};

/// Resolve the connection URL, composing a `postgres://` URL from the
/// individual settings unless an explicit `url` is configured.
pub fn connection_url(config: &DatabaseConfig) -> Result<String, DbErr> {
    if let Some(url) = &config.url {
        return Ok(url.clone());
    }

    let invalid = |what: &str| DbErr::Custom(format!("Invalid database {what} in configuration"));

    let mut url = Url::parse("postgres://localhost").map_err(|_| invalid("url"))?;
    url.set_host(Some(&config.host)).map_err(|_| invalid("host"))?;
    url.set_port(Some(config.port)).map_err(|_| invalid("port"))?;
    url.set_username(&config.user).map_err(|_| invalid("user"))?;
    url.set_password(config.password.as_deref())
        .map_err(|_| invalid("password"))?;
    url.set_path(&config.database);
    url.query_pairs_mut()
        .append_pair("sslmode", config.ssl_mode.as_str());

    Ok(url.into())
}

/// Build connection options for a single-connection handle.
pub fn connect_options(config: &DatabaseConfig) -> Result<ConnectOptions, DbErr> {
    let url = connection_url(config)?;
    let is_postgres = url.starts_with("postgres");

    let mut opt = ConnectOptions::new(url);
    opt.max_connections(1)
        .min_connections(1)
        .connect_timeout(config.connect_timeout())
        .sqlx_logging(false);

    if is_postgres && let Some(schema) = &config.schema {
        opt.set_schema_search_path(schema.clone());
    }

    Ok(opt)
}

/// Open a fresh connection. Web requests call this once each and drop the
/// handle when they are done, so no connection outlives its request.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let opt = connect_options(config)?;
    let db = Database::connect(opt).await?;
    debug!("Database connection established");
    Ok(db)
}

/// Open a connection, retrying per [`RetryPolicy::bootstrap`]. Only used at
/// startup; request paths never retry.
pub async fn connect_with_retry(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    connect_with_policy(config, RetryPolicy::bootstrap()).await
}

pub async fn connect_with_policy(
    config: &DatabaseConfig,
    policy: RetryPolicy,
) -> Result<DatabaseConnection, DbErr> {
    let db = retry_fixed(policy, "Creating database connection", || connect(config)).await?;
    info!("Database connection established");
    Ok(db)
}

/// Whether the error means the database could not be reached at all.
pub fn is_connectivity_error(err: &DbErr) -> bool {
    matches!(err, DbErr::Conn(_) | DbErr::ConnectionAcquire(_))
}
