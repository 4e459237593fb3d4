//! Scoped PostgreSQL connections
//!
//! Every query opens its own connection and drops it when done. The
//! connection driver runs on a spawned task that is aborted when the
//! [`ScopedConnection`] goes out of scope, on success and failure paths
//! alike.

use std::ops::Deref;

use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use recarga_domain::{DashboardError, DatabaseConfig, Result, SslMode};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::task::JoinHandle;
use tokio_postgres::config::SslMode as PgSslMode;
use tokio_postgres::{Client, Config, Connection, NoTls};
use tracing::{debug, warn};

use crate::errors::InfraError;

/// Builds connections from resolved [`DatabaseConfig`] settings.
#[derive(Clone)]
pub struct PgConnector {
    config: Config,
    tls: Option<MakeTlsConnector>,
}

impl std::fmt::Debug for PgConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgConnector")
            .field("hosts", &self.config.get_hosts().len())
            .field("tls", &self.tls.is_some())
            .finish()
    }
}

impl PgConnector {
    /// # Errors
    /// `DashboardError::Configuration` for an unparsable connection URL or a
    /// TLS connector that cannot be built.
    pub fn from_config(settings: &DatabaseConfig) -> Result<Self> {
        let mut config = match settings {
            DatabaseConfig::Discrete(params) => {
                let mut config = Config::new();
                config
                    .host(&params.host)
                    .port(params.port)
                    .user(&params.user)
                    .password(&params.password)
                    .dbname(&params.dbname);
                config
            }
            DatabaseConfig::Url { url, .. } => url.parse::<Config>().map_err(|e| {
                DashboardError::Configuration(format!("Invalid DATABASE_URL: {e}"))
            })?,
        };
        config.application_name("recarga-dashboard");

        let tls = match settings.ssl_mode() {
            SslMode::Disable => None,
            SslMode::Require => {
                config.ssl_mode(PgSslMode::Require);
                let connector = TlsConnector::builder().build().map_err(InfraError::from)?;
                Some(MakeTlsConnector::new(connector))
            }
        };

        Ok(Self { config, tls })
    }

    /// Open a connection that lives as long as the returned guard.
    ///
    /// # Errors
    /// `DashboardError::DataSource` when the server cannot be reached or
    /// rejects the credentials.
    pub async fn connect(&self) -> Result<ScopedConnection> {
        let scoped = match &self.tls {
            Some(tls) => {
                let (client, connection) =
                    self.config.connect(tls.clone()).await.map_err(InfraError::from)?;
                ScopedConnection::spawn(client, connection)
            }
            None => {
                let (client, connection) =
                    self.config.connect(NoTls).await.map_err(InfraError::from)?;
                ScopedConnection::spawn(client, connection)
            }
        };
        debug!(tls = self.tls.is_some(), "postgres connection opened");
        Ok(scoped)
    }
}

/// A client plus the task driving its socket. Dropping it closes both.
pub struct ScopedConnection {
    client: Client,
    driver: JoinHandle<()>,
}

impl ScopedConnection {
    fn spawn<S, T>(client: Client, connection: Connection<S, T>) -> Self
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
        T: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let driver = tokio::spawn(async move {
            if let Err(err) = connection.await {
                warn!(error = %err, "postgres connection driver stopped with an error");
            }
        });
        Self { client, driver }
    }
}

impl Deref for ScopedConnection {
    type Target = Client;

    fn deref(&self) -> &Client {
        &self.client
    }
}

impl Drop for ScopedConnection {
    fn drop(&mut self) {
        self.driver.abort();
        debug!("postgres connection released");
    }
}

#[cfg(test)]
mod tests {
    use recarga_domain::PgParams;

    use super::*;

    #[test]
    fn test_discrete_settings_build_without_tls() {
        let connector = PgConnector::from_config(&DatabaseConfig::Discrete(PgParams {
            host: "localhost".into(),
            port: 6543,
            user: "bi".into(),
            password: "pw".into(),
            dbname: "recarga".into(),
            ssl_mode: SslMode::Disable,
        }))
        .unwrap();

        assert!(connector.tls.is_none());
        assert_eq!(connector.config.get_ports(), &[6543]);
        assert_eq!(connector.config.get_dbname(), Some("recarga"));
    }

    #[test]
    fn test_url_settings_are_parsed() {
        let connector = PgConnector::from_config(&DatabaseConfig::Url {
            url: "postgres://bi:pw@db.example:5433/recarga".into(),
            ssl_mode: SslMode::Disable,
        })
        .unwrap();

        assert_eq!(connector.config.get_user(), Some("bi"));
        assert_eq!(connector.config.get_ports(), &[5433]);
    }

    #[test]
    fn test_malformed_url_is_configuration_error() {
        let err = PgConnector::from_config(&DatabaseConfig::Url {
            url: "postgres://bi@db:notaport/recarga".into(),
            ssl_mode: SslMode::Disable,
        })
        .unwrap_err();

        assert_eq!(err.label(), "configuration");
    }
}
