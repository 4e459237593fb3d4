//! PostgreSQL data access

pub mod connection;
pub mod postgres_source;

pub use connection::{PgConnector, ScopedConnection};
pub use postgres_source::PostgresDataSource;
