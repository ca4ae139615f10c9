//! PostgreSQL pool construction and health probes

mod config;
mod connector;
mod health;

pub use config::PostgresConfig;
pub use connector::{
    connect, connect_from_config, connect_from_config_with_retry, connect_with_options,
};
pub use health::{check_health, check_health_with_query};

pub use sea_orm::{ConnectOptions, DatabaseConnection, DbErr};
