use sqlx::postgres::PgConnectOptions;

use crate::error::{AppError, Result};

pub const DB_HOST: &str = "localhost";
pub const DB_PORT: u16 = 5433;
pub const DB_NAME: &str = "football_management";
pub const DB_USER: &str = "admin";

/// Maintenance database used while the roster database is being dropped.
pub const ADMIN_DB: &str = "postgres";

pub const LOG_FILE: &str = "roster.log";

#[derive(Clone)]
pub struct Config {
    pub db_host: String,
    pub db_port: u16,
    /// Roster database (ROSTER_DB_NAME). Also the drop-database target.
    pub db_name: String,
    pub db_user: String,
    pub db_password: String,
    /// Database to connect to when dropping `db_name` (ROSTER_ADMIN_DB)
    pub admin_db: String,
    pub log_level: String,
    pub log_file: String,
}

// Hand-written so the password never reaches a log line.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("db_host", &self.db_host)
            .field("db_port", &self.db_port)
            .field("db_name", &self.db_name)
            .field("db_user", &self.db_user)
            .field("admin_db", &self.admin_db)
            .field("log_level", &self.log_level)
            .field("log_file", &self.log_file)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let db_name = var("ROSTER_DB_NAME").unwrap_or_else(|| DB_NAME.to_string());
        if db_name.trim().is_empty() {
            return Err(AppError::Config(
                "ROSTER_DB_NAME must not be empty".to_string(),
            ));
        }

        Ok(Self {
            db_host: var("ROSTER_DB_HOST").unwrap_or_else(|| DB_HOST.to_string()),
            db_port: match var("ROSTER_DB_PORT") {
                Some(p) => p.trim().parse::<u16>().map_err(|_| {
                    AppError::Config("ROSTER_DB_PORT must be a valid port number".to_string())
                })?,
                None => DB_PORT,
            },
            db_name,
            db_user: var("ROSTER_DB_USER").unwrap_or_else(|| DB_USER.to_string()),
            db_password: var("ROSTER_DB_PASSWORD").unwrap_or_default(),
            admin_db: var("ROSTER_ADMIN_DB").unwrap_or_else(|| ADMIN_DB.to_string()),
            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_file: var("LOG_FILE").unwrap_or_else(|| LOG_FILE.to_string()),
        })
    }

    /// Connection options for the roster database.
    pub fn connect_options(&self) -> PgConnectOptions {
        self.options_for(&self.db_name)
    }

    /// Connection options for the administrative database.
    pub fn admin_connect_options(&self) -> PgConnectOptions {
        self.options_for(&self.admin_db)
    }

    fn options_for(&self, database: &str) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.db_host)
            .port(self.db_port)
            .username(&self.db_user)
            .password(&self.db_password)
            .database(database)
    }
}
