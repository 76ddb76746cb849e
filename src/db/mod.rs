pub mod admin;
pub mod dispatcher;
#[cfg(test)]
pub mod live;
pub mod models;
pub mod session;

use async_trait::async_trait;

use crate::config::Config;
use crate::error::Result;
use crate::procedure::ProcedureCall;
use crate::types::Outcome;

pub use admin::DropReport;

/// The two operations the forms need from the database.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn dispatch(&self, call: &ProcedureCall) -> Result<Outcome>;

    /// Terminates other sessions on the roster database and drops it.
    async fn drop_database(&self) -> Result<DropReport>;
}

/// PostgreSQL backend. Holds configuration only; every call connects anew.
pub struct PgBackend {
    config: Config,
}

impl PgBackend {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Backend for PgBackend {
    async fn dispatch(&self, call: &ProcedureCall) -> Result<Outcome> {
        dispatcher::dispatch(&self.config.connect_options(), call).await
    }

    async fn drop_database(&self) -> Result<DropReport> {
        admin::drop_database(&self.config.admin_connect_options(), &self.config.db_name).await
    }
}
