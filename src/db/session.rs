use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;
use tracing::{debug, warn};

/// One connection, opened for a single backend call.
///
/// Callers run their work through [`Session::conn`] and then hand the
/// session back with [`Session::close`] whatever the work returned. If a
/// session is dropped without `close` (early `?`, cancelled future) sqlx
/// closes the socket on drop, so no connection outlives its call.
pub struct Session {
    conn: PgConnection,
    database: String,
}

impl Session {
    pub async fn open(options: &PgConnectOptions) -> Result<Self, sqlx::Error> {
        let conn = PgConnection::connect_with(options).await?;
        let database = options.get_database().unwrap_or_default().to_string();
        debug!(database = %database, "connection opened");
        Ok(Self { conn, database })
    }

    pub fn conn(&mut self) -> &mut PgConnection {
        &mut self.conn
    }

    pub async fn close(self) {
        let database = self.database;
        match self.conn.close().await {
            Ok(()) => debug!(database = %database, "connection closed"),
            Err(e) => warn!(database = %database, "connection did not close cleanly: {e}"),
        }
    }
}
