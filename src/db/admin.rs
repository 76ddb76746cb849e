//! Destructive maintenance that runs against the administrative database.

use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Executor;
use tracing::{info, warn};

use crate::db::session::Session;
use crate::error::Result;

const TERMINATE_SESSIONS: &str = "SELECT pg_terminate_backend(pid) \
     FROM pg_stat_activity \
     WHERE datname = $1 AND pid <> pg_backend_pid()";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropReport {
    pub database: String,
    /// Sessions that were connected to the target and got terminated.
    pub terminated: u64,
}

/// Disconnects every other session on `target`, then drops it.
///
/// Connects to the administrative database, never to `target` itself. No
/// transaction is opened, so each statement takes effect immediately;
/// callers must have the user's confirmation before getting here.
pub async fn drop_database(admin: &PgConnectOptions, target: &str) -> Result<DropReport> {
    warn!(database = target, "dropping database");
    let mut session = Session::open(admin).await?;
    let result = terminate_and_drop(session.conn(), target).await;
    session.close().await;

    match result {
        Ok(terminated) => {
            info!(database = target, terminated, "database dropped");
            Ok(DropReport {
                database: target.to_string(),
                terminated,
            })
        }
        Err(e) => {
            warn!(database = target, "drop failed: {e}");
            Err(e.into())
        }
    }
}

async fn terminate_and_drop(conn: &mut PgConnection, target: &str) -> std::result::Result<u64, sqlx::Error> {
    let terminated: Vec<bool> = sqlx::query_scalar(TERMINATE_SESSIONS)
        .bind(target)
        .fetch_all(&mut *conn)
        .await?;
    let terminated = terminated.into_iter().filter(|ok| *ok).count() as u64;
    info!(database = target, terminated, "sessions terminated");

    // DROP DATABASE takes no bind parameters; the simple-query path also
    // keeps it outside any implicit transaction block.
    conn.execute(drop_statement(target).as_str()).await?;
    Ok(terminated)
}

/// Double-quotes an identifier, doubling embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

pub fn drop_statement(target: &str) -> String {
    format!("DROP DATABASE {}", quote_ident(target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::live::Scratch;
    use crate::error::AppError;
    use sqlx::Connection;

    #[test]
    fn plain_names_are_quoted() {
        assert_eq!(drop_statement("football_management"), "DROP DATABASE \"football_management\"");
    }

    #[test]
    fn embedded_quotes_cannot_break_out() {
        assert_eq!(quote_ident("x\"; DROP TABLE t; --"), "\"x\"\"; DROP TABLE t; --\"");
    }

    #[test]
    fn terminate_query_binds_the_name() {
        assert!(TERMINATE_SESSIONS.contains("datname = $1"));
        assert!(TERMINATE_SESSIONS.contains("pid <> pg_backend_pid()"));
    }

    #[tokio::test]
    async fn unreachable_admin_database_is_a_database_error() {
        let admin = PgConnectOptions::new()
            .host("127.0.0.1")
            .port(1)
            .username("admin")
            .database("postgres");
        let err = drop_database(&admin, "football_management").await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)), "{err:?}");
        assert!(err.to_string().starts_with("Database error:"), "{err}");
    }

    #[tokio::test]
    #[ignore = "needs ROSTER_LIVE_ADMIN_URL"]
    async fn busy_sessions_are_terminated_before_the_drop() {
        let Some(db) = Scratch::create("roster_live_drop").await else {
            return;
        };
        let mut busy = PgConnection::connect_with(&db.options).await.unwrap();
        sqlx::query("SELECT 1").execute(&mut busy).await.unwrap();

        let report = drop_database(&db.admin, &db.name).await.unwrap();
        assert_eq!(report.database, "roster_live_drop");
        assert!(report.terminated >= 1, "{report:?}");
        assert!(!db.exists().await);
        drop(busy);
    }
}
