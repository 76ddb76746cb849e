use std::time::Instant;

use sqlx::postgres::{PgArguments, PgConnectOptions, PgConnection};
use sqlx::query::Query;
use sqlx::{Connection, Postgres};
use tracing::{debug, info, warn};

use crate::db::models::decode_row;
use crate::db::session::Session;
use crate::error::Result;
use crate::procedure::{CallKind, ProcedureCall};
use crate::types::{Arg, Outcome};

/// Runs one procedure call on a fresh connection.
///
/// Queries return every row in server order. Commands run inside a
/// transaction that is committed only if the CALL succeeds. The connection
/// is closed before returning on both paths, and any failure comes back as
/// `AppError::Database` carrying the driver's message.
pub async fn dispatch(options: &PgConnectOptions, call: &ProcedureCall) -> Result<Outcome> {
    let procedure = call.procedure();
    let kind = call.kind();
    debug!(%procedure, %kind, arity = call.args().len(), "dispatching");

    let started = Instant::now();
    let mut session = Session::open(options).await.inspect_err(|e| {
        warn!(%procedure, "connect failed: {e}");
    })?;
    let result = execute(session.conn(), call).await;
    session.close().await;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    match &result {
        Ok(Outcome::Rows(rows)) => {
            info!(%procedure, %kind, rows = rows.len(), elapsed_ms, "query complete")
        }
        Ok(Outcome::Done) => info!(%procedure, %kind, elapsed_ms, "command committed"),
        Err(e) => warn!(%procedure, %kind, elapsed_ms, "call failed: {e}"),
    }

    Ok(result?)
}

async fn execute(conn: &mut PgConnection, call: &ProcedureCall) -> std::result::Result<Outcome, sqlx::Error> {
    let sql = call.sql();
    match call.kind() {
        CallKind::Query => {
            let rows = bind_args(sqlx::query(&sql), call.args())
                .fetch_all(&mut *conn)
                .await?;
            let rows = rows.iter().map(decode_row).collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(Outcome::Rows(rows))
        }
        CallKind::Command => {
            // Dropping an uncommitted transaction rolls it back.
            let mut tx = conn.begin().await?;
            bind_args(sqlx::query(&sql), call.args())
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;
            Ok(Outcome::Done)
        }
    }
}

fn bind_args<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    args: &'q [Arg],
) -> Query<'q, Postgres, PgArguments> {
    for arg in args {
        query = match arg {
            Arg::Integer(v) => query.bind(*v),
            Arg::Decimal(v) => query.bind(*v),
            Arg::Text(v) => query.bind(v.as_str()),
            Arg::Date(v) => query.bind(*v),
        };
    }
    query
}
