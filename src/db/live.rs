//! Throwaway databases for tests that talk to a real server.
//!
//! Point `ROSTER_LIVE_ADMIN_URL` at a superuser on the maintenance database
//! (`postgres://admin@localhost:5433/postgres`) and run the ignored tests
//! with `cargo test -- --ignored`. Without the variable they return early.

use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::{Connection, Executor};

use crate::db::admin::quote_ident;

pub const ADMIN_URL_VAR: &str = "ROSTER_LIVE_ADMIN_URL";

/// Minimal slice of the roster schema: enough procedures to exercise both
/// call kinds and a foreign key to violate.
const SCHEMA: &str = r#"
CREATE TABLE players (
    player_id     serial PRIMARY KEY,
    first_name    text NOT NULL,
    last_name     text NOT NULL,
    date_of_birth date NOT NULL,
    nationality   text NOT NULL,
    main_position text NOT NULL,
    market_price  numeric(14, 2) NOT NULL
);

CREATE TABLE contracts (
    player_id      integer PRIMARY KEY REFERENCES players (player_id),
    sign_date      date NOT NULL,
    end_date       date NOT NULL,
    monthly_salary numeric(12, 2) NOT NULL
);

CREATE PROCEDURE add_player(text, text, date, text, text, numeric)
LANGUAGE sql AS $$
    INSERT INTO players (first_name, last_name, date_of_birth, nationality, main_position, market_price)
    VALUES ($1, $2, $3, $4, $5, $6)
$$;

CREATE PROCEDURE update_contract(integer, date, date, numeric)
LANGUAGE sql AS $$
    INSERT INTO contracts VALUES ($1, $2, $3, $4)
    ON CONFLICT (player_id) DO UPDATE
        SET sign_date = EXCLUDED.sign_date,
            end_date = EXCLUDED.end_date,
            monthly_salary = EXCLUDED.monthly_salary
$$;

CREATE FUNCTION display_players_contents() RETURNS SETOF players
LANGUAGE sql AS $$ SELECT * FROM players ORDER BY player_id $$;

CREATE FUNCTION search_by_last_name(text) RETURNS SETOF players
LANGUAGE sql AS $$ SELECT * FROM players WHERE last_name = $1 ORDER BY player_id $$;
"#;

pub struct Scratch {
    pub name: String,
    /// Maintenance database on the same server.
    pub admin: PgConnectOptions,
    /// The scratch database itself.
    pub options: PgConnectOptions,
}

impl Scratch {
    /// Recreates `name` with the test schema, or `None` when no server is
    /// configured.
    pub async fn create(name: &str) -> Option<Scratch> {
        let url = std::env::var(ADMIN_URL_VAR).ok()?;
        let admin = PgConnectOptions::from_str(&url).expect("admin URL");
        let options = admin.clone().database(name);

        let mut conn = PgConnection::connect_with(&admin).await.expect("admin connect");
        let quoted = quote_ident(name);
        conn.execute(format!("DROP DATABASE IF EXISTS {quoted} WITH (FORCE)").as_str())
            .await
            .expect("drop stale scratch database");
        conn.execute(format!("CREATE DATABASE {quoted}").as_str())
            .await
            .expect("create scratch database");
        conn.close().await.expect("close admin");

        let mut conn = PgConnection::connect_with(&options).await.expect("scratch connect");
        sqlx::raw_sql(SCHEMA).execute(&mut conn).await.expect("schema");
        conn.close().await.expect("close scratch");

        Some(Scratch {
            name: name.to_string(),
            admin,
            options,
        })
    }

    pub async fn row_count(&self, table: &str) -> i64 {
        let mut conn = PgConnection::connect_with(&self.options).await.expect("connect");
        let sql = format!("SELECT count(*) FROM {}", quote_ident(table));
        let n = sqlx::query_scalar(&sql).fetch_one(&mut conn).await.expect("count");
        conn.close().await.expect("close");
        n
    }

    pub async fn exists(&self) -> bool {
        let mut conn = PgConnection::connect_with(&self.admin).await.expect("connect");
        let found = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(&self.name)
            .fetch_one(&mut conn)
            .await
            .expect("lookup");
        conn.close().await.expect("close");
        found
    }

    /// Backends exit shortly after the client hangs up, so this polls for
    /// up to two seconds.
    pub async fn sessions_drain(&self) -> bool {
        let mut conn = PgConnection::connect_with(&self.admin).await.expect("connect");
        for _ in 0..40 {
            let open: i64 = sqlx::query_scalar("SELECT count(*) FROM pg_stat_activity WHERE datname = $1")
                .bind(&self.name)
                .fetch_one(&mut conn)
                .await
                .expect("count sessions");
            if open == 0 {
                conn.close().await.expect("close");
                return true;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        false
    }

    pub async fn remove(self) {
        let mut conn = PgConnection::connect_with(&self.admin).await.expect("connect");
        conn.execute(
            format!("DROP DATABASE IF EXISTS {} WITH (FORCE)", quote_ident(&self.name)).as_str(),
        )
        .await
        .expect("drop scratch database");
        conn.close().await.expect("close");
    }
}
