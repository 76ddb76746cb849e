//! Decoding of result rows into display values. Query procedures return
//! different shapes, so cells are decoded by column type rather than into
//! fixed row structs.

use chrono::{FixedOffset, NaiveTime};
use rust_decimal::Decimal;
use sqlx::postgres::types::{PgInterval, PgMoney, PgTimeTz};
use sqlx::postgres::{PgRow, PgValueFormat, PgValueRef};
use sqlx::{Decode, Postgres, Row as _, Type, TypeInfo, ValueRef};
use tracing::debug;

use crate::types::{Row, Value};

/// Fractional digits of MONEY under the usual server locales.
const MONEY_SCALE: u32 = 2;

pub fn decode_row(row: &PgRow) -> Result<Row, sqlx::Error> {
    (0..row.len()).map(|i| decode_cell(row, i)).collect()
}

fn decode_cell(row: &PgRow, i: usize) -> Result<Value, sqlx::Error> {
    let raw = row.try_get_raw(i)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let type_name = raw.type_info().name().to_string();

    let value = match type_name.as_str() {
        "BOOL" => Value::Bool(row.try_get(i)?),
        "INT2" => Value::Int(i64::from(row.try_get::<i16, _>(i)?)),
        "INT4" => Value::Int(i64::from(row.try_get::<i32, _>(i)?)),
        "INT8" => Value::Int(row.try_get(i)?),
        // Widening f32 directly would print the binary expansion
        "FLOAT4" => {
            let x: f32 = row.try_get(i)?;
            Value::Float(x.to_string().parse().unwrap_or(f64::from(x)))
        }
        "FLOAT8" => Value::Float(row.try_get(i)?),
        "NUMERIC" => match row.try_get::<Decimal, _>(i) {
            Ok(d) => Value::Numeric(d),
            // NaN, infinities and values beyond 28 digits
            Err(e) => {
                debug!(column = i, "NUMERIC not representable: {e}");
                Value::Unsupported(type_name)
            }
        },
        "MONEY" => Value::Numeric(row.try_get::<PgMoney, _>(i)?.to_decimal(MONEY_SCALE)),
        // sqlx reports bpchar as CHAR and the one-byte "char" type quoted
        "TEXT" | "VARCHAR" | "CHAR" | "BPCHAR" | "NAME" => Value::Text(row.try_get(i)?),
        "\"CHAR\"" => {
            let b: i8 = row.try_get(i)?;
            Value::Text(char::from(b as u8).to_string())
        }
        "DATE" => Value::Date(row.try_get(i)?),
        "TIME" => Value::Time(row.try_get(i)?),
        "TIMETZ" => {
            let t: PgTimeTz<NaiveTime, FixedOffset> = row.try_get(i)?;
            Value::Text(format!("{}{}", t.time, t.offset))
        }
        "TIMESTAMP" => Value::Timestamp(row.try_get(i)?),
        "TIMESTAMPTZ" => Value::TimestampTz(row.try_get(i)?),
        "INTERVAL" => Value::Text(interval_text(&row.try_get::<PgInterval, _>(i)?)),
        "UUID" => Value::Uuid(row.try_get(i)?),
        "JSON" | "JSONB" => Value::Text(row.try_get::<serde_json::Value, _>(i)?.to_string()),
        "BOOL[]" => array(row, i, Value::Bool)?,
        "INT2[]" => array(row, i, |v: i16| Value::Int(v.into()))?,
        "INT4[]" => array(row, i, |v: i32| Value::Int(v.into()))?,
        "INT8[]" => array(row, i, Value::Int)?,
        "FLOAT8[]" => array(row, i, Value::Float)?,
        "NUMERIC[]" => array(row, i, Value::Numeric)?,
        "TEXT[]" | "VARCHAR[]" => array(row, i, Value::Text)?,
        "DATE[]" => array(row, i, Value::Date)?,
        _ => match readable_text(&raw) {
            Some(text) => Value::Text(text),
            None => Value::Unsupported(type_name),
        },
    };
    Ok(value)
}

fn array<T>(row: &PgRow, i: usize, cell: fn(T) -> Value) -> Result<Value, sqlx::Error>
where
    Vec<Option<T>>: for<'r> Decode<'r, Postgres> + Type<Postgres>,
{
    let items: Vec<Option<T>> = row.try_get(i)?;
    Ok(Value::Array(
        items.into_iter().map(|v| v.map_or(Value::Null, cell)).collect(),
    ))
}

/// Types without a dedicated decoder still render when their wire form is
/// plain text: user enums, domains over text, citext and the like.
fn readable_text(raw: &PgValueRef<'_>) -> Option<String> {
    let text = match raw.format() {
        PgValueFormat::Text => raw.as_str().ok()?,
        PgValueFormat::Binary => std::str::from_utf8(raw.as_bytes().ok()?).ok()?,
    };
    (!text.chars().any(char::is_control)).then(|| text.to_string())
}

/// Postgres-style interval text: `1 year 2 mons 3 days 04:05:06`.
pub fn interval_text(iv: &PgInterval) -> String {
    fn unit(n: i32, name: &str) -> String {
        let plural = if n.abs() == 1 { "" } else { "s" };
        format!("{n} {name}{plural}")
    }

    let mut parts = Vec::new();
    let (years, months) = (iv.months / 12, iv.months % 12);
    if years != 0 {
        parts.push(unit(years, "year"));
    }
    if months != 0 {
        parts.push(unit(months, "mon"));
    }
    if iv.days != 0 {
        parts.push(unit(iv.days, "day"));
    }
    if iv.microseconds != 0 || parts.is_empty() {
        let sign = if iv.microseconds < 0 { "-" } else { "" };
        let micros = iv.microseconds.unsigned_abs();
        let secs = micros / 1_000_000;
        let mut clock = format!(
            "{sign}{:02}:{:02}:{:02}",
            secs / 3600,
            secs / 60 % 60,
            secs % 60
        );
        let frac = micros % 1_000_000;
        if frac != 0 {
            clock.push_str(format!(".{frac:06}").trim_end_matches('0'));
        }
        parts.push(clock);
    }
    parts.join(" ")
}
