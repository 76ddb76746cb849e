use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Procedure arguments
// ---------------------------------------------------------------------------

/// Declared type of a positional procedure parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Integer,
    Decimal,
    Text,
    Date,
}

impl ParamKind {
    /// SQL type each placeholder is cast to.
    pub fn sql_type(self) -> &'static str {
        match self {
            ParamKind::Integer => "integer",
            ParamKind::Decimal => "numeric",
            ParamKind::Text => "text",
            ParamKind::Date => "date",
        }
    }
}

impl std::fmt::Display for ParamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ParamKind::Integer => "an integer",
            ParamKind::Decimal => "a decimal",
            ParamKind::Text => "text",
            ParamKind::Date => "a date",
        };
        write!(f, "{s}")
    }
}

/// A validated positional argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Integer(i32),
    Decimal(Decimal),
    Text(String),
    Date(NaiveDate),
}

impl Arg {
    pub fn kind(&self) -> ParamKind {
        match self {
            Arg::Integer(_) => ParamKind::Integer,
            Arg::Decimal(_) => ParamKind::Decimal,
            Arg::Text(_) => ParamKind::Text,
            Arg::Date(_) => ParamKind::Date,
        }
    }
}

impl From<i32> for Arg {
    fn from(v: i32) -> Self {
        Arg::Integer(v)
    }
}

impl From<Decimal> for Arg {
    fn from(v: Decimal) -> Self {
        Arg::Decimal(v)
    }
}

impl From<&str> for Arg {
    fn from(v: &str) -> Self {
        Arg::Text(v.to_string())
    }
}

impl From<String> for Arg {
    fn from(v: String) -> Self {
        Arg::Text(v)
    }
}

impl From<NaiveDate> for Arg {
    fn from(v: NaiveDate) -> Self {
        Arg::Date(v)
    }
}

// ---------------------------------------------------------------------------
// Result cells
// ---------------------------------------------------------------------------

/// One untyped scalar from a result row.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Exact NUMERIC (and MONEY), scale preserved ("1500000.00").
    Numeric(Decimal),
    /// Text columns, plus any other type whose wire form is readable text
    /// (enum labels, domains over text, JSON, intervals).
    Text(String),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
    TimestampTz(DateTime<Utc>),
    Uuid(Uuid),
    /// One-dimensional array, printed in Postgres `{a,b}` form.
    Array(Vec<Value>),
    /// Binary value of a type the decoder cannot render; carries the type name.
    Unsupported(String),
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "—"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            // Debug keeps the trailing ".0" on whole floats
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Numeric(d) => write!(f, "{d}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::Date(d) => write!(f, "{d}"),
            Value::Time(t) => write!(f, "{t}"),
            Value::Timestamp(t) => write!(f, "{t}"),
            Value::TimestampTz(t) => write!(f, "{t}"),
            Value::Uuid(u) => write!(f, "{u}"),
            Value::Array(items) => {
                write!(f, "{{")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    match item {
                        Value::Null => write!(f, "NULL")?,
                        other => write!(f, "{other}")?,
                    }
                }
                write!(f, "}}")
            }
            Value::Unsupported(type_name) => write!(f, "<{type_name}>"),
        }
    }
}

pub type Row = Vec<Value>;

/// What a dispatched call produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Query result, rows in server order (possibly empty).
    Rows(Vec<Row>),
    /// Command committed; nothing to show.
    Done,
}

impl Outcome {
    pub fn into_rows(self) -> Vec<Row> {
        match self {
            Outcome::Rows(rows) => rows,
            Outcome::Done => Vec::new(),
        }
    }
}
