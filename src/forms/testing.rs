//! In-memory backend that records what the forms send.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::db::{Backend, DropReport};
use crate::error::{AppError, Result};
use crate::procedure::{CallKind, Procedure, ProcedureCall};
use crate::types::{Outcome, Row};

#[derive(Default)]
pub struct RecordingBackend {
    calls: Mutex<Vec<ProcedureCall>>,
    drops: AtomicUsize,
    rows: HashMap<Procedure, Vec<Row>>,
    failure: Option<String>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails with a database error carrying `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn with_rows(mut self, procedure: Procedure, rows: Vec<Row>) -> Self {
        self.rows.insert(procedure, rows);
        self
    }

    pub fn calls(&self) -> Vec<ProcedureCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn drop_count(&self) -> usize {
        self.drops.load(Ordering::SeqCst)
    }

    fn fail(&self) -> Option<AppError> {
        self.failure
            .as_ref()
            .map(|m| AppError::Database(sqlx::Error::Protocol(m.clone())))
    }
}

#[async_trait]
impl Backend for RecordingBackend {
    async fn dispatch(&self, call: &ProcedureCall) -> Result<Outcome> {
        self.calls.lock().unwrap().push(call.clone());
        if let Some(e) = self.fail() {
            return Err(e);
        }
        Ok(match call.kind() {
            CallKind::Query => Outcome::Rows(
                self.rows
                    .get(&call.procedure())
                    .cloned()
                    .unwrap_or_default(),
            ),
            CallKind::Command => Outcome::Done,
        })
    }

    async fn drop_database(&self) -> Result<DropReport> {
        self.drops.fetch_add(1, Ordering::SeqCst);
        if let Some(e) = self.fail() {
            return Err(e);
        }
        Ok(DropReport {
            database: "football_management".to_string(),
            terminated: 2,
        })
    }
}
