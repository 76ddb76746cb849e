//! Form state and submit handlers for the five panels.
//!
//! Each handler validates its raw text fields, issues at most one backend
//! call and turns the outcome into a [`Feedback`] message. Destructive
//! actions first return [`Step::Confirm`]; nothing reaches the backend until
//! [`Destructive::execute`] is called with the user's answer.

pub mod contract;
pub mod database;
pub mod player;
pub mod statistics;
pub mod utilities;

#[cfg(test)]
pub mod testing;

use tracing::debug;

use crate::db::Backend;
use crate::error::{AppError, Result};
use crate::procedure::{Procedure, ProcedureCall};
use crate::types::Arg;
use crate::validate::ValidationError;

/// Message shown to the user after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    Info(String),
    /// Input rejected before any backend call.
    Warning(String),
    /// Backend call failed; carries the driver message.
    Error(String),
    /// A query came back empty.
    NoData,
    /// A destructive action was declined.
    Cancelled,
}

impl Feedback {
    pub fn title(&self) -> &'static str {
        match self {
            Feedback::Info(_) => "Success",
            Feedback::Warning(_) => "Input Error",
            Feedback::Error(_) => "Error",
            Feedback::NoData => "Results",
            Feedback::Cancelled => "Cancelled",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Feedback::Info(m) | Feedback::Warning(m) | Feedback::Error(m) => m,
            Feedback::NoData => "No data found!",
            Feedback::Cancelled => "Nothing was changed.",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Feedback::Info(_))
    }
}

impl From<ValidationError> for Feedback {
    fn from(e: ValidationError) -> Self {
        debug!("input rejected: {e}");
        Feedback::Warning(e.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Yes,
    No,
}

/// Result of starting an action.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Done(Feedback),
    Confirm(Destructive),
}

/// An action that needs a yes/no answer before it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destructive {
    DeletePlayer { last_name: String },
    /// `row` is the results-table row the id was read from.
    DeleteById { id: i32, row: usize },
    CleanTable { table: String },
    CleanAllTables,
    DropDatabase,
}

impl Destructive {
    pub fn prompt(&self) -> String {
        match self {
            Destructive::DeletePlayer { last_name } => {
                format!("Are you sure you want to delete every player named '{last_name}'?")
            }
            Destructive::DeleteById { id, .. } => {
                format!("Are you sure you want to delete the item with ID {id}?")
            }
            Destructive::CleanTable { table } => {
                format!("Are you sure you want to remove every row from '{table}'?")
            }
            Destructive::CleanAllTables => {
                "Are you sure you want to remove every row from all tables?".to_string()
            }
            Destructive::DropDatabase => {
                "Are you sure you want to drop the entire database?".to_string()
            }
        }
    }

    /// Runs the action if the answer is yes. A "no" never touches the backend.
    pub async fn execute(&self, backend: &dyn Backend, answer: Confirmation) -> Feedback {
        if answer == Confirmation::No {
            debug!(action = ?self, "declined");
            return Feedback::Cancelled;
        }

        match self {
            Destructive::DeletePlayer { last_name } => {
                run_command(
                    backend,
                    ProcedureCall::new(Procedure::DeletePlayer, vec![Arg::from(last_name.as_str())]),
                    "Player deleted successfully!".to_string(),
                    "Error deleting player",
                )
                .await
            }
            Destructive::DeleteById { id, .. } => {
                run_command(
                    backend,
                    ProcedureCall::new(Procedure::DeleteById, vec![Arg::Integer(*id)]),
                    format!("Item with ID {id} deleted successfully!"),
                    &format!("Failed to delete item with ID {id}"),
                )
                .await
            }
            Destructive::CleanTable { table } => {
                run_command(
                    backend,
                    ProcedureCall::new(Procedure::CleanTable, vec![Arg::from(table.as_str())]),
                    format!("Table '{table}' cleaned successfully!"),
                    &format!("Failed to clean table '{table}'"),
                )
                .await
            }
            Destructive::CleanAllTables => {
                run_command(
                    backend,
                    ProcedureCall::bare(Procedure::CleanAllTables),
                    "All tables cleaned successfully!".to_string(),
                    "Failed to clean tables",
                )
                .await
            }
            Destructive::DropDatabase => match backend.drop_database().await {
                Ok(report) => Feedback::Info(format!(
                    "Database '{}' dropped successfully! ({} other session(s) disconnected)",
                    report.database, report.terminated
                )),
                Err(e) => Feedback::Error(format!("Failed to drop database:\n{e}")),
            },
        }
    }
}

/// Dispatches a command and maps the outcome to a message.
pub(crate) async fn run_command(
    backend: &dyn Backend,
    call: Result<ProcedureCall>,
    success: String,
    failure_context: &str,
) -> Feedback {
    let call = match call {
        Ok(call) => call,
        Err(e) => return internal_error(failure_context, e),
    };
    match backend.dispatch(&call).await {
        Ok(_) => Feedback::Info(success),
        Err(e) => Feedback::Error(format!("{failure_context}:\n{e}")),
    }
}

// A call the form built itself failed its own descriptor check.
fn internal_error(context: &str, e: AppError) -> Feedback {
    Feedback::Error(format!("{context}:\n{e}"))
}
