//! Results panel: listings, search, and deletes driven from the grid.

use crate::db::Backend;
use crate::display::{self, ResultShape, ResultTable, Shaped};
use crate::forms::{Destructive, Feedback, Step};
use crate::procedure::{Procedure, ProcedureCall};
use crate::types::Arg;
use crate::validate::require;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UtilitiesPanel {
    /// Input for search and delete-by-last-name.
    pub last_name: String,
    pub results: Option<ResultTable>,
    pub selected: Option<usize>,
}

impl UtilitiesPanel {
    /// Runs one of the listing procedures and replaces the grid.
    /// Returns a message only when there is something to pop up.
    pub async fn show(&mut self, backend: &dyn Backend, procedure: Procedure) -> Option<Feedback> {
        match ProcedureCall::bare(procedure) {
            Ok(call) => self.load(backend, call).await,
            Err(e) => Some(Feedback::Error(e.to_string())),
        }
    }

    pub async fn search(&mut self, backend: &dyn Backend) -> Option<Feedback> {
        let last_name = match require("last name", &self.last_name) {
            Ok(v) => v,
            Err(e) => return Some(e.into()),
        };
        match ProcedureCall::new(Procedure::SearchByLastName, vec![Arg::Text(last_name)]) {
            Ok(call) => self.load(backend, call).await,
            Err(e) => Some(Feedback::Error(e.to_string())),
        }
    }

    async fn load(&mut self, backend: &dyn Backend, call: ProcedureCall) -> Option<Feedback> {
        let Some(shape) = ResultShape::for_procedure(call.procedure()) else {
            return Some(Feedback::Error(format!(
                "{} does not return rows",
                call.procedure()
            )));
        };

        let rows = match backend.dispatch(&call).await {
            Ok(outcome) => outcome.into_rows(),
            Err(e) => {
                return Some(Feedback::Error(format!(
                    "Failed to load {}:\n{e}",
                    shape.title().to_lowercase()
                )))
            }
        };

        match display::shape(shape, &rows) {
            Shaped::Table(table) => {
                self.results = Some(table);
                self.selected = Some(0);
                None
            }
            Shaped::NoData => {
                self.results = None;
                self.selected = None;
                Some(Feedback::NoData)
            }
        }
    }

    pub fn delete_player(&self) -> Step {
        match require("last name", &self.last_name) {
            Ok(last_name) => Step::Confirm(Destructive::DeletePlayer { last_name }),
            Err(e) => Step::Done(e.into()),
        }
    }

    /// Reads the id from the first column of the selected row.
    pub fn delete_selected(&self) -> Step {
        let (Some(table), Some(row)) = (&self.results, self.selected) else {
            return Step::Done(Feedback::Warning("Please select a row to delete.".to_string()));
        };
        let Some(raw) = table.row_id(row) else {
            return Step::Done(Feedback::Warning("Please select a row to delete.".to_string()));
        };
        match raw.trim().parse::<i32>() {
            Ok(id) => Step::Confirm(Destructive::DeleteById { id, row }),
            Err(_) => Step::Done(Feedback::Warning(format!(
                "The selected row has no numeric ID ({raw})."
            ))),
        }
    }

    /// Drops a row from the grid after the backend confirmed the delete.
    pub fn remove_row(&mut self, row: usize) {
        let Some(table) = self.results.as_mut() else {
            return;
        };
        table.remove_row(row);
        self.selected = match table.rows.len() {
            0 => None,
            len => Some(row.min(len - 1)),
        };
    }

    pub fn select_next(&mut self) {
        let Some(table) = &self.results else {
            return;
        };
        let max = table.rows.len().saturating_sub(1);
        self.selected = Some(self.selected.map_or(0, |i| (i + 1).min(max)));
    }

    pub fn select_prev(&mut self) {
        if self.results.is_some() {
            self.selected = Some(self.selected.map_or(0, |i| i.saturating_sub(1)));
        }
    }
}
