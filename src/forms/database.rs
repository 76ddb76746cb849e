//! Maintenance panel. Every action here asks for confirmation first.

use crate::forms::{Destructive, Step};
use crate::validate::require;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatabasePanel {
    pub table_name: String,
}

impl DatabasePanel {
    pub fn clean_table(&self) -> Step {
        match require("table name", &self.table_name) {
            Ok(table) => Step::Confirm(Destructive::CleanTable { table }),
            Err(e) => Step::Done(e.into()),
        }
    }

    pub fn clean_all_tables(&self) -> Step {
        Step::Confirm(Destructive::CleanAllTables)
    }

    pub fn drop_database(&self) -> Step {
        Step::Confirm(Destructive::DropDatabase)
    }
}
