//! Roster maintenance for a football club database: player, contract and
//! statistics forms over PostgreSQL stored procedures, plus the terminal
//! front-end that drives them.

pub mod config;
pub mod db;
pub mod display;
pub mod error;
pub mod forms;
pub mod procedure;
pub mod tui;
pub mod types;
pub mod validate;
