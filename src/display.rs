//! Turns query rows into a read-only, labelled grid.

use crate::procedure::Procedure;
use crate::types::Row;

const PLAYER_HEADERS: &[&str] = &[
    "Player ID",
    "First Name",
    "Last Name",
    "Date of Birth",
    "Nationality",
    "Main Position",
    "Estimated Market Price",
];

const SEARCH_HEADERS: &[&str] = &[
    "Player ID",
    "First Name",
    "Last Name",
    "Date of Birth",
    "Nationality",
    "Main Position",
    "Estimated Market Price",
    "Matches Played",
    "Total Play Time (minutes)",
    "Goals",
    "Assists",
    "Tackles",
    "Saves",
    "Yellow Cards",
    "Red Cards",
];

const CONTRACT_HEADERS: &[&str] = &[
    "Player ID",
    "First Name",
    "Last Name",
    "Sign Date",
    "End Date",
    "Monthly Salary",
];

const STATISTICS_HEADERS: &[&str] = &[
    "Player ID",
    "First Name",
    "Last Name",
    "Matches Played",
    "Total Play Time",
    "Goals",
    "Assists",
    "Tackles",
    "Saves",
    "Yellow Cards",
    "Red Cards",
];

const AVG_PERFORMANCE_HEADERS: &[&str] =
    &["Player ID", "First Name", "Last Name", "Average Performance"];

/// The five result layouts the query procedures produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultShape {
    Players,
    PlayerSearch,
    Contracts,
    Statistics,
    AvgPerformance,
}

impl ResultShape {
    /// Layout for a query procedure; `None` for commands.
    pub fn for_procedure(procedure: Procedure) -> Option<Self> {
        match procedure {
            Procedure::DisplayPlayers => Some(ResultShape::Players),
            Procedure::SearchByLastName => Some(ResultShape::PlayerSearch),
            Procedure::DisplayContracts => Some(ResultShape::Contracts),
            Procedure::DisplayStatistics => Some(ResultShape::Statistics),
            Procedure::DisplayAvgPerformance => Some(ResultShape::AvgPerformance),
            _ => None,
        }
    }

    pub fn headers(self) -> &'static [&'static str] {
        match self {
            ResultShape::Players => PLAYER_HEADERS,
            ResultShape::PlayerSearch => SEARCH_HEADERS,
            ResultShape::Contracts => CONTRACT_HEADERS,
            ResultShape::Statistics => STATISTICS_HEADERS,
            ResultShape::AvgPerformance => AVG_PERFORMANCE_HEADERS,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ResultShape::Players => "Players",
            ResultShape::PlayerSearch => "Search Results",
            ResultShape::Contracts => "Contracts",
            ResultShape::Statistics => "Statistics",
            ResultShape::AvgPerformance => "Average Performance",
        }
    }
}

/// Stringified rows under a fixed header set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultTable {
    pub shape: ResultShape,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ResultTable {
    /// Player id of a row; every layout puts it in the first column.
    pub fn row_id(&self, index: usize) -> Option<&str> {
        self.rows.get(index)?.first().map(String::as_str)
    }

    pub fn remove_row(&mut self, index: usize) {
        if index < self.rows.len() {
            self.rows.remove(index);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shaped {
    Table(ResultTable),
    NoData,
}

/// Labels `rows` for display, or reports that there is nothing to show.
///
/// A procedure returning more columns than its layout names gets generic
/// labels for the extras so no value is hidden.
pub fn shape(shape: ResultShape, rows: &[Row]) -> Shaped {
    if rows.is_empty() {
        return Shaped::NoData;
    }

    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut headers: Vec<String> = shape.headers().iter().map(|h| h.to_string()).collect();
    for extra in headers.len()..width {
        headers.push(format!("Column {}", extra + 1));
    }

    let rows = rows
        .iter()
        .map(|row| row.iter().map(|v| v.to_string()).collect())
        .collect();

    Shaped::Table(ResultTable {
        shape,
        headers,
        rows,
    })
}
