//! Catalog of the stored procedures the roster database exposes, and the
//! typed call descriptor the dispatcher executes.

use crate::error::{AppError, Result};
use crate::types::{Arg, ParamKind};

/// Name prefixes reserved for row-returning procedures.
pub const QUERY_PREFIXES: [&str; 2] = ["display_", "search_"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    /// Set-returning function; rows are fetched.
    Query,
    /// Procedure invoked with CALL and committed; nothing is fetched.
    Command,
}

impl CallKind {
    /// Naming convention of the server schema: set-returning functions are
    /// `display_*` or `search_*`, everything else is a procedure.
    pub fn from_name(name: &str) -> Self {
        if QUERY_PREFIXES.iter().any(|p| name.starts_with(p)) {
            CallKind::Query
        } else {
            CallKind::Command
        }
    }
}

impl std::fmt::Display for CallKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallKind::Query => write!(f, "query"),
            CallKind::Command => write!(f, "command"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcedureDescriptor {
    pub name: &'static str,
    pub kind: CallKind,
    pub params: &'static [ParamKind],
}

impl ProcedureDescriptor {
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

use crate::types::ParamKind::{Date, Decimal, Integer, Text};

const ADD_PLAYER: &[ParamKind] = &[Text, Text, Date, Text, Text, Decimal];
const UPDATE_PLAYER: &[ParamKind] = &[Integer, Text, Text, Date, Text, Text, Decimal];
const UPDATE_CONTRACT: &[ParamKind] = &[Integer, Date, Date, Decimal];
const UPDATE_STATISTICS: &[ParamKind] = &[
    Integer, Integer, Integer, Integer, Integer, Integer, Integer, Integer, Integer,
];
const ONE_TEXT: &[ParamKind] = &[Text];
const ONE_INTEGER: &[ParamKind] = &[Integer];
const NONE: &[ParamKind] = &[];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Procedure {
    AddPlayer,
    UpdatePlayer,
    UpdateContract,
    UpdateStatistics,
    /// Deletes every player with the given last name.
    DeletePlayer,
    DeleteById,
    CleanTable,
    CleanAllTables,
    DisplayPlayers,
    DisplayContracts,
    DisplayStatistics,
    DisplayAvgPerformance,
    SearchByLastName,
}

impl Procedure {
    pub const ALL: [Procedure; 13] = [
        Procedure::AddPlayer,
        Procedure::UpdatePlayer,
        Procedure::UpdateContract,
        Procedure::UpdateStatistics,
        Procedure::DeletePlayer,
        Procedure::DeleteById,
        Procedure::CleanTable,
        Procedure::CleanAllTables,
        Procedure::DisplayPlayers,
        Procedure::DisplayContracts,
        Procedure::DisplayStatistics,
        Procedure::DisplayAvgPerformance,
        Procedure::SearchByLastName,
    ];

    pub fn descriptor(self) -> ProcedureDescriptor {
        let (name, params) = match self {
            Procedure::AddPlayer => ("add_player", ADD_PLAYER),
            Procedure::UpdatePlayer => ("update_player", UPDATE_PLAYER),
            Procedure::UpdateContract => ("update_contract", UPDATE_CONTRACT),
            Procedure::UpdateStatistics => ("update_statistics", UPDATE_STATISTICS),
            Procedure::DeletePlayer => ("delete_player", ONE_TEXT),
            Procedure::DeleteById => ("delete_by_id", ONE_INTEGER),
            Procedure::CleanTable => ("clean_table", ONE_TEXT),
            Procedure::CleanAllTables => ("clean_all_tables", NONE),
            Procedure::DisplayPlayers => ("display_players_contents", NONE),
            Procedure::DisplayContracts => ("display_contracts_contents", NONE),
            Procedure::DisplayStatistics => ("display_statistics_contents", NONE),
            Procedure::DisplayAvgPerformance => ("display_avg_performance_contents", NONE),
            Procedure::SearchByLastName => ("search_by_last_name", ONE_TEXT),
        };
        ProcedureDescriptor {
            name,
            kind: CallKind::from_name(name),
            params,
        }
    }

    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    pub fn kind(self) -> CallKind {
        self.descriptor().kind
    }
}

impl std::fmt::Display for Procedure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A procedure plus arguments that match its declared signature.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcedureCall {
    procedure: Procedure,
    args: Vec<Arg>,
}

impl ProcedureCall {
    /// Checks arity and argument kinds against the descriptor.
    pub fn new(procedure: Procedure, args: Vec<Arg>) -> Result<Self> {
        let desc = procedure.descriptor();
        if args.len() != desc.arity() {
            return Err(AppError::Arity {
                procedure: desc.name,
                expected: desc.arity(),
                actual: args.len(),
            });
        }
        for (i, (arg, expected)) in args.iter().zip(desc.params).enumerate() {
            if arg.kind() != *expected {
                return Err(AppError::ArgumentType {
                    procedure: desc.name,
                    position: i + 1,
                    expected: expected.sql_type(),
                    actual: arg.kind().sql_type(),
                });
            }
        }
        Ok(Self { procedure, args })
    }

    /// Zero-argument call.
    pub fn bare(procedure: Procedure) -> Result<Self> {
        Self::new(procedure, Vec::new())
    }

    pub fn procedure(&self) -> Procedure {
        self.procedure
    }

    pub fn kind(&self) -> CallKind {
        self.procedure.kind()
    }

    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    /// Statement text with one cast placeholder per argument.
    pub fn sql(&self) -> String {
        let desc = self.procedure.descriptor();
        let placeholders = desc
            .params
            .iter()
            .enumerate()
            .map(|(i, kind)| format!("${}::{}", i + 1, kind.sql_type()))
            .collect::<Vec<_>>()
            .join(", ");
        match desc.kind {
            CallKind::Query => format!("SELECT * FROM {}({placeholders})", desc.name),
            CallKind::Command => format!("CALL {}({placeholders})", desc.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn player_args() -> Vec<Arg> {
        vec![
            "Lamine".into(),
            "Yamal".into(),
            NaiveDate::from_ymd_opt(2007, 7, 13).unwrap().into(),
            "Spain".into(),
            "RW".into(),
            rust_decimal::Decimal::from(150_000_000).into(),
        ]
    }

    #[test]
    fn catalog_arities_match_server_contract() {
        let expected = [
            ("add_player", 6),
            ("update_player", 7),
            ("update_contract", 4),
            ("update_statistics", 9),
            ("delete_player", 1),
            ("delete_by_id", 1),
            ("clean_table", 1),
            ("clean_all_tables", 0),
            ("display_players_contents", 0),
            ("display_contracts_contents", 0),
            ("display_statistics_contents", 0),
            ("display_avg_performance_contents", 0),
            ("search_by_last_name", 1),
        ];
        for (proc, (name, arity)) in Procedure::ALL.iter().zip(expected) {
            let desc = proc.descriptor();
            assert_eq!(desc.name, name);
            assert_eq!(desc.arity(), arity, "{name}");
        }
    }

    #[test]
    fn only_listings_and_search_are_queries() {
        let queries: Vec<Procedure> = Procedure::ALL
            .into_iter()
            .filter(|p| p.kind() == CallKind::Query)
            .collect();
        assert_eq!(
            queries,
            [
                Procedure::DisplayPlayers,
                Procedure::DisplayContracts,
                Procedure::DisplayStatistics,
                Procedure::DisplayAvgPerformance,
                Procedure::SearchByLastName,
            ]
        );
    }

    #[test]
    fn command_sql_has_one_placeholder_per_argument() {
        let call = ProcedureCall::new(Procedure::AddPlayer, player_args()).unwrap();
        let sql = call.sql();
        assert_eq!(
            sql,
            "CALL add_player($1::text, $2::text, $3::date, $4::text, $5::text, $6::numeric)"
        );
        assert_eq!(sql.matches('$').count(), call.args().len());
    }

    #[test]
    fn zero_argument_command_has_empty_parens() {
        let call = ProcedureCall::bare(Procedure::CleanAllTables).unwrap();
        assert_eq!(call.sql(), "CALL clean_all_tables()");
        assert_eq!(call.kind(), CallKind::Command);
    }

    #[test]
    fn query_sql_selects_from_function() {
        let call = ProcedureCall::new(Procedure::SearchByLastName, vec!["Pedri".into()]).unwrap();
        assert_eq!(call.sql(), "SELECT * FROM search_by_last_name($1::text)");
        assert_eq!(call.kind(), CallKind::Query);

        let call = ProcedureCall::bare(Procedure::DisplayPlayers).unwrap();
        assert_eq!(call.sql(), "SELECT * FROM display_players_contents()");
    }

    #[test]
    fn wrong_arity_is_rejected() {
        let err = ProcedureCall::new(Procedure::DeleteById, vec![]).unwrap_err();
        assert!(matches!(
            err,
            AppError::Arity { procedure: "delete_by_id", expected: 1, actual: 0 }
        ));
    }

    #[test]
    fn wrong_argument_kind_is_rejected() {
        let err = ProcedureCall::new(Procedure::DeleteById, vec!["7".into()]).unwrap_err();
        assert!(matches!(
            err,
            AppError::ArgumentType { position: 1, expected: "integer", actual: "text", .. }
        ));
    }

    #[test]
    fn prefix_rule_classifies_unknown_names() {
        assert_eq!(CallKind::from_name("display_anything"), CallKind::Query);
        assert_eq!(CallKind::from_name("search_by_nationality"), CallKind::Query);
        assert_eq!(CallKind::from_name("archive_season"), CallKind::Command);
    }
}
