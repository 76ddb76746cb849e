use crate::db::Backend;
use crate::forms::{run_command, Feedback};
use crate::procedure::{Procedure, ProcedureCall};
use crate::types::Arg;
use crate::validate::{non_blank, parse_count, parse_integer, ValidationError};

/// Counter labels in argument order after the player id.
pub const COUNTER_LABELS: [&str; 8] = [
    "Matches Played",
    "Total Play Time",
    "Goals",
    "Assists",
    "Tackles",
    "Saves",
    "Yellow Cards",
    "Red Cards",
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatisticsForm {
    pub player_id: String,
    /// Raw text for each entry of [`COUNTER_LABELS`].
    pub counters: [String; 8],
}

impl StatisticsForm {
    pub fn validate(&self) -> Result<Vec<Arg>, ValidationError> {
        let blank = non_blank(&self.player_id).is_none()
            || self.counters.iter().any(|c| non_blank(c).is_none());
        if blank {
            return Err(ValidationError::MissingFields("updating statistics"));
        }

        let mut args = Vec::with_capacity(9);
        args.push(Arg::Integer(parse_integer("Player ID", &self.player_id)?));
        for (label, raw) in COUNTER_LABELS.into_iter().zip(&self.counters) {
            args.push(Arg::Integer(parse_count(label, raw)?));
        }
        Ok(args)
    }

    pub async fn update(&self, backend: &dyn Backend) -> Feedback {
        let args = match self.validate() {
            Ok(a) => a,
            Err(e) => return e.into(),
        };
        run_command(
            backend,
            ProcedureCall::new(Procedure::UpdateStatistics, args),
            "Statistics updated successfully!".to_string(),
            "Error updating statistics",
        )
        .await
    }
}
