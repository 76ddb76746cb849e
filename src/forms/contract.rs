use crate::db::Backend;
use crate::forms::{run_command, Feedback};
use crate::procedure::{Procedure, ProcedureCall};
use crate::types::Arg;
use crate::validate::{non_blank, parse_decimal, parse_integer, require_date, ValidationError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractForm {
    pub player_id: String,
    pub sign_date: String,
    pub end_date: String,
    pub monthly_salary: String,
}

impl ContractForm {
    /// Both dates are checked, sign date first.
    pub fn validate(&self) -> Result<Vec<Arg>, ValidationError> {
        let text = [
            &self.player_id,
            &self.sign_date,
            &self.end_date,
            &self.monthly_salary,
        ];
        if text.iter().any(|v| non_blank(v).is_none()) {
            return Err(ValidationError::MissingFields("updating a contract"));
        }

        let sign_date = require_date("Sign Date", &self.sign_date)?;
        let end_date = require_date("End Date", &self.end_date)?;
        let player_id = parse_integer("Player ID", &self.player_id)?;
        let salary = parse_decimal("Monthly Salary", &self.monthly_salary)?;

        Ok(vec![
            Arg::Integer(player_id),
            Arg::Date(sign_date),
            Arg::Date(end_date),
            Arg::Decimal(salary),
        ])
    }

    pub async fn update(&self, backend: &dyn Backend) -> Feedback {
        let args = match self.validate() {
            Ok(a) => a,
            Err(e) => return e.into(),
        };
        run_command(
            backend,
            ProcedureCall::new(Procedure::UpdateContract, args),
            "Contract updated successfully!".to_string(),
            "Error updating contract",
        )
        .await
    }
}
