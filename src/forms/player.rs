use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::db::Backend;
use crate::forms::{run_command, Feedback};
use crate::procedure::{Procedure, ProcedureCall};
use crate::types::Arg;
use crate::validate::{non_blank, parse_decimal, parse_integer, require_date, ValidationError};

pub const DOB_FIELD: &str = "Date of Birth";
pub const PRICE_FIELD: &str = "Estimated Market Price";
pub const ID_FIELD: &str = "Player ID";

/// Raw text of the player form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerForm {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub nationality: String,
    pub main_position: String,
    pub market_price: String,
    /// Only used by update.
    pub player_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerDetails {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub nationality: String,
    pub main_position: String,
    pub market_price: Decimal,
}

impl PlayerDetails {
    fn into_args(self) -> Vec<Arg> {
        vec![
            self.first_name.into(),
            self.last_name.into(),
            self.date_of_birth.into(),
            self.nationality.into(),
            self.main_position.into(),
            self.market_price.into(),
        ]
    }
}

impl PlayerForm {
    pub fn validate_add(&self) -> Result<PlayerDetails, ValidationError> {
        self.details("adding a player")
    }

    pub fn validate_update(&self) -> Result<(i32, PlayerDetails), ValidationError> {
        if non_blank(&self.player_id).is_none() {
            return Err(ValidationError::MissingFields("updating a player"));
        }
        let details = self.details("updating a player")?;
        let id = parse_integer(ID_FIELD, &self.player_id)?;
        Ok((id, details))
    }

    fn details(&self, action: &'static str) -> Result<PlayerDetails, ValidationError> {
        let text = [
            &self.first_name,
            &self.last_name,
            &self.date_of_birth,
            &self.nationality,
            &self.main_position,
            &self.market_price,
        ];
        if text.iter().any(|v| non_blank(v).is_none()) {
            return Err(ValidationError::MissingFields(action));
        }

        let date_of_birth = require_date(DOB_FIELD, &self.date_of_birth)?;
        let market_price = parse_decimal(PRICE_FIELD, &self.market_price)?;

        Ok(PlayerDetails {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            date_of_birth,
            nationality: self.nationality.trim().to_string(),
            main_position: self.main_position.trim().to_string(),
            market_price,
        })
    }

    pub async fn add(&self, backend: &dyn Backend) -> Feedback {
        let details = match self.validate_add() {
            Ok(d) => d,
            Err(e) => return e.into(),
        };
        run_command(
            backend,
            ProcedureCall::new(Procedure::AddPlayer, details.into_args()),
            "Player added successfully!".to_string(),
            "Error adding player",
        )
        .await
    }

    pub async fn update(&self, backend: &dyn Backend) -> Feedback {
        let (id, details) = match self.validate_update() {
            Ok(v) => v,
            Err(e) => return e.into(),
        };
        let mut args = vec![Arg::Integer(id)];
        args.extend(details.into_args());
        run_command(
            backend,
            ProcedureCall::new(Procedure::UpdatePlayer, args),
            "Player updated successfully!".to_string(),
            "Error updating player",
        )
        .await
    }
}
