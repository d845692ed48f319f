// 📝 Add-expense form
//
// The only place `amount >= 0.01` is enforced. The store accepts anything.

use crate::db::{Category, ExpenseRecord, DATE_FORMAT};
use crate::error::ValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Smallest amount the form lets through.
pub const MIN_AMOUNT: f64 = 0.01;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseForm {
    pub date: NaiveDate,
    pub amount: f64,
    pub category: Category,
    #[serde(default)]
    pub description: String,
}

impl ExpenseForm {
    /// Builds a form from raw text fields, as typed into a prompt.
    pub fn parse(
        date: &str,
        amount: &str,
        category: &str,
        description: &str,
    ) -> Result<Self, ValidationError> {
        let date = NaiveDate::parse_from_str(date.trim(), DATE_FORMAT)
            .map_err(|_| ValidationError::InvalidDate(date.to_string()))?;
        let amount = amount
            .trim()
            .parse::<f64>()
            .map_err(|_| ValidationError::InvalidAmount(amount.to_string()))?;
        let category = category.trim().parse::<Category>()?;

        Ok(Self {
            date,
            amount,
            category,
            description: description.to_string(),
        })
    }

    /// Applies the input control's rules: cents precision, minimum 0.01.
    pub fn validate(&self) -> Result<ExpenseRecord, ValidationError> {
        // Scaling to cents overflows near f64::MAX, so check after rounding.
        let amount = round_to_cents(self.amount);
        if !amount.is_finite() {
            return Err(ValidationError::InvalidAmount(self.amount.to_string()));
        }
        if amount < MIN_AMOUNT {
            return Err(ValidationError::AmountBelowMinimum(amount));
        }

        Ok(ExpenseRecord::new(
            self.date,
            amount,
            self.category.as_str(),
            self.description.clone(),
        ))
    }
}

fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
