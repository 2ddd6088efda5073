//! Savings goal models and the validation of client input.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    money::{percentage, validate_non_negative_amount, validate_positive_amount},
    user::{UserID, validate_name},
};

/// Database identifier for a savings goal.
pub type SavingsGoalId = i64;

/// An amount of money the user wants to put aside, optionally by a deadline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoal {
    pub id: SavingsGoalId,
    pub user_id: UserID,
    pub name: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub target_date: Option<Date>,
    /// Always equal to `current_amount >= target_amount`.
    pub is_achieved: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl SavingsGoal {
    /// Describe how far along the goal is as of `today`.
    pub fn progress(self, today: Date) -> GoalProgress {
        let progress = percentage(self.current_amount, self.target_amount).min(100.0);
        let days_left = self
            .target_date
            .map(|target_date| (target_date - today).whole_days());

        GoalProgress {
            progress,
            days_remaining: days_left.map(|days| days.max(0)),
            is_overdue: days_left.is_some_and(|days| days < 0) && !self.is_achieved,
            goal: self,
        }
    }
}

/// Whether `current_amount` reaches `target_amount`.
pub fn is_achieved(current_amount: Decimal, target_amount: Decimal) -> bool {
    current_amount >= target_amount
}

/// A savings goal together with its progress figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    #[serde(flatten)]
    pub goal: SavingsGoal,
    /// `current / target * 100`, at most 100.
    pub progress: f64,
    /// Whole days until the target date, never negative. `None` when the goal has no target date.
    pub days_remaining: Option<i64>,
    /// The target date has passed and the goal is not achieved.
    pub is_overdue: bool,
}

/// The validated data for a new savings goal.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSavingsGoal {
    pub name: String,
    pub target_amount: Decimal,
    pub target_date: Option<Date>,
}

/// The JSON body for creating a savings goal.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoalForm {
    pub name: String,
    pub target_amount: Decimal,
    pub target_date: Option<Date>,
}

impl SavingsGoalForm {
    /// Check the form against the savings goal rules.
    ///
    /// # Errors
    ///
    /// Returns [Error::Validation] for a bad name or amount and
    /// [Error::PastDate] if the target date is before `today`.
    pub fn validate(self, today: Date) -> Result<NewSavingsGoal, Error> {
        Ok(NewSavingsGoal {
            name: validate_name(&self.name)?,
            target_amount: validate_positive_amount(self.target_amount, "targetAmount")?,
            target_date: validate_target_date(self.target_date, today)?,
        })
    }
}

/// The JSON body for a partial update of a savings goal.
///
/// Absent fields are left unchanged. `targetDate: null` clears the target date.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoalUpdateForm {
    pub name: Option<String>,
    pub target_amount: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub target_date: Option<Option<Date>>,
    pub current_amount: Option<Decimal>,
}

/// The validated changes for a savings goal.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SavingsGoalUpdate {
    pub name: Option<String>,
    pub target_amount: Option<Decimal>,
    pub target_date: Option<Option<Date>>,
    pub current_amount: Option<Decimal>,
}

impl SavingsGoalUpdateForm {
    /// Check the fields that were given.
    ///
    /// # Errors
    ///
    /// Returns [Error::Validation] for a bad name or amount and
    /// [Error::PastDate] if a new target date is before `today`.
    pub fn validate(self, today: Date) -> Result<SavingsGoalUpdate, Error> {
        let target_date = match self.target_date {
            Some(target_date) => Some(validate_target_date(target_date, today)?),
            None => None,
        };

        Ok(SavingsGoalUpdate {
            name: self.name.as_deref().map(validate_name).transpose()?,
            target_amount: self
                .target_amount
                .map(|amount| validate_positive_amount(amount, "targetAmount"))
                .transpose()?,
            target_date,
            current_amount: self
                .current_amount
                .map(|amount| validate_non_negative_amount(amount, "currentAmount"))
                .transpose()?,
        })
    }
}

impl SavingsGoalUpdate {
    /// Apply the changes to `goal`, recomputing whether it is achieved.
    pub fn apply_to(self, mut goal: SavingsGoal) -> SavingsGoal {
        if let Some(name) = self.name {
            goal.name = name;
        }
        if let Some(target_amount) = self.target_amount {
            goal.target_amount = target_amount;
        }
        if let Some(target_date) = self.target_date {
            goal.target_date = target_date;
        }
        if let Some(current_amount) = self.current_amount {
            goal.current_amount = current_amount;
        }
        goal.is_achieved = is_achieved(goal.current_amount, goal.target_amount);

        goal
    }
}

/// The JSON body for adding money to a savings goal.
#[derive(Debug, Serialize, Deserialize)]
pub struct AddMoneyForm {
    pub amount: Decimal,
}

fn validate_target_date(target_date: Option<Date>, today: Date) -> Result<Option<Date>, Error> {
    match target_date {
        Some(date) if date < today => Err(Error::PastDate(date)),
        target_date => Ok(target_date),
    }
}

/// Tell a field set to `null` apart from a missing field.
fn deserialize_some<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
