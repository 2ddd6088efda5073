//! Overall progress across a user's savings goals.

use rust_decimal::Decimal;
use serde::Serialize;
use time::{Date, Duration};

use crate::{money::percentage, savings_goal::SavingsGoal};

/// How many days ahead a target date may be for the goal to count as upcoming.
pub const UPCOMING_GOAL_DAYS: i64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsStats {
    pub total_goals: u64,
    pub achieved_goals: u64,
    pub active_goals: u64,
    pub total_target_amount: Decimal,
    pub total_current_amount: Decimal,
    /// Total saved as a percentage of the total target, between 0 and 100.
    pub overall_progress: f64,
    /// Unachieved goals with a target date at most [UPCOMING_GOAL_DAYS] days after today.
    pub upcoming_goals: u64,
}

/// Summarize `goals` as of `today`.
pub fn compute_savings_stats(goals: &[SavingsGoal], today: Date) -> SavingsStats {
    let upcoming_cutoff = today.saturating_add(Duration::days(UPCOMING_GOAL_DAYS));

    let total_goals = goals.len() as u64;
    let achieved_goals = goals.iter().filter(|goal| goal.is_achieved).count() as u64;
    let total_target_amount: Decimal = goals.iter().map(|goal| goal.target_amount).sum();
    let total_current_amount: Decimal = goals.iter().map(|goal| goal.current_amount).sum();
    let upcoming_goals = goals
        .iter()
        .filter(|goal| {
            !goal.is_achieved
                && goal
                    .target_date
                    .is_some_and(|target_date| target_date <= upcoming_cutoff)
        })
        .count() as u64;

    SavingsStats {
        total_goals,
        achieved_goals,
        active_goals: total_goals - achieved_goals,
        total_target_amount,
        total_current_amount,
        overall_progress: percentage(total_current_amount, total_target_amount).clamp(0.0, 100.0),
        upcoming_goals,
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use time::{Date, OffsetDateTime, macros::date};

    use crate::{
        savings_goal::{SavingsGoal, is_achieved},
        user::UserID,
    };

    use super::compute_savings_stats;

    const TODAY: Date = date!(2025 - 06 - 01);

    fn goal(target: Decimal, current: Decimal, target_date: Option<Date>) -> SavingsGoal {
        SavingsGoal {
            id: 1,
            user_id: UserID::new(1),
            name: "Meta".to_owned(),
            target_amount: target,
            current_amount: current,
            target_date,
            is_achieved: is_achieved(current, target),
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn counts_and_sums_goals() {
        let goals = [
            goal(dec!(200), dec!(250), None),
            goal(dec!(300), dec!(50), None),
        ];

        let got = compute_savings_stats(&goals, TODAY);

        assert_eq!(got.total_goals, 2);
        assert_eq!(got.achieved_goals, 1);
        assert_eq!(got.active_goals, 1);
        assert_eq!(got.total_target_amount, dec!(500));
        assert_eq!(got.total_current_amount, dec!(300));
        assert_eq!(got.overall_progress, 60.0);
    }

    #[test]
    fn overall_progress_is_capped_at_100() {
        let goals = [goal(dec!(100), dec!(400), None)];

        let got = compute_savings_stats(&goals, TODAY);

        assert_eq!(got.overall_progress, 100.0);
    }

    #[test]
    fn no_goals_gives_zero_progress() {
        let got = compute_savings_stats(&[], TODAY);

        assert_eq!(got.total_goals, 0);
        assert_eq!(got.overall_progress, 0.0);
        assert_eq!(got.upcoming_goals, 0);
    }

    #[test]
    fn upcoming_goals_are_unachieved_and_due_within_30_days() {
        let goals = [
            // Due exactly 30 days from today.
            goal(dec!(100), dec!(0), Some(date!(2025 - 07 - 01))),
            // Overdue goals still count.
            goal(dec!(100), dec!(0), Some(date!(2025 - 05 - 01))),
            goal(dec!(100), dec!(0), Some(date!(2025 - 07 - 02))),
            goal(dec!(100), dec!(100), Some(date!(2025 - 06 - 10))),
            goal(dec!(100), dec!(0), None),
        ];

        let got = compute_savings_stats(&goals, TODAY);

        assert_eq!(got.upcoming_goals, 2);
    }
}
