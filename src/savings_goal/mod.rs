//! Savings goals: amounts the user is putting aside, how much has been saved
//! so far and whether the target has been reached.

mod core;
mod create;
mod db;
mod delete;
mod edit;
mod list;

pub use core::{
    AddMoneyForm, GoalProgress, NewSavingsGoal, SavingsGoal, SavingsGoalForm, SavingsGoalId,
    SavingsGoalUpdate, SavingsGoalUpdateForm, is_achieved,
};
pub use create::create_savings_goal_endpoint;
pub use db::{
    add_money_to_savings_goal, count_savings_goals, create_savings_goal,
    create_savings_goal_table, delete_savings_goal, get_savings_goal, get_savings_goals,
    update_savings_goal,
};
pub use delete::delete_savings_goal_endpoint;
pub use edit::{add_money_endpoint, update_savings_goal_endpoint};
pub use list::{
    SavingsGoalQuery, SavingsGoalState, get_savings_goal_endpoint, get_savings_goals_endpoint,
};
