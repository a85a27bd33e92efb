//! One-off expenses added from the dashboard.

mod create;
mod db;
mod delete;
mod domain;

pub use create::{add_expense_endpoint, expense_form};
pub use db::{
    create_expense, create_expense_table, delete_expense, get_expenses, get_top_expenses,
    get_total_expenses,
};
pub use delete::delete_expense_endpoint;
pub use domain::{Expense, ExpenseId, NewExpense, parse_amount};
