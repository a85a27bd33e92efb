//! Groups expenses into chart series.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::expense::Expense;

/// Parallel arrays of labels and summed values, ready for charting.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    fn from_totals(totals: BTreeMap<String, f64>) -> Self {
        let (labels, values) = totals.into_iter().unzip();

        Self { labels, values }
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Sum `expenses` per calendar month.
///
/// Labels have the form `YYYY-MM` and are sorted in ascending order.
pub fn monthly_totals(expenses: &[Expense]) -> ChartSeries {
    let mut totals = BTreeMap::new();

    for expense in expenses {
        let month = format!(
            "{:04}-{:02}",
            expense.date.year(),
            u8::from(expense.date.month())
        );
        *totals.entry(month).or_insert(0.0) += expense.amount;
    }

    ChartSeries::from_totals(totals)
}

/// Sum `expenses` per category, sorted by category name.
pub fn category_totals(expenses: &[Expense]) -> ChartSeries {
    let mut totals = BTreeMap::new();

    for expense in expenses {
        *totals.entry(expense.category.clone()).or_insert(0.0) += expense.amount;
    }

    ChartSeries::from_totals(totals)
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::{Date, macros::date};

    use crate::{
        auth::UserID,
        db::initialize,
        expense::{Expense, NewExpense, create_expense, get_expenses},
        test_utils::create_test_user,
    };

    use super::{ChartSeries, category_totals, monthly_totals};

    fn expense(id: i64, category: &str, amount: f64, date: Date) -> Expense {
        Expense {
            id,
            user_id: UserID::new(1),
            description: format!("expense {id}"),
            category: category.to_owned(),
            amount,
            date,
        }
    }

    fn sample() -> Vec<Expense> {
        vec![
            expense(1, "Food", 10.0, date!(2025 - 01 - 15)),
            expense(2, "Food", 5.0, date!(2024 - 12 - 31)),
            expense(3, "Transport", 20.0, date!(2025 - 01 - 01)),
        ]
    }

    #[test]
    fn category_totals_group_by_name() {
        let got = category_totals(&sample());

        assert_eq!(
            got,
            ChartSeries {
                labels: vec!["Food".to_owned(), "Transport".to_owned()],
                values: vec![15.0, 20.0],
            }
        );
    }

    #[test]
    fn monthly_totals_are_sorted_ascending() {
        let got = monthly_totals(&sample());

        assert_eq!(
            got,
            ChartSeries {
                labels: vec!["2024-12".to_owned(), "2025-01".to_owned()],
                values: vec![5.0, 30.0],
            }
        );
    }

    #[test]
    fn totals_match_sum_of_expenses() {
        let expenses = sample();
        let want: f64 = expenses.iter().map(|expense| expense.amount).sum();

        let monthly: f64 = monthly_totals(&expenses).values.iter().sum();
        let by_category: f64 = category_totals(&expenses).values.iter().sum();

        assert_eq!(monthly, want);
        assert_eq!(by_category, want);
    }

    #[test]
    fn no_expenses_give_empty_series() {
        assert!(monthly_totals(&[]).is_empty());
        assert!(category_totals(&[]).is_empty());
    }

    #[test]
    fn counts_each_stored_expense_once() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let user_id = create_test_user(&connection, "alice");
        for (category, amount) in [("Food", "10"), ("Food", "5"), ("Transport", "20")] {
            let new_expense = NewExpense::new("thing", Some(category), amount).unwrap();
            create_expense(user_id, new_expense, date!(2025 - 01 - 15), &connection).unwrap();
        }

        let expenses = get_expenses(user_id, &connection).unwrap();

        assert_eq!(category_totals(&expenses).values, vec![15.0, 20.0]);
        assert_eq!(monthly_totals(&expenses).values, vec![35.0]);
    }
}
