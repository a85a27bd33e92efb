//! Core expense domain types.

use time::Date;

use crate::{Error, auth::UserID, database_id::DatabaseId};

/// Database identifier for an expense.
pub type ExpenseId = DatabaseId;

/// The category given to expenses entered without one.
pub const DEFAULT_CATEGORY: &str = "Other";

/// A single expense owned by a user.
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub id: ExpenseId,
    pub user_id: UserID,
    pub description: String,
    pub category: String,
    pub amount: f64,
    pub date: Date,
}

/// A validated expense that has not been saved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub description: String,
    pub category: String,
    pub amount: f64,
}

impl NewExpense {
    /// Validate the raw form fields of an expense.
    ///
    /// The description and category are trimmed, and a missing or blank
    /// category becomes [DEFAULT_CATEGORY].
    ///
    /// # Errors
    ///
    /// Returns [Error::EmptyDescription] for a blank description, or
    /// [Error::InvalidAmount] if the amount is not a finite number of at least zero.
    pub fn new(description: &str, category: Option<&str>, amount: &str) -> Result<Self, Error> {
        let description = description.trim();
        if description.is_empty() {
            return Err(Error::EmptyDescription);
        }

        let category = category
            .map(str::trim)
            .filter(|category| !category.is_empty())
            .unwrap_or(DEFAULT_CATEGORY);

        Ok(Self {
            description: description.to_owned(),
            category: category.to_owned(),
            amount: parse_amount(amount)?,
        })
    }
}

/// Parse a user entered amount, e.g. "12.50".
///
/// # Errors
///
/// Returns [Error::InvalidAmount] holding the raw text if it is not a finite
/// number greater than or equal to zero.
pub fn parse_amount(raw_amount: &str) -> Result<f64, Error> {
    match raw_amount.trim().parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount >= 0.0 => Ok(amount),
        _ => Err(Error::InvalidAmount(raw_amount.to_owned())),
    }
}
