//! Core types for itemized daily records and the rules for validating them.

use serde::{Deserialize, Serialize};
use time::{Date, PrimitiveDateTime, macros::format_description};

use crate::{Error, auth::UserID, database_id::DatabaseId, expense::parse_amount};

/// Database identifier for a daily record.
pub type DailyRecordId = DatabaseId;

/// The largest difference between a submitted and computed total that is
/// still treated as the same amount.
const TOTAL_TOLERANCE: f64 = 0.005;

/// One line of a daily record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyItem {
    pub name: String,
    pub amount: f64,
}

/// A saved daily record.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRecord {
    pub id: DailyRecordId,
    pub user_id: UserID,
    /// Local date and time at which the record was saved.
    pub date: PrimitiveDateTime,
    pub items: Vec<DailyItem>,
    pub total_amount: f64,
}

/// A validated daily record that has not been saved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDailyRecord {
    pub items: Vec<DailyItem>,
    pub total_amount: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(f64),
    Text(String),
}

#[derive(Deserialize)]
struct RawItem {
    name: String,
    amount: RawAmount,
}

impl NewDailyRecord {
    /// Validate the JSON item list sent by the daily form.
    ///
    /// `items_json` must be an array of `{"name", "amount"}` objects, where the
    /// amount is a number or numeric string. The total is computed from the
    /// items. If `submitted_total` is not blank it must agree with the computed
    /// total to within half a cent.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - [Error::InvalidDailyItems] if the JSON is malformed, the list is empty, or an item has no name,
    /// - [Error::InvalidAmount] if an item amount or the submitted total is not a valid amount,
    /// - [Error::DailyTotalMismatch] if the submitted total disagrees with the items.
    pub fn new(items_json: &str, submitted_total: Option<&str>) -> Result<Self, Error> {
        let raw_items: Vec<RawItem> = serde_json::from_str(items_json)
            .map_err(|error| Error::InvalidDailyItems(error.to_string()))?;

        if raw_items.is_empty() {
            return Err(Error::InvalidDailyItems("add at least one item".to_owned()));
        }

        let items = raw_items
            .into_iter()
            .enumerate()
            .map(|(index, raw_item)| parse_item(index, raw_item))
            .collect::<Result<Vec<_>, _>>()?;

        let total_amount = items_total(&items);

        if let Some(submitted_total) = submitted_total.filter(|total| !total.trim().is_empty()) {
            let submitted = parse_amount(submitted_total)?;

            if (submitted - total_amount).abs() > TOTAL_TOLERANCE {
                return Err(Error::DailyTotalMismatch {
                    computed: total_amount,
                    submitted,
                });
            }
        }

        Ok(Self {
            items,
            total_amount,
        })
    }
}

fn parse_item(index: usize, raw_item: RawItem) -> Result<DailyItem, Error> {
    let name = raw_item.name.trim();
    if name.is_empty() {
        return Err(Error::InvalidDailyItems(format!(
            "item {} needs a name",
            index + 1
        )));
    }

    let amount = match raw_item.amount {
        RawAmount::Number(amount) if amount.is_finite() && amount >= 0.0 => amount,
        RawAmount::Number(amount) => return Err(Error::InvalidAmount(amount.to_string())),
        RawAmount::Text(raw_amount) => parse_amount(&raw_amount)?,
    };

    Ok(DailyItem {
        name: name.to_owned(),
        amount,
    })
}

/// The sum of the item amounts, rounded to the nearest cent.
pub fn items_total(items: &[DailyItem]) -> f64 {
    let total: f64 = items.iter().map(|item| item.amount).sum();

    (total * 100.0).round() / 100.0
}

/// An inclusive range of days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: Date,
    pub end: Date,
}

impl DateRange {
    /// Build a range from optional query string dates in the format YYYY-MM-DD.
    ///
    /// Blank dates count as missing, and the range is only returned when
    /// both ends are present.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidDate] if a non-blank date cannot be parsed.
    pub fn from_query(start: Option<&str>, end: Option<&str>) -> Result<Option<Self>, Error> {
        let start = parse_optional_date(start)?;
        let end = parse_optional_date(end)?;

        Ok(start.zip(end).map(|(start, end)| Self { start, end }))
    }
}

fn parse_optional_date(raw_date: Option<&str>) -> Result<Option<Date>, Error> {
    let Some(raw_date) = raw_date.map(str::trim).filter(|date| !date.is_empty()) else {
        return Ok(None);
    };

    Date::parse(raw_date, format_description!("[year]-[month]-[day]"))
        .map(Some)
        .map_err(|_| Error::InvalidDate(raw_date.to_owned()))
}
