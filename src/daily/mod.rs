//! Itemized daily expense records.

mod db;
mod delete;
mod domain;
mod entry;
mod records;
mod save;

pub use db::{
    create_daily_expense_table, create_daily_record, delete_daily_record, get_daily_record,
    get_daily_records,
};
pub use delete::delete_daily_endpoint;
pub use domain::{DailyItem, DailyRecord, DailyRecordId, DateRange, NewDailyRecord};
pub use entry::{get_daily_page, get_view_daily_page};
pub use records::get_daily_records_page;
pub use save::save_daily_endpoint;
