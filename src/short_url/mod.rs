//! Personal short links that redirect to an original URL.

mod code;
mod db;
mod delete;
mod redirect;
mod shorten;
mod target;

pub use code::ShortCode;
pub use db::{
    create_short_url, create_short_url_table, delete_short_url, get_short_url_by_code,
    get_short_urls,
};
pub use delete::delete_url_endpoint;
pub use redirect::redirect_short_code;
pub use shorten::{shorten_endpoint, shorten_form};
pub use target::TargetUrl;

use time::OffsetDateTime;

use crate::{auth::UserID, database_id::DatabaseId};

/// Database identifier for a short URL.
pub type ShortUrlId = DatabaseId;

/// A stored mapping from a short code to the URL it redirects to.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortUrl {
    pub id: ShortUrlId,
    pub user_id: UserID,
    pub original_url: String,
    pub short_code: ShortCode,
    pub created_at: OffsetDateTime,
}
