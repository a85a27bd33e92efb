//! Reading and writing the encrypted auth cookie.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::{
    Error,
    auth::{UserID, token::Token},
};

/// The name of the cookie holding the serialized [Token].
pub(crate) const COOKIE_TOKEN: &str = "token";
/// The default duration for which auth cookies are valid.
pub const DEFAULT_COOKIE_DURATION: Duration = Duration::minutes(5);

/// Add an auth cookie for `user_id` to the cookie jar that expires `duration` from now.
///
/// # Errors
///
/// Returns [Error::CookieError] if the expiry overflows or the token cannot be serialized.
pub fn set_auth_cookie(
    jar: PrivateCookieJar,
    user_id: UserID,
    duration: Duration,
) -> Result<PrivateCookieJar, Error> {
    let token = Token::new(user_id, duration)
        .ok_or_else(|| Error::CookieError(format!("cookie duration {duration} is too long")))?;

    set_token_cookie(jar, token)
}

fn set_token_cookie(jar: PrivateCookieJar, token: Token) -> Result<PrivateCookieJar, Error> {
    let value =
        serde_json::to_string(&token).map_err(|error| Error::CookieError(error.to_string()))?;

    Ok(jar.add(
        Cookie::build((COOKIE_TOKEN, value))
            .expires(token.expires_at)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    ))
}

/// Overwrite the auth cookie with an invalid value and a max age of zero,
/// which deletes the cookie on the client side.
pub fn invalidate_auth_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_TOKEN, "deleted"))
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Read the token from the auth cookie.
///
/// # Errors
///
/// Returns [Error::NotAuthenticated] if the cookie is missing, could not be
/// decrypted or parsed, or the token has expired.
pub(crate) fn get_token_from_cookies(jar: &PrivateCookieJar) -> Result<Token, Error> {
    let cookie = jar.get(COOKIE_TOKEN).ok_or(Error::NotAuthenticated)?;
    let token: Token =
        serde_json::from_str(cookie.value_trimmed()).map_err(|_| Error::NotAuthenticated)?;

    if token.is_expired() {
        return Err(Error::NotAuthenticated);
    }

    Ok(token)
}

/// Push the expiry of the auth cookie out to at least `duration` from now.
///
/// Tokens that already outlive that, e.g. from "remember me", are left alone.
///
/// # Errors
///
/// The cookie jar is not modified if an error is returned.
///
/// Returns [Error::NotAuthenticated] if there is no valid token, or
/// [Error::CookieError] if the new expiry overflows.
pub(crate) fn extend_auth_cookie_duration_if_needed(
    jar: PrivateCookieJar,
    duration: Duration,
) -> Result<PrivateCookieJar, Error> {
    let token = get_token_from_cookies(&jar)?;
    let extended = Token::new(token.user_id, duration)
        .ok_or_else(|| Error::CookieError(format!("cookie duration {duration} is too long")))?;

    if extended.expires_at <= token.expires_at {
        return Ok(jar);
    }

    set_token_cookie(jar, extended)
}
