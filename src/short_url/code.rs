use std::fmt::Display;

use rand::distr::{Alphanumeric, SampleString};

/// A six character alphanumeric identifier for a short URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShortCode(String);

impl ShortCode {
    /// The number of characters in every short code.
    pub const LENGTH: usize = 6;

    /// Draw a code uniformly from the 62 ASCII letters and digits.
    pub fn random() -> Self {
        Self(Alphanumeric.sample_string(&mut rand::rng(), Self::LENGTH))
    }

    /// Parse a path segment, returning `None` unless it is a well-formed code.
    pub fn parse(raw_code: &str) -> Option<Self> {
        let is_valid = raw_code.len() == Self::LENGTH
            && raw_code.bytes().all(|byte| byte.is_ascii_alphanumeric());

        is_valid.then(|| Self(raw_code.to_owned()))
    }

    /// Wrap a code read back from the database without checking it.
    pub(crate) fn new_unchecked(code: String) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
