//! Item identifier parsed from a path segment

use std::fmt;

/// Identifier of a stored item.
///
/// Matches the `SERIAL` primary key of the `items` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(i32);

impl ItemId {
    pub fn new(id: i32) -> Self {
        Self(id)
    }

    /// Parse the leading integer of a raw path segment.
    ///
    /// Leading whitespace is skipped, then an optional sign, then either a
    /// `0x` hex run or a decimal digit run; anything after the digits is
    /// ignored (`12abc` is 12, `7.5` is 7). Returns None when there are no
    /// digits or the value does not fit the `INTEGER` column. Callers treat
    /// None the same as an absent row.
    pub fn parse(raw: &str) -> Option<Self> {
        let rest = raw.trim_start();
        let (negative, rest) = match rest.as_bytes().first() {
            Some(b'-') => (true, &rest[1..]),
            Some(b'+') => (false, &rest[1..]),
            _ => (false, rest),
        };

        let hex = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X"));
        let (digits, radix) = match hex {
            Some(h) => (leading(h, |c| c.is_ascii_hexdigit()), 16),
            None => (leading(rest, |c| c.is_ascii_digit()), 10),
        };
        if digits.is_empty() {
            return None;
        }

        let magnitude = i64::from_str_radix(digits, radix).ok()?;
        let value = if negative { -magnitude } else { magnitude };
        i32::try_from(value).ok().map(Self)
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

fn leading(s: &str, accept: impl Fn(char) -> bool) -> &str {
    let end = s.find(|c: char| !accept(c)).unwrap_or(s.len());
    &s[..end]
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
