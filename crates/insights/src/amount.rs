use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign},
};

/// Result of reading an expense amount as a whole number.
///
/// Amounts arrive as decimal strings. Only the leading integer part is kept,
/// so `"45.99"` becomes `Whole(45)`. A string without leading digits is
/// `NotANumber`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParsedAmount {
    Whole(i64),
    NotANumber,
}

/// Parses the leading base-10 integer of `raw`.
///
/// Rules:
/// - leading whitespace is skipped
/// - an optional `+` or `-` sign is accepted
/// - the longest run of ASCII digits is consumed, anything after it ignored
/// - digit runs too large for `i64` saturate
///
/// ```rust
/// use insights::{ParsedAmount, parse_amount};
///
/// assert_eq!(parse_amount("45.99"), ParsedAmount::Whole(45));
/// assert_eq!(parse_amount("  -7"), ParsedAmount::Whole(-7));
/// assert_eq!(parse_amount("12abc"), ParsedAmount::Whole(12));
/// assert_eq!(parse_amount("abc"), ParsedAmount::NotANumber);
/// ```
#[must_use]
pub fn parse_amount(raw: &str) -> ParsedAmount {
    let trimmed = raw.trim_start();

    let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
        (true, stripped)
    } else if let Some(stripped) = trimmed.strip_prefix('+') {
        (false, stripped)
    } else {
        (false, trimmed)
    };

    let digits_len = rest
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits_len == 0 {
        return ParsedAmount::NotANumber;
    }

    let magnitude = rest[..digits_len].bytes().fold(0i64, |acc, b| {
        acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
    });

    ParsedAmount::Whole(if negative { -magnitude } else { magnitude })
}

/// Running total of one category.
///
/// Once a `NotANumber` contribution is added the total stays `NotANumber`:
/// a single malformed amount corrupts the whole category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Total {
    Amount(i64),
    NotANumber,
}

impl Total {
    pub const ZERO: Total = Total::Amount(0);

    /// Returns the amount, or `None` if the total is corrupted.
    #[must_use]
    pub const fn amount(self) -> Option<i64> {
        match self {
            Self::Amount(value) => Some(value),
            Self::NotANumber => None,
        }
    }

    #[must_use]
    pub const fn is_nan(self) -> bool {
        matches!(self, Self::NotANumber)
    }

    /// Weight of the total when drawn as a chart slice.
    ///
    /// Negative and corrupted totals cannot be drawn and weigh nothing.
    #[must_use]
    pub fn as_chart_value(self) -> u64 {
        match self {
            Self::Amount(value) => u64::try_from(value).unwrap_or(0),
            Self::NotANumber => 0,
        }
    }
}

impl Default for Total {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<ParsedAmount> for Total {
    fn from(value: ParsedAmount) -> Self {
        match value {
            ParsedAmount::Whole(amount) => Self::Amount(amount),
            ParsedAmount::NotANumber => Self::NotANumber,
        }
    }
}

impl Add for Total {
    type Output = Total;

    fn add(self, rhs: Total) -> Self::Output {
        match (self, rhs) {
            (Self::Amount(a), Self::Amount(b)) => Self::Amount(a.saturating_add(b)),
            _ => Self::NotANumber,
        }
    }
}

impl Add<ParsedAmount> for Total {
    type Output = Total;

    fn add(self, rhs: ParsedAmount) -> Self::Output {
        self + Total::from(rhs)
    }
}

impl AddAssign<ParsedAmount> for Total {
    fn add_assign(&mut self, rhs: ParsedAmount) {
        *self = *self + rhs;
    }
}

impl Sum for Total {
    fn sum<I: Iterator<Item = Total>>(iter: I) -> Self {
        iter.fold(Total::ZERO, Add::add)
    }
}

impl fmt::Display for Total {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Amount(value) => write!(f, "{value}"),
            Self::NotANumber => f.write_str("NaN"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_keeps_integer_prefix() {
        assert_eq!(parse_amount("100"), ParsedAmount::Whole(100));
        assert_eq!(parse_amount("45.99"), ParsedAmount::Whole(45));
        assert_eq!(parse_amount("0.75"), ParsedAmount::Whole(0));
        assert_eq!(parse_amount("1e3"), ParsedAmount::Whole(1));
        assert_eq!(parse_amount("\t 12 apples"), ParsedAmount::Whole(12));
        assert_eq!(parse_amount("+8"), ParsedAmount::Whole(8));
        assert_eq!(parse_amount("-3.5"), ParsedAmount::Whole(-3));
    }

    #[test]
    fn parse_rejects_strings_without_leading_digits() {
        assert_eq!(parse_amount(""), ParsedAmount::NotANumber);
        assert_eq!(parse_amount("   "), ParsedAmount::NotANumber);
        assert_eq!(parse_amount("abc"), ParsedAmount::NotANumber);
        assert_eq!(parse_amount(".5"), ParsedAmount::NotANumber);
        assert_eq!(parse_amount("-"), ParsedAmount::NotANumber);
        assert_eq!(parse_amount("$10"), ParsedAmount::NotANumber);
    }

    #[test]
    fn parse_saturates_huge_numbers() {
        assert_eq!(
            parse_amount("99999999999999999999999"),
            ParsedAmount::Whole(i64::MAX)
        );
    }

    #[test]
    fn not_a_number_poisons_the_total() {
        let mut total = Total::ZERO;
        total += ParsedAmount::Whole(10);
        total += ParsedAmount::NotANumber;
        total += ParsedAmount::Whole(5);
        assert_eq!(total, Total::NotANumber);
        assert_eq!(total.to_string(), "NaN");
        assert_eq!(total.as_chart_value(), 0);
    }

    #[test]
    fn sum_of_totals() {
        let total: Total = [Total::Amount(3), Total::Amount(4)].into_iter().sum();
        assert_eq!(total, Total::Amount(7));
        assert_eq!(Total::Amount(-2).as_chart_value(), 0);
    }
}
