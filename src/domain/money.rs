use std::fmt;

/// Money is represented as integer cents to avoid floating-point precision issues.
/// For INR/EUR/USD, 1 unit = 100 cents, so ₹50.00 = 5000 cents.
pub type Cents = i64;

/// Format cents as a plain two-decimal string.
/// Example: 5000 -> "50.00", -1234 -> "-12.34"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.abs();
    let units = abs_cents / 100;
    let remainder = abs_cents % 100;
    format!("{}{}.{:02}", sign, units, remainder)
}

/// Format cents prefixed with a currency symbol.
/// Example: ("₹", 6650) -> "₹66.50"
pub fn format_currency(symbol: &str, cents: Cents) -> String {
    format!("{}{}", symbol, format_cents(cents))
}

/// Parse a non-negative decimal string into cents.
/// Example: "50.00" -> 5000, "12.5" -> 1250, "100" -> 10000
/// More than two decimal places is rejected, not truncated.
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let input = input.trim();
    if input.starts_with('-') {
        return Err(ParseCentsError::Negative);
    }
    let input = input.strip_prefix('+').unwrap_or(input);

    let (units_str, decimal_str) = match input.split_once('.') {
        Some((units, decimals)) => (units, decimals),
        None => (input, ""),
    };

    if units_str.is_empty() && decimal_str.is_empty() {
        return Err(ParseCentsError::InvalidFormat);
    }
    if !units_str.chars().all(|c| c.is_ascii_digit())
        || !decimal_str.chars().all(|c| c.is_ascii_digit())
    {
        return Err(ParseCentsError::InvalidFormat);
    }

    let units: i64 = if units_str.is_empty() {
        0
    } else {
        units_str.parse().map_err(|_| ParseCentsError::Overflow)?
    };

    let decimal_cents: i64 = match decimal_str.len() {
        0 => 0,
        // Single digit like "5" means 50 cents
        1 => decimal_str.parse::<i64>().map_err(|_| ParseCentsError::InvalidFormat)? * 10,
        2 => decimal_str
            .parse()
            .map_err(|_| ParseCentsError::InvalidFormat)?,
        _ => return Err(ParseCentsError::TooManyDecimals),
    };

    units
        .checked_mul(100)
        .and_then(|c| c.checked_add(decimal_cents))
        .ok_or(ParseCentsError::Overflow)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseCentsError {
    InvalidFormat,
    Negative,
    TooManyDecimals,
    Overflow,
}

impl fmt::Display for ParseCentsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseCentsError::InvalidFormat => write!(f, "invalid money format"),
            ParseCentsError::Negative => write!(f, "amount must not be negative"),
            ParseCentsError::TooManyDecimals => {
                write!(f, "amount has more than two decimal places")
            }
            ParseCentsError::Overflow => write!(f, "amount is too large"),
        }
    }
}

impl std::error::Error for ParseCentsError {}

/// A percentage rate stored in basis points (1/100th of a percent).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rate {
    basis_points: i64,
}

impl Rate {
    pub const fn from_basis_points(basis_points: i64) -> Self {
        Self { basis_points }
    }

    /// Apply the rate to an amount, rounding half-up to the nearest cent.
    pub fn apply(&self, cents: Cents) -> Cents {
        let scaled = i128::from(cents) * i128::from(self.basis_points) + 5_000;
        scaled.div_euclid(10_000) as Cents
    }
}

impl fmt::Display for Rate {
    /// Renders as a percentage: 500 -> "5%", 1250 -> "12.5%"
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.basis_points / 100;
        let rest = self.basis_points % 100;
        if rest == 0 {
            write!(f, "{}%", whole)
        } else if rest % 10 == 0 {
            write!(f, "{}.{}%", whole, rest / 10)
        } else {
            write!(f, "{}.{:02}%", whole, rest)
        }
    }
}
