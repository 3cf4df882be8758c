//! Money representation and display formatting using decimal arithmetic.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Monetary amount with an ISO 4217 currency code.
///
/// The amount is an exact decimal; Shopify and the platform API both send
/// amounts as strings (e.g. `"19.99"`), which deserialize without loss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    /// Amount in the currency's standard unit (dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code, e.g. `USD`.
    pub currency_code: String,
}

impl Money {
    /// Create a new amount.
    #[must_use]
    pub fn new(amount: Decimal, currency_code: impl Into<String>) -> Self {
        Self {
            amount,
            currency_code: currency_code.into(),
        }
    }

    /// Format for display, e.g. `$1,234.56`.
    #[must_use]
    pub fn display(&self) -> String {
        format_money(self.amount, &self.currency_code)
    }
}

/// Currencies with known display rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
    NZD,
    JPY,
    INR,
    CHF,
    MXN,
}

impl CurrencyCode {
    /// Look up a currency by its ISO code (case-insensitive).
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        let currency = match code.trim().to_ascii_uppercase().as_str() {
            "USD" => Self::USD,
            "EUR" => Self::EUR,
            "GBP" => Self::GBP,
            "CAD" => Self::CAD,
            "AUD" => Self::AUD,
            "NZD" => Self::NZD,
            "JPY" => Self::JPY,
            "INR" => Self::INR,
            "CHF" => Self::CHF,
            "MXN" => Self::MXN,
            _ => return None,
        };
        Some(currency)
    }

    /// Display prefix as rendered by an en-US currency formatter.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::USD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
            Self::CAD => "CA$",
            Self::AUD => "A$",
            Self::NZD => "NZ$",
            Self::JPY => "¥",
            Self::INR => "₹",
            Self::CHF => "CHF ",
            Self::MXN => "MX$",
        }
    }

    /// Number of minor-unit digits shown.
    #[must_use]
    pub const fn decimals(self) -> u32 {
        match self {
            Self::JPY => 0,
            _ => 2,
        }
    }
}

/// Format an amount for display in the given currency.
///
/// Known currencies render en-US style (`$1,234.56`, `-€5.00`, `¥1,235`).
/// Unknown codes fall back to `"{code} {amount}"` with two decimals.
///
/// ```
/// use rust_decimal::Decimal;
/// use storefront_sdk_core::format_money;
///
/// assert_eq!(format_money(Decimal::new(123456, 2), "USD"), "$1,234.56");
/// assert_eq!(format_money(Decimal::new(5, 0), "SEK"), "SEK 5.00");
/// ```
#[must_use]
pub fn format_money(amount: Decimal, currency_code: &str) -> String {
    let (prefix, decimals) = CurrencyCode::from_code(currency_code).map_or_else(
        || (format!("{} ", currency_code.trim().to_ascii_uppercase()), 2),
        |c| (c.symbol().to_string(), c.decimals()),
    );

    let rounded = amount.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    let digits = format!("{:.*}", decimals as usize, rounded.abs());
    let (whole, fraction) = digits
        .split_once('.')
        .map_or((digits.as_str(), None), |(w, f)| (w, Some(f)));

    let grouped = group_thousands(whole);
    match fraction {
        Some(fraction) => format!("{sign}{prefix}{grouped}.{fraction}"),
        None => format!("{sign}{prefix}{grouped}"),
    }
}

/// Format a min/max price pair, collapsing to one price when equal.
#[must_use]
pub fn format_price_range(min: &Money, max: &Money) -> String {
    if min.amount == max.amount {
        min.display()
    } else {
        format!("{} - {}", min.display(), max.display())
    }
}

/// Percentage saved when `price` is below `compare_at_price`, rounded to
/// the nearest whole percent.
///
/// Returns 0 when there is no discount or `compare_at_price` is not
/// positive.
///
/// ```
/// use rust_decimal::Decimal;
/// use storefront_sdk_core::calculate_discount;
///
/// assert_eq!(calculate_discount(Decimal::from(100), Decimal::from(80)), 20);
/// assert_eq!(calculate_discount(Decimal::ZERO, Decimal::from(10)), 0);
/// ```
#[must_use]
pub fn calculate_discount(compare_at_price: Decimal, price: Decimal) -> u32 {
    if compare_at_price <= Decimal::ZERO || price >= compare_at_price {
        return 0;
    }

    let percent = (compare_at_price - price) / compare_at_price * Decimal::ONE_HUNDRED;
    percent
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .unwrap_or(0)
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
