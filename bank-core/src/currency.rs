//! Currency codes and the exchange-rate table.

use serde::{Deserialize, Serialize};
use std::fmt;

/// ISO 4217 currency code of a participating national bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    /// US Dollar
    USD,
    /// Euro
    EUR,
    /// British Pound
    GBP,
    /// Japanese Yen
    JPY,
    /// Swiss Franc
    CHF,
    /// Brazilian Real
    BRL,
}

impl Currency {
    /// Every supported currency, in bank-creation order.
    pub const ALL: [Currency; 6] = [
        Currency::USD,
        Currency::EUR,
        Currency::GBP,
        Currency::JPY,
        Currency::CHF,
        Currency::BRL,
    ];

    /// Number of supported currencies.
    pub const COUNT: usize = Self::ALL.len();

    /// ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::CHF => "CHF",
            Currency::BRL => "BRL",
        }
    }

    /// Parse from an ISO 4217 code
    pub fn from_code(s: &str) -> Option<Self> {
        match s {
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            "JPY" => Some(Currency::JPY),
            "CHF" => Some(Currency::CHF),
            "BRL" => Some(Currency::BRL),
            _ => None,
        }
    }

    /// Position in [`Currency::ALL`], used to index per-currency tables.
    pub(crate) fn index(self) -> usize {
        match self {
            Currency::USD => 0,
            Currency::EUR => 1,
            Currency::GBP => 2,
            Currency::JPY => 3,
            Currency::CHF => 4,
            Currency::BRL => 5,
        }
    }

    /// Value of one unit in US dollars; the anchor all cross rates derive
    /// from.
    fn usd_anchor(self) -> f64 {
        match self {
            Currency::USD => 1.0,
            Currency::EUR => 1.08,
            Currency::GBP => 1.27,
            Currency::JPY => 0.0067,
            Currency::CHF => 1.13,
            Currency::BRL => 0.18,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Exchange rate between two currencies.
///
/// Pure and total over the currency set: always positive, with
/// `exchange_rate(c, c) == 1.0`. Rates are quotients of per-currency USD
/// anchors, so triangular conversions stay consistent.
pub fn exchange_rate(from: Currency, to: Currency) -> f64 {
    from.usd_anchor() / to.usd_anchor()
}
