//! Type-safe price representation using decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., pesos, dollars).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price in the store's default currency.
    #[must_use]
    pub fn from_amount(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::default())
    }

    /// A zero price in the default currency.
    #[must_use]
    pub fn zero() -> Self {
        Self::from_amount(Decimal::ZERO)
    }

    /// Whether the amount is zero (used by upstream payloads to mean "no price").
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let places = self.currency_code.decimal_places();
        let rounded = self.amount.round_dp(places);
        write!(
            f,
            "{}{:.*}",
            self.currency_code.symbol(),
            places as usize,
            rounded
        )
    }
}

/// ISO 4217 currency codes used by the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    /// Chilean peso (zero-decimal currency).
    #[default]
    CLP,
    USD,
    EUR,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::CLP | Self::USD => "$",
            Self::EUR => "€",
        }
    }

    /// Number of fractional digits shown for amounts in this currency.
    #[must_use]
    pub const fn decimal_places(&self) -> u32 {
        match self {
            Self::CLP => 0,
            Self::USD | Self::EUR => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_zero_decimal_currency() {
        let price = Price::from_amount(Decimal::new(5000, 0));
        assert_eq!(price.to_string(), "$5000");
    }

    #[test]
    fn test_display_rounds_fractional_pesos() {
        let price = Price::from_amount(Decimal::new(499_990, 2));
        assert_eq!(price.to_string(), "$5000");
    }

    #[test]
    fn test_display_two_decimal_currency() {
        let price = Price::new(Decimal::new(1999, 2), CurrencyCode::USD);
        assert_eq!(price.to_string(), "$19.99");
    }

    #[test]
    fn test_zero_price() {
        assert!(Price::zero().is_zero());
        assert!(!Price::from_amount(Decimal::ONE).is_zero());
        assert_eq!(Price::zero().currency_code, CurrencyCode::CLP);
    }
}
