//! Input validation for user-supplied order parameters
//!
//! These functions turn raw textual input (CLI arguments, form fields) into
//! typed, constrained values before anything touches the network. Every
//! failure is a [`GambitError::Validation`] so callers can report it without
//! unwinding.

use rust_decimal::Decimal;

use crate::domain::OrderSide;
use crate::error::{GambitError, Result};

/// Validate a trading symbol.
///
/// Symbols must be non-empty and ASCII alphanumeric (e.g. `BTCUSDT`).
/// The returned symbol is uppercased, so the function is idempotent.
pub fn validate_symbol(raw: &str) -> Result<String> {
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(GambitError::Validation(format!(
            "symbol must be alphanumeric, e.g. BTCUSDT: {:?}",
            raw
        )));
    }
    Ok(raw.to_ascii_uppercase())
}

/// Validate an order side. Accepts any casing of BUY/SELL.
pub fn validate_side(raw: &str) -> Result<OrderSide> {
    match raw.to_ascii_uppercase().as_str() {
        "BUY" => Ok(OrderSide::Buy),
        "SELL" => Ok(OrderSide::Sell),
        other => Err(GambitError::Validation(format!(
            "side must be BUY or SELL: {}",
            other
        ))),
    }
}

/// Parse a strictly positive decimal (quantity, price).
pub fn validate_positive_decimal(raw: &str, field_name: &str) -> Result<Decimal> {
    let value: Decimal = raw.trim().parse().map_err(|_| {
        GambitError::Validation(format!("{} must be a number: {:?}", field_name, raw))
    })?;

    if value <= Decimal::ZERO {
        return Err(GambitError::Validation(format!(
            "{} must be > 0: {}",
            field_name, value
        )));
    }

    Ok(value)
}

/// Parse a strictly positive integer (slice count).
pub fn validate_positive_integer(raw: &str, field_name: &str) -> Result<u32> {
    let value: u32 = raw.trim().parse().map_err(|_| {
        GambitError::Validation(format!("{} must be an integer: {:?}", field_name, raw))
    })?;

    if value == 0 {
        return Err(GambitError::Validation(format!(
            "{} must be > 0",
            field_name
        )));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_validate_symbol() {
        assert_eq!(validate_symbol("btcusdt").unwrap(), "BTCUSDT");
        assert_eq!(validate_symbol("BTCUSDT").unwrap(), "BTCUSDT");

        assert!(validate_symbol("").is_err());
        assert!(validate_symbol("BTC-USDT").is_err());
        assert!(validate_symbol("BTC USDT").is_err());
    }

    #[test]
    fn test_validate_symbol_idempotent() {
        let once = validate_symbol("ethUsdt").unwrap();
        let twice = validate_symbol(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_validate_side() {
        assert_eq!(validate_side("buy").unwrap(), OrderSide::Buy);
        assert_eq!(validate_side("BUY").unwrap(), OrderSide::Buy);
        assert_eq!(validate_side("Sell").unwrap(), OrderSide::Sell);

        assert!(validate_side("HOLD").is_err());
        assert!(validate_side("").is_err());
    }

    #[test]
    fn test_validate_positive_decimal() {
        assert_eq!(
            validate_positive_decimal("0.001", "quantity").unwrap(),
            dec!(0.001)
        );
        assert_eq!(
            validate_positive_decimal("35000", "price").unwrap(),
            dec!(35000)
        );

        assert!(validate_positive_decimal("0", "quantity").is_err());
        assert!(validate_positive_decimal("-1", "quantity").is_err());
        assert!(validate_positive_decimal("abc", "quantity").is_err());
        assert!(validate_positive_decimal("", "quantity").is_err());
    }

    #[test]
    fn test_validate_positive_integer() {
        assert_eq!(validate_positive_integer("5", "slices").unwrap(), 5);

        assert!(validate_positive_integer("0", "slices").is_err());
        assert!(validate_positive_integer("-3", "slices").is_err());
        assert!(validate_positive_integer("2.5", "slices").is_err());
        assert!(validate_positive_integer("x", "slices").is_err());
    }
}
