//! Decimal amount arithmetic shared by the order view and the in-memory back-end.
//!
//! The basket server stores amounts with two decimal places and renders them with
//! exactly two digits after the point. Client-side totals must be produced with
//! the same rule so that the server-confirmed total can be compared as a string.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places carried by every amount.
pub const AMOUNT_SCALE: u32 = 2;

/// Rounds half-up to two decimal places and pins the scale to two digits.
pub fn round_amount(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(AMOUNT_SCALE);
    rounded
}

/// Amount of a single line item: `unit_price × quantity`, rounded.
pub fn line_amount(unit_price: Decimal, quantity: u32) -> Decimal {
    round_amount(unit_price * Decimal::from(quantity))
}

/// Total of already rounded line amounts, rounded again.
pub fn order_total<I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    round_amount(amounts.into_iter().sum())
}

/// Renders an amount the way the server does (`"9.00"`).
pub fn format_amount(value: Decimal) -> String {
    round_amount(value).to_string()
}
