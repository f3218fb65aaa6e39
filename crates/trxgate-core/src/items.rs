//! Line-item consistency (pipeline stage 7).

use crate::error::TransactionError;
use crate::money::Money;
use crate::types::LineItem;

/// Sum of quantity × unit price, `None` if it overflows.
pub fn line_total(items: &[LineItem]) -> Option<Money> {
    items.iter().try_fold(Money::zero(), |acc, item| {
        let line = item.unit_price.checked_mul_quantity(item.quantity)?;
        acc.checked_add(line)
    })
}

/// Checks that the items add up to the declared total exactly.
///
/// An overflowing sum can never equal a valid total and is reported as a
/// mismatch.
pub fn check(items: &[LineItem], declared_total: Money) -> Result<(), TransactionError> {
    match line_total(items) {
        Some(sum) if sum == declared_total => Ok(()),
        _ => Err(TransactionError::InvalidTotalAmount),
    }
}
