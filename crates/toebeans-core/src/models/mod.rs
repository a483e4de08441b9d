//! Domain models for the pet medication tracker.

mod collection;
mod medication;
mod pet;

pub use collection::*;
pub use medication::*;
pub use pet::*;

/// Parse a numeric text field that must hold a positive, finite number.
///
/// Surrounding whitespace is ignored. Anything else (empty, non-numeric,
/// zero, negative, `inf`, `NaN`) yields `None`.
pub fn parse_positive(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value > 0.0)
}

/// Treat empty optional text fields the same as missing ones.
pub(crate) fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}
