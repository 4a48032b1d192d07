//! Regional tax rules and percentage math.
//!
//! Amounts and rates are exact decimals; percentage application never rounds,
//! so derived invoice fields stay reproducible to the digit.

pub mod rules;

pub use rules::{TaxRegion, TaxRule, percent_of, rule_for, rules, tax_amount};
