use std::collections::BTreeMap;
use std::sync::LazyLock;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// Jurisdiction key selecting a fixed base tax rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxRegion {
    Usa,
    Eu,
    Uk,
    Canada,
    Australia,
    Japan,
    Other,
}

/// Fixed tax rule for one region.
///
/// `special_categories` and `exemption_threshold` are carried as data only;
/// [`tax_amount`] does not consult them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRule {
    pub region: TaxRegion,
    /// Base rate in percent (e.g. `21` for 21% VAT).
    pub base_rate: BigDecimal,
    /// Reduced/zero rates for special item categories, in percent.
    pub special_categories: BTreeMap<String, BigDecimal>,
    /// Annual revenue threshold under which a supplier is exempt.
    pub exemption_threshold: Option<BigDecimal>,
    pub has_vat: bool,
}

fn rate(digits: i64, scale: i64) -> BigDecimal {
    BigDecimal::new(digits.into(), scale)
}

fn categories(entries: &[(&str, i64, i64)]) -> BTreeMap<String, BigDecimal> {
    entries
        .iter()
        .map(|(name, digits, scale)| (name.to_string(), rate(*digits, *scale)))
        .collect()
}

// Index order matches the `rule_for` match below.
static RULES: LazyLock<[TaxRule; 7]> = LazyLock::new(|| {
    [
        TaxRule {
            region: TaxRegion::Usa,
            // Average state sales tax.
            base_rate: rate(725, 2),
            special_categories: categories(&[("food", 0, 0), ("medical", 0, 0), ("digital", 60, 1)]),
            exemption_threshold: Some(rate(0, 0)),
            has_vat: false,
        },
        TaxRule {
            region: TaxRegion::Eu,
            // Average VAT across member states.
            base_rate: rate(21, 0),
            special_categories: categories(&[("food", 10, 0), ("books", 6, 0), ("medical", 0, 0)]),
            exemption_threshold: Some(rate(0, 0)),
            has_vat: true,
        },
        TaxRule {
            region: TaxRegion::Uk,
            base_rate: rate(20, 0),
            special_categories: categories(&[("food", 0, 0), ("books", 0, 0), ("children", 0, 0)]),
            // Annual registration threshold.
            exemption_threshold: Some(rate(85_000, 0)),
            has_vat: true,
        },
        TaxRule {
            region: TaxRegion::Canada,
            // Federal GST only.
            base_rate: rate(5, 0),
            special_categories: categories(&[("food", 0, 0), ("medical", 0, 0)]),
            // Small supplier exemption.
            exemption_threshold: Some(rate(30_000, 0)),
            has_vat: false,
        },
        TaxRule {
            region: TaxRegion::Australia,
            base_rate: rate(10, 0),
            special_categories: categories(&[
                ("food", 0, 0),
                ("medical", 0, 0),
                ("education", 0, 0),
            ]),
            exemption_threshold: Some(rate(75_000, 0)),
            has_vat: true,
        },
        TaxRule {
            region: TaxRegion::Japan,
            base_rate: rate(10, 0),
            special_categories: categories(&[("food", 8, 0)]),
            exemption_threshold: None,
            has_vat: true,
        },
        TaxRule {
            region: TaxRegion::Other,
            // Default rate when no jurisdiction applies.
            base_rate: rate(15, 0),
            special_categories: BTreeMap::new(),
            exemption_threshold: None,
            has_vat: false,
        },
    ]
});

/// The full rule table, in declaration order.
pub fn rules() -> &'static [TaxRule] {
    &*RULES
}

/// Rule lookup; `None` selects the `Other` fallback.
pub fn rule_for(region: Option<TaxRegion>) -> &'static TaxRule {
    let idx = match region.unwrap_or(TaxRegion::Other) {
        TaxRegion::Usa => 0,
        TaxRegion::Eu => 1,
        TaxRegion::Uk => 2,
        TaxRegion::Canada => 3,
        TaxRegion::Australia => 4,
        TaxRegion::Japan => 5,
        TaxRegion::Other => 6,
    };
    &RULES[idx]
}

/// `amount × rate / 100`, exact.
pub fn percent_of(amount: &BigDecimal, rate: &BigDecimal) -> BigDecimal {
    (amount * rate) / BigDecimal::from(100)
}

/// Tax owed on `subtotal`.
///
/// A region selects its table base rate and the manual rate is ignored
/// entirely; without a region the manual rate applies.
pub fn tax_amount(
    subtotal: &BigDecimal,
    manual_rate: &BigDecimal,
    region: Option<TaxRegion>,
) -> BigDecimal {
    match region {
        Some(_) => percent_of(subtotal, &rule_for(region).base_rate),
        None => percent_of(subtotal, manual_rate),
    }
}
