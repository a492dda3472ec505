//! Price calculation and currency formatting.
//!
//! The total is the base price plus a fixed surcharge per selected add-on.

use crate::config::settings::Pricing;

/// Optional extras a customer can select on the intake form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AddOns {
    /// Faster turnaround
    pub rush_order: bool,
    /// High-resolution output
    pub high_res: bool,
}

/// Computes the total price for the selected add-ons.
#[must_use]
pub fn calculate_total(pricing: &Pricing, add_ons: AddOns) -> f64 {
    let mut total = pricing.base_price;
    if add_ons.rush_order {
        total += pricing.rush_order_price;
    }
    if add_ons.high_res {
        total += pricing.high_res_price;
    }
    total
}

/// Formats an amount with a currency prefix, e.g. `"$3.00"`.
#[must_use]
pub fn format_price(amount: f64) -> String {
    format!("${amount:.2}")
}

/// Parses a currency-formatted string back into an amount.
///
/// Returns `None` for anything that is not a finite number after stripping `$`.
#[must_use]
pub fn parse_price(formatted: &str) -> Option<f64> {
    formatted
        .trim()
        .trim_start_matches('$')
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_base_only() {
        let pricing = Pricing::default();
        let total = calculate_total(&pricing, AddOns::default());
        assert_eq!(total, 1.0);
        assert_eq!(format_price(total), "$1.00");
    }

    #[test]
    fn test_price_is_monotonic_in_add_ons() {
        let pricing = Pricing::default();
        let base = calculate_total(&pricing, AddOns::default());
        let rush = calculate_total(
            &pricing,
            AddOns {
                rush_order: true,
                high_res: false,
            },
        );
        let all = calculate_total(
            &pricing,
            AddOns {
                rush_order: true,
                high_res: true,
            },
        );

        assert!(base <= rush);
        assert!(rush <= all);
        assert_eq!(rush - base, pricing.rush_order_price);
        assert_eq!(all - rush, pricing.high_res_price);
        assert_eq!(format_price(all), "$4.00");
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("$25.00"), Some(25.0));
        assert_eq!(parse_price(" 3.5 "), Some(3.5));
        assert_eq!(parse_price("$1,200.00"), Some(1200.0));
        assert_eq!(parse_price("free"), None);
        assert_eq!(parse_price("$NaN"), None);
    }
}
