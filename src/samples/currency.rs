//! Currency conversion sample
//!
//! Supplies one scenario per currency; every test runs once for each.

use crate::models::{check, ClassDescriptor, Scenario, TestFailure, TestOutcome, Visibility};
use crate::registry::{ClassBuilder, MultipleScenarios, TestClass};

/// Exchange rate against the euro
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Currency {
    pub code: &'static str,
    pub per_euro: f64,
}

const CURRENCIES: &[Currency] = &[
    Currency { code: "EUR", per_euro: 1.0 },
    Currency { code: "USD", per_euro: 1.08 },
    Currency { code: "GBP", per_euro: 0.86 },
    Currency { code: "JPY", per_euro: 161.5 },
];

/// Every test runs once per supported currency
#[derive(Debug, Default)]
pub struct CurrencyConversion;

impl CurrencyConversion {
    fn currency(scenario: &Scenario) -> Result<Currency, TestFailure> {
        scenario
            .value::<Currency>()
            .copied()
            .ok_or_else(|| TestFailure::Failed(format!("{scenario} carries no currency")))
    }

    fn round_trips_through_euro(&mut self, scenario: &Scenario) -> TestOutcome {
        let currency = Self::currency(scenario)?;
        let amount = 250.0;
        let back = (amount / currency.per_euro) * currency.per_euro;
        check((back - amount).abs() < 1e-9, format!("{} lost precision", currency.code))
    }

    fn rate_is_positive(&mut self, scenario: &Scenario) -> TestOutcome {
        let currency = Self::currency(scenario)?;
        check(currency.per_euro > 0.0, format!("{} has no rate", currency.code))
    }
}

impl MultipleScenarios for CurrencyConversion {
    fn scenarios(&self) -> Vec<Scenario> {
        CURRENCIES
            .iter()
            .map(|currency| Scenario::new(currency.code, *currency))
            .collect()
    }
}

impl TestClass for CurrencyConversion {
    fn describe() -> ClassDescriptor {
        ClassBuilder::<CurrencyConversion>::new("samples::CurrencyConversion")
            .constructor(|| Ok(CurrencyConversion))
            .test(
                "round_trips_through_euro",
                Visibility::PackagePrivate,
                CurrencyConversion::round_trips_through_euro,
            )
            .test(
                "rate_is_positive",
                Visibility::PackagePrivate,
                CurrencyConversion::rate_is_positive,
            )
            .with_scenarios()
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::discover;
    use std::sync::Arc;

    #[test]
    fn test_one_unit_per_currency_and_method() {
        let units = discover(&Arc::new(CurrencyConversion::describe())).unwrap();
        assert_eq!(units.len(), CURRENCIES.len() * 2);
        assert!(units.iter().any(|u| u.scenario().label() == "JPY"));
    }
}
