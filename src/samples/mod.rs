//! Built-in sample classes
//!
//! Small, self-contained classes used by the binary and the tests: a plain
//! class, a multi-scenario class, an assumption that never holds, and a suite
//! declared on an abstract parent.

mod assume;
mod calculator;
mod currency;
mod suite;

pub use assume::AssumeThatExample;
pub use calculator::Calculator;
pub use currency::{Currency, CurrencyConversion};
pub use suite::{InnerSuiteMember, SuiteMember, SuiteParent, EXAMPLE_SUITE};

use crate::registry::{Catalog, RegistryError};

/// Catalog holding every sample class
pub fn catalog() -> Result<Catalog, RegistryError> {
    let mut catalog = Catalog::new();
    catalog.register::<Calculator>()?;
    catalog.register::<CurrencyConversion>()?;
    catalog.register::<AssumeThatExample>()?;
    catalog.add(SuiteParent::describe())?;
    catalog.register::<SuiteMember>()?;
    catalog.register::<InnerSuiteMember>()?;
    Ok(catalog)
}
