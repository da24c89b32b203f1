//! Discovery pipeline
//!
//! Turns one registered class into the flat list of execution units the
//! harness runs:
//!
//! 1. constructor check ([`factory`])
//! 2. scenario resolution ([`scenarios`])
//! 3. method discovery ([`methods`])
//! 4. cross-product expansion ([`expander`])
//! 5. validation and wrapping ([`validator`])
//!
//! Any failure aborts the whole class; no partial unit list is ever returned.
//! A class with zero scenarios quietly yields zero units.

mod error;
pub mod expander;
pub mod factory;
pub mod methods;
pub mod scenarios;
pub mod validator;

pub use error::{ClassError, DiscoveryError, ValidationError, Violation};
pub use validator::{is_snake_case, WrappedMethod};

use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::models::{ClassDescriptor, Scenario, TestInstance};
use crate::registry::Catalog;

/// One (method, scenario) pairing of a single class, run exactly once
#[derive(Clone)]
pub struct ExecutionUnit {
    class: Arc<ClassDescriptor>,
    method: WrappedMethod,
    scenario: Scenario,
}

impl ExecutionUnit {
    pub fn class(&self) -> &Arc<ClassDescriptor> {
        &self.class
    }

    pub fn method(&self) -> &WrappedMethod {
        &self.method
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    /// Fresh instance of the unit's class, never shared with another unit
    pub fn instantiate(&self) -> Result<TestInstance, DiscoveryError> {
        factory::new_instance(&self.class)
    }

    /// `Class::method[scenario]`
    pub fn id(&self) -> String {
        format!(
            "{}::{}[{}]",
            self.class.name,
            self.method.name(),
            self.scenario.label()
        )
    }
}

impl fmt::Debug for ExecutionUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExecutionUnit({})", self.id())
    }
}

/// Discover every execution unit of `class`
pub fn discover(class: &Arc<ClassDescriptor>) -> Result<Vec<ExecutionUnit>, ClassError> {
    factory::check_constructor(class)?;

    let units = expander::expand(class)?
        .into_iter()
        .map(|(scenario, method)| -> Result<ExecutionUnit, ValidationError> {
            Ok(ExecutionUnit {
                class: Arc::clone(class),
                method: validator::wrap(class, method)?,
                scenario,
            })
        })
        .collect::<Result<Vec<_>, ValidationError>>()?;

    debug!("Discovered {} unit(s) in {}", units.len(), class.name);
    Ok(units)
}

/// Discover units for each named class; one class failing leaves the others
/// untouched
pub fn discover_all<S: AsRef<str>>(
    catalog: &Catalog,
    classes: &[S],
) -> Vec<(String, Result<Vec<ExecutionUnit>, ClassError>)> {
    classes
        .iter()
        .map(|name| {
            let name = name.as_ref();
            let units = catalog
                .require(name)
                .map_err(ClassError::from)
                .and_then(discover);
            if let Err(e) = &units {
                warn!("Skipping {}: {}", name, e);
            }
            (name.to_string(), units)
        })
        .collect()
}
