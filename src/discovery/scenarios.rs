//! Scenario provider resolution

use std::collections::HashSet;
use tracing::{debug, warn};

use crate::models::{ClassDescriptor, Scenario};

use super::{factory, DiscoveryError};

/// Scenarios to run `class` under.
///
/// Scenario classes are instantiated once and asked for their scenarios; an
/// empty answer is valid and means nothing runs. Every other class gets a set
/// holding only the shared default scenario.
pub fn scenarios_of(class: &ClassDescriptor) -> Result<HashSet<Scenario>, DiscoveryError> {
    let Some(supplier) = &class.scenarios else {
        return Ok(HashSet::from([Scenario::default_scenario()]));
    };

    let instance = factory::new_instance(class).map_err(|e| DiscoveryError::ScenarioHarvest {
        class: class.name.clone(),
        source: Box::new(e),
    })?;

    let scenarios: HashSet<Scenario> = supplier(&*instance).into_iter().collect();

    let mut labels = HashSet::new();
    for scenario in &scenarios {
        if !labels.insert(scenario.label()) {
            warn!(
                "{} supplies several scenarios labelled {:?}; their units share an id",
                class.name,
                scenario.label()
            );
        }
    }

    debug!("{} supplies {} scenario(s)", class.name, scenarios.len());
    Ok(scenarios)
}
