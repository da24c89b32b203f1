//! Scenario values
//!
//! A scenario is an opaque, class-supplied input variant. Every test method of
//! a scenario-bearing class runs once per scenario.

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

/// Label carried by the shared default scenario
pub const DEFAULT_SCENARIO_LABEL: &str = "<default>";

static DEFAULT_SCENARIO: OnceLock<Scenario> = OnceLock::new();

struct ScenarioInner {
    label: String,
    value: Box<dyn Any + Send + Sync>,
}

/// Shared handle to a scenario value.
///
/// Cloning is cheap and never copies the value: every execution unit paired
/// with a scenario points at the same allocation. Equality and hashing follow
/// that allocation, not the label: two scenarios built separately stay
/// distinct even when their labels match, while clones of one collapse.
#[derive(Clone)]
pub struct Scenario(Arc<ScenarioInner>);

impl Scenario {
    /// Create a scenario from a label and an arbitrary value
    pub fn new<V>(label: impl Into<String>, value: V) -> Self
    where
        V: Any + Send + Sync,
    {
        Self(Arc::new(ScenarioInner {
            label: label.into(),
            value: Box::new(value),
        }))
    }

    /// The process-wide sentinel used by classes without scenarios
    pub fn default_scenario() -> Scenario {
        DEFAULT_SCENARIO
            .get_or_init(|| Scenario::new(DEFAULT_SCENARIO_LABEL, ()))
            .clone()
    }

    pub fn label(&self) -> &str {
        &self.0.label
    }

    /// Borrow the value as `V`, if that is what the scenario holds
    pub fn value<V: Any>(&self) -> Option<&V> {
        self.0.value.downcast_ref::<V>()
    }

    /// True only for the shared sentinel itself, not for look-alikes
    pub fn is_default(&self) -> bool {
        self.same_as(&Self::default_scenario())
    }

    /// Identity comparison (same allocation)
    pub fn same_as(&self, other: &Scenario) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Scenario {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl Eq for Scenario {}

impl Hash for Scenario {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.0), state);
    }
}

impl fmt::Debug for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Scenario").field(&self.label()).finish()
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_scenario_is_shared() {
        let a = Scenario::default_scenario();
        let b = Scenario::default_scenario();
        assert!(a.same_as(&b));
        assert!(a.is_default());
        assert_eq!(a.label(), DEFAULT_SCENARIO_LABEL);
    }

    #[test]
    fn test_look_alike_is_not_default() {
        let fake = Scenario::new(DEFAULT_SCENARIO_LABEL, ());
        assert!(!fake.is_default());
    }

    #[test]
    fn test_value_downcast() {
        let scenario = Scenario::new("eur", 1.08_f64);
        assert_eq!(scenario.value::<f64>(), Some(&1.08));
        assert!(scenario.value::<String>().is_none());
    }

    #[test]
    fn test_clone_shares_value() {
        let scenario = Scenario::new("large", vec![1, 2, 3]);
        let copy = scenario.clone();
        assert!(scenario.same_as(&copy));
    }

    #[test]
    fn test_set_keeps_distinct_values_with_shared_label() {
        let a = Scenario::new("a", 1);
        let set: HashSet<Scenario> = vec![
            a.clone(),
            a,
            Scenario::new("a", 2),
            Scenario::new("b", 3),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.len(), 3);
    }
}
