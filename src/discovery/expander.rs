//! Cross-product expansion
//!
//! Pairs every scenario with every declared test method. Scenario order comes
//! from a set and is unspecified; within one scenario, methods keep their
//! declaration order. Callers must not rely on any order across scenarios.

use crate::models::{ClassDescriptor, MethodDecl, Scenario};

use super::methods::declared_test_methods;
use super::scenarios::scenarios_of;
use super::DiscoveryError;

/// `scenarios(class) × declared_test_methods(class)`
pub fn expand(class: &ClassDescriptor) -> Result<Vec<(Scenario, &MethodDecl)>, DiscoveryError> {
    let scenarios = scenarios_of(class)?;
    let methods = declared_test_methods(class);

    let mut pairs = Vec::with_capacity(scenarios.len() * methods.len());
    for scenario in &scenarios {
        for &method in &methods {
            pairs.push((scenario.clone(), method));
        }
    }
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Visibility;
    use crate::registry::{ClassBuilder, MultipleScenarios};
    use std::collections::HashSet;

    struct Plain;

    struct Sizes(Vec<&'static str>);

    impl MultipleScenarios for Sizes {
        fn scenarios(&self) -> Vec<Scenario> {
            self.0.iter().map(|s| Scenario::new(*s, ())).collect()
        }
    }

    fn sizes(labels: Vec<&'static str>) -> ClassDescriptor {
        ClassBuilder::<Sizes>::new("demo::Sizes")
            .constructor(move || Ok(Sizes(labels.clone())))
            .test("fits", Visibility::PackagePrivate, |_, _| Ok(()))
            .test("stacks", Visibility::PackagePrivate, |_, _| Ok(()))
            .with_scenarios()
            .build()
    }

    #[test]
    fn test_plain_class_yields_one_pair_per_method() {
        let class = ClassBuilder::<Plain>::new("demo::Plain")
            .constructor(|| Ok(Plain))
            .test("one", Visibility::PackagePrivate, |_, _| Ok(()))
            .test("two", Visibility::PackagePrivate, |_, _| Ok(()))
            .test("three", Visibility::PackagePrivate, |_, _| Ok(()))
            .build();

        let pairs = expand(&class).unwrap();
        assert_eq!(pairs.len(), 3);
        assert!(pairs.iter().all(|(s, _)| s.is_default()));
        let names: Vec<_> = pairs.iter().map(|(_, m)| m.name.as_str()).collect();
        assert_eq!(names, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_full_cross_product() {
        let class = sizes(vec!["small", "medium", "large"]);
        let pairs = expand(&class).unwrap();
        assert_eq!(pairs.len(), 6);

        let unique: HashSet<(String, String)> = pairs
            .iter()
            .map(|(s, m)| (s.label().to_string(), m.name.clone()))
            .collect();
        assert_eq!(unique.len(), 6);
        for label in ["small", "medium", "large"] {
            for method in ["fits", "stacks"] {
                assert!(unique.contains(&(label.to_string(), method.to_string())));
            }
        }
    }

    #[test]
    fn test_methods_keep_declaration_order_within_a_scenario() {
        let class = sizes(vec!["small", "large"]);
        let pairs = expand(&class).unwrap();
        for chunk in pairs.chunks(2) {
            assert_eq!(chunk[0].0.label(), chunk[1].0.label());
            assert_eq!(chunk[0].1.name, "fits");
            assert_eq!(chunk[1].1.name, "stacks");
        }
    }

    #[test]
    fn test_zero_scenarios_yield_nothing() {
        let class = sizes(Vec::new());
        assert!(expand(&class).unwrap().is_empty());
    }

    #[test]
    fn test_scenarios_are_shared_across_methods() {
        let class = sizes(vec!["only"]);
        let pairs = expand(&class).unwrap();
        assert!(pairs[0].0.same_as(&pairs[1].0));
    }
}
