//! Instance factory
//!
//! A test class must declare exactly one constructor, and it must take no
//! arguments. Every call builds a brand-new instance; nothing is cached, so no
//! state leaks between scenarios or methods.

use tracing::trace;

use crate::models::{ClassDescriptor, InstanceFn, TestInstance};

use super::DiscoveryError;

/// Verify constructor cardinality without instantiating
pub fn check_constructor(class: &ClassDescriptor) -> Result<(), DiscoveryError> {
    sole_constructor(class).map(|_| ())
}

/// Create a fresh instance of `class`
pub fn new_instance(class: &ClassDescriptor) -> Result<TestInstance, DiscoveryError> {
    let build = sole_constructor(class)?;
    trace!("Instantiating {}", class.name);

    build().map_err(|e| DiscoveryError::Instantiation {
        class: class.name.clone(),
        source: e.into(),
    })
}

fn sole_constructor(class: &ClassDescriptor) -> Result<&InstanceFn, DiscoveryError> {
    let declared = class.constructors.len();
    let zero_arg = class.constructors.iter().filter(|c| c.is_zero_arg()).count();

    match class.constructors.as_slice() {
        [only] if only.is_zero_arg() => {
            only.build
                .as_ref()
                .ok_or_else(|| DiscoveryError::AmbiguousOrMissingConstructor {
                    class: class.name.clone(),
                    declared,
                    zero_arg,
                })
        }
        _ => Err(DiscoveryError::AmbiguousOrMissingConstructor {
            class: class.name.clone(),
            declared,
            zero_arg,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ClassBuilder;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug, PartialEq)]
    struct Fixture {
        id: usize,
    }

    #[test]
    fn test_single_no_arg_constructor() {
        let class = ClassBuilder::<Fixture>::new("demo::Fixture")
            .constructor(|| Ok(Fixture { id: 7 }))
            .build();

        let instance = new_instance(&class).unwrap();
        assert_eq!(instance.downcast_ref::<Fixture>(), Some(&Fixture { id: 7 }));
    }

    #[test]
    fn test_every_call_is_fresh() {
        let counter = Arc::new(AtomicUsize::new(0));
        let seen = counter.clone();
        let class = ClassBuilder::<Fixture>::new("demo::Fixture")
            .constructor(move || {
                Ok(Fixture {
                    id: seen.fetch_add(1, Ordering::SeqCst),
                })
            })
            .build();

        let first = new_instance(&class).unwrap();
        let second = new_instance(&class).unwrap();
        assert_eq!(first.downcast_ref::<Fixture>().unwrap().id, 0);
        assert_eq!(second.downcast_ref::<Fixture>().unwrap().id, 1);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_two_no_arg_constructors() {
        let class = ClassBuilder::<Fixture>::new("demo::Twice")
            .constructor(|| Ok(Fixture { id: 1 }))
            .constructor(|| Ok(Fixture { id: 2 }))
            .build();

        match new_instance(&class) {
            Err(DiscoveryError::AmbiguousOrMissingConstructor {
                class,
                declared,
                zero_arg,
            }) => {
                assert_eq!(class, "demo::Twice");
                assert_eq!(declared, 2);
                assert_eq!(zero_arg, 2);
            }
            other => panic!("expected constructor error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_only_parameterized_constructors() {
        let class = ClassBuilder::<Fixture>::new("demo::Parameterized")
            .parameterized_constructor(&["usize"])
            .build();
        assert!(check_constructor(&class).is_err());
    }

    #[test]
    fn test_no_arg_next_to_parameterized_is_rejected() {
        let class = ClassBuilder::<Fixture>::new("demo::Mixed")
            .constructor(|| Ok(Fixture { id: 1 }))
            .parameterized_constructor(&["usize"])
            .build();
        assert!(check_constructor(&class).is_err());
    }

    #[test]
    fn test_abstract_class_has_no_constructor() {
        let class = ClassBuilder::abstract_base("demo::Base").build();
        assert!(matches!(
            new_instance(&class),
            Err(DiscoveryError::AmbiguousOrMissingConstructor { declared: 0, .. })
        ));
    }

    #[test]
    fn test_constructor_failure() {
        let class = ClassBuilder::<Fixture>::new("demo::Flaky")
            .constructor(|| anyhow::bail!("database unavailable"))
            .build();

        let err = new_instance(&class).map(|_| ()).unwrap_err();
        assert!(matches!(err, DiscoveryError::Instantiation { .. }));
        assert_eq!(
            err.to_string(),
            "failed to instantiate demo::Flaky: database unavailable"
        );
    }
}
