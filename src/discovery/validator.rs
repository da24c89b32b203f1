//! Test method validation and wrapping
//!
//! Test methods must be snake_case and declared package-private. Both rules
//! are checked on every method and all violations are reported together.

use std::any::Any;
use std::fmt;

use crate::models::{ClassDescriptor, InvokeFn, MethodDecl, Scenario, TestOutcome, Visibility};

use super::{ValidationError, Violation};

/// A validated test method, callable regardless of its declared visibility
#[derive(Clone)]
pub struct WrappedMethod {
    class: String,
    name: String,
    invoke: InvokeFn,
}

impl WrappedMethod {
    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn invoke(&self, instance: &mut dyn Any, scenario: &Scenario) -> TestOutcome {
        (self.invoke)(instance, scenario)
    }
}

impl fmt::Debug for WrappedMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WrappedMethod({}::{})", self.class, self.name)
    }
}

/// Validate `method` of `class` and wrap it for invocation
pub fn wrap(class: &ClassDescriptor, method: &MethodDecl) -> Result<WrappedMethod, ValidationError> {
    let mut violations = Vec::new();

    if !is_snake_case(&method.name) {
        violations.push(Violation::NotSnakeCase);
    }
    if method.visibility != Visibility::PackagePrivate {
        violations.push(Violation::NotPackagePrivate(method.visibility));
    }

    if !violations.is_empty() {
        return Err(ValidationError::InvalidTestMethod {
            class: class.name.clone(),
            method: method.name.clone(),
            violations,
        });
    }

    Ok(WrappedMethod {
        class: class.name.clone(),
        name: method.name.clone(),
        invoke: method.invoke.clone(),
    })
}

/// Lowercase ASCII segments joined by single underscores, starting with a letter
pub fn is_snake_case(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_lowercase())
        && name.split('_').all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TestFailure;
    use crate::registry::ClassBuilder;

    struct Probe {
        touched: bool,
    }

    fn class_with(name: &str, visibility: Visibility) -> ClassDescriptor {
        ClassBuilder::<Probe>::new("demo::Probe")
            .constructor(|| Ok(Probe { touched: false }))
            .test(name, visibility, |probe, _| {
                probe.touched = true;
                Ok(())
            })
            .build()
    }

    #[test]
    fn test_snake_case_rules() {
        for good in ["a", "adds_numbers", "when_we_fare_the_galaxies", "v2_api", "x1"] {
            assert!(is_snake_case(good), "{good} should be accepted");
        }
        for bad in [
            "",
            "doSomething",
            "Adds",
            "_leading",
            "trailing_",
            "double__underscore",
            "2fast",
            "kebab-case",
            "ünicode",
        ] {
            assert!(!is_snake_case(bad), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_camel_case_method_is_rejected_by_name() {
        let class = class_with("doSomething", Visibility::PackagePrivate);
        let err = wrap(&class, &class.methods[0]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidTestMethod {
                class: "demo::Probe".to_string(),
                method: "doSomething".to_string(),
                violations: vec![Violation::NotSnakeCase],
            }
        );
        assert!(err.to_string().contains("doSomething"));
    }

    #[test]
    fn test_public_method_is_rejected() {
        let class = class_with("runs_publicly", Visibility::Public);
        let err = wrap(&class, &class.methods[0]).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidTestMethod { ref violations, .. }
                if violations == &[Violation::NotPackagePrivate(Visibility::Public)]
        ));
    }

    #[test]
    fn test_private_and_protected_are_rejected() {
        for visibility in [Visibility::Private, Visibility::Protected] {
            let class = class_with("hidden", visibility);
            assert!(wrap(&class, &class.methods[0]).is_err());
        }
    }

    #[test]
    fn test_both_checks_always_run() {
        let class = class_with("doSomething", Visibility::Private);
        let ValidationError::InvalidTestMethod { violations, .. } =
            wrap(&class, &class.methods[0]).unwrap_err();
        assert_eq!(
            violations,
            vec![
                Violation::NotSnakeCase,
                Violation::NotPackagePrivate(Visibility::Private)
            ]
        );
    }

    #[test]
    fn test_wrapped_method_is_invocable() {
        let class = class_with("touches_probe", Visibility::PackagePrivate);
        let wrapped = wrap(&class, &class.methods[0]).unwrap();
        assert_eq!(wrapped.name(), "touches_probe");
        assert_eq!(wrapped.class(), "demo::Probe");

        let mut probe = Probe { touched: false };
        wrapped
            .invoke(&mut probe, &Scenario::default_scenario())
            .unwrap();
        assert!(probe.touched);
    }

    #[test]
    fn test_wrong_instance_type_fails_the_call() {
        let class = class_with("touches_probe", Visibility::PackagePrivate);
        let wrapped = wrap(&class, &class.methods[0]).unwrap();
        let result = wrapped.invoke(&mut 0_u32, &Scenario::default_scenario());
        assert!(matches!(result, Err(TestFailure::Failed(_))));
    }
}
