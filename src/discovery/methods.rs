//! Method discovery

use crate::models::{ClassDescriptor, MethodDecl};

/// Test entry points declared directly on `class`, in declaration order.
///
/// Methods of ancestors are never included, even when the ancestor is
/// abstract.
pub fn declared_test_methods(class: &ClassDescriptor) -> Vec<&MethodDecl> {
    class.methods.iter().filter(|m| m.is_test).collect()
}
