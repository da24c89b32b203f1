//! Suite membership resolution
//!
//! Walks ancestry chains up to their root and expands nested declarations
//! found anywhere in a member's hierarchy.

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::discovery::DiscoveryError;
use crate::models::ClassDescriptor;
use crate::registry::Catalog;

use super::Suite;

/// `class` followed by its ancestors, ending at the root
pub fn ancestry<'a>(
    catalog: &'a Catalog,
    class: &'a Arc<ClassDescriptor>,
) -> Result<Vec<&'a Arc<ClassDescriptor>>, DiscoveryError> {
    let mut chain = vec![class];
    let mut visited = HashSet::from([class.name.as_str()]);
    let mut current = class;

    while let Some(parent) = &current.parent {
        if !visited.insert(parent.as_str()) {
            return Err(DiscoveryError::AncestryCycle {
                class: class.name.clone(),
                repeated: parent.clone(),
            });
        }
        current = catalog.require(parent)?;
        chain.push(current);
    }

    Ok(chain)
}

/// Suites `class` belongs to: its own declarations, or else those of the
/// nearest ancestor that declares any
pub fn effective_suites<'a>(
    catalog: &'a Catalog,
    class: &'a Arc<ClassDescriptor>,
) -> Result<Vec<&'a str>, DiscoveryError> {
    for ancestor in ancestry(catalog, class)? {
        let declared = catalog.suites_declared_by(&ancestor.name);
        if !declared.is_empty() {
            return Ok(declared);
        }
    }
    Ok(Vec::new())
}

/// Every concrete class belonging to `suite`.
///
/// A class whose hierarchy cannot be walked (unregistered parent or nested
/// class, ancestry cycle) is logged and left out; it never breaks the suite
/// for its siblings.
pub fn members_of(catalog: &Catalog, suite: &str) -> Result<Suite, DiscoveryError> {
    let declared = catalog
        .declared_members(suite)
        .ok_or_else(|| DiscoveryError::UnknownSuite(suite.to_string()))?;
    for name in declared {
        catalog.require(name)?;
    }

    let mut resolved = Suite::new(suite);
    let mut expanded = HashSet::new();

    for class in catalog.classes() {
        match effective_suites(catalog, class) {
            Ok(suites) if suites.contains(&suite) => {}
            Ok(_) => continue,
            Err(e) => {
                warn!("Leaving {} out of {}: {}", class.name, suite, e);
                continue;
            }
        }
        if !class.is_abstract() {
            resolved.insert(class.name.clone());
        }
        if let Err(e) = add_nested(catalog, class, Some(suite), &mut resolved, &mut expanded) {
            warn!("Nested classes of {} left out of {}: {}", class.name, suite, e);
        }
    }

    debug!("Suite {} resolved to {} member(s)", suite, resolved.len());
    Ok(resolved)
}

/// `class` itself plus the concrete classes nested in its hierarchy
pub fn closure_of(catalog: &Catalog, class: &str) -> Result<Suite, DiscoveryError> {
    let root = catalog.require(class)?;
    let mut resolved = Suite::new(class);

    if !root.is_abstract() {
        resolved.insert(root.name.clone());
    }
    add_nested(catalog, root, None, &mut resolved, &mut HashSet::new())?;

    Ok(resolved)
}

/// Add the nested declarations of every class in `class`'s hierarchy, and
/// the ones nested inside those, recursively
fn add_nested(
    catalog: &Catalog,
    class: &Arc<ClassDescriptor>,
    suite: Option<&str>,
    resolved: &mut Suite,
    expanded: &mut HashSet<String>,
) -> Result<(), DiscoveryError> {
    for holder in ancestry(catalog, class)? {
        if !expanded.insert(holder.name.clone()) {
            continue;
        }

        for name in &holder.nested {
            let nested = catalog.require(name)?;
            if let Some(suite) = suite {
                let own = catalog.suites_declared_by(&nested.name);
                if !own.is_empty() && !own.contains(&suite) {
                    debug!("{} opts out of {} via its own membership", nested.name, suite);
                    continue;
                }
            }
            if !nested.is_abstract() {
                resolved.insert(nested.name.clone());
            }
            add_nested(catalog, nested, suite, resolved, expanded)?;
        }
    }
    Ok(())
}
