//! Startup validation of the declared dependency graph.
//!
//! Walks the parameter keys that constructor bindings declare, without
//! building anything, and reports:
//! - declared parameters with no binding
//! - cycles between bindings
//!
//! Lifecycle combinations are not checked: a singleton may depend on a
//! transient and simply keeps the instance it was built with.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use tracing::debug;

use crate::error::{AmbarError, CircularDependencyError, NotRegisteredError};
use crate::key::DependencyKey;

/// Depth-first walk over `key -> declared parameters`.
///
/// `visiting` holds the current path for cycle detection, `validated`
/// caches keys whose subgraph is already known to be sound.
pub(crate) struct GraphValidator {
    graph: HashMap<DependencyKey, Rc<[DependencyKey]>>,
    visiting: HashSet<DependencyKey>,
    validated: HashSet<DependencyKey>,
    path: Vec<DependencyKey>,
}

impl GraphValidator {
    pub fn new(graph: HashMap<DependencyKey, Rc<[DependencyKey]>>) -> Self {
        Self {
            graph,
            visiting: HashSet::new(),
            validated: HashSet::new(),
            path: Vec::new(),
        }
    }

    /// Validates every binding, stopping at the first problem.
    pub fn validate(mut self) -> Result<(), AmbarError> {
        let mut keys: Vec<DependencyKey> = self.graph.keys().copied().collect();
        // Stable order so the reported problem does not depend on hashing.
        keys.sort_by_key(|key| key.type_name());

        debug!(bindings = keys.len(), "Validating dependency graph");

        for key in keys {
            self.visit(key)?;
        }

        debug!("Dependency graph is valid");
        Ok(())
    }

    fn visit(&mut self, key: DependencyKey) -> Result<(), AmbarError> {
        if self.validated.contains(&key) {
            return Ok(());
        }

        if self.visiting.contains(&key) {
            let start = self.path.iter().position(|k| *k == key).unwrap_or(0);
            let mut chain = self.path[start..].to_vec();
            chain.push(key);

            debug!(cycle = ?chain, "Circular dependency in declared graph");
            return Err(AmbarError::CircularDependency(CircularDependencyError { chain }));
        }

        let Some(parameters) = self.graph.get(&key).cloned() else {
            return Err(AmbarError::NotRegistered(NotRegisteredError::new(
                key,
                self.path.last().copied(),
                self.graph.keys(),
            )));
        };

        self.visiting.insert(key);
        self.path.push(key);

        for parameter in parameters.iter() {
            self.visit(*parameter)?;
        }

        self.path.pop();
        self.visiting.remove(&key);
        self.validated.insert(key);
        Ok(())
    }
}
