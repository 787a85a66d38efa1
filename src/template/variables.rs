//! Variable sets: placeholder name to ordered value list.
//!
//! Names are discovered from the template first; `name:spec` assignments then
//! fill them. Several assignments to the same name accumulate in order, and
//! everything after the first `:` belongs to the value specification.

use super::expander::CommandTemplate;
use super::range::parse_range;
use crate::constants::cli::ASSIGNMENT_SEPARATOR;
use crate::error::Result;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Immutable mapping from placeholder name to its ordered values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableSet {
    values: HashMap<String, Vec<String>>,
}

impl VariableSet {
    /// Build the variable set for `template` from raw `name:spec` assignments.
    ///
    /// Every placeholder of the template gets an entry, empty when no
    /// assignment names it. Assignments for names the template does not use
    /// are ignored.
    pub fn from_assignments<S: AsRef<str>>(
        template: &CommandTemplate,
        assignments: &[S],
    ) -> Result<Self> {
        let mut set = Self::default();
        for name in template.placeholders() {
            set.values.insert(name.clone(), Vec::new());
        }

        for assignment in assignments.iter().map(AsRef::as_ref) {
            let Some((name, spec)) = assignment.split_once(ASSIGNMENT_SEPARATOR) else {
                warn!(assignment = %assignment, "Ignoring variable assignment without ':' separator");
                continue;
            };

            match set.values.get_mut(name) {
                Some(values) => {
                    let parsed = parse_range(spec)?;
                    debug!(variable = %name, count = parsed.len(), "Parsed variable values");
                    values.extend(parsed);
                }
                None => {
                    warn!(variable = %name, "Ignoring assignment for a variable not used by the template");
                }
            }
        }

        Ok(set)
    }

    /// Bind `name` to `values`, replacing any previous binding
    pub fn bind(&mut self, name: impl Into<String>, values: impl IntoIterator<Item = String>) {
        self.values.insert(name.into(), values.into_iter().collect());
    }

    /// Values bound to `name`; empty when unbound
    pub fn values(&self, name: &str) -> &[String] {
        self.values.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Names whose value list is empty, sorted
    pub fn unbound(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .values
            .iter()
            .filter(|(_, values)| values.is_empty())
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// Iterate over all bindings, sorted by name
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        let mut entries: Vec<_> = self
            .values
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
            .collect();
        entries.sort_unstable_by_key(|(name, _)| *name);
        entries.into_iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
