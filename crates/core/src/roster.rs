//! The roommate list: fixed at configuration time, order significant.

use std::collections::HashSet;

use crate::error::RosterError;

/// Ordered list of distinct roommate names. Index is the rotation identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    names: Vec<String>,
}

impl Roster {
    /// Build a roster, rejecting an empty list, blank names and duplicates.
    pub fn new<I, S>(names: I) -> Result<Self, RosterError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(RosterError::Empty);
        }

        let mut seen = HashSet::new();
        for (i, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(RosterError::BlankName(i));
            }
            if !seen.insert(name.as_str()) {
                return Err(RosterError::Duplicate(name.clone()));
            }
        }

        Ok(Self { names })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always `false`: a roster has at least one name.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Whose turn it is `offset` slots after `start`, wrapping around.
    pub fn rotate(&self, start: usize, offset: usize) -> &str {
        &self.names[(start + offset) % self.names.len()]
    }
}
