use std::collections::HashSet;

use super::Identity;

/// Binary admin gate over a configured allow-list of subjects.
///
/// Matching is exact and case-sensitive. An empty allow-list means nobody
/// holds admin rights.
#[derive(Debug, Clone, Default)]
pub struct AdminPolicy {
    subjects: HashSet<String>,
}

impl AdminPolicy {
    pub fn new(subjects: impl IntoIterator<Item = String>) -> Self {
        Self {
            subjects: subjects.into_iter().collect(),
        }
    }

    /// True iff the identity is authenticated as an allow-listed subject.
    pub fn is_admin(&self, identity: &Identity) -> bool {
        match identity.subject() {
            Some(subject) => self.subjects.contains(subject),
            None => false,
        }
    }
}
