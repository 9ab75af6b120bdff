//! Thread index over a set of questions
//!
//! The [`ThreadIndex`] is derived data. It knows nothing about the filesystem
//! and is rebuilt from the authoritative question set whenever that set
//! changes.

use std::collections::BTreeMap;

use crate::domain::{Question, QuestionId};

/// Mapping from thread root to the ordered members of that thread.
///
/// The root comes first in its own member list, followed by its replies in
/// the order they were asked.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ThreadIndex {
    threads: BTreeMap<QuestionId, Vec<QuestionId>>,
}

impl ThreadIndex {
    /// Groups questions by the thread they belong to.
    ///
    /// Questions must be supplied in ascending id order, which is the order
    /// replies were asked in. A reply whose parent is missing still gets a
    /// thread entry keyed by that parent.
    #[must_use]
    pub fn build<'a>(questions: impl IntoIterator<Item = &'a Question>) -> Self {
        let mut threads: BTreeMap<QuestionId, Vec<QuestionId>> = BTreeMap::new();
        for question in questions {
            threads
                .entry(question.thread())
                .or_default()
                .push(question.id());
        }

        for (root, members) in &mut threads {
            if let Some(position) = members.iter().position(|id| id == root) {
                members[..=position].rotate_right(1);
            }
        }

        Self { threads }
    }

    /// Whether `id` identifies a thread.
    #[must_use]
    pub fn contains(&self, id: QuestionId) -> bool {
        self.threads.contains_key(&id)
    }

    /// The ordered members of a thread, root first.
    #[must_use]
    pub fn members(&self, root: QuestionId) -> Option<&[QuestionId]> {
        self.threads.get(&root).map(Vec::as_slice)
    }

    /// Iterates over threads in ascending root order.
    pub fn iter(&self) -> impl Iterator<Item = (QuestionId, &[QuestionId])> {
        self.threads
            .iter()
            .map(|(root, members)| (*root, members.as_slice()))
    }

    /// The number of threads.
    #[must_use]
    pub fn len(&self) -> usize {
        self.threads.len()
    }

    /// Whether there are no threads.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }
}
