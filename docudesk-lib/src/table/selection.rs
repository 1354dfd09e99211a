//! Row selection by record id.

use std::collections::HashSet;
use std::hash::Hash;

/// Ordered set of selected row ids.
///
/// Ids rather than row positions are stored so that a selection survives
/// re-fetches. Insertion order is kept so the rows echoed to listeners come
/// out in the order the user picked them.
#[derive(Debug, Clone)]
pub struct Selection<Id> {
    selected: Vec<Id>,
    members: HashSet<Id>,
}

impl<Id> Default for Selection<Id> {
    fn default() -> Self {
        Self {
            selected: Vec::new(),
            members: HashSet::new(),
        }
    }
}

impl<Id: Clone + Eq + Hash> Selection<Id> {
    /// Create a new empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected ids in selection order.
    pub fn ids(&self) -> &[Id] {
        &self.selected
    }

    pub fn is_selected(&self, id: &Id) -> bool {
        self.members.contains(id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Toggles one id. Returns `true` if it is now selected.
    pub fn toggle(&mut self, id: &Id) -> bool {
        if self.members.remove(id) {
            self.selected.retain(|s| s != id);
            false
        } else {
            self.members.insert(id.clone());
            self.selected.push(id.clone());
            true
        }
    }

    /// Replaces the selection with `ids`.
    pub fn set(&mut self, ids: impl IntoIterator<Item = Id>) {
        self.clear();
        for id in ids {
            if self.members.insert(id.clone()) {
                self.selected.push(id);
            }
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.members.clear();
    }

    /// Drops ids for which `keep` returns `false`. Returns `true` if
    /// anything was removed.
    pub fn retain(&mut self, mut keep: impl FnMut(&Id) -> bool) -> bool {
        let before = self.selected.len();
        self.selected.retain(|id| keep(id));
        if self.selected.len() == before {
            return false;
        }
        self.members = self.selected.iter().cloned().collect();
        true
    }
}
