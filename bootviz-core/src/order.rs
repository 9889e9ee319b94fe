use serde::{Deserialize, Serialize};

use crate::{id::BootId, parse::BootEntry};

/// A pending boot order: an ordered list of identifiers, position 0 tried
/// first.
///
/// This is a plain in-memory model, decoupled from any presentation widget.
/// The usual lifecycle is [`BootOrder::from_entries`] on a fresh snapshot,
/// some move/insert/remove calls, then a commit of the whole list through
/// [`BootManager::apply`](crate::BootManager::apply). Nothing here talks to
/// the firmware, and the core never retains an order between calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootOrder(Vec<BootId>);

impl BootOrder {
    pub fn new() -> Self {
        BootOrder(Vec::new())
    }

    /// Builds an order from an entry snapshot, keeping the entry order.
    pub fn from_entries(entries: &[BootEntry]) -> Self {
        BootOrder(entries.iter().map(|entry| entry.id).collect())
    }

    pub fn ids(&self) -> &[BootId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Position of the first occurrence of `id`, if any.
    pub fn position(&self, id: BootId) -> Option<usize> {
        self.0.iter().position(|&x| x == id)
    }

    pub fn push(&mut self, id: BootId) {
        self.0.push(id);
    }

    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, id: BootId) {
        self.0.insert(index, id);
    }

    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn remove(&mut self, index: usize) -> BootId {
        self.0.remove(index)
    }

    /// Swaps the entry at `index` with its predecessor. Returns false when
    /// the entry is already first or the index is out of range.
    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.0.len() {
            return false;
        }
        self.0.swap(index, index - 1);
        true
    }

    /// Swaps the entry at `index` with its successor. Returns false when the
    /// entry is already last or the index is out of range.
    pub fn move_down(&mut self, index: usize) -> bool {
        if index + 1 >= self.0.len() {
            return false;
        }
        self.0.swap(index, index + 1);
        true
    }

    /// The comma-joined uppercase argument `efibootmgr -o` expects.
    pub fn to_arg(&self) -> String {
        self.0
            .iter()
            .map(BootId::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl FromIterator<BootId> for BootOrder {
    fn from_iter<T: IntoIterator<Item = BootId>>(iter: T) -> Self {
        BootOrder(iter.into_iter().collect())
    }
}
