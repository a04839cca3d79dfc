//! Symbol tables built by the parser and read by the encoder.

use std::collections::HashMap;

/// Label name -> zero-based instruction address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelTable {
    addrs: HashMap<String, usize>,
}

impl LabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `name` at `addr`. If the label already exists the table is left
    /// untouched and the earlier address is returned.
    pub fn declare(&mut self, name: String, addr: usize) -> Option<usize> {
        if let Some(&prev) = self.addrs.get(&name) {
            return Some(prev);
        }
        self.addrs.insert(name, addr);
        None
    }

    pub fn resolve(&self, name: &str) -> Option<usize> {
        self.addrs.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.addrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addrs.is_empty()
    }

    /// Labels ordered by address, then name.
    pub fn sorted(&self) -> Vec<(&str, usize)> {
        let mut v: Vec<(&str, usize)> = self.addrs.iter().map(|(k, &a)| (k.as_str(), a)).collect();
        v.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(b.0)));
        v
    }
}

/// Variable name -> storage slot, in first-seen order.
///
/// Slots are dense and start at 0, so the table length is also the size of
/// the data region in the binary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentTable {
    names: Vec<String>,
    slots: HashMap<String, usize>,
}

impl IdentTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the slot of `name`, allocating the next one if it is new.
    pub fn intern(&mut self, name: String) -> usize {
        if let Some(&slot) = self.slots.get(&name) {
            return slot;
        }
        let slot = self.names.len();
        self.names.push(name.clone());
        self.slots.insert(name, slot);
        slot
    }

    pub fn resolve(&self, name: &str) -> Option<usize> {
        self.slots.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// `(slot, name)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.names.iter().enumerate().map(|(i, n)| (i, n.as_str()))
    }
}
