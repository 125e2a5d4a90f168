//! Document listeners
//!
//! Components that need to see events outside their own subtree (outside
//! clicks, Escape) register a document-level listener. Registration hands
//! back a guard; dropping the guard removes the listener, so a component
//! that forgets to clean up on close still cannot leak one past disconnect.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use eva_dom::{EventName, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ListenerEntry {
    pub id: u64,
    pub owner: NodeId,
    pub name: EventName,
}

#[derive(Debug, Default)]
pub(crate) struct ListenerTable {
    next_id: u64,
    entries: Vec<ListenerEntry>,
}

impl ListenerTable {
    pub fn add(&mut self, owner: NodeId, name: EventName) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(ListenerEntry { id, owner, name });
        id
    }

    pub fn remove(&mut self, id: u64) {
        self.entries.retain(|e| e.id != id);
    }

    pub fn remove_owner(&mut self, owner: NodeId) {
        self.entries.retain(|e| e.owner != owner);
    }

    pub fn contains(&self, id: u64) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Registered entries for `name`, in registration order
    pub fn matching(&self, name: EventName) -> Vec<ListenerEntry> {
        self.entries.iter().filter(|e| e.name == name).copied().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Live document-level listener; removed when dropped
#[must_use = "dropping a DocumentListener removes it immediately"]
#[derive(Debug)]
pub struct DocumentListener {
    id: u64,
    name: EventName,
    table: Weak<RefCell<ListenerTable>>,
}

impl DocumentListener {
    pub(crate) fn register(table: &Rc<RefCell<ListenerTable>>, owner: NodeId, name: EventName) -> Self {
        let id = table.borrow_mut().add(owner, name);
        Self {
            id,
            name,
            table: Rc::downgrade(table),
        }
    }

    pub fn name(&self) -> EventName {
        self.name
    }

    /// Remove the listener now
    pub fn dispose(self) {}
}

impl Drop for DocumentListener {
    fn drop(&mut self) {
        if let Some(table) = self.table.upgrade() {
            table.borrow_mut().remove(self.id);
        }
    }
}

/// Handle for a listener added with `Runtime::add_event_listener`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);
