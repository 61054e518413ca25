//! Third-party menu types, invoked after the core walk.

use crate::node::InspectableNode;
use crate::state::PopupState;

/// Decides whether its type applies; may also write into the state.
pub type TypeHandler = Box<dyn Fn(&mut PopupState, &dyn InspectableNode) -> bool + Send + Sync>;

struct TypeEntry {
    name: String,
    handler: TypeHandler,
}

#[derive(Default)]
pub struct ExtensionRegistry {
    entries: Vec<TypeEntry>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a handler. Names are not deduplicated.
    pub fn register<F>(&mut self, name: impl Into<String>, handler: F)
    where
        F: Fn(&mut PopupState, &dyn InspectableNode) -> bool + Send + Sync + 'static,
    {
        let name = name.into();
        log::debug!("registering context menu type {name}");
        self.entries.push(TypeEntry {
            name,
            handler: Box::new(handler),
        });
    }

    /// Removes every handler registered under `name`.
    pub fn unregister(&mut self, name: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.name != name);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    /// Runs every handler in registration order against the clicked node.
    pub fn apply(&self, state: &mut PopupState, popup_node: &dyn InspectableNode) {
        for entry in &self.entries {
            if (entry.handler)(state, popup_node) {
                state.push_type(entry.name.clone());
            }
        }
    }
}
