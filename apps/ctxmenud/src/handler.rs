//! Content-side context menu lifecycle.
//!
//! A [`ContextMenuHandler`] is *idle* until a pointer-context event is
//! classified, after which it remembers the popup node, the tracked target
//! and the emitted state. A page hide drops all of it. Events are handled to
//! completion one at a time; each one replaces whatever the previous left.

use crate::classifier::{Classifier, PointerContext};
use crate::config::HandlerConfig;
use crate::emitter::{MessageSink, CONTEXT_MENU_MESSAGE};
use crate::error::ContentError;
use crate::node::{InspectableNode, NodeKey};
use crate::registry::ExtensionRegistry;
use crate::services::Environment;
use crate::state::PopupState;

#[derive(Debug, Clone)]
pub struct PointerContextEvent<N> {
    pub target: Option<N>,
    pub pointer: PointerContext,
    pub default_prevented: bool,
}

#[derive(Debug, Clone)]
pub enum ContentEvent<N> {
    ContextMenu(PointerContextEvent<N>),
    PageHide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Classified,
}

pub struct ContextMenuHandler {
    config: HandlerConfig,
    registry: ExtensionRegistry,
    popup_node: Option<NodeKey>,
    target: Option<NodeKey>,
    previous_state: Option<PopupState>,
}

impl ContextMenuHandler {
    pub fn new(config: HandlerConfig) -> Self {
        Self {
            config,
            registry: ExtensionRegistry::new(),
            popup_node: None,
            target: None,
            previous_state: None,
        }
    }

    /// Lets add-ons contribute a menu type. When `handler` returns true,
    /// `name` is appended to the state's types; it may also edit the state.
    pub fn register_type<F>(&mut self, name: impl Into<String>, handler: F)
    where
        F: Fn(&mut PopupState, &dyn InspectableNode) -> bool + Send + Sync + 'static,
    {
        self.registry.register(name, handler);
    }

    /// Removes all handlers registered for `name`.
    pub fn unregister_type(&mut self, name: &str) -> usize {
        self.registry.unregister(name)
    }

    pub fn registry(&self) -> &ExtensionRegistry {
        &self.registry
    }

    pub fn phase(&self) -> Phase {
        if self.previous_state.is_some() {
            Phase::Classified
        } else {
            Phase::Idle
        }
    }

    pub fn popup_node(&self) -> Option<NodeKey> {
        self.popup_node
    }

    pub fn target(&self) -> Option<NodeKey> {
        self.target
    }

    pub fn previous_state(&self) -> Option<&PopupState> {
        self.previous_state.as_ref()
    }

    pub fn handle_event<N>(
        &mut self,
        event: ContentEvent<N>,
        env: &Environment<'_>,
        sink: &mut dyn MessageSink,
    ) -> Result<(), ContentError>
    where
        N: InspectableNode + Clone,
    {
        match event {
            ContentEvent::ContextMenu(event) => self.on_context_menu(event, env, sink),
            ContentEvent::PageHide => {
                self.reset();
                Ok(())
            }
        }
    }

    pub fn reset(&mut self) {
        self.popup_node = None;
        self.target = None;
        self.previous_state = None;
    }

    /// Classifies the event target and emits the result. A link that cannot
    /// be resolved aborts under the default policy: the error is returned
    /// and nothing is sent.
    pub fn on_context_menu<N>(
        &mut self,
        event: PointerContextEvent<N>,
        env: &Environment<'_>,
        sink: &mut dyn MessageSink,
    ) -> Result<(), ContentError>
    where
        N: InspectableNode + Clone,
    {
        if event.default_prevented {
            log::debug!("context menu event already handled by content");
            return Ok(());
        }
        let Some(popup) = event.target else {
            return Ok(());
        };

        self.popup_node = Some(popup.key());

        let classifier = Classifier::new(*env, &self.registry, self.config.link_failure);
        let classification = classifier.classify(&popup, &event.pointer)?;
        self.target = classification.target;

        log::debug!(
            "node {} classified as {:?}",
            popup.key(),
            classification.state.types
        );
        let state = self.previous_state.insert(classification.state);
        sink.send_async_message(CONTEXT_MENU_MESSAGE, state);
        Ok(())
    }
}
