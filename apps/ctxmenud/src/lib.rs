//! Content-side context menu classification.
//!
//! A pointer-context event on a document node is turned into a
//! [`state::PopupState`] describing which menu entries apply, then handed
//! to the host through a [`emitter::MessageSink`]. The `ctxmenud` binary
//! serves this over a unix socket using the framing in [`wire`].

pub mod classifier;
pub mod config;
pub mod dom;
pub mod emitter;
pub mod error;
pub mod handler;
pub mod node;
pub mod privacy;
pub mod proto;
pub mod registry;
pub mod resolver;
pub mod selection;
pub mod server;
pub mod services;
pub mod state;
pub mod wire;

pub use classifier::{Classifier, PointerContext};
pub use error::ContentError;
pub use handler::{ContentEvent, ContextMenuHandler, PointerContextEvent};
pub use state::PopupState;
