use crate::node::{InspectableNode, WindowId};
use crate::services::FrameTranslator;

/// Where a clicked node lives relative to the top-level viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResolvedTarget {
    pub window: Option<WindowId>,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl ResolvedTarget {
    pub fn to_top_level(&self, client_x: f64, client_y: f64) -> (f64, f64) {
        (self.offset_x + client_x, self.offset_y + client_y)
    }
}

/// Resolves the top-level window and frame offset for `node`. An unknown
/// owner degrades to zero offsets and no window.
pub fn resolve_target(node: &dyn InspectableNode, frames: &dyn FrameTranslator) -> ResolvedTarget {
    match frames.translate_to_top_level(node) {
        Some(frame) => ResolvedTarget {
            window: Some(frame.window),
            offset_x: frame.offset_x,
            offset_y: frame.offset_y,
        },
        None => {
            log::debug!("no owner window for node {}, using zero offsets", node.key());
            ResolvedTarget::default()
        }
    }
}
