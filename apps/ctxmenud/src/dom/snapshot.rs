use super::{Document, Element, NodeData, TOP_WINDOW};
use crate::error::ContentError;
use crate::proto as pb;
use crate::services::ImageProperties;
use std::collections::HashMap;

impl Document {
    /// Builds a document from its wire snapshot. Windows and nodes must be
    /// listed parents first.
    pub fn from_snapshot(snapshot: &pb::DocumentSnapshot) -> Result<Self, ContentError> {
        let mut doc = Document::empty();

        if snapshot.windows.is_empty() {
            doc.insert_window(TOP_WINDOW, None, 0.0, 0.0, non_empty(&snapshot.url));
        }
        for window in &snapshot.windows {
            if window.id == 0 {
                return Err(ContentError::invalid_snapshot("window id must be non-zero"));
            }
            if doc.windows.contains_key(&window.id) {
                return Err(ContentError::invalid_snapshot(format!(
                    "duplicate window {}",
                    window.id
                )));
            }
            let parent = match window.parent_id {
                0 => None,
                id if doc.windows.contains_key(&id) => Some(id),
                id => {
                    return Err(ContentError::invalid_snapshot(format!(
                        "window {} references unknown parent {id}",
                        window.id
                    )))
                }
            };
            let url = match (non_empty(&window.url), parent) {
                (None, None) => non_empty(&snapshot.url),
                (url, _) => url,
            };
            doc.insert_window(window.id, parent, window.offset_x, window.offset_y, url);
        }

        for node in &snapshot.nodes {
            load_node(&mut doc, node)?;
        }

        for selection in &snapshot.selections {
            doc.selections.insert(selection.window_id, selection.text.clone());
        }

        if snapshot.image_cache_unavailable {
            doc.image_cache = None;
        } else {
            let cache: HashMap<String, ImageProperties> = snapshot
                .image_cache
                .iter()
                .map(|entry| {
                    (
                        entry.uri.clone(),
                        ImageProperties {
                            content_type: entry.content_type.clone(),
                            content_disposition: entry.content_disposition.clone(),
                        },
                    )
                })
                .collect();
            doc.image_cache = Some(cache);
        }

        doc.clipboard_flavors = snapshot.clipboard_flavors.clone();
        doc.cookies = snapshot.cookies.clone();

        log::debug!(
            "loaded snapshot of {} with {} nodes in {} windows",
            snapshot.url,
            doc.nodes.len(),
            doc.windows.len()
        );
        Ok(doc)
    }
}

fn load_node(doc: &mut Document, node: &pb::NodeSnapshot) -> Result<(), ContentError> {
    if node.id == 0 {
        return Err(ContentError::invalid_snapshot("node id must be non-zero"));
    }
    if doc.index.contains_key(&node.id) {
        return Err(ContentError::invalid_snapshot(format!("duplicate node {}", node.id)));
    }

    let parent = match node.parent_id {
        0 => None,
        id => match doc.index.get(&id) {
            Some(&index) => Some(index),
            None => {
                return Err(ContentError::invalid_snapshot(format!(
                    "node {} references unknown parent {id}",
                    node.id
                )))
            }
        },
    };

    let window = match (node.window_id, parent) {
        (0, Some(index)) => doc.nodes[index].window,
        (0, None) => TOP_WINDOW,
        (id, _) => id,
    };
    if !doc.windows.contains_key(&window) {
        return Err(ContentError::invalid_snapshot(format!(
            "node {} references unknown window {window}",
            node.id
        )));
    }

    let kind = pb::NodeKind::try_from(node.kind).unwrap_or(pb::NodeKind::Unspecified);
    let data = match kind {
        pb::NodeKind::Text => NodeData::Text(node.text.clone()),
        pb::NodeKind::Element => {
            if node.tag.trim().is_empty() {
                return Err(ContentError::invalid_snapshot(format!(
                    "element {} has no tag",
                    node.id
                )));
            }
            let attributes: Vec<(&str, &str)> = node
                .attributes
                .iter()
                .map(|attr| (attr.name.as_str(), attr.value.as_str()))
                .collect();
            let mut element = Element::new(node.tag.trim(), &attributes);
            element.value = node.value.clone();
            element.selection = (node.selection_start as usize, node.selection_end as usize);
            element.paused = node.paused;
            element.ended = node.ended;
            element.current_src = non_empty(&node.current_src);
            NodeData::Element(element)
        }
        pb::NodeKind::Unspecified => {
            return Err(ContentError::invalid_snapshot(format!(
                "node {} has no kind",
                node.id
            )))
        }
    };

    doc.insert_node(node.id, parent, window, data);
    Ok(())
}

fn non_empty(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
