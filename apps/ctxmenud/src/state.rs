use crate::proto as pb;
use prost_types::{value, Struct, Value};
use std::collections::BTreeMap;

pub mod tags {
    pub const IMAGE: &str = "image";
    pub const LINK: &str = "link";
    pub const INPUT_TEXT: &str = "input-text";
    pub const INPUT_EMPTY: &str = "input-empty";
    pub const CUT: &str = "cut";
    pub const COPY: &str = "copy";
    pub const PASTE: &str = "paste";
    pub const SELECTABLE: &str = "selectable";
    pub const MEDIA: &str = "media";
    pub const MEDIA_PAUSED: &str = "media-paused";
    pub const MEDIA_PLAYING: &str = "media-playing";
    pub const VIDEO: &str = "video";
    pub const SELECTED_TEXT: &str = "selected-text";
    pub const CONTENT_TEXT: &str = "content-text";

    /// Tags that make the generic `content-text` entry redundant.
    pub const SPECIFIC: [&str; 5] = [IMAGE, MEDIA, VIDEO, LINK, INPUT_TEXT];
}

/// Everything the menu layer needs to know about one right-click.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PopupState {
    /// Menu action tags in discovery order.
    pub types: Vec<String>,
    pub label: String,
    pub link_url: String,
    pub link_title: String,
    pub link_protocol: Option<String>,
    pub media_url: String,
    pub content_type: String,
    pub content_disposition: String,
    pub string: String,
    pub x_pos: f64,
    pub y_pos: f64,
    pub source: u32,
    /// Free-form data contributed by registered type handlers.
    pub extras: BTreeMap<String, String>,
}

impl PopupState {
    pub fn push_type(&mut self, tag: impl Into<String>) {
        self.types.push(tag.into());
    }

    pub fn has_type(&self, tag: &str) -> bool {
        self.types.iter().any(|t| t == tag)
    }

    pub fn has_any_type(&self, tags: &[&str]) -> bool {
        tags.iter().any(|tag| self.has_type(tag))
    }

    pub fn to_message(&self) -> pb::ContextMenuState {
        pb::ContextMenuState {
            types: self.types.clone(),
            label: self.label.clone(),
            link_url: self.link_url.clone(),
            link_title: self.link_title.clone(),
            link_protocol: self.link_protocol.clone(),
            media_url: self.media_url.clone(),
            content_type: self.content_type.clone(),
            content_disposition: self.content_disposition.clone(),
            string: self.string.clone(),
            x_pos: self.x_pos,
            y_pos: self.y_pos,
            source: self.source,
            extras: extras_struct(&self.extras),
        }
    }
}

fn extras_struct(extras: &BTreeMap<String, String>) -> Option<Struct> {
    if extras.is_empty() {
        return None;
    }
    let fields = extras
        .iter()
        .map(|(key, val)| {
            (
                key.clone(),
                Value {
                    kind: Some(value::Kind::StringValue(val.clone())),
                },
            )
        })
        .collect();
    Some(Struct { fields })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_carries_extras_as_struct() {
        let mut state = PopupState::default();
        state.push_type(tags::LINK);
        state.link_protocol = Some("https".to_string());
        state.extras.insert("share".to_string(), "twitter".to_string());

        let msg = state.to_message();
        assert_eq!(msg.types, vec!["link".to_string()]);
        assert_eq!(msg.link_protocol.as_deref(), Some("https"));
        let extras = msg.extras.unwrap();
        assert_eq!(
            extras.fields.get("share").and_then(|v| v.kind.clone()),
            Some(value::Kind::StringValue("twitter".to_string()))
        );
    }

    #[test]
    fn message_omits_empty_extras() {
        let state = PopupState::default();
        assert!(state.to_message().extras.is_none());
        assert!(!state.has_any_type(&tags::SPECIFIC));
    }
}
