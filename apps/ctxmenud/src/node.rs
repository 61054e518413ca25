//! Capability view over a document node.
//!
//! The classifier only ever talks to nodes through [`InspectableNode`]; each
//! concrete document representation implements it once (see [`crate::dom`]).

pub const XLINK_NAMESPACE: &str = "http://www.w3.org/1999/xlink";

/// Opaque, stable identifier of a node inside its document.
pub type NodeKey = u64;

/// Identifier of a (possibly nested) browsing window.
pub type WindowId = u64;

/// Editable text field data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    pub value: String,
    /// Selection bounds as character offsets into `value`.
    pub selection_start: usize,
    pub selection_end: usize,
    /// Password-style fields never expose their text.
    pub masked: bool,
    pub read_only: bool,
}

impl TextInput {
    pub fn text_length(&self) -> usize {
        self.value.chars().count()
    }

    pub fn has_selection(&self) -> bool {
        self.selection_start != self.selection_end
    }

    pub fn selected_text(&self) -> String {
        let len = self.text_length();
        let start = self.selection_start.min(self.selection_end).min(len);
        let end = self.selection_start.max(self.selection_end).min(len);
        self.value.chars().skip(start).take(end - start).collect()
    }
}

/// Audio or video element data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaInfo {
    pub current_src: Option<String>,
    pub src: Option<String>,
    pub paused: bool,
    pub ended: bool,
    pub video: bool,
}

impl MediaInfo {
    pub fn source_url(&self) -> String {
        self.current_src
            .as_deref()
            .filter(|src| !src.is_empty())
            .or(self.src.as_deref())
            .unwrap_or_default()
            .to_string()
    }

    pub fn is_stopped(&self) -> bool {
        self.paused || self.ended
    }
}

pub trait InspectableNode {
    fn key(&self) -> NodeKey;

    fn parent(&self) -> Option<Self>
    where
        Self: Sized;

    fn owner_window(&self) -> Option<WindowId>;

    fn is_element(&self) -> bool;

    fn attribute(&self, name: &str) -> Option<String>;

    fn attribute_ns(&self, namespace: &str, local_name: &str) -> Option<String>;

    fn text_content(&self) -> Option<String>;

    fn title(&self) -> Option<String> {
        self.attribute("title")
    }

    fn base_uri(&self) -> Option<String>;

    /// Resolved URI of image-loading content, if this node is one.
    fn image_uri(&self) -> Option<String>;

    fn is_link(&self) -> bool;

    /// Natively resolved href. Empty or missing means the caller must fall
    /// back to the XLink attribute.
    fn href(&self) -> Option<String>;

    fn text_input(&self) -> Option<TextInput>;

    fn is_text_input(&self) -> bool {
        self.text_input().is_some()
    }

    fn media(&self) -> Option<MediaInfo>;

    fn is_plain_text(&self) -> bool;
}
