//! Arena-backed document tree.
//!
//! [`Document`] owns the nodes of a page and its nested frames together with
//! the per-page services the classifier consults (selection, clipboard
//! flavors, image cache). [`DomNode`] is a cheap borrowed handle that
//! implements [`InspectableNode`].

mod snapshot;

use crate::error::ContentError;
use crate::node::{InspectableNode, MediaInfo, NodeKey, TextInput, WindowId, XLINK_NAMESPACE};
use crate::privacy::PrivateDataStore;
use crate::services::{
    Clipboard, FrameTranslator, ImageCache, ImageProperties, SelectionSource, StandardUrlResolver,
    TargetFrame, UrlResolver,
};
use std::collections::HashMap;

pub const TOP_WINDOW: WindowId = 1;

const TEXT_TAGS: [&str; 13] = [
    "p", "div", "li", "pre", "h1", "h2", "h3", "h4", "h5", "h6", "td", "th", "body",
];

const TEXT_FIELD_TYPES: [&str; 8] = [
    "", "text", "search", "tel", "url", "email", "password", "number",
];

#[derive(Debug, Clone)]
enum NodeData {
    Text(String),
    Element(Element),
}

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    value: Option<String>,
    selection: (usize, usize),
    paused: bool,
    ended: bool,
    current_src: Option<String>,
}

impl Element {
    fn new(tag: &str, attributes: &[(&str, &str)]) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: attributes
                .iter()
                .map(|(name, value)| (name.to_ascii_lowercase(), value.to_string()))
                .collect(),
            value: None,
            selection: (0, 0),
            paused: true,
            ended: false,
            current_src: None,
        }
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn input_type(&self) -> String {
        self.attribute("type").unwrap_or_default().trim().to_ascii_lowercase()
    }
}

#[derive(Debug, Clone)]
struct NodeEntry {
    key: NodeKey,
    parent: Option<usize>,
    children: Vec<usize>,
    window: WindowId,
    data: NodeData,
}

#[derive(Debug, Clone)]
struct WindowEntry {
    parent: Option<WindowId>,
    offset_x: f64,
    offset_y: f64,
    url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeEntry>,
    index: HashMap<NodeKey, usize>,
    next_key: NodeKey,
    windows: HashMap<WindowId, WindowEntry>,
    next_window: WindowId,
    selections: HashMap<WindowId, String>,
    image_cache: Option<HashMap<String, ImageProperties>>,
    clipboard_flavors: Vec<String>,
    cookies: Vec<String>,
}

impl Document {
    /// Empty document whose top-level window is [`TOP_WINDOW`].
    pub fn new(url: &str) -> Self {
        let mut doc = Self::empty();
        doc.insert_window(TOP_WINDOW, None, 0.0, 0.0, Some(url.to_string()));
        doc
    }

    fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            next_key: 1,
            windows: HashMap::new(),
            next_window: TOP_WINDOW + 1,
            selections: HashMap::new(),
            image_cache: Some(HashMap::new()),
            clipboard_flavors: Vec::new(),
            cookies: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, key: NodeKey) -> Option<DomNode<'_>> {
        let index = *self.index.get(&key)?;
        Some(DomNode { doc: self, index })
    }

    pub fn cookies(&self) -> &[String] {
        &self.cookies
    }

    /// Appends an element. Without a parent it becomes a root of the
    /// top-level window.
    pub fn append_element(
        &mut self,
        parent: Option<NodeKey>,
        tag: &str,
        attributes: &[(&str, &str)],
    ) -> NodeKey {
        let parent = parent.and_then(|key| self.index.get(&key).copied());
        let window = parent.map_or(TOP_WINDOW, |index| self.nodes[index].window);
        let key = self.next_key;
        self.insert_node(key, parent, window, NodeData::Element(Element::new(tag, attributes)));
        key
    }

    pub fn append_text(&mut self, parent: NodeKey, text: &str) -> NodeKey {
        let parent = self.index.get(&parent).copied();
        let window = parent.map_or(TOP_WINDOW, |index| self.nodes[index].window);
        let key = self.next_key;
        self.insert_node(key, parent, window, NodeData::Text(text.to_string()));
        key
    }

    /// Adds a nested frame window positioned at `offset` inside `parent`.
    pub fn add_frame(
        &mut self,
        parent: WindowId,
        offset_x: f64,
        offset_y: f64,
        url: Option<&str>,
    ) -> WindowId {
        let id = self.next_window;
        self.insert_window(id, Some(parent), offset_x, offset_y, url.map(str::to_string));
        id
    }

    pub fn append_frame_root(
        &mut self,
        window: WindowId,
        tag: &str,
        attributes: &[(&str, &str)],
    ) -> NodeKey {
        let key = self.next_key;
        self.insert_node(key, None, window, NodeData::Element(Element::new(tag, attributes)));
        key
    }

    /// Forgets a window, e.g. a frame that navigated away mid-event.
    pub fn detach_window(&mut self, window: WindowId) {
        self.windows.remove(&window);
        self.selections.remove(&window);
    }

    pub fn set_value(&mut self, key: NodeKey, value: &str, selection_start: usize, selection_end: usize) {
        if let Some(element) = self.element_mut(key) {
            element.value = Some(value.to_string());
            element.selection = (selection_start, selection_end);
        }
    }

    pub fn set_playback(&mut self, key: NodeKey, paused: bool, ended: bool) {
        if let Some(element) = self.element_mut(key) {
            element.paused = paused;
            element.ended = ended;
        }
    }

    pub fn set_current_src(&mut self, key: NodeKey, src: &str) {
        if let Some(element) = self.element_mut(key) {
            element.current_src = Some(src.to_string());
        }
    }

    pub fn set_selection(&mut self, window: WindowId, text: &str) {
        self.selections.insert(window, text.to_string());
    }

    pub fn set_clipboard_flavors(&mut self, flavors: &[&str]) {
        self.clipboard_flavors = flavors.iter().map(|flavor| flavor.to_string()).collect();
    }

    pub fn set_cookies(&mut self, cookies: Vec<String>) {
        self.cookies = cookies;
    }

    pub fn cache_image(&mut self, uri: &str, properties: ImageProperties) {
        self.image_cache
            .get_or_insert_with(HashMap::new)
            .insert(uri.to_string(), properties);
    }

    /// Makes every image cache lookup fail.
    pub fn disable_image_cache(&mut self) {
        self.image_cache = None;
    }

    fn insert_window(
        &mut self,
        id: WindowId,
        parent: Option<WindowId>,
        offset_x: f64,
        offset_y: f64,
        url: Option<String>,
    ) {
        self.windows.insert(
            id,
            WindowEntry {
                parent,
                offset_x,
                offset_y,
                url,
            },
        );
        self.next_window = self.next_window.max(id.saturating_add(1));
    }

    fn insert_node(&mut self, key: NodeKey, parent: Option<usize>, window: WindowId, data: NodeData) -> usize {
        let index = self.nodes.len();
        self.nodes.push(NodeEntry {
            key,
            parent,
            children: Vec::new(),
            window,
            data,
        });
        if let Some(parent) = parent {
            self.nodes[parent].children.push(index);
        }
        self.index.insert(key, index);
        self.next_key = self.next_key.max(key.saturating_add(1));
        index
    }

    fn element_mut(&mut self, key: NodeKey) -> Option<&mut Element> {
        let index = *self.index.get(&key)?;
        match &mut self.nodes[index].data {
            NodeData::Element(element) => Some(element),
            NodeData::Text(_) => None,
        }
    }

    /// URL of `window`, inherited from the embedding window when unset.
    fn window_url(&self, mut window: WindowId) -> Option<String> {
        loop {
            let entry = self.windows.get(&window)?;
            if let Some(url) = &entry.url {
                return Some(url.clone());
            }
            window = entry.parent?;
        }
    }

    fn resolve_url(&self, window: WindowId, href: &str) -> Option<String> {
        StandardUrlResolver
            .make_absolute(self.window_url(window).as_deref(), href)
            .ok()
    }

    fn collect_text(&self, index: usize, out: &mut String) {
        match &self.nodes[index].data {
            NodeData::Text(text) => out.push_str(text),
            NodeData::Element(_) => {
                for &child in &self.nodes[index].children {
                    self.collect_text(child, out);
                }
            }
        }
    }
}

/// Borrowed handle to one node of a [`Document`].
#[derive(Debug, Clone, Copy)]
pub struct DomNode<'a> {
    doc: &'a Document,
    index: usize,
}

impl<'a> DomNode<'a> {
    fn entry(&self) -> &'a NodeEntry {
        &self.doc.nodes[self.index]
    }

    fn element(&self) -> Option<&'a Element> {
        match &self.entry().data {
            NodeData::Element(element) => Some(element),
            NodeData::Text(_) => None,
        }
    }

    fn resolved_attribute(&self, element: &Element, name: &str) -> Option<String> {
        let raw = element.attribute(name)?;
        Some(
            self.doc
                .resolve_url(self.entry().window, raw)
                .unwrap_or_else(|| raw.to_string()),
        )
    }
}

impl<'a> InspectableNode for DomNode<'a> {
    fn key(&self) -> NodeKey {
        self.entry().key
    }

    fn parent(&self) -> Option<Self> {
        self.entry().parent.map(|index| DomNode {
            doc: self.doc,
            index,
        })
    }

    fn owner_window(&self) -> Option<WindowId> {
        Some(self.entry().window)
    }

    fn is_element(&self) -> bool {
        self.element().is_some()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.element()?
            .attribute(&name.to_ascii_lowercase())
            .map(str::to_string)
    }

    fn attribute_ns(&self, namespace: &str, local_name: &str) -> Option<String> {
        if namespace == XLINK_NAMESPACE {
            self.attribute(&format!("xlink:{local_name}"))
        } else if namespace.is_empty() {
            self.attribute(local_name)
        } else {
            None
        }
    }

    fn text_content(&self) -> Option<String> {
        let mut out = String::new();
        self.doc.collect_text(self.index, &mut out);
        Some(out)
    }

    fn base_uri(&self) -> Option<String> {
        self.doc.window_url(self.entry().window)
    }

    fn image_uri(&self) -> Option<String> {
        let element = self.element()?;
        let is_image = element.tag == "img" || (element.tag == "input" && element.input_type() == "image");
        if !is_image {
            return None;
        }
        let src = element.attribute("src").filter(|src| !src.trim().is_empty())?;
        self.doc.resolve_url(self.entry().window, src)
    }

    fn is_link(&self) -> bool {
        let Some(element) = self.element() else {
            return false;
        };
        match element.tag.as_str() {
            "link" => true,
            "a" | "area" if element.attribute("href").is_some() => true,
            _ => element.attribute("xlink:type") == Some("simple"),
        }
    }

    fn href(&self) -> Option<String> {
        let element = self.element()?;
        match element.tag.as_str() {
            "a" | "area" | "link" => self.resolved_attribute(element, "href"),
            _ => None,
        }
    }

    fn text_input(&self) -> Option<TextInput> {
        let element = self.element()?;
        let (masked, default_value) = match element.tag.as_str() {
            "input" => {
                let kind = element.input_type();
                if !TEXT_FIELD_TYPES.contains(&kind.as_str()) {
                    return None;
                }
                (kind == "password", element.attribute("value").unwrap_or_default().to_string())
            }
            "textarea" => (false, self.text_content().unwrap_or_default()),
            _ => return None,
        };
        Some(TextInput {
            value: element.value.clone().unwrap_or(default_value),
            selection_start: element.selection.0,
            selection_end: element.selection.1,
            masked,
            read_only: element.attribute("readonly").is_some(),
        })
    }

    fn media(&self) -> Option<MediaInfo> {
        let element = self.element()?;
        let video = match element.tag.as_str() {
            "video" => true,
            "audio" => false,
            _ => return None,
        };
        Some(MediaInfo {
            current_src: element.current_src.clone(),
            src: self.resolved_attribute(element, "src"),
            paused: element.paused,
            ended: element.ended,
            video,
        })
    }

    fn is_plain_text(&self) -> bool {
        self.element()
            .is_some_and(|element| TEXT_TAGS.contains(&element.tag.as_str()))
    }
}

impl FrameTranslator for Document {
    fn translate_to_top_level(&self, node: &dyn InspectableNode) -> Option<TargetFrame> {
        let mut window = node.owner_window()?;
        let (mut offset_x, mut offset_y) = (0.0, 0.0);
        loop {
            let entry = self.windows.get(&window)?;
            match entry.parent {
                Some(parent) => {
                    offset_x += entry.offset_x;
                    offset_y += entry.offset_y;
                    window = parent;
                }
                None => {
                    return Some(TargetFrame {
                        window,
                        offset_x,
                        offset_y,
                    })
                }
            }
        }
    }
}

impl ImageCache for Document {
    fn find_entry_properties(&self, uri: &str) -> Result<Option<ImageProperties>, ContentError> {
        match &self.image_cache {
            Some(cache) => Ok(cache.get(uri).cloned()),
            None => Err(ContentError::cache_unavailable("image cache unavailable")),
        }
    }
}

impl Clipboard for Document {
    fn has_data_matching_flavors(&self, flavors: &[&str]) -> bool {
        self.clipboard_flavors
            .iter()
            .any(|flavor| flavors.contains(&flavor.as_str()))
    }
}

impl SelectionSource for Document {
    fn selection_text(&self, window: WindowId) -> Option<String> {
        self.selections.get(&window).cloned()
    }
}

impl PrivateDataStore for Document {
    fn remove_all_logins(&mut self) {
        log::debug!("content document holds no saved logins");
    }

    fn remove_all_cookies(&mut self) {
        self.cookies.clear();
    }

    fn clear_cache(&mut self) -> Result<(), ContentError> {
        Ok(())
    }

    fn clear_image_cache(&mut self) -> Result<(), ContentError> {
        match &mut self.image_cache {
            Some(cache) => {
                cache.clear();
                Ok(())
            }
            None => Err(ContentError::cache_unavailable("image cache unavailable")),
        }
    }
}
