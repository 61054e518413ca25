//! Decides what a right-click landed on.
//!
//! The clicked node is checked once for image content, then the ancestor
//! chain is walked. Every element on the way yields a [`Decision`]; only
//! [`Decision::TextSeen`] and [`Decision::None`] let the walk continue, the
//! other variants settle the primary category and stop it.

use crate::config::LinkFailurePolicy;
use crate::error::ContentError;
use crate::node::{InspectableNode, MediaInfo, NodeKey, TextInput, XLINK_NAMESPACE};
use crate::registry::ExtensionRegistry;
use crate::resolver::resolve_target;
use crate::selection;
use crate::services::Environment;
use crate::state::{tags, PopupState};

/// Pointer data carried by the context menu event.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerContext {
    pub client_x: f64,
    pub client_y: f64,
    pub input_source: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    None,
    Link(String),
    Input(TextInput),
    Media(MediaInfo),
    TextSeen,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub state: PopupState,
    /// Image or text field a follow-up editor action would operate on.
    pub target: Option<NodeKey>,
}

pub struct Classifier<'a> {
    env: Environment<'a>,
    registry: &'a ExtensionRegistry,
    link_failure: LinkFailurePolicy,
}

impl<'a> Classifier<'a> {
    pub fn new(
        env: Environment<'a>,
        registry: &'a ExtensionRegistry,
        link_failure: LinkFailurePolicy,
    ) -> Self {
        Self {
            env,
            registry,
            link_failure,
        }
    }

    pub fn classify<N>(&self, popup: &N, pointer: &PointerContext) -> Result<Classification, ContentError>
    where
        N: InspectableNode + Clone,
    {
        let frame = resolve_target(popup, self.env.frames);
        let mut state = PopupState::default();
        let mut target = None;

        let image_url = self.check_image(popup, &mut state);
        if image_url.is_some() {
            target = Some(popup.key());
        }

        let mut text_bearing = false;
        let mut current = Some(popup.clone());
        while let Some(node) = current {
            match self.decide(&node, image_url.as_deref())? {
                Decision::None => {}
                Decision::TextSeen => text_bearing = true,
                Decision::Link(url) => {
                    self.apply_link(&mut state, popup, url);
                    // links pick up selections below
                    text_bearing = true;
                    break;
                }
                Decision::Input(field) => {
                    selection::inspect_text_input(&field, self.env.clipboard, &mut state);
                    target = Some(node.key());
                    break;
                }
                Decision::Media(media) => {
                    apply_media(&mut state, &media);
                    text_bearing = false;
                    break;
                }
            }
            current = node.parent();
        }

        if text_bearing {
            selection::resolve_text_selection(frame.window, self.env.selection, &mut state);
        }

        let (x_pos, y_pos) = frame.to_top_level(pointer.client_x, pointer.client_y);
        state.x_pos = x_pos;
        state.y_pos = y_pos;
        state.source = pointer.input_source;

        self.registry.apply(&mut state, popup);

        Ok(Classification { state, target })
    }

    /// Classifies a single node of the ancestor chain.
    pub fn decide(
        &self,
        node: &dyn InspectableNode,
        image_url: Option<&str>,
    ) -> Result<Decision, ContentError> {
        if !node.is_element() {
            return Ok(Decision::None);
        }

        if node.is_link() {
            let url = match self.link_url(node) {
                Ok(url) => url,
                Err(err) => match self.link_failure {
                    LinkFailurePolicy::Abort => return Err(err),
                    LinkFailurePolicy::Skip => {
                        log::warn!("skipping link node {}: {err}", node.key());
                        return Ok(Decision::None);
                    }
                },
            };
            // an image linking to itself only gets the image entries
            if image_url == Some(url.as_str()) {
                return Ok(Decision::None);
            }
            return Ok(Decision::Link(url));
        }

        if let Some(field) = node.text_input() {
            return Ok(Decision::Input(field));
        }

        if let Some(media) = node.media() {
            return Ok(Decision::Media(media));
        }

        if node.is_plain_text() {
            return Ok(Decision::TextSeen);
        }

        Ok(Decision::None)
    }

    /// Absolute URL of a link node: the native href, else the XLink href
    /// resolved against the node's base URI.
    pub fn link_url(&self, node: &dyn InspectableNode) -> Result<String, ContentError> {
        if let Some(href) = node.href().filter(|href| !href.is_empty()) {
            return Ok(href);
        }

        let href = node
            .attribute_ns(XLINK_NAMESPACE, "href")
            .unwrap_or_default();
        if href.trim().is_empty() {
            return Err(ContentError::empty_href());
        }

        self.env.urls.make_absolute(node.base_uri().as_deref(), &href)
    }

    fn check_image(&self, popup: &dyn InspectableNode, state: &mut PopupState) -> Option<String> {
        if !popup.is_element() {
            return None;
        }
        let uri = popup.image_uri().filter(|uri| !uri.is_empty())?;

        state.push_type(tags::IMAGE);
        state.label = uri.clone();
        state.media_url = uri.clone();

        match self.env.image_cache.find_entry_properties(&uri) {
            Ok(Some(props)) => {
                if let Some(content_type) = props.content_type {
                    state.content_type = content_type;
                }
                if let Some(disposition) = props.content_disposition {
                    state.content_disposition = disposition;
                }
            }
            Ok(None) => {}
            Err(err) => log::warn!("image cache lookup for {uri} failed: {err}"),
        }

        Some(uri)
    }

    fn apply_link(&self, state: &mut PopupState, popup: &dyn InspectableNode, url: String) {
        state.push_type(tags::LINK);
        state.link_title = popup
            .text_content()
            .filter(|text| !text.is_empty())
            .or_else(|| popup.title())
            .unwrap_or_default();
        state.link_protocol = self.env.urls.scheme(&url);
        state.label = url.clone();
        state.link_url = url;
    }
}

fn apply_media(state: &mut PopupState, media: &MediaInfo) {
    let url = media.source_url();
    state.label = url.clone();
    state.media_url = url;
    state.push_type(if media.is_stopped() {
        tags::MEDIA_PAUSED
    } else {
        tags::MEDIA_PLAYING
    });
    if media.video {
        state.push_type(tags::VIDEO);
    }
}
