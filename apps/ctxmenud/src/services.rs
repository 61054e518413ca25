//! Black-box collaborators consulted during classification.

use crate::error::ContentError;
use crate::node::{InspectableNode, WindowId};
use url::Url;

pub const TEXT_UNICODE_FLAVOR: &str = "text/unicode";

/// Top-level window owning a node plus the offset of the node's frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TargetFrame {
    pub window: WindowId,
    pub offset_x: f64,
    pub offset_y: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageProperties {
    pub content_type: Option<String>,
    pub content_disposition: Option<String>,
}

pub trait FrameTranslator {
    fn translate_to_top_level(&self, node: &dyn InspectableNode) -> Option<TargetFrame>;
}

pub trait ImageCache {
    fn find_entry_properties(&self, uri: &str) -> Result<Option<ImageProperties>, ContentError>;
}

pub trait Clipboard {
    fn has_data_matching_flavors(&self, flavors: &[&str]) -> bool;
}

pub trait SelectionSource {
    fn selection_text(&self, window: WindowId) -> Option<String>;
}

pub trait UrlResolver {
    fn make_absolute(&self, base: Option<&str>, href: &str) -> Result<String, ContentError>;

    fn scheme(&self, url: &str) -> Option<String>;
}

/// [`UrlResolver`] backed by the `url` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardUrlResolver;

impl UrlResolver for StandardUrlResolver {
    fn make_absolute(&self, base: Option<&str>, href: &str) -> Result<String, ContentError> {
        let href = href.trim();
        let resolved = match base.and_then(|base| Url::parse(base).ok()) {
            Some(base) => base.join(href),
            None => Url::parse(href),
        };
        resolved
            .map(|url| url.to_string())
            .map_err(|_| ContentError::invalid_href(href))
    }

    fn scheme(&self, url: &str) -> Option<String> {
        Url::parse(url).ok().map(|url| url.scheme().to_string())
    }
}

/// Borrowed bundle of every collaborator a classification needs.
#[derive(Clone, Copy)]
pub struct Environment<'a> {
    pub frames: &'a dyn FrameTranslator,
    pub image_cache: &'a dyn ImageCache,
    pub clipboard: &'a dyn Clipboard,
    pub selection: &'a dyn SelectionSource,
    pub urls: &'a dyn UrlResolver,
}

impl<'a> Environment<'a> {
    /// Uses one object for every document-side service and the standard URL
    /// resolver.
    pub fn uniform<S>(services: &'a S) -> Self
    where
        S: FrameTranslator + ImageCache + Clipboard + SelectionSource,
    {
        Self {
            frames: services,
            image_cache: services,
            clipboard: services,
            selection: services,
            urls: &StandardUrlResolver,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_relative_href_against_base() {
        let urls = StandardUrlResolver;
        let resolved = urls
            .make_absolute(Some("https://example.com/docs/index.html"), "../img/a.svg")
            .unwrap();
        assert_eq!(resolved, "https://example.com/img/a.svg");
    }

    #[test]
    fn rejects_relative_href_without_base() {
        let urls = StandardUrlResolver;
        let err = urls.make_absolute(None, "next.html").unwrap_err();
        assert_eq!(err.code, "invalid_href");
    }

    #[test]
    fn scheme_is_absent_for_unparsable_urls() {
        let urls = StandardUrlResolver;
        assert_eq!(urls.scheme("mailto:someone@example.com").as_deref(), Some("mailto"));
        assert_eq!(urls.scheme("not a url"), None);
    }
}
