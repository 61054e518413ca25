//! Copy/cut/paste affordances derived from selections and the clipboard.

use crate::node::{TextInput, WindowId};
use crate::services::{Clipboard, SelectionSource, TEXT_UNICODE_FLAVOR};
use crate::state::{tags, PopupState};

/// Fills the edit actions for a text field the user right-clicked.
pub fn inspect_text_input(field: &TextInput, clipboard: &dyn Clipboard, state: &mut PopupState) {
    state.push_type(tags::INPUT_TEXT);

    if !field.masked {
        if field.has_selection() {
            state.push_type(tags::CUT);
            state.push_type(tags::COPY);
            state.string = field.selected_text();
        } else if field.text_length() > 0 {
            state.push_type(tags::SELECTABLE);
            state.string = field.value.clone();
        }
    }

    if field.text_length() == 0 {
        state.push_type(tags::INPUT_EMPTY);
    }

    if can_paste(clipboard, field.read_only) {
        state.push_type(tags::PASTE);
    }
}

pub fn can_paste(clipboard: &dyn Clipboard, read_only: bool) -> bool {
    !read_only && clipboard.has_data_matching_flavors(&[TEXT_UNICODE_FLAVOR])
}

/// Post-walk resolution for text-bearing targets. A live window selection
/// wins over whatever the walk captured; otherwise plain text gets the
/// catch-all `content-text` entry.
pub fn resolve_text_selection(
    window: Option<WindowId>,
    selection: &dyn SelectionSource,
    state: &mut PopupState,
) {
    let selected = window
        .and_then(|window| selection.selection_text(window))
        .filter(|text| !text.is_empty());

    match selected {
        Some(text) => {
            state.string = text;
            state.push_type(tags::COPY);
            state.push_type(tags::SELECTED_TEXT);
        }
        None => {
            if !state.has_any_type(&tags::SPECIFIC) {
                state.push_type(tags::CONTENT_TEXT);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedClipboard(bool);

    impl Clipboard for FixedClipboard {
        fn has_data_matching_flavors(&self, flavors: &[&str]) -> bool {
            self.0 && flavors.contains(&TEXT_UNICODE_FLAVOR)
        }
    }

    struct FixedSelection(Option<&'static str>);

    impl SelectionSource for FixedSelection {
        fn selection_text(&self, _window: WindowId) -> Option<String> {
            self.0.map(str::to_string)
        }
    }

    fn field(value: &str, start: usize, end: usize) -> TextInput {
        TextInput {
            value: value.to_string(),
            selection_start: start,
            selection_end: end,
            ..Default::default()
        }
    }

    #[test]
    fn selection_in_field_offers_cut_and_copy() {
        let mut state = PopupState::default();
        inspect_text_input(&field("hello world", 0, 5), &FixedClipboard(false), &mut state);
        assert_eq!(state.types, vec!["input-text", "cut", "copy"]);
        assert_eq!(state.string, "hello");
    }

    #[test]
    fn unselected_field_is_selectable() {
        let mut state = PopupState::default();
        inspect_text_input(&field("hello", 2, 2), &FixedClipboard(true), &mut state);
        assert_eq!(state.types, vec!["input-text", "selectable", "paste"]);
        assert_eq!(state.string, "hello");
    }

    #[test]
    fn empty_field_reports_input_empty() {
        let mut state = PopupState::default();
        inspect_text_input(&field("", 0, 0), &FixedClipboard(false), &mut state);
        assert_eq!(state.types, vec!["input-text", "input-empty"]);
        assert!(state.string.is_empty());
    }

    #[test]
    fn masked_field_never_exposes_text() {
        let mut masked = field("secret", 0, 3);
        masked.masked = true;
        let mut state = PopupState::default();
        inspect_text_input(&masked, &FixedClipboard(true), &mut state);
        assert_eq!(state.types, vec!["input-text", "paste"]);
        assert!(state.string.is_empty());

        masked.selection_end = 0;
        let mut state = PopupState::default();
        inspect_text_input(&masked, &FixedClipboard(false), &mut state);
        assert_eq!(state.types, vec!["input-text"]);
    }

    #[test]
    fn read_only_field_cannot_paste() {
        let mut read_only = field("", 0, 0);
        read_only.read_only = true;
        let mut state = PopupState::default();
        inspect_text_input(&read_only, &FixedClipboard(true), &mut state);
        assert!(!state.has_type(tags::PASTE));
    }

    #[test]
    fn window_selection_overrides_string() {
        let mut state = PopupState::default();
        state.string = "from walk".to_string();
        resolve_text_selection(Some(1), &FixedSelection(Some("picked")), &mut state);
        assert_eq!(state.types, vec!["copy", "selected-text"]);
        assert_eq!(state.string, "picked");
    }

    #[test]
    fn plain_text_without_selection_is_content_text() {
        let mut state = PopupState::default();
        resolve_text_selection(Some(1), &FixedSelection(Some("")), &mut state);
        assert_eq!(state.types, vec!["content-text"]);

        let mut state = PopupState::default();
        state.push_type(tags::LINK);
        resolve_text_selection(None, &FixedSelection(Some("ignored")), &mut state);
        assert_eq!(state.types, vec!["link"]);
    }
}
