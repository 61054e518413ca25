//! Dispatch for the clear-private-data topic.

use crate::error::ContentError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrivateDataKind {
    Passwords,
    Cookies,
    Cache,
}

impl PrivateDataKind {
    pub fn parse(data: &str) -> Option<Self> {
        match data {
            "passwords" => Some(Self::Passwords),
            "cookies" => Some(Self::Cookies),
            "cache" => Some(Self::Cache),
            _ => None,
        }
    }
}

/// Platform storage that can forget user data.
pub trait PrivateDataStore {
    fn remove_all_logins(&mut self);
    fn remove_all_cookies(&mut self);
    fn clear_cache(&mut self) -> Result<(), ContentError>;
    fn clear_image_cache(&mut self) -> Result<(), ContentError>;
}

/// Clears the data named by `data`. Returns false for unknown topics.
pub fn clear_private_data(store: &mut dyn PrivateDataStore, data: &str) -> bool {
    let Some(kind) = PrivateDataKind::parse(data) else {
        log::debug!("ignoring clear-private-data for {data:?}");
        return false;
    };

    match kind {
        PrivateDataKind::Passwords => {
            store.remove_all_logins();
            log::debug!("Passwords removed");
        }
        PrivateDataKind::Cookies => {
            store.remove_all_cookies();
            log::debug!("Cookies removed");
        }
        PrivateDataKind::Cache => {
            if let Err(err) = store.clear_cache() {
                log::warn!("error in clearing storage cache: {err}");
            }
            if let Err(err) = store.clear_image_cache() {
                log::warn!("error in clearing image cache: {err}");
            }
            log::debug!("Cache cleaned");
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingStore {
        calls: Vec<&'static str>,
        fail_cache: bool,
    }

    impl PrivateDataStore for RecordingStore {
        fn remove_all_logins(&mut self) {
            self.calls.push("logins");
        }

        fn remove_all_cookies(&mut self) {
            self.calls.push("cookies");
        }

        fn clear_cache(&mut self) -> Result<(), ContentError> {
            self.calls.push("cache");
            if self.fail_cache {
                return Err(ContentError::cache_unavailable("storage busy"));
            }
            Ok(())
        }

        fn clear_image_cache(&mut self) -> Result<(), ContentError> {
            self.calls.push("images");
            Ok(())
        }
    }

    #[test]
    fn dispatches_each_topic() {
        let mut store = RecordingStore::default();
        assert!(clear_private_data(&mut store, "passwords"));
        assert!(clear_private_data(&mut store, "cookies"));
        assert!(!clear_private_data(&mut store, "history"));
        assert_eq!(store.calls, vec!["logins", "cookies"]);
    }

    #[test]
    fn image_cache_is_cleared_even_when_storage_cache_fails() {
        let mut store = RecordingStore {
            fail_cache: true,
            ..Default::default()
        };
        assert!(clear_private_data(&mut store, "cache"));
        assert_eq!(store.calls, vec!["cache", "images"]);
    }
}
