use std::sync::{Arc, PoisonError, RwLock};

use hemolink_core::Navigator;

/// In-process location history for hosts without a browser.
///
/// `redirect` replaces the current entry, matching a full-page redirect;
/// `push` and `back` model ordinary navigation.
#[derive(Debug, Clone)]
pub struct HistoryNavigator {
    entries: Arc<RwLock<Vec<String>>>,
}

impl HistoryNavigator {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(vec![initial.into()])),
        }
    }

    pub fn push(&self, location: impl Into<String>) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(location.into());
    }

    /// Go back one entry. The first entry is never popped.
    pub fn back(&self) -> Option<String> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries.len() > 1 {
            entries.pop();
        }
        entries.last().cloned()
    }

    pub fn history(&self) -> Vec<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for HistoryNavigator {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Navigator for HistoryNavigator {
    fn current_path(&self) -> String {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
            .unwrap_or_else(|| "/".to_string())
    }

    fn redirect(&self, location: &str) {
        tracing::debug!(location, "redirect");
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        match entries.last_mut() {
            Some(current) => *current = location.to_string(),
            None => entries.push(location.to_string()),
        }
    }
}
