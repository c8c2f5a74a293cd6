//! Routing layer boundary.
//!
//! The core issues navigation intents; the routing layer owns the URL.

use std::sync::Mutex;

/// Navigation primitives supplied by the routing layer.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str, replace: bool);
    fn current_path(&self) -> String;
}

/// Navigator that keeps an in-memory history stack.
#[derive(Debug)]
pub struct MemoryNavigator {
    history: Mutex<Vec<String>>,
}

impl MemoryNavigator {
    pub fn new(initial_path: &str) -> Self {
        Self {
            history: Mutex::new(vec![initial_path.to_string()]),
        }
    }

    /// Full history, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.history
            .lock()
            .map(|h| h.clone())
            .unwrap_or_default()
    }
}

impl Navigator for MemoryNavigator {
    fn navigate(&self, path: &str, replace: bool) {
        let Ok(mut history) = self.history.lock() else {
            return;
        };
        if replace {
            history.pop();
        }
        history.push(path.to_string());
        tracing::debug!(path, replace, "Navigated");
    }

    fn current_path(&self) -> String {
        self.history
            .lock()
            .ok()
            .and_then(|h| h.last().cloned())
            .unwrap_or_else(|| "/".to_string())
    }
}
