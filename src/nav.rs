//! Navigation seam between the session core and whatever renders routes.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session store forces navigation on logout; route guards only decide.
//! `History` is the in-process implementation used by the terminal client:
//! a stack of visited paths where a replace overwrites the current entry
//! instead of adding one.

#[cfg(test)]
#[path = "nav_test.rs"]
mod tests;

use std::sync::Mutex;

/// Options for a navigation, mirroring the router's `replace` flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NavigateOptions {
    /// Overwrite the current history entry instead of pushing a new one.
    pub replace: bool,
}

impl NavigateOptions {
    #[must_use]
    pub fn replace() -> Self {
        Self { replace: true }
    }
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str, options: NavigateOptions);
}

/// In-memory navigation history. Starts at `/`.
#[derive(Debug)]
pub struct History {
    entries: Mutex<Vec<String>>,
}

impl History {
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at("/")
    }

    #[must_use]
    pub fn starting_at(path: &str) -> Self {
        Self { entries: Mutex::new(vec![path.to_owned()]) }
    }

    /// Path of the current entry.
    #[must_use]
    pub fn current(&self) -> String {
        self.lock().last().cloned().unwrap_or_else(|| "/".to_owned())
    }

    /// All entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.entries.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator for History {
    fn navigate(&self, path: &str, options: NavigateOptions) {
        let mut entries = self.lock();
        if options.replace {
            entries.pop();
        }
        entries.push(path.to_owned());
        tracing::debug!(path, replace = options.replace, "navigate");
    }
}
