//! Presentation-layer callbacks
//!
//! The session reports to whatever renders it through a [`SessionObserver`].
//! All methods default to no-ops so an observer implements only what it shows.

use capmap_catalog::Catalog;

/// Receives progress and terminal notifications of an import
pub trait SessionObserver: Send + Sync {
    /// Upload progress in percent, 0–100
    fn on_progress(&self, _percent: u8) {}

    /// Import applied; `catalog` is the merged view to render
    fn on_success(&self, _catalog: &Catalog) {}

    /// Human-readable failure notice
    fn on_failure(&self, _message: &str) {}
}

/// Observer that ignores every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SessionObserver for NoopObserver {}

/// Asks the user to approve a destructive action
pub trait Confirmation: Send + Sync {
    /// `true` only on an explicit affirmative
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirmation for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}
