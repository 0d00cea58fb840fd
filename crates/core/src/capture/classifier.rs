//! Activity classification - pure decision logic

use vigil_domain::constants::DEFAULT_BROWSER_MARKERS;

/// Result of classifying one window title
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Browser,
    Application,
}

/// Classifies a window title as browser-like or application-like.
///
/// A title counts as browser activity when it contains any configured
/// marker (case-sensitive substring match). This is a heuristic, not a
/// ground-truth classifier: a browser whose window title omits its product
/// name is reported as application activity. That false negative is a known
/// limitation of title-based classification, not a bug to paper over.
#[derive(Debug, Clone)]
pub struct ActivityClassifier {
    markers: Vec<String>,
}

impl Default for ActivityClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_BROWSER_MARKERS.iter().map(|m| m.to_string()))
    }
}

impl ActivityClassifier {
    /// Create a classifier with a custom marker allow-list
    pub fn new(markers: impl IntoIterator<Item = String>) -> Self {
        Self { markers: markers.into_iter().collect() }
    }

    /// Classify a window title. Pure function: no side effects, no failure
    /// modes; an empty title contains no marker and is application activity.
    pub fn classify(&self, window_title: &str) -> ActivityKind {
        if self.markers.iter().any(|marker| window_title.contains(marker.as_str())) {
            ActivityKind::Browser
        } else {
            ActivityKind::Application
        }
    }
}
