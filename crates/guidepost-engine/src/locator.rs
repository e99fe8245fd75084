#![forbid(unsafe_code)]

//! Locator port: resolves a step's target string to an on-screen rectangle.
//!
//! The engine never inspects the host's widget tree itself. A browser host
//! would query the DOM, a terminal host looks up the rectangles it laid out
//! in the last frame. A missing target is a normal outcome, not an error.

use std::collections::HashMap;

use guidepost_core::geometry::Rect;

/// Finds target elements by locator string.
pub trait Locator {
    /// Bounding box of the element matching `selector`, in viewport
    /// coordinates, or `None` when nothing matches.
    fn find(&self, selector: &str) -> Option<Rect>;
}

impl<L: Locator + ?Sized> Locator for &L {
    fn find(&self, selector: &str) -> Option<Rect> {
        (**self).find(selector)
    }
}

/// Locator that never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLocator;

impl Locator for NullLocator {
    fn find(&self, _selector: &str) -> Option<Rect> {
        None
    }
}

/// Locator backed by a map of registered rectangles.
///
/// Hosts register each target's rectangle while laying out a frame.
#[derive(Debug, Clone, Default)]
pub struct StaticLocator {
    targets: HashMap<String, Rect>,
}

impl StaticLocator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, selector: impl Into<String>, rect: Rect) -> Self {
        self.insert(selector, rect);
        self
    }

    /// Register or move a target.
    pub fn insert(&mut self, selector: impl Into<String>, rect: Rect) {
        self.targets.insert(selector.into(), rect);
    }

    pub fn remove(&mut self, selector: &str) -> Option<Rect> {
        self.targets.remove(selector)
    }

    /// Forget every target, e.g. before laying out a new frame.
    pub fn clear(&mut self) {
        self.targets.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl Locator for StaticLocator {
    fn find(&self, selector: &str) -> Option<Rect> {
        self.targets.get(selector).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_locator_finds_registered_targets() {
        let rect = Rect::new(0.0, 2.0, 20.0, 1.0);
        let mut locator = StaticLocator::new().with("[data-tour=nav-topics]", rect);
        assert_eq!(locator.find("[data-tour=nav-topics]"), Some(rect));
        assert_eq!(locator.find("[data-tour=nav-reports]"), None);

        assert_eq!(locator.remove("[data-tour=nav-topics]"), Some(rect));
        assert!(locator.is_empty());
    }

    #[test]
    fn insert_moves_existing_target() {
        let mut locator = StaticLocator::new();
        locator.insert("#a", Rect::new(0.0, 0.0, 1.0, 1.0));
        locator.insert("#a", Rect::new(5.0, 5.0, 1.0, 1.0));
        assert_eq!(locator.len(), 1);
        assert_eq!(locator.find("#a"), Some(Rect::new(5.0, 5.0, 1.0, 1.0)));
        locator.clear();
        assert!(locator.find("#a").is_none());
    }

    #[test]
    fn null_locator_and_references() {
        assert!(NullLocator.find("#anything").is_none());
        let locator = StaticLocator::new().with("#a", Rect::new(1.0, 1.0, 1.0, 1.0));
        let by_ref: &dyn Locator = &locator;
        assert!((&by_ref).find("#a").is_some());
    }
}
