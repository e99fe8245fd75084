#![forbid(unsafe_code)]

//! Step catalog: the ordered, immutable list of tour steps.
//!
//! A catalog is validated once at construction. After that it only supports
//! indexed lookup, so an out-of-range index is a caller bug surfaced as
//! `None`, never a panic.

use std::collections::HashSet;

use crate::error::CatalogError;

/// What a step shows and how the backdrop behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    /// Opening card, centered over a fully dimmed backdrop.
    Welcome,
    /// Highlights one element through a cut-out mask.
    Spotlight,
    /// Centered card without a target.
    Center,
    /// Closing card.
    Finish,
}

impl StepKind {
    #[must_use]
    pub const fn is_spotlight(self) -> bool {
        matches!(self, StepKind::Spotlight)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            StepKind::Welcome => "welcome",
            StepKind::Spotlight => "spotlight",
            StepKind::Center => "center",
            StepKind::Finish => "finish",
        }
    }
}

/// Side of the target the tooltip prefers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    #[default]
    Right,
    Left,
    Bottom,
    Top,
}

impl Side {
    /// Parse a side name. Unknown names fall back to [`Side::Right`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "left" => Side::Left,
            "bottom" => Side::Bottom,
            "top" => Side::Top,
            _ => Side::Right,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Side::Right => "right",
            Side::Left => "left",
            Side::Bottom => "bottom",
            Side::Top => "top",
        }
    }

    /// The horizontally mirrored side; vertical sides are unchanged.
    #[must_use]
    pub const fn mirrored(self) -> Self {
        match self {
            Side::Right => Side::Left,
            Side::Left => Side::Right,
            other => other,
        }
    }
}

/// Optional extra content. Purely presentational.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepExtras {
    Tips(&'static [&'static str]),
    /// `(key, description)` pairs.
    Shortcuts(&'static [(&'static str, &'static str)]),
}

/// One step of the tour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDescriptor {
    pub id: &'static str,
    pub kind: StepKind,
    /// Locator string, present exactly for spotlight steps.
    pub target: Option<&'static str>,
    pub preferred_side: Side,
    pub title: &'static str,
    pub body: &'static str,
    pub extras: Option<StepExtras>,
}

impl StepDescriptor {
    const fn untargeted(
        id: &'static str,
        kind: StepKind,
        title: &'static str,
        body: &'static str,
    ) -> Self {
        Self {
            id,
            kind,
            target: None,
            preferred_side: Side::Right,
            title,
            body,
            extras: None,
        }
    }

    #[must_use]
    pub const fn welcome(id: &'static str, title: &'static str, body: &'static str) -> Self {
        Self::untargeted(id, StepKind::Welcome, title, body)
    }

    #[must_use]
    pub const fn center(id: &'static str, title: &'static str, body: &'static str) -> Self {
        Self::untargeted(id, StepKind::Center, title, body)
    }

    #[must_use]
    pub const fn finish(id: &'static str, title: &'static str, body: &'static str) -> Self {
        Self::untargeted(id, StepKind::Finish, title, body)
    }

    #[must_use]
    pub const fn spotlight(
        id: &'static str,
        target: &'static str,
        title: &'static str,
        body: &'static str,
    ) -> Self {
        Self {
            id,
            kind: StepKind::Spotlight,
            target: Some(target),
            preferred_side: Side::Right,
            title,
            body,
            extras: None,
        }
    }

    /// Set the preferred tooltip side.
    #[must_use]
    pub const fn side(mut self, side: Side) -> Self {
        self.preferred_side = side;
        self
    }

    #[must_use]
    pub const fn with_tips(mut self, tips: &'static [&'static str]) -> Self {
        self.extras = Some(StepExtras::Tips(tips));
        self
    }

    #[must_use]
    pub const fn with_shortcuts(
        mut self,
        shortcuts: &'static [(&'static str, &'static str)],
    ) -> Self {
        self.extras = Some(StepExtras::Shortcuts(shortcuts));
        self
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let has_target = self.target.is_some_and(|t| !t.trim().is_empty());
        match (self.kind.is_spotlight(), has_target) {
            (true, false) => Err(CatalogError::MissingTarget {
                id: self.id.to_string(),
            }),
            (false, true) => Err(CatalogError::UnexpectedTarget {
                id: self.id.to_string(),
            }),
            // An empty-string target on a non-spotlight step is treated as none.
            _ => Ok(()),
        }
    }
}

/// Ordered, read-only sequence of steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepCatalog {
    steps: Vec<StepDescriptor>,
}

impl StepCatalog {
    /// Build a catalog, checking the target invariant and id uniqueness.
    pub fn new(steps: Vec<StepDescriptor>) -> Result<Self, CatalogError> {
        if steps.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::with_capacity(steps.len());
        for step in &steps {
            step.validate()?;
            if !seen.insert(step.id) {
                return Err(CatalogError::DuplicateId {
                    id: step.id.to_string(),
                });
            }
        }
        Ok(Self { steps })
    }

    /// The built-in tour of the thesis administration dashboard.
    #[must_use]
    pub fn thesis_dashboard() -> Self {
        Self {
            steps: THESIS_DASHBOARD_STEPS.to_vec(),
        }
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&StepDescriptor> {
        self.steps.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Index of the last step.
    #[must_use]
    pub fn last_index(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    /// Index of the step with the given id.
    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.steps.iter().position(|step| step.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StepDescriptor> {
        self.steps.iter()
    }
}

const WELCOME_TIPS: &[&str] = &[
    "Use the arrow keys to move between steps.",
    "Press Esc at any time to skip the tour.",
];

const SHORTCUTS: &[(&str, &str)] = &[
    ("Right / Enter", "Next step"),
    ("Left", "Previous step"),
    ("Esc", "Skip the tour"),
    ("r", "Replay the tour"),
];

const THESIS_DASHBOARD_STEPS: [StepDescriptor; 7] = [
    StepDescriptor::welcome(
        "welcome",
        "Welcome to the thesis office",
        "This short tour shows where topics, theses, defense councils and the \
         calendar live.",
    )
    .with_tips(WELCOME_TIPS),
    StepDescriptor::spotlight(
        "nav-topics",
        "[data-tour=nav-topics]",
        "Topics",
        "Lecturers publish thesis topics here. Approve or archive proposals \
         before registration opens.",
    ),
    StepDescriptor::spotlight(
        "nav-theses",
        "[data-tour=nav-theses]",
        "Theses",
        "Track every registered thesis, its supervisor, and its review status.",
    ),
    StepDescriptor::spotlight(
        "nav-councils",
        "[data-tour=nav-councils]",
        "Defense councils",
        "Assemble councils, assign reviewers, and publish the defense roster.",
    ),
    StepDescriptor::spotlight(
        "header-calendar",
        "[data-tour=header-calendar]",
        "Calendar",
        "Defense sessions and submission deadlines, grouped by day.",
    )
    .side(Side::Bottom),
    StepDescriptor::center(
        "shortcuts",
        "Keyboard shortcuts",
        "The tour and the dashboard are fully keyboard driven.",
    )
    .with_shortcuts(SHORTCUTS),
    StepDescriptor::finish(
        "finish",
        "You're all set",
        "Replay this tour from the help menu whenever you need a refresher.",
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_catalog_validates() {
        let catalog = StepCatalog::thesis_dashboard();
        assert_eq!(catalog.len(), 7);
        let rebuilt = StepCatalog::new(catalog.iter().cloned().collect()).expect("valid catalog");
        assert_eq!(rebuilt, catalog);
    }

    #[test]
    fn only_spotlight_steps_have_targets() {
        let catalog = StepCatalog::thesis_dashboard();
        for step in catalog.iter() {
            assert_eq!(step.kind.is_spotlight(), step.target.is_some(), "{}", step.id);
        }
    }

    #[test]
    fn built_in_catalog_opens_and_closes() {
        let catalog = StepCatalog::thesis_dashboard();
        assert_eq!(catalog.get(0).map(|s| s.kind), Some(StepKind::Welcome));
        assert_eq!(
            catalog.get(catalog.last_index()).map(|s| s.kind),
            Some(StepKind::Finish)
        );
        assert!(catalog.get(catalog.len()).is_none());
    }

    #[test]
    fn position_finds_ids() {
        let catalog = StepCatalog::thesis_dashboard();
        assert_eq!(catalog.position("welcome"), Some(0));
        assert_eq!(catalog.position("header-calendar"), Some(4));
        assert_eq!(catalog.position("missing"), None);
    }

    #[test]
    fn spotlight_without_target_is_rejected() {
        let mut step = StepDescriptor::spotlight("s", "#x", "S", "body");
        step.target = Some("  ");
        assert_eq!(
            StepCatalog::new(vec![step]),
            Err(CatalogError::MissingTarget { id: "s".into() })
        );
    }

    #[test]
    fn targeted_center_step_is_rejected() {
        let mut step = StepDescriptor::center("c", "C", "body");
        step.target = Some("#nav");
        assert_eq!(
            StepCatalog::new(vec![step]),
            Err(CatalogError::UnexpectedTarget { id: "c".into() })
        );
    }

    #[test]
    fn duplicate_ids_and_empty_are_rejected() {
        let a = StepDescriptor::welcome("dup", "A", "a");
        let b = StepDescriptor::finish("dup", "B", "b");
        assert_eq!(
            StepCatalog::new(vec![a, b]),
            Err(CatalogError::DuplicateId { id: "dup".into() })
        );
        assert_eq!(StepCatalog::new(Vec::new()), Err(CatalogError::Empty));
    }

    #[test]
    fn side_names_fall_back_to_right() {
        assert_eq!(Side::from_name("LEFT"), Side::Left);
        assert_eq!(Side::from_name(" top "), Side::Top);
        assert_eq!(Side::from_name("bottom"), Side::Bottom);
        assert_eq!(Side::from_name("diagonal"), Side::Right);
        assert_eq!(Side::from_name(""), Side::Right);
        assert_eq!(Side::default(), Side::Right);
    }

    #[test]
    fn mirrored_swaps_horizontal_sides_only() {
        assert_eq!(Side::Right.mirrored(), Side::Left);
        assert_eq!(Side::Left.mirrored(), Side::Right);
        assert_eq!(Side::Top.mirrored(), Side::Top);
    }
}
