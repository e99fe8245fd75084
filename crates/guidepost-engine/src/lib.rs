#![forbid(unsafe_code)]

//! Guidepost tour engine
//!
//! A first-visit walkthrough that highlights parts of a host view one step
//! at a time. The engine is host-agnostic: it never draws and never touches
//! the host's widget tree. Hosts supply a [`Locator`] to measure targets and
//! a [`TourPersistence`] backend for the durable "completed" marker, then
//! render the [`TourOverlay`] the controller describes.
//!
//! # Key Components
//!
//! - [`StepCatalog`] - ordered, validated step descriptors
//! - [`TourController`] - input, timers, storage, and measurement
//! - [`placement`] - pure tooltip placement solver
//! - [`HighlightMask`] - dimmed backdrop with a glowing cut-out
//! - [`TourConfig`] - tunables with env and JSON overrides
//!
//! # Example
//!
//! ```
//! use std::time::{Duration, Instant};
//! use guidepost_core::geometry::Size;
//! use guidepost_engine::{
//!     MemoryPersistence, NullLocator, StepCatalog, TourConfig, TourController, TourEvent,
//! };
//!
//! let t0 = Instant::now();
//! let mut tour = TourController::new(
//!     StepCatalog::thesis_dashboard(),
//!     TourConfig::default(),
//!     MemoryPersistence::new(),
//!     Size::new(1024.0, 768.0),
//! );
//! tour.mount(t0);
//! let event = tour.tick(t0 + Duration::from_secs(1), &NullLocator);
//! assert_eq!(event, Some(TourEvent::Started { auto: true }));
//! ```

pub mod catalog;
pub mod config;
pub mod controller;
pub mod error;
pub mod locator;
pub mod mask;
pub mod persistence;
pub mod placement;
pub mod settle;
pub mod state;

pub use catalog::{Side, StepCatalog, StepDescriptor, StepExtras, StepKind};
pub use config::{DEFAULT_STORAGE_KEY, TourConfig};
pub use controller::{TourAdvanceReason, TourController, TourEvent, TourLayout, TourOverlay};
pub use error::{CatalogError, PersistenceError, PersistenceResult};
pub use locator::{Locator, NullLocator, StaticLocator};
pub use mask::{Backdrop, Glow, HighlightMask, MaskGeometry, MaskStyle};
#[cfg(feature = "file-persistence")]
pub use persistence::FilePersistence;
pub use persistence::{DisabledPersistence, MemoryPersistence, TourPersistence};
pub use placement::{Placement, PlacementMetrics, TooltipAnchor, TooltipPosition};
pub use settle::{DeferredTimer, SettleReason, SettleTimer};
pub use state::{Advance, TourState};
