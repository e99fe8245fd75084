//! Multi-session controller scenarios.
//!
//! These drive the controller through whole host lifecycles: mount, the
//! first-visit auto-show, walking the tour, unmount, and a later mount on
//! the same storage.

use std::time::{Duration, Instant};

use guidepost_core::event::{Event, KeyCode};
use guidepost_core::geometry::{Rect, Size};
use guidepost_engine::{
    Backdrop, CatalogError, MemoryPersistence, NullLocator, PersistenceError, PersistenceResult,
    Side, StaticLocator, StepCatalog, StepDescriptor, TooltipAnchor, TourConfig, TourController,
    TourEvent, TourPersistence,
};

const VIEWPORT: Size = Size::new(1024.0, 768.0);

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn mount(storage: MemoryPersistence, t0: Instant) -> TourController<MemoryPersistence> {
    let mut tour = TourController::new(
        StepCatalog::thesis_dashboard(),
        TourConfig::default(),
        storage,
        VIEWPORT,
    );
    tour.mount(t0);
    tour
}

/// Reads fine, then every write fails.
#[derive(Debug, Default)]
struct ReadOnlyPersistence {
    write_attempts: usize,
}

impl TourPersistence for ReadOnlyPersistence {
    fn name(&self) -> &str {
        "ReadOnlyPersistence"
    }

    fn read(&self, _key: &str) -> PersistenceResult<bool> {
        Ok(false)
    }

    fn write(&mut self, _key: &str, _value: bool) -> PersistenceResult<()> {
        self.write_attempts += 1;
        Err(PersistenceError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only",
        )))
    }
}

#[test]
fn completed_tour_stays_hidden_next_session() {
    let t0 = Instant::now();
    let mut first = mount(MemoryPersistence::new(), t0);
    assert_eq!(
        first.tick(t0 + ms(1000), &NullLocator),
        Some(TourEvent::Started { auto: true })
    );
    first.handle_event(&Event::key(KeyCode::Escape), t0 + ms(1500));
    first.unmount();
    let storage = first.into_persistence();
    assert_eq!(storage.get("onboarding_done"), Some(true));

    let t1 = t0 + Duration::from_secs(60);
    let mut second = mount(storage, t1);
    assert_eq!(second.time_until_deadline(t1), None);
    assert_eq!(second.tick(t1 + Duration::from_secs(5), &NullLocator), None);
    assert!(!second.is_visible());

    // An explicit restart still works and clears the marker.
    assert_eq!(second.restart(t1), TourEvent::Restarted);
    assert_eq!(second.persistence().get("onboarding_done"), None);
}

#[test]
fn unmount_before_auto_show_never_shows() {
    let t0 = Instant::now();
    let mut tour = mount(MemoryPersistence::new(), t0);
    tour.unmount();
    assert_eq!(tour.tick(t0 + ms(2000), &NullLocator), None);
    assert!(!tour.is_visible());
    assert_eq!(tour.persistence().write_count(), 0);
}

#[test]
fn write_failure_degrades_once_and_keeps_running() {
    let t0 = Instant::now();
    let mut tour = TourController::new(
        StepCatalog::thesis_dashboard(),
        TourConfig::default(),
        ReadOnlyPersistence::default(),
        VIEWPORT,
    );
    tour.mount(t0);
    assert!(tour.is_persistent());
    tour.start(t0);
    assert_eq!(tour.complete(), TourEvent::Completed { skipped: false });
    assert!(!tour.is_persistent());
    assert!(!tour.is_visible());

    // Non-persistent mode stops touching storage.
    tour.restart(t0);
    tour.skip();
    assert_eq!(tour.persistence().write_attempts, 1);
}

#[test]
fn settle_follows_latest_step_and_viewport() {
    let t0 = Instant::now();
    let mut tour = mount(MemoryPersistence::new(), t0);
    tour.start(t0);

    let mut locator = StaticLocator::new()
        .with("[data-tour=nav-topics]", Rect::new(0.0, 100.0, 200.0, 40.0))
        .with("[data-tour=header-calendar]", Rect::new(700.0, 10.0, 120.0, 40.0));

    tour.jump_to(1, t0);
    tour.jump_to(4, t0 + ms(50));
    tour.handle_event(&Event::resize(Size::new(900.0, 700.0)), t0 + ms(60));
    locator.insert("[data-tour=header-calendar]", Rect::new(600.0, 10.0, 120.0, 40.0));

    // Neither the first jump's deadline nor the second's fires on its own.
    assert_eq!(tour.tick(t0 + ms(150), &locator), None);
    assert_eq!(
        tour.tick(t0 + ms(210), &locator),
        Some(TourEvent::LayoutUpdated { step: 4 })
    );

    let layout = tour.layout().expect("layout");
    assert_eq!(layout.viewport, Size::new(900.0, 700.0));
    let placement = layout.anchor.placement().expect("placement");
    assert_eq!(placement.side, Side::Bottom);
    // Centered under the target, then clamped to the right margin.
    assert_eq!(placement.position.left, 900.0 - 480.0 - 20.0);
    assert_eq!(placement.position.top, 70.0);
}

#[test]
fn centered_steps_dim_the_whole_viewport() {
    let t0 = Instant::now();
    let mut tour = mount(MemoryPersistence::new(), t0);
    tour.start(t0);
    let shortcuts = tour.catalog().position("shortcuts").expect("shortcuts step");
    tour.jump_to(shortcuts, t0);
    tour.layout_ready(&NullLocator);

    let layout = tour.layout().expect("layout");
    assert!(layout.anchor.is_centered());
    assert_eq!(layout.backdrop, Backdrop::FullDim);

    tour.animate(ms(400));
    let overlay = tour.overlay().expect("overlay");
    assert!(overlay.dim_opacity > 0.0);
    assert!(overlay.glow.is_none());
}

#[test]
fn terminal_preset_places_in_cells() {
    let t0 = Instant::now();
    let steps = vec![
        StepDescriptor::welcome("hello", "Hello", "A short tour."),
        StepDescriptor::spotlight("list", "#list", "List", "Your items live here."),
    ];
    let catalog = StepCatalog::new(steps).expect("valid catalog");
    let mut tour = TourController::new(
        catalog,
        TourConfig::terminal(),
        MemoryPersistence::new(),
        Size::new(80.0, 24.0),
    );
    tour.start(t0);
    tour.next(t0);
    let locator = StaticLocator::new().with("#list", Rect::new(0.0, 3.0, 20.0, 10.0));
    tour.layout_ready(&locator);

    match tour.layout().map(|l| l.anchor) {
        Some(TooltipAnchor::Positioned(placement)) => {
            assert_eq!(placement.side, Side::Right);
            assert_eq!(placement.position.left, 22.0);
        }
        other => panic!("expected positioned anchor, got {other:?}"),
    }
}

#[test]
fn invalid_catalogs_are_rejected() {
    assert_eq!(StepCatalog::new(Vec::new()), Err(CatalogError::Empty));
    let dup = vec![
        StepDescriptor::welcome("a", "t", "b"),
        StepDescriptor::finish("a", "t", "b"),
    ];
    assert!(matches!(
        StepCatalog::new(dup),
        Err(CatalogError::DuplicateId { .. })
    ));
}
