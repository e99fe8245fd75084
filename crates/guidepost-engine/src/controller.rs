#![forbid(unsafe_code)]

//! Tour controller: binds input, timers, storage, and measurement.
//!
//! The controller owns the [`TourState`] of one mounted host view. Hosts
//! feed it three kinds of input:
//!
//! - [`handle_event`](TourController::handle_event) for keys and resizes
//! - [`tick`](TourController::tick) with the current time and a [`Locator`],
//!   which fires due timers and measures the target once it has settled
//! - [`layout_ready`](TourController::layout_ready) when the host knows its
//!   layout is stable and wants the measurement immediately
//!
//! # Lifecycle
//!
//! ```text
//! mount ──► (marker unset) ──auto_show_delay──► visible ──next/prev──► ...
//!   │                                             │
//!   └─► (marker set) ── restart ──────────────────┘
//!                                                 │
//!                      last next / Esc ──► complete (marker written)
//! unmount: all timers cancelled, state reset
//! ```
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | Storage read/write fails | Non-persistent mode, tour reappears next session |
//! | Target not found | Tooltip centered, no mask |
//! | Step change during pending settle | Older measurement superseded |

use std::time::{Duration, Instant};

use guidepost_core::event::{Event, KeyCode};
use guidepost_core::geometry::{Rect, Size};
use guidepost_core::{debug, debug_span, info, trace};

use crate::catalog::{StepCatalog, StepDescriptor};
use crate::config::TourConfig;
use crate::error::PersistenceError;
use crate::locator::Locator;
use crate::mask::{Backdrop, Glow, HighlightMask};
use crate::persistence::TourPersistence;
use crate::placement::{TooltipAnchor, resolve_anchor};
use crate::settle::{DeferredTimer, SettleReason, SettleTimer};
use crate::state::{Advance, TourState};

/// Why the current step changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourAdvanceReason {
    ManualNext,
    ManualPrev,
    Jump,
}

/// Observable transitions, returned to the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TourEvent {
    /// The tour became visible at step 0.
    Started {
        /// Shown by the first-visit timer rather than an explicit call.
        auto: bool,
    },
    StepChanged {
        from: usize,
        to: usize,
        reason: TourAdvanceReason,
    },
    /// The tour was hidden and marked completed.
    Completed {
        /// Dismissed before the last step.
        skipped: bool,
    },
    /// Marker cleared and tour shown again from step 0.
    Restarted,
    /// A fresh layout was measured for `step`.
    LayoutUpdated { step: usize },
}

/// Measured render description for the current step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TourLayout {
    pub step_index: usize,
    pub viewport: Size,
    /// Located target, if any.
    pub target: Option<Rect>,
    pub anchor: TooltipAnchor,
    pub backdrop: Backdrop,
}

/// Everything a host needs to draw the visible tour.
#[derive(Debug, Clone, Copy)]
pub struct TourOverlay<'a> {
    pub step: &'a StepDescriptor,
    pub step_index: usize,
    pub step_count: usize,
    /// `None` until the target has settled and been measured.
    pub layout: Option<&'a TourLayout>,
    pub dim_opacity: f32,
    pub glow: Option<Glow>,
}

impl TourOverlay<'_> {
    #[must_use]
    pub fn is_first(&self) -> bool {
        self.step_index == 0
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.step_index + 1 >= self.step_count
    }
}

/// Drives one tour session for a mounted host view.
#[derive(Debug)]
pub struct TourController<P: TourPersistence> {
    catalog: StepCatalog,
    config: TourConfig,
    persistence: P,
    /// Cleared after the first storage failure.
    persistent: bool,
    state: TourState,
    mounted: bool,
    viewport: Size,
    measured_tooltip_height: Option<f64>,
    settle: SettleTimer,
    auto_show: DeferredTimer<()>,
    mask: HighlightMask,
    layout: Option<TourLayout>,
}

impl<P: TourPersistence> TourController<P> {
    #[must_use]
    pub fn new(catalog: StepCatalog, config: TourConfig, persistence: P, viewport: Size) -> Self {
        let mask = HighlightMask::new(config.mask_style(), config.glow_frequency_hz, config.fade_in);
        Self {
            catalog,
            config,
            persistence,
            persistent: true,
            state: TourState::default(),
            mounted: false,
            viewport,
            measured_tooltip_height: None,
            settle: SettleTimer::new(),
            auto_show: DeferredTimer::new(),
            mask,
            layout: None,
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────────────

    /// Attach to a host view: read the marker and arm auto-show if unset.
    pub fn mount(&mut self, now: Instant) {
        self.mounted = true;
        let completed = match self.persistence.read(&self.config.storage_key) {
            Ok(done) => done,
            Err(err) => {
                self.degrade(&err);
                false
            }
        };
        self.state = TourState::new(completed);
        if !completed {
            self.auto_show.schedule(now, self.config.auto_show_delay, ());
        }
        debug!(
            backend = self.persistence.name(),
            completed,
            persistent = self.persistent,
            "tour mounted"
        );
    }

    /// Detach from the host view: cancel timers and reset all state.
    pub fn unmount(&mut self) {
        self.settle.cancel();
        self.auto_show.cancel();
        self.mask.clear();
        self.layout = None;
        self.state = TourState::default();
        self.mounted = false;
        debug!("tour unmounted");
    }

    // ── Operations ───────────────────────────────────────────────────────

    /// Show the tour from the first step.
    pub fn start(&mut self, now: Instant) -> TourEvent {
        self.begin(now);
        info!(steps = self.catalog.len(), "tour started");
        TourEvent::Started { auto: false }
    }

    /// Advance one step, completing the tour from the last step.
    pub fn next(&mut self, now: Instant) -> TourEvent {
        match self.state.advance(self.catalog.len()) {
            Advance::Moved { from, to } => {
                self.on_step_changed(now);
                TourEvent::StepChanged {
                    from,
                    to,
                    reason: TourAdvanceReason::ManualNext,
                }
            }
            Advance::Completed => self.finish(false),
        }
    }

    /// Go back one step; no-op on the first step.
    pub fn prev(&mut self, now: Instant) -> Option<TourEvent> {
        let (from, to) = self.state.retreat()?;
        self.on_step_changed(now);
        Some(TourEvent::StepChanged {
            from,
            to,
            reason: TourAdvanceReason::ManualPrev,
        })
    }

    /// Jump to a step, clamped to the catalog.
    pub fn jump_to(&mut self, index: usize, now: Instant) -> Option<TourEvent> {
        let (from, to) = self.state.jump_to(index, self.catalog.len())?;
        self.on_step_changed(now);
        Some(TourEvent::StepChanged {
            from,
            to,
            reason: TourAdvanceReason::Jump,
        })
    }

    /// Hide the tour and write the durable marker.
    pub fn complete(&mut self) -> TourEvent {
        self.finish(false)
    }

    /// Dismiss the tour early. Persists exactly like [`complete`](Self::complete).
    pub fn skip(&mut self) -> TourEvent {
        self.finish(true)
    }

    /// Clear the durable marker and show the tour from the first step.
    pub fn restart(&mut self, now: Instant) -> TourEvent {
        self.store_marker(false);
        self.state.restart();
        self.begin(now);
        info!("tour restarted");
        TourEvent::Restarted
    }

    // ── Host input ───────────────────────────────────────────────────────

    /// Route a host event. Keys are only claimed while the tour is visible.
    pub fn handle_event(&mut self, event: &Event, now: Instant) -> Option<TourEvent> {
        match event {
            Event::Key(key) if self.state.is_visible() && key.is_actionable() => match key.code {
                KeyCode::Right | KeyCode::Enter => Some(self.next(now)),
                KeyCode::Left => self.prev(now),
                KeyCode::Escape => Some(self.skip()),
                _ => None,
            },
            Event::Resize { width, height } => {
                self.viewport = Size::new(*width, *height);
                if self.state.is_visible() {
                    self.settle
                        .schedule(now, self.config.resize_settle_delay, SettleReason::Resize);
                }
                None
            }
            _ => None,
        }
    }

    /// Fire due timers. Measures the current target when the settle timer
    /// elapses.
    pub fn tick(&mut self, now: Instant, locator: &dyn Locator) -> Option<TourEvent> {
        if self.auto_show.poll(now).is_some()
            && self.mounted
            && !self.state.is_visible()
            && !self.state.is_completed()
        {
            self.begin(now);
            info!("tour auto-shown for first visit");
            return Some(TourEvent::Started { auto: true });
        }
        let reason = self.settle.poll(now)?;
        if !self.state.is_visible() {
            return None;
        }
        trace!(reason = reason.as_str(), "settle timer fired");
        Some(self.measure(locator))
    }

    /// The host's layout is stable: measure now instead of waiting for the
    /// settle timer.
    pub fn layout_ready(&mut self, locator: &dyn Locator) -> Option<TourEvent> {
        if !self.state.is_visible() {
            return None;
        }
        self.settle.cancel();
        Some(self.measure(locator))
    }

    /// Advance mask animations by the frame delta.
    pub fn animate(&mut self, dt: Duration) {
        if self.state.is_visible() {
            self.mask.tick(dt);
        }
    }

    /// Report the tooltip's rendered height, replacing the estimate used for
    /// centering and `Top` placement. `None` restores the estimate.
    pub fn set_tooltip_height(&mut self, height: Option<f64>) {
        self.measured_tooltip_height = height.filter(|h| h.is_finite() && *h >= 0.0);
    }

    /// Earliest pending deadline, for hosts that block on input.
    #[must_use]
    pub fn time_until_deadline(&self, now: Instant) -> Option<Duration> {
        match (self.settle.time_until(now), self.auto_show.time_until(now)) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    // ── Accessors ────────────────────────────────────────────────────────

    #[must_use]
    pub fn state(&self) -> &TourState {
        &self.state
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.state.is_visible()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.state.current_index()
    }

    #[must_use]
    pub fn current_step(&self) -> Option<&StepDescriptor> {
        self.catalog.get(self.state.current_index())
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Whether storage is still in use (no failure seen this session).
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    #[must_use]
    pub fn is_settling(&self) -> bool {
        self.settle.is_pending()
    }

    #[must_use]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Last measured layout for the current step.
    #[must_use]
    pub fn layout(&self) -> Option<&TourLayout> {
        self.layout.as_ref()
    }

    #[must_use]
    pub fn mask(&self) -> &HighlightMask {
        &self.mask
    }

    #[must_use]
    pub fn catalog(&self) -> &StepCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn config(&self) -> &TourConfig {
        &self.config
    }

    #[must_use]
    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Give up the controller and keep its storage, e.g. to mount a later
    /// session on the same backend.
    #[must_use]
    pub fn into_persistence(self) -> P {
        self.persistence
    }

    /// Render description of the visible tour.
    #[must_use]
    pub fn overlay(&self) -> Option<TourOverlay<'_>> {
        if !self.state.is_visible() {
            return None;
        }
        let step = self.current_step()?;
        Some(TourOverlay {
            step,
            step_index: self.state.current_index(),
            step_count: self.catalog.len(),
            layout: self.layout.as_ref(),
            dim_opacity: self.mask.dim_opacity(),
            glow: self.mask.glow(),
        })
    }

    // ── Internals ────────────────────────────────────────────────────────

    fn begin(&mut self, now: Instant) {
        self.auto_show.cancel();
        self.state.start();
        self.on_step_changed(now);
    }

    fn on_step_changed(&mut self, now: Instant) {
        // The previous step's layout must not be drawn with the new content.
        self.layout = None;
        self.settle
            .schedule(now, self.config.step_settle_delay, SettleReason::StepChange);
        debug!(
            step = self.state.current_index(),
            generation = self.settle.generation(),
            "tour step scheduled for measurement"
        );
    }

    fn finish(&mut self, skipped: bool) -> TourEvent {
        self.state.complete();
        self.store_marker(true);
        self.settle.cancel();
        self.auto_show.cancel();
        self.mask.clear();
        self.layout = None;
        info!(
            skipped,
            step = self.state.current_index(),
            "tour completed"
        );
        TourEvent::Completed { skipped }
    }

    fn measure(&mut self, locator: &dyn Locator) -> TourEvent {
        let index = self.state.current_index();
        let span = debug_span!("tour.measure", step = index);
        let _guard = span.enter();

        let Some(step) = self.catalog.get(index) else {
            return TourEvent::LayoutUpdated { step: index };
        };
        let target = step.target.and_then(|selector| locator.find(selector));
        if step.kind.is_spotlight() && target.is_none() {
            debug!(step = step.id, "tour target not found, centering tooltip");
        }

        let mut metrics = self.config.placement_metrics();
        if let Some(height) = self.measured_tooltip_height {
            metrics = metrics.with_tooltip_height(height);
        }
        let anchor = resolve_anchor(step, target, self.viewport, &metrics);
        self.mask.update(step, target, self.viewport);
        self.layout = Some(TourLayout {
            step_index: index,
            viewport: self.viewport,
            target,
            anchor,
            backdrop: *self.mask.backdrop(),
        });
        trace!(step = step.id, centered = anchor.is_centered(), "tour layout updated");
        TourEvent::LayoutUpdated { step: index }
    }

    fn store_marker(&mut self, value: bool) {
        if !self.persistent {
            return;
        }
        if let Err(err) = self.persistence.write(&self.config.storage_key, value) {
            self.degrade(&err);
        }
    }

    fn degrade(&mut self, err: &PersistenceError) {
        self.persistent = false;
        debug!(
            backend = self.persistence.name(),
            error = %err,
            "tour storage unavailable, continuing without persistence"
        );
    }
}
