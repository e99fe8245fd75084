#![forbid(unsafe_code)]

//! Demo application state and main loop.

use std::io;
use std::time::{Duration, Instant};

use guidepost_core::event::{Event, KeyCode};
use guidepost_core::geometry::Size;
use guidepost_engine::{
    FilePersistence, MemoryPersistence, StaticLocator, StepCatalog, TourConfig, TourController,
    TourEvent, TourPersistence,
};
use tracing::{debug, info};

use crate::canvas::Canvas;
use crate::cli::Opts;
use crate::dashboard::DashboardLayout;
use crate::overlay;
use crate::session::TerminalSession;

/// Redraw cadence while animations run.
const FRAME_INTERVAL: Duration = Duration::from_millis(50);
const APP_NAME: &str = "guidepost-demo";

pub struct App<P: TourPersistence> {
    tour: TourController<P>,
    locator: StaticLocator,
    dashboard: DashboardLayout,
    canvas: Canvas,
    last_tick: Instant,
    /// Tooltip height last reported to the tour.
    tooltip_height: Option<f64>,
    should_quit: bool,
}

impl<P: TourPersistence> App<P> {
    pub fn new(tour: TourController<P>, now: Instant) -> Self {
        let viewport = tour.viewport();
        let mut app = Self {
            tour,
            locator: StaticLocator::new(),
            dashboard: DashboardLayout::compute(viewport),
            canvas: Canvas::from_size(viewport),
            last_tick: now,
            tooltip_height: None,
            should_quit: false,
        };
        app.dashboard.register(&mut app.locator);
        app
    }

    /// Mount the tour, optionally replaying it right away.
    pub fn start(&mut self, now: Instant, restart: bool) {
        self.tour.mount(now);
        if restart {
            let event = self.tour.restart(now);
            self.on_tour_event(event);
        }
    }

    pub fn handle_event(&mut self, event: &Event, now: Instant) {
        if let Event::Resize { width, height } = *event {
            self.relayout(Size::new(width, height));
        }
        if let Some(tour_event) = self.tour.handle_event(event, now) {
            self.on_tour_event(tour_event);
            return;
        }
        let Event::Key(key) = event else {
            return;
        };
        if !key.is_actionable() {
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('c') if key.ctrl() => self.should_quit = true,
            KeyCode::Char('r') => {
                let tour_event = self.tour.restart(now);
                self.on_tour_event(tour_event);
            }
            _ => {}
        }
    }

    /// Fire tour timers and advance animations.
    pub fn tick(&mut self, now: Instant) {
        if let Some(event) = self.tour.tick(now, &self.locator) {
            self.on_tour_event(event);
        }
        self.tour
            .animate(now.saturating_duration_since(self.last_tick));
        self.last_tick = now;
    }

    /// Draw the dashboard and, when visible, the tour on top.
    ///
    /// When the drawn tooltip height differs from the one the tour last
    /// placed with, the tour is re-measured and the frame redrawn.
    pub fn render(&mut self) -> &Canvas {
        let measured = self.draw_frame();
        if measured.is_some() && measured != self.tooltip_height {
            self.tooltip_height = measured;
            self.tour.set_tooltip_height(measured);
            if self.tour.layout_ready(&self.locator).is_some() {
                self.draw_frame();
            }
        }
        &self.canvas
    }

    fn draw_frame(&mut self) -> Option<f64> {
        self.canvas.clear();
        self.dashboard.draw(&mut self.canvas);
        let width = self.tour.config().tooltip_width;
        match self.tour.overlay() {
            Some(tour_overlay) => overlay::draw(&mut self.canvas, &tour_overlay, width),
            None => None,
        }
    }

    /// How long the loop may block waiting for input.
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        let deadline = self.tour.time_until_deadline(now);
        if self.tour.is_visible() {
            deadline.map_or(FRAME_INTERVAL, |d| d.min(FRAME_INTERVAL))
        } else {
            deadline.unwrap_or(Duration::from_secs(1))
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn tour(&self) -> &TourController<P> {
        &self.tour
    }

    pub fn tooltip_height(&self) -> Option<f64> {
        self.tooltip_height
    }

    pub fn shutdown(&mut self) {
        self.tour.unmount();
    }

    fn relayout(&mut self, viewport: Size) {
        self.canvas = Canvas::from_size(viewport);
        self.dashboard = DashboardLayout::compute(viewport);
        self.dashboard.register(&mut self.locator);
    }

    fn on_tour_event(&mut self, event: TourEvent) {
        debug!(?event, "tour event");
        match event {
            // The dashboard lays out synchronously, so measure right away
            // instead of waiting out the settle delay.
            TourEvent::Started { .. } | TourEvent::StepChanged { .. } | TourEvent::Restarted => {
                self.tour.layout_ready(&self.locator);
            }
            TourEvent::Completed { skipped } => {
                info!(skipped, "onboarding finished");
            }
            TourEvent::LayoutUpdated { .. } => {}
        }
    }
}

fn load_config(opts: &Opts) -> io::Result<TourConfig> {
    let mut config = TourConfig::terminal();
    if let Some(path) = &opts.config_file {
        config = TourConfig::from_json_file(config, path).map_err(io::Error::other)?;
    }
    config.apply_env_overrides();
    Ok(config)
}

fn open_persistence(opts: &Opts) -> Box<dyn TourPersistence> {
    if !opts.persist {
        return Box::new(MemoryPersistence::new());
    }
    match &opts.state_file {
        Some(path) => Box::new(FilePersistence::new(path)),
        None => Box::new(FilePersistence::default_for_app(APP_NAME)),
    }
}

/// Run the demo until the user quits.
pub fn run(opts: &Opts) -> io::Result<()> {
    let config = load_config(opts)?;
    let persistence = open_persistence(opts);
    info!(backend = persistence.name(), "starting demo");

    let session = TerminalSession::new()?;
    let started = Instant::now();
    let tour = TourController::new(
        StepCatalog::thesis_dashboard(),
        config,
        persistence,
        session.size()?,
    );
    let mut app = App::new(tour, started);
    app.start(started, opts.restart);

    let exit_after = (opts.exit_after_ms > 0).then(|| Duration::from_millis(opts.exit_after_ms));
    let mut stdout = io::stdout();
    loop {
        let now = Instant::now();
        app.tick(now);
        app.render().flush(&mut stdout)?;
        if app.should_quit() {
            break;
        }
        if exit_after.is_some_and(|limit| now.duration_since(started) >= limit) {
            break;
        }
        if session.poll_event(app.poll_timeout(now))?
            && let Some(event) = session.read_event()?
        {
            app.handle_event(&event, Instant::now());
        }
    }

    app.shutdown();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use guidepost_core::event::{KeyEvent, Modifiers};
    use guidepost_engine::TooltipAnchor;
    use guidepost_engine::placement::resolve_anchor;

    fn demo_app(now: Instant) -> App<MemoryPersistence> {
        let tour = TourController::new(
            StepCatalog::thesis_dashboard(),
            TourConfig::terminal(),
            MemoryPersistence::new(),
            Size::new(80.0, 24.0),
        );
        App::new(tour, now)
    }

    #[test]
    fn restart_flag_shows_tour_measured() {
        let t0 = Instant::now();
        let mut app = demo_app(t0);
        app.start(t0, true);
        assert!(app.tour().is_visible());
        assert!(app.tour().layout().is_some());
    }

    #[test]
    fn arrow_keys_measure_immediately() {
        let t0 = Instant::now();
        let mut app = demo_app(t0);
        app.start(t0, true);
        app.handle_event(&Event::key(KeyCode::Right), t0);
        let layout = app.tour().layout().expect("measured");
        assert_eq!(layout.step_index, 1);
        assert!(matches!(layout.anchor, TooltipAnchor::Positioned(_)));
        assert!(!app.tour().is_settling());
    }

    #[test]
    fn quit_keys() {
        let t0 = Instant::now();
        let mut app = demo_app(t0);
        app.handle_event(&Event::key(KeyCode::Char('q')), t0);
        assert!(app.should_quit());

        let mut app = demo_app(t0);
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c')).with_modifiers(Modifiers::CTRL));
        app.handle_event(&ctrl_c, t0);
        assert!(app.should_quit());
    }

    #[test]
    fn replay_key_restarts_after_completion() {
        let t0 = Instant::now();
        let mut app = demo_app(t0);
        app.start(t0, true);
        app.handle_event(&Event::key(KeyCode::Escape), t0);
        assert!(!app.tour().is_visible());
        app.handle_event(&Event::key(KeyCode::Char('r')), t0);
        assert!(app.tour().is_visible());
        assert_eq!(app.tour().current_index(), 0);
    }

    #[test]
    fn resize_remeasures_after_settle() {
        let t0 = Instant::now();
        let mut app = demo_app(t0);
        app.start(t0, true);
        app.handle_event(&Event::key(KeyCode::Right), t0);
        app.handle_event(&Event::resize(Size::new(100.0, 30.0)), t0);
        assert!(app.tour().is_settling());
        app.tick(t0 + Duration::from_millis(150));
        assert_eq!(
            app.tour().layout().map(|l| l.viewport),
            Some(Size::new(100.0, 30.0))
        );
    }

    #[test]
    fn render_feeds_back_tooltip_height() {
        let t0 = Instant::now();
        let mut app = demo_app(t0);
        app.start(t0, true);
        app.tick(t0 + Duration::from_millis(500));
        let canvas = app.render();
        let text: String = (0..24).map(|y| canvas.row_text(y)).collect();
        assert!(text.contains("Welcome"));
    }

    #[test]
    fn step_change_is_placed_with_its_own_tooltip_height() {
        let t0 = Instant::now();
        let mut app = demo_app(t0);
        app.start(t0, true);
        app.render();
        let welcome_height = app.tooltip_height().expect("welcome drawn");

        // Measured on the key press, before the new tooltip was drawn.
        app.handle_event(&Event::key(KeyCode::Right), t0);
        app.render();
        let height = app.tooltip_height().expect("step drawn");
        assert_ne!(height, welcome_height);

        let tour = app.tour();
        let layout = tour.layout().expect("measured");
        assert_eq!(layout.step_index, 1);
        let step = tour.current_step().expect("step");
        let metrics = tour.config().placement_metrics().with_tooltip_height(height);
        let expected = resolve_anchor(step, layout.target, layout.viewport, &metrics);
        assert_eq!(layout.anchor, expected);
    }

    #[test]
    fn unchanged_tooltip_height_is_not_remeasured() {
        let t0 = Instant::now();
        let mut app = demo_app(t0);
        app.start(t0, true);
        app.render();
        let first = app.tooltip_height();
        app.render();
        assert_eq!(app.tooltip_height(), first);
        assert!(app.tour().layout().is_some());
    }

    #[test]
    fn poll_timeout_tracks_auto_show() {
        let t0 = Instant::now();
        let mut app = demo_app(t0);
        app.start(t0, false);
        assert_eq!(app.poll_timeout(t0), Duration::from_millis(1000));
    }
}
