use anyhow::Result;
use ratatui::layout::{Position, Rect};

use marquee_core::{
    AppConfig, Clock, LoopAnimator, RunState, Snapshot, SystemClock, Track,
};

use crate::input::Action;
use crate::theme::Theme;

/// Lowest velocity `Action::Accelerate` can reach
pub const MIN_VELOCITY: f64 = 1.0;

/// Narrowest card that still fits its frame and one label cell
pub const MIN_CARD_WIDTH: u16 = 4;

/// Widest card `Action::Widen` can reach
pub const MAX_CARD_WIDTH: u16 = 64;

/// Why the strip is currently stopped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Holds {
    /// Pointer is over the strip
    pub hover: bool,
    /// Paused from the keyboard
    pub manual: bool,
}

impl Holds {
    pub fn any(&self) -> bool {
        self.hover || self.manual
    }
}

/// Carousel application state
pub struct App<C: Clock + Clone = SystemClock> {
    pub config: AppConfig,
    pub theme: Theme,
    pub track: Track<String>,
    pub animator: LoopAnimator<C>,
    clock: C,
    /// Card width the track is currently measured with
    card_width: u16,
    pub holds: Holds,
    /// Area the strip occupied in the last frame, for hover hit-testing
    pub carousel_area: Rect,
    /// Slot under the pointer, highlighted by the carousel widget
    pub hovered_slot: Option<usize>,
    pub status_message: Option<String>,
    pub should_quit: bool,
}

impl App<SystemClock> {
    pub fn new(config: AppConfig) -> Result<Self> {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock + Clone> App<C> {
    pub fn with_clock(config: AppConfig, clock: C) -> Result<Self> {
        config.validate()?;
        let carousel = &config.carousel;
        let track = Track::uniform(
            carousel.items.clone(),
            f64::from(carousel.card_width),
            f64::from(carousel.card_gap),
        );

        let initial = if carousel.start_paused {
            RunState::Paused
        } else {
            RunState::Running
        };
        let animator = LoopAnimator::new(clock.clone(), track.period()?, carousel.velocity, initial)?;
        let holds = Holds {
            hover: false,
            manual: carousel.start_paused,
        };
        let card_width = carousel.card_width;

        Ok(Self {
            config,
            theme: Theme::default(),
            track,
            animator,
            clock,
            card_width,
            holds,
            carousel_area: Rect::default(),
            hovered_slot: None,
            status_message: None,
            should_quit: false,
        })
    }

    /// Advance the loop to now; call once per frame
    pub fn update_animation(&mut self) -> Result<f64> {
        Ok(self.animator.tick()?)
    }

    /// Offset to draw with
    pub fn offset(&self) -> f64 {
        self.animator.current_offset().unwrap_or(0.0)
    }

    pub fn snapshot(&self) -> Option<Snapshot> {
        self.animator.snapshot().ok()
    }

    /// Whether the next frame needs the animation frame rate
    pub fn needs_animation(&self) -> bool {
        matches!(self.animator.state(), Ok(RunState::Running))
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Apply an input action
    pub fn apply(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Quit => self.should_quit = true,
            Action::TogglePause => {
                self.holds.manual = !self.holds.manual;
                self.sync_holds()?;
                self.set_status(if self.holds.manual { "Paused" } else { "Resumed" });
            }
            Action::Accelerate(delta) => {
                let velocity = (self.animator.velocity() + delta).max(MIN_VELOCITY);
                self.rebuild(velocity, self.offset(), self.animator.wraps())?;
                self.set_status(format!("Velocity: {velocity:.1} cells/s"));
            }
            Action::Widen(delta) => {
                let card_width = self
                    .card_width
                    .saturating_add_signed(delta)
                    .clamp(MIN_CARD_WIDTH, MAX_CARD_WIDTH);
                self.config.carousel.card_width = card_width;
                self.resize_track(card_width)?;
                self.set_status(format!("Card width: {card_width} cells"));
            }
            Action::Reset => {
                self.rebuild(self.animator.velocity(), 0.0, 0)?;
                self.set_status("Reset to start");
            }
            Action::None => {}
        }
        Ok(())
    }

    /// Pointer moved; pauses while it is over the strip
    pub fn on_mouse_move(&mut self, column: u16, row: u16) -> Result<()> {
        let inside = self.carousel_area.contains(Position::new(column, row));
        self.hovered_slot = if inside {
            // Same whole-cell offset the strip is drawn with
            let position = f64::from(column - self.carousel_area.x) - self.offset().floor();
            self.track.item_at(position).map(|(slot, _)| slot)
        } else {
            None
        };

        if self.config.carousel.pause_on_hover && inside != self.holds.hover {
            self.holds.hover = inside;
            self.sync_holds()?;
        }
        Ok(())
    }

    /// Pointer left the terminal entirely
    pub fn on_pointer_left(&mut self) -> Result<()> {
        self.hovered_slot = None;
        if self.holds.hover {
            self.holds.hover = false;
            self.sync_holds()?;
        }
        Ok(())
    }

    /// Terminal resized; cards shrink to fit a narrow terminal
    pub fn on_resize(&mut self, width: u16) -> Result<()> {
        let card_width = self.config.carousel.card_width.min(width.saturating_sub(2));
        self.resize_track(card_width)
    }

    /// Card width the track is currently measured with
    pub fn card_width(&self) -> u16 {
        self.card_width
    }

    /// Re-measure the track with a new card width
    ///
    /// The animator is disposed and rebuilt on the new period at the same
    /// fraction of the loop, so the strip keeps its place.
    pub fn resize_track(&mut self, card_width: u16) -> Result<()> {
        let card_width = card_width.max(MIN_CARD_WIDTH);
        if card_width == self.card_width {
            return Ok(());
        }

        let old_period = self.track.period()?;
        let offset = self.offset();
        let track = Track::uniform(
            self.track.items().to_vec(),
            f64::from(card_width),
            f64::from(self.config.carousel.card_gap),
        );
        let new_period = track.period()?;

        self.track = track;
        self.card_width = card_width;
        self.hovered_slot = None;
        self.rebuild(
            self.animator.velocity(),
            offset * new_period / old_period,
            self.animator.wraps(),
        )?;
        tracing::debug!(card_width, old_period, new_period, "Track re-measured");
        Ok(())
    }

    /// Record where the strip was drawn
    pub fn set_carousel_area(&mut self, area: Rect) {
        self.carousel_area = area;
    }

    fn sync_holds(&mut self) -> Result<()> {
        if self.holds.any() {
            self.animator.pause()?;
        } else {
            self.animator.resume()?;
        }
        Ok(())
    }

    /// Replace the animator, keeping the run state
    fn rebuild(&mut self, velocity: f64, offset: f64, wraps: u64) -> Result<()> {
        let state = self.animator.state()?;
        let animator = LoopAnimator::new(self.clock.clone(), self.track.period()?, velocity, state)?
            .with_offset(offset)
            .with_wraps(wraps);
        self.animator.dispose()?;
        self.animator = animator;
        tracing::debug!(velocity, offset, "Carousel animator rebuilt");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_core::ManualClock;

    fn app() -> (ManualClock, App<ManualClock>) {
        let clock = ManualClock::new();
        let mut config = AppConfig::default();
        config.carousel.velocity = 10.0;
        let mut app = App::with_clock(config, clock.clone()).unwrap();
        app.set_carousel_area(Rect::new(0, 2, 80, 5));
        (clock, app)
    }

    #[test]
    fn test_period_from_config() {
        let (_clock, app) = app();
        // 10 cards of 18 cells plus 2-cell gaps
        assert_eq!(app.animator.period(), 200.0);
        assert!(app.needs_animation());
    }

    #[test]
    fn test_hover_pauses_and_leave_resumes() {
        let (clock, mut app) = app();
        clock.advance_secs(1.0);
        app.update_animation().unwrap();

        app.on_mouse_move(10, 3).unwrap();
        assert_eq!(app.animator.state().unwrap(), RunState::Paused);
        let frozen = app.offset();

        clock.advance_secs(3.0);
        assert_eq!(app.update_animation().unwrap(), frozen);

        app.on_mouse_move(10, 20).unwrap();
        assert_eq!(app.animator.state().unwrap(), RunState::Running);
        clock.advance_secs(1.0);
        let offset = app.update_animation().unwrap();
        assert!((offset - (frozen - 10.0)).abs() < 1e-6);
    }

    #[test]
    fn test_hover_reports_slot() {
        let (_clock, mut app) = app();
        app.on_mouse_move(21, 3).unwrap();
        assert_eq!(app.hovered_slot, Some(1));

        // In the gap between cards
        app.on_mouse_move(19, 3).unwrap();
        assert_eq!(app.hovered_slot, None);
    }

    #[test]
    fn test_manual_pause_survives_hover_leave() {
        let (_clock, mut app) = app();
        app.apply(Action::TogglePause).unwrap();
        app.on_mouse_move(5, 3).unwrap();
        app.on_mouse_move(5, 30).unwrap();

        assert_eq!(app.animator.state().unwrap(), RunState::Paused);
        app.apply(Action::TogglePause).unwrap();
        assert_eq!(app.animator.state().unwrap(), RunState::Running);
    }

    #[test]
    fn test_hover_ignored_when_disabled() {
        let clock = ManualClock::new();
        let mut config = AppConfig::default();
        config.carousel.pause_on_hover = false;
        let mut app = App::with_clock(config, clock).unwrap();
        app.set_carousel_area(Rect::new(0, 0, 80, 5));

        app.on_mouse_move(1, 1).unwrap();
        assert_eq!(app.animator.state().unwrap(), RunState::Running);
    }

    #[test]
    fn test_accelerate_keeps_position() {
        let (clock, mut app) = app();
        clock.advance_secs(2.0);
        app.update_animation().unwrap();
        let before = app.offset();

        app.apply(Action::Accelerate(5.0)).unwrap();
        assert_eq!(app.animator.velocity(), 15.0);
        assert!((app.offset() - before).abs() < 1e-9);

        clock.advance_secs(1.0);
        let after = app.update_animation().unwrap();
        assert!((after - (before - 15.0)).abs() < 1e-6);
    }

    #[test]
    fn test_accelerate_keeps_wrap_count() {
        let (clock, mut app) = app();
        // Two full periods of 200 cells at 10 cells/s, and a bit
        clock.advance_secs(41.0);
        app.update_animation().unwrap();
        assert_eq!(app.animator.wraps(), 2);

        app.apply(Action::Accelerate(2.0)).unwrap();
        assert_eq!(app.animator.wraps(), 2);
    }

    #[test]
    fn test_hover_uses_drawn_offset() {
        let (clock, mut app) = app();
        // Offset -0.5 is drawn one whole cell to the left
        clock.advance_secs(0.05);
        app.update_animation().unwrap();

        app.on_mouse_move(17, 3).unwrap();
        assert_eq!(app.hovered_slot, None);
        app.on_mouse_move(16, 3).unwrap();
        assert_eq!(app.hovered_slot, Some(0));
    }

    #[test]
    fn test_resize_track_keeps_phase() {
        let (clock, mut app) = app();
        clock.advance_secs(45.0);
        app.update_animation().unwrap();
        let before = app.snapshot().unwrap();
        assert!((before.offset + 50.0).abs() < 1e-6);

        app.resize_track(8).unwrap();
        let after = app.snapshot().unwrap();
        assert_eq!(after.period, 100.0);
        assert!((after.phase() - before.phase()).abs() < 1e-9);
        assert!((after.offset + 25.0).abs() < 1e-6);
        assert_eq!(after.wraps, before.wraps);
        assert_eq!(after.state, RunState::Running);

        // Keeps moving at the same velocity on the new period
        clock.advance_secs(1.0);
        let offset = app.update_animation().unwrap();
        assert!((offset + 35.0).abs() < 1e-6);
    }

    #[test]
    fn test_resize_track_while_paused() {
        let (clock, mut app) = app();
        clock.advance_secs(5.0);
        app.apply(Action::TogglePause).unwrap();

        app.resize_track(38).unwrap();
        assert_eq!(app.animator.state().unwrap(), RunState::Paused);
        assert!((app.offset() + 100.0).abs() < 1e-6);

        clock.advance_secs(3.0);
        assert!((app.update_animation().unwrap() + 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_narrow_terminal_shrinks_cards() {
        let (_clock, mut app) = app();
        app.on_resize(12).unwrap();
        assert_eq!(app.card_width(), 10);
        assert_eq!(app.animator.period(), 120.0);

        // Never below the minimum, and back to the configured width when wide
        app.on_resize(3).unwrap();
        assert_eq!(app.card_width(), MIN_CARD_WIDTH);
        app.on_resize(200).unwrap();
        assert_eq!(app.card_width(), 18);
        assert_eq!(app.animator.period(), 200.0);
    }

    #[test]
    fn test_widen_changes_card_width() {
        let (_clock, mut app) = app();
        app.apply(Action::Widen(2)).unwrap();
        assert_eq!(app.card_width(), 20);
        assert_eq!(app.config.carousel.card_width, 20);
        assert_eq!(app.animator.period(), 220.0);

        app.apply(Action::Widen(-100)).unwrap();
        assert_eq!(app.card_width(), MIN_CARD_WIDTH);
    }

    #[test]
    fn test_accelerate_clamps_to_minimum() {
        let (_clock, mut app) = app();
        app.apply(Action::Accelerate(-100.0)).unwrap();
        assert_eq!(app.animator.velocity(), MIN_VELOCITY);
    }

    #[test]
    fn test_reset_and_quit() {
        let (clock, mut app) = app();
        clock.advance_secs(4.0);
        app.update_animation().unwrap();

        app.apply(Action::Reset).unwrap();
        assert_eq!(app.offset(), 0.0);
        assert_eq!(app.animator.wraps(), 0);

        app.apply(Action::Quit).unwrap();
        assert!(app.should_quit);
    }

    #[test]
    fn test_start_paused() {
        let mut config = AppConfig::default();
        config.carousel.start_paused = true;
        let app = App::with_clock(config, ManualClock::new()).unwrap();

        assert!(!app.needs_animation());
        assert!(app.holds.manual);
    }

    #[test]
    fn test_empty_items_rejected() {
        let mut config = AppConfig::default();
        config.carousel.items.clear();
        assert!(App::with_clock(config, ManualClock::new()).is_err());
    }
}
