use std::io;

use anyhow::Result;
use crossterm::{
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Flex, Layout},
    Terminal,
};

use marquee_core::{AppConfig, Clock};
use marquee_tui::{
    app::App,
    event::{AppEvent, EventHandler},
    input::handle_key_event,
    widgets::{CarouselWidget, StatusBarWidget},
};

/// Height of the strip including its heading row
const CAROUSEL_HEIGHT: u16 = 6;

pub async fn run(config: AppConfig) -> Result<()> {
    // Create app state before touching the terminal so config errors print normally
    let mut app = App::new(config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange,
        SetTitle("Marquee")
    )?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = main_loop(&mut terminal, &mut app);
    shutdown(&mut app, result, || restore_terminal(&mut terminal))
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableFocusChange
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Tear down the loop, then restore the terminal
///
/// Both steps always run; the main loop's error wins over teardown errors.
fn shutdown<C: Clock + Clone>(
    app: &mut App<C>,
    result: Result<()>,
    restore: impl FnOnce() -> Result<()>,
) -> Result<()> {
    let disposed = app.animator.dispose();
    let restored = restore();
    result?;
    disposed?;
    restored
}

fn main_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let event_handler = EventHandler::with_animation_rate(
        app.config.ui.tick_rate_ms,
        app.config.animation_tick_ms(),
    );

    loop {
        app.update_animation()?;

        // Draw UI
        terminal.draw(|frame| {
            let size = frame.area();
            let show_status = app.config.ui.show_status_bar;

            // Main layout: centered carousel + status bar
            let main_layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Min(1),
                    Constraint::Length(u16::from(show_status)),
                ])
                .split(size);

            let [carousel_area] = Layout::vertical([Constraint::Length(CAROUSEL_HEIGHT)])
                .flex(Flex::Center)
                .areas(main_layout[0]);

            CarouselWidget::render(frame, carousel_area, app);
            if show_status {
                StatusBarWidget::render(frame, main_layout[1], app);
            }
        })?;

        // Handle events (use faster tick rate while the strip is moving)
        let event = if app.needs_animation() {
            event_handler.next_animation()?
        } else {
            event_handler.next()?
        };
        if let Some(event) = event {
            match event {
                AppEvent::Key(key) => {
                    app.clear_status();
                    app.apply(handle_key_event(key))?;
                }
                AppEvent::MouseMove { column, row } => {
                    app.on_mouse_move(column, row)?;
                }
                AppEvent::PointerLeft => {
                    app.on_pointer_left()?;
                }
                AppEvent::Resize(width, _) => {
                    app.on_resize(width)?;
                }
                AppEvent::Tick => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
