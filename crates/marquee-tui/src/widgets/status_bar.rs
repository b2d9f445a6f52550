use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use marquee_core::{Clock, RunState, Snapshot};

use crate::app::App;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render<C: Clock + Clone>(frame: &mut Frame, area: Rect, app: &App<C>) {
        let theme = &app.theme;
        let (mode_str, mode_color) = match app.snapshot().map(|s| s.state) {
            Some(RunState::Running) => ("RUNNING", theme.running),
            Some(RunState::Paused) if app.holds.hover => ("HOVER", theme.paused),
            Some(RunState::Paused) => ("PAUSED", theme.paused),
            None => ("STOPPED", theme.error),
        };

        let status_text = if let Some(msg) = &app.status_message {
            format!(" {}", msg)
        } else {
            app.snapshot().map(|s| format_snapshot(&s)).unwrap_or_default()
        };

        let help_hint = " q:quit space:pause +/-:speed [/]:width r:reset ";
        let used = mode_str.len() + 2 + status_text.chars().count() + help_hint.len();
        let padding_len = (area.width as usize).saturating_sub(used);

        let line = Line::from(vec![
            Span::styled(
                format!(" {} ", mode_str),
                Style::default().fg(theme.bg0).bg(mode_color),
            ),
            Span::styled(status_text, Style::default().fg(theme.fg0).bg(theme.bg2)),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.bg2)),
            Span::styled(help_hint, Style::default().fg(theme.grey).bg(theme.bg2)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}

/// One-line summary of the loop position
pub fn format_snapshot(snapshot: &Snapshot) -> String {
    format!(
        " offset {:>8.1} | {:>5.1}% | wraps {} | {:.1} cells/s",
        snapshot.offset,
        snapshot.phase() * 100.0,
        snapshot.wraps,
        snapshot.velocity
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_snapshot() {
        let snapshot = Snapshot {
            offset: -50.0,
            wraps: 3,
            state: RunState::Running,
            period: 200.0,
            velocity: 12.0,
        };
        let text = format_snapshot(&snapshot);
        assert!(text.contains("-50.0"), "{text}");
        assert!(text.contains("25.0%"), "{text}");
        assert!(text.contains("wraps 3"), "{text}");
        assert!(text.contains("12.0 cells/s"), "{text}");
    }
}
