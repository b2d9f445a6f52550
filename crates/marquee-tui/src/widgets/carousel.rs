use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Paragraph, Widget},
    Frame,
};
use unicode_width::UnicodeWidthChar;

use marquee_core::{Clock, Track};

use crate::app::App;
use crate::theme::Theme;

/// Title row above the strip
const HEADING: &str = "Few More Certifications";

pub struct CarouselWidget;

impl CarouselWidget {
    /// Draw the heading and the scrolling strip, recording the strip area
    /// for hover hit-testing
    pub fn render<C: Clock + Clone>(frame: &mut Frame, area: Rect, app: &mut App<C>) {
        if area.height == 0 {
            return;
        }

        let heading = Paragraph::new(Line::styled(
            HEADING,
            Style::default()
                .fg(app.theme.accent)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        ))
        .alignment(Alignment::Center);
        frame.render_widget(heading, Rect { height: 1, ..area });

        let strip = Rect {
            y: area.y + 1,
            height: area.height.saturating_sub(1),
            ..area
        };
        app.set_carousel_area(strip);

        let view = StripView {
            track: &app.track,
            offset: app.offset(),
            hovered_slot: app.hovered_slot,
            theme: &app.theme,
        };
        frame.render_widget(view, strip);
    }
}

/// One frame of the doubled strip translated by `offset`
pub struct StripView<'a> {
    pub track: &'a Track<String>,
    pub offset: f64,
    pub hovered_slot: Option<usize>,
    pub theme: &'a Theme,
}

impl Widget for StripView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 3 || area.width == 0 {
            return;
        }

        // Whole cells only; the fraction is dropped when drawing
        let offset = self.offset.floor();
        let mid = area.height / 2;

        for placement in self.track.placements(offset, f64::from(area.width)) {
            let width = placement.extent as u16;
            if width < 2 {
                continue;
            }
            let hovered = self.hovered_slot == Some(placement.slot);
            let border = Style::default().fg(if hovered {
                self.theme.card_hover
            } else {
                self.theme.card_border
            });
            let mut text = Style::default().fg(self.theme.fg0);
            if hovered {
                text = text.add_modifier(Modifier::BOLD);
            }
            let label = fit_label(&self.track.items()[placement.item], width - 2);

            for i in 0..width {
                let column = placement.start as i64 + i64::from(i);
                if column < 0 || column >= i64::from(area.width) {
                    continue;
                }
                let x = area.x + column as u16;

                for row in 0..area.height {
                    let y = area.y + row;
                    let Some(cell) = buf.cell_mut((x, y)) else {
                        continue;
                    };
                    if row == mid && i > 0 && i < width - 1 {
                        match label[usize::from(i - 1)] {
                            Some(ch) => {
                                cell.set_char(ch).set_style(text);
                            }
                            None => {
                                cell.reset();
                                cell.set_style(text);
                            }
                        }
                    } else {
                        cell.set_char(frame_glyph(i, row, width, area.height))
                            .set_style(border);
                    }
                }
            }
        }
    }
}

/// Rounded box-drawing glyph for cell (`i`, `row`) of a card
fn frame_glyph(i: u16, row: u16, width: u16, height: u16) -> char {
    let left = i == 0;
    let right = i == width - 1;
    let top = row == 0;
    let bottom = row == height - 1;
    match (top, bottom, left, right) {
        (true, _, true, _) => '╭',
        (true, _, _, true) => '╮',
        (_, true, true, _) => '╰',
        (_, true, _, true) => '╯',
        (true, _, _, _) | (_, true, _, _) => '─',
        (_, _, true, _) | (_, _, _, true) => '│',
        _ => ' ',
    }
}

/// Center `label` in `width` cells
///
/// `None` marks the trailing cell of a double-width character.
fn fit_label(label: &str, width: u16) -> Vec<Option<char>> {
    let width = usize::from(width);
    let mut cells: Vec<Option<char>> = Vec::with_capacity(width);
    for ch in label.chars() {
        let w = ch.width().unwrap_or(0);
        if w == 0 {
            continue;
        }
        if cells.len() + w > width {
            break;
        }
        cells.push(Some(ch));
        if w == 2 {
            cells.push(None);
        }
    }

    let pad = (width - cells.len()) / 2;
    let mut line = vec![Some(' '); pad];
    line.extend(cells);
    line.resize(width, Some(' '));
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    fn draw(track: &Track<String>, offset: f64, width: u16) -> Buffer {
        let theme = Theme::default();
        let area = Rect::new(0, 0, width, 3);
        let mut buf = Buffer::empty(area);
        StripView {
            track,
            offset,
            hovered_slot: None,
            theme: &theme,
        }
        .render(area, &mut buf);
        buf
    }

    fn track() -> Track<String> {
        Track::uniform(vec!["A".to_string(), "B".to_string()], 5.0, 1.0)
    }

    #[test]
    fn test_renders_cards_at_rest() {
        let buf = draw(&track(), 0.0, 12);
        assert_eq!(row(&buf, 0), "╭───╮ ╭───╮ ");
        assert_eq!(row(&buf, 1), "│ A │ │ B │ ");
        assert_eq!(row(&buf, 2), "╰───╯ ╰───╯ ");
    }

    #[test]
    fn test_renders_translated_and_clipped() {
        let buf = draw(&track(), -3.0, 12);
        assert_eq!(row(&buf, 1), " │ │ B │ │ A");
    }

    #[test]
    fn test_wrap_point_draws_same_frame() {
        let track = track();
        let period = track.period().unwrap();
        let at_zero = draw(&track, 0.0, 12);
        let at_period = draw(&track, -period, 12);
        assert_eq!(row(&at_zero, 1), row(&at_period, 1));
    }

    #[test]
    fn test_fit_label() {
        let line: String = fit_label("Cert", 8).into_iter().flatten().collect();
        assert_eq!(line, "  Cert  ");

        let long: String = fit_label("Certificate 10", 6).into_iter().flatten().collect();
        assert_eq!(long, "Certif");

        let wide = fit_label("証明", 5);
        assert_eq!(wide.len(), 5);
        assert_eq!(wide[1], None);
    }

    #[test]
    fn test_too_short_area_draws_nothing() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 10, 2);
        let mut buf = Buffer::empty(area);
        StripView {
            track: &track(),
            offset: 0.0,
            hovered_slot: None,
            theme: &theme,
        }
        .render(area, &mut buf);
        assert_eq!(row(&buf, 0), " ".repeat(10));
    }
}
