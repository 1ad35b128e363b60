use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::chart::{ChartFrame, Rgb};
use crate::session::SessionView;

/// Paints the chart frame into terminal cells.
///
/// Each cell carries two pixel rows through a half block: the foreground
/// colors the upper row, the background the lower. Sampling is nearest
/// neighbor, so any frame size maps onto any terminal size.
pub struct PixelCanvas<'a> {
    frame: &'a ChartFrame,
}

impl<'a> PixelCanvas<'a> {
    pub fn new(frame: &'a ChartFrame) -> Self {
        Self { frame }
    }
}

impl Widget for PixelCanvas<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Market ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let cols = inner.width as usize;
        let rows = inner.height as usize * 2;

        for cell_y in 0..inner.height as usize {
            for cell_x in 0..cols {
                let px = cell_x * self.frame.width() / cols;
                let upper = (cell_y * 2) * self.frame.height() / rows;
                let lower = (cell_y * 2 + 1) * self.frame.height() / rows;
                let top = self.frame.pixel(px, upper);
                let bottom = self.frame.pixel(px, lower);
                if let Some(cell) =
                    buf.cell_mut((inner.x + cell_x as u16, inner.y + cell_y as u16))
                {
                    cell.set_symbol("▀");
                    cell.set_fg(to_color(top));
                    cell.set_bg(to_color(bottom));
                }
            }
        }
    }
}

fn to_color(px: Rgb) -> Color {
    Color::Rgb(px.r, px.g, px.b)
}

pub struct StatusBar<'a> {
    pub view: &'a SessionView<'a>,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let view = self.view;

        let position = match view.position_avg {
            Some(avg) => Span::styled(
                format!("LONG x{} @ {:.2}", view.open_entries, avg),
                Style::default().fg(Color::Green),
            ),
            None => Span::styled("FLAT", Style::default().fg(Color::DarkGray)),
        };

        let profit_color = if view.realized_profit > 0.0 {
            Color::Green
        } else if view.realized_profit < 0.0 {
            Color::Red
        } else {
            Color::White
        };

        let line = Line::from(vec![
            Span::styled(
                " paper-pit ",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("| ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("last {}", view.price),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("fair {}", view.fair_value),
                Style::default().fg(Color::Blue),
            ),
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            position,
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("P/L {:+.2}", view.realized_profit),
                Style::default().fg(profit_color),
            ),
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("trades: {}", view.trade_count),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("ticks: {}", view.tick_count),
                Style::default().fg(Color::DarkGray),
            ),
        ]);

        buf.set_line(area.x, area.y, &line, area.width);
    }
}

pub struct NotesPanel<'a> {
    notes: &'a [String],
}

impl<'a> NotesPanel<'a> {
    pub fn new(notes: &'a [String]) -> Self {
        Self { notes }
    }
}

impl Widget for NotesPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Session Log ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));

        let visible = block.inner(area).height as usize;
        let start = self.notes.len().saturating_sub(visible);
        let lines: Vec<Line> = self.notes[start..]
            .iter()
            .map(|note| Line::from(Span::styled(note.as_str(), Style::default().fg(Color::Gray))))
            .collect();

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

pub struct KeybindBar;

impl Widget for KeybindBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let line = Line::from(vec![
            Span::styled(" [c]", Style::default().fg(Color::Yellow)),
            Span::styled(" buy  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[v]", Style::default().fg(Color::Yellow)),
            Span::styled(" sell  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[s]", Style::default().fg(Color::Yellow)),
            Span::styled(" status  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[q]", Style::default().fg(Color::Yellow)),
            Span::styled(" help  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[Esc]", Style::default().fg(Color::Yellow)),
            Span::styled(" quit", Style::default().fg(Color::DarkGray)),
        ]);

        buf.set_line(area.x, area.y, &line, area.width);
    }
}
