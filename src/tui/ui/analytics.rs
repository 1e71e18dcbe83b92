//! Analytics view: Feature distribution histogram.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame,
};

use crate::domain::Histogram;
use crate::tui::styles::MedicalTheme;

/// Analytics state
#[derive(Debug, Clone, Default)]
pub struct AnalyticsState {
    pub histogram: Option<Histogram>,
    pub error: Option<String>,
}

/// Render the analytics view
pub fn render_analytics(f: &mut Frame, area: Rect, state: &AnalyticsState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_analytics_header(f, chunks[0]);
    render_analytics_content(f, chunks[1], state);
    render_analytics_footer(f, chunks[2]);
}

fn render_analytics_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled("Cholesterol Level Distribution", MedicalTheme::title()),
        Span::styled(" │ Training dataset", MedicalTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_analytics_content(f: &mut Frame, area: Rect, state: &AnalyticsState) {
    if let Some(err) = &state.error {
        render_analytics_error(f, area, err);
        return;
    }

    match &state.histogram {
        Some(histogram) => render_histogram(f, area, histogram),
        None => {
            let no_data = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled("No data loaded", MedicalTheme::text_muted())),
                Line::from(""),
                Line::from(Span::styled(
                    "Press [R] to reload the dataset",
                    MedicalTheme::text_secondary(),
                )),
            ])
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(MedicalTheme::border()),
            );
            f.render_widget(no_data, area);
        }
    }
}

fn render_analytics_error(f: &mut Frame, area: Rect, message: &str) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("! Cannot Load Dataset", MedicalTheme::danger())),
        Line::from(""),
        Line::from(Span::styled(message, MedicalTheme::text())),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MedicalTheme::danger()),
    );

    f.render_widget(content, area);
}

/// Bar width that fits `bins` bars with a one-column gap into `width`.
fn bar_width(width: u16, bins: usize) -> u16 {
    let bins = u16::try_from(bins.max(1)).unwrap_or(u16::MAX);
    (width.saturating_sub(bins) / bins).max(1)
}

fn render_histogram(f: &mut Frame, area: Rect, histogram: &Histogram) {
    let block = Block::default()
        .title(Span::styled(" Frequency ", MedicalTheme::subtitle()))
        .title_bottom(Line::from(Span::styled(
            " Cholesterol (mg/dL) ",
            MedicalTheme::text_secondary(),
        )))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());
    let inner = block.inner(area);

    let bars: Vec<Bar> = histogram
        .counts
        .iter()
        .enumerate()
        .map(|(i, count)| {
            let (lo, _) = histogram.bin_edges(i);
            Bar::default()
                .label(Line::from(format!("{lo:.0}")))
                .value(*count)
                .style(MedicalTheme::bar())
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width(inner.width, histogram.counts.len()))
        .bar_gap(1)
        .value_style(MedicalTheme::title());

    f.render_widget(chart, area);
}

fn render_analytics_footer(f: &mut Frame, area: Rect) {
    let content = Line::from(vec![
        Span::styled("[R] ", MedicalTheme::key_hint()),
        Span::styled("Reload ", MedicalTheme::key_desc()),
        Span::styled("[Esc] ", MedicalTheme::key_hint()),
        Span::styled("Back", MedicalTheme::key_desc()),
    ]);

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_width_fits() {
        assert_eq!(bar_width(100, 20), 4);
        assert_eq!(bar_width(10, 20), 1);
        assert_eq!(bar_width(0, 0), 1);
    }
}
