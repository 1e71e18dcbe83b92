//! Prediction result view.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::domain::{RiskAssessment, RiskLabel};
use crate::tui::styles::MedicalTheme;

/// Inference state
#[derive(Debug, Clone, Default)]
pub enum InferenceState {
    /// Nothing submitted yet
    #[default]
    Idle,
    /// Completed with result
    Complete { assessment: RiskAssessment },
    /// Error occurred
    Error { message: String },
}

/// Render the result view
pub fn render_inference(f: &mut Frame, area: Rect, state: &InferenceState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_inference_header(f, chunks[0]);
    render_inference_content(f, chunks[1], state);
    render_inference_footer(f, chunks[2], state);
}

fn render_inference_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled("Prediction Result", MedicalTheme::title()),
        Span::styled(" │ Logistic regression", MedicalTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_inference_content(f: &mut Frame, area: Rect, state: &InferenceState) {
    match state {
        InferenceState::Idle => render_idle(f, area),
        InferenceState::Complete { assessment } => render_result(f, area, assessment),
        InferenceState::Error { message } => render_error(f, area, message),
    }
}

fn render_idle(f: &mut Frame, area: Rect) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "Enter patient data to begin",
            MedicalTheme::text_muted(),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(content, area);
}

fn render_result(f: &mut Frame, area: Rect, assessment: &RiskAssessment) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    render_suggestions(f, columns[0], assessment);
    render_probability_chart(f, columns[1], assessment);
}

fn render_suggestions(f: &mut Frame, area: Rect, assessment: &RiskAssessment) {
    let label = assessment.prediction.label;
    let risk_style = MedicalTheme::risk_label(label);

    let mut lines = vec![
        Line::from(Span::styled(
            label.headline(),
            risk_style.add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for text in assessment.suggestions_text().lines() {
        let style = if text.starts_with("- ") {
            MedicalTheme::text()
        } else {
            MedicalTheme::subtitle()
        };
        lines.push(Line::from(Span::styled(text.to_string(), style)));
    }
    if label == RiskLabel::Low {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Keep up the good work!",
            MedicalTheme::success(),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!(
            "Prediction Probability: High Risk: {:.2}, Low Risk: {:.2}",
            assessment.prediction.p_high, assessment.prediction.p_low
        ),
        MedicalTheme::text_secondary(),
    )));

    let content = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(Span::styled(" Assessment ", MedicalTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border_focused()),
    );

    f.render_widget(content, area);
}

/// Bar heights in percent, High Risk first.
fn probability_bars(assessment: &RiskAssessment) -> [(&'static str, u64); 2] {
    let pct = |p: f64| (p * 100.0).round().clamp(0.0, 100.0) as u64;
    [
        ("High Risk", pct(assessment.prediction.p_high)),
        ("Low Risk", pct(assessment.prediction.p_low)),
    ]
}

fn render_probability_chart(f: &mut Frame, area: Rect, assessment: &RiskAssessment) {
    let bars: Vec<Bar> = probability_bars(assessment)
        .into_iter()
        .map(|(label, value)| {
            let style = if label == "High Risk" {
                MedicalTheme::danger()
            } else {
                MedicalTheme::success()
            };
            Bar::default()
                .label(Line::from(label))
                .value(value)
                .text_value(format!("{value}%"))
                .style(style)
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .title(Span::styled(" Prediction Probability ", MedicalTheme::subtitle()))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(10)
        .bar_gap(4)
        .max(100)
        .value_style(MedicalTheme::title());

    f.render_widget(chart, area);
}

fn render_error(f: &mut Frame, area: Rect, message: &str) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("! Error", MedicalTheme::danger())),
        Line::from(""),
        Line::from(Span::styled(message, MedicalTheme::text())),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MedicalTheme::danger()),
    );

    f.render_widget(content, area);
}

fn render_inference_footer(f: &mut Frame, area: Rect, state: &InferenceState) {
    let content = match state {
        InferenceState::Error { .. } => Line::from(vec![
            Span::styled("[Enter] ", MedicalTheme::key_hint()),
            Span::styled("Back to Form ", MedicalTheme::key_desc()),
            Span::styled("[Esc] ", MedicalTheme::key_hint()),
            Span::styled("Dashboard", MedicalTheme::key_desc()),
        ]),
        _ => Line::from(vec![
            Span::styled("[Enter/Esc] ", MedicalTheme::key_hint()),
            Span::styled("Dashboard ", MedicalTheme::key_desc()),
            Span::styled("[N] ", MedicalTheme::key_hint()),
            Span::styled("New Patient", MedicalTheme::key_desc()),
        ]),
    };

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
    use crate::domain::Prediction;

    #[test]
    fn test_probability_bars() {
        let assessment = RiskAssessment {
            prediction: Prediction::from_p_low(0.734),
            suggestions: Vec::new(),
        };
        assert_eq!(
            probability_bars(&assessment),
            [("High Risk", 27), ("Low Risk", 73)]
        );
    }
}
