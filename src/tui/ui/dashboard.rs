//! Dashboard view: Main overview screen.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::domain::{RiskLabel, TrainedArtifacts, TrainingMetrics};
use crate::tui::styles::{MedicalTheme, LOGO_SMALL};

/// Assessments made during this session (counts only).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub high: u32,
    pub low: u32,
}

impl SessionSummary {
    pub fn record(&mut self, label: RiskLabel) {
        match label {
            RiskLabel::High => self.high += 1,
            RiskLabel::Low => self.low += 1,
        }
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.high + self.low
    }
}

/// Displayable facts about the loaded artifact set.
#[derive(Debug, Clone)]
pub struct ArtifactSummary {
    pub run_id: String,
    pub created_at: String,
    pub metrics: TrainingMetrics,
}

impl From<&TrainedArtifacts> for ArtifactSummary {
    fn from(a: &TrainedArtifacts) -> Self {
        Self {
            run_id: a.run_id.clone(),
            created_at: a.created_at.format("%Y-%m-%d %H:%M UTC").to_string(),
            metrics: a.metrics.clone(),
        }
    }
}

/// Dashboard state for rendering.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub artifacts: Option<ArtifactSummary>,
    pub session: SessionSummary,
}

/// Render the main dashboard view.
pub fn render_dashboard(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
        ])
        .split(area);

    render_header(f, chunks[0]);
    render_main_content(f, chunks[1], state);
}

fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled(LOGO_SMALL, MedicalTheme::title()),
        Span::styled(" │ ", MedicalTheme::text_muted()),
        Span::styled("Heart Attack Risk Prediction", MedicalTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_main_content(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40), // Status panels
            Constraint::Percentage(60), // Training metrics
        ])
        .split(area);

    render_status_panels(f, chunks[0], state);
    render_metrics(f, chunks[1], state);
}

fn render_status_panels(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // System status
            Constraint::Length(5), // Session
            Constraint::Min(0),    // Quick actions
        ])
        .margin(1)
        .split(area);

    let mut status_items = vec![format_status_item(
        "Artifacts Verified",
        state.artifacts.is_some(),
    )];
    if let Some(summary) = &state.artifacts {
        status_items.push(Line::from(vec![
            Span::styled("  Run: ", MedicalTheme::text_secondary()),
            Span::styled(summary.run_id.clone(), MedicalTheme::text_muted()),
        ]));
        status_items.push(Line::from(vec![
            Span::styled("  Trained: ", MedicalTheme::text_secondary()),
            Span::styled(summary.created_at.clone(), MedicalTheme::text()),
        ]));
    }

    let status_block = Block::default()
        .title(Span::styled(" System Status ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    let status_list = Paragraph::new(status_items)
        .wrap(Wrap { trim: true })
        .block(status_block);
    f.render_widget(status_list, chunks[0]);

    let session = &state.session;
    let session_items = vec![
        Line::from(vec![
            Span::styled("  Assessments: ", MedicalTheme::text_secondary()),
            Span::styled(session.total().to_string(), MedicalTheme::text()),
        ]),
        Line::from(vec![
            Span::styled("  High: ", MedicalTheme::text_secondary()),
            Span::styled(
                session.high.to_string(),
                MedicalTheme::risk_label(RiskLabel::High),
            ),
            Span::styled("  Low: ", MedicalTheme::text_secondary()),
            Span::styled(
                session.low.to_string(),
                MedicalTheme::risk_label(RiskLabel::Low),
            ),
        ]),
    ];
    let session_block = Block::default()
        .title(Span::styled(" This Session ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());
    f.render_widget(Paragraph::new(session_items).block(session_block), chunks[1]);

    let actions = vec![
        Line::from(vec![
            Span::styled("[N] ", MedicalTheme::key_hint()),
            Span::styled("New Patient", MedicalTheme::key_desc()),
        ]),
        Line::from(vec![
            Span::styled("[H] ", MedicalTheme::key_hint()),
            Span::styled("Cholesterol Histogram", MedicalTheme::key_desc()),
        ]),
        Line::from(vec![
            Span::styled("[Q] ", MedicalTheme::key_hint()),
            Span::styled("Quit", MedicalTheme::key_desc()),
        ]),
    ];

    let actions_block = Block::default()
        .title(Span::styled(" Quick Actions ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    let actions_list = Paragraph::new(actions).block(actions_block);
    f.render_widget(actions_list, chunks[2]);
}

fn format_status_item(label: &str, ok: bool) -> Line<'static> {
    let (icon, style) = if ok {
        ("OK", MedicalTheme::success())
    } else {
        ("FAIL", MedicalTheme::danger())
    };

    Line::from(vec![
        Span::styled(format!("  {icon} "), style),
        Span::styled(label.to_string(), MedicalTheme::text()),
    ])
}

fn render_metrics(f: &mut Frame, area: Rect, state: &DashboardState) {
    let block = Block::default()
        .title(Span::styled(" Training Metrics ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    let Some(summary) = &state.artifacts else {
        let empty_msg = Paragraph::new(Line::from(vec![Span::styled(
            "No trained model. Run `cardiorisk train` first.",
            MedicalTheme::text_muted(),
        )]))
        .block(block);
        f.render_widget(empty_msg, area);
        return;
    };
    let metrics = &summary.metrics;

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Text
            Constraint::Length(3), // Test accuracy
            Constraint::Length(3), // CV mean
            Constraint::Min(0),
        ])
        .margin(1)
        .split(inner);

    let scores: Vec<String> = metrics.cv_scores.iter().map(|s| format!("{s:.2}")).collect();
    let lines = vec![
        Line::from(vec![
            Span::styled("Train / test rows: ", MedicalTheme::text_secondary()),
            Span::styled(
                format!("{} / {}", metrics.n_train, metrics.n_test),
                MedicalTheme::text(),
            ),
        ]),
        Line::from(vec![
            Span::styled("CV scores: ", MedicalTheme::text_secondary()),
            Span::styled(format!("[{}]", scores.join(", ")), MedicalTheme::text()),
        ]),
        Line::from(vec![
            Span::styled("Optimizer: ", MedicalTheme::text_secondary()),
            if metrics.converged {
                Span::styled("converged", MedicalTheme::success())
            } else {
                Span::styled("iteration limit reached", MedicalTheme::warning())
            },
        ]),
    ];
    f.render_widget(Paragraph::new(lines), chunks[0]);

    f.render_widget(
        accuracy_gauge(" Test Accuracy ", metrics.test_accuracy),
        chunks[1],
    );
    f.render_widget(
        accuracy_gauge(" Mean CV Accuracy ", metrics.cv_mean),
        chunks[2],
    );
}

fn accuracy_gauge(title: &'static str, value: f64) -> Gauge<'static> {
    Gauge::default()
        .block(
            Block::default()
                .title(Span::styled(title, MedicalTheme::text_secondary()))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        )
        .gauge_style(MedicalTheme::info())
        .percent((value * 100.0).clamp(0.0, 100.0) as u16)
        .label(format!("{value:.2}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_summary() {
        let mut s = SessionSummary::default();
        s.record(RiskLabel::High);
        s.record(RiskLabel::Low);
        s.record(RiskLabel::Low);
        assert_eq!(s, SessionSummary { high: 1, low: 2 });
        assert_eq!(s.total(), 3);
    }
}
