//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation
//! - Input event handling
//! - Service integration
//!
//! Inference is a single synchronous call, so the event loop runs it inline.

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::adapters::delimited::DelimitedDataset;
use crate::adapters::json::JsonArtifactStore;
use crate::application::{AnalyticsService, InferenceService};
use crate::domain::histogram::DEFAULT_BINS;
use crate::CardioriskError;

use super::ui::{
    analytics::{render_analytics, AnalyticsState},
    dashboard::{render_dashboard, ArtifactSummary, DashboardState},
    inference::{render_inference, InferenceState},
    patient::{render_patient_form, PatientFormState},
    render_disclaimer,
};

/// Column shown on the histogram screen.
const HISTOGRAM_COLUMN: &str = "chol";

/// Current screen/view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    PatientForm,
    Result,
    Histogram,
}

/// Main application state
pub struct App {
    /// Current screen
    screen: Screen,

    /// Whether the app should quit
    should_quit: bool,

    /// Inference service over the verified artifact set
    inference_service: InferenceService,

    /// Analytics service over the training dataset
    analytics_service: AnalyticsService<DelimitedDataset>,

    dashboard_state: DashboardState,
    patient_form_state: PatientFormState,
    inference_state: InferenceState,
    analytics_state: AnalyticsState,
}

impl App {
    /// Create a new application from an artifact directory and a dataset path.
    ///
    /// # Errors
    /// Returns error if the artifact set cannot be loaded and verified.
    pub fn new(artifact_dir: &Path, dataset: &Path) -> Result<Self> {
        let store = JsonArtifactStore::new(artifact_dir);

        // Refuse to start without a verified scaler/model pair.
        let inference_service = InferenceService::load(&store).map_err(|e| {
            anyhow!(
                "Failed to load artifacts from {:?}: {}. Run `cardiorisk train` first.",
                artifact_dir,
                e
            )
        })?;
        let analytics_service = AnalyticsService::new(Arc::new(DelimitedDataset::new(dataset)));

        Ok(Self::with_dependencies(inference_service, analytics_service))
    }

    /// Create application with injected dependencies (Composition Root pattern).
    #[must_use]
    pub fn with_dependencies(
        inference_service: InferenceService,
        analytics_service: AnalyticsService<DelimitedDataset>,
    ) -> Self {
        let dashboard_state = DashboardState {
            artifacts: Some(ArtifactSummary::from(inference_service.artifacts())),
            ..Default::default()
        };

        Self {
            screen: Screen::Dashboard,
            should_quit: false,
            inference_service,
            analytics_service,
            dashboard_state,
            patient_form_state: PatientFormState::default(),
            inference_state: InferenceState::default(),
            analytics_state: AnalyticsState::default(),
        }
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(2)])
                    .split(f.area());

                let content_area = chunks[0];
                match self.screen {
                    Screen::Dashboard => render_dashboard(f, content_area, &self.dashboard_state),
                    Screen::PatientForm => {
                        render_patient_form(f, content_area, &self.patient_form_state)
                    }
                    Screen::Result => render_inference(f, content_area, &self.inference_state),
                    Screen::Histogram => render_analytics(f, content_area, &self.analytics_state),
                }

                render_disclaimer(f, chunks[1]);
            })?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Global quit handling
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Dashboard => self.handle_dashboard_key(key),
            Screen::PatientForm => self.handle_patient_form_key(key),
            Screen::Result => self.handle_result_key(key),
            Screen::Histogram => self.handle_histogram_key(key),
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('n' | 'N') => {
                self.patient_form_state = PatientFormState::default();
                self.screen = Screen::PatientForm;
            }
            KeyCode::Char('h' | 'H') => {
                self.load_histogram();
                self.screen = Screen::Histogram;
            }
            KeyCode::Char('q' | 'Q') => {
                self.should_quit = true;
            }
            _ => {}
        }
    }

    fn handle_patient_form_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.patient_form_state.clear_sensitive();
                self.screen = Screen::Dashboard;
            }
            KeyCode::Up | KeyCode::BackTab => self.patient_form_state.prev_field(),
            KeyCode::Down | KeyCode::Tab => self.patient_form_state.next_field(),
            KeyCode::Char('s' | 'S') => self.patient_form_state.load_sample_data(),
            KeyCode::Char(c) => self.patient_form_state.input_char(c),
            KeyCode::Backspace => self.patient_form_state.delete_char(),
            KeyCode::Delete => self.patient_form_state.clear_field(),
            KeyCode::Enter => self.submit_patient_form(),
            _ => {}
        }
    }

    fn handle_result_key(&mut self, key: KeyCode) {
        match (&self.inference_state, key) {
            (InferenceState::Error { .. }, KeyCode::Enter) => {
                self.screen = Screen::PatientForm;
            }
            (_, KeyCode::Enter | KeyCode::Esc) => {
                self.screen = Screen::Dashboard;
            }
            (_, KeyCode::Char('n' | 'N')) => {
                self.patient_form_state = PatientFormState::default();
                self.screen = Screen::PatientForm;
            }
            _ => {}
        }
    }

    fn handle_histogram_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => self.screen = Screen::Dashboard,
            KeyCode::Char('r' | 'R') => self.load_histogram(),
            _ => {}
        }
    }

    fn submit_patient_form(&mut self) {
        let result = self
            .inference_service
            .assess_fields(&self.patient_form_state.values());

        match result {
            Ok(assessment) => {
                self.dashboard_state
                    .session
                    .record(assessment.prediction.label);
                self.inference_state = InferenceState::Complete { assessment };
                self.screen = Screen::Result;

                // Clear plaintext buffers from the UI immediately.
                self.patient_form_state.clear_sensitive();
            }
            Err(CardioriskError::InputValidation(e)) => {
                // Stay on the form so the user can correct the field.
                self.patient_form_state.error_message = Some(e.to_string());
            }
            Err(e) => {
                tracing::error!("Inference failed: {}", e);
                self.inference_state = InferenceState::Error {
                    message: e.to_string(),
                };
                self.screen = Screen::Result;
            }
        }
    }

    fn load_histogram(&mut self) {
        match self.analytics_service.histogram(HISTOGRAM_COLUMN, DEFAULT_BINS) {
            Ok(histogram) => {
                self.analytics_state = AnalyticsState {
                    histogram: Some(histogram),
                    error: None,
                };
            }
            Err(e) => {
                tracing::warn!("Failed to build histogram: {}", e);
                self.analytics_state = AnalyticsState {
                    histogram: None,
                    error: Some(e.to_string()),
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FeatureScaler, RiskModel, TrainedArtifacts, TrainingMetrics};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn test_app(dataset: &Path) -> App {
        let scaler = FeatureScaler::from_parts(vec![0.0; 13], vec![1.0; 13]).unwrap();
        let model = RiskModel::new(vec![0.01; 13], 0.0).unwrap();
        let inference = InferenceService::new(TrainedArtifacts::new(
            scaler,
            model,
            TrainingMetrics::default(),
        ));
        let analytics = AnalyticsService::new(Arc::new(DelimitedDataset::new(dataset)));
        App::with_dependencies(inference, analytics)
    }

    fn press(app: &mut App, key: KeyCode) {
        app.handle_key(key, KeyModifiers::NONE);
    }

    #[test]
    fn test_submit_sample_shows_result() {
        let mut app = test_app(Path::new("/nonexistent.csv"));
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.screen, Screen::PatientForm);

        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.screen, Screen::Result);
        assert!(matches!(app.inference_state, InferenceState::Complete { .. }));
        assert_eq!(app.dashboard_state.session.total(), 1);
        assert!(app.patient_form_state.fields.iter().all(|f| f.value.is_empty()));

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen, Screen::Dashboard);
    }

    #[test]
    fn test_invalid_form_stays_on_form() {
        let mut app = test_app(Path::new("/nonexistent.csv"));
        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Char('5'));
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.screen, Screen::PatientForm);
        let msg = app.patient_form_state.error_message.clone().unwrap();
        assert!(msg.contains("sex"), "{msg}");
        assert_eq!(app.dashboard_state.session.total(), 0);
    }

    #[test]
    fn test_histogram_screen() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "age,sex,cp,trtbps,chol,fbs,restecg,thalachh,exng,oldpeak,slp,caa,thall,output"
        )
        .unwrap();
        writeln!(file, "50,1,0,130,240,0,1,150,0,1.0,1,0,2,1").unwrap();
        writeln!(file, "60,0,2,140,300,1,0,120,1,2.5,0,1,3,0").unwrap();

        let mut app = test_app(file.path());
        press(&mut app, KeyCode::Char('h'));
        assert_eq!(app.screen, Screen::Histogram);
        let histogram = app.analytics_state.histogram.as_ref().unwrap();
        assert_eq!(histogram.counts.len(), DEFAULT_BINS);
        assert_eq!(histogram.total(), 2);

        let mut missing = test_app(Path::new("/nonexistent.csv"));
        press(&mut missing, KeyCode::Char('h'));
        assert!(missing.analytics_state.error.is_some());
    }

    #[test]
    fn test_quit() {
        let mut app = test_app(Path::new("/nonexistent.csv"));
        app.handle_key(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(app.should_quit);
    }
}
