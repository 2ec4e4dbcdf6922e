//! Static HTML dashboard rendering.
//!
//! The page is a single file: the statistics are embedded as JSON and drawn by an
//! inline script, so the output opens offline with no external requests.

use chrono::{DateTime, Utc};
use minijinja::{context, Environment};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::calculate::StatsReport;
use crate::models::{DatasetFingerprint, Game, GameLog};

const TEMPLATE_NAME: &str = "dashboard.html";
const TEMPLATE: &str = include_str!("dashboard.html");

/// Rendering errors.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to render dashboard template: {0}")]
    Template(#[from] minijinja::Error),
}

/// Everything embedded in the page.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub fingerprint: DatasetFingerprint,
    pub report: StatsReport,
    pub doubles: Vec<Game>,
}

impl Dashboard {
    pub fn new(title: &str, fingerprint: DatasetFingerprint, report: StatsReport, log: &GameLog) -> Self {
        Self {
            title: title.to_string(),
            generated_at: Utc::now(),
            fingerprint,
            report,
            doubles: log.doubles().cloned().collect(),
        }
    }
}

/// Template environment. The `.html` name turns on HTML auto-escaping.
fn environment() -> Result<Environment<'static>, RenderError> {
    let mut env = Environment::new();
    env.add_template(TEMPLATE_NAME, TEMPLATE)?;
    Ok(env)
}

/// Render the full dashboard page.
pub fn render_dashboard(dashboard: &Dashboard) -> Result<String, RenderError> {
    let env = environment()?;
    let html = env.get_template(TEMPLATE_NAME)?.render(context! {
        title => &dashboard.title,
        dashboard => dashboard,
    })?;
    debug!("Rendered dashboard page ({} bytes)", html.len());

    Ok(html)
}
