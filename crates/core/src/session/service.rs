//! Render and export use cases

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use recarga_domain::{DateWindow, Result};
use serde::Serialize;
use tracing::{error, info};

use crate::data::{DataSource, DatasetBundle};
use crate::export::{ExportPipeline, ExportedDocument};
use crate::reports::{Presentation, ReportCatalog};
use crate::rotation::{Countdown, RotationController};

/// A report rendered for one window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedReport {
    pub index: usize,
    pub name: String,
    pub window: DateWindow,
    pub presentation: Presentation,
}

/// Outcome of a full render cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderCycle {
    pub report: RenderedReport,
    /// Wait before the next render; `None` when auto-rotation is off.
    pub countdown: Option<Countdown>,
}

/// Drives rendering, navigation and export for one dashboard.
///
/// The session owns the rotation state; the presentation layer owns the
/// clock and decides when to call [`DashboardSession::render_cycle`].
pub struct DashboardSession {
    source: Arc<dyn DataSource>,
    controller: RotationController,
    exporter: ExportPipeline,
}

impl fmt::Debug for DashboardSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DashboardSession")
            .field("state", &self.controller.state())
            .finish_non_exhaustive()
    }
}

impl DashboardSession {
    /// Create a session starting at the first report, auto-rotating.
    pub fn new(
        source: Arc<dyn DataSource>,
        catalog: Arc<ReportCatalog>,
        exporter: ExportPipeline,
    ) -> Self {
        Self { source, controller: RotationController::new(catalog), exporter }
    }

    pub fn controller(&self) -> &RotationController {
        &self.controller
    }

    /// Navigation goes through the controller directly.
    pub fn controller_mut(&mut self) -> &mut RotationController {
        &mut self.controller
    }

    /// Render the active report for `[start, end]` without touching rotation.
    ///
    /// The window is validated before anything is fetched, and only the
    /// datasets the active report declares are loaded.
    ///
    /// # Errors
    /// `DashboardError::InvalidWindow` when `start > end`, or any data source
    /// error for the datasets the report needs.
    pub async fn render_current(&self, start: NaiveDate, end: NaiveDate) -> Result<RenderedReport> {
        let window = DateWindow::new(start, end)?;
        let index = self.controller.current_index();
        let report = self.controller.current();

        let bundle = DatasetBundle::fetch(self.source.as_ref(), report.inputs(), &window).await?;
        let presentation = report.render(&bundle)?;

        Ok(RenderedReport { index, name: report.name().to_string(), window, presentation })
    }

    /// Render the active report, then apply the post-render rotation step.
    ///
    /// A failed render leaves the rotation state untouched and schedules
    /// nothing.
    ///
    /// # Errors
    /// Same as [`DashboardSession::render_current`].
    pub async fn render_cycle(&mut self, start: NaiveDate, end: NaiveDate) -> Result<RenderCycle> {
        let report = match self.render_current(start, end).await {
            Ok(report) => report,
            Err(err) => {
                error!(
                    error = %err,
                    kind = err.label(),
                    report = self.controller.current().name(),
                    "render cycle failed"
                );
                return Err(err);
            }
        };

        let countdown = self.controller.after_render();
        info!(
            report = %report.name,
            window = %report.window,
            empty = report.presentation.is_empty(),
            next_index = self.controller.current_index(),
            auto_rotate = self.controller.auto_rotate(),
            "report rendered"
        );
        Ok(RenderCycle { report, countdown })
    }

    /// Build the consolidated export for `[start, end]`.
    ///
    /// # Errors
    /// `DashboardError::InvalidWindow` when `start > end`; data source,
    /// render and export errors otherwise.
    pub async fn export(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        today: NaiveDate,
    ) -> Result<ExportedDocument> {
        let window = DateWindow::new(start, end)?;
        let bundle = DatasetBundle::fetch_all(self.source.as_ref(), &window).await?;
        self.exporter.export(&bundle, &window, today)
    }
}
