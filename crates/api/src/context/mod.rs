//! Application context - dependency wiring and kiosk state

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context};
use chrono::NaiveDate;
use recarga_core::{
    ChartRenderer, Countdown, DashboardSession, DataSource, ExportPipeline, PresentationBody,
    RenderedReport, ReportCatalog,
};
use recarga_domain::{DashboardConfig, DataSourceMode, DateWindow, Result};
use recarga_infra::config::load_database_config;
use recarga_infra::{
    encode_png, CacheConfig, CachedDataSource, PdfWriterFactory, PostgresDataSource,
    RasterChartRenderer, SampleDataSource,
};
use tracing::info;

/// Type alias for the shared, cached data source
type SharedSource = CachedDataSource<Arc<dyn DataSource>>;

/// Countdown to the next auto-rotating render or retry.
#[derive(Debug, Clone, Copy)]
pub struct PendingRotation {
    pub countdown: Countdown,
    pub started: Instant,
}

impl PendingRotation {
    pub fn is_due(&self, now: Instant) -> bool {
        self.countdown.is_elapsed(now.saturating_duration_since(self.started))
    }

    pub fn status_line(&self, now: Instant) -> String {
        self.countdown.status_line(now.saturating_duration_since(self.started))
    }
}

/// Application context - holds the session and what is on screen
///
/// The rotation controller advances right after each render, so every
/// operator command first re-anchors it on the report actually displayed.
/// Navigation then turns auto-rotation off like any manual selection.
pub struct AppContext {
    config: DashboardConfig,
    window: DateWindow,
    source: Arc<SharedSource>,
    renderer: Arc<RasterChartRenderer>,
    session: DashboardSession,
    displayed: Option<RenderedReport>,
    pending: Option<PendingRotation>,
}

impl AppContext {
    /// Wire the data source, cache, renderers and session from `config`.
    ///
    /// # Errors
    /// Fails when PostgreSQL is selected and its connection settings are
    /// missing or invalid.
    pub fn new(config: DashboardConfig, today: NaiveDate) -> anyhow::Result<Self> {
        let backend = build_source(&config, today)?;
        Ok(Self::with_source(config, backend, today))
    }

    /// Wire the context over an already-built backend.
    pub fn with_source(
        config: DashboardConfig,
        backend: Arc<dyn DataSource>,
        today: NaiveDate,
    ) -> Self {
        let cache_config = CacheConfig::from(&config);
        cache_config.log_config();
        let source = Arc::new(CachedDataSource::new(backend, cache_config));

        let renderer = Arc::new(RasterChartRenderer::default());
        let exporter = ExportPipeline::new(renderer.clone(), Arc::new(PdfWriterFactory));
        let session =
            DashboardSession::new(source.clone(), Arc::new(ReportCatalog::standard()), exporter);

        let window = config.default_window.unwrap_or_else(|| DateWindow::month_to_date(today));
        info!(
            data_source = ?config.data_source,
            window = %window,
            export_dir = %config.export_dir.display(),
            "dashboard context initialized"
        );

        Self { config, window, source, renderer, session, displayed: None, pending: None }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn window(&self) -> DateWindow {
        self.window
    }

    pub fn session(&self) -> &DashboardSession {
        &self.session
    }

    pub fn displayed(&self) -> Option<&RenderedReport> {
        self.displayed.as_ref()
    }

    pub fn pending(&self) -> Option<&PendingRotation> {
        self.pending.as_ref()
    }

    pub fn rotation_due(&self, now: Instant) -> bool {
        self.pending.is_some_and(|pending| pending.is_due(now))
    }

    pub fn status_line(&self, now: Instant) -> Option<String> {
        self.pending.map(|pending| pending.status_line(now))
    }

    /// Render the controller's current report and schedule the next rotation.
    ///
    /// On failure the previous screen stays recorded. While auto-rotating,
    /// the same report is retried after the usual interval.
    pub async fn show_current(&mut self, now: Instant) -> Result<&RenderedReport> {
        let start = self.window.start();
        let end = self.window.end();
        match self.session.render_cycle(start, end).await {
            Ok(cycle) => {
                self.pending =
                    cycle.countdown.map(|countdown| PendingRotation { countdown, started: now });
                Ok(self.displayed.insert(cycle.report))
            }
            Err(err) => {
                self.pending = self
                    .session
                    .controller()
                    .after_failure()
                    .map(|countdown| PendingRotation { countdown, started: now });
                Err(err)
            }
        }
    }

    pub async fn next(&mut self, now: Instant) -> Result<&RenderedReport> {
        self.anchor()?;
        self.session.controller_mut().next();
        self.show_current(now).await
    }

    pub async fn previous(&mut self, now: Instant) -> Result<&RenderedReport> {
        self.anchor()?;
        self.session.controller_mut().previous();
        self.show_current(now).await
    }

    /// Jump to a report by 1-based position or by exact name.
    ///
    /// An unknown target leaves the screen and rotation untouched.
    pub async fn goto(&mut self, target: &str, now: Instant) -> Result<&RenderedReport> {
        self.anchor()?;
        match target.parse::<usize>() {
            Ok(position) => {
                self.session.controller_mut().select_index(position.wrapping_sub(1))?;
            }
            Err(_) => {
                self.session.controller_mut().select_by_name(target)?;
            }
        }
        self.show_current(now).await
    }

    /// Turning rotation on re-renders the current report to restart the
    /// countdown; turning it off cancels the pending one.
    pub async fn set_auto_rotate(
        &mut self,
        enabled: bool,
        now: Instant,
    ) -> Result<Option<&RenderedReport>> {
        self.anchor()?;
        self.session.controller_mut().toggle_auto_rotate(enabled);
        if enabled {
            return self.show_current(now).await.map(Some);
        }
        self.pending = None;
        Ok(None)
    }

    /// Switch to `[start, end]`; a reversed window is rejected and the current
    /// window kept.
    pub async fn set_window(
        &mut self,
        start: NaiveDate,
        end: NaiveDate,
        now: Instant,
    ) -> Result<&RenderedReport> {
        let window = DateWindow::new(start, end)?;
        self.anchor()?;
        self.window = window;
        self.show_current(now).await
    }

    /// Drop every cached dataset and re-render.
    pub async fn refresh(&mut self, now: Instant) -> Result<&RenderedReport> {
        self.source.invalidate_all();
        self.anchor()?;
        self.show_current(now).await
    }

    /// Build the consolidated PDF for the current window into `export_dir`.
    pub async fn export(&self, today: NaiveDate) -> anyhow::Result<PathBuf> {
        let document = self.session.export(self.window.start(), self.window.end(), today).await?;

        tokio::fs::create_dir_all(&self.config.export_dir).await.with_context(|| {
            format!("failed to create export dir {}", self.config.export_dir.display())
        })?;
        let path = self.config.export_dir.join(&document.filename);
        tokio::fs::write(&path, &document.bytes)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;

        info!(
            path = %path.display(),
            bytes = document.bytes.len(),
            mime_type = document.mime_type,
            "export written"
        );
        Ok(path)
    }

    /// Save the displayed chart as `<export_dir>/<report>.png`.
    pub async fn snapshot(&self) -> anyhow::Result<PathBuf> {
        let Some(report) = &self.displayed else {
            bail!("no report rendered yet");
        };
        let PresentationBody::Chart { chart } = &report.presentation.body else {
            bail!("report '{}' has no chart to snapshot", report.name);
        };
        let slug = self
            .session
            .controller()
            .catalog()
            .get(report.index)
            .map(|descriptor| descriptor.kind().slug())
            .context("displayed report is not in the catalog")?;

        let image = self.renderer.rasterize(chart)?;
        let png = encode_png(&image)?;

        tokio::fs::create_dir_all(&self.config.export_dir).await.with_context(|| {
            format!("failed to create export dir {}", self.config.export_dir.display())
        })?;
        let path = self.config.export_dir.join(format!("{slug}.png"));
        tokio::fs::write(&path, &png)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;

        info!(path = %path.display(), bytes = png.len(), "chart snapshot written");
        Ok(path)
    }

    /// Point the controller back at the displayed report.
    fn anchor(&mut self) -> Result<()> {
        if let Some(report) = &self.displayed {
            let index = report.index;
            self.session.controller_mut().rewind_to(index)?;
        }
        Ok(())
    }
}

fn build_source(config: &DashboardConfig, today: NaiveDate) -> anyhow::Result<Arc<dyn DataSource>> {
    match config.data_source {
        DataSourceMode::Postgres => {
            let settings = load_database_config()
                .context("PostgreSQL selected but connection settings are incomplete")?;
            info!("using PostgreSQL data source");
            Ok(Arc::new(PostgresDataSource::from_config(&settings)?))
        }
        DataSourceMode::Sample => {
            info!(seed = config.sample.seed, "using sample data source");
            Ok(Arc::new(SampleDataSource::generate(&config.sample, today)))
        }
    }
}
