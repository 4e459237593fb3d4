use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use recarga_domain::constants::{EXPORT_FILENAME_PREFIX, EXPORT_MIME_TYPE};
use recarga_domain::{DashboardError, DateWindow, Result};
use tracing::{debug, info};

use super::ports::{ChartRenderer, DocumentWriter, DocumentWriterFactory};
use crate::aggregation;
use crate::data::DatasetBundle;
use crate::reports::sections::{self, chart_rows, ranking_rows};
use crate::reports::{ChartSpec, Metric};

pub const EXPORT_TITLE: &str = "Relatório Consolidado - Rede Recarga";

const METRIC_HEADERS: [&str; 2] = ["Indicador", "Valor"];
const CHART_HEADERS: [&str; 2] = ["Categoria", "Valor"];

/// Sections of the consolidated document, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportSection {
    Header,
    RevenueKpis,
    PaymentMethods,
    CashStatus,
    ChannelRevenue,
    HourlySales,
    TerminalKpis,
    Rankings,
}

impl ExportSection {
    pub const ORDER: [Self; 8] = [
        Self::Header,
        Self::RevenueKpis,
        Self::PaymentMethods,
        Self::CashStatus,
        Self::ChannelRevenue,
        Self::HourlySales,
        Self::TerminalKpis,
        Self::Rankings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::RevenueKpis => "revenue_kpis",
            Self::PaymentMethods => "payment_methods",
            Self::CashStatus => "cash_status",
            Self::ChannelRevenue => "channel_revenue",
            Self::HourlySales => "hourly_sales",
            Self::TerminalKpis => "terminal_kpis",
            Self::Rankings => "rankings",
        }
    }
}

impl fmt::Display for ExportSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A finished export, ready to be offered as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedDocument {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub mime_type: &'static str,
    /// Sections actually written, in order.
    pub sections: Vec<ExportSection>,
}

impl ExportedDocument {
    /// `relatorio_rede_recarga_<YYYYMMDD>.pdf`
    pub fn filename_for(generated_on: NaiveDate) -> String {
        format!("{EXPORT_FILENAME_PREFIX}{}.pdf", generated_on.format("%Y%m%d"))
    }
}

/// Builds the consolidated document from a fully loaded bundle.
#[derive(Clone)]
pub struct ExportPipeline {
    renderer: Arc<dyn ChartRenderer>,
    writers: Arc<dyn DocumentWriterFactory>,
}

impl fmt::Debug for ExportPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportPipeline").finish_non_exhaustive()
    }
}

impl ExportPipeline {
    pub fn new(renderer: Arc<dyn ChartRenderer>, writers: Arc<dyn DocumentWriterFactory>) -> Self {
        Self { renderer, writers }
    }

    /// Write every non-empty section and serialize the document.
    ///
    /// Sections whose dataset is empty for `window` are skipped. Nothing is
    /// returned unless the whole document was written.
    ///
    /// # Errors
    /// `DashboardError::Internal` if `bundle` lacks a dataset,
    /// `DashboardError::Render` if a chart cannot be rasterized, and
    /// `DashboardError::Export` if the writer fails.
    pub fn export(
        &self,
        bundle: &DatasetBundle,
        window: &DateWindow,
        generated_on: NaiveDate,
    ) -> Result<ExportedDocument> {
        let mut writer = self.writers.create(EXPORT_TITLE);
        let mut written = Vec::with_capacity(ExportSection::ORDER.len());

        for section in ExportSection::ORDER {
            if self.write_section(section, bundle, window, generated_on, writer.as_mut())? {
                written.push(section);
            } else {
                debug!(section = %section, window = %window, "export section skipped: no data");
            }
        }

        let bytes = writer.finish()?;
        let filename = ExportedDocument::filename_for(generated_on);
        info!(
            filename = %filename,
            bytes = bytes.len(),
            sections = written.len(),
            window = %window,
            "export document built"
        );

        Ok(ExportedDocument { bytes, filename, mime_type: EXPORT_MIME_TYPE, sections: written })
    }

    /// Returns whether the section was written.
    fn write_section(
        &self,
        section: ExportSection,
        bundle: &DatasetBundle,
        window: &DateWindow,
        generated_on: NaiveDate,
        writer: &mut dyn DocumentWriter,
    ) -> Result<bool> {
        match section {
            ExportSection::Header => {
                writer.heading(EXPORT_TITLE)?;
                writer.paragraph(&format!("Período: {}", window.label()))?;
                writer.paragraph(&format!("Gerado em: {}", generated_on.format("%d/%m/%Y")))?;
                Ok(true)
            }
            ExportSection::RevenueKpis => {
                match aggregation::monthly_revenue(bundle.transactions()?) {
                    Some(summary) => {
                        write_metrics(writer, "Faturamento Geral", &sections::revenue_metrics(&summary))?;
                        Ok(true)
                    }
                    None => Ok(false),
                }
            }
            ExportSection::PaymentMethods => self.write_chart(
                writer,
                sections::payment_method_chart(&aggregation::revenue_by_payment_method(
                    bundle.transactions()?,
                )),
            ),
            ExportSection::CashStatus => self.write_chart(
                writer,
                sections::cash_status_chart(&aggregation::cash_status_breakdown(
                    bundle.cash_status()?,
                )),
            ),
            ExportSection::ChannelRevenue => self.write_chart(
                writer,
                sections::channel_chart(&aggregation::revenue_by_channel(bundle.device_revenue()?)),
            ),
            ExportSection::HourlySales => self.write_chart(
                writer,
                sections::hourly_chart(&aggregation::hourly_sales(bundle.device_revenue()?)),
            ),
            ExportSection::TerminalKpis => {
                let counts = bundle.entity_counts()?;
                write_metrics(
                    writer,
                    "Distribuição de Terminais",
                    &sections::terminal_metrics(&counts),
                )?;
                Ok(true)
            }
            ExportSection::Rankings => match sections::ranking_tables(bundle.daily_sales()?) {
                Some(tables) => {
                    for table in &tables {
                        writer.table(
                            &table.title,
                            &[table.key_header.as_str(), table.value_header.as_str()],
                            &ranking_rows(table),
                        )?;
                    }
                    Ok(true)
                }
                None => Ok(false),
            },
        }
    }

    /// Chart image on its own page, followed by its figures as a table.
    fn write_chart(&self, writer: &mut dyn DocumentWriter, chart: Option<ChartSpec>) -> Result<bool> {
        let Some(chart) = chart else {
            return Ok(false);
        };
        let image = self.renderer.rasterize(&chart)?;
        if !image.is_well_formed() {
            return Err(DashboardError::Render(format!(
                "chart '{}' rasterized to a malformed {}x{} image",
                chart.title, image.width, image.height
            )));
        }
        writer.image_page(&chart.title, &image)?;
        writer.table(&chart.title, &CHART_HEADERS, &chart_rows(&chart))?;
        Ok(true)
    }
}

fn write_metrics(writer: &mut dyn DocumentWriter, caption: &str, metrics: &[Metric]) -> Result<()> {
    let rows: Vec<Vec<String>> =
        metrics.iter().map(|metric| vec![metric.label.clone(), metric.value.clone()]).collect();
    writer.table(caption, &METRIC_HEADERS, &rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_pattern() {
        let date = NaiveDate::from_ymd_opt(2025, 8, 7).unwrap();
        assert_eq!(ExportedDocument::filename_for(date), "relatorio_rede_recarga_20250807.pdf");
    }

    #[test]
    fn test_section_order_starts_with_header_and_ends_with_rankings() {
        assert_eq!(ExportSection::ORDER.first(), Some(&ExportSection::Header));
        assert_eq!(ExportSection::ORDER.last(), Some(&ExportSection::Rankings));
        assert_eq!(ExportSection::HourlySales.to_string(), "hourly_sales");
    }
}
