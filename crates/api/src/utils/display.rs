//! Plain-text rendering of reports for the terminal kiosk

use std::fmt::Write;

use recarga_core::reports::sections::{chart_rows, ranking_rows};
use recarga_core::{ChartSpec, Metric, PresentationBody, RankingTable, RenderedReport, ReportCatalog};

const BAR_WIDTH: usize = 40;

pub const HELP: &str = "\
Comandos:
  next | prev            navegar entre relatórios
  goto <n|nome>          ir para um relatório
  list                   listar relatórios
  auto on|off            ligar ou desligar a rotação automática
  window <início> <fim>  período em YYYY-MM-DD
  refresh                descartar cache e recarregar
  export                 gerar o relatório consolidado em PDF
  snapshot               salvar o gráfico atual em PNG
  help | quit";

/// Full screen for one rendered report.
pub fn render_report(report: &RenderedReport, catalog_len: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n=== Rede Recarga - Dashboard de BI ===");
    let _ = writeln!(
        out,
        "[{}/{}] {} | Período: {}",
        report.index + 1,
        catalog_len,
        report.name,
        report.window.label()
    );
    let _ = writeln!(out, "\n{}", report.presentation.title);

    match &report.presentation.body {
        PresentationBody::Metrics { metrics } => write_metrics(&mut out, metrics),
        PresentationBody::Chart { chart } => write_chart(&mut out, chart),
        PresentationBody::Tables { tables } => {
            for table in tables {
                write_table(&mut out, table);
            }
        }
        PresentationBody::Empty { message } => {
            let _ = writeln!(out, "  {message}");
        }
    }
    out
}

/// Numbered report list with the active one marked.
pub fn report_list(catalog: &ReportCatalog, current: usize) -> String {
    let mut out = String::new();
    for (index, name) in catalog.names().enumerate() {
        let marker = if index == current { '>' } else { ' ' };
        let _ = writeln!(out, "{marker} {}. {name}", index + 1);
    }
    out
}

fn write_metrics(out: &mut String, metrics: &[Metric]) {
    let width = metrics.iter().map(|m| m.label.chars().count()).max().unwrap_or(0);
    for metric in metrics {
        let _ = writeln!(out, "  {:<width$}  {}", metric.label, metric.value);
    }
}

fn write_chart(out: &mut String, chart: &ChartSpec) {
    let _ = writeln!(out, "  {}", chart.title);
    let max = chart.points.iter().map(|p| p.value).fold(0.0_f64, f64::max);
    let width = chart.points.iter().map(|p| p.label.chars().count()).max().unwrap_or(0);

    for (point, row) in chart.points.iter().zip(chart_rows(chart)) {
        let filled = if max > 0.0 { ((point.value / max) * BAR_WIDTH as f64).round() as usize } else { 0 };
        let value = row.get(1).map(String::as_str).unwrap_or_default();
        let _ = writeln!(out, "  {:<width$} {:<BAR_WIDTH$} {value}", point.label, "#".repeat(filled));
    }
}

fn write_table(out: &mut String, table: &RankingTable) {
    let _ = writeln!(out, "\n  {}", table.title);
    let rows = ranking_rows(table);
    let width = rows
        .iter()
        .filter_map(|row| row.first())
        .map(|key| key.chars().count())
        .chain(std::iter::once(table.key_header.chars().count()))
        .max()
        .unwrap_or(0);

    let _ = writeln!(out, "  {:<width$}  {}", table.key_header, table.value_header);
    for row in &rows {
        if let [key, value] = row.as_slice() {
            let _ = writeln!(out, "  {key:<width$}  {value}");
        }
    }
}
