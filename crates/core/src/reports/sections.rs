//! Section builders shared by the interactive reports and the export
//!
//! Both paths build their figures here from the same aggregations, which is
//! what keeps an exported document numerically identical to the screen.
//! Builders return `None` when the underlying data is empty.

use std::collections::BTreeMap;

use recarga_domain::constants::DEFAULT_TOP_N;
use recarga_domain::{CashStatus, DailySalesRecord, DeviceType, EntityCounts, PaymentMethod};

use super::presentation::{ChartKind, ChartPoint, ChartSpec, Metric, RankingTable, Rgb};
use crate::aggregation::{top_n, HourlyTotal, RankingKey, RevenueSummary};
use crate::format::{format_count, format_currency};

pub const PAYMENT_METHODS_CHART_TITLE: &str = "Participação por Método de Pagamento";
pub const CASH_STATUS_CHART_TITLE: &str = "Status de Transações em Dinheiro";
pub const CHANNEL_CHART_TITLE: &str = "Faturamento Total por Canal de Origem";
pub const HOURLY_CHART_TITLE: &str = "Volume de Vendas por Hora do Dia";

/// Revenue KPI tiles.
pub fn revenue_metrics(summary: &RevenueSummary) -> Vec<Metric> {
    vec![
        Metric::new("Faturamento Mensal", format_currency(summary.total_paid)),
        Metric::new("Ticket Médio", format_currency(summary.average_ticket)),
    ]
}

/// Terminal distribution KPI tiles.
pub fn terminal_metrics(counts: &EntityCounts) -> Vec<Metric> {
    vec![
        Metric::new("Total de PDVs", format_count(counts.total_pdv_units)),
        Metric::new("Terminais POS", format_count(counts.pos_terminal_count)),
        Metric::new("Terminais Totem", format_count(counts.totem_terminal_count)),
        Metric::new("Terminais Lista", format_count(counts.list_pos_terminal_count)),
    ]
}

pub fn payment_method_chart(totals: &BTreeMap<PaymentMethod, f64>) -> Option<ChartSpec> {
    chart(
        PAYMENT_METHODS_CHART_TITLE,
        ChartKind::Donut,
        totals.iter().map(|(method, total)| ChartPoint {
            label: method.to_string(),
            value: *total,
            color: None,
        }),
    )
}

pub fn cash_status_chart(totals: &BTreeMap<CashStatus, f64>) -> Option<ChartSpec> {
    chart(
        CASH_STATUS_CHART_TITLE,
        ChartKind::Bar,
        totals.iter().map(|(status, total)| ChartPoint {
            label: status.display_label().to_string(),
            value: *total,
            color: Some(status_color(*status)),
        }),
    )
}

pub fn channel_chart(totals: &BTreeMap<DeviceType, f64>) -> Option<ChartSpec> {
    chart(
        CHANNEL_CHART_TITLE,
        ChartKind::Bar,
        totals.iter().map(|(device, total)| ChartPoint {
            label: device.to_string(),
            value: *total,
            color: None,
        }),
    )
}

pub fn hourly_chart(hourly: &[HourlyTotal]) -> Option<ChartSpec> {
    chart(
        HOURLY_CHART_TITLE,
        ChartKind::Bar,
        hourly.iter().map(|bucket| ChartPoint {
            label: bucket.hour.to_string(),
            value: bucket.total,
            color: None,
        }),
    )
}

/// Top PDVs, then top accredited parties.
pub fn ranking_tables(daily_sales: &[DailySalesRecord]) -> Option<Vec<RankingTable>> {
    if daily_sales.is_empty() {
        return None;
    }
    Some(vec![
        RankingTable {
            title: "PDVs por Faturamento".into(),
            key_header: "PDV".into(),
            value_header: "Faturamento".into(),
            rows: top_n(daily_sales, RankingKey::Pdv, DEFAULT_TOP_N),
        },
        RankingTable {
            title: "Credenciados por Faturamento".into(),
            key_header: "Credenciado".into(),
            value_header: "Faturamento".into(),
            rows: top_n(daily_sales, RankingKey::Credenciado, DEFAULT_TOP_N),
        },
    ])
}

/// Label/value rows of a chart, as printed beside a rasterized chart.
pub fn chart_rows(chart: &ChartSpec) -> Vec<Vec<String>> {
    chart
        .points
        .iter()
        .map(|point| vec![point.label.clone(), format_currency(point.value)])
        .collect()
}

/// Key/value rows of a ranking table.
pub fn ranking_rows(table: &RankingTable) -> Vec<Vec<String>> {
    table.rows.iter().map(|entry| vec![entry.key.clone(), format_currency(entry.total)]).collect()
}

fn status_color(status: CashStatus) -> Rgb {
    match status {
        CashStatus::Received => Rgb::GREEN,
        CashStatus::Pending => Rgb::ORANGE,
        CashStatus::Overdue => Rgb::RED,
    }
}

fn chart(
    title: &str,
    kind: ChartKind,
    points: impl Iterator<Item = ChartPoint>,
) -> Option<ChartSpec> {
    let points: Vec<ChartPoint> = points.collect();
    if points.is_empty() {
        return None;
    }
    Some(ChartSpec { title: title.to_string(), kind, points })
}
