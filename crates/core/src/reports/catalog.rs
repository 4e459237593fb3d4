//! Ordered catalog of the dashboard reports
//!
//! Catalog order is rotation order and the order of the manual selection
//! list. Name lookups go through an index built once at construction.

use std::collections::HashMap;

use recarga_domain::constants::EMPTY_PERIOD_MESSAGE;
use recarga_domain::{DashboardError, DatasetKind, Result};
use serde::{Deserialize, Serialize};

use super::presentation::{Presentation, PresentationBody};
use super::sections;
use crate::aggregation;
use crate::data::DatasetBundle;

/// The reports the dashboard knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    RevenueKpis,
    PaymentMethods,
    CashStatus,
    ChannelRevenue,
    PeakHours,
    TerminalKpis,
    Rankings,
}

impl ReportKind {
    /// Datasets that must be loaded before [`ReportKind::render`].
    pub fn required_datasets(&self) -> &'static [DatasetKind] {
        match self {
            Self::RevenueKpis | Self::PaymentMethods => &[DatasetKind::Transactions],
            Self::CashStatus => &[DatasetKind::CashStatus],
            Self::ChannelRevenue | Self::PeakHours => &[DatasetKind::DeviceRevenue],
            Self::TerminalKpis => &[DatasetKind::EntityCounts],
            Self::Rankings => &[DatasetKind::DailySales],
        }
    }

    /// Stable identifier, also used to name chart snapshots.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::RevenueKpis => "revenue_kpis",
            Self::PaymentMethods => "payment_methods",
            Self::CashStatus => "cash_status",
            Self::ChannelRevenue => "channel_revenue",
            Self::PeakHours => "peak_hours",
            Self::TerminalKpis => "terminal_kpis",
            Self::Rankings => "rankings",
        }
    }

    /// Heading shown above the report body.
    pub fn heading(&self) -> &'static str {
        match self {
            Self::RevenueKpis => "Financeiro: Faturamento Geral",
            Self::PaymentMethods => "Financeiro: Receita por Método de Pagamento",
            Self::CashStatus => "Financeiro: Saúde de Contas a Receber",
            Self::ChannelRevenue => "Vendas: Faturamento por Canal",
            Self::PeakHours => "Vendas: Análise de Horários de Pico",
            Self::TerminalKpis => "Operacional: Distribuição de Terminais",
            Self::Rankings => "Operacional: Rankings de Desempenho (Top 5)",
        }
    }

    /// Render from an already-filtered bundle.
    ///
    /// # Errors
    /// `DashboardError::Internal` if a required dataset was not loaded.
    pub fn render(&self, data: &DatasetBundle) -> Result<Presentation> {
        let body = match self {
            Self::RevenueKpis => aggregation::monthly_revenue(data.transactions()?)
                .map(|summary| PresentationBody::Metrics {
                    metrics: sections::revenue_metrics(&summary),
                }),
            Self::PaymentMethods => sections::payment_method_chart(
                &aggregation::revenue_by_payment_method(data.transactions()?),
            )
            .map(|chart| PresentationBody::Chart { chart }),
            Self::CashStatus => sections::cash_status_chart(&aggregation::cash_status_breakdown(
                data.cash_status()?,
            ))
            .map(|chart| PresentationBody::Chart { chart }),
            Self::ChannelRevenue => sections::channel_chart(&aggregation::revenue_by_channel(
                data.device_revenue()?,
            ))
            .map(|chart| PresentationBody::Chart { chart }),
            Self::PeakHours => {
                sections::hourly_chart(&aggregation::hourly_sales(data.device_revenue()?))
                    .map(|chart| PresentationBody::Chart { chart })
            }
            Self::TerminalKpis => Some(PresentationBody::Metrics {
                metrics: sections::terminal_metrics(&data.entity_counts()?),
            }),
            Self::Rankings => sections::ranking_tables(data.daily_sales()?)
                .map(|tables| PresentationBody::Tables { tables }),
        };

        Ok(Presentation {
            title: self.heading().to_string(),
            body: body.unwrap_or_else(|| PresentationBody::Empty {
                message: EMPTY_PERIOD_MESSAGE.to_string(),
            }),
        })
    }
}

/// A named report. Immutable once the catalog is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportDescriptor {
    name: String,
    kind: ReportKind,
}

impl ReportDescriptor {
    pub fn new(name: impl Into<String>, kind: ReportKind) -> Self {
        Self { name: name.into(), kind }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ReportKind {
        self.kind
    }

    pub fn inputs(&self) -> &'static [DatasetKind] {
        self.kind.required_datasets()
    }

    pub fn render(&self, data: &DatasetBundle) -> Result<Presentation> {
        self.kind.render(data)
    }
}

/// Ordered, non-empty list of uniquely named reports.
#[derive(Debug, Clone)]
pub struct ReportCatalog {
    reports: Vec<ReportDescriptor>,
    index: HashMap<String, usize>,
}

impl ReportCatalog {
    /// Build a catalog, validating that it is non-empty and names are unique.
    ///
    /// # Errors
    /// `DashboardError::Internal` for an empty catalog or a duplicate name.
    pub fn new(reports: Vec<ReportDescriptor>) -> Result<Self> {
        if reports.is_empty() {
            return Err(DashboardError::Internal("report catalog cannot be empty".into()));
        }
        let mut index = HashMap::with_capacity(reports.len());
        for (position, report) in reports.iter().enumerate() {
            if index.insert(report.name.clone(), position).is_some() {
                return Err(DashboardError::Internal(format!(
                    "duplicate report name in catalog: {}",
                    report.name
                )));
            }
        }
        Ok(Self { reports, index })
    }

    /// The seven standard dashboard reports, in rotation order.
    pub fn standard() -> Self {
        let reports = vec![
            ReportDescriptor::new("Financeiro: Faturamento Geral", ReportKind::RevenueKpis),
            ReportDescriptor::new("Financeiro: Métodos de Pagamento", ReportKind::PaymentMethods),
            ReportDescriptor::new("Financeiro: Contas a Receber", ReportKind::CashStatus),
            ReportDescriptor::new("Vendas: Faturamento por Canal", ReportKind::ChannelRevenue),
            ReportDescriptor::new("Vendas: Horários de Pico", ReportKind::PeakHours),
            ReportDescriptor::new("Operacional: Distribuição de Terminais", ReportKind::TerminalKpis),
            ReportDescriptor::new("Operacional: Rankings de Desempenho", ReportKind::Rankings),
        ];
        let index = reports
            .iter()
            .enumerate()
            .map(|(position, report)| (report.name.clone(), position))
            .collect();
        Self { reports, index }
    }

    /// Number of reports; never zero.
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ReportDescriptor> {
        self.reports.get(index)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.reports.iter().map(ReportDescriptor::name)
    }

    pub fn as_slice(&self) -> &[ReportDescriptor] {
        &self.reports
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ReportDescriptor> {
        self.reports.iter()
    }
}

impl<'a> IntoIterator for &'a ReportCatalog {
    type Item = &'a ReportDescriptor;
    type IntoIter = std::slice::Iter<'a, ReportDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.reports.iter()
    }
}
