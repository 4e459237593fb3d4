//! PostgreSQL-backed implementation of the `DataSource` port.
//!
//! Reads the reporting materialized views. Windowed queries filter with an
//! inclusive `BETWEEN` on the calendar date; rows are checked against the
//! window again after decoding, so a view with a mismatched time zone cannot
//! leak rows from outside the window. Unknown enum strings and negative
//! amounts fail the whole fetch with `DashboardError::DataSource`.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use recarga_core::DataSource;
use recarga_domain::{
    non_negative, CashStatusRecord, ChannelValues, DailySalesRecord, DashboardError,
    DatabaseConfig, DateWindow, DeviceRevenueRecord, EntityCounts, Result, TransactionRecord,
};
use tokio_postgres::Row;
use tracing::{info, instrument, warn};

use super::connection::PgConnector;
use crate::errors::InfraError;

const TRANSACTIONS_QUERY: &str = "SELECT unique_id::text, transaction_date::timestamp, \
     payment_method::text, paid_value::float8, pdv_id::int8, accredited_id::int8 \
     FROM mv_all_transactions \
     WHERE transaction_date::date BETWEEN $1 AND $2 \
     ORDER BY transaction_date";

const CASH_STATUS_QUERY: &str = "SELECT status::text, value::float8 FROM mv_recharge_status";

const DEVICE_REVENUE_QUERY: &str = "SELECT transaction_date::timestamp, device_type::text, \
     value::float8, pdv_id::int8, serial::text \
     FROM mv_device_revenue_log \
     WHERE transaction_date::date BETWEEN $1 AND $2 \
     ORDER BY transaction_date";

const DAILY_SALES_QUERY: &str = "SELECT data::date, pdv::text, credenciado::text, \
     vc::float8, ve::float8, vt::float8, celular::float8, credito::float8, lista::float8 \
     FROM mv_daily_sales_report \
     WHERE data::date BETWEEN $1 AND $2 \
     ORDER BY data";

const ENTITY_COUNTS_QUERY: &str = "SELECT total_pdv_units::int8, pos_terminal_count::int8, \
     totem_terminal_count::int8, list_pos_terminal_count::int8 \
     FROM mv_entity_counts LIMIT 1";

/// Data source reading the `mv_*` reporting views.
#[derive(Debug, Clone)]
pub struct PostgresDataSource {
    connector: PgConnector,
}

impl PostgresDataSource {
    pub fn new(connector: PgConnector) -> Self {
        Self { connector }
    }

    /// # Errors
    /// `DashboardError::Configuration` if the settings cannot be turned into
    /// a connector.
    pub fn from_config(settings: &DatabaseConfig) -> Result<Self> {
        Ok(Self::new(PgConnector::from_config(settings)?))
    }

    async fn query_window(&self, sql: &str, window: &DateWindow) -> Result<Vec<Row>> {
        let conn = self.connector.connect().await?;
        let (start, end) = (window.start(), window.end());
        let rows = conn.query(sql, &[&start, &end]).await.map_err(InfraError::from)?;
        Ok(rows)
    }
}

#[async_trait]
impl DataSource for PostgresDataSource {
    #[instrument(skip_all, fields(window = %window))]
    async fn fetch_transactions(&self, window: &DateWindow) -> Result<Vec<TransactionRecord>> {
        let rows = self.query_window(TRANSACTIONS_QUERY, window).await?;
        let records = decode_windowed(&rows, window, map_transaction, |tx| {
            window.contains_timestamp(tx.timestamp)
        })?;
        info!(rows = records.len(), "transactions fetched");
        Ok(records)
    }

    #[instrument(skip_all)]
    async fn fetch_cash_status(&self) -> Result<Vec<CashStatusRecord>> {
        let conn = self.connector.connect().await?;
        let rows = conn.query(CASH_STATUS_QUERY, &[]).await.map_err(InfraError::from)?;
        let records = rows.iter().map(map_cash_status).collect::<Result<Vec<_>>>()?;
        info!(rows = records.len(), "cash status fetched");
        Ok(records)
    }

    #[instrument(skip_all, fields(window = %window))]
    async fn fetch_device_revenue(&self, window: &DateWindow) -> Result<Vec<DeviceRevenueRecord>> {
        let rows = self.query_window(DEVICE_REVENUE_QUERY, window).await?;
        let records = decode_windowed(&rows, window, map_device_revenue, |record| {
            window.contains_timestamp(record.timestamp)
        })?;
        info!(rows = records.len(), "device revenue fetched");
        Ok(records)
    }

    #[instrument(skip_all, fields(window = %window))]
    async fn fetch_daily_sales(&self, window: &DateWindow) -> Result<Vec<DailySalesRecord>> {
        let rows = self.query_window(DAILY_SALES_QUERY, window).await?;
        let records =
            decode_windowed(&rows, window, map_daily_sales, |row| window.contains_date(row.date))?;
        info!(rows = records.len(), "daily sales fetched");
        Ok(records)
    }

    #[instrument(skip_all)]
    async fn fetch_entity_counts(&self) -> Result<EntityCounts> {
        let conn = self.connector.connect().await?;
        let row = require_row(
            conn.query_opt(ENTITY_COUNTS_QUERY, &[]).await.map_err(InfraError::from)?,
            "mv_entity_counts",
        )?;

        let counts = EntityCounts {
            total_pdv_units: count(&row, 0, "total_pdv_units")?,
            pos_terminal_count: count(&row, 1, "pos_terminal_count")?,
            totem_terminal_count: count(&row, 2, "totem_terminal_count")?,
            list_pos_terminal_count: count(&row, 3, "list_pos_terminal_count")?,
        };
        info!(total_pdv_units = counts.total_pdv_units, "entity counts fetched");
        Ok(counts)
    }
}

/* -------------------------------------------------------------------------- */
/* Row mapping */
/* -------------------------------------------------------------------------- */

fn decode_windowed<T>(
    rows: &[Row],
    window: &DateWindow,
    map: fn(&Row) -> Result<T>,
    inside: impl Fn(&T) -> bool,
) -> Result<Vec<T>> {
    let mut records = Vec::with_capacity(rows.len());
    let mut dropped = 0usize;
    for row in rows {
        let record = map(row)?;
        if inside(&record) {
            records.push(record);
        } else {
            dropped += 1;
        }
    }
    if dropped > 0 {
        warn!(dropped, window = %window, "rows outside the window were discarded");
    }
    Ok(records)
}

fn column<'a, T>(row: &'a Row, idx: usize, name: &str) -> Result<T>
where
    T: tokio_postgres::types::FromSql<'a>,
{
    row.try_get(idx)
        .map_err(|e| DashboardError::DataSource(format!("column {name} could not be decoded: {e}")))
}

fn map_transaction(row: &Row) -> Result<TransactionRecord> {
    let method: String = column(row, 2, "payment_method")?;
    Ok(TransactionRecord {
        id: column(row, 0, "unique_id")?,
        timestamp: column::<NaiveDateTime>(row, 1, "transaction_date")?,
        payment_method: method.parse()?,
        paid_value: non_negative("paid_value", column(row, 3, "paid_value")?)?,
        pdv_id: column(row, 4, "pdv_id")?,
        accredited_id: column(row, 5, "accredited_id")?,
    })
}

fn map_cash_status(row: &Row) -> Result<CashStatusRecord> {
    let status: String = column(row, 0, "status")?;
    Ok(CashStatusRecord {
        status: status.parse()?,
        value: non_negative("value", column(row, 1, "value")?)?,
    })
}

fn map_device_revenue(row: &Row) -> Result<DeviceRevenueRecord> {
    let device_type: String = column(row, 1, "device_type")?;
    Ok(DeviceRevenueRecord {
        timestamp: column::<NaiveDateTime>(row, 0, "transaction_date")?,
        device_type: device_type.parse()?,
        value: non_negative("value", column(row, 2, "value")?)?,
        pdv_id: column(row, 3, "pdv_id")?,
        serial: column(row, 4, "serial")?,
    })
}

fn map_daily_sales(row: &Row) -> Result<DailySalesRecord> {
    Ok(DailySalesRecord {
        date: column::<NaiveDate>(row, 0, "data")?,
        pdv: column(row, 1, "pdv")?,
        credenciado: column(row, 2, "credenciado")?,
        channels: ChannelValues {
            vc: non_negative("vc", column(row, 3, "vc")?)?,
            ve: non_negative("ve", column(row, 4, "ve")?)?,
            vt: non_negative("vt", column(row, 5, "vt")?)?,
            celular: non_negative("celular", column(row, 6, "celular")?)?,
            credito: non_negative("credito", column(row, 7, "credito")?)?,
            lista: non_negative("lista", column(row, 8, "lista")?)?,
        },
    })
}

fn count(row: &Row, idx: usize, name: &str) -> Result<u64> {
    let raw: i64 = column(row, idx, name)?;
    to_count(name, raw)
}

/// A single-row view with no row is a data source failure, never a zero.
fn require_row<T>(row: Option<T>, view: &str) -> Result<T> {
    row.ok_or_else(|| DashboardError::DataSource(format!("{view} returned no row")))
}

fn to_count(name: &str, raw: i64) -> Result<u64> {
    u64::try_from(raw)
        .map_err(|_| DashboardError::DataSource(format!("{name} must be non-negative, got {raw}")))
}
