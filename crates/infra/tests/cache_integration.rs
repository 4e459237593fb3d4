//! Read-through behaviour of the dataset cache

mod support;

use std::sync::Arc;
use std::time::Duration;

use recarga_core::DataSource;
use recarga_domain::EntityCounts;
use recarga_infra::{CacheConfig, CachedDataSource};
use support::{date, window, CountingSource};

fn cached(ttl: Duration) -> CachedDataSource<Arc<CountingSource>> {
    let config = CacheConfig { entity_counts_ttl: ttl, window_capacity: 16 };
    CachedDataSource::new(Arc::new(CountingSource::new()), config)
}

#[tokio::test]
async fn test_same_window_is_fetched_once() {
    let source = cached(Duration::from_secs(300));
    let august = window(date(2025, 8, 1), date(2025, 8, 31));

    let first = source.fetch_transactions(&august).await.unwrap();
    let second = source.fetch_transactions(&august).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
    assert_eq!(source.inner().transaction_fetches(), 1);
}

#[tokio::test]
async fn test_distinct_windows_are_cached_separately() {
    let source = cached(Duration::from_secs(300));
    let early = window(date(2025, 8, 1), date(2025, 8, 10));
    let month = window(date(2025, 8, 1), date(2025, 8, 31));

    assert_eq!(source.fetch_transactions(&early).await.unwrap().len(), 1);
    assert_eq!(source.fetch_transactions(&month).await.unwrap().len(), 2);
    assert_eq!(source.fetch_transactions(&early).await.unwrap().len(), 1);

    assert_eq!(source.inner().transaction_fetches(), 2);
}

#[tokio::test]
async fn test_datasets_do_not_share_entries() {
    let source = cached(Duration::from_secs(300));
    let august = window(date(2025, 8, 1), date(2025, 8, 31));

    source.fetch_transactions(&august).await.unwrap();
    source.fetch_device_revenue(&august).await.unwrap();
    source.fetch_daily_sales(&august).await.unwrap();
    source.fetch_daily_sales(&august).await.unwrap();
    source.fetch_cash_status().await.unwrap();
    source.fetch_cash_status().await.unwrap();

    let inner = source.inner();
    assert_eq!(inner.transaction_fetches(), 1);
    assert_eq!(inner.device_fetches(), 1);
    assert_eq!(inner.daily_fetches(), 1);
    assert_eq!(inner.cash_fetches(), 1);
}

#[tokio::test]
async fn test_errors_are_not_cached() {
    let source = cached(Duration::from_secs(300));
    let august = window(date(2025, 8, 1), date(2025, 8, 31));

    source.inner().set_failing(true);
    let err = source.fetch_transactions(&august).await.unwrap_err();
    assert_eq!(err.label(), "data_source");
    assert!(source.fetch_entity_counts().await.is_err());

    source.inner().set_failing(false);
    assert_eq!(source.fetch_transactions(&august).await.unwrap().len(), 2);
    assert_eq!(source.fetch_entity_counts().await.unwrap().total_pdv_units, 10);

    assert_eq!(source.inner().transaction_fetches(), 2);
    assert_eq!(source.inner().count_fetches(), 2);
}

#[tokio::test]
async fn test_entity_counts_expire_after_ttl() {
    let source = cached(Duration::from_millis(50));

    assert_eq!(source.fetch_entity_counts().await.unwrap().total_pdv_units, 10);
    source.inner().set_counts(EntityCounts {
        total_pdv_units: 12,
        pos_terminal_count: 6,
        totem_terminal_count: 2,
        list_pos_terminal_count: 1,
    });

    // still served from cache inside the TTL
    assert_eq!(source.fetch_entity_counts().await.unwrap().total_pdv_units, 10);
    assert_eq!(source.inner().count_fetches(), 1);

    tokio::time::sleep(Duration::from_millis(120)).await;
    assert_eq!(source.fetch_entity_counts().await.unwrap().total_pdv_units, 12);
    assert_eq!(source.inner().count_fetches(), 2);
}

#[tokio::test]
async fn test_inconsistent_counts_are_served_unchanged() {
    let source = cached(Duration::from_secs(300));
    let inconsistent = EntityCounts {
        total_pdv_units: 5,
        pos_terminal_count: 6,
        totem_terminal_count: 2,
        list_pos_terminal_count: 1,
    };
    assert!(!inconsistent.is_consistent());
    source.inner().set_counts(inconsistent);

    assert_eq!(source.fetch_entity_counts().await.unwrap(), inconsistent);
    assert_eq!(source.fetch_entity_counts().await.unwrap(), inconsistent);
    assert_eq!(source.inner().count_fetches(), 1);
}

#[tokio::test]
async fn test_invalidate_all_forces_refetch() {
    let source = cached(Duration::from_secs(300));
    let august = window(date(2025, 8, 1), date(2025, 8, 31));

    source.fetch_transactions(&august).await.unwrap();
    source.fetch_cash_status().await.unwrap();
    source.fetch_entity_counts().await.unwrap();
    source.invalidate_all();
    source.fetch_transactions(&august).await.unwrap();
    source.fetch_cash_status().await.unwrap();
    source.fetch_entity_counts().await.unwrap();

    let inner = source.inner();
    assert_eq!(inner.transaction_fetches(), 2);
    assert_eq!(inner.cash_fetches(), 2);
    assert_eq!(inner.count_fetches(), 2);
}

#[test]
fn test_cache_config_follows_dashboard_defaults() {
    let config = CacheConfig::default();
    assert_eq!(config.entity_counts_ttl, Duration::from_secs(300));
    assert!(config.window_capacity > 0);
}
