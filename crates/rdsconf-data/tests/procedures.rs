use std::collections::HashMap;

use anyhow::{Context, Result};
use rdsconf_config::ClientContext;
use rdsconf_data::{
    ConnectionManager, DataError, DesiredConfiguration, apply_configuration, read_configuration,
};
use rdsconf_test_support::{FakeInstance, skip_without_docker, start_mysql};

#[tokio::test]
async fn read_reports_every_setting_with_optional_descriptions() -> Result<()> {
    let instance = FakeInstance::rds_defaults();

    let described = read_configuration(&instance, true).await?;
    assert_eq!(described.len(), 3);
    assert!(described.settings().all(|s| s.description.is_some()));
    assert_eq!(
        described.get("binlog retention hours").map(|s| s.value),
        Some(None)
    );

    let plain = read_configuration(&instance, false).await?;
    assert!(plain.settings().all(|s| s.description.is_none()));
    assert_eq!(plain.get("target delay").and_then(|s| s.value), Some(0));
    Ok(())
}

#[tokio::test]
async fn read_failure_returns_no_snapshot() {
    let instance = FakeInstance::rds_defaults();
    instance.fail_reads(true);

    let err = read_configuration(&instance, false)
        .await
        .expect_err("introspection fails");
    assert!(matches!(err, DataError::QueryFailed { .. }));
}

#[tokio::test]
async fn apply_calls_the_mutation_once_per_setting_and_read_reflects_it() -> Result<()> {
    let instance = FakeInstance::rds_defaults();
    let desired = DesiredConfiguration::new([("binlog retention hours", 24), ("target delay", 5)])?;

    apply_configuration(&instance, &desired).await?;

    assert_eq!(
        instance.set_calls(),
        vec![
            ("binlog retention hours".to_string(), 24),
            ("target delay".to_string(), 5)
        ]
    );
    let snapshot = read_configuration(&instance, false).await?;
    assert_eq!(
        snapshot.get("binlog retention hours").and_then(|s| s.value),
        Some(24)
    );
    assert_eq!(snapshot.get("target delay").and_then(|s| s.value), Some(5));
    assert_eq!(snapshot.get("source delay").and_then(|s| s.value), Some(0));
    Ok(())
}

#[tokio::test]
async fn apply_is_idempotent() -> Result<()> {
    let instance = FakeInstance::rds_defaults();
    let desired = DesiredConfiguration::new([("target delay", 30)])?;

    apply_configuration(&instance, &desired).await?;
    let once = read_configuration(&instance, false).await?;
    apply_configuration(&instance, &desired).await?;
    let twice = read_configuration(&instance, false).await?;

    assert_eq!(once, twice);
    Ok(())
}

#[tokio::test]
async fn apply_stops_at_first_failure_without_rollback() -> Result<()> {
    let instance = FakeInstance::rds_defaults();
    instance.fail_set_for("source delay");
    let desired = DesiredConfiguration::new([
        ("binlog retention hours", 48),
        ("source delay", 10),
        ("target delay", 10),
    ])?;

    let err = apply_configuration(&instance, &desired)
        .await
        .expect_err("second setting fails");
    assert!(matches!(err, DataError::QueryFailed { .. }));

    assert_eq!(instance.set_calls().len(), 2);
    assert_eq!(instance.value("binlog retention hours"), Some(Some(48)));
    assert_eq!(instance.value("target delay"), Some(Some(0)));
    Ok(())
}

#[tokio::test]
async fn procedures_round_trip_against_mysql() -> Result<()> {
    if skip_without_docker("procedures_round_trip_against_mysql") {
        return Ok(());
    }

    let mysql = start_mysql().await?;
    let no_env: HashMap<String, String> = HashMap::new();
    let context = ClientContext::from_sources(mysql.client_settings(), &no_env)
        .context("fixture settings should resolve")?;
    let manager = ConnectionManager::for_context(&context);
    let pool = manager.acquire().await?;

    let before = read_configuration(&pool, true).await?;
    assert_eq!(before.len(), 3);
    assert_eq!(
        before.get("binlog retention hours").map(|s| s.value),
        Some(None)
    );

    let desired = DesiredConfiguration::new([("binlog retention hours", 24)])?;
    apply_configuration(&pool, &desired).await?;
    let after = read_configuration(&pool, false).await?;
    assert_eq!(
        after.get("binlog retention hours").and_then(|s| s.value),
        Some(24)
    );

    let unknown = DesiredConfiguration::new([("bogus setting", 1)])?;
    let err = apply_configuration(&pool, &unknown)
        .await
        .expect_err("stand-in procedure rejects unknown names");
    assert!(matches!(err, DataError::QueryFailed { .. }));
    Ok(())
}
