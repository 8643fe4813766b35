use std::sync::Arc;
use std::time::Duration;

use rdsconf_data::{ConnectionManager, DataError};
use rdsconf_test_support::{FakeConnector, FakeInstance};
use tokio::task::JoinSet;
use tokio::time::Instant;

#[tokio::test]
async fn cached_handle_is_reused_without_new_attempts() {
    let connector = FakeConnector::new(FakeInstance::rds_defaults());
    let manager = ConnectionManager::new(connector.clone(), Duration::from_secs(30));
    assert!(!manager.is_connected());

    let first = manager.acquire().await.expect("first acquire");
    let second = manager.acquire().await.expect("second acquire");

    assert!(manager.is_connected());
    assert_eq!(connector.attempts(), 1);
    assert_eq!(first.session(), second.session());
}

#[tokio::test(start_paused = true)]
async fn concurrent_first_use_initialises_once() {
    let connector = FakeConnector::new(FakeInstance::rds_defaults())
        .with_latency(Duration::from_millis(50));
    let manager = Arc::new(ConnectionManager::new(
        connector.clone(),
        Duration::from_secs(30),
    ));

    let mut tasks = JoinSet::new();
    for _ in 0..16 {
        let manager = Arc::clone(&manager);
        tasks.spawn(async move { manager.acquire().await.map(|handle| handle.session()) });
    }

    let mut sessions = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        sessions.push(joined.expect("task completes").expect("acquire succeeds"));
    }

    assert_eq!(connector.attempts(), 1);
    assert_eq!(sessions.len(), 16);
    assert!(sessions.iter().all(|session| *session == sessions[0]));
}

#[tokio::test(start_paused = true)]
async fn recovers_when_instance_comes_up_inside_the_budget() {
    let connector = FakeConnector::new(FakeInstance::rds_defaults())
        .available_after(Duration::from_secs(29));
    let manager = ConnectionManager::new(connector.clone(), Duration::from_secs(30));
    let started = Instant::now();

    let handle = manager.acquire().await.expect("connects before the deadline");

    assert!(started.elapsed() < Duration::from_secs(30));
    assert!(started.elapsed() >= Duration::from_secs(29));
    assert!(connector.attempts() > 1);
    assert_eq!(handle.session(), connector.attempts());
}

#[tokio::test(start_paused = true)]
async fn gives_up_when_instance_comes_up_after_the_budget() {
    let connector = FakeConnector::new(FakeInstance::rds_defaults())
        .available_after(Duration::from_secs(31));
    let manager = ConnectionManager::new(connector.clone(), Duration::from_secs(30));
    let started = Instant::now();

    let err = manager.acquire().await.expect_err("deadline passes first");

    assert!(started.elapsed() <= Duration::from_secs(30));
    assert!(started.elapsed() > Duration::from_secs(29));
    match err {
        DataError::Connect {
            attempts,
            timeout,
            source,
        } => {
            assert_eq!(u64::from(attempts), connector.attempts());
            assert_eq!(timeout, Duration::from_secs(30));
            assert!(matches!(source, Some(sqlx::Error::Io(_))));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!manager.is_connected());
}

#[tokio::test(start_paused = true)]
async fn final_attempt_uses_the_tail_of_the_budget() {
    let connector = FakeConnector::new(FakeInstance::rds_defaults())
        .available_after(Duration::from_millis(29_600));
    let manager = ConnectionManager::new(connector.clone(), Duration::from_secs(30));
    let started = Instant::now();

    let handle = manager
        .acquire()
        .await
        .expect("instance is up before the budget is spent");

    assert!(started.elapsed() <= Duration::from_secs(30));
    assert!(started.elapsed() >= Duration::from_millis(29_600));
    assert_eq!(handle.session(), connector.attempts());
}

#[tokio::test(start_paused = true)]
async fn timed_out_final_attempt_reports_the_previous_failure() {
    let connector = FakeConnector::new(FakeInstance::rds_defaults())
        .available_after(Duration::from_secs(3600))
        .stall_from(2);
    let manager = ConnectionManager::new(connector.clone(), Duration::from_secs(5));
    let started = Instant::now();

    let err = manager.acquire().await.expect_err("second attempt never answers");

    assert!(started.elapsed() <= Duration::from_secs(5));
    assert_eq!(connector.attempts(), 2);
    match err {
        DataError::Connect {
            attempts, source, ..
        } => {
            assert_eq!(attempts, 2);
            assert!(matches!(source, Some(sqlx::Error::Io(_))));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn slow_attempt_is_cut_off_at_the_deadline() {
    let connector = FakeConnector::new(FakeInstance::rds_defaults())
        .with_latency(Duration::from_secs(60));
    let manager = ConnectionManager::new(connector.clone(), Duration::from_secs(5));
    let started = Instant::now();

    let err = manager.acquire().await.expect_err("attempt outlives the budget");

    assert!(started.elapsed() <= Duration::from_secs(5));
    assert!(matches!(
        err,
        DataError::Connect {
            attempts: 1,
            source: None,
            ..
        }
    ));
}

#[tokio::test(start_paused = true)]
async fn zero_budget_makes_a_single_attempt() {
    let connector = FakeConnector::new(FakeInstance::rds_defaults())
        .available_after(Duration::from_secs(1));
    let manager = ConnectionManager::new(connector.clone(), Duration::ZERO);

    assert!(manager.acquire().await.is_err());
    assert_eq!(connector.attempts(), 1);
}

#[tokio::test(start_paused = true)]
async fn failed_initialisation_is_retried_by_the_next_caller() {
    let connector = FakeConnector::new(FakeInstance::rds_defaults())
        .available_after(Duration::from_secs(10));
    let manager = ConnectionManager::new(connector.clone(), Duration::from_secs(2));

    assert!(manager.acquire().await.is_err());
    tokio::time::sleep(Duration::from_secs(10)).await;

    let handle = manager.acquire().await.expect("instance is up now");
    assert_eq!(handle.session(), connector.attempts());
    assert!(manager.is_connected());
}
