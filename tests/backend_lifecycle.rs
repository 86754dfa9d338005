mod common;

use std::sync::Arc;
use std::time::Duration;

use sqlite_backend::prelude::*;

use common::{factory_in, memory_factory, notes_backend, wait_for_warning};

#[tokio::test]
async fn initialize_creates_missing_database_file() -> Result<(), BackendError> {
    let dir = tempfile::tempdir().expect("tempdir");
    let logger = Arc::new(MemoryLogger::new());
    let factory = factory_in(dir.path(), logger);

    let path = dir.path().join("helloWorld.db");
    assert!(!path.exists());

    let mut db = factory.create("helloWorld", StopSignal::new());
    assert!(!path.exists(), "construction must not touch storage");
    assert_eq!(db.location(), path.to_string_lossy());

    db.initialize().await?;
    assert!(db.is_initialized());
    assert!(path.exists());
    Ok(())
}

#[tokio::test]
async fn initialize_twice_is_harmless() -> Result<(), BackendError> {
    let logger = Arc::new(MemoryLogger::new());
    let (mut db, _stopped) = notes_backend(Arc::clone(&logger)).await?;
    db.initialize().await?;

    // Same connection: the in-memory table created before is still there.
    let results = db
        .exec_queries(
            &[Query::without_params("SELECT COUNT(*) AS n FROM notes")],
            &ExecOptions::suppressed(),
        )
        .await?;
    assert_eq!(results[0].rows()[0].get("n"), Some(&RowValues::Int(0)));
    Ok(())
}

#[tokio::test]
async fn initialize_fails_for_unreachable_location() {
    let dir = tempfile::tempdir().expect("tempdir");
    let logger = Arc::new(MemoryLogger::new());
    let factory = BackendOptions::builder()
        .build({
            let dir = dir.path().to_path_buf();
            move |name| {
                dir.join("no/such/dir")
                    .join(format!("{name}.db"))
                    .to_string_lossy()
                    .into_owned()
            }
        })
        .with_logger(logger);

    let mut db = factory.create("helloWorld", StopSignal::new());
    let err = db.initialize().await.expect_err("open should fail");
    assert!(
        matches!(err, BackendError::ConnectionError { .. }),
        "unexpected error: {err:?}"
    );
    assert!(!db.is_initialized());
}

#[tokio::test]
async fn initialize_fails_for_corrupt_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("broken.db"), vec![b'x'; 4096]).expect("write");
    let logger = Arc::new(MemoryLogger::new());

    let mut db = factory_in(dir.path(), logger).create("broken", StopSignal::new());
    let err = db.initialize().await.expect_err("corrupt file should fail");
    assert!(
        matches!(err, BackendError::ConnectionError { .. }),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn exec_before_initialize_is_rejected() {
    let logger = Arc::new(MemoryLogger::new());
    let mut db = memory_factory(Arc::clone(&logger)).create("notes_db", StopSignal::new());

    let err = db
        .exec_queries(
            &[
                Query::without_params("SELECT 1"),
                Query::without_params("SELECT 2"),
            ],
            &ExecOptions::default(),
        )
        .await
        .expect_err("not initialized");
    match err {
        BackendError::NotInitialized { queries } => assert_eq!(queries, "SELECT 1 SELECT 2"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(logger.lines().is_empty());
}

#[tokio::test]
async fn exec_after_stop_is_rejected() -> Result<(), BackendError> {
    let logger = Arc::new(MemoryLogger::new());
    let (mut db, stopped) = notes_backend(Arc::clone(&logger)).await?;

    db.exec_queries(&[Query::without_params("SELECT 1")], &ExecOptions::suppressed())
        .await?;

    stopped.stop();
    assert!(!db.is_initialized());

    for _ in 0..2 {
        let err = db
            .exec_queries(&[Query::without_params("SELECT 1")], &ExecOptions::suppressed())
            .await
            .expect_err("stopped");
        assert!(matches!(err, BackendError::NotInitialized { .. }));
    }
    // A connection was live when the signal fired, so there is nothing to warn about.
    assert!(logger.warnings().is_empty());
    Ok(())
}

#[tokio::test]
async fn stop_before_initialize_completes_only_warns() {
    let logger = Arc::new(MemoryLogger::new());
    let stopped = StopSignal::new();
    let mut db = memory_factory(Arc::clone(&logger)).create("early", stopped.clone());

    stopped.stop();
    db.initialize()
        .await
        .expect("stop is not an initialization error");

    let warnings = wait_for_warning(&logger).await;
    assert_eq!(warnings, vec!["[early] Failed to stop DB, it is not initialized"]);

    let err = db
        .exec_queries(&[Query::without_params("SELECT 1")], &ExecOptions::default())
        .await
        .expect_err("stopped");
    assert!(matches!(err, BackendError::NotInitialized { .. }));
}

#[tokio::test]
async fn stop_after_failed_initialize_only_warns() {
    let dir = tempfile::tempdir().expect("tempdir");
    let logger = Arc::new(MemoryLogger::new());
    let stopped = StopSignal::new();
    let factory = BackendOptions::builder()
        .build({
            let dir = dir.path().to_path_buf();
            move |_| dir.join("missing/x.db").to_string_lossy().into_owned()
        })
        .with_logger(Arc::clone(&logger) as Arc<dyn QueryLogger>);

    let mut db = factory.create("failed", stopped.clone());
    assert!(db.initialize().await.is_err());

    stopped.stop();
    let warnings = wait_for_warning(&logger).await;
    assert_eq!(warnings.len(), 1);
}

#[tokio::test]
async fn backends_from_one_factory_are_independent() -> Result<(), BackendError> {
    let dir = tempfile::tempdir().expect("tempdir");
    let logger = Arc::new(MemoryLogger::new());
    let factory = factory_in(dir.path(), logger);

    let first_stop = StopSignal::new();
    let mut first = factory.create("first", first_stop.clone());
    let mut second = factory.create("second", StopSignal::new());
    first.initialize().await?;
    second.initialize().await?;

    first_stop.stop();
    assert!(first
        .exec_queries(&[Query::without_params("SELECT 1")], &ExecOptions::suppressed())
        .await
        .is_err());
    let results = second
        .exec_queries(&[Query::without_params("SELECT 1")], &ExecOptions::suppressed())
        .await?;
    assert_eq!(results.len(), 1);
    Ok(())
}

#[tokio::test]
async fn location_with_nul_byte_is_a_connection_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let logger = Arc::new(MemoryLogger::new());

    let mut db = factory_in(dir.path(), logger).create("bad\0name", StopSignal::new());
    let err = db.initialize().await.expect_err("NUL in path should fail");
    assert!(
        matches!(err, BackendError::ConnectionError { .. }),
        "unexpected error: {err:?}"
    );
    assert!(!db.is_initialized());
}

#[tokio::test]
async fn dropping_a_backend_releases_its_connection() -> Result<(), BackendError> {
    let dir = tempfile::tempdir().expect("tempdir");
    let logger = Arc::new(MemoryLogger::new());
    let factory = factory_in(dir.path(), Arc::clone(&logger));

    let stopped = StopSignal::new();
    let mut first = factory.create("shared", stopped.clone());
    first.initialize().await?;
    // Exclusive locking holds the file lock until the connection closes.
    first
        .exec_queries(
            &[
                Query::without_params("PRAGMA locking_mode = EXCLUSIVE"),
                Query::without_params("CREATE TABLE t (x INTEGER)"),
                Query::new("INSERT INTO t (x) VALUES (?)", vec![RowValues::Int(7)]),
            ],
            &ExecOptions::suppressed(),
        )
        .await?;
    drop(first);

    stopped.stop();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(logger.warnings().is_empty(), "{:?}", logger.warnings());

    let mut second = factory.create("shared", StopSignal::new());
    second.initialize().await?;
    let results = second
        .exec_queries(
            &[Query::without_params("SELECT x FROM t")],
            &ExecOptions::suppressed(),
        )
        .await?;
    assert_eq!(results[0].rows()[0].get("x"), Some(&RowValues::Int(7)));
    Ok(())
}

#[tokio::test]
async fn default_options_leave_a_single_database_file() -> Result<(), BackendError> {
    let dir = tempfile::tempdir().expect("tempdir");
    let logger = Arc::new(MemoryLogger::new());
    let mut db = factory_in(dir.path(), logger).create("helloWorld", StopSignal::new());
    db.initialize().await?;
    db.exec_queries(
        &[
            Query::without_params("CREATE TABLE t (x INTEGER)"),
            Query::without_params("INSERT INTO t (x) VALUES (1)"),
        ],
        &ExecOptions::suppressed(),
    )
    .await?;

    let mut names: Vec<String> = std::fs::read_dir(dir.path())
        .expect("read_dir")
        .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["helloWorld.db".to_owned()]);
    Ok(())
}
