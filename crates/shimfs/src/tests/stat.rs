use super::*;

#[tokio::test]
async fn test_stat_sync_placeholder_shape() {
    let backend = MemoryHostBackend::new(BASE);
    let shim = started_shim(&backend).await;

    shim.mkdir_sync("C:\\Game\\screenshots");
    shim.write_file_sync(SAVE2, "{}");

    let dir = shim.stat_sync("C:\\Game\\screenshots");
    assert!(dir.is_directory);
    assert!(!dir.is_file);

    // Files get the fixed placeholder: size and timestamps are not
    // sourced from the backend
    let file = shim.stat_sync(SAVE2);
    assert!(file.is_file);
    assert_eq!(file.size, 0);
    assert_eq!(file.mtime_ms, 0);
}

#[tokio::test]
async fn test_stat_prefers_backend() {
    let backend = MemoryHostBackend::new(BASE);
    backend.insert_file(SAVE1, "12345678").await;
    let shim = started_shim(&backend).await;

    let stat = shim.stat(SAVE1).await;
    assert!(stat.is_file);
    assert_eq!(stat.size, 8);
}

#[tokio::test]
async fn test_stat_falls_back_to_placeholder_on_failure() {
    let backend = MemoryHostBackend::new(BASE);
    backend.insert_file(SAVE1, "12345678").await;
    backend.fail("stat").await;
    let shim = started_shim(&backend).await;

    let stat = shim.stat(SAVE1).await;
    assert!(stat.is_file);
    assert_eq!(stat.size, 0);
}

#[tokio::test]
async fn test_stat_without_backend_is_placeholder() {
    let (shim, _installer) = ShimFs::start(
        ShimConfig::default(),
        std::sync::Arc::new(MemoryAssetSource::new()),
    );

    let stat = shim.stat(SAVE1).await;
    assert!(stat.is_file);
    assert_eq!(stat.size, 0);
}
