use std::sync::Arc;

use super::*;

#[tokio::test]
async fn test_exists_before_bootstrap_is_false_and_nonblocking() {
    let (shim, installer) =
        ShimFs::start(ShimConfig::default(), Arc::new(MemoryAssetSource::new()));

    // The bootstrap race: synchronous queries are meaningful (and safe)
    // before the backend even exists
    assert!(!shim.exists_sync(SAVE1));
    assert!(!shim.exists_sync(SAVE_DIR));
    assert!(shim.readdir_sync(SAVE_DIR).is_empty());

    let backend = MemoryHostBackend::new(BASE);
    backend.insert_file(SAVE1, "data").await;
    installer.install(Arc::new(backend));
    shim.bootstrapped().await;
    assert!(shim.exists_sync(SAVE1));
}

#[tokio::test]
async fn test_bootstrap_populates_save_listing() {
    let backend = MemoryHostBackend::new(BASE);
    backend.insert_file(SAVE1, "one").await;
    backend.insert_file(SAVE2, "two").await;
    let shim = started_shim(&backend).await;

    assert!(shim.exists_sync(SAVE1));
    assert!(shim.exists_sync(SAVE2));
    // A non-empty listing marks the save directory itself
    assert!(shim.exists_sync(SAVE_DIR));
    assert_eq!(shim.readdir_sync(SAVE_DIR), vec!["save1.dat", "save2.dat"]);
}

#[tokio::test]
async fn test_empty_save_listing_does_not_mark_directory() {
    let backend = MemoryHostBackend::new(BASE);
    let shim = started_shim(&backend).await;

    assert!(!shim.exists_sync(SAVE_DIR));
    assert!(shim.readdir_sync(SAVE_DIR).is_empty());
}

#[tokio::test]
async fn test_resolve_failure_leaves_cache_empty_but_backend_usable() {
    let backend = MemoryHostBackend::new(BASE);
    backend.insert_file(SAVE1, "data").await;
    backend.fail("resolve_base_dir").await;
    let shim = started_shim(&backend).await;

    // Swallowed failure: no cache population, no error to callers
    assert_eq!(shim.base_dir(), None);
    assert!(!shim.exists_sync(SAVE1));

    // The backend itself was still published for facade use
    shim.write_file(SAVE2, "{}").await.unwrap();
    assert!(shim.exists_sync(SAVE2));
}

#[tokio::test]
async fn test_listing_failure_is_swallowed() {
    let backend = MemoryHostBackend::new(BASE);
    backend.insert_file(SAVE1, "data").await;
    backend.fail("list_dir").await;
    let shim = started_shim(&backend).await;

    // First run without a save directory: cache stays empty
    assert_eq!(shim.base_dir().as_deref(), Some(BASE));
    assert!(!shim.exists_sync(SAVE1));
    assert!(!shim.exists_sync(SAVE_DIR));
}
