//! Concurrent first use still yields a single instance

use std::sync::Arc;
use std::thread;

use dual_logger::{FacadeConfig, LogFacade};
use tempfile::TempDir;

#[test]
fn test_concurrent_construction_yields_one_instance() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().to_path_buf();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let path = dir.join(format!("worker-{}.log", i));
            thread::spawn(move || LogFacade::get_or_create(path, FacadeConfig::default()).unwrap())
        })
        .collect();

    let facades: Vec<Arc<LogFacade>> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    for facade in &facades[1..] {
        assert!(Arc::ptr_eq(&facades[0], facade));
    }

    let opened = std::fs::read_dir(&dir).unwrap().count();
    assert_eq!(opened, 1);
}
