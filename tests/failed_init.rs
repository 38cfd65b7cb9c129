//! A failed first construction installs nothing

use dual_logger::{FacadeError, LogFacade};
use tempfile::TempDir;

#[test]
fn test_failed_construction_can_be_retried() {
    let temp_dir = TempDir::new().unwrap();
    let unwritable = temp_dir.path().join("missing").join("app.log");

    let err = LogFacade::init(&unwritable).unwrap_err();
    assert!(matches!(err, FacadeError::OpenLogFile { .. }));
    assert!(LogFacade::global().is_none());

    let path = temp_dir.path().join("app.log");
    let facade = LogFacade::init(&path).unwrap();
    assert_eq!(facade.file_path(), path.as_path());
    assert!(LogFacade::global().is_some());
}
