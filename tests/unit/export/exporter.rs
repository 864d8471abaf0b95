use super::*;

#[test]
fn outcome_constructors_keep_the_output_invariant() {
    let done = MergeOutcome::completed("/tmp/out.mov");
    assert_eq!(done.status, ExportStatus::Completed);
    assert!(done.output.is_some());
    assert!(done.failure.is_none());

    let failed = MergeOutcome::failed("boom");
    assert_eq!(failed.status, ExportStatus::Failed);
    assert!(failed.output.is_none());
    assert_eq!(failed.failure.as_deref(), Some("boom"));

    let cancelled = MergeOutcome::cancelled();
    assert_eq!(cancelled.status, ExportStatus::Cancelled);
    assert!(cancelled.output.is_none());
}

#[test]
fn export_results_map_to_terminal_statuses() {
    let done = MergeOutcome::from_export_result(Ok(PathBuf::from("/tmp/out.mov")));
    assert_eq!(done.status, ExportStatus::Completed);

    let cancelled = MergeOutcome::from_export_result(Err(MergeError::Cancelled));
    assert_eq!(cancelled.status, ExportStatus::Cancelled);

    let failed = MergeOutcome::from_export_result(Err(MergeError::export("encoder died")));
    assert_eq!(failed.status, ExportStatus::Failed);
    assert!(failed.failure.unwrap().contains("encoder died"));
}

#[test]
fn destination_derives_a_timestamped_path() {
    let dir = tempfile::tempdir().unwrap();
    let dest = ExportDestination::new(dir.path().join("exports"));
    let path = dest.resolve_output_path().unwrap();
    assert!(dest.directory.is_dir());
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("mov"));
    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("merged-video-"));

    let mp4 = ExportDestination {
        container: ContainerFormat::Mp4,
        ..dest
    };
    let path = mp4.resolve_output_path().unwrap();
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("mp4"));
}

#[test]
fn cancel_token_is_shared_and_idempotent() {
    let token = CancelToken::new();
    let clone = token.clone();
    assert!(!clone.is_cancelled());
    token.cancel();
    token.cancel();
    assert!(clone.is_cancelled());
}
