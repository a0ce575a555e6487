use std::path::PathBuf;
use std::sync::OnceLock;

/// Returns the workspace root directory (parent of this crate's directory).
fn workspace_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or(manifest_dir)
}

/// Directory that tests write their artifacts into.
pub fn test_output_dir() -> PathBuf {
    static DIR: OnceLock<PathBuf> = OnceLock::new();
    DIR.get_or_init(|| {
        let dir = workspace_root().join("test_output");
        std::fs::create_dir_all(&dir).expect("Failed to create test_output directory");
        dir
    })
    .clone()
}

/// Returns the path to a test output file, removing any stale file left by a
/// previous run.
pub fn test_output_path(name: &str) -> PathBuf {
    let path = test_output_dir().join(name);
    let _ = std::fs::remove_file(&path);
    path
}
