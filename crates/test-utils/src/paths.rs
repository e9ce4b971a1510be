//! Locating sample data and scratch directories.
//!
//! Sample files are looked up under `TEST_DATA_DIR` first, then in the
//! `testdata/` directories of the data-reading crates and the workspace.

use std::path::PathBuf;

/// Members whose `testdata/` directories hold sample files.
const TESTDATA_MEMBERS: [&str; 3] = [
    "crates/netcdf-parser",
    "crates/renderer",
    "services/map-animator",
];

/// The workspace root (two levels above this crate's manifest).
pub fn workspace_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .ancestors()
        .nth(2)
        .map(|p| p.to_path_buf())
        .unwrap_or(manifest_dir)
}

/// `crates/<crate_name>/testdata/`.
pub fn crate_testdata_dir(crate_name: &str) -> PathBuf {
    workspace_root()
        .join("crates")
        .join(crate_name)
        .join("testdata")
}

/// First existing path for `name`, or `None` when no copy is available.
pub fn find_test_file(name: &str) -> Option<PathBuf> {
    let root = workspace_root();
    let from_env = std::env::var("TEST_DATA_DIR")
        .ok()
        .map(|dir| PathBuf::from(dir).join(name));
    let in_members = TESTDATA_MEMBERS
        .iter()
        .map(|member| root.join(member).join("testdata").join(name));

    from_env
        .into_iter()
        .chain(in_members)
        .chain(std::iter::once(root.join("testdata").join(name)))
        .find(|path| path.exists())
}

/// Scratch directory for rendered frames, removed on drop.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary test directory")
}

/// Like [`temp_test_dir`], with a recognisable name prefix.
pub fn temp_test_dir_with_prefix(prefix: &str) -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix(prefix)
        .tempdir()
        .expect("Failed to create temporary test directory")
}
