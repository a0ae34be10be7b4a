#![allow(clippy::doc_markdown)] // Generated file contains OPT_LEVEL without backticks

use std::sync::LazyLock;

include!(concat!(env!("OUT_DIR"), "/built.rs"));

/// Version string reported by `--version` and logged at startup.
///
/// `<package version>-<git commit>` with a `-dirty` suffix for uncommitted changes, or the bare
/// package version when built outside a git checkout.
pub static VERSION: LazyLock<String> = LazyLock::new(|| {
    let dirty = if GIT_DIRTY == Some(true) { "-dirty" } else { "" };
    match GIT_COMMIT_HASH_SHORT.or(GIT_COMMIT_HASH) {
        Some(hash) => format!("{PKG_VERSION}-{hash}{dirty}"),
        None => PKG_VERSION.to_string(),
    }
});
