//! File-tree mirroring via rsync.

use std::path::Path;

use crate::error::Result;
use crate::utils::command;

/// The exact rsync semantics of a deploy: recursive copy, skip files whose
/// destination is not older than the source, delete destination files absent
/// from the source, preserve permission bits. Changing any one of these
/// changes what production deploy targets end up containing.
const MIRROR_FLAGS: [&str; 4] = ["--recursive", "--update", "--delete", "--perms"];

/// Mirror the *contents* of `source` into `dest`.
///
/// Re-running with an unchanged source performs zero file writes, so a deploy
/// is idempotent.
pub fn mirror(source: &Path, dest: &Path) -> Result<()> {
    // Trailing slash: rsync copies the directory contents, not the directory.
    let source_arg = format!("{}/", source.to_string_lossy());
    let dest_arg = dest.to_string_lossy().to_string();

    let mut args: Vec<&str> = MIRROR_FLAGS.to_vec();
    args.push(&source_arg);
    args.push(&dest_arg);

    command::run("rsync", &args, "rsync")
}
