//! The merge module keeps at most one file per path in a document's file list.

use crate::model::ManagedFile;

/// Replaces the first file sharing `file`'s path, or appends `file` if there is none. The
/// replacement is wholesale; no fields of the earlier file are kept.
pub fn replace_or_append(files: &mut Vec<ManagedFile>, file: ManagedFile) {
    match files.iter_mut().find(|existing| existing.path == file.path) {
        Some(existing) => *existing = file,
        None => files.push(file),
    }
}
