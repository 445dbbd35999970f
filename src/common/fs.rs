//! Common file system operations with unified error handling

use std::fs;
use std::io;
use std::path::Path;

/// Copy a directory tree, returning the number of files copied
///
/// An optional filter decides per-file (by path relative to `src`) whether
/// the file is copied; directories are always descended into. Empty
/// directories on the filtered path are not recreated at the destination.
pub fn copy_dir_filtered<F>(src: &Path, dst: &Path, filter: &F) -> io::Result<usize>
where
    F: Fn(&Path) -> bool,
{
    copy_dir_inner(src, dst, Path::new(""), filter)
}

/// Copy a directory tree wholesale, returning the number of files copied
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> io::Result<usize> {
    copy_dir_inner(src, dst, Path::new(""), &|_| true)
}

fn copy_dir_inner<F>(src: &Path, dst: &Path, rel: &Path, filter: &F) -> io::Result<usize>
where
    F: Fn(&Path) -> bool,
{
    let mut copied = 0;

    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let entry_path = entry.path();
        let entry_rel = rel.join(entry.file_name());

        if entry_path.is_dir() {
            copied += copy_dir_inner(&entry_path, &dst.join(entry.file_name()), &entry_rel, filter)?;
        } else if filter(&entry_rel) {
            let dst_path = dst.join(entry.file_name());
            if let Some(parent) = dst_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(&entry_path, &dst_path)?;
            copied += 1;
        }
    }

    Ok(copied)
}
