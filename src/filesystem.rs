//! Directory tree helpers for copying fetched sources and relocating the
//! target directory.
//!
//! The two copies differ on purpose. [`copy_tree`] produces documentation
//! input from a scratch clone: it resolves symlinks and drops `.git`.
//! [`move_dir`] relocates a directory the caller owns, so when it has to
//! copy it keeps every entry as it was, symlinks included.

use crate::error::{Error, Result};
use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// Recursively copy the contents of `src` into `dst`.
///
/// `dst` and any missing parents are created. Existing files in `dst` are
/// overwritten. `.git` directories are not copied. Symlinks are followed and
/// their contents copied; a symlink loop or a dangling link is an error.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<()> {
    let copy_err = |message: String| Error::Copy {
        src: src.display().to_string(),
        dst: dst.display().to_string(),
        message,
    };

    fs::create_dir_all(dst).map_err(|e| copy_err(e.to_string()))?;

    let walker = WalkDir::new(src)
        .min_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| entry.file_name() != ".git");

    for entry in walker {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| copy_err(e.to_string()))?;
        let dest = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest).map_err(|e| copy_err(e.to_string()))?;
        } else {
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent).map_err(|e| copy_err(e.to_string()))?;
            }
            fs::copy(entry.path(), &dest).map_err(|e| {
                copy_err(format!("{}: {}", entry.path().display(), e))
            })?;
        }
    }

    Ok(())
}

/// Move a directory from `src` to `dst`.
///
/// Tries a rename first. When that fails (for example across filesystems)
/// the tree is copied verbatim and the source removed.
pub fn move_dir(src: &Path, dst: &Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }

    match fs::rename(src, dst) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            log::debug!(
                "rename {} -> {} failed ({}), copying instead",
                src.display(),
                dst.display(),
                rename_err
            );
            move_by_copy(src, dst)
        }
    }
}

/// Copy `src` to `dst` keeping every entry, then remove `src`.
///
/// The source is only removed once the whole copy has succeeded.
fn move_by_copy(src: &Path, dst: &Path) -> Result<()> {
    let copy_err = |message: String| Error::Copy {
        src: src.display().to_string(),
        dst: dst.display().to_string(),
        message,
    };

    fs::create_dir_all(dst).map_err(|e| copy_err(e.to_string()))?;

    for entry in WalkDir::new(src).min_depth(1) {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| copy_err(e.to_string()))?;
        let dest = dst.join(relative);
        let file_type = entry.file_type();

        let copied = if file_type.is_symlink() {
            recreate_symlink(entry.path(), &dest)
        } else if file_type.is_dir() {
            fs::create_dir_all(&dest)
        } else {
            fs::copy(entry.path(), &dest).map(drop)
        };
        copied.map_err(|e| copy_err(format!("{}: {}", entry.path().display(), e)))?;
    }

    fs::remove_dir_all(src)?;
    Ok(())
}

#[cfg(unix)]
fn recreate_symlink(link: &Path, dest: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(fs::read_link(link)?, dest)
}

#[cfg(windows)]
fn recreate_symlink(link: &Path, dest: &Path) -> io::Result<()> {
    let target = fs::read_link(link)?;
    if fs::metadata(link).map(|m| m.is_dir()).unwrap_or(false) {
        std::os::windows::fs::symlink_dir(target, dest)
    } else {
        std::os::windows::fs::symlink_file(target, dest)
    }
}

#[cfg(not(any(unix, windows)))]
fn recreate_symlink(link: &Path, _dest: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        format!("cannot recreate symlink {}", link.display()),
    ))
}
