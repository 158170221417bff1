//! Processing SVG files in place.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::Options;
use crate::clean::{Changes, clean};
use crate::error::SvgError;
use crate::parse::{decode_svg, parse_svg};
use crate::serialize::serialize;

/// Outcome of processing one file.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub changes: Changes,
}

/// Outcome of processing a directory.
#[derive(Debug, Default)]
pub struct Summary {
    pub reports: Vec<FileReport>,
    pub failed: Vec<SvgError>,
}

impl Summary {
    pub fn processed(&self) -> usize {
        self.reports.len()
    }

    pub fn modified(&self) -> usize {
        self.reports.iter().filter(|r| r.changes.is_modified()).count()
    }

    pub fn unchanged(&self) -> usize {
        self.processed() - self.modified()
    }
}

/// List the files in `dir` (not recursively) with the given extension,
/// sorted by name.
pub fn find_svg_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, SvgError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_file()
            && path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(extension))
        {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Where the pristine copy of `path` is kept.
pub fn backup_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Clean one file, rewriting it only when something changed.
///
/// The first rewrite leaves a backup of the original next to it; later runs
/// never overwrite that backup.
pub fn process_file(path: &Path, options: &Options) -> Result<FileReport, SvgError> {
    let run = || -> Result<FileReport, SvgError> {
        let bytes = fs::read(path)?;
        let mut doc = parse_svg(&decode_svg(&bytes)?)?;
        let changes = clean(&mut doc, options);

        if changes.is_modified() {
            let backup = backup_path(path, &options.backup_suffix);
            if !backup.exists() {
                fs::copy(path, &backup)?;
                log::debug!("backup written to {}", backup.display());
            }
            fs::write(path, serialize(&doc, options))?;
            log::info!("{}: {:?}", path.display(), changes);
        }

        Ok(FileReport {
            path: path.to_path_buf(),
            changes,
        })
    };
    run().map_err(|e| e.in_file(path))
}

/// Clean every matching file in `dir`, one at a time.
///
/// A file that fails is recorded in the summary and the rest still run.
pub fn process_directory(dir: &Path, options: &Options) -> Result<Summary, SvgError> {
    process_directory_with(dir, options, |_, _| {})
}

/// Like [`process_directory`], calling `on_file` after each file.
pub fn process_directory_with(
    dir: &Path,
    options: &Options,
    mut on_file: impl FnMut(&Path, &Result<FileReport, SvgError>),
) -> Result<Summary, SvgError> {
    if !dir.is_dir() {
        return Err(SvgError::DirectoryNotFound(dir.to_path_buf()));
    }

    let mut summary = Summary::default();
    for path in find_svg_files(dir, &options.extension)? {
        let result = process_file(&path, options);
        on_file(&path, &result);
        match result {
            Ok(report) => summary.reports.push(report),
            Err(e) => {
                log::warn!("skipping {}", e);
                summary.failed.push(e);
            }
        }
    }
    Ok(summary)
}
