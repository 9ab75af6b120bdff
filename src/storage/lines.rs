//! Line-oriented file access shared by the record files.

use std::{
    ffi::OsString,
    fs::{self, File, OpenOptions},
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

/// Reads every non-empty line of a file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn read_lines(path: &Path) -> io::Result<Vec<String>> {
    let reader = BufReader::new(File::open(path)?);
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if !line.is_empty() {
            lines.push(line);
        }
    }
    Ok(lines)
}

/// Replaces the contents of a file with the given lines.
///
/// The lines are written to a sibling file which is then renamed over the
/// target, so readers see either the old contents or the new ones. Parent
/// directories are created if they don't exist.
///
/// # Errors
///
/// Returns an error if the file cannot be written or renamed into place.
pub fn replace_lines<I>(path: &Path, lines: I) -> io::Result<()>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let staging = staging_path(path);
    let mut writer = BufWriter::new(File::create(&staging)?);
    for line in lines {
        writeln!(writer, "{}", line.as_ref())?;
    }
    let file = writer.into_inner().map_err(io::IntoInnerError::into_error)?;
    file.sync_all()?;
    drop(file);

    fs::rename(&staging, path)
}

/// Appends a single line to a file, creating it if needed.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or written.
pub fn append_line(path: &Path, line: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{line}")
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(OsString::new, ToOwned::to_owned);
    name.push(".tmp");
    path.with_file_name(name)
}
