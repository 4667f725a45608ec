// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Defines the `PackageExtractor` trait for extracting different package formats.

use std::ffi::OsStr;
use std::io::Read;
use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::Duration;
use tempfile::TempDir;
use thiserror::Error;
use wait_timeout::ChildExt;
use walkdir::WalkDir;

use super::files::PackageFile;
use super::PackageFiles;

/// Default timeout for package extraction commands (30 seconds).
pub(crate) const DEFAULT_EXTRACTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Result type for package operations.
pub type PackageResult<T> = std::result::Result<T, PackageError>;

/// Errors that can occur during package operations.
#[derive(Debug, Error)]
pub enum PackageError {
    #[error("Failed to create/delete temporary directory")]
    TempDirFailed {
        #[source]
        source: std::io::Error,
    },
    #[error("Command not found: {command} (package: {path:?})")]
    CommandNotFound { command: String, path: PathBuf },
    #[error("Command failed: {command} (package: {path:?})")]
    CommandFailed {
        command: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Command timed out after {timeout:?}: {command} (package: {path:?})")]
    CommandTimeout {
        command: String,
        path: PathBuf,
        timeout: Duration,
    },
    #[error("Extraction failed for package {path:?}: {reason}")]
    ExtractionFailed { path: PathBuf, reason: String },
    #[error("Metadata query failed for package {path:?}: {reason}")]
    QueryFailed { path: PathBuf, reason: String },
    #[error("Failed to walk extracted directory: {path:?}")]
    WalkDirFailed {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("Unsupported package type: {extension}")]
    UnsupportedPackageType { extension: String },
    #[error("Failed to read metadata: {path:?}")]
    ReadMetadataFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to read symlink: {path:?}")]
    ReadSymlinkFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Name, kind and declared requirements of a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PackageMetadata {
    pub(crate) name: String,
    pub(crate) source: bool,
    pub(crate) requires: Vec<String>,
}

/// Spawn a command, mapping a missing executable to `CommandNotFound`.
pub(crate) fn spawn(
    command: &mut Command,
    name: &str,
    package_path: &Path,
) -> PackageResult<Child> {
    command.spawn().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            PackageError::CommandNotFound {
                command: name.to_string(),
                path: package_path.to_path_buf(),
            }
        } else {
            PackageError::CommandFailed {
                command: name.to_string(),
                path: package_path.to_path_buf(),
                source: e,
            }
        }
    })
}

/// Wait for a child process to complete with a timeout.
///
/// Uses platform-specific APIs (SIGCHLD on Unix, `WaitForSingleObject` on Windows)
/// to wait for the process without polling. If the timeout is reached, the process is killed.
///
/// # Returns
/// - `Ok(ExitStatus)` if the process completed within the timeout
/// - `Err(PackageError::CommandTimeout)` if the process timed out
/// - `Err(PackageError::CommandFailed)` if there was an error waiting for the process
pub(crate) fn wait_with_timeout(
    child: &mut Child,
    timeout: Duration,
    command: &str,
    package_path: &Path,
) -> PackageResult<std::process::ExitStatus> {
    // Returns status if the process completed within the timeout, none otherwise.
    // In the case of an error it propagates the error.
    if let Some(status) = child
        .wait_timeout(timeout)
        .map_err(|e| PackageError::CommandFailed {
            command: command.to_string(),
            path: package_path.to_path_buf(),
            source: e,
        })?
    {
        // Check if the process completed successfully or was terminated by a signal.
        if status.code().is_some() {
            Ok(status)
        } else if let Some(signal) = status.signal() {
            Err(PackageError::CommandFailed {
                command: command.to_string(),
                path: package_path.to_path_buf(),
                source: std::io::Error::other(format!("Process terminated by signal: {signal}")),
            })
        } else {
            Err(PackageError::CommandFailed {
                command: command.to_string(),
                path: package_path.to_path_buf(),
                source: std::io::Error::other("Unknown process termination"),
            })
        }
    } else {
        // Timeout has been reached - kill the process
        let _ = child.kill();
        let _ = child.wait();
        Err(PackageError::CommandTimeout {
            command: command.to_string(),
            path: package_path.to_path_buf(),
            timeout,
        })
    }
}

/// Run a query command against a package file and return its standard output.
///
/// # Errors
/// Returns an error if the command cannot be run, times out, exits with a
/// non-zero status or prints invalid UTF-8.
pub(crate) fn query<I, S>(command: &str, args: I, package_path: &Path) -> PackageResult<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut child = spawn(
        Command::new(command)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::null()),
        command,
        package_path,
    )?;

    let Some(mut stdout) = child.stdout.take() else {
        let _ = child.kill();
        let _ = child.wait();
        return Err(PackageError::QueryFailed {
            path: package_path.to_path_buf(),
            reason: format!("Failed to get stdout from {command}"),
        });
    };
    // Drain stdout concurrently so a large listing cannot fill the pipe and stall the child.
    let reader = thread::spawn(move || {
        let mut output = Vec::new();
        stdout.read_to_end(&mut output).map(|_| output)
    });

    let status = wait_with_timeout(&mut child, DEFAULT_EXTRACTION_TIMEOUT, command, package_path)?;
    let output = reader
        .join()
        .map_err(|_| PackageError::QueryFailed {
            path: package_path.to_path_buf(),
            reason: format!("Reading output of {command} panicked"),
        })?
        .map_err(|e| PackageError::CommandFailed {
            command: command.to_string(),
            path: package_path.to_path_buf(),
            source: e,
        })?;

    if !status.success() {
        return Err(PackageError::QueryFailed {
            path: package_path.to_path_buf(),
            reason: format!(
                "{command} exited with non-zero status: {}",
                status.code().unwrap_or(-1)
            ),
        });
    }
    String::from_utf8(output).map_err(|e| PackageError::QueryFailed {
        path: package_path.to_path_buf(),
        reason: format!("{command} printed invalid UTF-8: {e}"),
    })
}

/// Represents a file extracted from the package.
pub(crate) struct ExtractedFile<'a> {
    extraction_directory: &'a TempDir, // The directory where the package was extracted (paths within the package are relative to this directory).
    extracted_path: &'a Path,          // The path to the file within the extraction directory.
}

impl<'a> ExtractedFile<'a> {
    pub(crate) fn new(extraction_directory: &'a TempDir, extracted_path: &'a Path) -> Self {
        Self {
            extraction_directory,
            extracted_path,
        }
    }

    /// Get the path of the file within the extraction directory.
    pub(crate) fn path(&self) -> &Path {
        self.extracted_path
    }

    /// Get the absolute path of the file within the package.
    pub(crate) fn package_path(&self) -> PathBuf {
        let stripped = self
            .extracted_path
            .strip_prefix(self.extraction_directory.path())
            .unwrap_or(self.extracted_path);
        // Prepend '/' to make paths absolute (package files are absolute paths)
        Path::new("/").join(stripped)
    }
}

/// Trait for package extractors that perform the actual extraction logic.
pub(crate) trait PackageExtractor {
    const EXTENSION: &'static str; // Packages are identified by their extension.

    /// Extract package contents to a destination directory and list them.
    ///
    /// # Errors
    /// Returns an error if extraction fails.
    fn extract(package: &Path, dest: &TempDir) -> PackageResult<PackageFiles>;

    /// Query the package name, kind and declared requirements.
    ///
    /// # Errors
    /// Returns an error if the package metadata cannot be read.
    fn metadata(
        package: &Path,
        dest: &TempDir,
        files: &PackageFiles,
    ) -> PackageResult<PackageMetadata>;

    /// Walk the extracted directory and collect files and directories.
    ///
    /// # Errors
    /// Returns an error if walking the directory fails or no files are found.
    fn process(dest: &TempDir, package: &Path) -> PackageResult<PackageFiles> {
        let mut files = PackageFiles::new();
        // The extraction directory itself is not part of the package.
        for entry in WalkDir::new(dest.path()).min_depth(1) {
            let e = entry.map_err(|e| PackageError::WalkDirFailed {
                path: package.to_path_buf(),
                source: e,
            })?;
            let extracted_file = ExtractedFile::new(dest, e.path());
            let file = PackageFile::from_extracted(&extracted_file)?;
            files.insert(extracted_file.package_path(), file);
        }

        if files.values().all(PackageFile::is_dir) {
            Err(PackageError::ExtractionFailed {
                path: package.to_path_buf(),
                reason: "Extraction completed but no files were found".to_string(),
            })
        } else {
            Ok(files)
        }
    }
}
