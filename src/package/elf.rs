// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Parses ELF files to extract the SONAME and dynamic dependencies. Uses the `goblin` crate for ELF parsing.

use goblin::elf::Elf as GoblinElf;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

type Result<T> = std::result::Result<T, ElfError>;

/// Errors that can occur when parsing ELF files.
#[derive(Debug, Error)]
pub enum ElfError {
    #[error("File is too small to be an ELF file: {path:?}")]
    FileTooSmall { path: PathBuf },
    #[error("File is not an ELF file: {path:?}")]
    NotElfFile { path: PathBuf },
    #[error("Failed to open file: {path:?}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to read file: {path:?}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to parse ELF file: {path:?}")]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: goblin::error::Error,
    },
    #[error("Unknown ELF type in file: {path:?}")]
    UnknownElfType { path: PathBuf },
    #[error("No binary information available for file: {path:?}")]
    Unavailable { path: PathBuf },
}

impl ElfError {
    /// True if the file is simply not an ELF file, as opposed to a broken one.
    #[must_use]
    pub fn is_not_elf(&self) -> bool {
        matches!(self, Self::NotElfFile { .. } | Self::FileTooSmall { .. })
    }
}

/// ELF file type (wrapper around `goblin::elf::header::e_type`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElfType {
    None,
    Relocatable,
    Executable,
    SharedObject,
    Core,
}

/// Parsed ELF file information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Elf {
    kind: ElfType,
    soname: Option<String>,
    dependencies: Vec<String>,
}

// ELF files typically don't have extensions (aside from .so, .so.x, .so.x.y, etc.), so this is safe.
static INVALID_EXTENSIONS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        "txt", "md", "json", "yaml", "yml", "conf", "cfg", "ini", "toml", "xml", "html", "css",
        "js", "py", "sh", "bash", "zsh", "fish", "csh", "ksh", "pl", "rb", "php", "lua", "tcl",
        "awk", "sed", "perl", "pm", "pod", "gz", "bz2", "xz", "zst", "zip", "tar", "rpm", "deb",
        "dpkg", "png", "jpg", "jpeg", "gif", "svg", "ico", "bmp", "webp", "tiff", "pdf", "ps",
        "eps", "dvi", "tex", "rtf", "odt", "doc", "docx", "mp3", "mp4", "avi", "mkv", "mov", "wav",
        "flac", "ogg", "m4a", "db", "sqlite", "sqlite3", "db3", "h", "hpp", "a", "la", "pc",
    ])
});

impl Elf {
    /// Check if a filepath should be skipped early (before opening) by extension.
    /// This is used to skip files that are clearly not ELF based on extension.
    #[must_use]
    pub(crate) fn is_invalid_extension(path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| INVALID_EXTENSIONS.contains(ext.to_ascii_lowercase().as_str()))
    }

    /// Parse an ELF file from a path.
    ///
    /// # Errors
    /// Returns an error if the file is not an ELF file or cannot be parsed.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = Self::read(path)?;
        let elf = GoblinElf::parse(&bytes).map_err(|e| ElfError::ParseFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut soname = None;
        let mut dependencies = Vec::new();

        // Parse dynamic section
        if let Some(dynamic) = &elf.dynamic {
            for dyn_entry in &dynamic.dyns {
                let Ok(strtab_idx) = usize::try_from(dyn_entry.d_val) else {
                    continue;
                };
                match dyn_entry.d_tag {
                    goblin::elf::dynamic::DT_NEEDED => {
                        if let Some(dep_name) = elf.dynstrtab.get_at(strtab_idx) {
                            dependencies.push(dep_name.to_string());
                        }
                    }
                    goblin::elf::dynamic::DT_SONAME => {
                        soname = elf.dynstrtab.get_at(strtab_idx).map(str::to_string);
                    }
                    _ => {}
                }
            }
        }

        Ok(Self {
            kind: match elf.header.e_type {
                goblin::elf::header::ET_NONE => ElfType::None,
                goblin::elf::header::ET_REL => ElfType::Relocatable,
                goblin::elf::header::ET_EXEC => ElfType::Executable,
                goblin::elf::header::ET_DYN => ElfType::SharedObject,
                goblin::elf::header::ET_CORE => ElfType::Core,
                _ => {
                    return Err(ElfError::UnknownElfType {
                        path: path.to_path_buf(),
                    });
                }
            },
            soname,
            dependencies,
        })
    }

    /// Get the ELF file type (executable, shared object, etc.).
    #[must_use]
    pub fn kind(&self) -> &ElfType {
        &self.kind
    }

    /// Get the `DT_SONAME` entry, if any.
    #[must_use]
    pub fn soname(&self) -> Option<&str> {
        self.soname.as_deref()
    }

    /// Get the list of dynamic dependencies (`DT_NEEDED` entries).
    #[must_use]
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// Reads the entire file at path into bytes if the file is an ELF file.
    ///
    /// # Errors
    /// Returns an error if the file is not an ELF file or cannot be read.
    fn read(path: &Path) -> Result<Vec<u8>> {
        // ELF magic bytes: 0x7f followed by ASCII "ELF"
        // Defined in the ELF specification: e_ident[EI_MAG0..EI_MAG3]
        const ELF_MAGIC: [u8; 4] = [0x7f, 0x45, 0x4c, 0x46];

        let metadata = fs::metadata(path).map_err(|e| ElfError::OpenFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

        // Skip files that are too small to be ELF (must be at least ELF header size)
        if metadata.len() < 64 {
            return Err(ElfError::FileTooSmall {
                path: path.to_path_buf(),
            });
        }

        let mut file = fs::File::open(path).map_err(|e| ElfError::OpenFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut magic = [0u8; 4];
        file.read_exact(&mut magic)
            .map_err(|e| ElfError::ReadFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
        if magic != ELF_MAGIC {
            return Err(ElfError::NotElfFile {
                path: path.to_path_buf(),
            });
        }

        // goblin requires the full file
        file.seek(std::io::SeekFrom::Start(0))
            .map_err(|e| ElfError::ReadFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .map_err(|e| ElfError::ReadFailed {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(bytes)
    }
}

/// Read the SONAME of a file on disk.
///
/// Files that are not ELF at all and ELF files other than shared objects yield
/// `Ok(None)`; broken ELF files are errors.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub(crate) fn read_soname(path: &Path) -> Result<Option<String>> {
    if Elf::is_invalid_extension(path) {
        return Ok(None);
    }
    match Elf::from_path(path) {
        Ok(elf) if elf.kind == ElfType::SharedObject => Ok(elf.soname),
        Ok(_) => Ok(None),
        Err(e) if e.is_not_elf() => Ok(None),
        Err(e) => Err(e),
    }
}
