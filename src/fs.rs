// Table schema compiler (TABLEC)
//
//  Copyright (C) 2014-2022 Ryan Specialty Group, LLC.
//
//  This file is part of TABLEC.
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Lightweight filesystem abstraction.
//!
//! This abstraction is intended to provide generics missing from Rust core,
//!   but makes no attempt to be comprehensive---it
//!     includes only what is needed for TABLEC.
//!
//!   - [`File`] provides a trait for opening files;
//!   - [`SharedFile`] opens files for reading without excluding other
//!       writers;
//!   - [`PathFile`] pairs an opened file with the [`Context`] used for
//!       diagnostics; and
//!   - [`Canonicalizer`] resolves paths for comparison.
//!
//!
//! Shared Reads
//! ============
//! Table data files are frequently open in a spreadsheet tool while they
//!   are being cut.
//! On Windows,
//!   a plain open would fail with a sharing violation,
//!   so [`SharedFile`] requests read, write, and delete sharing.
//! Other platforms do not lock files on open.
//! No consistency is guaranteed if the file changes while it is being
//!   read.

use std::fs;
use std::io::{self, Read, Result};
use std::path::{Path, PathBuf};

use crate::span::Context;

/// A file.
pub trait File: Read
where
    Self: Sized,
{
    fn open<P: AsRef<Path>>(path: P) -> Result<Self>;
}

impl File for fs::File {
    fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open(path)
    }
}

/// A file opened for reading in shared mode.
///
/// See the [module-level documentation](self).
#[derive(Debug)]
pub struct SharedFile(fs::File);

impl File for SharedFile {
    #[cfg(windows)]
    fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        use std::os::windows::fs::OpenOptionsExt;

        const FILE_SHARE_READ: u32 = 0x1;
        const FILE_SHARE_WRITE: u32 = 0x2;
        const FILE_SHARE_DELETE: u32 = 0x4;

        fs::OpenOptions::new()
            .read(true)
            .share_mode(FILE_SHARE_READ | FILE_SHARE_WRITE | FILE_SHARE_DELETE)
            .open(path)
            .map(Self)
    }

    #[cfg(not(windows))]
    fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        fs::OpenOptions::new().read(true).open(path).map(Self)
    }
}

impl Read for SharedFile {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.0.read(buf)
    }
}

/// An opened file along with its path and diagnostic [`Context`].
#[derive(Debug, PartialEq)]
pub struct PathFile<F: File>(pub PathBuf, pub F, pub Context);

impl<F: File> File for PathFile<F> {
    fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let buf = path.as_ref().to_path_buf();
        let file = F::open(&buf)?;
        let ctx = Context::from(buf.as_path());

        Ok(Self(buf, file, ctx))
    }
}

impl<F: File> Read for PathFile<F> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.1.read(buf)
    }
}

/// Read the entire contents of a file in shared mode.
///
/// No encoding is assumed.
/// The file handle is released before returning,
///   including on error.
pub fn read_all_shared<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let mut file = SharedFile::open(path)?;
    let mut buf = Vec::new();

    file.read_to_end(&mut buf)?;

    Ok(buf)
}

/// Write `data` to `path`,
///   creating the file or truncating an existing one.
pub fn write_all<P: AsRef<Path>, D: AsRef<[u8]>>(
    path: P,
    data: D,
) -> Result<()> {
    fs::write(path, data)
}

/// Whether `path` exists and is a regular file
///   (following symlinks).
pub fn is_file<P: AsRef<Path>>(path: P) -> bool {
    fs::metadata(path).map(|meta| meta.is_file()).unwrap_or(false)
}

/// Whether `path` exists and is a directory
///   (following symlinks).
pub fn is_dir<P: AsRef<Path>>(path: P) -> bool {
    fs::metadata(path).map(|meta| meta.is_dir()).unwrap_or(false)
}

pub trait Canonicalizer {
    fn canonicalize<P: AsRef<Path>>(path: P) -> Result<PathBuf>;
}

pub struct FsCanonicalizer;

impl Canonicalizer for FsCanonicalizer {
    fn canonicalize<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
        fs::canonicalize(path)
    }
}

/// Whether two paths resolve to the same location according to `C`.
///
/// Paths that cannot be resolved are never the same.
pub fn same_location<C: Canonicalizer, P: AsRef<Path>, Q: AsRef<Path>>(
    a: P,
    b: Q,
) -> bool {
    match (C::canonicalize(a), C::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
