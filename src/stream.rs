//! Seekable byte streams that audio files are read from.

use std::fs::File;
use std::io::{self, BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// A readable, seekable source of audio bytes with a name for diagnostics.
pub trait AudioStream: Read + Seek {
    fn name(&self) -> &str;

    /// Total length in bytes. The read position is restored afterwards.
    fn length(&mut self) -> io::Result<u64> {
        let pos = self.stream_position()?;
        let len = self.seek(SeekFrom::End(0))?;
        self.seek(SeekFrom::Start(pos))?;
        Ok(len)
    }
}

#[derive(Debug)]
pub struct FileStream {
    path: PathBuf,
    name: String,
    inner: BufReader<File>,
}

impl FileStream {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        Ok(Self { name: path.display().to_string(), path, inner: BufReader::new(file) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Read for FileStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Seek for FileStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}

impl AudioStream for FileStream {
    fn name(&self) -> &str {
        &self.name
    }

    fn length(&mut self) -> io::Result<u64> {
        Ok(self.inner.get_ref().metadata()?.len())
    }
}

/// An in-memory stream, mostly useful for data that did not come from the filesystem.
#[derive(Debug, Clone)]
pub struct MemoryStream {
    name: String,
    inner: Cursor<Vec<u8>>,
}

impl MemoryStream {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self { name: name.into(), inner: Cursor::new(data) }
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.inner.into_inner()
    }
}

impl Read for MemoryStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Seek for MemoryStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}

impl AudioStream for MemoryStream {
    fn name(&self) -> &str {
        &self.name
    }

    fn length(&mut self) -> io::Result<u64> {
        Ok(self.inner.get_ref().len() as u64)
    }
}
