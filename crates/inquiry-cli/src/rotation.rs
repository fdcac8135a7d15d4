//! Size-based log file rotation.
//!
//! [`SizeRotatingWriter`] appends to a single active file. Before a write
//! that would push the file past its size limit, the file is renamed to
//! `<file_name>.<YYYYmmdd-HHMMSS>`, optionally gzip-compressed to
//! `<file_name>.<YYYYmmdd-HHMMSS>.gz`, and a fresh file is opened.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;
use time::OffsetDateTime;
use time::format_description::FormatItem;
use time::macros::format_description;

const SUFFIX_FORMAT: &[FormatItem<'static>] =
    format_description!("[year][month][day]-[hour][minute][second]");

/// An [`io::Write`] log file that rotates itself by size.
#[derive(Debug)]
pub struct SizeRotatingWriter {
    directory: PathBuf,
    file_name: String,
    max_size: u64,
    compress: bool,
    file: File,
    size: u64,
}

impl SizeRotatingWriter {
    /// Open (or create) `directory/file_name` for appending.
    ///
    /// The directory is created if needed. An existing file keeps its
    /// contents and counts toward the size limit.
    pub fn new(
        directory: impl Into<PathBuf>,
        file_name: impl Into<String>,
        max_size: u64,
        compress: bool,
    ) -> io::Result<Self> {
        let directory = directory.into();
        let file_name = file_name.into();
        fs::create_dir_all(&directory)?;

        let path = directory.join(&file_name);
        let file = open_append(&path)?;
        let size = file.metadata()?.len();

        Ok(Self {
            directory,
            file_name,
            max_size,
            compress,
            file,
            size,
        })
    }

    /// Path of the active log file.
    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }

    /// Bytes in the active file.
    pub fn size(&self) -> u64 {
        self.size
    }

    fn rotate(&mut self) -> io::Result<()> {
        let rotated = self.rotated_path();
        self.rotate_to(rotated)
    }

    /// Move the active file to `rotated` and start a new one.
    ///
    /// A failed compression leaves the rotated file uncompressed and is
    /// reported on stderr; it is not an error for the pending write.
    fn rotate_to(&mut self, rotated: PathBuf) -> io::Result<()> {
        self.file.flush()?;

        let active = self.path();
        fs::rename(&active, &rotated)?;

        self.file = open_append(&active)?;
        self.size = 0;

        // Not through tracing: this writer sits underneath it
        if self.compress
            && let Err(e) = compress_file(&rotated)
        {
            eprintln!("bt-inquiry: cannot compress {}: {}", rotated.display(), e);
        }
        Ok(())
    }

    fn rotated_path(&self) -> PathBuf {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        let stamp = now
            .format(SUFFIX_FORMAT)
            .unwrap_or_else(|_| now.unix_timestamp().to_string());
        let base = format!("{}.{}", self.file_name, stamp);

        // Several rotations can happen within one second
        let mut candidate = self.directory.join(&base);
        let mut n = 1;
        while candidate.exists() || gz_path(&candidate).exists() {
            candidate = self.directory.join(format!("{}.{}", base, n));
            n += 1;
        }
        candidate
    }
}

impl Write for SizeRotatingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.size > 0 && self.size + buf.len() as u64 > self.max_size {
            self.rotate()?;
        }
        self.file.write_all(buf)?;
        self.size += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

fn gz_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".gz");
    PathBuf::from(name)
}

/// Gzip `path` to `path.gz` and remove the original.
fn compress_file(path: &Path) -> io::Result<PathBuf> {
    let target = gz_path(path);
    let mut input = BufReader::new(File::open(path)?);
    let mut encoder = GzEncoder::new(File::create(&target)?, Compression::default());
    io::copy(&mut input, &mut encoder)?;
    encoder.finish()?.sync_all()?;
    fs::remove_file(path)?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_creates_directory_and_file() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("log");

        let writer = SizeRotatingWriter::new(&dir, "inquiry.log", 1024, true).unwrap();
        assert!(writer.path().exists());
        assert_eq!(writer.size(), 0);
    }

    #[test]
    fn test_appends_to_existing_file() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("inquiry.log"), b"earlier\n").unwrap();

        let mut writer = SizeRotatingWriter::new(temp.path(), "inquiry.log", 1024, true).unwrap();
        assert_eq!(writer.size(), 8);

        writer.write_all(b"later\n").unwrap();
        writer.flush().unwrap();

        let content = fs::read_to_string(writer.path()).unwrap();
        assert_eq!(content, "earlier\nlater\n");
    }

    #[test]
    fn test_rotates_and_compresses() {
        let temp = tempfile::tempdir().unwrap();
        let mut writer = SizeRotatingWriter::new(temp.path(), "inquiry.log", 32, true).unwrap();

        writer.write_all(b"the first line, long enough\n").unwrap();
        writer.write_all(b"second line\n").unwrap();
        writer.flush().unwrap();

        let names = entries(temp.path());
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"inquiry.log".to_string()));
        let rotated = names.iter().find(|n| n.ends_with(".gz")).unwrap();
        assert!(rotated.starts_with("inquiry.log."));

        let mut decoded = String::new();
        GzDecoder::new(File::open(temp.path().join(rotated)).unwrap())
            .read_to_string(&mut decoded)
            .unwrap();
        assert_eq!(decoded, "the first line, long enough\n");

        assert_eq!(fs::read_to_string(writer.path()).unwrap(), "second line\n");
        assert_eq!(writer.size(), 12);
    }

    #[test]
    fn test_rotates_without_compression() {
        let temp = tempfile::tempdir().unwrap();
        let mut writer = SizeRotatingWriter::new(temp.path(), "inquiry.log", 16, false).unwrap();

        writer.write_all(b"0123456789\n").unwrap();
        writer.write_all(b"abcdefghij\n").unwrap();

        let names = entries(temp.path());
        assert_eq!(names.len(), 2);
        let rotated = names.iter().find(|n| *n != "inquiry.log").unwrap();
        assert!(!rotated.ends_with(".gz"));
        assert_eq!(
            fs::read_to_string(temp.path().join(rotated)).unwrap(),
            "0123456789\n"
        );
    }

    #[test]
    fn test_oversized_write_into_empty_file_does_not_rotate() {
        let temp = tempfile::tempdir().unwrap();
        let mut writer = SizeRotatingWriter::new(temp.path(), "inquiry.log", 4, true).unwrap();

        writer.write_all(b"much longer than four bytes\n").unwrap();
        assert_eq!(entries(temp.path()), vec!["inquiry.log".to_string()]);
    }

    #[test]
    fn test_repeated_rotation_keeps_every_file() {
        let temp = tempfile::tempdir().unwrap();
        let mut writer = SizeRotatingWriter::new(temp.path(), "inquiry.log", 8, true).unwrap();

        for _ in 0..4 {
            writer.write_all(b"12345678\n").unwrap();
        }

        let names = entries(temp.path());
        assert_eq!(names.iter().filter(|n| n.ends_with(".gz")).count(), 3);
        assert!(names.contains(&"inquiry.log".to_string()));
    }

    #[test]
    fn test_compression_failure_keeps_logging() {
        let temp = tempfile::tempdir().unwrap();
        let mut writer = SizeRotatingWriter::new(temp.path(), "inquiry.log", 1024, true).unwrap();
        writer.write_all(b"before rotation\n").unwrap();

        // A directory where the archive should go makes compression fail
        let rotated = temp.path().join("inquiry.log.1");
        fs::create_dir(gz_path(&rotated)).unwrap();

        writer.rotate_to(rotated.clone()).unwrap();
        writer.write_all(b"after rotation\n").unwrap();
        writer.flush().unwrap();

        assert_eq!(fs::read_to_string(&rotated).unwrap(), "before rotation\n");
        assert_eq!(fs::read_to_string(writer.path()).unwrap(), "after rotation\n");
        assert_eq!(writer.size(), 15);
    }

    #[test]
    fn test_write_at_exact_limit_does_not_rotate() {
        let temp = tempfile::tempdir().unwrap();
        let mut writer = SizeRotatingWriter::new(temp.path(), "inquiry.log", 8, true).unwrap();

        writer.write_all(b"1234").unwrap();
        writer.write_all(b"5678").unwrap();
        assert_eq!(entries(temp.path()).len(), 1);
        assert_eq!(writer.size(), 8);
    }
}
