//! Opening of input files and atomic writing of output files.

use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Write;
use std::io::{self};
use std::path::Path;
use std::path::PathBuf;

use flate2::read::MultiGzDecoder;
use tempfile::NamedTempFile;

/// The path that denotes the standard streams.
pub const STDIO: &str = "-";

/// The magic bytes at the start of every gzip member.
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// The directory that holds device files.
const DEVICE_DIRECTORY: &str = "/dev";

/// The path to the standard output device.
const DEV_STDOUT: &str = "/dev/stdout";

/// Returns whether the buffered input starts with the gzip magic bytes.
///
/// The bytes are inspected without being consumed.
pub fn is_gzipped<T>(reader: &mut T) -> io::Result<bool>
where
    T: BufRead,
{
    let buffer = reader.fill_buf()?;
    Ok(buffer.starts_with(&GZIP_MAGIC))
}

/// Wraps a reader so that gzip-compressed content is transparently
/// decompressed.
///
/// Multi-member (including BGZF) streams are read through to the end.
///
/// # Examples
///
/// ```
/// use std::io::Read;
///
/// let mut reader = mafkit::file::decode(&b"plain text"[..])?;
///
/// let mut text = String::new();
/// reader.read_to_string(&mut text)?;
/// assert_eq!(text, "plain text");
///
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn decode<'a, T>(mut reader: T) -> io::Result<Box<dyn BufRead + 'a>>
where
    T: BufRead + 'a,
{
    match is_gzipped(&mut reader)? {
        true => Ok(Box::new(BufReader::new(MultiGzDecoder::new(reader)))),
        false => Ok(Box::new(reader)),
    }
}

/// Opens a file for reading, decompressing it if it is gzipped.
///
/// The path `-` denotes the standard input.
pub fn open(path: impl AsRef<Path>) -> io::Result<Box<dyn BufRead>> {
    let path = path.as_ref();

    if path == Path::new(STDIO) {
        return decode(BufReader::new(io::stdin()));
    }

    decode(BufReader::new(File::open(path)?))
}

/// Where the contents of an [`AtomicOutput`] go once it is committed.
#[derive(Debug)]
enum Destination {
    /// A temporary file in the same directory as the target, persisted over
    /// the target on commit.
    File(BufWriter<NamedTempFile>, PathBuf),

    /// The standard output.
    Stdout(Vec<u8>),

    /// A device file that cannot be replaced (e.g., `/dev/null`).
    Device(Vec<u8>, PathBuf),
}

/// An output that only becomes visible once the writing has succeeded.
///
/// Regular files are written to a temporary file next to the target and
/// renamed over it by [`AtomicOutput::commit()`]. The standard output and
/// device files are buffered in memory and written on commit. Dropping an
/// uncommitted output discards everything that was written.
#[derive(Debug)]
pub struct AtomicOutput {
    /// The destination.
    destination: Destination,
}

impl AtomicOutput {
    /// Creates an output for the given path.
    ///
    /// The paths `-` and `/dev/stdout` denote the standard output.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();

        if path == Path::new(STDIO) || path == Path::new(DEV_STDOUT) {
            return Ok(Self {
                destination: Destination::Stdout(Vec::new()),
            });
        }

        if path.starts_with(DEVICE_DIRECTORY) {
            return Ok(Self {
                destination: Destination::Device(Vec::new(), path.to_path_buf()),
            });
        }

        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let file = NamedTempFile::new_in(directory)?;

        Ok(Self {
            destination: Destination::File(BufWriter::new(file), path.to_path_buf()),
        })
    }

    /// Makes everything written so far visible at the target.
    pub fn commit(self) -> io::Result<()> {
        match self.destination {
            Destination::File(writer, path) => {
                let file = writer.into_inner().map_err(|err| err.into_error())?;
                file.as_file().sync_all()?;
                file.persist(&path).map_err(|err| err.error)?;
            }
            Destination::Stdout(buffer) => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(&buffer)?;
                stdout.flush()?;
            }
            Destination::Device(buffer, path) => {
                let mut device = std::fs::OpenOptions::new().write(true).open(path)?;
                device.write_all(&buffer)?;
                device.flush()?;
            }
        }

        Ok(())
    }
}

impl Write for AtomicOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.destination {
            Destination::File(writer, _) => writer.write(buf),
            Destination::Stdout(buffer) | Destination::Device(buffer, _) => buffer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.destination {
            Destination::File(writer, _) => writer.flush(),
            Destination::Stdout(_) | Destination::Device(..) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use flate2::Compression;
    use flate2::write::GzEncoder;

    use super::*;

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn decodes_gzip_by_content() -> Result<(), Box<dyn std::error::Error>> {
        let compressed = gzip(b"chr1\t0\t10\n");
        assert!(is_gzipped(&mut &compressed[..])?);

        let mut text = String::new();
        decode(&compressed[..])?.read_to_string(&mut text)?;
        assert_eq!(text, "chr1\t0\t10\n");

        Ok(())
    }

    #[test]
    fn decodes_multiple_gzip_members() -> Result<(), Box<dyn std::error::Error>> {
        let mut compressed = gzip(b"first\n");
        compressed.extend(gzip(b"second\n"));

        let mut text = String::new();
        decode(&compressed[..])?.read_to_string(&mut text)?;
        assert_eq!(text, "first\nsecond\n");

        Ok(())
    }

    #[test]
    fn output_is_only_visible_after_commit() -> Result<(), Box<dyn std::error::Error>> {
        let directory = tempfile::tempdir()?;
        let path = directory.path().join("out.maf");

        let mut output = AtomicOutput::create(&path)?;
        output.write_all(b"##maf version=1\n")?;
        output.flush()?;
        assert!(!path.exists());

        output.commit()?;
        assert_eq!(std::fs::read_to_string(&path)?, "##maf version=1\n");

        Ok(())
    }

    #[test]
    fn dropped_output_leaves_the_target_untouched() -> Result<(), Box<dyn std::error::Error>> {
        let directory = tempfile::tempdir()?;
        let path = directory.path().join("out.maf");
        std::fs::write(&path, "previous")?;

        {
            let mut output = AtomicOutput::create(&path)?;
            output.write_all(b"partial")?;
        }

        assert_eq!(std::fs::read_to_string(&path)?, "previous");
        assert_eq!(std::fs::read_dir(directory.path())?.count(), 1);

        Ok(())
    }
}
