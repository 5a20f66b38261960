use crate::asm::error_codes::ErrorCode;
use crate::asm::Error;
use std::fs::File;
use std::io;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;
use std::sync::Arc;

/// Sequential byte access to a source file.
pub trait Reader {
    fn path(&self) -> &Arc<Path>;

    /// Total length of the source in bytes. Does not move the read cursor.
    fn size(&mut self) -> Result<u64, Error>;

    /// Fills `data` completely or fails.
    /// Running out of input is reported as [`ErrorCode::EndOfFile`].
    fn read(&mut self, data: &mut [u8]) -> Result<(), Error>;

    /// Rewinds the read cursor to the first byte.
    fn reset(&mut self) -> Result<(), Error>;

    /// Releases the underlying handle. Calling this more than once has no effect.
    fn close(&mut self);

    fn read_byte(&mut self) -> Result<u8, Error> {
        let mut data = [0u8; 1];
        self.read(&mut data)?;
        Ok(data[0])
    }
}

pub struct FileReader {
    path: Arc<Path>,
    file: Option<BufReader<File>>,
}

impl FileReader {
    pub fn open(path: impl AsRef<Path>) -> Result<FileReader, Error> {
        let path: Arc<Path> = Arc::from(path.as_ref());
        let file = File::open(&path).map_err(|err| {
            raise!(
                ErrorCode::IOError,
                "Failed to open file: {}: {err}",
                path.display()
            )
        })?;
        tracing::debug!("opened {}", path.display());
        Ok(FileReader {
            path,
            file: Some(BufReader::new(file)),
        })
    }

    fn file(&mut self) -> Result<&mut BufReader<File>, Error> {
        let path = &self.path;
        self.file
            .as_mut()
            .ok_or_else(|| raise!(ErrorCode::IOError, "File is closed: {}", path.display()))
    }
}

impl Reader for FileReader {
    fn path(&self) -> &Arc<Path> {
        &self.path
    }

    fn size(&mut self) -> Result<u64, Error> {
        let result = self.file()?.get_ref().metadata();
        let metadata = result.map_err(|err| {
            raise!(
                ErrorCode::IOError,
                "Failed to query file size: {}: {err}",
                self.path.display()
            )
        })?;
        Ok(metadata.len())
    }

    fn read(&mut self, data: &mut [u8]) -> Result<(), Error> {
        let result = self.file()?.read_exact(data);
        result.map_err(|err| match err.kind() {
            io::ErrorKind::UnexpectedEof => raise!(
                ErrorCode::EndOfFile,
                "Failed to read file: {}",
                self.path.display()
            ),
            _ => raise!(
                ErrorCode::IOError,
                "Failed to read file: {}: {err}",
                self.path.display()
            ),
        })
    }

    fn reset(&mut self) -> Result<(), Error> {
        let result = self.file()?.seek(SeekFrom::Start(0));
        result.map(|_| ()).map_err(|err| {
            raise!(
                ErrorCode::IOError,
                "Failed to seek file set: {}: {err}",
                self.path.display()
            )
        })
    }

    fn close(&mut self) {
        self.file = None;
    }
}

/// A reader over text that is already in memory.
pub struct ByteReader {
    path: Arc<Path>,
    data: Box<[u8]>,
    offset: usize,
}

impl ByteReader {
    pub fn from_string(string: impl Into<String>, path: Arc<Path>) -> ByteReader {
        ByteReader {
            path,
            data: string.into().into_bytes().into(),
            offset: 0,
        }
    }

    pub fn from_read(mut read: impl Read, path: Arc<Path>) -> Result<ByteReader, Error> {
        let mut data = Vec::new();
        read.read_to_end(&mut data).map_err(|err| {
            raise!(
                ErrorCode::IOError,
                "Failed to read source: {}: {err}",
                path.display()
            )
        })?;
        Ok(ByteReader {
            path,
            data: data.into(),
            offset: 0,
        })
    }
}

impl Reader for ByteReader {
    fn path(&self) -> &Arc<Path> {
        &self.path
    }

    fn size(&mut self) -> Result<u64, Error> {
        Ok(self.data.len() as u64)
    }

    fn read(&mut self, data: &mut [u8]) -> Result<(), Error> {
        let end = self.offset + data.len();
        let Some(bytes) = self.data.get(self.offset..end) else {
            self.offset = self.data.len();
            return Err(raise!(
                ErrorCode::EndOfFile,
                "Failed to read file: {}",
                self.path.display()
            ));
        };
        data.copy_from_slice(bytes);
        self.offset = end;
        Ok(())
    }

    fn reset(&mut self) -> Result<(), Error> {
        self.offset = 0;
        Ok(())
    }

    fn close(&mut self) {
        self.data = Box::default();
        self.offset = 0;
    }
}
