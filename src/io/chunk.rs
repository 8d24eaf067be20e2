//! Little-endian chunked binary container.
//!
//! A file is an 8-byte signature followed by a stream of chunks. Each chunk
//! is an 8-byte ASCII id, a u32 payload length, and the payload bytes.
//! Payloads are buffered whole, so a reader can skip chunks it does not
//! recognize and a writer never needs to backpatch lengths.

use std::io::{self, Cursor, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

/// Identifies a chunk within the container.
pub type ChunkId = [u8; 8];

/// Leading signature of every container file.
pub const SIGNATURE: ChunkId = *b"ANIMCHNK";

fn sequencing_error(reason: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, reason.to_string())
}

/// Writes a chunk stream to an underlying writer.
///
/// Chunks are written strictly one at a time: [`begin`] opens a chunk,
/// byte writes land in its payload, and [`end`] commits it. Calling out of
/// order is a sequencing violation and fails with `InvalidInput`.
///
/// [`begin`]: ChunkWriter::begin
/// [`end`]: ChunkWriter::end
#[derive(Debug)]
pub struct ChunkWriter<W: Write> {
    inner: W,
    current: Option<(ChunkId, Vec<u8>)>,
}

impl<W: Write> ChunkWriter<W> {
    /// Wrap a writer and emit the file signature.
    pub fn new(mut inner: W) -> io::Result<Self> {
        inner.write_all(&SIGNATURE)?;
        Ok(Self {
            inner,
            current: None,
        })
    }

    /// Open a new chunk. Fails if a chunk is already open.
    pub fn begin(&mut self, id: ChunkId) -> io::Result<()> {
        if self.current.is_some() {
            return Err(sequencing_error("a chunk is already open"));
        }
        self.current = Some((id, Vec::new()));
        Ok(())
    }

    /// Commit the open chunk to the underlying writer.
    pub fn end(&mut self) -> io::Result<()> {
        let Some((id, payload)) = self.current.take() else {
            return Err(sequencing_error("no chunk is open"));
        };
        self.inner.write_all(&id)?;
        self.inner.write_u32::<LittleEndian>(payload.len() as u32)?;
        self.inner.write_all(&payload)?;
        Ok(())
    }

    /// Finish the stream and return the underlying writer. Fails if a chunk
    /// is still open.
    pub fn finish(mut self) -> io::Result<W> {
        if self.current.is_some() {
            return Err(sequencing_error("a chunk is still open"));
        }
        self.inner.flush()?;
        Ok(self.inner)
    }

    /// Write a length-prefixed UTF-8 string into the open chunk.
    pub fn write_string(&mut self, value: &str) -> io::Result<()> {
        self.write_u32::<LittleEndian>(value.len() as u32)?;
        self.write_all(value.as_bytes())
    }
}

impl<W: Write> Write for ChunkWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let Some((_, payload)) = self.current.as_mut() else {
            return Err(sequencing_error("write outside of a chunk"));
        };
        payload.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Reads a chunk stream from an underlying reader.
///
/// [`next_chunk`] loads the next chunk's payload into memory and returns its
/// id, or `None` at end of stream. Byte reads then drain the loaded payload;
/// running past it yields `UnexpectedEof`.
///
/// [`next_chunk`]: ChunkReader::next_chunk
#[derive(Debug)]
pub struct ChunkReader<R: Read> {
    inner: R,
    payload: Cursor<Vec<u8>>,
}

impl<R: Read> ChunkReader<R> {
    /// Wrap a reader and verify the file signature.
    pub fn new(mut inner: R) -> io::Result<Self> {
        let mut signature = [0u8; 8];
        inner.read_exact(&mut signature)?;
        if signature != SIGNATURE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "not a chunked animation file",
            ));
        }
        Ok(Self {
            inner,
            payload: Cursor::new(Vec::new()),
        })
    }

    /// Advance to the next chunk, returning its id, or `None` at the end of
    /// the stream. Any unread bytes of the previous payload are discarded.
    pub fn next_chunk(&mut self) -> io::Result<Option<ChunkId>> {
        let mut id = [0u8; 8];
        match self.inner.read_exact(&mut id) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(err) => return Err(err),
        }
        let len = self.inner.read_u32::<LittleEndian>()? as usize;
        let mut payload = vec![0u8; len];
        self.inner.read_exact(&mut payload)?;
        self.payload = Cursor::new(payload);
        Ok(Some(id))
    }

    /// Advance to the next chunk and require a specific id.
    pub fn expect_chunk(&mut self, id: ChunkId) -> io::Result<()> {
        match self.next_chunk()? {
            Some(found) if found == id => Ok(()),
            Some(found) => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "expected chunk {:?}, found {:?}",
                    String::from_utf8_lossy(&id),
                    String::from_utf8_lossy(&found)
                ),
            )),
            None => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("expected chunk {:?}", String::from_utf8_lossy(&id)),
            )),
        }
    }

    /// Read a length-prefixed UTF-8 string from the current payload.
    pub fn read_string(&mut self) -> io::Result<String> {
        let len = self.read_u32::<LittleEndian>()? as usize;
        let mut bytes = vec![0u8; len];
        self.read_exact(&mut bytes)?;
        String::from_utf8(bytes)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
    }
}

impl<R: Read> Read for ChunkReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.payload.read(buf)
    }
}
