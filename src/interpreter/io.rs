//! Byte I/O capability handed to the engine for `,` and `.`
//!
//! - [`StdIo`]: adapts any `Read`/`Write` pair (stdin/stdout in the CLI)
//! - [`BufferIo`]: in-memory input queue and output recorder

use std::collections::VecDeque;
use std::io::{self, Read, Write};

/// Source and sink for single bytes.
///
/// `read_byte` may block. `Ok(None)` means the input is exhausted; the engine
/// then stores 0 in the current cell.
pub trait ByteIo {
    fn read_byte(&mut self) -> io::Result<Option<u8>>;
    fn write_byte(&mut self, byte: u8) -> io::Result<()>;
}

/// [`ByteIo`] over a reader and a writer, flushing after every byte
pub struct StdIo<R, W> {
    reader: R,
    writer: W,
}

impl<R: Read, W: Write> StdIo<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        StdIo { reader, writer }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

impl StdIo<io::Stdin, io::Stdout> {
    /// Process stdin and stdout
    pub fn stdio() -> Self {
        StdIo::new(io::stdin(), io::stdout())
    }
}

impl<R: Read, W: Write> ByteIo for StdIo<R, W> {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut buf = [0u8; 1];
        loop {
            match self.reader.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        self.writer.write_all(&[byte])?;
        self.writer.flush()
    }
}

/// In-memory [`ByteIo`]: queued input, recorded output
#[derive(Debug, Clone, Default)]
pub struct BufferIo {
    input: VecDeque<u8>,
    output: Vec<u8>,
}

impl BufferIo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(input: impl AsRef<[u8]>) -> Self {
        BufferIo {
            input: input.as_ref().iter().copied().collect(),
            output: Vec::new(),
        }
    }

    pub fn push_input(&mut self, bytes: impl AsRef<[u8]>) {
        self.input.extend(bytes.as_ref());
    }

    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Output decoded lossily as text
    pub fn output_text(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }

    /// Input bytes not yet consumed
    pub fn remaining_input(&self) -> usize {
        self.input.len()
    }
}

impl ByteIo for BufferIo {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        Ok(self.input.pop_front())
    }

    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        self.output.push(byte);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_io() {
        let mut io = BufferIo::with_input("hi");
        assert_eq!(io.read_byte().unwrap(), Some(b'h'));
        assert_eq!(io.remaining_input(), 1);
        assert_eq!(io.read_byte().unwrap(), Some(b'i'));
        assert_eq!(io.read_byte().unwrap(), None);

        io.write_byte(b'o').unwrap();
        io.write_byte(b'k').unwrap();
        assert_eq!(io.output(), b"ok");
        assert_eq!(io.output_text(), "ok");
    }

    #[test]
    fn test_std_io_over_buffers() {
        let input: &[u8] = b"A";
        let mut io = StdIo::new(input, Vec::new());

        assert_eq!(io.read_byte().unwrap(), Some(b'A'));
        assert_eq!(io.read_byte().unwrap(), None);
        io.write_byte(b'Z').unwrap();

        let (_, written) = io.into_inner();
        assert_eq!(written, b"Z");
    }
}
