//! Streaming statement reading for SQL dump files.
//!
//! Splits a byte stream into SQL statements terminated by `;` at top
//! level, honoring string literals (single quotes with backslash escapes,
//! double quotes, backticks), `--` line comments, and `/* */` block
//! comments. Compressed inputs are transparently decoded based on the
//! file extension.

use anyhow::{Context, Result};
use memchr::memchr;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

const CHUNK_SIZE: usize = 64 * 1024;

/// Compression format detected from file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
    Bzip2,
    Xz,
    Zstd,
}

impl Compression {
    /// Detect compression format from file extension
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("gz" | "gzip") => Compression::Gzip,
            Some("bz2" | "bzip2") => Compression::Bzip2,
            Some("xz" | "lzma") => Compression::Xz,
            Some("zst" | "zstd") => Compression::Zstd,
            _ => Compression::None,
        }
    }

    /// Wrap a reader with the appropriate decompressor
    pub fn wrap_reader<'a>(&self, reader: Box<dyn Read + 'a>) -> io::Result<Box<dyn Read + 'a>> {
        Ok(match self {
            Compression::None => reader,
            Compression::Gzip => Box::new(flate2::read::GzDecoder::new(reader)),
            Compression::Bzip2 => Box::new(bzip2::read::BzDecoder::new(reader)),
            Compression::Xz => Box::new(xz2::read::XzDecoder::new(reader)),
            Compression::Zstd => Box::new(zstd::stream::read::Decoder::new(reader)?),
        })
    }
}

impl std::fmt::Display for Compression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Compression::None => write!(f, "none"),
            Compression::Gzip => write!(f, "gzip"),
            Compression::Bzip2 => write!(f, "bzip2"),
            Compression::Xz => write!(f, "xz"),
            Compression::Zstd => write!(f, "zstd"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Plain,
    SingleQuote,
    DoubleQuote,
    Backtick,
    LineComment,
    BlockComment,
}

/// Incremental statement splitter over any `Read` source.
pub struct StatementReader<R: Read> {
    reader: R,
    buf: Vec<u8>,
    pos: usize,
    state: ScanState,
    eof: bool,
}

impl<R: Read> StatementReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::with_capacity(CHUNK_SIZE),
            pos: 0,
            state: ScanState::Plain,
            eof: false,
        }
    }

    /// Read the next statement, including its terminating `;`.
    ///
    /// Returns `Ok(None)` once the source is exhausted. Trailing text
    /// without a terminator is returned as a final statement.
    pub fn next_statement(&mut self) -> io::Result<Option<String>> {
        loop {
            while self.pos < self.buf.len() {
                let b = self.buf[self.pos];
                match self.state {
                    ScanState::Plain => match b {
                        b';' => {
                            let stmt =
                                String::from_utf8_lossy(&self.buf[..=self.pos]).into_owned();
                            self.buf.drain(..=self.pos);
                            self.pos = 0;
                            if stmt.trim() != ";" {
                                return Ok(Some(stmt));
                            }
                            continue;
                        }
                        b'\'' => {
                            self.state = ScanState::SingleQuote;
                            self.pos += 1;
                        }
                        b'"' => {
                            self.state = ScanState::DoubleQuote;
                            self.pos += 1;
                        }
                        b'`' => {
                            self.state = ScanState::Backtick;
                            self.pos += 1;
                        }
                        b'-' => {
                            if self.pos + 1 < self.buf.len() {
                                if self.buf[self.pos + 1] == b'-' {
                                    self.state = ScanState::LineComment;
                                    self.pos += 2;
                                } else {
                                    self.pos += 1;
                                }
                            } else if self.eof {
                                self.pos += 1;
                            } else {
                                break; // need lookahead
                            }
                        }
                        b'/' => {
                            if self.pos + 1 < self.buf.len() {
                                if self.buf[self.pos + 1] == b'*' {
                                    self.state = ScanState::BlockComment;
                                    self.pos += 2;
                                } else {
                                    self.pos += 1;
                                }
                            } else if self.eof {
                                self.pos += 1;
                            } else {
                                break; // need lookahead
                            }
                        }
                        _ => self.pos += 1,
                    },
                    ScanState::SingleQuote => match b {
                        b'\\' => self.pos += 2,
                        b'\'' => {
                            self.state = ScanState::Plain;
                            self.pos += 1;
                        }
                        _ => self.pos += 1,
                    },
                    ScanState::DoubleQuote => {
                        if b == b'"' {
                            self.state = ScanState::Plain;
                        }
                        self.pos += 1;
                    }
                    ScanState::Backtick => {
                        if b == b'`' {
                            self.state = ScanState::Plain;
                        }
                        self.pos += 1;
                    }
                    ScanState::LineComment => {
                        match memchr(b'\n', &self.buf[self.pos..]) {
                            Some(n) => {
                                self.pos += n + 1;
                                self.state = ScanState::Plain;
                            }
                            None => self.pos = self.buf.len(),
                        }
                    }
                    ScanState::BlockComment => match memchr(b'*', &self.buf[self.pos..]) {
                        Some(n) => {
                            let star = self.pos + n;
                            if star + 1 < self.buf.len() {
                                if self.buf[star + 1] == b'/' {
                                    self.state = ScanState::Plain;
                                    self.pos = star + 2;
                                } else {
                                    self.pos = star + 1;
                                }
                            } else if self.eof {
                                self.pos = self.buf.len();
                            } else {
                                self.pos = star;
                                break; // need lookahead
                            }
                        }
                        None => self.pos = self.buf.len(),
                    },
                }
            }

            if self.eof {
                if self.buf.iter().any(|b| !b.is_ascii_whitespace()) {
                    let stmt = String::from_utf8_lossy(&self.buf).into_owned();
                    self.buf.clear();
                    self.pos = 0;
                    return Ok(Some(stmt));
                }
                return Ok(None);
            }
            self.fill()?;
        }
    }

    fn fill(&mut self) -> io::Result<()> {
        let mut chunk = [0u8; CHUNK_SIZE];
        let n = self.reader.read(&mut chunk)?;
        if n == 0 {
            self.eof = true;
        } else {
            self.buf.extend_from_slice(&chunk[..n]);
        }
        Ok(())
    }
}

/// Open a dump file as a statement reader, decoding compression by extension
pub fn open(path: &Path) -> Result<StatementReader<Box<dyn Read>>> {
    let file =
        File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    let compression = Compression::from_path(path);
    let reader = compression
        .wrap_reader(Box::new(file))
        .with_context(|| format!("cannot decode {} input", compression))?;
    Ok(StatementReader::new(reader))
}
