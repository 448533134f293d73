//! Newline-delimited JSON codec for the stdio transport.
//!
//! A line that is not valid JSON decodes to `Err(serde_json::Error)` as an
//! item rather than a stream error, so the session survives it. Only I/O
//! failures and oversized lines end the stream.

use bytes::{Buf, BufMut, BytesMut};
use serde::{Serialize, de::DeserializeOwned};
use std::marker::PhantomData;
use tokio_util::codec::{Decoder, Encoder};

const DEFAULT_MAX_LENGTH: usize = 16 * 1024 * 1024;

/// One decoded line: the message, or why it failed to parse.
pub type Line<T> = Result<T, serde_json::Error>;

#[derive(Debug)]
pub struct NdJsonCodec<T> {
    _phantom: PhantomData<T>,
    max_length: usize,
}

impl<T> NdJsonCodec<T> {
    /// Create a codec with the default max line length (16 MB).
    pub fn new() -> Self {
        Self::with_max_length(DEFAULT_MAX_LENGTH)
    }

    pub fn with_max_length(max_length: usize) -> Self {
        Self {
            _phantom: PhantomData,
            max_length,
        }
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    fn too_large(&self, length: usize) -> std::io::Error {
        std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Message too large: {} > {}", length, self.max_length),
        )
    }
}

impl<T> Default for NdJsonCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for NdJsonCodec<T> {
    fn clone(&self) -> Self {
        Self::with_max_length(self.max_length)
    }
}

fn is_blank(line: &[u8]) -> bool {
    line.iter().all(|b| b.is_ascii_whitespace())
}

impl<T: DeserializeOwned> Decoder for NdJsonCodec<T> {
    type Item = Line<T>;
    type Error = std::io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> std::result::Result<Option<Self::Item>, Self::Error> {
        loop {
            let Some(pos) = src.iter().position(|&b| b == b'\n') else {
                if src.len() > self.max_length {
                    return Err(self.too_large(src.len()));
                }
                return Ok(None);
            };

            if pos > self.max_length {
                return Err(self.too_large(pos));
            }

            let line = src.split_to(pos);
            src.advance(1);

            // Blank lines between messages are skipped
            if is_blank(&line) {
                continue;
            }
            return Ok(Some(serde_json::from_slice(&line)));
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> std::result::Result<Option<Self::Item>, Self::Error> {
        if let Some(item) = self.decode(src)? {
            return Ok(Some(item));
        }
        // Final line without a trailing newline
        if src.is_empty() || is_blank(&src[..]) {
            src.clear();
            return Ok(None);
        }
        let line = src.split_to(src.len());
        Ok(Some(serde_json::from_slice(&line)))
    }
}

impl<T: Serialize> Encoder<T> for NdJsonCodec<T> {
    type Error = std::io::Error;

    fn encode(&mut self, item: T, dst: &mut BytesMut) -> std::result::Result<(), Self::Error> {
        // Compact serialization never contains a raw newline
        let json = serde_json::to_vec(&item)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, format!("JSON error: {}", e)))?;

        if json.len() > self.max_length {
            return Err(self.too_large(json.len()));
        }

        dst.reserve(json.len() + 1);
        dst.put_slice(&json);
        dst.put_u8(b'\n');

        Ok(())
    }
}
