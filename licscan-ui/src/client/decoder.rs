//! Incremental UTF-8 decoding of a chunked response body
//!
//! Network chunks can split a multi-byte character. Incomplete trailing
//! bytes are held back and prefixed to the next chunk; invalid sequences are
//! replaced with U+FFFD.

use futures::stream::{Stream, StreamExt};
use std::fmt::Display;

use super::FragmentStream;
use crate::error::ClientError;

/// Stream-mode UTF-8 decoder
#[derive(Debug, Default)]
pub struct Utf8ChunkDecoder {
    pending: Vec<u8>,
}

impl Utf8ChunkDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode as much of `pending + chunk` as forms complete characters
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        self.pending.extend_from_slice(chunk);
        let mut out = String::new();

        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(text) => {
                    out.push_str(text);
                    self.pending.clear();
                    break;
                }
                Err(e) => {
                    let valid = e.valid_up_to();
                    out.push_str(&String::from_utf8_lossy(&self.pending[..valid]));
                    match e.error_len() {
                        Some(bad) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            self.pending.drain(..valid + bad);
                        }
                        None => {
                            // Incomplete sequence at the end: wait for more bytes
                            self.pending.drain(..valid);
                            break;
                        }
                    }
                }
            }
        }

        out
    }

    /// Flush bytes still held back when the body ends
    pub fn finish(self) -> Option<String> {
        if self.pending.is_empty() {
            None
        } else {
            Some(String::from_utf8_lossy(&self.pending).into_owned())
        }
    }
}

/// Turn a body byte stream into a stream of text fragments
///
/// One fragment per received chunk that decodes to non-empty text. The first
/// transport error ends the stream after the fragments already yielded.
pub fn text_fragments<S, B, E>(body: S) -> FragmentStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Display + Send + 'static,
{
    Box::pin(async_stream::try_stream! {
        let mut decoder = Utf8ChunkDecoder::new();
        let mut body = Box::pin(body);

        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| ClientError::Stream(e.to_string()))?;
            let text = decoder.decode(chunk.as_ref());
            if !text.is_empty() {
                yield text;
            }
        }

        if let Some(rest) = decoder.finish() {
            yield rest;
        }
    })
}
