//! Splitting a chunked response body into frames.
//!
//! A frame is the text between two blank-line delimiters. Chunks arrive at
//! arbitrary byte boundaries, so both the delimiter and multi-byte UTF-8
//! characters may be split across reads.

use std::collections::VecDeque;

use futures_util::stream::{self, Stream, StreamExt};

use crate::traits::{ByteStream, HttpError};

/// Separator between frames.
pub const FRAME_DELIMITER: &[u8] = b"\n\n";

/// Incremental frame splitter.
///
/// Feeding the same bytes through any chunking yields the same frames.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    /// Decoded text not yet closed by a delimiter
    buffer: String,
    /// Leading bytes of a UTF-8 sequence cut off by the chunk boundary
    pending: Vec<u8>,
    /// Offset in `buffer` before which no delimiter can start
    scanned: usize,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk and return every frame it completes, in order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        if self.pending.is_empty() {
            self.decode(chunk);
        } else {
            let mut joined = std::mem::take(&mut self.pending);
            joined.extend_from_slice(chunk);
            self.decode(&joined);
        }
        self.split_frames()
    }

    /// End of input. Unterminated text is dropped; returns how many bytes
    /// were discarded.
    pub fn finish(&mut self) -> usize {
        let discarded = self.buffer.len() + self.pending.len();
        self.buffer.clear();
        self.pending.clear();
        self.scanned = 0;
        discarded
    }

    /// Bytes held back waiting for a delimiter.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len() + self.pending.len()
    }

    fn decode(&mut self, mut input: &[u8]) {
        while !input.is_empty() {
            match std::str::from_utf8(input) {
                Ok(text) => {
                    self.buffer.push_str(text);
                    return;
                }
                Err(err) => {
                    let valid = err.valid_up_to();
                    self.buffer
                        .push_str(&String::from_utf8_lossy(&input[..valid]));
                    match err.error_len() {
                        Some(len) => {
                            self.buffer.push(char::REPLACEMENT_CHARACTER);
                            input = &input[valid + len..];
                        }
                        None => {
                            self.pending.extend_from_slice(&input[valid..]);
                            return;
                        }
                    }
                }
            }
        }
    }

    fn split_frames(&mut self) -> Vec<String> {
        let mut frames = Vec::new();
        let mut start = 0;
        let mut from = self.scanned;

        while let Some(offset) = find_delimiter(&self.buffer.as_bytes()[from..]) {
            let end = from + offset;
            frames.push(self.buffer[start..end].to_string());
            start = end + FRAME_DELIMITER.len();
            from = start;
        }

        self.buffer.drain(..start);
        // A delimiter may straddle the next chunk boundary.
        self.scanned = self
            .buffer
            .len()
            .saturating_sub(FRAME_DELIMITER.len() - 1);
        frames
    }
}

fn find_delimiter(haystack: &[u8]) -> Option<usize> {
    haystack
        .windows(FRAME_DELIMITER.len())
        .position(|window| window == FRAME_DELIMITER)
}

/// Adapt a response body into a stream of frames.
///
/// Frames already decoded from a chunk are yielded without touching the
/// transport again. A transport error is yielded once and ends the stream.
pub fn frames(body: ByteStream) -> impl Stream<Item = Result<String, HttpError>> + Send {
    stream::unfold(
        (Some(body), FrameDecoder::new(), VecDeque::new()),
        |(mut body, mut decoder, mut ready)| async move {
            loop {
                if let Some(frame) = ready.pop_front() {
                    return Some((Ok(frame), (body, decoder, ready)));
                }

                let bytes = body.as_mut()?;
                match bytes.next().await {
                    Some(Ok(chunk)) => ready.extend(decoder.push(&chunk)),
                    Some(Err(e)) => return Some((Err(e), (None, decoder, ready))),
                    None => {
                        let discarded = decoder.finish();
                        if discarded > 0 {
                            tracing::debug!(discarded, "Dropping unterminated trailing frame");
                        }
                        return None;
                    }
                }
            }
        },
    )
}
