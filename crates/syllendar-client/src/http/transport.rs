use std::collections::VecDeque;
use std::pin::Pin;

use futures::StreamExt as _;
use futures::stream;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::errors::ClientError;
use crate::stream::EventStream;

pub(crate) type ByteStream =
    Pin<Box<dyn futures::Stream<Item = Result<bytes::Bytes, ClientError>> + Send + 'static>>;

const DATA_PREFIX: &str = "data: ";

/// Reassembles `data: <json>` lines out of arbitrarily split body chunks.
///
/// Bytes are buffered until a newline arrives, so a line (or a multi-byte
/// UTF-8 sequence inside one) split across reads decodes identically to the
/// same stream delivered as whole lines.
#[derive(Default)]
pub(crate) struct SseLineDecoder {
    buf: Vec<u8>,
}

impl SseLineDecoder {
    /// Appends a chunk and returns the payload of every complete
    /// `data: `-prefixed line now available. The trailing incomplete segment
    /// is held back as the new buffer.
    pub fn push_chunk(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(chunk);
        let mut payloads = Vec::new();
        while let Some(idx) = self.buf.iter().position(|b| *b == b'\n') {
            let line_bytes: Vec<u8> = self.buf.drain(..=idx).collect();
            let line = String::from_utf8_lossy(&line_bytes);
            let line = line.trim_end_matches(['\n', '\r']);
            if let Some(payload) = line.strip_prefix(DATA_PREFIX)
                && !payload.trim().is_empty()
            {
                payloads.push(payload.to_string());
            }
        }
        payloads
    }
}

/// Parses one line payload into a typed event.
///
/// A payload that fails JSON parsing is dropped with a warning; it never
/// terminates the sequence.
fn decode_payload<E: DeserializeOwned>(payload: &str) -> Option<E> {
    match serde_json::from_str(payload) {
        Ok(event) => Some(event),
        Err(err) => {
            warn!(%err, payload, "dropping malformed stream line");
            None
        }
    }
}

/// Turns a chunked body into a lazy sequence of typed events.
///
/// The body stream is owned by the returned stream and dropped with it on
/// every exit path, including early termination by the consumer.
pub(crate) fn typed_event_stream<E>(bytes_stream: ByteStream) -> EventStream<E>
where
    E: DeserializeOwned + Send + 'static,
{
    struct State<E> {
        bytes_stream: ByteStream,
        decoder: SseLineDecoder,
        pending: VecDeque<E>,
        done: bool,
    }

    let stream = stream::try_unfold(
        State::<E> {
            bytes_stream,
            decoder: SseLineDecoder::default(),
            pending: VecDeque::new(),
            done: false,
        },
        |mut state| async move {
            loop {
                if let Some(event) = state.pending.pop_front() {
                    return Ok(Some((event, state)));
                }
                if state.done {
                    return Ok(None);
                }

                match state.bytes_stream.next().await {
                    Some(Ok(chunk)) => {
                        for payload in state.decoder.push_chunk(&chunk) {
                            if let Some(event) = decode_payload::<E>(&payload) {
                                state.pending.push_back(event);
                            }
                        }
                    }
                    Some(Err(err)) => return Err(err),
                    None => state.done = true,
                }
            }
        },
    );
    Box::pin(stream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::{AnalysisEvent, ChatEvent};
    use bytes::Bytes;

    fn byte_stream(chunks: Vec<&'static [u8]>) -> ByteStream {
        Box::pin(stream::iter(
            chunks.into_iter().map(|c| Ok(Bytes::from_static(c))),
        ))
    }

    #[test]
    fn decoder_holds_back_incomplete_lines() {
        let mut decoder = SseLineDecoder::default();
        let first = decoder.push_chunk(b"data: {\"chunk\":\"hel");
        assert!(first.is_empty());
        let second = decoder.push_chunk(b"lo\"}\n");
        assert_eq!(second, vec![r#"{"chunk":"hello"}"#.to_string()]);
    }

    #[test]
    fn decoder_splits_multiple_lines_in_one_chunk() {
        let mut decoder = SseLineDecoder::default();
        let payloads =
            decoder.push_chunk(b"data: {\"done\":true}\n\ndata: {\"chunk\":\"x\"}\n");
        assert_eq!(payloads.len(), 2);
        assert_eq!(payloads[0], r#"{"done":true}"#);
        assert_eq!(payloads[1], r#"{"chunk":"x"}"#);
    }

    #[test]
    fn decoder_ignores_unprefixed_lines_and_crlf() {
        let mut decoder = SseLineDecoder::default();
        let payloads = decoder.push_chunk(b": keepalive\r\ndata: {\"done\":true}\r\n");
        assert_eq!(payloads, vec![r#"{"done":true}"#.to_string()]);
    }

    #[test]
    fn decoder_handles_utf8_split_across_chunks() {
        let mut decoder = SseLineDecoder::default();
        let line = "data: {\"chunk\":\"caf\u{e9}\"}\n".as_bytes();
        // Split inside the two-byte encoding of 'é'.
        let split = line.len() - 4;
        assert!(decoder.push_chunk(&line[..split]).is_empty());
        let payloads = decoder.push_chunk(&line[split..]);
        assert_eq!(payloads, vec!["{\"chunk\":\"caf\u{e9}\"}".to_string()]);
    }

    #[tokio::test]
    async fn typed_stream_decodes_identically_regardless_of_chunk_boundaries() {
        let whole = byte_stream(vec![
            b"data: {\"status\":\"analyzing\",\"message\":\"working\"}\n",
            b"data: {\"status\":\"streaming\",\"chunk\":\"abc\"}\n",
        ]);
        let split = byte_stream(vec![
            b"data: {\"status\":\"analyz",
            b"ing\",\"message\":\"working\"}\ndata: {\"st",
            b"atus\":\"streaming\",\"chunk\":\"abc\"}\n",
        ]);

        let from_whole: Vec<AnalysisEvent> = typed_event_stream(whole)
            .map(|r| r.expect("event"))
            .collect()
            .await;
        let from_split: Vec<AnalysisEvent> = typed_event_stream(split)
            .map(|r| r.expect("event"))
            .collect()
            .await;
        assert_eq!(from_whole, from_split);
        assert_eq!(from_whole.len(), 2);
    }

    #[tokio::test]
    async fn malformed_line_is_skipped_without_breaking_neighbors() {
        let bytes = byte_stream(vec![
            b"data: {\"chunk\":\"a\"}\ndata: {not json\ndata: {\"chunk\":\"b\"}\n",
        ]);
        let events: Vec<ChatEvent> = typed_event_stream(bytes)
            .map(|r| r.expect("event"))
            .collect()
            .await;
        assert_eq!(
            events,
            vec![
                ChatEvent::Chunk { chunk: "a".into() },
                ChatEvent::Chunk { chunk: "b".into() },
            ]
        );
    }

    #[tokio::test]
    async fn transport_error_ends_the_sequence() {
        let bytes: ByteStream = Box::pin(stream::iter(vec![
            Ok(Bytes::from_static(b"data: {\"chunk\":\"a\"}\n")),
            Err(ClientError::transport("connection reset")),
        ]));
        let mut events = typed_event_stream::<ChatEvent>(bytes);
        assert!(matches!(
            events.next().await,
            Some(Ok(ChatEvent::Chunk { .. }))
        ));
        assert!(matches!(
            events.next().await,
            Some(Err(ClientError::Transport { .. }))
        ));
    }
}
