use anyhow::Result;
use futures::{Stream, StreamExt};
use std::fmt::Display;

use super::buffering::CircularLineBuffer;
use crate::traits::TokenStream;
use crate::StreamEvent;

/// Strategy pattern for parsing different SSE response types
pub trait SseLineParser: Send {
    /// Parse a data line into stream events
    fn parse_data_line(&self, data: &str) -> Result<Vec<StreamEvent>>;

    /// Check if this line signals end of stream
    fn is_done_marker(&self, data: &str) -> bool {
        data == "[DONE]"
    }
}

/// Outcome of feeding one complete line to the parser
enum LineOutcome {
    Skip,
    Events(Vec<StreamEvent>),
    Done,
}

fn handle_line<P: SseLineParser>(parser: &P, line: &str) -> Result<LineOutcome> {
    let Some(data) = line.strip_prefix("data:") else {
        // comments, `event:` and `id:` fields carry nothing for us
        return Ok(LineOutcome::Skip);
    };
    let data = data.trim_start();
    if parser.is_done_marker(data) {
        return Ok(LineOutcome::Done);
    }
    parser.parse_data_line(data).map(LineOutcome::Events)
}

/// Generic SSE stream parser using circular buffer
///
/// Accepts any byte-chunk stream so it can be driven by a `reqwest`
/// body as well as by in-memory fixtures.
pub fn parse_sse_stream<S, B, E, P>(byte_stream: S, parser: P) -> TokenStream
where
    S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Display + Send + 'static,
    P: SseLineParser + 'static,
{
    Box::pin(async_stream::stream! {
        let mut byte_chunks = Box::pin(byte_stream);
        let mut buffer = CircularLineBuffer::with_capacity(4096);
        let mut finished = false;

        while !finished {
            let mut lines = Vec::new();
            match byte_chunks.next().await {
                Some(Ok(bytes)) => {
                    buffer.extend(bytes.as_ref());
                    while let Some(line) = buffer.next_line() {
                        lines.push(line);
                    }
                }
                Some(Err(e)) => {
                    yield Err(anyhow::anyhow!("Stream error: {}", e));
                    break;
                }
                None => {
                    finished = true;
                    if let Some(line) = buffer.take_remainder() {
                        lines.push(line);
                    }
                }
            }

            for line in lines {
                match line.and_then(|line| handle_line(&parser, &line)) {
                    Ok(LineOutcome::Skip) => {}
                    Ok(LineOutcome::Events(events)) => {
                        for event in events {
                            yield Ok(event);
                        }
                    }
                    Ok(LineOutcome::Done) => {
                        yield Ok(StreamEvent::Done { finish_reason: None });
                        finished = true;
                        break;
                    }
                    Err(e) => yield Err(e),
                }
            }
        }
    })
}
