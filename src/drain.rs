//! Draining one output channel into a buffer.

use tokio::io::AsyncReadExt;
use tracing::{trace, warn};

use crate::error::Error;
use crate::ports::{OutputReader, OutputSink, StreamKind};

const CHUNK_SIZE: usize = 8192;

/// Reads `reader` until it closes and returns every byte in receipt order.
///
/// An absent reader yields an empty buffer. When `mirror` is set each chunk
/// is also written to the sink as soon as it arrives; a failed sink write is
/// logged and never alters the captured bytes. A read error fails the whole
/// drain and the bytes gathered so far are dropped.
///
/// # Errors
///
/// Returns [`Error::Stream`] if the channel reports an error before closing.
pub async fn drain(
    reader: Option<OutputReader>,
    stream: StreamKind,
    mirror: Option<&dyn OutputSink>,
) -> Result<Vec<u8>, Error> {
    let Some(mut reader) = reader else {
        return Ok(Vec::new());
    };

    let mut captured = Vec::new();
    let mut chunk = [0_u8; CHUNK_SIZE];
    loop {
        let count = reader.read(&mut chunk).await.map_err(|source| Error::Stream { stream, source })?;
        if count == 0 {
            break;
        }
        let bytes = &chunk[..count];
        trace!(%stream, len = count, "drained chunk");
        if let Some(sink) = mirror {
            if let Err(err) = sink.write(stream, bytes) {
                warn!(%stream, error = %err, "debug mirror write failed");
            }
        }
        captured.extend_from_slice(bytes);
    }
    Ok(captured)
}
