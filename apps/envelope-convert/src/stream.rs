use anyhow::{Context, Result};
use envelope_conversion::Converter;
use envelope_protocol::v1;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub converted: u64,
    pub skipped: u64,
}

/// Convert newline-delimited v1 JSON from `reader` into v2 JSON lines.
///
/// Blank lines are ignored. A line that does not decode aborts the run,
/// unless `skip_invalid` is set, in which case it is logged and counted.
pub async fn convert_lines<R, W>(
    converter: &Converter,
    reader: R,
    mut writer: W,
    skip_invalid: bool,
) -> Result<Summary>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut summary = Summary::default();
    let mut line_no = 0_u64;

    while let Some(line) = lines.next_line().await.context("failed reading input")? {
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }

        let envelope: v1::Envelope = match serde_json::from_str(&line) {
            Ok(envelope) => envelope,
            Err(error) if skip_invalid => {
                warn!(line = line_no, %error, "skipping undecodable envelope");
                summary.skipped += 1;
                continue;
            }
            Err(error) => {
                return Err(error).with_context(|| format!("invalid envelope on line {line_no}"));
            }
        };

        let converted = converter.convert(&envelope);
        let mut rendered =
            serde_json::to_vec(&converted).context("failed serializing v2 envelope")?;
        rendered.push(b'\n');
        writer
            .write_all(&rendered)
            .await
            .context("failed writing output")?;
        summary.converted += 1;
    }

    writer.flush().await.context("failed flushing output")?;
    debug!(lines = line_no, "input exhausted");
    Ok(summary)
}
