use std::path::Path;

use tokio::io::{AsyncWriteExt, BufWriter};

use crate::loadtest::LoadTestResult;

/// Writes the full result, raw timings included, as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error when the file cannot be created or written.
pub async fn export_json(path: &Path, result: &LoadTestResult) -> Result<(), std::io::Error> {
    let json = serde_json::to_vec_pretty(result).map_err(std::io::Error::other)?;
    let file = tokio::fs::File::create(path).await?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&json).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}
