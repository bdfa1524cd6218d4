use futures::StreamExt;
use indicatif::ProgressBar;
use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::error::{Error, Result};
use crate::types::Metadata;
use crate::ui;
use crate::utils::{absolute_url, sanitize_filename};

// Output file name for a record: "{id}.{ext}"
pub fn output_filename(metadata: &Metadata) -> String {
    let ext = metadata
        .best_format()
        .map(|format| format.ext.as_str())
        .unwrap_or("mp4");
    sanitize_filename(&format!("{}.{}", metadata.id, ext))
}

// Stream the media at `url` into `output_path`, reporting progress on `progress`
pub async fn download_media(
    client: &Client,
    url: &str,
    output_path: &Path,
    progress: &ProgressBar,
) -> Result<u64> {
    let url = absolute_url(url);
    info!(%url, path = %output_path.display(), "Downloading media");

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    let resp = client
        .get(&url)
        .send()
        .await
        .map_err(|source| Error::Fetch {
            url: url.clone(),
            source,
        })?;

    if !resp.status().is_success() {
        return Err(Error::Status {
            url,
            status: resp.status(),
        });
    }

    if let Some(len) = resp.content_length() {
        ui::set_total(progress, len);
    }

    let mut file = File::create(output_path).await?;
    let mut written = 0u64;
    let mut stream = resp.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|source| Error::Fetch {
            url: url.clone(),
            source,
        })?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
        progress.set_position(written);
    }

    file.flush().await?;
    progress.finish();
    info!(bytes = written, path = %output_path.display(), "Download finished");

    Ok(written)
}

// Download the record's first format into `dir`
pub async fn download_metadata(
    client: &Client,
    metadata: &Metadata,
    dir: &Path,
    progress: &ProgressBar,
) -> Result<PathBuf> {
    let format = metadata.best_format().ok_or_else(|| Error::NoFormats {
        id: metadata.id.clone(),
    })?;

    let path = dir.join(output_filename(metadata));
    download_media(client, &format.url, &path, progress).await?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Format;

    fn metadata(id: &str) -> Metadata {
        Metadata {
            id: id.to_string(),
            title: "road work".to_string(),
            formats: vec![Format {
                format_id: "mp4".to_string(),
                url: "https://content.sudomemo.net/video/LXH21J.mp4".to_string(),
                ext: "mp4".to_string(),
                width: None,
                height: None,
                vcodec: "h264".to_string(),
                acodec: "aac".to_string(),
                fps: 30,
            }],
            webpage_url: None,
            thumbnails: None,
            channel: None,
            creators: None,
            channel_url: None,
        }
    }

    #[test]
    fn test_output_filename() {
        assert_eq!(output_filename(&metadata("LXH21J")), "LXH21J.mp4");
        assert_eq!(output_filename(&metadata("a/b")), "a_b.mp4");
    }

    #[tokio::test]
    async fn test_download_without_formats_fails() {
        let mut record = metadata("LXH21J");
        record.formats.clear();

        let err = download_metadata(
            &Client::new(),
            &record,
            Path::new("."),
            &ProgressBar::hidden(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::NoFormats { .. }));
    }
}
