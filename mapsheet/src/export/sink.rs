//! Page persistence.

use std::future::Future;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};
use tracing::debug;

use super::error::ExportError;

/// Destination for finished pages.
///
/// The page is handed over by value; the pipeline keeps no reference to it
/// once saved.
pub trait PageSink: Send + Sync {
    /// Persists `page` under `file_name` and returns where it went.
    fn save(
        &self,
        page: RgbaImage,
        file_name: &str,
    ) -> impl Future<Output = Result<PathBuf, ExportError>> + Send;
}

/// Writes pages as PNG files into a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// The directory is created on the first save if it does not exist.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl PageSink for DirectorySink {
    async fn save(&self, page: RgbaImage, file_name: &str) -> Result<PathBuf, ExportError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| ExportError::CreateDirectoryFailed {
                path: self.dir.clone(),
                source,
            })?;

        // PNG compression of a full page is CPU-bound; keep it off the
        // async workers.
        let bytes = tokio::task::spawn_blocking(move || encode_png(&page))
            .await
            .map_err(|e| ExportError::EncodeFailed(format!("encoder task failed: {}", e)))??;

        let path = self.dir.join(file_name);
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|source| ExportError::WriteFailed {
                path: path.clone(),
                source,
            })?;

        debug!(path = %path.display(), bytes = bytes.len(), "Page written");
        Ok(path)
    }
}

/// Encodes a page as PNG.
pub fn encode_png(page: &RgbaImage) -> Result<Vec<u8>, ExportError> {
    let mut out = Cursor::new(Vec::new());
    page.write_to(&mut out, ImageFormat::Png)
        .map_err(|e| ExportError::EncodeFailed(e.to_string()))?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_directory_sink_writes_png() {
        let temp = TempDir::new().unwrap();
        let sink = DirectorySink::new(temp.path().join("pages"));

        let page = RgbaImage::from_pixel(12, 17, Rgba([1, 2, 3, 255]));
        let path = sink.save(page, "map_01_01_portrait_z17.png").await.unwrap();

        assert_eq!(path, temp.path().join("pages/map_01_01_portrait_z17.png"));
        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (12, 17));
        assert_eq!(*decoded.get_pixel(5, 5), Rgba([1, 2, 3, 255]));
    }

    #[tokio::test]
    async fn test_directory_sink_reports_unwritable_dir() {
        let temp = TempDir::new().unwrap();
        // A file where the directory should be
        let blocker = temp.path().join("blocked");
        std::fs::write(&blocker, b"x").unwrap();

        let sink = DirectorySink::new(&blocker);
        let err = sink
            .save(RgbaImage::new(1, 1), "page.png")
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::CreateDirectoryFailed { .. }));
    }

    #[test]
    fn test_encode_png_signature() {
        let bytes = encode_png(&RgbaImage::new(2, 2)).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }
}
