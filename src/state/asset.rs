/// Asset selection
///
/// Both the file picker and window drag-and-drop funnel into
/// `AssetSelector::set_asset`, which keeps at most one selected image and its
/// preview. Batches are never handled: only the first file of a pick or a
/// drop gesture is taken.

use bytes::Bytes;
use iced::Size;
use image::{ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::preview::{PreviewHandle, PreviewRegistry};
use crate::error::AssetError;

/// An image file read into memory, ready for upload.
///
/// `bytes` is shared: the preview and the upload reuse the same allocation.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetFile {
    pub path: PathBuf,
    pub file_name: String,
    pub bytes: Bytes,
    pub format: ImageFormat,
    pub dimensions: Size<u32>,
}

impl AssetFile {
    /// Read and sniff an image file.
    ///
    /// Only the header is decoded (format and dimensions); pixel decoding is
    /// left to the preview widget and the extraction service.
    pub async fn load(path: PathBuf, max_bytes: u64) -> Result<AssetFile, AssetError> {
        let size = tokio::fs::metadata(&path)
            .await
            .map_err(|e| io_error(&path, e))?
            .len();
        if size > max_bytes {
            return Err(AssetError::TooLarge {
                path,
                size,
                limit: max_bytes,
            });
        }

        let bytes = tokio::fs::read(&path).await.map_err(|e| io_error(&path, e))?;
        Self::from_bytes(path, bytes)
    }

    /// Build from bytes already in memory
    pub fn from_bytes(path: PathBuf, bytes: Vec<u8>) -> Result<AssetFile, AssetError> {
        let reader = ImageReader::new(Cursor::new(bytes.as_slice()))
            .with_guessed_format()
            .map_err(|_| AssetError::UnsupportedFormat(path.clone()))?;

        let format = reader
            .format()
            .ok_or_else(|| AssetError::UnsupportedFormat(path.clone()))?;

        let (width, height) = reader
            .into_dimensions()
            .map_err(|_| AssetError::UnsupportedFormat(path.clone()))?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());

        Ok(AssetFile {
            path,
            file_name,
            bytes: Bytes::from(bytes),
            format,
            dimensions: Size::new(width, height),
        })
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.to_mime_type()
    }
}

/// The single currently selected image
#[derive(Debug)]
pub struct SelectedAsset {
    pub file: AssetFile,
    pub preview: PreviewHandle,
}

/// Owns the selected asset and its preview
#[derive(Debug)]
pub struct AssetSelector {
    registry: PreviewRegistry,
    current: Option<SelectedAsset>,
}

impl AssetSelector {
    pub fn new(registry: PreviewRegistry) -> Self {
        Self {
            registry,
            current: None,
        }
    }

    /// Replace the selection.
    ///
    /// The previous preview is released before the new one is acquired, and
    /// file and preview are swapped in together.
    pub fn set_asset(&mut self, file: AssetFile) {
        if let Some(previous) = self.current.take() {
            debug!(path = %previous.file.path.display(), "Replacing selected image");
            drop(previous);
        }

        let preview = self.registry.acquire(file.bytes.clone(), file.dimensions);

        info!(
            path = %file.path.display(),
            width = file.dimensions.width,
            height = file.dimensions.height,
            bytes = file.bytes.len(),
            "Image selected"
        );

        self.current = Some(SelectedAsset { file, preview });
    }

    pub fn current(&self) -> Option<&SelectedAsset> {
        self.current.as_ref()
    }

    /// Move the selection out, leaving nothing selected
    pub fn take(&mut self) -> Option<SelectedAsset> {
        self.current.take()
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

fn io_error(path: &Path, err: std::io::Error) -> AssetError {
    AssetError::Io {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}

/// First path of a picker result
pub fn first_file(paths: Vec<PathBuf>) -> Option<PathBuf> {
    paths.into_iter().next()
}

/// Groups the per-file drop events of one drag gesture.
///
/// The window reports a hovered event per file, then a dropped event per
/// file. Only the first dropped path of a gesture is accepted. A gesture ends
/// once every hovered file has been dropped, or when the cursor leaves; a
/// drop whose hover events never arrived is its own gesture.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DropBatch {
    /// Hovered files not dropped yet
    pending: usize,
    taken: bool,
}

impl DropBatch {
    pub fn hovered(&mut self) {
        if self.pending == 0 {
            self.taken = false;
        }
        self.pending += 1;
    }

    pub fn left(&mut self) {
        self.pending = 0;
        self.taken = false;
    }

    /// Returns the path if it is the first file dropped in this gesture
    pub fn dropped(&mut self, path: PathBuf) -> Option<PathBuf> {
        let first = !self.taken;
        self.pending = self.pending.saturating_sub(1);
        self.taken = self.pending > 0;

        if !first {
            debug!(path = %path.display(), "Ignoring extra dropped file");
            return None;
        }
        Some(path)
    }

    pub fn is_hovering(&self) -> bool {
        self.pending > 0
    }
}

/// File extensions offered by the picker
pub const PICKER_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp", "tif", "tiff"];

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A valid 1x1 PNG
    pub(crate) const PNG_1X1: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
        0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0xF8,
        0xCF, 0xC0, 0xF0, 0x1F, 0x00, 0x05, 0x00, 0x01, 0xFF, 0x89, 0x99, 0x3D, 0x1D, 0x00, 0x00,
        0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ];

    pub(crate) fn sample_file(name: &str) -> AssetFile {
        AssetFile::from_bytes(PathBuf::from(name), PNG_1X1.to_vec()).unwrap()
    }

    #[test]
    fn test_from_bytes_sniffs_png() {
        let file = sample_file("/tmp/photo.png");
        assert_eq!(file.format, ImageFormat::Png);
        assert_eq!(file.dimensions, Size::new(1, 1));
        assert_eq!(file.file_name, "photo.png");
        assert_eq!(file.mime_type(), "image/png");
    }

    #[test]
    fn test_from_bytes_rejects_non_images() {
        let result = AssetFile::from_bytes(PathBuf::from("notes.txt"), b"hello world".to_vec());
        assert_eq!(
            result,
            Err(AssetError::UnsupportedFormat(PathBuf::from("notes.txt")))
        );
    }

    #[test]
    fn test_preview_shares_file_buffer() {
        let mut selector = AssetSelector::new(PreviewRegistry::new());
        let file = sample_file("a.png");
        let buffer = file.bytes.as_ptr();
        selector.set_asset(file);

        let current = selector.current().unwrap();
        assert_eq!(current.file.bytes.as_ptr(), buffer);
        match current.preview.image() {
            iced::widget::image::Handle::Bytes(_, bytes) => assert_eq!(bytes.as_ptr(), buffer),
            other => panic!("unexpected preview handle {:?}", other),
        }
    }

    #[test]
    fn test_reselect_releases_previous_preview_once() {
        let registry = PreviewRegistry::new();
        let mut selector = AssetSelector::new(registry.clone());

        selector.set_asset(sample_file("a.png"));
        let first_id = selector.current().map(|a| a.preview.id());
        assert_eq!(registry.live_count(), 1);
        assert_eq!(registry.released_count(), 0);

        selector.set_asset(sample_file("b.png"));
        assert_eq!(registry.live_count(), 1);
        assert_eq!(registry.released_count(), 1);

        let current = selector.current().unwrap();
        assert_eq!(current.file.file_name, "b.png");
        assert_ne!(Some(current.preview.id()), first_id);

        drop(selector);
        assert_eq!(registry.live_count(), 0);
        assert_eq!(registry.released_count(), 2);
    }

    #[test]
    fn test_take_moves_preview_without_release() {
        let registry = PreviewRegistry::new();
        let mut selector = AssetSelector::new(registry.clone());
        selector.set_asset(sample_file("a.png"));

        let taken = selector.take().unwrap();
        assert!(selector.current().is_none());
        assert_eq!(registry.released_count(), 0);

        drop(taken);
        assert_eq!(registry.released_count(), 1);
    }

    #[test]
    fn test_only_first_file_is_taken() {
        let paths = vec![PathBuf::from("one.png"), PathBuf::from("two.png")];
        assert_eq!(first_file(paths), Some(PathBuf::from("one.png")));
        assert_eq!(first_file(vec![]), None);
    }

    #[test]
    fn test_drop_batch_takes_first_file_per_gesture() {
        let mut batch = DropBatch::default();

        batch.hovered();
        batch.hovered();
        assert!(batch.is_hovering());
        assert_eq!(batch.dropped("one.png".into()), Some(PathBuf::from("one.png")));
        assert_eq!(batch.dropped("two.png".into()), None);

        // next gesture
        batch.hovered();
        assert_eq!(batch.dropped("three.png".into()), Some(PathBuf::from("three.png")));
    }

    #[test]
    fn test_drop_batch_without_hover_events() {
        let mut batch = DropBatch::default();

        // a full gesture, then a drop whose hover events were never seen
        batch.hovered();
        assert_eq!(batch.dropped("one.png".into()), Some(PathBuf::from("one.png")));
        assert!(!batch.is_hovering());
        assert_eq!(batch.dropped("two.png".into()), Some(PathBuf::from("two.png")));
    }

    #[test]
    fn test_drop_batch_reset_on_leave() {
        let mut batch = DropBatch::default();
        batch.hovered();
        batch.left();
        assert!(!batch.is_hovering());
        assert_eq!(batch.dropped("one.png".into()), Some(PathBuf::from("one.png")));
    }

    #[tokio::test]
    async fn test_load_enforces_size_limit() {
        let path = std::env::temp_dir().join("palette-extractor-size-limit.png");
        tokio::fs::write(&path, PNG_1X1).await.unwrap();

        let too_large = AssetFile::load(path.clone(), 10).await;
        assert!(matches!(too_large, Err(AssetError::TooLarge { limit: 10, .. })));

        let ok = AssetFile::load(path.clone(), 1024).await.unwrap();
        assert_eq!(ok.dimensions, Size::new(1, 1));

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_load_missing_file_is_io_error() {
        let result = AssetFile::load(PathBuf::from("/definitely/not/here.png"), 1024).await;
        assert!(matches!(result, Err(AssetError::Io { .. })));
    }
}
