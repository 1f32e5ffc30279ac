//! File intake: validation, loading and preview generation.

use crate::error::{IntakeError, ValidationError};
use image::DynamicImage;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;
use std::sync::Arc;

/// MIME types the prediction service accepts.
pub const ACCEPTED_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/jpg", "image/png"];

/// Largest accepted upload, 10 MiB.
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Longest edge of the decoded preview.
pub const PREVIEW_MAX_EDGE: u32 = 512;

/// Check a candidate file before anything is loaded or replaced.
///
/// The type rule is evaluated before the size rule.
pub fn validate(mime: &str, size: u64) -> Result<(), ValidationError> {
    if !ACCEPTED_MIME_TYPES.contains(&mime) {
        return Err(ValidationError::UnsupportedType {
            mime: mime.to_string(),
        });
    }
    if size > MAX_FILE_SIZE {
        return Err(ValidationError::TooLarge { size });
    }
    Ok(())
}

/// Best-effort MIME type from a file extension.
pub fn mime_from_path(path: &Path) -> &'static str {
    let ext = match path.extension().and_then(|s| s.to_str()) {
        Some(ext) => ext.to_ascii_lowercase(),
        None => return "application/octet-stream",
    };
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        _ => "application/octet-stream",
    }
}

fn resolve_mime(path: &Path, hint: Option<&str>) -> String {
    match hint.map(str::trim).filter(|m| !m.is_empty()) {
        Some(mime) => mime.to_ascii_lowercase(),
        None => mime_from_path(path).to_string(),
    }
}

/// Decoded RGBA pixels ready to be uploaded as a texture.
#[derive(Clone, PartialEq, Eq)]
pub struct Preview {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl fmt::Debug for Preview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preview")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// A validated image held in memory until it is replaced or cleared.
#[derive(Clone)]
pub struct UploadedImage {
    name: String,
    mime: String,
    bytes: Arc<[u8]>,
    preview: Option<Arc<Preview>>,
}

impl fmt::Debug for UploadedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedImage")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("size", &self.bytes.len())
            .field("preview", &self.preview)
            .finish()
    }
}

impl UploadedImage {
    /// Load a file from disk. `mime_hint` wins over the extension when the
    /// caller knows the type (drag-and-drop payloads often do).
    ///
    /// The size is taken from metadata so oversized files are never read.
    pub fn from_path(path: &Path, mime_hint: Option<&str>) -> Result<Self, IntakeError> {
        let mime = resolve_mime(path, mime_hint);
        let read_err = |source: std::io::Error| IntakeError::Read {
            path: path.to_path_buf(),
            source,
        };
        let size = fs::metadata(path).map_err(read_err)?.len();
        validate(&mime, size)?;
        // The file may have grown since the metadata call.
        let bytes = File::open(path).and_then(read_capped).map_err(read_err)?;
        validate(&mime, bytes.len() as u64)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Ok(Self::build(name, mime, bytes.into()))
    }

    /// Accept an in-memory payload, e.g. a drop event that already carries
    /// the file contents.
    pub fn from_bytes(
        name: impl Into<String>,
        mime: &str,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Result<Self, ValidationError> {
        let bytes = bytes.into();
        let mime = mime.trim().to_ascii_lowercase();
        validate(&mime, bytes.len() as u64)?;
        Ok(Self::build(name.into(), mime, bytes))
    }

    fn build(name: String, mime: String, bytes: Arc<[u8]>) -> Self {
        let preview = match image::load_from_memory(&bytes) {
            Ok(img) => Some(Arc::new(make_preview(img))),
            Err(e) => {
                tracing::warn!("No preview for {name}: {e}");
                None
            }
        };
        Self {
            name,
            mime,
            bytes,
            preview,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_deref()
    }
}

/// Read at most one byte past the size limit.
fn read_capped<R: Read>(reader: R) -> io::Result<Vec<u8>> {
    let mut bytes = Vec::new();
    reader.take(MAX_FILE_SIZE + 1).read_to_end(&mut bytes)?;
    Ok(bytes)
}

fn make_preview(img: DynamicImage) -> Preview {
    let img = if img.width() > PREVIEW_MAX_EDGE || img.height() > PREVIEW_MAX_EDGE {
        img.thumbnail(PREVIEW_MAX_EDGE, PREVIEW_MAX_EDGE)
    } else {
        img
    };
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Preview {
        width,
        height,
        rgba: rgba.into_raw(),
    }
}
