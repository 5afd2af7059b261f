use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::{ImageFormat, RgbaImage};
use thiserror::Error;

/// Errors that can occur while loading or encoding a room image
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Malformed data URI")]
    MalformedDataUri,

    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Failed to read image file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Failed to fetch image: {0}")]
    Fetch(String),

    #[error("Remote images are not supported on this platform")]
    Unsupported,

    #[error("Not an image file: {0}")]
    NotAnImage(String),
}

pub type AssetResult<T> = Result<T, AssetError>;

/// Where a base image comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    DataUri(String),
    Url(String),
    Path(PathBuf),
}

impl ImageSource {
    pub fn parse(source: &str) -> Self {
        let trimmed = source.trim();
        if trimmed.starts_with("data:") {
            Self::DataUri(trimmed.to_owned())
        } else if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::Url(trimmed.to_owned())
        } else {
            Self::Path(PathBuf::from(trimmed))
        }
    }

    /// Short human-readable label for logs and the UI
    pub fn label(&self) -> String {
        match self {
            Self::DataUri(uri) => format!("uploaded image ({} bytes)", uri.len()),
            Self::Url(url) => url.clone(),
            Self::Path(path) => path.display().to_string(),
        }
    }
}

/// A decoded room photo at its natural size
#[derive(Clone)]
pub struct BaseImage {
    source: String,
    pixels: Arc<RgbaImage>,
}

impl std::fmt::Debug for BaseImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaseImage")
            .field("source_len", &self.source.len())
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl BaseImage {
    pub fn new(source: impl Into<String>, pixels: RgbaImage) -> Self {
        Self {
            source: source.into(),
            pixels: Arc::new(pixels),
        }
    }

    /// The reference the image was loaded from, persisted as `imageSource`
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

/// Load and decode a base image. Blocking; run it through `task::spawn_task`.
pub fn load_base_image(source: &str) -> AssetResult<BaseImage> {
    let parsed = ImageSource::parse(source);
    log::info!("Loading room image from {}", parsed.label());
    let bytes = match &parsed {
        ImageSource::DataUri(uri) => decode_data_uri(uri)?.1,
        ImageSource::Url(url) => fetch_url(url)?,
        ImageSource::Path(path) => std::fs::read(path)?,
    };
    let decoded = image::load_from_memory(&bytes)?;
    log::debug!(
        "Decoded room image: {}x{}",
        decoded.width(),
        decoded.height()
    );
    Ok(BaseImage::new(source, decoded.to_rgba8()))
}

#[cfg(not(target_arch = "wasm32"))]
fn fetch_url(url: &str) -> AssetResult<Vec<u8>> {
    let response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(|e| AssetError::Fetch(e.to_string()))?;
    let bytes = response
        .bytes()
        .map_err(|e| AssetError::Fetch(e.to_string()))?;
    Ok(bytes.to_vec())
}

#[cfg(target_arch = "wasm32")]
fn fetch_url(_url: &str) -> AssetResult<Vec<u8>> {
    Err(AssetError::Unsupported)
}

/// Split a `data:<mime>;base64,<payload>` URI into its MIME type and bytes
pub fn decode_data_uri(uri: &str) -> AssetResult<(String, Vec<u8>)> {
    let rest = uri.strip_prefix("data:").ok_or(AssetError::MalformedDataUri)?;
    let (meta, payload) = rest.split_once(',').ok_or(AssetError::MalformedDataUri)?;
    let mime = meta
        .strip_suffix(";base64")
        .ok_or(AssetError::MalformedDataUri)?;
    let bytes = STANDARD.decode(payload.trim())?;
    Ok((mime.to_owned(), bytes))
}

pub fn encode_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// PNG-encode a frame as a data URI, the format used for thumbnails
pub fn png_data_uri(frame: &RgbaImage) -> AssetResult<String> {
    let mut buffer = Cursor::new(Vec::new());
    frame.write_to(&mut buffer, ImageFormat::Png)?;
    Ok(encode_data_uri("image/png", buffer.get_ref()))
}

/// Check if an upload is an image based on MIME type or extension
pub fn is_image_upload(mime: &str, path: Option<&Path>) -> bool {
    if !mime.is_empty() {
        return mime.starts_with("image/");
    }
    path.and_then(Path::extension)
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp"))
}

fn mime_for(path: Option<&Path>, bytes: &[u8]) -> String {
    if let Ok(format) = image::guess_format(bytes) {
        return format.to_mime_type().to_owned();
    }
    path.and_then(|p| ImageFormat::from_path(p).ok())
        .map(|f| f.to_mime_type().to_owned())
        .unwrap_or_else(|| "application/octet-stream".to_owned())
}

/// Turn an uploaded file into a self-contained `data:` image source
pub fn upload_to_data_uri(
    name: &str,
    mime: &str,
    path: Option<&Path>,
    bytes: &[u8],
) -> AssetResult<String> {
    if !is_image_upload(mime, path) {
        return Err(AssetError::NotAnImage(name.to_owned()));
    }
    let mime = if mime.is_empty() {
        mime_for(path, bytes)
    } else {
        mime.to_owned()
    };
    Ok(encode_data_uri(&mime, bytes))
}
