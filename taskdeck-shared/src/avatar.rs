/// Avatar image validation and processing
///
/// Uploads are limited to 1 MB and jpeg/jpg/png files. Whatever comes in is
/// re-encoded server-side to a 250x250 PNG, so the stored blob always has a
/// fixed shape and format regardless of the upload.
///
/// # Example
///
/// ```
/// use taskdeck_shared::avatar::{allowed_extension, AVATAR_SIZE};
///
/// assert!(allowed_extension("me.JPG"));
/// assert!(!allowed_extension("me.gif"));
/// assert_eq!(AVATAR_SIZE, 250);
/// ```
use image::{imageops::FilterType, ImageFormat};
use std::io::Cursor;

/// Maximum accepted upload size in bytes.
pub const MAX_AVATAR_BYTES: usize = 1_000_000;

/// Side length of the stored square avatar.
pub const AVATAR_SIZE: u32 = 250;

const ALLOWED_EXTENSIONS: [&str; 3] = [".jpeg", ".jpg", ".png"];

/// Error type for avatar processing
#[derive(Debug, thiserror::Error)]
pub enum AvatarError {
    /// File extension not in the allowed set
    #[error("Please upload a jpeg, jpg, or png file")]
    UnsupportedExtension,

    /// Upload exceeds the size limit
    #[error("Avatar must be at most {MAX_AVATAR_BYTES} bytes")]
    TooLarge,

    /// The bytes did not decode as an image
    #[error("Could not decode image: {0}")]
    Decode(String),

    /// Re-encoding to PNG failed
    #[error("Could not encode image: {0}")]
    Encode(String),
}

/// Checks an uploaded filename against the allowed extensions
/// (case-insensitive).
pub fn allowed_extension(filename: &str) -> bool {
    let lower = filename.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Validates and processes an uploaded avatar.
///
/// Checks the filename extension and size limit, then decodes, resizes to
/// [`AVATAR_SIZE`] square ignoring aspect ratio, and re-encodes as PNG.
///
/// # Returns
///
/// The PNG bytes to store
///
/// # Errors
///
/// Any [`AvatarError`] variant; all of them are client errors.
pub fn process_avatar(filename: &str, bytes: &[u8]) -> Result<Vec<u8>, AvatarError> {
    if !allowed_extension(filename) {
        return Err(AvatarError::UnsupportedExtension);
    }

    if bytes.len() > MAX_AVATAR_BYTES {
        return Err(AvatarError::TooLarge);
    }

    let decoded =
        image::load_from_memory(bytes).map_err(|e| AvatarError::Decode(e.to_string()))?;

    let resized = decoded.resize_exact(AVATAR_SIZE, AVATAR_SIZE, FilterType::Triangle);

    let mut out = Cursor::new(Vec::new());
    resized
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| AvatarError::Encode(e.to_string()))?;

    Ok(out.into_inner())
}
