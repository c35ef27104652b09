//! File-to-payload encoding for locally selected images.
//!
//! Converts a file on disk into the `data:<mediaType>;base64,<payload>` form
//! the rest of the application trades in. No size or format validation is
//! performed here; the service is the arbiter of what it will accept.

use crate::models::UploadedImage;
use crate::Result;
use base64::Engine as _;
use std::path::Path;

/// Sniffs the media type from the file's leading magic bytes.
///
/// Unrecognized formats fall back to `image/png`; the service reports its own
/// error if the payload is not actually an image.
pub fn detect_image_mime(bytes: &[u8]) -> &'static str {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [0x89, 0x50, 0x4E, 0x47, ..] => "image/png",
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => "image/webp",
        [0x47, 0x49, 0x46, 0x38, ..] => "image/gif",
        _ => {
            tracing::warn!(
                "Unrecognized image format (first 4 bytes: {:02X?}), falling back to image/png",
                &bytes[..bytes.len().min(4)]
            );
            "image/png"
        }
    }
}

/// Reads a file and encodes it as an [`UploadedImage`].
///
/// Read failures propagate the platform io error unchanged; callers decide
/// how much of that to show the user.
pub async fn encode_image_file(path: &Path) -> Result<UploadedImage> {
    let bytes = tokio::fs::read(path).await?;
    let media_type = detect_image_mime(&bytes);
    let payload = base64::engine::general_purpose::STANDARD.encode(&bytes);

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    tracing::debug!(
        "Encoded {} ({} bytes) as {}",
        file_name,
        bytes.len(),
        media_type
    );

    Ok(UploadedImage {
        data_uri: format!("data:{};base64,{}", media_type, payload),
        media_type: media_type.to_string(),
        file_name,
    })
}

/// Splits a data-URI into `(media type, raw base64 payload)`.
///
/// Returns `None` when the input is not a `data:...;base64,...` string.
pub fn split_data_uri(uri: &str) -> Option<(&str, &str)> {
    let rest = uri.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    let media_type = header.strip_suffix(";base64")?;
    Some((media_type, payload))
}

/// Returns the raw base64 payload whether given a data-URI or a bare payload.
pub fn base64_payload(data: &str) -> &str {
    split_data_uri(data).map(|(_, payload)| payload).unwrap_or(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_detect_png() {
        assert_eq!(detect_image_mime(&PNG_MAGIC), "image/png");
    }

    #[test]
    fn test_detect_jpeg() {
        assert_eq!(detect_image_mime(&[0xFF, 0xD8, 0xFF, 0xE0]), "image/jpeg");
    }

    #[test]
    fn test_detect_webp() {
        assert_eq!(
            detect_image_mime(&[
                0x52, 0x49, 0x46, 0x46, 0x00, 0x00, 0x00, 0x00, 0x57, 0x45, 0x42, 0x50
            ]),
            "image/webp"
        );
    }

    #[test]
    fn test_detect_gif() {
        assert_eq!(detect_image_mime(b"GIF89a"), "image/gif");
    }

    #[test]
    fn test_unknown_falls_back_to_png() {
        assert_eq!(detect_image_mime(&[0x00, 0x01, 0x02, 0x03]), "image/png");
    }

    #[test]
    fn test_empty_falls_back_to_png() {
        assert_eq!(detect_image_mime(&[]), "image/png");
    }

    #[tokio::test]
    async fn test_encode_round_trips_original_bytes() {
        use base64::Engine as _;

        let mut original = PNG_MAGIC.to_vec();
        original.extend_from_slice(&[0x12, 0x34, 0x56, 0x78, 0x9A]);

        let mut file = tempfile::NamedTempFile::with_suffix(".png").unwrap();
        file.write_all(&original).unwrap();
        file.flush().unwrap();

        let upload = encode_image_file(file.path()).await.unwrap();
        assert_eq!(upload.media_type, "image/png");
        assert!(upload.file_name.ends_with(".png"));

        let (media_type, payload) = split_data_uri(&upload.data_uri).unwrap();
        assert_eq!(media_type, "image/png");

        let decoded = base64::engine::general_purpose::STANDARD
            .decode(payload)
            .unwrap();
        assert_eq!(decoded, original);
    }

    #[tokio::test]
    async fn test_encode_missing_file_propagates_io_error() {
        let err = encode_image_file(std::path::Path::new("/nonexistent/nope.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
    }

    #[test]
    fn test_split_data_uri() {
        let (media_type, payload) = split_data_uri("data:image/jpeg;base64,/9j/4A==").unwrap();
        assert_eq!(media_type, "image/jpeg");
        assert_eq!(payload, "/9j/4A==");
    }

    #[test]
    fn test_split_data_uri_rejects_plain_strings() {
        assert!(split_data_uri("not a data uri").is_none());
        assert!(split_data_uri("data:image/png,rawtext").is_none());
    }

    #[test]
    fn test_base64_payload_strips_header() {
        assert_eq!(base64_payload("data:image/png;base64,AAAA"), "AAAA");
        assert_eq!(base64_payload("AAAA"), "AAAA");
    }
}
