//! Parameter Normalizer: turns a loosely-typed [`ImageRequest`] into the
//! exact payload shape the upstream service requires.
//!
//! Validation is reject-early: the prompt, reference image count and every
//! reference file are checked before any bytes are read for encoding, and
//! all of it before the upstream call.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::{ImageGenError, ImageGenResult, REFERENCE_IMAGE_LIMIT};
use crate::types::{AspectRatio, ImageRequest, ImageSize, Part};

/// Label prefixed to the negative prompt line in the instruction text.
pub const NEGATIVE_PROMPT_LABEL: &str = "Negative prompt: ";

/// A request resolved against the configured defaults, with the content
/// payload ready to send upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRequest {
    /// Ordered payload: one text part, then one part per reference image.
    pub parts: Vec<Part>,
    /// Resolved aspect ratio.
    pub aspect_ratio: AspectRatio,
    /// Resolved size tier.
    pub image_size: ImageSize,
}

/// Maps a reference image extension to its canonical MIME type.
fn mime_for_extension(extension: &str) -> Option<&'static str> {
    match extension.to_ascii_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// Builds the single instruction text sent upstream. A negative prompt is
/// appended as a literal second line; the upstream schema has no structured
/// negative-prompt field.
pub fn instruction_text(prompt: &str, negative_prompt: Option<&str>) -> String {
    match negative_prompt.filter(|text| !text.is_empty()) {
        Some(negative) => format!("{prompt}\n{NEGATIVE_PROMPT_LABEL}{negative}"),
        None => prompt.to_string(),
    }
}

/// Encodes one reference image as an inline data part. The file must exist
/// and carry a supported extension.
fn encode_reference_image(path: &Path) -> ImageGenResult<Part> {
    if !path.exists() {
        return Err(ImageGenError::SourceImageNotFound {
            path: path.to_path_buf(),
        });
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();
    let mime_type =
        mime_for_extension(extension).ok_or_else(|| ImageGenError::UnsupportedImageFormat {
            extension: extension.to_string(),
        })?;

    let bytes = std::fs::read(path).map_err(|source| ImageGenError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(Part::inline_data(mime_type, STANDARD.encode(bytes)))
}

/// Normalizes a request: validates it, fills defaults for omitted options
/// and assembles the ordered content payload.
///
/// The part ordering is a protocol contract: the instruction text comes
/// first, then the reference images in input order, so the upstream service
/// associates the images with the preceding instruction.
pub fn normalize(
    request: &ImageRequest,
    default_aspect_ratio: AspectRatio,
    default_image_size: ImageSize,
) -> ImageGenResult<NormalizedRequest> {
    if request.prompt.trim().is_empty() {
        return Err(ImageGenError::InvalidRequest {
            message: "prompt is required and must be non-empty".to_string(),
        });
    }

    let count = request.reference_images.len();
    if count > REFERENCE_IMAGE_LIMIT {
        return Err(ImageGenError::TooManyReferenceImages {
            count,
            limit: REFERENCE_IMAGE_LIMIT,
        });
    }

    let text = instruction_text(&request.prompt, request.negative_prompt.as_deref());

    let mut parts = Vec::with_capacity(count + 1);
    parts.push(Part::text(text));
    for path in &request.reference_images {
        parts.push(encode_reference_image(path)?);
    }

    Ok(NormalizedRequest {
        parts,
        aspect_ratio: request.aspect_ratio.unwrap_or(default_aspect_ratio),
        image_size: request.image_size.unwrap_or(default_image_size),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn normalize_simple(request: &ImageRequest) -> ImageGenResult<NormalizedRequest> {
        normalize(request, AspectRatio::Square, ImageSize::Large)
    }

    fn write_reference(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_instruction_text_without_negative_prompt() {
        assert_eq!(instruction_text("a red fox", None), "a red fox");
    }

    #[test]
    fn test_instruction_text_with_negative_prompt() {
        assert_eq!(
            instruction_text("a red fox", Some("blurry, low quality")),
            "a red fox\nNegative prompt: blurry, low quality"
        );
    }

    #[test]
    fn test_empty_negative_prompt_is_ignored() {
        assert_eq!(instruction_text("a red fox", Some("")), "a red fox");
    }

    #[test]
    fn test_empty_prompt_rejected() {
        let request = ImageRequest::new("");
        assert!(matches!(
            normalize_simple(&request),
            Err(ImageGenError::InvalidRequest { .. })
        ));
    }

    #[test]
    fn test_whitespace_prompt_rejected() {
        let request = ImageRequest::new("   \n ");
        assert!(matches!(
            normalize_simple(&request),
            Err(ImageGenError::InvalidRequest { .. })
        ));
    }

    #[test]
    fn test_plain_prompt_yields_single_text_part() {
        let request = ImageRequest::new("a lighthouse at dusk");
        let normalized = normalize_simple(&request).unwrap();

        assert_eq!(normalized.parts, vec![Part::text("a lighthouse at dusk")]);
    }

    #[test]
    fn test_defaults_fill_omitted_options() {
        let request = ImageRequest::new("a fox");
        let normalized =
            normalize(&request, AspectRatio::NineBySixteen, ImageSize::Small).unwrap();

        assert_eq!(normalized.aspect_ratio, AspectRatio::NineBySixteen);
        assert_eq!(normalized.image_size, ImageSize::Small);
    }

    #[test]
    fn test_explicit_options_override_defaults() {
        let request = ImageRequest::new("a fox")
            .with_aspect_ratio(AspectRatio::SixteenByNine)
            .with_image_size(ImageSize::Xlarge);
        let normalized = normalize(&request, AspectRatio::Square, ImageSize::Small).unwrap();

        assert_eq!(normalized.aspect_ratio, AspectRatio::SixteenByNine);
        assert_eq!(normalized.image_size, ImageSize::Xlarge);
    }

    #[test]
    fn test_reference_images_encode_in_order_with_mime_types() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_reference(&dir, "first.png", b"png-bytes");
        let second = write_reference(&dir, "second.jpg", b"jpg-bytes");
        let third = write_reference(&dir, "third.webp", b"webp-bytes");

        let request = ImageRequest::new("combine these")
            .with_reference_images(vec![first, second, third]);
        let normalized = normalize_simple(&request).unwrap();

        assert_eq!(normalized.parts.len(), 4);
        assert_eq!(normalized.parts[0], Part::text("combine these"));

        let blob = normalized.parts[1].as_inline_data().unwrap();
        assert_eq!(blob.mime_type, "image/png");
        assert_eq!(blob.data, STANDARD.encode(b"png-bytes"));

        assert_eq!(
            normalized.parts[2].as_inline_data().unwrap().mime_type,
            "image/jpeg"
        );
        assert_eq!(
            normalized.parts[3].as_inline_data().unwrap().mime_type,
            "image/webp"
        );
    }

    #[test]
    fn test_jpeg_and_uppercase_extensions_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let jpeg = write_reference(&dir, "photo.jpeg", b"bytes");
        let upper = write_reference(&dir, "shot.PNG", b"bytes");

        let request = ImageRequest::new("edit").with_reference_images(vec![jpeg, upper]);
        let normalized = normalize_simple(&request).unwrap();

        assert_eq!(
            normalized.parts[1].as_inline_data().unwrap().mime_type,
            "image/jpeg"
        );
        assert_eq!(
            normalized.parts[2].as_inline_data().unwrap().mime_type,
            "image/png"
        );
    }

    #[test]
    fn test_at_most_fourteen_reference_images() {
        let dir = tempfile::tempdir().unwrap();
        let paths: Vec<PathBuf> = (0..14)
            .map(|i| write_reference(&dir, &format!("ref{i}.png"), b"x"))
            .collect();

        let request = ImageRequest::new("many").with_reference_images(paths);
        let normalized = normalize_simple(&request).unwrap();
        assert_eq!(normalized.parts.len(), 15);
    }

    #[test]
    fn test_fifteen_reference_images_rejected_before_any_read() {
        // Paths deliberately do not exist: the count check must fire first.
        let paths: Vec<PathBuf> = (0..15)
            .map(|i| PathBuf::from(format!("/nonexistent/ref{i}.png")))
            .collect();

        let request = ImageRequest::new("too many").with_reference_images(paths);
        match normalize_simple(&request) {
            Err(ImageGenError::TooManyReferenceImages { count, limit }) => {
                assert_eq!(count, 15);
                assert_eq!(limit, 14);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_missing_reference_image_names_path() {
        let request = ImageRequest::new("edit")
            .with_reference_images(vec![PathBuf::from("/nonexistent/ref.png")]);

        match normalize_simple(&request) {
            Err(ImageGenError::SourceImageNotFound { path }) => {
                assert_eq!(path, PathBuf::from("/nonexistent/ref.png"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_unsupported_extension_names_extension() {
        let dir = tempfile::tempdir().unwrap();
        let bmp = write_reference(&dir, "image.bmp", b"bytes");

        let request = ImageRequest::new("edit").with_reference_images(vec![bmp]);
        match normalize_simple(&request) {
            Err(ImageGenError::UnsupportedImageFormat { extension }) => {
                assert_eq!(extension, "bmp");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_negative_prompt_lands_in_text_part() {
        let request = ImageRequest::new("a castle").with_negative_prompt("people");
        let normalized = normalize_simple(&request).unwrap();

        assert_eq!(
            normalized.parts[0],
            Part::text("a castle\nNegative prompt: people")
        );
    }
}
