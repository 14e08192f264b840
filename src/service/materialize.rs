//! Result Materializer: locates the first inline binary payload in the
//! upstream response, writes it to disk and builds the result record.
//!
//! The first-match policy is part of the contract: candidates are scanned in
//! order, parts within each candidate in order, and the first part carrying
//! inline data wins. Later image parts are ignored.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::{ImageGenError, ImageGenResult, UpstreamError};
use crate::types::{
    AspectRatio, Blob, GenerateContentResponse, GenerationOutcome, ImageModel, ImageSize,
};

/// Length of the sanitized prompt prefix used in filenames.
const PROMPT_PREFIX_LEN: usize = 50;

/// Current wall-clock time as milliseconds since the Unix epoch.
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// Returns the first inline data blob in the response, scanning candidates
/// and their parts in order.
pub fn first_inline_image(response: &GenerateContentResponse) -> Option<&Blob> {
    response
        .candidates
        .iter()
        .flatten()
        .filter_map(|candidate| candidate.content.as_ref())
        .flat_map(|content| content.parts.iter())
        .find_map(|part| part.as_inline_data())
}

/// The first 50 characters of the prompt with everything outside
/// `[A-Za-z0-9]` replaced by `_`.
pub fn sanitized_prompt_prefix(prompt: &str) -> String {
    prompt
        .chars()
        .take(PROMPT_PREFIX_LEN)
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Derives the output filename for a prompt at a given timestamp.
///
/// Not guaranteed globally unique: two calls within the same millisecond
/// with the same prompt prefix produce the same name, and the second write
/// overwrites the first. Known limitation, kept as documented behavior.
pub fn image_filename(prompt: &str, timestamp_ms: u64) -> String {
    format!("{timestamp_ms}_{}.png", sanitized_prompt_prefix(prompt))
}

/// Extracts the first inline image from the response, writes it under
/// `output_directory` (created on demand) and returns the result record.
pub fn materialize(
    response: &GenerateContentResponse,
    prompt: &str,
    model: ImageModel,
    aspect_ratio: AspectRatio,
    image_size: ImageSize,
    output_directory: &Path,
    timestamp_ms: u64,
) -> ImageGenResult<GenerationOutcome> {
    let blob = first_inline_image(response).ok_or(ImageGenError::NoImageInResponse)?;

    let bytes = STANDARD
        .decode(&blob.data)
        .map_err(|e| UpstreamError::MalformedResponse {
            message: format!("inline image data is not valid base64: {e}"),
        })?;

    // Idempotent: succeeds when the directory already exists.
    std::fs::create_dir_all(output_directory).map_err(|source| ImageGenError::Io {
        path: output_directory.to_path_buf(),
        source,
    })?;

    let image_path: PathBuf = output_directory.join(image_filename(prompt, timestamp_ms));
    std::fs::write(&image_path, bytes).map_err(|source| ImageGenError::Io {
        path: image_path.clone(),
        source,
    })?;

    Ok(GenerationOutcome {
        image_path,
        prompt: prompt.to_string(),
        model,
        aspect_ratio,
        image_size,
    })
}
