use thiserror::Error;

/// Failures extracting data from a CCCD image.
#[derive(Error, Debug)]
pub enum OcrError {
    /// No `cccdImage` part in the upload.
    #[error("Vui lòng tải lên ảnh CCCD")]
    MissingImage,

    /// The image part exceeds the upload limit.
    #[error("Ảnh CCCD không được vượt quá 10MB")]
    ImageTooLarge,

    /// `GEMINI_API_KEY` is not configured.
    #[error("GEMINI_API_KEY is not configured")]
    ApiKeyMissing,

    /// The OCR provider call failed.
    #[error("OCR request failed: {0}")]
    Provider(String),

    /// The provider answered but no JSON object could be recovered.
    #[error("Could not parse OCR response: {0}")]
    Parse(String),
}
