//! CCCD card extraction through the Gemini `generateContent` REST API.
//!
//! The model is asked for a bare JSON object but often wraps it in a code fence or
//! returns slightly malformed JSON, so the reply is cleaned up before parsing.

use std::sync::OnceLock;

use base64::{engine::general_purpose::STANDARD, Engine};
use dioxus_logger::tracing;
use regex::Regex;
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};

use crate::{
    model::cccd::CccdDataDto,
    server::{config::Config, data::user::UserRepository, error::ocr::OcrError, error::AppError},
};

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const EXTRACTION_PROMPT: &str = "\
Bạn là một trợ lý AI chuyên về trích xuất thông tin. Phân tích hình ảnh CCCD Việt Nam này.
Chỉ trích xuất các thông tin sau và trả về dưới dạng JSON:
* `so_cccd` (Số CCCD)
* `ho_va_ten` (Họ và tên)
* `ngay_sinh` (Ngày sinh, DD/MM/YYYY)
* `gioi_tinh` (Giới tính)
* `quoc_tich` (Quốc tịch)
* `que_quan` (Quê quán)
* `noi_thuong_tru` (Nơi thường trú)
* `ngay_het_han` (Ngày hết hạn)
Chỉ trả về duy nhất đối tượng JSON, không giải thích, không markdown.
";

static CODE_BLOCK_RE: OnceLock<Regex> = OnceLock::new();
static TRAILING_COMMA_RE: OnceLock<Regex> = OnceLock::new();
static UNQUOTED_KEYS_RE: OnceLock<Regex> = OnceLock::new();
static BARE_KEY_RE: OnceLock<Regex> = OnceLock::new();
static DATE_RE: OnceLock<Regex> = OnceLock::new();

fn regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| {
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("regex {pattern} failed to compile: {error}"))
    })
}

/// MIME type sent with the image, chosen by file extension.
pub fn mime_type_for(filename: &str) -> &'static str {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => "image/jpeg",
    }
}

/// Cuts the JSON object out of a model reply.
///
/// A ```` ```json ```` block wins; otherwise the text between the first `{` and
/// the last `}` is used. Smart quotes and trailing commas are then repaired and
/// bare keys quoted.
pub fn clean_model_json(text: &str) -> String {
    let mut text = match regex(&CODE_BLOCK_RE, r"(?is)```json\s*(.*?)\s*```")
        .captures(text)
        .and_then(|c| c.get(1))
    {
        Some(block) => block.as_str().trim().to_string(),
        None => match (text.find('{'), text.rfind('}')) {
            (Some(start), Some(end)) if end > start => text[start..=end].to_string(),
            _ => text.to_string(),
        },
    };

    text = text
        .replace(['\u{201C}', '\u{201D}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");
    text = regex(&TRAILING_COMMA_RE, r",\s*([}\]])")
        .replace_all(&text, "$1")
        .into_owned();

    if regex(&UNQUOTED_KEYS_RE, r#"\{\s*[^"]+?:"#).is_match(&text) {
        text = regex(&BARE_KEY_RE, r"([{,\s])(\w+)\s*:")
            .replace_all(&text, r#"$1"$2":"#)
            .into_owned();
    }

    text
}

/// Normalizes a date to `DD/MM/YYYY`. Two-digit years above 30 are read as 19xx,
/// the rest as 20xx. Unrecognized input is returned trimmed.
pub fn normalize_birth_date(value: &str) -> String {
    let value = value.trim();
    let Some(caps) = regex(&DATE_RE, r"(\d{1,2})[/\-](\d{1,2})[/\-](\d{2,4})").captures(value)
    else {
        return value.to_string();
    };

    let day = format!("{:0>2}", &caps[1]);
    let month = format!("{:0>2}", &caps[2]);
    let year = &caps[3];
    let year = if year.len() == 2 {
        let century = if year.parse::<u32>().unwrap_or(0) > 30 {
            "19"
        } else {
            "20"
        };
        format!("{century}{year}")
    } else {
        year.to_string()
    };

    format!("{day}/{month}/{year}")
}

fn text_field(object: &Value, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parses a model reply into card fields.
///
/// # Returns
/// - `Ok(CccdDataDto)` - Fields with `so_cccd` reduced to digits and `ngay_sinh` normalized
/// - `Err(OcrError::Parse)` - No JSON object could be recovered
pub fn parse_extraction(reply: &str) -> Result<CccdDataDto, OcrError> {
    let cleaned = clean_model_json(reply);
    let object: Value = serde_json::from_str(&cleaned).map_err(|e| {
        tracing::error!("Could not parse OCR JSON, raw text: {}", cleaned);
        OcrError::Parse(e.to_string())
    })?;

    Ok(CccdDataDto {
        so_cccd: text_field(&object, "so_cccd")
            .map(|n| n.chars().filter(char::is_ascii_digit).collect()),
        ho_va_ten: text_field(&object, "ho_va_ten"),
        ngay_sinh: text_field(&object, "ngay_sinh").map(|d| normalize_birth_date(&d)),
        gioi_tinh: text_field(&object, "gioi_tinh"),
        quoc_tich: text_field(&object, "quoc_tich"),
        que_quan: text_field(&object, "que_quan"),
        noi_thuong_tru: text_field(&object, "noi_thuong_tru"),
        ngay_het_han: text_field(&object, "ngay_het_han"),
    })
}

pub struct CccdService<'a> {
    db: &'a DatabaseConnection,
    http: &'a reqwest::Client,
    config: &'a Config,
}

impl<'a> CccdService<'a> {
    pub fn new(db: &'a DatabaseConnection, http: &'a reqwest::Client, config: &'a Config) -> Self {
        Self { db, http, config }
    }

    /// Reads the card fields from an uploaded image. Nothing is persisted.
    ///
    /// # Arguments
    /// - `filename` - Upload file name, used for the MIME type
    /// - `image` - Raw image bytes
    ///
    /// # Returns
    /// - `Ok((CccdDataDto, exists))` - `exists` is true when the number is already registered
    /// - `Err(AppError::OcrErr)` - Key missing, provider failure or unparsable reply
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn extract(
        &self,
        filename: &str,
        image: &[u8],
    ) -> Result<(CccdDataDto, bool), AppError> {
        let reply = self.generate(mime_type_for(filename), image).await?;
        let data = parse_extraction(&reply)?;

        let exists = match data.so_cccd.as_deref().filter(|n| !n.is_empty()) {
            Some(number) => UserRepository::new(self.db)
                .find_by_cccd(number)
                .await?
                .is_some(),
            None => false,
        };

        Ok((data, exists))
    }

    async fn generate(&self, mime_type: &str, image: &[u8]) -> Result<String, OcrError> {
        let Some(api_key) = self.config.gemini_api_key.as_deref() else {
            return Err(OcrError::ApiKeyMissing);
        };

        let url = format!(
            "{}/models/{}:generateContent",
            GEMINI_API_URL, self.config.gemini_model
        );
        let body = json!({
            "contents": [{
                "parts": [
                    { "text": EXTRACTION_PROMPT },
                    { "inline_data": { "mime_type": mime_type, "data": STANDARD.encode(image) } }
                ]
            }]
        });

        let response = self
            .http
            .post(url)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| OcrError::Provider(e.to_string()))?;

        let status = response.status();
        let payload: Value = response
            .json()
            .await
            .map_err(|e| OcrError::Provider(e.to_string()))?;

        if !status.is_success() {
            let message = payload["error"]["message"]
                .as_str()
                .unwrap_or("unknown error")
                .to_string();
            return Err(OcrError::Provider(format!("{status}: {message}")));
        }

        let text: String = payload["candidates"][0]["content"]["parts"]
            .as_array()
            .map(|parts| parts.iter().filter_map(|p| p["text"].as_str()).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(OcrError::Provider("empty response".to_string()));
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_fenced_json_block() {
        let reply = "Here you go:\n```json\n{\"so_cccd\": \"001 203 004 567\"}\n```\nThanks";

        let data = parse_extraction(reply).unwrap();

        assert_eq!(data.so_cccd.as_deref(), Some("001203004567"));
    }

    #[test]
    fn repairs_loose_json() {
        let reply = "Result: {so_cccd: 79201001234, “ho_va_ten”: “NGUYỄN VĂN A”,}";

        let data = parse_extraction(reply).unwrap();

        assert_eq!(data.so_cccd.as_deref(), Some("79201001234"));
        assert_eq!(data.ho_va_ten.as_deref(), Some("NGUYỄN VĂN A"));
    }

    #[test]
    fn normalizes_birth_dates() {
        assert_eq!(normalize_birth_date("1/2/95"), "01/02/1995");
        assert_eq!(normalize_birth_date("01-02-05"), "01/02/2005");
        assert_eq!(normalize_birth_date("09/03/2001"), "09/03/2001");
        assert_eq!(normalize_birth_date(" unknown "), "unknown");
    }

    #[test]
    fn picks_mime_type_from_extension() {
        assert_eq!(mime_type_for("card.PNG"), "image/png");
        assert_eq!(mime_type_for("card.webp"), "image/webp");
        assert_eq!(mime_type_for("card.jpeg"), "image/jpeg");
        assert_eq!(mime_type_for("card"), "image/jpeg");
    }

    #[test]
    fn rejects_reply_without_json() {
        assert!(matches!(
            parse_extraction("I cannot read this image."),
            Err(OcrError::Parse(_))
        ));
    }
}
