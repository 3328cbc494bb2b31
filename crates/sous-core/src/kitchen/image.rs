//! Encoded dish photo.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SousError};

/// Prefix of every image handed across the core boundary.
pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// A generated image as a `data:image/png;base64,<payload>` URI.
///
/// The payload is stored exactly as the backend returned it. Deserializing
/// rejects strings that are not PNG data URIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EncodedImage(String);

impl EncodedImage {
    pub fn from_png_base64(payload: impl AsRef<str>) -> Self {
        Self(format!("{PNG_DATA_URI_PREFIX}{}", payload.as_ref()))
    }

    pub fn data_uri(&self) -> &str {
        &self.0
    }

    pub fn payload(&self) -> &str {
        self.0.strip_prefix(PNG_DATA_URI_PREFIX).unwrap_or(&self.0)
    }

    /// Decodes the payload into raw image bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        BASE64_STANDARD
            .decode(self.payload())
            .map_err(|err| SousError::Serialization {
                format: "base64".to_string(),
                message: err.to_string(),
            })
    }

    pub fn into_data_uri(self) -> String {
        self.0
    }
}

impl TryFrom<String> for EncodedImage {
    type Error = SousError;

    fn try_from(data_uri: String) -> Result<Self> {
        if !data_uri.starts_with(PNG_DATA_URI_PREFIX) {
            return Err(SousError::Serialization {
                format: "data URI".to_string(),
                message: format!("expected a `{PNG_DATA_URI_PREFIX}` URI"),
            });
        }
        Ok(Self(data_uri))
    }
}

impl From<EncodedImage> for String {
    fn from(image: EncodedImage) -> Self {
        image.0
    }
}

impl fmt::Display for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
