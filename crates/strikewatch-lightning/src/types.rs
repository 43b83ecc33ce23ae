//! Lightning provider response types and the strike points built from them.
//!
//! The provider wraps every response in a `{"success": bool, "response": [...],
//! "error": {...}}` envelope; [`StrikesEnvelope`] captures that. Individual
//! strike records are kept as raw JSON until projection so that one malformed
//! record does not discard the rest of the response.

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};

/// Top-level envelope for a provider lightning query.
#[derive(Debug, Deserialize)]
pub struct StrikesEnvelope {
    pub success: bool,
    #[serde(default)]
    pub response: Vec<serde_json::Value>,
    #[serde(default)]
    pub error: Option<ProviderErrorBody>,
}

/// Error detail the provider attaches when `success` is false. Also present
/// with informational codes (e.g. `warn_no_data`) on successful empty results.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A single strike record as returned by the provider.
///
/// Field aliases cover the provider's long-form names so both spellings
/// project to the same [`StrikePoint`]. Only position and timestamp are
/// required; the descriptive fields become `None` when absent or malformed.
#[derive(Debug, Deserialize)]
pub struct RawStrike {
    pub lat: f64,
    #[serde(alias = "long")]
    pub lon: f64,
    #[serde(rename = "dateTime", alias = "dateTimeISO")]
    pub date_time: String,
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub kind: Option<StrikeType>,
    #[serde(alias = "peakamp", default, deserialize_with = "lenient")]
    pub amp: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub polarity: Option<Polarity>,
}

/// Deserializes an optional field, mapping null or an unexpected shape to `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

impl From<RawStrike> for StrikePoint {
    fn from(raw: RawStrike) -> Self {
        Self {
            lat: raw.lat,
            lon: raw.lon,
            date_time: raw.date_time,
            kind: raw.kind,
            amp: raw.amp,
            polarity: raw.polarity,
        }
    }
}

/// Strike classification. Codes outside `cg`/`ic` are carried through as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StrikeType {
    CloudToGround,
    IntraCloud,
    Other(String),
}

impl From<String> for StrikeType {
    fn from(code: String) -> Self {
        match code.to_ascii_lowercase().as_str() {
            "cg" => StrikeType::CloudToGround,
            "ic" => StrikeType::IntraCloud,
            _ => StrikeType::Other(code),
        }
    }
}

impl From<StrikeType> for String {
    fn from(kind: StrikeType) -> Self {
        match kind {
            StrikeType::CloudToGround => "cg".to_string(),
            StrikeType::IntraCloud => "ic".to_string(),
            StrikeType::Other(code) => code,
        }
    }
}

/// Strike polarity. Codes other than `+`/`-` are carried through as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Polarity {
    Positive,
    Negative,
    Other(String),
}

impl From<String> for Polarity {
    fn from(code: String) -> Self {
        match code.as_str() {
            "+" => Polarity::Positive,
            "-" => Polarity::Negative,
            _ => Polarity::Other(code),
        }
    }
}

impl From<Polarity> for String {
    fn from(polarity: Polarity) -> Self {
        match polarity {
            Polarity::Positive => "+".to_string(),
            Polarity::Negative => "-".to_string(),
            Polarity::Other(code) => code,
        }
    }
}

/// A strike as displayed on the map. Values are copied from the provider
/// record without conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrikePoint {
    pub lat: f64,
    pub lon: f64,
    /// Provider-native timestamp string.
    #[serde(rename = "dateTime")]
    pub date_time: String,
    #[serde(rename = "type")]
    pub kind: Option<StrikeType>,
    pub amp: Option<f64>,
    pub polarity: Option<Polarity>,
}
