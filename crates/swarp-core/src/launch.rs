use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};

use crate::place::PlaceId;

/// Entry point of the Roblox client's URL scheme handler.
pub const LAUNCH_URL_BASE: &str = "roblox://experiences/start";

/// Tag carried in every launch payload.
pub const LAUNCH_METHOD: &str = "Joined via SWarp";

/// Instance id sentinel meaning "no particular server".
pub const ANY_SERVER_SENTINEL: &str = "N/A";

/// Characters escaped by JavaScript's `encodeURIComponent`: everything except
/// ASCII alphanumerics and `- _ . ! ~ * ' ( )`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// JSON object embedded as `launchData` in the scheme URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchData {
    pub method: String,
}

/// Everything needed to build one scheme URL. Consumed by [`LaunchRequest::into_url`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub place_id: PlaceId,
    pub instance_id: Option<String>,
    pub launch_method: &'static str,
}

/// Trim an instance id and drop it when blank or the "N/A" sentinel
/// (case-insensitive).
pub fn normalize_instance_id(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ANY_SERVER_SENTINEL) {
        None
    } else {
        Some(trimmed)
    }
}

/// Percent-encode a query component the way `encodeURIComponent` does.
pub fn encode_component(raw: &str) -> String {
    utf8_percent_encode(raw, URI_COMPONENT).to_string()
}

impl LaunchRequest {
    pub fn new(place_id: PlaceId, raw_instance_id: &str) -> Self {
        Self {
            place_id,
            instance_id: normalize_instance_id(raw_instance_id).map(str::to_string),
            launch_method: LAUNCH_METHOD,
        }
    }

    /// Serialized (not yet percent-encoded) launch payload.
    pub fn launch_data_json(&self) -> String {
        serde_json::json!({ "method": self.launch_method }).to_string()
    }

    /// Build the `roblox://` URL. The instance id is inserted verbatim.
    pub fn into_url(self) -> String {
        let launch_data = encode_component(&self.launch_data_json());
        match self.instance_id {
            Some(instance) => format!(
                "{LAUNCH_URL_BASE}?placeId={}&gameInstanceId={instance}&launchData={launch_data}",
                self.place_id
            ),
            None => format!(
                "{LAUNCH_URL_BASE}?placeId={}&launchData={launch_data}",
                self.place_id
            ),
        }
    }
}

/// Pull the `launchData` parameter back out of a scheme URL and decode it.
pub fn decode_launch_data(url: &str) -> Option<LaunchData> {
    let query = url.split_once('?')?.1;
    let encoded = query
        .split('&')
        .find_map(|pair| pair.strip_prefix("launchData="))?;
    let json = percent_encoding::percent_decode_str(encoded)
        .decode_utf8()
        .ok()?;
    serde_json::from_str(&json).ok()
}
