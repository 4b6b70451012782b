//! Entry-function payload
//!
//! Defines the JSON structure wallets expect for signing an entry-function call.

use serde::{Deserialize, Serialize};

pub const ENTRY_FUNCTION_PAYLOAD: &str = "entry_function_payload";

/// Unsigned entry-function call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryFunctionPayload {
    #[serde(rename = "type")]
    pub payload_type: String,
    /// Fully qualified function, e.g. `0x...::AnimeSwapPoolV1::add_liquidity_entry`
    pub function: String,
    pub type_arguments: Vec<String>,
    /// Arguments in call order, encoded as strings
    pub arguments: Vec<String>,
}

impl EntryFunctionPayload {
    pub fn new(
        function: impl Into<String>,
        type_arguments: Vec<String>,
        arguments: Vec<String>,
    ) -> Self {
        Self {
            payload_type: ENTRY_FUNCTION_PAYLOAD.to_string(),
            function: function.into(),
            type_arguments,
            arguments,
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty JSON string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_serialization() {
        let payload = EntryFunctionPayload::new(
            "0xabc::AnimeSwapPoolV1::swap_exact_coins_for_coins_entry",
            vec!["0x1::aptos_coin::AptosCoin".to_string(), "0xabc::x::X".to_string()],
            vec!["100".to_string(), "95".to_string()],
        );

        let json = payload.to_json().unwrap();

        // Check wallet field naming
        assert!(json.contains(r#""type":"entry_function_payload""#));
        assert!(json.contains("typeArguments"));
        assert!(!json.contains("type_arguments"));

        let parsed: EntryFunctionPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, payload);
    }
}
