//! Protocol Messages
//!
//! Wire format for the HTTP game endpoints. All bodies are JSON with
//! camelCase field names; egg identifiers travel as UUID strings and are
//! converted to byte uids at this boundary.

use serde::{Deserialize, Serialize};

use crate::game::egg::{Currency, EggType};

// =============================================================================
// REQUESTS
// =============================================================================

/// Body of `POST /game/init`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitRequest {
    /// Player identifier.
    #[serde(default)]
    pub user_id: String,
    /// Requested UI language (unused by the engine, echoed for logging).
    #[serde(default)]
    pub lang: Option<String>,
}

/// Body of `POST /game/action`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRequest {
    /// Player identifier.
    #[serde(default)]
    pub user_id: String,
    /// Session token.
    #[serde(default)]
    pub token: String,
    /// Action name; defaults to "crack" when absent.
    #[serde(default)]
    pub action: Option<String>,
    /// Client's view of the bet (server state is authoritative).
    #[serde(default)]
    pub bet_amount: Option<Currency>,
    /// Target egg, as a UUID string.
    #[serde(default)]
    pub egg_id: Option<String>,
    /// Egg type id for first-crack purchases.
    #[serde(default)]
    pub egg_type: Option<String>,
    /// Client's view of the try counter (server state is authoritative).
    #[serde(default)]
    pub try_index: Option<u8>,
}

/// Parsed wire action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireAction {
    Crack,
    Store,
    Cashout,
    Redeem,
}

impl WireAction {
    /// Parse an action name. Absent or empty means crack; "spin" is a
    /// legacy alias for crack.
    pub fn parse(name: Option<&str>) -> Option<WireAction> {
        match name.unwrap_or("crack") {
            "" | "crack" | "spin" => Some(WireAction::Crack),
            "store" => Some(WireAction::Store),
            "cashout" => Some(WireAction::Cashout),
            "redeem" => Some(WireAction::Redeem),
            _ => None,
        }
    }

    /// Canonical name, as journaled.
    pub fn as_str(self) -> &'static str {
        match self {
            WireAction::Crack => "crack",
            WireAction::Store => "store",
            WireAction::Cashout => "cashout",
            WireAction::Redeem => "redeem",
        }
    }
}

// =============================================================================
// RESPONSES
// =============================================================================

/// One shop catalog entry in the init response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EggCatalogEntry {
    pub id: String,
    pub label: String,
    pub bet: Currency,
}

impl From<EggType> for EggCatalogEntry {
    fn from(egg_type: EggType) -> Self {
        Self {
            id: egg_type.as_str().to_string(),
            label: egg_type.label().to_string(),
            bet: egg_type.base_bet(),
        }
    }
}

/// Static game configuration served by `/game/init`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitConfig {
    pub eggs: Vec<EggCatalogEntry>,
    pub currency: String,
    pub max_stored: usize,
}

/// Response body of `POST /game/init`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitResponse {
    pub api_status: String,
    pub balance: Currency,
    pub config: InitConfig,
    pub server_time: String,
}

/// Response body of `POST /game/action`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse {
    pub api_status: String,
    /// 0 = fail, 1 = success, 2 = redeemed; null for store.
    pub status: Option<u8>,
    /// "win" | "lose" | "stored" | "cashout" | "redeemed".
    pub result: String,
    pub win_amount: Currency,
    pub balance: Currency,
    /// Server-authoritative egg uid as a UUID string.
    pub egg_id: String,
    /// Level that was played, clamped to `[1, maxTries]`.
    pub level: u8,
    pub bonus: bool,
    pub server_time: String,
}

/// JSON error body for all failed requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub api_status: String,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            api_status: "error".to_string(),
            error: error.into(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_init_request_field_names() {
        let request: InitRequest =
            serde_json::from_value(json!({"userId": "player-7", "lang": "en"})).unwrap();
        assert_eq!(request.user_id, "player-7");
        assert_eq!(request.lang.as_deref(), Some("en"));
    }

    #[test]
    fn test_action_request_defaults() {
        // A bare crack request carries only credentials
        let request: ActionRequest =
            serde_json::from_value(json!({"userId": "p", "token": "t"})).unwrap();
        assert_eq!(request.action, None);
        assert_eq!(request.egg_id, None);
        assert_eq!(WireAction::parse(request.action.as_deref()), Some(WireAction::Crack));
    }

    #[test]
    fn test_action_request_camel_case() {
        let request: ActionRequest = serde_json::from_value(json!({
            "userId": "p",
            "token": "t",
            "action": "cashout",
            "betAmount": 400,
            "eggId": "f6b5f7c0-0000-0000-0000-000000000000",
            "eggType": "gold",
            "tryIndex": 2
        }))
        .unwrap();
        assert_eq!(request.bet_amount, Some(400));
        assert_eq!(request.try_index, Some(2));
        assert_eq!(request.egg_type.as_deref(), Some("gold"));
    }

    #[test]
    fn test_wire_action_parsing() {
        assert_eq!(WireAction::parse(None), Some(WireAction::Crack));
        assert_eq!(WireAction::parse(Some("")), Some(WireAction::Crack));
        assert_eq!(WireAction::parse(Some("spin")), Some(WireAction::Crack));
        assert_eq!(WireAction::parse(Some("store")), Some(WireAction::Store));
        assert_eq!(WireAction::parse(Some("cashout")), Some(WireAction::Cashout));
        assert_eq!(WireAction::parse(Some("redeem")), Some(WireAction::Redeem));
        assert_eq!(WireAction::parse(Some("jump")), None);
    }

    #[test]
    fn test_action_response_field_names() {
        let response = ActionResponse {
            api_status: "ok".to_string(),
            status: Some(1),
            result: "win".to_string(),
            win_amount: 200,
            balance: 1100,
            egg_id: "aa".to_string(),
            level: 2,
            bonus: false,
            server_time: "2024-01-01T00:00:00Z".to_string(),
        };
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["apiStatus"], "ok");
        assert_eq!(value["winAmount"], 200);
        assert_eq!(value["eggId"], "aa");
        assert_eq!(value["serverTime"], "2024-01-01T00:00:00Z");
        assert_eq!(value["status"], 1);
    }

    #[test]
    fn test_store_response_has_null_status() {
        let response = ActionResponse {
            api_status: "ok".to_string(),
            status: None,
            result: "stored".to_string(),
            win_amount: 0,
            balance: 1000,
            egg_id: "aa".to_string(),
            level: 1,
            bonus: false,
            server_time: String::new(),
        };
        let value = serde_json::to_value(&response).unwrap();
        assert!(value["status"].is_null());
    }

    #[test]
    fn test_catalog_entry_from_egg_type() {
        let entry = EggCatalogEntry::from(EggType::Premium);
        assert_eq!(entry.id, "premium");
        assert_eq!(entry.label, "Premium Egg");
        assert_eq!(entry.bet, 1000);
    }

    #[test]
    fn test_error_response_shape() {
        let value = serde_json::to_value(ErrorResponse::new("storage is full")).unwrap();
        assert_eq!(value["apiStatus"], "error");
        assert_eq!(value["error"], "storage is full");
    }
}
