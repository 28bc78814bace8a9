use crate::deleter::ItemDeleter;
use crate::error::Error;
use crate::model::LOGIN_TYPE;
use reqwest::blocking::Client;
use serde_json::Value;
use tracing::debug;

/// Source of raw vault items, abstracted so the engine and tests never
/// depend on a live API.
pub trait ItemSource: Sync {
    fn get_items(&self, folder_id: Option<&str>, search: Option<&str>) -> Result<Vec<Value>, Error>;
}

/// Blocking client for the local vault-management API (`bw serve` style).
pub struct VaultClient {
    base_url: String,
    http: Client,
}

impl VaultClient {
    pub fn new(base_url: &str) -> Result<Self, Error> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::builder().build()?,
        })
    }

    fn get_json(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Value, Error> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("GET {}", url);
        let response = self.http.get(&url).query(params).send()?.error_for_status()?;
        Ok(response.json()?)
    }

    /// Retrieve the folder list, for scoping fetches by folder id.
    pub fn get_folders(&self) -> Result<Value, Error> {
        self.get_json("/list/object/folders", &[])
    }
}

/// Unwraps the API's `{"data": {"object": "list", "data": [...]}}` envelope
/// and keeps only login items; everything else never reaches the engine.
fn filter_items(body: Value) -> Vec<Value> {
    let Some(mut data) = body.get("data").cloned() else {
        return Vec::new();
    };

    if data.get("object").and_then(Value::as_str) == Some("list") {
        data = data.get("data").cloned().unwrap_or(Value::Array(Vec::new()));
    }

    let items = match data {
        Value::Array(items) => items,
        single => vec![single],
    };

    items
        .into_iter()
        .filter(|item| item.get("type").and_then(Value::as_i64) == Some(LOGIN_TYPE))
        .collect()
}

impl ItemSource for VaultClient {
    fn get_items(&self, folder_id: Option<&str>, search: Option<&str>) -> Result<Vec<Value>, Error> {
        let mut params: Vec<(&str, &str)> = Vec::new();
        if let Some(folder_id) = folder_id {
            params.push(("folderid", folder_id));
        }
        if let Some(search) = search {
            params.push(("search", search));
        }

        let body = self.get_json("/list/object/items", &params)?;
        Ok(filter_items(body))
    }
}

impl ItemDeleter for VaultClient {
    fn delete_item(&self, id: &str) -> Result<bool, Error> {
        let url = format!("{}/object/item/{}", self.base_url, id);
        debug!("DELETE {}", url);
        let response = self.http.delete(&url).send()?;
        let body: Value = response.json()?;
        Ok(body.get("success").and_then(Value::as_bool).unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_items_unwraps_list_envelope_and_drops_non_logins() {
        let body = json!({
            "success": true,
            "data": {
                "object": "list",
                "data": [
                    {"id": "a", "type": 1, "login": {"password": "pw"}},
                    {"id": "note", "type": 2},
                ],
            },
        });

        let items = filter_items(body);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["id"], json!("a"));
    }

    #[test]
    fn test_filter_items_without_data_envelope_is_empty() {
        assert!(filter_items(json!({"success": false})).is_empty());
        assert!(filter_items(json!("garbage")).is_empty());
    }

    #[test]
    fn test_filter_items_single_object_payload() {
        let body = json!({
            "data": {"id": "solo", "type": 1, "login": {"password": "pw"}},
        });

        let items = filter_items(body);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["id"], json!("solo"));
    }
}
