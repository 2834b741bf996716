use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub ttl: u64,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "expireAt")]
    pub expire_at: DateTime<FixedOffset>,
}

/// One entry of the `/Customers/{userId}/Locations` array
#[derive(Debug, Deserialize)]
pub struct LocationRecord {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct DevicesResponse {
    pub devices: Vec<DeviceRecord>,
}

#[derive(Debug, Deserialize)]
pub struct DeviceRecord {
    pub mac: String,
    #[serde(rename = "connectionState")]
    pub connection_state: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_serialization() {
        let request = LoginRequest {
            email: "test@example.com",
            password: "password123",
            ttl: 3600,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "email": "test@example.com",
                "password": "password123",
                "ttl": 3600
            })
        );
    }

    #[test]
    fn test_login_response_parsing() {
        let json = r#"{"id":"tok1","userId":"u1","expireAt":"2024-01-01T01:00:00+00:00","ttl":3600}"#;

        let response: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.id, "tok1");
        assert_eq!(response.user_id, "u1");
        assert_eq!(response.expire_at.to_rfc3339(), "2024-01-01T01:00:00+00:00");
    }

    #[test]
    fn test_login_response_with_zulu_expiry() {
        let json = r#"{"id":"tok1","userId":"u1","expireAt":"2024-01-01T01:00:00.000Z"}"#;

        let response: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.expire_at.timestamp(), 1704070800);
    }

    #[test]
    fn test_login_response_missing_user_id() {
        let json = r#"{"id":"tok1","expireAt":"2024-01-01T01:00:00+00:00"}"#;
        assert!(serde_json::from_str::<LoginResponse>(json).is_err());
    }

    #[test]
    fn test_devices_response_ignores_extra_fields() {
        let json = r#"{"devices":[{"mac":"AA:BB","connectionState":"disconnected","name":"Laptop","ip":"10.0.0.2"}]}"#;

        let response: DevicesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.devices.len(), 1);
        assert_eq!(response.devices[0].mac, "AA:BB");
        assert_eq!(response.devices[0].connection_state, "disconnected");
        assert_eq!(response.devices[0].name, "Laptop");
    }
}
