//! Wire types for the planned verification backend.
//!
//! The backend (tamper detection, ZK proof generation, blockchain anchoring,
//! decentralized storage) does not exist yet. These types pin down the shape
//! of the request context and the result record the UI will eventually
//! receive, so the [`crate::classify::Classifier`] seam can be rewired to a
//! real detector without touching the controller. Nothing here assumes a
//! particular transport.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Optional capture metadata supplied alongside an image at selection time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureContext {
    pub author: Option<String>,
    pub location: Option<String>,
    pub device: Option<String>,
}

/// Result record returned by a full verification pass.
///
/// `tamper_score` is in [0, 1]. The anchoring and storage fields are absent
/// until the corresponding backend services have confirmed the operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRecord {
    pub image_hash: String,
    pub tamper_score: f64,
    pub authentic: bool,
    pub anomalies: Vec<String>,
    pub blockchain_tx: Option<String>,
    pub storage_cid: Option<String>,
    pub storage_deal_id: Option<String>,
    pub verification_url: String,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    // The backend contract is camelCase on the wire; lock the field names so
    // a rename on our side doesn't silently break the future integration.
    #[test]
    fn verification_record_serializes_camel_case() {
        let record = VerificationRecord {
            image_hash: "9f2c".into(),
            tamper_score: 0.12,
            authentic: true,
            anomalies: vec![],
            blockchain_tx: None,
            storage_cid: Some("bafy123".into()),
            storage_deal_id: None,
            verification_url: "https://verify.example/9f2c".into(),
            timestamp: Utc::now(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("tamperScore").is_some());
        assert!(json.get("storageCid").is_some());
        assert!(json.get("verificationUrl").is_some());
    }
}
