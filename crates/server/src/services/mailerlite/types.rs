//! MailerLite API data types.
//!
//! MailerLite wraps every resource in a `{"data": ...}` envelope and uses
//! string IDs throughout.

use serde::{Deserialize, Serialize};

/// Generic single-resource response wrapper.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

/// A subscriber group.
#[derive(Debug, Clone, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
}

/// A subscriber.
#[derive(Debug, Clone, Deserialize)]
pub struct Subscriber {
    pub id: String,
    pub email: String,
}

/// An email campaign.
#[derive(Debug, Clone, Deserialize)]
pub struct Campaign {
    pub id: String,
    pub name: String,
}

/// Request body for creating a group.
#[derive(Debug, Serialize)]
pub struct CreateGroupRequest {
    pub name: String,
}

/// Request body for upserting a subscriber.
///
/// POST `/subscribers` is an upsert in the MailerLite API: an existing
/// subscriber has its fields and group membership updated in place.
#[derive(Debug, Serialize)]
pub struct UpsertSubscriberRequest {
    pub email: String,
    pub fields: SubscriberFields,
    pub groups: Vec<String>,
}

/// Custom fields attached to a subscriber.
///
/// `name` and `last_name` are MailerLite built-ins; the discount fields are
/// account-level custom fields referenced by the campaign template.
#[derive(Debug, Default, Serialize)]
pub struct SubscriberFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
}

/// Request body for creating a regular email campaign.
#[derive(Debug, Serialize)]
pub struct CreateCampaignRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub campaign_type: &'static str,
    pub groups: Vec<String>,
    pub emails: Vec<CampaignEmail>,
}

/// A single email within a campaign.
///
/// Sender fields are optional; when omitted the account's default verified
/// sender applies.
#[derive(Debug, Serialize)]
pub struct CampaignEmail {
    pub subject: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_group_envelope() {
        let json = r#"{"data": {"id": "74125", "name": "Winback - Lapsed 90d"}}"#;
        let response: ApiResponse<Group> = serde_json::from_str(json).expect("deserialize");
        assert_eq!(response.data.id, "74125");
        assert_eq!(response.data.name, "Winback - Lapsed 90d");
    }

    #[test]
    fn test_subscriber_fields_skip_unset() {
        let fields = SubscriberFields {
            discount_code: Some("WINBACK20".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&fields).expect("serialize");
        assert_eq!(json["discount_code"], "WINBACK20");
        assert!(json.get("name").is_none());
        assert!(json.get("rationale").is_none());
    }

    #[test]
    fn test_campaign_request_type_field() {
        let request = CreateCampaignRequest {
            name: "Spring winback".to_string(),
            campaign_type: "regular",
            groups: vec!["g1".to_string()],
            emails: vec![CampaignEmail {
                subject: "We miss you".to_string(),
                content: "<p>Hi</p>".to_string(),
                from: None,
                from_name: None,
            }],
        };
        let json = serde_json::to_value(&request).expect("serialize");
        assert_eq!(json["type"], "regular");
        assert!(json["emails"][0].get("from").is_none());
    }
}
