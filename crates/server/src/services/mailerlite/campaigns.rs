//! Group, subscriber and campaign operations for the MailerLite API.

use tracing::instrument;

use super::{
    ApiResponse, Campaign, CampaignEmail, CreateCampaignRequest, CreateGroupRequest, Group,
    MailerLiteClient, MailerLiteError, Subscriber, SubscriberFields, UpsertSubscriberRequest,
};

impl MailerLiteClient {
    /// Create a subscriber group.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn create_group(&self, name: &str) -> Result<Group, MailerLiteError> {
        let request = CreateGroupRequest {
            name: name.to_string(),
        };
        let response: ApiResponse<Group> = self.post("/groups", &request).await?;
        tracing::debug!(group_id = %response.data.id, name = %response.data.name, "Group created");
        Ok(response.data)
    }

    /// Upsert a subscriber into a group with their recommendation fields.
    ///
    /// Existing subscribers keep their other group memberships; fields are
    /// overwritten with the new values.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, fields), fields(email = %email))]
    pub async fn upsert_subscriber(
        &self,
        group_id: &str,
        email: &str,
        fields: SubscriberFields,
    ) -> Result<Subscriber, MailerLiteError> {
        let request = UpsertSubscriberRequest {
            email: email.to_string(),
            fields,
            groups: vec![group_id.to_string()],
        };
        let response: ApiResponse<Subscriber> = self.post("/subscribers", &request).await?;
        tracing::debug!(
            subscriber_id = %response.data.id,
            email = %response.data.email,
            "Subscriber upserted"
        );
        Ok(response.data)
    }

    /// Create a draft regular email campaign scoped to a group.
    ///
    /// The campaign is created but not scheduled; the operator reviews and
    /// sends it from the MailerLite dashboard.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, html))]
    pub async fn create_campaign(
        &self,
        name: &str,
        subject: &str,
        group_id: &str,
        html: &str,
    ) -> Result<Campaign, MailerLiteError> {
        let request = CreateCampaignRequest {
            name: name.to_string(),
            campaign_type: "regular",
            groups: vec![group_id.to_string()],
            emails: vec![CampaignEmail {
                subject: subject.to_string(),
                content: html.to_string(),
                from: None,
                from_name: None,
            }],
        };
        let response: ApiResponse<Campaign> = self.post("/campaigns", &request).await?;
        tracing::debug!(
            campaign_id = %response.data.id,
            name = %response.data.name,
            "Campaign created as draft"
        );
        Ok(response.data)
    }
}
