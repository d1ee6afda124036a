//! Volunteer endpoints

use super::{ApiClient, ApiRequest, error::ClientError};
use chrono::{DateTime, Utc};
use ellp_core::{
    CreateVolunteerRequest, InactivateVolunteerRequest, UpdateVolunteerRequest, Validate,
    Volunteer, VolunteerFilter, Workshop,
};
use tracing::instrument;

#[derive(Debug, Clone, Copy)]
pub struct VolunteersApi<'a> {
    client: &'a ApiClient,
}

impl<'a> VolunteersApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Register a volunteer.
    ///
    /// Course and RA are required for academic volunteers and stripped for
    /// everyone else before the payload is sent.
    #[instrument(skip_all, fields(email = %data.email))]
    pub async fn create(&self, data: &CreateVolunteerRequest) -> Result<Volunteer, ClientError> {
        data.validate()?;
        let request = ApiRequest::post("/volunteers").json(&data.clone().normalized())?;
        self.client.execute(&request).await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Volunteer, ClientError> {
        self.client
            .execute(&ApiRequest::get(format!("/volunteers/{id}")))
            .await
    }

    pub async fn list(&self, filter: &VolunteerFilter) -> Result<Vec<Volunteer>, ClientError> {
        let request = ApiRequest::get("/volunteers").query(filter.to_query());
        self.client.execute(&request).await
    }

    #[instrument(skip(self, data))]
    pub async fn update(
        &self,
        id: &str,
        data: &UpdateVolunteerRequest,
    ) -> Result<Volunteer, ClientError> {
        data.validate()?;
        let request =
            ApiRequest::put(format!("/volunteers/{id}")).json(&data.clone().normalized())?;
        self.client.execute(&request).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), ClientError> {
        self.client
            .execute_empty(&ApiRequest::delete(format!("/volunteers/{id}")))
            .await
    }

    /// Mark a volunteer as having left the project on `exit_date`
    #[instrument(skip(self))]
    pub async fn inactivate(
        &self,
        id: &str,
        exit_date: DateTime<Utc>,
    ) -> Result<Volunteer, ClientError> {
        let data = InactivateVolunteerRequest { exit_date };
        data.validate()?;
        let request = ApiRequest::post(format!("/volunteers/{id}/inactivate")).json(&data)?;
        self.client.execute(&request).await
    }

    /// Link a workshop to a volunteer. Sent every time it is called.
    #[instrument(skip(self))]
    pub async fn add_workshop(&self, volunteer_id: &str, workshop_id: &str) -> Result<(), ClientError> {
        self.client
            .execute_empty(&ApiRequest::post(format!(
                "/volunteers/{volunteer_id}/workshops/{workshop_id}"
            )))
            .await
    }

    #[instrument(skip(self))]
    pub async fn remove_workshop(
        &self,
        volunteer_id: &str,
        workshop_id: &str,
    ) -> Result<(), ClientError> {
        self.client
            .execute_empty(&ApiRequest::delete(format!(
                "/volunteers/{volunteer_id}/workshops/{workshop_id}"
            )))
            .await
    }

    /// Workshops the volunteer took part in
    pub async fn workshops(&self, volunteer_id: &str) -> Result<Vec<Workshop>, ClientError> {
        self.client
            .execute(&ApiRequest::get(format!("/volunteers/{volunteer_id}/workshops")))
            .await
    }
}
