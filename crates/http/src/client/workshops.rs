//! Workshop endpoints

use super::{ApiClient, ApiRequest, error::ClientError};
use ellp_core::{CreateWorkshopRequest, UpdateWorkshopRequest, Validate, Workshop, WorkshopFilter};
use tracing::instrument;

#[derive(Debug, Clone, Copy)]
pub struct WorkshopsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> WorkshopsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    #[instrument(skip_all, fields(name = %data.name))]
    pub async fn create(&self, data: &CreateWorkshopRequest) -> Result<Workshop, ClientError> {
        data.validate()?;
        let request = ApiRequest::post("/workshops").json(data)?;
        self.client.execute(&request).await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Workshop, ClientError> {
        self.client
            .execute(&ApiRequest::get(format!("/workshops/{id}")))
            .await
    }

    /// List workshops, optionally narrowed by name, month and year
    pub async fn list(&self, filter: &WorkshopFilter) -> Result<Vec<Workshop>, ClientError> {
        let request = ApiRequest::get("/workshops").query(filter.to_query());
        self.client.execute(&request).await
    }

    #[instrument(skip(self, data))]
    pub async fn update(
        &self,
        id: &str,
        data: &UpdateWorkshopRequest,
    ) -> Result<Workshop, ClientError> {
        data.validate()?;
        let request = ApiRequest::put(format!("/workshops/{id}")).json(data)?;
        self.client.execute(&request).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), ClientError> {
        self.client
            .execute_empty(&ApiRequest::delete(format!("/workshops/{id}")))
            .await
    }

    #[instrument(skip(self))]
    pub async fn add_volunteer(&self, workshop_id: &str, volunteer_id: &str) -> Result<(), ClientError> {
        self.client
            .execute_empty(&ApiRequest::post(format!(
                "/workshops/{workshop_id}/volunteers/{volunteer_id}"
            )))
            .await
    }

    #[instrument(skip(self))]
    pub async fn remove_volunteer(
        &self,
        workshop_id: &str,
        volunteer_id: &str,
    ) -> Result<(), ClientError> {
        self.client
            .execute_empty(&ApiRequest::delete(format!(
                "/workshops/{workshop_id}/volunteers/{volunteer_id}"
            )))
            .await
    }
}
