//! Schedule CRUD backed by the fetch-through store.
//!
//! The schedule list is small and unpaginated; the cache policy degenerates
//! to "serve the store when populated, otherwise fetch everything".

use crate::cell::StoreCell;
use crate::client::ApiClient;
use crate::error::ClientError;
use crate::services::ListOutcome;
use crate::transport::{ApiRequest, HttpTransport};
use std::sync::Arc;
use studyhall_core::EntityStore;
use studyhall_types::{Schedule, ScheduleDraft, ScheduleId};

/// Schedules: list, create, update, delete.
pub struct ScheduleService<T: HttpTransport> {
    client: Arc<ApiClient<T>>,
    schedules: StoreCell<EntityStore<Schedule>>,
}

impl<T: HttpTransport> ScheduleService<T> {
    /// Create the service over a client and the schedule store cell.
    pub fn new(client: Arc<ApiClient<T>>, schedules: StoreCell<EntityStore<Schedule>>) -> Self {
        Self { client, schedules }
    }

    /// Read the full schedule list, from the store when populated.
    pub async fn fetch_all(&self, refresh: bool) -> Result<ListOutcome<Schedule>, ClientError> {
        if !refresh {
            let cached = self.schedules.read(|store| {
                if store.is_empty() {
                    None
                } else {
                    Some(store.items().to_vec())
                }
            });
            if let Some(items) = cached {
                return Ok(ListOutcome::from_store(items));
            }
        }

        let request = ApiRequest::get("schedules.list", "/schedule");
        let items: Vec<Schedule> = self.client.send_json(request).await?;
        self.schedules.mutate(|store| store.set_all(items.clone()));
        Ok(ListOutcome::from_network(items))
    }

    /// Fetch a single schedule entry by id. Always a network read.
    pub async fn get(&self, id: ScheduleId) -> Result<Schedule, ClientError> {
        let request = ApiRequest::get("schedules.get", format!("/schedule/{id}"));
        self.client.send_json(request).await
    }

    /// Create a schedule entry. The store is updated only after the server
    /// confirms and returns the assigned id.
    pub async fn create(&self, draft: &ScheduleDraft) -> Result<Schedule, ClientError> {
        let body = serde_json::to_value(draft).map_err(|e| ClientError::Decode(e.to_string()))?;
        let request = ApiRequest::post("schedules.create", "/schedule").with_json(body);
        let created: Schedule = self.client.send_json(request).await?;
        self.schedules.mutate(|store| store.add(created.clone()));
        Ok(created)
    }

    /// Update a schedule entry in place.
    ///
    /// If the id is not in the store after a successful update, the store is
    /// left untouched; the next list refresh will pick the entry up.
    pub async fn update(
        &self,
        id: ScheduleId,
        draft: &ScheduleDraft,
    ) -> Result<Schedule, ClientError> {
        let body = serde_json::to_value(draft).map_err(|e| ClientError::Decode(e.to_string()))?;
        let request = ApiRequest::put("schedules.update", format!("/schedule/{id}")).with_json(body);
        let updated: Schedule = self.client.send_json(request).await?;
        self.schedules.mutate(|store| {
            if let Some(existing) = store.get_mut(&id) {
                *existing = updated.clone();
            }
        });
        Ok(updated)
    }

    /// Delete a schedule entry. The store entry is removed only after the
    /// server confirms.
    pub async fn delete(&self, id: ScheduleId) -> Result<(), ClientError> {
        let request = ApiRequest::delete("schedules.delete", format!("/schedule/{id}"));
        self.client.send(request).await?;
        self.schedules.mutate(|store| store.remove(&id));
        Ok(())
    }
}
