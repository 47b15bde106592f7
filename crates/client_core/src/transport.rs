//! Remote item service: the async seam the engine talks through, and its HTTP implementation.

use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::ItemId,
    protocol::{ItemsPage, ItemsQuery, ReorderRequest, SelectedPayload},
};
use tracing::debug;

use crate::error::{Operation, SyncError};

#[async_trait]
pub trait ItemService: Send + Sync {
    async fn fetch_items(&self, page: u32, search: &str) -> Result<ItemsPage, SyncError>;
    async fn fetch_selected(&self) -> Result<Vec<ItemId>, SyncError>;
    async fn save_selected(&self, selected: &[ItemId]) -> Result<(), SyncError>;
    async fn reorder(&self, from_id: ItemId, to_id: ItemId) -> Result<(), SyncError>;
}

pub struct HttpItemService {
    http: Client,
    server_url: String,
}

impl HttpItemService {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), server_url)
    }

    pub fn with_client(http: Client, server_url: impl Into<String>) -> Self {
        Self {
            http,
            server_url: server_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }
}

#[async_trait]
impl ItemService for HttpItemService {
    async fn fetch_items(&self, page: u32, search: &str) -> Result<ItemsPage, SyncError> {
        let operation = Operation::FetchItems { page };
        debug!(page, search, "GET /items");
        let page: ItemsPage = self
            .http
            .get(format!("{}/items", self.server_url))
            .query(&ItemsQuery {
                page,
                search: search.to_string(),
            })
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(|err| SyncError::from((operation, err)))?
            .json()
            .await
            .map_err(|err| SyncError::from((operation, err)))?;
        Ok(page)
    }

    async fn fetch_selected(&self) -> Result<Vec<ItemId>, SyncError> {
        let operation = Operation::LoadSelected;
        let selected: Vec<ItemId> = self
            .http
            .get(format!("{}/selected", self.server_url))
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(|err| SyncError::from((operation, err)))?
            .json()
            .await
            .map_err(|err| SyncError::from((operation, err)))?;
        Ok(selected)
    }

    async fn save_selected(&self, selected: &[ItemId]) -> Result<(), SyncError> {
        self.http
            .post(format!("{}/selected", self.server_url))
            .json(&SelectedPayload {
                selected: selected.to_vec(),
            })
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(|err| SyncError::from((Operation::SaveSelected, err)))?;
        Ok(())
    }

    async fn reorder(&self, from_id: ItemId, to_id: ItemId) -> Result<(), SyncError> {
        self.http
            .post(format!("{}/reorder", self.server_url))
            .json(&ReorderRequest { from_id, to_id })
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(|err| SyncError::from((Operation::Reorder, err)))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
