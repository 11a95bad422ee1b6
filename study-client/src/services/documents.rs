//! Fetch-through cache policy for documents.

use crate::cell::StoreCell;
use crate::client::ApiClient;
use crate::error::ClientError;
use crate::services::ListOutcome;
use crate::transport::{ApiRequest, HttpTransport, MultipartPart};
use std::sync::Arc;
use studyhall_core::EntityStore;
use studyhall_types::{Document, DocumentId, PageRequest, SummaryResponse};

/// Documents: paginated fetch-through reads, network-first mutations.
pub struct DocumentService<T: HttpTransport> {
    client: Arc<ApiClient<T>>,
    documents: StoreCell<EntityStore<Document>>,
}

impl<T: HttpTransport> DocumentService<T> {
    /// Create the service over a client and the document store cell.
    pub fn new(client: Arc<ApiClient<T>>, documents: StoreCell<EntityStore<Document>>) -> Self {
        Self { client, documents }
    }

    /// Read a page of documents.
    ///
    /// A first-page read with a populated store is served from the store
    /// without any network call, unless `refresh` forces one. Later pages
    /// always fetch and are appended after the items already held; a
    /// refreshed or first-ever page 1 replaces the store wholesale.
    ///
    /// Overlapping refreshing reads are not serialized; the store keeps
    /// whichever response lands last.
    pub async fn fetch_list(
        &self,
        page: PageRequest,
        refresh: bool,
    ) -> Result<ListOutcome<Document>, ClientError> {
        if !refresh && page.is_first() {
            let cached = self.documents.read(|store| {
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

        let request =
            ApiRequest::get("documents.list", "/documents").with_query(page.query_pairs());
        let items: Vec<Document> = self.client.send_json(request).await?;

        self.documents.mutate(|store| {
            if page.is_first() {
                store.set_all(items.clone());
            } else {
                store.append_page(items.clone());
            }
        });
        Ok(ListOutcome::from_network(items))
    }

    /// Fetch a single document by id. Always a network read.
    pub async fn get(&self, id: DocumentId) -> Result<Document, ClientError> {
        let request = ApiRequest::get("documents.get", format!("/documents/{id}"));
        self.client.send_json(request).await
    }

    /// Search documents by title. Always a network read - search results
    /// are a different view of the collection and never short-circuit
    /// through the store.
    pub async fn search_by_title(&self, query: &str) -> Result<Vec<Document>, ClientError> {
        let request = ApiRequest::get("documents.search", "/documents/search")
            .with_query(vec![("q".to_string(), query.to_string())]);
        self.client.send_json(request).await
    }

    /// Upload a document. The new record is added to the store only after
    /// the server accepts it.
    pub async fn upload(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<Document, ClientError> {
        let request = ApiRequest::post("documents.upload", "/documents")
            .with_multipart(vec![MultipartPart::file("file", file_name, bytes)]);
        let document: Document = self.client.send_json(request).await?;
        self.documents.mutate(|store| store.add(document.clone()));
        Ok(document)
    }

    /// Delete a document. The local record is removed only after the
    /// server confirms; a failed delete leaves the store unchanged.
    pub async fn delete(&self, id: DocumentId) -> Result<(), ClientError> {
        let request = ApiRequest::delete("documents.delete", format!("/documents/{id}"));
        self.client.send(request).await?;
        self.documents.mutate(|store| store.remove(&id));
        Ok(())
    }

    /// Download the original file bytes.
    pub async fn download(&self, id: DocumentId) -> Result<Vec<u8>, ClientError> {
        let request = ApiRequest::get("documents.download", format!("/documents/{id}/download"));
        let response = self.client.send(request).await?;
        Ok(response.body)
    }

    /// Request a server-side summary of the document.
    pub async fn summarize(&self, id: DocumentId) -> Result<SummaryResponse, ClientError> {
        let request = ApiRequest::post("documents.summarize", format!("/documents/{id}/summary"));
        self.client.send_json(request).await
    }
}
