//! Client registration and lookup

use tracing::{info, instrument};

use crate::traits::*;
use crate::types::*;

/// Client manager for registering and maintaining GST clients
pub struct ClientManager<B: GstBackend> {
    pub(crate) backend: B,
    validator: Box<dyn ClientValidator>,
}

impl<B: GstBackend> ClientManager<B> {
    /// Create a new client manager
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            validator: Box::new(DefaultClientValidator),
        }
    }

    /// Create a new client manager with custom validator
    pub fn with_validator(backend: B, validator: Box<dyn ClientValidator>) -> Self {
        Self { backend, validator }
    }

    /// Register a new client
    #[instrument(skip(self, client), fields(gst_no = %client.gst_no))]
    pub async fn create_client(&mut self, client: NewClient) -> GstResult<Client> {
        self.validator.validate_client(&client)?;

        // One registration per GSTIN
        let existing = self.backend.list_clients().await?;
        if existing.iter().any(|c| c.gst_no == client.gst_no) {
            return Err(GstError::Validation(format!(
                "Client with GST number '{}' already exists",
                client.gst_no
            )));
        }

        let created = self.backend.create_client(&client).await?;
        info!(client_id = %created.id, "Created client");
        Ok(created)
    }

    /// Get a client by ID
    pub async fn get_client(&self, client_id: &str) -> GstResult<Option<Client>> {
        let clients = self.backend.list_clients().await?;
        Ok(clients.into_iter().find(|c| c.id == client_id))
    }

    /// Get a client by ID, returning an error if not found
    pub async fn get_client_required(&self, client_id: &str) -> GstResult<Client> {
        self.get_client(client_id)
            .await?
            .ok_or_else(|| GstError::NotFound(format!("Client '{}'", client_id)))
    }

    /// List all clients, newest first
    pub async fn list_clients(&self) -> GstResult<Vec<Client>> {
        self.backend.list_clients().await
    }

    /// Find a client by GST number
    pub async fn find_by_gstin(&self, gst_no: &str) -> GstResult<Option<Client>> {
        let clients = self.backend.list_clients().await?;
        Ok(clients.into_iter().find(|c| c.gst_no == gst_no))
    }

    /// Replace a client's details
    pub async fn update_client(&mut self, client_id: &str, client: &NewClient) -> GstResult<()> {
        self.validator.validate_client(client)?;
        self.backend.update_client(client_id, client).await
    }

    /// Delete a client and all of its records
    pub async fn delete_client(&mut self, client_id: &str) -> GstResult<()> {
        self.backend.delete_client(client_id).await?;
        info!(client_id, "Deleted client");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::MemoryBackend;

    fn new_client(gst_no: &str) -> NewClient {
        NewClient {
            client_name: "Ravi Kumar".to_string(),
            business_name: "Kumar Textiles".to_string(),
            financial_year: "01/04/2024 - 31/03/2025".to_string(),
            gst_no: gst_no.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_and_find_client() {
        let mut manager = ClientManager::new(MemoryBackend::new());
        let client = manager.create_client(new_client("29ABCDE1234F1Z5")).await.unwrap();

        let found = manager.get_client_required(&client.id).await.unwrap();
        assert_eq!(found.gst_no, "29ABCDE1234F1Z5");
        assert!(manager
            .find_by_gstin("29ABCDE1234F1Z5")
            .await
            .unwrap()
            .is_some());
        assert!(matches!(
            manager.get_client_required("CLI_missing").await,
            Err(GstError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_duplicate_gstin_is_rejected() {
        let mut manager = ClientManager::new(MemoryBackend::new());
        manager.create_client(new_client("29ABCDE1234F1Z5")).await.unwrap();

        let result = manager.create_client(new_client("29ABCDE1234F1Z5")).await;
        assert!(matches!(result, Err(GstError::Validation(_))));
    }

    #[tokio::test]
    async fn test_invalid_gstin_never_reaches_backend() {
        let backend = MemoryBackend::new();
        let mut manager = ClientManager::new(backend.clone());

        assert!(manager.create_client(new_client("29ABCDE1234F1Z")).await.is_err());
        assert!(backend.list_clients().await.unwrap().is_empty());
    }
}
