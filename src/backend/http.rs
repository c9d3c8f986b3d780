//! [`GstBackend`] over HTTP with `reqwest`
//!
//! Every trait method is a single request. There are no retries; non-2xx
//! responses become [`GstError::Backend`] carrying the server's `error` text.

use async_trait::async_trait;
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error, instrument};

use crate::config::BackendConfig;
use crate::period::Month;
use crate::traits::GstBackend;
use crate::types::*;

/// Per-client collections exposed by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Sales,
    B2cSales,
    Purchases,
    SundryDebtors,
}

impl Resource {
    pub fn path(&self) -> &'static str {
        match self {
            Resource::Sales => "sales",
            Resource::B2cSales => "b2c-sales",
            Resource::Purchases => "purchases",
            Resource::SundryDebtors => "sundry-debtors",
        }
    }
}

#[derive(Debug, Deserialize)]
struct Created {
    id: String,
}

#[derive(Debug, Deserialize)]
struct BulkCreated {
    count: usize,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP implementation of the backend trait
#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> GstResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Backend configured from `GST_API_URL` / `GST_API_TIMEOUT_SECS`
    pub fn from_env() -> GstResult<Self> {
        Self::new(&BackendConfig::from_env()?)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Path of a client's collection, or of one record in it
    pub fn resource_path(client_id: &str, resource: Resource, record_id: Option<&str>) -> String {
        match record_id {
            Some(id) => format!("/clients/{}/{}/{}", client_id, resource.path(), id),
            None => format!("/clients/{}/{}", client_id, resource.path()),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    #[instrument(skip(self, query), fields(base_url = %self.base_url))]
    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> GstResult<T> {
        debug!("GET {}", path);
        let response = self.http.get(self.url(path)).query(query).send().await?;
        Self::read(response, "GET", path).await
    }

    #[instrument(skip(self, body), fields(base_url = %self.base_url))]
    async fn send<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> GstResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        debug!("{} {}", method, path);
        let label = method.to_string();
        let mut request = self.http.request(method, self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        Self::read(response, &label, path).await
    }

    async fn read<T: DeserializeOwned>(response: Response, method: &str, path: &str) -> GstResult<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error)
            .unwrap_or_else(|_| {
                if text.trim().is_empty() {
                    status.canonical_reason().unwrap_or("request failed").to_string()
                } else {
                    text
                }
            });

        error!(status = status.as_u16(), "{} {} failed: {}", method, path, message);

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(GstError::NotFound(message));
        }
        Err(GstError::Backend {
            status: status.as_u16(),
            message,
        })
    }

    async fn create<B: Serialize + Sync>(&self, path: &str, body: &B) -> GstResult<String> {
        let created: Created = self.send(Method::POST, path, Some(body)).await?;
        Ok(created.id)
    }

    async fn replace<B: Serialize + Sync>(&self, path: &str, body: &B) -> GstResult<()> {
        let _: serde_json::Value = self.send(Method::PUT, path, Some(body)).await?;
        Ok(())
    }

    async fn remove(&self, path: &str) -> GstResult<()> {
        let _: serde_json::Value = self.send::<(), _>(Method::DELETE, path, None).await?;
        Ok(())
    }

    async fn bulk(&self, client_id: &str, resource: Resource, body: serde_json::Value) -> GstResult<usize> {
        let path = format!("{}/bulk", Self::resource_path(client_id, resource, None));
        let created: BulkCreated = self.send(Method::POST, &path, Some(&body)).await?;
        Ok(created.count)
    }
}

fn month_query(month: Option<&Month>) -> Vec<(&'static str, String)> {
    month
        .map(|m| vec![("month", m.to_string())])
        .unwrap_or_default()
}

#[async_trait]
impl GstBackend for HttpBackend {
    async fn health(&self) -> GstResult<()> {
        let _: serde_json::Value = self.get("/health", &[]).await?;
        Ok(())
    }

    async fn list_clients(&self) -> GstResult<Vec<Client>> {
        self.get("/clients", &[]).await
    }

    async fn create_client(&mut self, client: &NewClient) -> GstResult<Client> {
        self.send(Method::POST, "/clients", Some(client)).await
    }

    async fn update_client(&mut self, client_id: &str, client: &NewClient) -> GstResult<()> {
        self.replace(&format!("/clients/{}", client_id), client).await
    }

    async fn delete_client(&mut self, client_id: &str) -> GstResult<()> {
        self.remove(&format!("/clients/{}", client_id)).await
    }

    async fn list_sales(&self, client_id: &str, filter: &SaleFilter) -> GstResult<Vec<Sale>> {
        let mut query = month_query(filter.month.as_ref());
        if let Some(transaction_type) = filter.transaction_type {
            query.push(("transaction_type", transaction_type.as_str().to_string()));
        }
        self.get(&Self::resource_path(client_id, Resource::Sales, None), &query)
            .await
    }

    async fn add_sale(&mut self, client_id: &str, sale: &Sale) -> GstResult<String> {
        self.create(&Self::resource_path(client_id, Resource::Sales, None), sale)
            .await
    }

    async fn update_sale(&mut self, client_id: &str, sale_id: &str, sale: &Sale) -> GstResult<()> {
        self.replace(&Self::resource_path(client_id, Resource::Sales, Some(sale_id)), sale)
            .await
    }

    async fn delete_sale(&mut self, client_id: &str, sale_id: &str) -> GstResult<()> {
        self.remove(&Self::resource_path(client_id, Resource::Sales, Some(sale_id)))
            .await
    }

    async fn bulk_add_sales(&mut self, client_id: &str, sales: &[Sale]) -> GstResult<usize> {
        self.bulk(client_id, Resource::Sales, json!({ "sales": sales }))
            .await
    }

    async fn list_b2c_sales(&self, client_id: &str, month: Option<&Month>) -> GstResult<Vec<B2cSale>> {
        self.get(
            &Self::resource_path(client_id, Resource::B2cSales, None),
            &month_query(month),
        )
        .await
    }

    async fn add_b2c_sale(&mut self, client_id: &str, sale: &B2cSale) -> GstResult<String> {
        self.create(&Self::resource_path(client_id, Resource::B2cSales, None), sale)
            .await
    }

    async fn update_b2c_sale(
        &mut self,
        client_id: &str,
        sale_id: &str,
        sale: &B2cSale,
    ) -> GstResult<()> {
        self.replace(
            &Self::resource_path(client_id, Resource::B2cSales, Some(sale_id)),
            sale,
        )
        .await
    }

    async fn delete_b2c_sale(&mut self, client_id: &str, sale_id: &str) -> GstResult<()> {
        self.remove(&Self::resource_path(client_id, Resource::B2cSales, Some(sale_id)))
            .await
    }

    async fn bulk_add_b2c_sales(&mut self, client_id: &str, sales: &[B2cSale]) -> GstResult<usize> {
        self.bulk(client_id, Resource::B2cSales, json!({ "b2cSales": sales }))
            .await
    }

    async fn list_purchases(&self, client_id: &str, month: Option<&Month>) -> GstResult<Vec<Purchase>> {
        self.get(
            &Self::resource_path(client_id, Resource::Purchases, None),
            &month_query(month),
        )
        .await
    }

    async fn add_purchase(&mut self, client_id: &str, purchase: &Purchase) -> GstResult<String> {
        self.create(&Self::resource_path(client_id, Resource::Purchases, None), purchase)
            .await
    }

    async fn update_purchase(
        &mut self,
        client_id: &str,
        purchase_id: &str,
        purchase: &Purchase,
    ) -> GstResult<()> {
        self.replace(
            &Self::resource_path(client_id, Resource::Purchases, Some(purchase_id)),
            purchase,
        )
        .await
    }

    async fn delete_purchase(&mut self, client_id: &str, purchase_id: &str) -> GstResult<()> {
        self.remove(&Self::resource_path(client_id, Resource::Purchases, Some(purchase_id)))
            .await
    }

    async fn bulk_add_purchases(&mut self, client_id: &str, purchases: &[Purchase]) -> GstResult<usize> {
        self.bulk(client_id, Resource::Purchases, json!({ "purchases": purchases }))
            .await
    }

    async fn list_sundry_debtors(&self, client_id: &str) -> GstResult<Vec<SundryDebtor>> {
        self.get(&Self::resource_path(client_id, Resource::SundryDebtors, None), &[])
            .await
    }

    async fn add_sundry_debtor(&mut self, client_id: &str, debtor: &SundryDebtor) -> GstResult<String> {
        self.create(&Self::resource_path(client_id, Resource::SundryDebtors, None), debtor)
            .await
    }

    async fn update_sundry_debtor(
        &mut self,
        client_id: &str,
        debtor_id: &str,
        debtor: &SundryDebtor,
    ) -> GstResult<()> {
        self.replace(
            &Self::resource_path(client_id, Resource::SundryDebtors, Some(debtor_id)),
            debtor,
        )
        .await
    }

    async fn delete_sundry_debtor(&mut self, client_id: &str, debtor_id: &str) -> GstResult<()> {
        self.remove(&Self::resource_path(client_id, Resource::SundryDebtors, Some(debtor_id)))
            .await
    }
}
