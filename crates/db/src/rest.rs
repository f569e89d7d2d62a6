//! PostgREST table client, the API hosted Postgres services (Supabase and
//! friends) expose under `/rest/v1`.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{header, Client, Method, RequestBuilder, Response};

use crate::error::StoreError;
use crate::model::{BookFields, BookId, BookRecord};
use crate::BookStore;

const RETURN_REPRESENTATION: &str = "return=representation";

/// Book store backed by a hosted PostgREST table.
#[derive(Debug, Clone)]
pub struct RestStore {
    http: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl RestStore {
    /// `base_url` is the project root; the table lives at
    /// `{base_url}/rest/v1/{table}`.
    pub fn new(
        base_url: &str,
        table: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build store HTTP client")?;

        Ok(Self {
            http,
            endpoint: format!("{}/rest/v1/{}", base_url.trim_end_matches('/'), table),
            api_key,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request(&self, method: Method) -> RequestBuilder {
        let builder = self.http.request(method, &self.endpoint);
        match &self.api_key {
            Some(key) => builder
                .header("apikey", key)
                .header(header::AUTHORIZATION, format!("Bearer {key}")),
            None => builder,
        }
    }

    async fn rows(response: Response) -> Result<Vec<BookRecord>, StoreError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Unavailable(format!(
                "store responded {status}: {body}"
            )));
        }
        Ok(response.json().await?)
    }
}

fn id_filter(id: &BookId) -> [(&'static str, String); 1] {
    [("id", format!("eq.{id}"))]
}

#[async_trait]
impl BookStore for RestStore {
    async fn list(&self) -> Result<Vec<BookRecord>, StoreError> {
        let response = self
            .request(Method::GET)
            .query(&[("select", "*")])
            .send()
            .await?;
        let books = Self::rows(response).await?;
        tracing::debug!(target: "shelf-db", count = books.len(), "books listed");
        Ok(books)
    }

    async fn create(&self, fields: &BookFields) -> Result<BookRecord, StoreError> {
        let response = self
            .request(Method::POST)
            .header("Prefer", RETURN_REPRESENTATION)
            .json(fields)
            .send()
            .await?;

        Self::rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Unavailable("store returned no inserted row".to_string()))
    }

    async fn update(&self, id: &BookId, fields: &BookFields) -> Result<(), StoreError> {
        let response = self
            .request(Method::PATCH)
            .query(&id_filter(id))
            .header("Prefer", RETURN_REPRESENTATION)
            .json(fields)
            .send()
            .await?;

        if Self::rows(response).await?.is_empty() {
            return Err(StoreError::NotFound(id.clone()));
        }
        Ok(())
    }

    async fn delete(&self, id: &BookId) -> Result<(), StoreError> {
        let response = self
            .request(Method::DELETE)
            .query(&id_filter(id))
            .header("Prefer", RETURN_REPRESENTATION)
            .send()
            .await?;

        if Self::rows(response).await?.is_empty() {
            return Err(StoreError::NotFound(id.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_table_without_double_slash() {
        let store = RestStore::new(
            "https://demo.supabase.co/",
            "books",
            None,
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(store.endpoint(), "https://demo.supabase.co/rest/v1/books");
    }
}
