//! Rick and Morty API client

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::filter::FilterState;
use crate::model::{
    record_id, Character, Collection, Entity, Episode, Location, Lookup, Page, PageInfo,
};

pub const API_BASE: &str = "https://rickandmortyapi.com/api";

/// Transport-level failure. A 404 is never reported here; it becomes an empty
/// page.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("HTTP error! status: {0}")]
    Status(u16),
    #[error("request failed: {0}")]
    Network(String),
    #[error("response parse error: {0}")]
    Parse(String),
}

/// Raw HTTP reply handed back by a [`Transport`].
#[derive(Clone, Debug)]
pub struct HttpReply {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Issues GET requests. Swapped out in tests.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpReply, CatalogError>;
}

pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<HttpReply, CatalogError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| CatalogError::Network(err.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|err| CatalogError::Network(err.to_string()))?
            .to_vec();
        Ok(HttpReply { status, body })
    }
}

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    info: PageInfo,
    results: Vec<T>,
}

pub struct CatalogClient<T = ReqwestTransport> {
    base_url: String,
    transport: T,
}

pub type SharedClient = Arc<CatalogClient>;

impl CatalogClient<ReqwestTransport> {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_transport(base_url, ReqwestTransport::new())
    }
}

impl<T: Transport> CatalogClient<T> {
    pub fn with_transport(base_url: impl Into<String>, transport: T) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            transport,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn list_characters(
        &self,
        page: u32,
        filters: &FilterState,
    ) -> Result<(PageInfo, Vec<Character>), CatalogError> {
        self.fetch_list(Collection::Characters, page, filters).await
    }

    pub async fn list_locations(
        &self,
        page: u32,
        filters: &FilterState,
    ) -> Result<(PageInfo, Vec<Location>), CatalogError> {
        self.fetch_list(Collection::Locations, page, filters).await
    }

    pub async fn list_episodes(
        &self,
        page: u32,
        filters: &FilterState,
    ) -> Result<(PageInfo, Vec<Episode>), CatalogError> {
        self.fetch_list(Collection::Episodes, page, filters).await
    }

    pub async fn get_character(&self, id: u32) -> Result<Lookup<Character>, CatalogError> {
        self.fetch_one(Collection::Characters, id).await
    }

    pub async fn get_location(&self, id: u32) -> Result<Lookup<Location>, CatalogError> {
        self.fetch_one(Collection::Locations, id).await
    }

    pub async fn get_episode(&self, id: u32) -> Result<Lookup<Episode>, CatalogError> {
        self.fetch_one(Collection::Episodes, id).await
    }

    pub async fn get_multiple_characters(
        &self,
        ids: &[u32],
    ) -> Result<Vec<Character>, CatalogError> {
        self.fetch_many(Collection::Characters, ids).await
    }

    pub async fn get_multiple_episodes(&self, ids: &[u32]) -> Result<Vec<Episode>, CatalogError> {
        self.fetch_many(Collection::Episodes, ids).await
    }

    /// One list page of any collection.
    pub async fn list(
        &self,
        collection: Collection,
        page: u32,
        filters: &FilterState,
    ) -> Result<Page, CatalogError> {
        let (info, results) = match collection {
            Collection::Characters => {
                let (info, items) = self.list_characters(page, filters).await?;
                (info, items.into_iter().map(Entity::Character).collect())
            }
            Collection::Locations => {
                let (info, items) = self.list_locations(page, filters).await?;
                (info, items.into_iter().map(Entity::Location).collect())
            }
            Collection::Episodes => {
                let (info, items) = self.list_episodes(page, filters).await?;
                (info, items.into_iter().map(Entity::Episode).collect())
            }
        };
        Ok(Page { info, results })
    }

    /// One record of any collection.
    pub async fn get(&self, collection: Collection, id: u32) -> Result<Lookup<Entity>, CatalogError> {
        Ok(match collection {
            Collection::Characters => self.get_character(id).await?.map(Entity::Character),
            Collection::Locations => self.get_location(id).await?.map(Entity::Location),
            Collection::Episodes => self.get_episode(id).await?.map(Entity::Episode),
        })
    }

    /// Several records of any collection in one request.
    pub async fn get_many(
        &self,
        collection: Collection,
        ids: &[u32],
    ) -> Result<Vec<Entity>, CatalogError> {
        Ok(match collection {
            Collection::Characters => self
                .get_multiple_characters(ids)
                .await?
                .into_iter()
                .map(Entity::Character)
                .collect(),
            Collection::Locations => self
                .fetch_many::<Location>(Collection::Locations, ids)
                .await?
                .into_iter()
                .map(Entity::Location)
                .collect(),
            Collection::Episodes => self
                .get_multiple_episodes(ids)
                .await?
                .into_iter()
                .map(Entity::Episode)
                .collect(),
        })
    }

    pub fn list_url(&self, collection: Collection, page: u32, filters: &FilterState) -> String {
        let mut url = format!("{}/{}?page={page}", self.base_url, collection.endpoint());
        for (key, value) in filters.query_pairs() {
            url.push('&');
            url.push_str(&key);
            url.push('=');
            url.push_str(&urlencoding::encode(&value));
        }
        url
    }

    pub fn record_url(&self, collection: Collection, ids: &[u32]) -> String {
        let ids: Vec<String> = ids.iter().map(u32::to_string).collect();
        format!("{}/{}/{}", self.base_url, collection.endpoint(), ids.join(","))
    }

    async fn fetch_list<R: DeserializeOwned>(
        &self,
        collection: Collection,
        page: u32,
        filters: &FilterState,
    ) -> Result<(PageInfo, Vec<R>), CatalogError> {
        let url = self.list_url(collection, page, filters);
        let value = self.fetch_value(&url).await?;
        let response: ListResponse<R> = decode(value)?;
        tracing::debug!(
            collection = collection.plural(),
            page,
            pages = response.info.pages,
            count = response.info.count,
            "page {} of {}, total {} {}",
            page,
            response.info.pages,
            response.info.count,
            collection.plural()
        );
        Ok((response.info, response.results))
    }

    async fn fetch_one<R: DeserializeOwned>(
        &self,
        collection: Collection,
        id: u32,
    ) -> Result<Lookup<R>, CatalogError> {
        let url = self.record_url(collection, &[id]);
        let value = self.fetch_value(&url).await?;
        if record_id(&value).is_none() {
            tracing::debug!(collection = collection.endpoint(), id, "record not found");
            return Ok(Lookup::Missing);
        }
        decode(value).map(Lookup::Found)
    }

    async fn fetch_many<R: DeserializeOwned>(
        &self,
        collection: Collection,
        ids: &[u32],
    ) -> Result<Vec<R>, CatalogError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let url = self.record_url(collection, ids);
        let value = self.fetch_value(&url).await?;
        match value {
            Value::Array(items) => items.into_iter().map(decode).collect(),
            other if record_id(&other).is_some() => Ok(vec![decode(other)?]),
            _ => Ok(Vec::new()),
        }
    }

    /// GET `url` as JSON. A 404 answers with the empty-page body.
    async fn fetch_value(&self, url: &str) -> Result<Value, CatalogError> {
        let reply = self.transport.get(url).await.inspect_err(|err| {
            tracing::warn!(%url, error = %err, "catalog request failed");
        })?;
        if reply.status == 404 {
            return Ok(empty_page_body());
        }
        if !(200..300).contains(&reply.status) {
            tracing::warn!(%url, status = reply.status, "catalog request rejected");
            return Err(CatalogError::Status(reply.status));
        }
        serde_json::from_slice(&reply.body).map_err(|err| CatalogError::Parse(err.to_string()))
    }
}

/// Body substituted for a 404 reply.
pub fn empty_page_body() -> Value {
    serde_json::json!({
        "info": { "count": 0, "pages": 0, "next": null, "prev": null },
        "results": []
    })
}

fn decode<R: DeserializeOwned>(value: Value) -> Result<R, CatalogError> {
    serde_json::from_value(value).map_err(|err| CatalogError::Parse(err.to_string()))
}
