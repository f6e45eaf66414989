use crate::errors::BoardError;
use crate::models::{Catalog, ErrorResponse, MessageResponse};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use tracing::debug;

/// The remote activities API as the board sees it. Mutations resolve to the
/// server's success message.
#[async_trait]
pub trait ActivityApi: Send + Sync {
    async fn fetch_catalog(&self) -> Result<Catalog, BoardError>;
    async fn signup(&self, activity: &str, email: &str) -> Result<String, BoardError>;
    async fn unregister(&self, activity: &str, email: &str) -> Result<String, BoardError>;
}

#[derive(Clone)]
pub struct HttpActivityApi {
    http: Client,
    base_url: Url,
}

impl HttpActivityApi {
    pub fn new(base_url: &str) -> Result<Self, BoardError> {
        let base_url =
            Url::parse(base_url).map_err(|err| BoardError::Url(format!("{base_url}: {err}")))?;
        if base_url.cannot_be_a_base() {
            return Err(BoardError::Url(format!("{base_url}: not a base url")));
        }
        Ok(Self {
            http: Client::new(),
            base_url,
        })
    }

    pub fn catalog_url(&self) -> Result<Url, BoardError> {
        self.url_for(&["activities"])
    }

    /// `/activities/{activity}/{action}?email={email}` with both values
    /// percent-encoded.
    pub fn mutation_url(&self, activity: &str, action: &str, email: &str) -> Result<Url, BoardError> {
        let mut url = self.url_for(&["activities", activity, action])?;
        url.query_pairs_mut().append_pair("email", email);
        Ok(url)
    }

    fn url_for(&self, segments: &[&str]) -> Result<Url, BoardError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| BoardError::Url(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn mutate(&self, request: RequestBuilder) -> Result<String, BoardError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if status.is_success() {
            let parsed: MessageResponse = serde_json::from_slice(&body)?;
            return Ok(parsed.message);
        }

        // An unreadable error body counts as a parse failure, not a rejection.
        let detail = serde_json::from_slice::<ErrorResponse>(&body)?.detail;
        debug!(status = status.as_u16(), ?detail, "mutation rejected");
        Err(BoardError::Rejected {
            status: status.as_u16(),
            detail,
        })
    }
}

#[async_trait]
impl ActivityApi for HttpActivityApi {
    async fn fetch_catalog(&self) -> Result<Catalog, BoardError> {
        let response = self.http.get(self.catalog_url()?).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(BoardError::Rejected {
                status: status.as_u16(),
                detail: None,
            });
        }
        Ok(serde_json::from_slice(&body)?)
    }

    async fn signup(&self, activity: &str, email: &str) -> Result<String, BoardError> {
        let url = self.mutation_url(activity, "signup", email)?;
        self.mutate(self.http.post(url)).await
    }

    async fn unregister(&self, activity: &str, email: &str) -> Result<String, BoardError> {
        let url = self.mutation_url(activity, "unregister", email)?;
        self.mutate(self.http.delete(url)).await
    }
}
