//! Storyblok content layer: configuration, the story model, and the client.
//!
//! The site's content lives in Storyblok and is pulled at build time through
//! the CDN API. Only two calls exist: one story by slug, or all stories
//! paginated. Payload shapes are not validated here, renderers access the
//! typed [`Block`](crate::components::Block) view or the raw JSON defensively.
use async_trait::async_trait;
use serde::Deserialize;
use std::env;

use crate::errors::StoryblokError;

mod fetch;
pub use fetch::{ContentFetcher, STORIES_PER_PAGE};

/// Which state of the content to fetch: work-in-progress or published.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StoryVersion {
    /// Unpublished drafts, used during development and previews.
    #[default]
    Draft,
    /// Only published content, used for production builds.
    Published,
}

impl StoryVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoryVersion::Draft => "draft",
            StoryVersion::Published => "published",
        }
    }
}

/// One Storyblok story, the CMS's unit of structured content.
///
/// `content` is kept as raw JSON: its shape depends entirely on the
/// content type authored in the CMS.
#[derive(Clone, Debug, Deserialize)]
pub struct Story {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub full_slug: String,
    #[serde(default)]
    pub content: serde_json::Value,
}

#[derive(Deserialize)]
struct SingleStoryResponse {
    story: Story,
}

#[derive(Deserialize)]
struct StoriesResponse {
    stories: Vec<Story>,
}

/// Storyblok access configuration, read lazily from the environment.
///
/// A missing token does not fail construction; it surfaces as
/// [`StoryblokError::MissingToken`] on the first actual fetch.
#[derive(Clone, Debug)]
pub struct StoryblokConfig {
    pub token: Option<String>,
    pub base_url: String,
}

impl StoryblokConfig {
    pub fn from_env() -> Self {
        let token = env::var("STORYBLOK_TOKEN").ok().filter(|t| !t.is_empty());
        let region = env::var("STORYBLOK_REGION").unwrap_or_default();

        Self {
            token,
            base_url: base_url_for_region(&region),
        }
    }
}

fn base_url_for_region(region: &str) -> String {
    match region {
        "us" => "https://api-us.storyblok.com",
        _ => "https://api.storyblok.com",
    }
    .to_string()
}

/// The two CDN calls the build consumes.
///
/// [`StoryblokClient`] is the real implementation; tests substitute their
/// own. Timeouts and cancellation are whatever the underlying client
/// enforces, failures pass through unchanged.
#[async_trait]
pub trait CmsClient: Send + Sync {
    async fn story(&self, slug: &str, version: StoryVersion) -> Result<Story, StoryblokError>;

    async fn stories_page(
        &self,
        version: StoryVersion,
        page: u32,
        per_page: u32,
        cv: i64,
    ) -> Result<Vec<Story>, StoryblokError>;
}

/// HTTP client for the Storyblok CDN API.
pub struct StoryblokClient {
    http: reqwest::Client,
    config: StoryblokConfig,
}

impl StoryblokClient {
    pub fn new(config: StoryblokConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn from_env() -> Self {
        Self::new(StoryblokConfig::from_env())
    }

    fn token(&self) -> Result<&str, StoryblokError> {
        self.config
            .token
            .as_deref()
            .ok_or(StoryblokError::MissingToken)
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, StoryblokError> {
        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|source| StoryblokError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoryblokError::Api {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| StoryblokError::Decode {
                url: url.to_string(),
                source,
            })
    }
}

#[async_trait]
impl CmsClient for StoryblokClient {
    async fn story(&self, slug: &str, version: StoryVersion) -> Result<Story, StoryblokError> {
        let token = self.token()?.to_string();
        let url = format!("{}/v2/cdn/stories/{}", self.config.base_url, slug);

        let response: SingleStoryResponse = self
            .get_json(
                &url,
                &[
                    ("version", version.as_str().to_string()),
                    ("token", token),
                ],
            )
            .await?;

        Ok(response.story)
    }

    async fn stories_page(
        &self,
        version: StoryVersion,
        page: u32,
        per_page: u32,
        cv: i64,
    ) -> Result<Vec<Story>, StoryblokError> {
        let token = self.token()?.to_string();
        let url = format!("{}/v2/cdn/stories", self.config.base_url);

        let response: StoriesResponse = self
            .get_json(
                &url,
                &[
                    ("version", version.as_str().to_string()),
                    ("token", token),
                    ("page", page.to_string()),
                    ("per_page", per_page.to_string()),
                    ("cv", cv.to_string()),
                ],
            )
            .await?;

        Ok(response.stories)
    }
}
