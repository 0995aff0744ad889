//! Timed, reported content fetches on top of a [`CmsClient`].
use chrono::Utc;
use log::info;

use crate::analytics::BuildReporter;
use crate::errors::StoryblokError;
use crate::monitor::PerformanceMonitor;
use crate::storyblok::{CmsClient, Story, StoryVersion};

/// Page size for the paginated fetch-all, Storyblok's maximum.
pub const STORIES_PER_PAGE: u32 = 100;

/// Fetches content for one build run, timing every call and routing
/// outcomes through the run's [`BuildReporter`].
///
/// Failures are recorded and then returned unchanged; the caller decides
/// whether to abort the page or substitute fallback content. Nothing here
/// retries.
pub struct ContentFetcher<'a> {
    client: &'a dyn CmsClient,
    reporter: &'a BuildReporter,
    monitor: &'a PerformanceMonitor,
}

impl<'a> ContentFetcher<'a> {
    pub fn new(
        client: &'a dyn CmsClient,
        reporter: &'a BuildReporter,
        monitor: &'a PerformanceMonitor,
    ) -> Self {
        Self {
            client,
            reporter,
            monitor,
        }
    }

    /// Fetches a single story by slug.
    pub async fn story(
        &self,
        slug: &str,
        version: StoryVersion,
    ) -> Result<Story, StoryblokError> {
        let label = format!("fetch:{}", slug);
        info!(target: "storyblok", "Fetching story: {} ({})", slug, version.as_str());

        self.monitor.start(&label);
        match self.client.story(slug, version).await {
            Ok(story) => {
                let duration = self.monitor.end(&label).unwrap_or_default();
                self.reporter.metric(&label, duration, None);
                Ok(story)
            }
            Err(error) => {
                self.monitor.end(&label);
                self.reporter.error(
                    &format!("Failed to fetch story: {}", slug),
                    &error,
                    &[("slug", slug), ("version", version.as_str())],
                );
                Err(error)
            }
        }
    }

    /// Fetches every story, paginating until a short page is returned.
    ///
    /// Each run passes a fresh `cv` value so Storyblok's CDN cache never
    /// serves a stale story list during development.
    pub async fn all_stories(&self, version: StoryVersion) -> Result<Vec<Story>, StoryblokError> {
        let label = "fetch:all-stories";
        info!(target: "storyblok", "Fetching all stories ({})", version.as_str());

        let cv = Utc::now().timestamp_millis();
        let mut stories = Vec::new();
        let mut page = 1;

        self.monitor.start(label);
        loop {
            match self
                .client
                .stories_page(version, page, STORIES_PER_PAGE, cv)
                .await
            {
                Ok(batch) => {
                    let batch_len = batch.len();
                    stories.extend(batch);
                    if batch_len < STORIES_PER_PAGE as usize {
                        break;
                    }
                    page += 1;
                }
                Err(error) => {
                    self.monitor.end(label);
                    let page_number = page.to_string();
                    self.reporter.error(
                        "Failed to fetch stories",
                        &error,
                        &[("version", version.as_str()), ("page", &page_number)],
                    );
                    return Err(error);
                }
            }
        }

        let duration = self.monitor.end(label).unwrap_or_default();
        self.reporter.metric(label, duration, Some(stories.len()));
        Ok(stories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    fn story(slug: &str) -> Story {
        serde_json::from_value(json!({
            "name": slug,
            "uuid": format!("uuid-{}", slug),
            "slug": slug,
            "full_slug": slug,
            "content": { "component": "Page", "body": [] }
        }))
        .unwrap()
    }

    /// A canned client: one page of stories per inner Vec, or a failure.
    struct MockClient {
        pages: Vec<Vec<Story>>,
        fail: bool,
    }

    #[async_trait]
    impl CmsClient for MockClient {
        async fn story(&self, slug: &str, _version: StoryVersion) -> Result<Story, StoryblokError> {
            if self.fail {
                return Err(StoryblokError::Api {
                    url: format!("https://api.storyblok.com/v2/cdn/stories/{}", slug),
                    status: 500,
                });
            }
            Ok(story(slug))
        }

        async fn stories_page(
            &self,
            _version: StoryVersion,
            page: u32,
            _per_page: u32,
            _cv: i64,
        ) -> Result<Vec<Story>, StoryblokError> {
            if self.fail {
                return Err(StoryblokError::Api {
                    url: "https://api.storyblok.com/v2/cdn/stories".to_string(),
                    status: 500,
                });
            }
            Ok(self
                .pages
                .get((page - 1) as usize)
                .cloned()
                .unwrap_or_default())
        }
    }

    #[tokio::test]
    async fn successful_fetch_records_a_metric() {
        let client = MockClient { pages: vec![], fail: false };
        let reporter = BuildReporter::new();
        let monitor = PerformanceMonitor::new();
        let fetcher = ContentFetcher::new(&client, &reporter, &monitor);

        let home = fetcher.story("home", StoryVersion::Draft).await.unwrap();
        assert_eq!(home.slug, "home");

        let metrics = reporter.analytics.metrics();
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].name, "fetch:home");
        assert!(!reporter.errors.has_errors());
    }

    #[tokio::test]
    async fn failed_fetch_is_recorded_and_reraised() {
        let client = MockClient { pages: vec![], fail: true };
        let reporter = BuildReporter::new();
        let monitor = PerformanceMonitor::new();
        let fetcher = ContentFetcher::new(&client, &reporter, &monitor);

        let result = fetcher.story("home", StoryVersion::Published).await;
        assert!(matches!(result, Err(StoryblokError::Api { status: 500, .. })));

        assert!(reporter.errors.has_errors());
        let record = &reporter.errors.records()[0];
        assert!(record.message.contains("home"));
        assert!(
            record
                .context
                .contains(&("version".to_string(), "published".to_string()))
        );

        // The failed fetch does not show up as a completed operation.
        assert!(reporter.analytics.metrics().is_empty());
    }

    #[tokio::test]
    async fn fetch_all_paginates_until_a_short_page() {
        let first_page: Vec<Story> = (0..STORIES_PER_PAGE)
            .map(|i| story(&format!("page-one-{}", i)))
            .collect();
        let second_page = vec![story("last-one"), story("last-two")];

        let client = MockClient {
            pages: vec![first_page, second_page],
            fail: false,
        };
        let reporter = BuildReporter::new();
        let monitor = PerformanceMonitor::new();
        let fetcher = ContentFetcher::new(&client, &reporter, &monitor);

        let stories = fetcher.all_stories(StoryVersion::Draft).await.unwrap();
        assert_eq!(stories.len(), STORIES_PER_PAGE as usize + 2);

        let metrics = reporter.analytics.metrics();
        assert_eq!(metrics[0].name, "fetch:all-stories");
        assert_eq!(metrics[0].count, Some(STORIES_PER_PAGE as usize + 2));
    }

    #[tokio::test]
    async fn failed_fetch_all_reports_the_page_it_died_on() {
        let client = MockClient { pages: vec![], fail: true };
        let reporter = BuildReporter::new();
        let monitor = PerformanceMonitor::new();
        let fetcher = ContentFetcher::new(&client, &reporter, &monitor);

        let result = fetcher.all_stories(StoryVersion::Draft).await;
        assert!(result.is_err());

        let record = &reporter.errors.records()[0];
        assert!(
            record
                .context
                .contains(&("page".to_string(), "1".to_string()))
        );
    }
}
