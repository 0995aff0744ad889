//! Error types for the Aaltjesdagen build layer.
use std::fmt::{self, Debug, Formatter};
use thiserror::Error;

macro_rules! impl_debug_for_error {
    ($($t:ty),*) => {
        $(
            impl Debug for $t {
                fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                    // Rust uses the Debug trait to show errors returned from main,
                    // thiserror renders through Display. Redirect Debug to Display.
                    write!(f, "{}", self)
                }
            }
        )*
    };
}

/// Failures coming out of the Storyblok content layer.
///
/// Fetch failures are recorded on the [`ErrorTracker`](crate::analytics::ErrorTracker)
/// and then returned unchanged to the caller. Nothing in this crate retries.
#[derive(Error)]
pub enum StoryblokError {
    #[error(
        "No Storyblok access token configured. Set the STORYBLOK_TOKEN environment variable before fetching content."
    )]
    MissingToken,

    #[error("Request to `{url}` failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Storyblok returned HTTP {status} for `{url}`")]
    Api { url: String, status: u16 },

    #[error("Failed to decode the response from `{url}`")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl_debug_for_error!(StoryblokError);
