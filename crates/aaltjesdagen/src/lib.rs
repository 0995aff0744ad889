#![doc = include_str!("../README.md")]

// Modules the site generator interacts with
pub mod analytics;
pub mod components;
pub mod dates;
pub mod errors;
pub mod images;
pub mod monitor;
pub mod site;
pub mod storyblok;

pub mod logging;

pub use logging::init_logging;

use std::env;

/// Returns whether the site is being built in development mode.
///
/// Development builds fetch draft content and log more verbosely; production
/// builds fetch published content only.
pub fn is_dev() -> bool {
    if option_env!("AALTJESDAGEN_DEV") == Some("true") {
        return true;
    }

    env::var("AALTJESDAGEN_DEV")
        .map(|v| v == "true")
        .unwrap_or(false)
}

/// The generator string, for `<meta name="generator">` tags in the output.
pub const GENERATOR: &str = concat!("Aaltjesdagen v", env!("CARGO_PKG_VERSION"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[serial_test::serial]
    fn dev_mode_follows_the_environment() {
        unsafe { std::env::remove_var("AALTJESDAGEN_DEV") };
        assert!(!is_dev());

        unsafe { std::env::set_var("AALTJESDAGEN_DEV", "true") };
        assert!(is_dev());
        unsafe { std::env::remove_var("AALTJESDAGEN_DEV") };
    }
}
