//! Central site registry.
//!
//! A small, static mapping from site names to how their usernames are probed.

use crate::types::Strategy;

/// Get the probe strategy for a site name (lowercase).
///
/// URL templates use `{}` where the candidate goes.
pub fn site_strategy(site: &str) -> Option<Strategy> {
    let profile = |template: &str| Strategy::Profile {
        url_template: template.to_string(),
    };
    let redirect = |template: &str| Strategy::Redirect {
        url_template: template.to_string(),
    };

    match site {
        "github" => Some(profile("https://github.com/{}")),
        "gitlab" => Some(profile("https://gitlab.com/{}")),
        "twitter" => Some(profile("https://twitter.com/{}")),
        "instagram" => Some(profile("https://www.instagram.com/{}/")),
        "reddit" => Some(profile("https://www.reddit.com/user/{}")),
        "twitch" => Some(profile("https://www.twitch.tv/{}")),
        "medium" => Some(profile("https://medium.com/@{}")),
        "npm" => Some(profile("https://www.npmjs.com/~{}")),
        "tumblr" => Some(redirect("https://{}.tumblr.com")),
        "blogspot" => Some(redirect("https://{}.blogspot.com")),
        _ => None,
    }
}

/// Names of all sites with a built-in strategy
pub fn known_sites() -> Vec<&'static str> {
    vec![
        "github", "gitlab", "twitter", "instagram", "reddit", "twitch", "medium", "npm", "tumblr",
        "blogspot",
    ]
}
