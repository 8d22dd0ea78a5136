use std::env;

const SLACK_CHANNEL: &str = "SLACK_CHANNEL";
const HOOK_URL: &str = "HOOK_URL";

/// Process-wide settings, read from the environment once at startup and
/// passed by reference into the handler.
#[derive(Debug, Clone)]
pub struct Config {
    pub channel: String,
    pub hook_url: String,
}

impl Config {
    /// Both variables default to the empty string when unset; the webhook
    /// host+path is always addressed over https.
    pub fn from_env() -> Self {
        let channel = env::var(SLACK_CHANNEL).unwrap_or_default();
        let hook_url = format!("https://{}", env::var(HOOK_URL).unwrap_or_default());
        Config { channel, hook_url }
    }
}
