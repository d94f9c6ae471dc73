use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// REST API connection
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Versioned API root, without a trailing slash.
    #[serde(default = "d_base_url")]
    pub base_url: String,
    #[serde(default = "d_15000")]
    pub timeout_ms: u64,
    #[serde(default = "d_user_agent")]
    pub user_agent: String,
    /// Environment variable holding the bot token.
    #[serde(default = "d_token_env")]
    pub token_env: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: d_base_url(),
            timeout_ms: 15_000,
            user_agent: d_user_agent(),
            token_env: d_token_env(),
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_base_url() -> String {
    "https://discord.com/api/v9".into()
}
fn d_15000() -> u64 {
    15_000
}
fn d_user_agent() -> String {
    format!("DiscordBot (cordkit, {})", env!("CARGO_PKG_VERSION"))
}
fn d_token_env() -> String {
    "CK_BOT_TOKEN".into()
}
