//! Provider client configuration.

/// Configuration for the hosted inference provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// API base, e.g. `https://api.cloudflare.com/client/v4`.
    pub base_url: String,
    /// Account the models run under.
    pub account_id: String,
    /// Bearer token.
    pub api_token: String,
    /// Connect timeout in seconds. No total-request timeout: streamed
    /// responses legitimately stay open for minutes.
    pub connect_timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.cloudflare.com/client/v4".to_string(),
            account_id: String::new(),
            api_token: String::new(),
            connect_timeout_secs: 15,
        }
    }
}

impl ProviderConfig {
    /// Read configuration from the environment.
    ///
    /// `CHATRELAY_ACCOUNT_ID` and `CHATRELAY_API_TOKEN` are required for
    /// real calls; `CHATRELAY_PROVIDER_URL` overrides the API base.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("CHATRELAY_PROVIDER_URL") {
            config.base_url = url;
        }
        if let Ok(account) = std::env::var("CHATRELAY_ACCOUNT_ID") {
            config.account_id = account;
        }
        if let Ok(token) = std::env::var("CHATRELAY_API_TOKEN") {
            config.api_token = token;
        }
        config
    }

    /// URL for running a model.
    #[must_use]
    pub fn run_url(&self, model_id: &str) -> String {
        format!(
            "{}/accounts/{}/ai/run/{}",
            self.base_url.trim_end_matches('/'),
            self.account_id,
            model_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_url_joins_cleanly() {
        let config = ProviderConfig {
            base_url: "https://api.example.com/v4/".to_string(),
            account_id: "acct123".to_string(),
            ..ProviderConfig::default()
        };
        assert_eq!(
            config.run_url("@cf/meta/llama-3.1-8b-instruct"),
            "https://api.example.com/v4/accounts/acct123/ai/run/@cf/meta/llama-3.1-8b-instruct"
        );
    }
}
