/// Client configuration loaded from environment variables.
///
/// All fields have defaults suitable for a locally running studio
/// service. Override via environment variables.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the studio API, without a trailing slash
    /// (default: `http://localhost:5000/api`).
    pub base_url: String,
    /// Per-request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
}

impl ApiConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                          | Default                     |
    /// |----------------------------------|-----------------------------|
    /// | `TOONWEAVE_API_URL`              | `http://localhost:5000/api` |
    /// | `TOONWEAVE_REQUEST_TIMEOUT_SECS` | `30`                        |
    pub fn from_env() -> Self {
        let base_url = std::env::var("TOONWEAVE_API_URL")
            .unwrap_or_else(|_| "http://localhost:5000/api".into());
        // A trailing slash would produce double slashes in joined paths.
        let base_url = base_url.trim_end_matches('/').to_string();

        let request_timeout_secs: u64 = std::env::var("TOONWEAVE_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("TOONWEAVE_REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            base_url,
            request_timeout_secs,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".into(),
            request_timeout_secs: 30,
        }
    }
}
