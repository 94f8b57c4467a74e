/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local use.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5050`).
    pub port: u16,
    /// SQLite database URL (default: `sqlite://landscaping.db`).
    pub database_url: String,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// HTML-to-PDF program looked up on `PATH` (default: `wkhtmltopdf`).
    pub pdf_renderer: String,
    /// Enables the map on the client page when set.
    pub google_maps_api_key: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `5050`                     |
    /// | `DATABASE_URL`         | `sqlite://landscaping.db`  |
    /// | `CORS_ORIGINS`         | `http://localhost:5050`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `PDF_RENDERER`         | `wkhtmltopdf`              |
    /// | `GOOGLE_MAPS_API_KEY`  | unset                      |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "5050".into())
            .parse()
            .expect("PORT must be a valid u16");

        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://landscaping.db".into());

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5050".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let pdf_renderer =
            std::env::var("PDF_RENDERER").unwrap_or_else(|_| "wkhtmltopdf".into());

        let google_maps_api_key = std::env::var("GOOGLE_MAPS_API_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        Self {
            host,
            port,
            database_url,
            cors_origins,
            request_timeout_secs,
            pdf_renderer,
            google_maps_api_key,
        }
    }
}
