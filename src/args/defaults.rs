/// Target used when neither the command line nor a config file names one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_PATH: &str = "/api/data";
pub const DEFAULT_METHOD: &str = "POST";
pub const DEFAULT_BODY: &str = r#"{"content":"load-test"}"#;
pub const DEFAULT_CONCURRENCY: &str = "5";
/// Milliseconds.
pub const DEFAULT_DURATION: &str = "60000";
pub const DEFAULT_INVALID_PERCENT: &str = "0.1";

pub(super) const DEFAULT_REQUEST_TIMEOUT: &str = "10s";
pub(super) const DEFAULT_CONNECT_TIMEOUT: &str = "5s";
