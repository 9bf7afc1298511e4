use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Invalid API base '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("API base '{url}' must use http or https.")]
    UnsupportedScheme { url: String },
    #[error("Failed to build HTTP client: {source}")]
    ClientBuild {
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to encode request body: {source}")]
    EncodeBody {
        #[source]
        source: serde_json::Error,
    },
}
