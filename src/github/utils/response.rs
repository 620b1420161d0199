// Shared response classification for the REST and GraphQL paths
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use snafu::ResultExt;

use crate::github::{DecodeSnafu, FetchError, TransportSnafu};

/// Map a status code onto the fetch error taxonomy. Only 2xx passes.
pub fn check_status(status: StatusCode) -> Result<(), FetchError> {
    if status.is_success() {
        return Ok(());
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(FetchError::Unauthorized);
    }
    Err(FetchError::Status {
        status: status.as_u16(),
    })
}

/// Decode a successful response body.
pub fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, FetchError> {
    serde_json::from_slice(body).context(DecodeSnafu)
}

/// Classify a response and decode its JSON body on success.
pub async fn classify_response<T: DeserializeOwned>(response: Response) -> Result<T, FetchError> {
    check_status(response.status())?;
    let body = response.bytes().await.context(TransportSnafu)?;
    decode_body(&body)
}
