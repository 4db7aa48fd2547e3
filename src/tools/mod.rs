pub mod analyze;
pub mod extract;
pub mod pipeline;
pub mod search;

use crate::core::error::{Upstream, UpstreamError};

/// Pass 2xx responses through; turn anything else into `UpstreamError::Status`
/// carrying the status and whatever body the service sent.
pub(crate) async fn ensure_success(
    service: Upstream,
    resp: reqwest::Response,
) -> Result<reqwest::Response, UpstreamError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(UpstreamError::Status {
        service,
        status: status.as_u16(),
        body,
    })
}
