//! PIN access gate.
//!
//! The dashboard fronts a shared machine; a PIN keeps casual visitors
//! out. This is an access gate, not an authentication system: no
//! sessions, no users, one shared secret compared per request.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::error::ApiError;
use crate::state::AppState;

pub const PIN_HEADER: &str = "x-access-pin";

/// Reject API requests whose PIN header does not match the configured
/// PIN. A missing `auth.pin` disables the gate entirely.
pub async fn require_pin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(expected) = state.config.auth.pin.as_deref() {
        let presented = request
            .headers()
            .get(PIN_HEADER)
            .and_then(|v| v.to_str().ok());
        if presented != Some(expected) {
            return Err(ApiError::Unauthorized);
        }
    }
    Ok(next.run(request).await)
}
