use axum::body::Bytes;
use axum::extract::State;
use axum::Json;

use axis_core::tick::{TickOptions, TickRequest, TickReport};

use crate::error::{backend, AppError};
use crate::state::AppState;
use crate::tick;

/// POST /functions/autonomy-tick — run one orchestration pass.
///
/// The body is optional and forgiving: anything that doesn't parse means
/// all-defaults, and out-of-range bounds are clamped rather than
/// rejected. Partial failures come back inside a 200 report; only
/// structural failures (company enumeration unreachable) are a 500.
pub async fn autonomy_tick(
    State(app): State<AppState>,
    body: Bytes,
) -> Result<Json<TickReport>, AppError> {
    let request: TickRequest = serde_json::from_slice(&body).unwrap_or_default();
    let opts = TickOptions::from_request(request);

    let report = tick::run(&app, opts).await.map_err(backend)?;
    Ok(Json(report))
}
