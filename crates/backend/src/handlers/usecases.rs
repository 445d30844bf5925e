use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use contracts::usecases::u501_sync_offers::SyncOffersRequest;
use serde_json::json;

use crate::shared::state::AppState;
use crate::shared::tracking::{TrackingRequest, FLOW_SYNC_OFFERS, SOURCE_BSS};
use crate::system::auth::extractor::ClientId;

// ============================================================================
// UseCase u501: Sync offers from BSS
// ============================================================================

/// POST /v1/
///
/// В фоновом режиме сразу отвечает 201, ошибки видны только в логе.
pub async fn u501_sync_offers(
    State(state): State<AppState>,
    ClientId(client): ClientId,
    payload: Result<Json<SyncOffersRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<serde_json::Value>), StatusCode> {
    let Json(request) = payload.map_err(|e| {
        tracing::warn!("[{}] malformed sync request: {}", client, e);
        StatusCode::BAD_REQUEST
    })?;

    tracing::info!(
        "[{}] sync request with {} offers",
        client,
        request.sync_offers.len()
    );

    // Журнал обмена уходит до сверки и не влияет на ответ
    if state.tracking.is_enabled() {
        match serde_json::to_string(&request) {
            Ok(body) => {
                state
                    .tracking
                    .send(TrackingRequest::inbound(SOURCE_BSS, FLOW_SYNC_OFFERS, body));
            }
            Err(e) => tracing::warn!("[{}] cannot serialize sync request for tracking: {}", client, e),
        }
    }

    if state.background_sync {
        let executor = state.sync.clone();
        tokio::spawn(async move {
            if let Err(e) = executor.execute(&request).await {
                tracing::error!("[{}] syncing offers error: {}", client, e);
            }
        });
    } else if let Err(e) = state.sync.execute(&request).await {
        tracing::error!("[{}] syncing offers error: {}", client, e);
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    Ok((StatusCode::CREATED, Json(json!({}))))
}
