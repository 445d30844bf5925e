use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use contracts::domain::a001_offer::{Offer, OfferId};
use contracts::domain::common::AggregateId;
use serde::Deserialize;

use crate::domain::a001_offer::repository::OfferFilter;
use crate::shared::state::AppState;
use crate::system::auth::extractor::ClientId;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub active: Option<bool>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IdsQuery {
    pub ids: Option<String>,
}

fn parse_offer_id(raw: &str) -> Result<OfferId, StatusCode> {
    OfferId::from_string(raw.trim()).map_err(|e| {
        tracing::debug!("Rejected offer id {:?}: {}", raw, e);
        StatusCode::BAD_REQUEST
    })
}

/// GET /v1/?active=&category=
pub async fn search(
    State(state): State<AppState>,
    ClientId(client): ClientId,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Offer>>, StatusCode> {
    let filter = OfferFilter {
        active: query.active,
        category: query.category.filter(|c| !c.is_empty()),
    };
    match state.offers.search(&filter).await {
        Ok(v) => Ok(Json(v)),
        Err(e) => {
            tracing::error!("[{}] searching offers error: {}", client, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /v1/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    ClientId(client): ClientId,
    Path(id): Path<String>,
) -> Result<Json<Offer>, StatusCode> {
    let id = parse_offer_id(&id)?;
    match state.offers.get_by_id(id).await {
        Ok(Some(v)) => Ok(Json(v)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("[{}] getting offer {} error: {}", client, id.value(), e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /v1/supplementaries?ids=a,b
pub async fn list_supplementaries(
    State(state): State<AppState>,
    ClientId(client): ClientId,
    Query(query): Query<IdsQuery>,
) -> Result<Json<Vec<Offer>>, StatusCode> {
    let ids = query
        .ids
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .filter(|raw| !raw.trim().is_empty())
        .map(parse_offer_id)
        .collect::<Result<Vec<_>, _>>()?;

    match state.offers.list_supplementaries(&ids).await {
        Ok(v) => Ok(Json(v)),
        Err(e) => {
            tracing::error!("[{}] listing supplementary offers error: {}", client, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
