use crate::api::{ApiResponse, state::AppState};
use crate::static_assets;
use axum::{
    Json,
    extract::{Query, State},
    response::Response,
};
use lockwatch_core::LockerNumber;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct LockerInfo {
    pub number: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateLockerRequest {
    pub number: String,
}

#[derive(Debug, Deserialize)]
pub struct LandingQuery {
    pub locker: Option<String>,
}

// GET /api/locker
pub async fn get_locker(State(state): State<AppState>) -> Json<ApiResponse<LockerInfo>> {
    let number = state.locker.read();
    Json(ApiResponse::ok(LockerInfo {
        number: number.to_string(),
    }))
}

// PUT /api/locker
pub async fn update_locker(
    State(state): State<AppState>,
    Json(request): Json<UpdateLockerRequest>,
) -> Json<ApiResponse<LockerInfo>> {
    let number = match LockerNumber::parse(&request.number) {
        Ok(number) => number,
        Err(e) => return Json(ApiResponse::error(e.to_string())),
    };

    if state.locker.write(&number) {
        Json(ApiResponse::ok(LockerInfo {
            number: number.to_string(),
        }))
    } else {
        Json(ApiResponse::error("Failed to update locker number"))
    }
}

// GET /
//
// A digits-only `locker` query parameter seeds the store before the page is
// served, overriding whatever was stored.
pub async fn landing(State(state): State<AppState>, Query(query): Query<LandingQuery>) -> Response {
    if let Some(raw) = query.locker {
        match LockerNumber::parse(&raw) {
            Ok(number) => {
                if !state.locker.write(&number) {
                    tracing::warn!("Failed to seed locker number from query parameter");
                }
            }
            Err(_) => {
                tracing::debug!("Ignoring non-numeric locker query parameter");
            }
        }
    }

    static_assets::index_response()
}
