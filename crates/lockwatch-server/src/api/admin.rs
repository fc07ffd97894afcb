use crate::api::{ApiResponse, state::AppState};
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub valid: bool,
}

// POST /api/admin/verify
pub async fn verify_admin(
    State(state): State<AppState>,
    Json(request): Json<VerifyRequest>,
) -> Json<ApiResponse<VerifyResponse>> {
    let valid = state.verifier.verify(&request.password);
    Json(ApiResponse::ok(VerifyResponse { valid }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lockwatch_core::AppCore;
    use std::sync::Arc;
    use tempfile::{TempDir, tempdir};

    fn create_test_app() -> (AppState, TempDir) {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let app = Arc::new(AppCore::new(db_path.to_str().unwrap(), Some("letmein")).unwrap());
        (app, temp_dir)
    }

    #[tokio::test]
    async fn test_verify_accepts_configured_password() {
        let (app, _temp_dir) = create_test_app();

        let response = verify_admin(
            State(app),
            Json(VerifyRequest {
                password: "letmein".to_string(),
            }),
        )
        .await;

        assert!(response.0.data.unwrap().valid);
    }

    #[tokio::test]
    async fn test_verify_rejects_wrong_password_without_lockout() {
        let (app, _temp_dir) = create_test_app();

        // Three wrong attempts in a row: each fails the same way, none of
        // them locks the gate.
        for _ in 0..3 {
            let response = verify_admin(
                State(app.clone()),
                Json(VerifyRequest {
                    password: "guess".to_string(),
                }),
            )
            .await;
            assert!(!response.0.data.unwrap().valid);
        }

        let response = verify_admin(
            State(app),
            Json(VerifyRequest {
                password: "letmein".to_string(),
            }),
        )
        .await;
        assert!(response.0.data.unwrap().valid);
    }
}
