//! REST endpoint handlers organized by resource.

pub mod hold;
pub mod referral;
pub mod system;
pub mod wallet;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(wallet::routes())
        .merge(hold::routes())
        .merge(referral::routes())
}

#[cfg(test)]
#[allow(clippy::panic, clippy::indexing_slicing)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::app_state::AppState;
    use crate::domain::{EventBus, WalletRegistry};
    use crate::service::LedgerService;

    fn app() -> axum::Router {
        let registry = Arc::new(WalletRegistry::new());
        let event_bus = EventBus::new(64);
        let ledger = Arc::new(LedgerService::new(
            registry,
            event_bus.clone(),
            chrono::Duration::days(14),
        ));
        let state = AppState {
            ledger,
            event_bus,
            currency_code: "USD".to_string(),
            hold_window_days: 14,
        };
        crate::api::build_router().with_state(state)
    }

    async fn send(app: &axum::Router, method: &str, uri: &str, body: Option<Value>) -> Response {
        let request = match body {
            Some(value) => Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(value.to_string())),
            None => Request::builder().method(method).uri(uri).body(Body::empty()),
        };
        let Ok(request) = request else {
            panic!("failed to build request");
        };
        let Ok(response) = app.clone().oneshot(request).await else {
            panic!("request failed");
        };
        response
    }

    async fn body_json(response: Response) -> Value {
        let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
            panic!("failed to read body");
        };
        let Ok(value) = serde_json::from_slice(&bytes) else {
            panic!("body is not JSON");
        };
        value
    }

    /// Creates a wallet and returns its ID as a string.
    async fn create_wallet(app: &axum::Router) -> String {
        let response = send(
            app,
            "POST",
            "/api/v1/wallets",
            Some(json!({ "user_id": uuid::Uuid::new_v4() })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        let Some(id) = body["wallet_id"].as_str() else {
            panic!("missing wallet_id");
        };
        id.to_string()
    }

    async fn recharge(app: &axum::Router, wallet_id: &str, amount: u64) {
        let response = send(
            app,
            "POST",
            &format!("/api/v1/wallets/{wallet_id}/recharge"),
            Some(json!({ "amount": amount })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn health_reports_healthy() {
        let app = app();
        let response = send(&app, "GET", "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn billing_config_exposes_hold_window() {
        let app = app();
        let response = send(&app, "GET", "/config/billing", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["hold_window_days"], 14);
        assert_eq!(body["currency_code"], "USD");
    }

    #[tokio::test]
    async fn wallet_lifecycle_create_recharge_balance() {
        let app = app();
        let wallet_id = create_wallet(&app).await;
        recharge(&app, &wallet_id, 5000).await;

        let response = send(&app, "GET", &format!("/api/v1/wallets/{wallet_id}/balance"), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["total_balance"], 5000);
        assert_eq!(body["hold_amount"], 0);
        assert_eq!(body["available_balance"], 5000);
        assert_eq!(body["currency_code"], "USD");
    }

    #[tokio::test]
    async fn duplicate_wallet_for_user_conflicts() {
        let app = app();
        let user_id = uuid::Uuid::new_v4();
        let first = send(&app, "POST", "/api/v1/wallets", Some(json!({ "user_id": user_id }))).await;
        assert_eq!(first.status(), StatusCode::CREATED);
        let second = send(&app, "POST", "/api/v1/wallets", Some(json!({ "user_id": user_id }))).await;
        assert_eq!(second.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn balance_of_unknown_wallet_is_404() {
        let app = app();
        let response = send(
            &app,
            "GET",
            &format!("/api/v1/wallets/{}/balance", uuid::Uuid::new_v4()),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"]["error_code"], "WALLET_NOT_FOUND");
    }

    #[tokio::test]
    async fn referral_hold_then_fulfilled_settles_charge() {
        let app = app();
        let wallet_id = create_wallet(&app).await;
        recharge(&app, &wallet_id, 5000).await;

        let request_id = uuid::Uuid::new_v4();
        let response = send(
            &app,
            "POST",
            "/api/v1/referral-requests",
            Some(json!({
                "wallet_id": wallet_id,
                "referral_request_id": request_id,
                "amount": 2000,
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let hold = body_json(response).await;
        assert_eq!(hold["status"], "Active");
        assert_eq!(hold["amount"], 2000);

        // Reserved funds leave the available balance but not the total.
        let response = send(&app, "GET", &format!("/api/v1/wallets/{wallet_id}/balance"), None).await;
        let balance = body_json(response).await;
        assert_eq!(balance["total_balance"], 5000);
        assert_eq!(balance["hold_amount"], 2000);
        assert_eq!(balance["available_balance"], 3000);

        let response = send(
            &app,
            "POST",
            &format!("/api/v1/referral-requests/{request_id}/fulfilled"),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let entry = body_json(response).await;
        assert_eq!(entry["entry_type"], "Debit");
        assert_eq!(entry["source"], "ReferralCharge");
        assert_eq!(entry["amount"], 2000);
        assert_eq!(entry["balance_after"], 3000);
        assert_eq!(entry["related_hold_id"], hold["hold_id"]);

        let response = send(&app, "GET", &format!("/api/v1/wallets/{wallet_id}/balance"), None).await;
        let balance = body_json(response).await;
        assert_eq!(balance["total_balance"], 3000);
        assert_eq!(balance["hold_amount"], 0);
        assert_eq!(balance["available_balance"], 3000);
    }

    #[tokio::test]
    async fn referral_cancelled_releases_funds_without_entry() {
        let app = app();
        let wallet_id = create_wallet(&app).await;
        recharge(&app, &wallet_id, 1000).await;

        let request_id = uuid::Uuid::new_v4();
        let response = send(
            &app,
            "POST",
            "/api/v1/referral-requests",
            Some(json!({
                "wallet_id": wallet_id,
                "referral_request_id": request_id,
                "amount": 1000,
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = send(
            &app,
            "POST",
            &format!("/api/v1/referral-requests/{request_id}/cancelled"),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let hold = body_json(response).await;
        assert_eq!(hold["status"], "Released");

        let response = send(&app, "GET", &format!("/api/v1/wallets/{wallet_id}/balance"), None).await;
        let balance = body_json(response).await;
        assert_eq!(balance["total_balance"], 1000);
        assert_eq!(balance["available_balance"], 1000);

        // A release leaves no trace in the audit trail.
        let response = send(&app, "GET", &format!("/api/v1/wallets/{wallet_id}/entries"), None).await;
        let entries = body_json(response).await;
        assert_eq!(entries["pagination"]["total"], 1);
        assert_eq!(entries["data"][0]["source"], "Recharge");
    }

    #[tokio::test]
    async fn insufficient_balance_reports_shortfall() {
        let app = app();
        let wallet_id = create_wallet(&app).await;
        recharge(&app, &wallet_id, 100).await;

        let response = send(
            &app,
            "POST",
            "/api/v1/referral-requests",
            Some(json!({
                "wallet_id": wallet_id,
                "referral_request_id": uuid::Uuid::new_v4(),
                "amount": 9999,
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["error_code"], "INSUFFICIENT_WALLET_BALANCE");
        assert_eq!(body["error"]["details"]["current_balance"], 100);
        assert_eq!(body["error"]["details"]["required_amount"], 9999);
    }

    #[tokio::test]
    async fn duplicate_submission_returns_existing_hold() {
        let app = app();
        let wallet_id = create_wallet(&app).await;
        recharge(&app, &wallet_id, 5000).await;

        let request = json!({
            "wallet_id": wallet_id,
            "referral_request_id": uuid::Uuid::new_v4(),
            "amount": 2000,
        });

        let first = send(&app, "POST", "/api/v1/referral-requests", Some(request.clone())).await;
        assert_eq!(first.status(), StatusCode::CREATED);
        let first_hold = body_json(first).await;

        let second = send(&app, "POST", "/api/v1/referral-requests", Some(request)).await;
        assert_eq!(second.status(), StatusCode::OK);
        let second_hold = body_json(second).await;
        assert_eq!(second_hold["hold_id"], first_hold["hold_id"]);

        // Only one reservation was taken.
        let response = send(&app, "GET", &format!("/api/v1/wallets/{wallet_id}/balance"), None).await;
        let balance = body_json(response).await;
        assert_eq!(balance["hold_amount"], 2000);
    }

    #[tokio::test]
    async fn fulfilled_after_cancelled_conflicts() {
        let app = app();
        let wallet_id = create_wallet(&app).await;
        recharge(&app, &wallet_id, 500).await;

        let request_id = uuid::Uuid::new_v4();
        let response = send(
            &app,
            "POST",
            "/api/v1/referral-requests",
            Some(json!({
                "wallet_id": wallet_id,
                "referral_request_id": request_id,
                "amount": 500,
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let cancelled = send(
            &app,
            "POST",
            &format!("/api/v1/referral-requests/{request_id}/cancelled"),
            None,
        )
        .await;
        assert_eq!(cancelled.status(), StatusCode::OK);

        let fulfilled = send(
            &app,
            "POST",
            &format!("/api/v1/referral-requests/{request_id}/fulfilled"),
            None,
        )
        .await;
        assert_eq!(fulfilled.status(), StatusCode::CONFLICT);
        let body = body_json(fulfilled).await;
        assert_eq!(body["error"]["error_code"], "HOLD_NOT_ACTIVE");
    }

    #[tokio::test]
    async fn holds_listing_filters_by_status() {
        let app = app();
        let wallet_id = create_wallet(&app).await;
        recharge(&app, &wallet_id, 3000).await;

        let kept = uuid::Uuid::new_v4();
        let cancelled = uuid::Uuid::new_v4();
        for (request_id, amount) in [(kept, 1000), (cancelled, 500)] {
            let response = send(
                &app,
                "POST",
                "/api/v1/referral-requests",
                Some(json!({
                    "wallet_id": wallet_id,
                    "referral_request_id": request_id,
                    "amount": amount,
                })),
            )
            .await;
            assert_eq!(response.status(), StatusCode::CREATED);
        }
        let response = send(
            &app,
            "POST",
            &format!("/api/v1/referral-requests/{cancelled}/cancelled"),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(
            &app,
            "GET",
            &format!("/api/v1/wallets/{wallet_id}/holds?status=Active"),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let listing = body_json(response).await;
        assert_eq!(listing["data"].as_array().map(Vec::len), Some(1));
        assert_eq!(listing["data"][0]["amount"], 1000);
        assert_eq!(listing["active_holds_count"], 1);
        assert_eq!(listing["total_balance"], 3000);
        assert_eq!(listing["total_hold_amount"], 1000);
        assert_eq!(listing["available_balance"], 2000);

        let response = send(
            &app,
            "GET",
            &format!("/api/v1/wallets/{wallet_id}/holds?status=bogus"),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn withdrawal_bounded_by_available_balance() {
        let app = app();
        let wallet_id = create_wallet(&app).await;
        recharge(&app, &wallet_id, 2000).await;

        let response = send(
            &app,
            "POST",
            "/api/v1/referral-requests",
            Some(json!({
                "wallet_id": wallet_id,
                "referral_request_id": uuid::Uuid::new_v4(),
                "amount": 1500,
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        // Held funds cannot be paid out.
        let response = send(
            &app,
            "POST",
            &format!("/api/v1/wallets/{wallet_id}/withdrawals"),
            Some(json!({ "amount": 1000 })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let response = send(
            &app,
            "POST",
            &format!("/api/v1/wallets/{wallet_id}/withdrawals"),
            Some(json!({ "amount": 500 })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let entry = body_json(response).await;
        assert_eq!(entry["entry_type"], "Debit");
        assert_eq!(entry["source"], "WithdrawalPayout");
        assert_eq!(entry["balance_after"], 1500);
    }

    #[tokio::test]
    async fn recharge_rejects_zero_and_unknown_source() {
        let app = app();
        let wallet_id = create_wallet(&app).await;

        let response = send(
            &app,
            "POST",
            &format!("/api/v1/wallets/{wallet_id}/recharge"),
            Some(json!({ "amount": 0 })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(
            &app,
            "POST",
            &format!("/api/v1/wallets/{wallet_id}/recharge"),
            Some(json!({ "amount": 100, "source": "Cashback" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn entries_page_beyond_the_end_is_empty_not_an_error() {
        let app = app();
        let wallet_id = create_wallet(&app).await;
        recharge(&app, &wallet_id, 100).await;

        let response = send(
            &app,
            "GET",
            &format!("/api/v1/wallets/{wallet_id}/entries?page=4294967295&per_page=100"),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"].as_array().map(Vec::len), Some(0));
        assert_eq!(body["pagination"]["total"], 1);
    }

    #[tokio::test]
    async fn entries_paginate_oldest_first() {
        let app = app();
        let wallet_id = create_wallet(&app).await;
        for amount in [100, 200, 300] {
            recharge(&app, &wallet_id, amount).await;
        }

        let response = send(
            &app,
            "GET",
            &format!("/api/v1/wallets/{wallet_id}/entries?page=1&per_page=2"),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["pagination"]["total"], 3);
        assert_eq!(body["pagination"]["total_pages"], 2);
        assert_eq!(body["data"].as_array().map(Vec::len), Some(2));
        assert_eq!(body["data"][0]["amount"], 100);
        assert_eq!(body["data"][1]["amount"], 200);

        let response = send(
            &app,
            "GET",
            &format!("/api/v1/wallets/{wallet_id}/entries?page=2&per_page=2"),
            None,
        )
        .await;
        let body = body_json(response).await;
        assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
        assert_eq!(body["data"][0]["amount"], 300);
        assert_eq!(body["data"][0]["balance_after"], 600);
    }
}
