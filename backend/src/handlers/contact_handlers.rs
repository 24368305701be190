use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;

use crate::contact::{ContactRequest, Field};
use crate::error::ContactError;
use crate::handlers::client_ip::ClientIp;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ContactSuccess {
    pub success: bool,
    pub message: &'static str,
}

pub async fn submit_contact(
    State(state): State<Arc<AppState>>,
    ClientIp(ip): ClientIp,
    payload: Result<Json<ContactRequest>, JsonRejection>,
) -> Result<Json<ContactSuccess>, ContactError> {
    let decision = state.rate_limiter.check(&ip);
    tracing::debug!("{} clients currently rate tracked", state.rate_limiter.tracked_keys());
    if !decision.allowed {
        let retry_after_secs = decision.retry_after_secs.unwrap_or(0);
        tracing::warn!("Contact form rate limited for {} (retry in {}s)", ip, retry_after_secs);
        return Err(ContactError::RateLimited { retry_after_secs });
    }

    let Json(request) = payload.map_err(|e| {
        tracing::info!("Rejected malformed contact payload from {}: {}", ip, e);
        ContactError::Validation
    })?;

    let lead = request.validate().map_err(|errors| {
        if errors.iter().any(|e| e.field == Field::Website) {
            tracing::info!("Honeypot filled in by {}, dropping submission", ip);
        } else {
            tracing::info!("Contact form validation failed for {}: {:?}", ip, errors);
        }
        ContactError::Validation
    })?;

    if let Err(e) = state.notifier.notify(&lead).await {
        tracing::error!("Failed to deliver lead to Telegram: {}", e);
        sentry::capture_error(&e);
        return Err(ContactError::UpstreamDelivery(e));
    }

    tracing::info!("Lead from {} delivered", ip);
    Ok(Json(ContactSuccess {
        success: true,
        message: "Заявка отправлена",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::ContactLead;
    use crate::rate_limit::{RateLimitConfig, RateLimiter};
    use crate::telegram::{LeadNotifier, NotifyError};
    use crate::{app, RouterOptions};
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        Router,
    };
    use futures::future::BoxFuture;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::sync::Mutex;
    use tower::ServiceExt;

    #[derive(Default)]
    struct RecordingNotifier {
        leads: Mutex<Vec<ContactLead>>,
        fail: bool,
    }

    impl LeadNotifier for RecordingNotifier {
        fn notify<'a>(&'a self, lead: &'a ContactLead) -> BoxFuture<'a, Result<(), NotifyError>> {
            Box::pin(async move {
                if self.fail {
                    return Err(NotifyError::Rejected {
                        status: 400,
                        description: "Bad Request: chat not found".to_string(),
                    });
                }
                self.leads.lock().unwrap().push(lead.clone());
                Ok(())
            })
        }
    }

    fn router(notifier: Arc<RecordingNotifier>) -> Router {
        let state = Arc::new(AppState {
            rate_limiter: Arc::new(RateLimiter::new(RateLimitConfig::default())),
            notifier,
        });
        app(state, &RouterOptions::default())
    }

    async fn post(router: &Router, ip: &str, body: String) -> (StatusCode, Value, Option<String>) {
        post_with_headers(router, &[("x-forwarded-for", ip)], body).await
    }

    async fn post_with_headers(
        router: &Router,
        headers: &[(&str, &str)],
        body: String,
    ) -> (StatusCode, Value, Option<String>) {
        let mut request = Request::builder()
            .method("POST")
            .uri("/api/contact")
            .header(header::CONTENT_TYPE, "application/json");
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let request = request.body(Body::from(body)).unwrap();

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let retry_after = response
            .headers()
            .get(header::RETRY_AFTER)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap(), retry_after)
    }

    fn valid_lead() -> String {
        json!({
            "name": "Иван Петров",
            "contact": "@ivan_telegram",
            "message": "Хочу записаться",
            "website": ""
        })
        .to_string()
    }

    #[tokio::test]
    async fn valid_lead_is_forwarded() {
        let notifier = Arc::new(RecordingNotifier::default());
        let router = router(notifier.clone());

        let (status, body, _) = post(&router, "1.2.3.4", valid_lead()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        let leads = notifier.leads.lock().unwrap();
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].contact, "@ivan_telegram");
    }

    #[tokio::test]
    async fn honeypot_looks_like_any_other_validation_failure() {
        let notifier = Arc::new(RecordingNotifier::default());
        let router = router(notifier.clone());

        let bot = json!({
            "name": "Иван Петров",
            "contact": "@ivan_telegram",
            "website": "http://spam.example"
        })
        .to_string();
        let short_name = json!({ "name": "A", "contact": "@ivan_telegram" }).to_string();

        let (bot_status, bot_body, _) = post(&router, "1.1.1.1", bot).await;
        let (human_status, human_body, _) = post(&router, "2.2.2.2", short_name).await;

        assert_eq!(bot_status, StatusCode::BAD_REQUEST);
        assert_eq!(bot_body["error"], "VALIDATION_ERROR");
        assert_eq!(bot_status, human_status);
        assert_eq!(bot_body, human_body);
        assert!(notifier.leads.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_json_is_a_validation_error() {
        let router = router(Arc::new(RecordingNotifier::default()));
        let (status, body, _) = post(&router, "1.2.3.4", "{not json".to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn fourth_submission_from_one_ip_is_rate_limited() {
        let router = router(Arc::new(RecordingNotifier::default()));

        for _ in 0..3 {
            let (status, _, _) = post(&router, "9.9.9.9", valid_lead()).await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, body, retry_after) = post(&router, "9.9.9.9", valid_lead()).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["error"], "RATE_LIMITED");
        let secs = body["retryAfter"].as_u64().unwrap();
        assert!(secs > 0 && secs <= 60);
        assert_eq!(retry_after, Some(secs.to_string()));

        let (other, _, _) = post(&router, "8.8.8.8", valid_lead()).await;
        assert_eq!(other, StatusCode::OK);
    }

    #[tokio::test]
    async fn spoofed_forwarded_hops_share_the_proxy_address_limit() {
        let router = router(Arc::new(RecordingNotifier::default()));

        for i in 0..3 {
            let forwarded = format!("10.0.0.{}, 203.0.113.9", i);
            let (status, _, _) = post_with_headers(
                &router,
                &[("x-forwarded-for", &forwarded), ("x-real-ip", "203.0.113.9")],
                valid_lead(),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, body, _) = post_with_headers(
            &router,
            &[("x-forwarded-for", "10.0.0.77, 203.0.113.9"), ("x-real-ip", "203.0.113.9")],
            valid_lead(),
        )
        .await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["error"], "RATE_LIMITED");
    }

    #[tokio::test]
    async fn telegram_failure_maps_to_telegram_error() {
        let notifier = Arc::new(RecordingNotifier {
            fail: true,
            ..Default::default()
        });
        let router = router(notifier);

        let (status, body, _) = post(&router, "1.2.3.4", valid_lead()).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "TELEGRAM_ERROR");
        assert!(!body["message"].as_str().unwrap().contains("chat not found"));
    }

    #[tokio::test]
    async fn health_reports_healthy() {
        let router = router(Arc::new(RecordingNotifier::default()));
        let request = Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "healthy");
    }
}
