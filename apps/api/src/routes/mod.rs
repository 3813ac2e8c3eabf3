pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::profile::handlers as profile;
use crate::questionnaire::handlers as questionnaire;
use crate::state::AppState;
use crate::templates::handlers as templates;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Questionnaire
        .route("/api/v1/config", get(questionnaire::handle_get_config))
        .route("/api/v1/questions", get(questionnaire::handle_all_questions))
        .route(
            "/api/v1/questions/phase/:phase_id",
            get(questionnaire::handle_phase_questions),
        )
        // Template catalog
        .route("/api/v1/templates", get(templates::handle_list_templates))
        .route(
            "/api/v1/templates/search",
            post(templates::handle_search_templates),
        )
        // Sessions
        .route("/api/v1/sessions", post(questionnaire::handle_create_session))
        .route(
            "/api/v1/sessions/:session_id",
            delete(questionnaire::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:session_id/clear",
            post(questionnaire::handle_clear_session),
        )
        .route(
            "/api/v1/sessions/:session_id/responses",
            post(questionnaire::handle_submit_response),
        )
        .route(
            "/api/v1/sessions/:session_id/responses/batch",
            post(questionnaire::handle_submit_batch),
        )
        .route(
            "/api/v1/sessions/:session_id/progress",
            get(questionnaire::handle_progress),
        )
        // Profile
        .route(
            "/api/v1/sessions/:session_id/profile/scores",
            get(profile::handle_profile_scores),
        )
        .route(
            "/api/v1/sessions/:session_id/profile/export",
            get(profile::handle_export_profile),
        )
        .route(
            "/api/v1/sessions/:session_id/profile/download",
            get(profile::handle_download_profile),
        )
        .route(
            "/api/v1/sessions/:session_id/plan",
            get(profile::handle_generate_plan),
        )
        .route(
            "/api/v1/sessions/:session_id/direction/:phase_id/:section_id",
            post(profile::handle_customized_direction),
        )
        // Recommendations
        .route(
            "/api/v1/sessions/:session_id/recommendations",
            get(templates::handle_recommendations),
        )
        .route(
            "/api/v1/sessions/:session_id/templates/:index/score",
            get(templates::handle_template_score),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::questionnaire::catalog::QuestionCatalog;
    use crate::sessions::SessionRegistry;
    use crate::templates::source::StaticTemplateSource;

    fn test_state() -> AppState {
        AppState {
            catalog: Arc::new(
                QuestionCatalog::from_json_str(include_str!(
                    "../../config/ppt_designer_system.json"
                ))
                .unwrap(),
            ),
            templates: Arc::new(StaticTemplateSource::embedded().unwrap()),
            sessions: SessionRegistry::new(),
        }
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn new_session(app: &Router) -> String {
        let response = send(app, Method::POST, "/api/v1/sessions", None).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        json_body(response).await["session_id"]
            .as_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let app = build_router(test_state());
        let response = send(&app, Method::GET, "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_questions_endpoints() {
        let app = build_router(test_state());

        let all = json_body(send(&app, Method::GET, "/api/v1/questions", None).await).await;
        let total = all["total_count"].as_u64().unwrap();
        assert_eq!(all["questions"].as_array().unwrap().len() as u64, total);

        let phase = send(&app, Method::GET, "/api/v1/questions/phase/1", None).await;
        assert_eq!(phase.status(), StatusCode::OK);
        assert_eq!(json_body(phase).await["questions"][0]["question_id"], "q1.1.1");

        let out_of_range = send(&app, Method::GET, "/api/v1/questions/phase/99", None).await;
        assert_eq!(out_of_range.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(out_of_range).await["error"]["code"], "OUT_OF_RANGE");
    }

    #[tokio::test]
    async fn test_submit_and_score_flow() {
        let app = build_router(test_state());
        let sid = new_session(&app).await;

        let submitted = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{sid}/responses"),
            Some(json!({ "question_id": "q1.1.1", "response": "교육" })),
        )
        .await;
        assert_eq!(submitted.status(), StatusCode::OK);
        let body = json_body(submitted).await;
        assert_eq!(body["success"], true);
        assert!(body["progress"].as_f64().unwrap() > 0.0);

        let scores = json_body(
            send(&app, Method::GET, &format!("/api/v1/sessions/{sid}/profile/scores"), None).await,
        )
        .await;
        assert!((scores["scores"]["content_goals"].as_f64().unwrap() - 1.6).abs() < 1e-9);
        assert_eq!(scores["scores"]["scalability"], 0.0);
        assert_eq!(scores["max_score"], 100.0);
    }

    #[tokio::test]
    async fn test_submit_requires_id_and_value() {
        let app = build_router(test_state());
        let sid = new_session(&app).await;

        for body in [
            json!({ "question_id": "q1.1.1", "response": null }),
            json!({ "response": "교육" }),
            json!({ "question_id": "", "response": "교육" }),
        ] {
            let response = send(
                &app,
                Method::POST,
                &format!("/api/v1/sessions/{sid}/responses"),
                Some(body),
            )
            .await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn test_batch_reports_counts() {
        let app = build_router(test_state());
        let sid = new_session(&app).await;

        let response = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{sid}/responses/batch"),
            Some(json!({ "responses": [
                { "question_id": "q1.1.1", "response": "교육" },
                { "question_id": "q2.2.2", "response": "not a bool" },
                { "question_id": "q5.1.1", "response": "1일" },
                { "question_id": "", "response": "x" }
            ]})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["submitted_count"], 2);
        assert_eq!(body["total_count"], 4);

        let empty = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{sid}/responses/batch"),
            Some(json!({ "responses": [] })),
        )
        .await;
        assert_eq!(empty.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_recommendations_and_plan() {
        let app = build_router(test_state());
        let sid = new_session(&app).await;
        send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{sid}/responses/batch"),
            Some(json!({ "responses": [
                { "question_id": "q2.1.1", "response": "minimal" },
                { "question_id": "q1.3.2", "response": "beige_orange" },
                { "question_id": "q1.1.1", "response": "보고" },
                { "question_id": "q5.1.1", "response": "1개월" }
            ]})),
        )
        .await;

        let recs = json_body(
            send(&app, Method::GET, &format!("/api/v1/sessions/{sid}/recommendations"), None)
                .await,
        )
        .await;
        assert_eq!(recs["count"], 5);
        assert_eq!(recs["recommendations"][0]["template_name"], "Minimal Beige Professional");
        assert_eq!(recs["recommendations"][0]["match_score"], 75.0);
        assert_eq!(recs["search_params"]["style"], json!(["minimal"]));

        let limited = json_body(
            send(
                &app,
                Method::GET,
                &format!("/api/v1/sessions/{sid}/recommendations?limit=2"),
                None,
            )
            .await,
        )
        .await;
        assert_eq!(limited["count"], 2);

        let score = json_body(
            send(&app, Method::GET, &format!("/api/v1/sessions/{sid}/templates/4/score"), None)
                .await,
        )
        .await;
        assert_eq!(score["template_name"], "Simple Lecture Slides");
        assert_eq!(score["breakdown"]["style_match"], 25.0);
        assert_eq!(score["breakdown"]["functionality_match"], 0.0);

        let plan = json_body(
            send(&app, Method::GET, &format!("/api/v1/sessions/{sid}/plan"), None).await,
        )
        .await;
        assert_eq!(plan["timeline"], "1개월");
        assert_eq!(plan["customization_level"], "extensive");
        assert_eq!(plan["experience_level"], "중급자");
    }

    #[tokio::test]
    async fn test_export_and_download() {
        let app = build_router(test_state());
        let sid = new_session(&app).await;
        send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{sid}/responses"),
            Some(json!({ "question_id": "q1.1.1", "response": "교육", "additional_details": "중학생" })),
        )
        .await;

        let export = json_body(
            send(&app, Method::GET, &format!("/api/v1/sessions/{sid}/profile/export"), None).await,
        )
        .await;
        assert_eq!(export["responses"]["q1.1.1"]["details"], "중학생");
        assert_eq!(export["recommendations"].as_array().unwrap().len(), 5);

        let download =
            send(&app, Method::GET, &format!("/api/v1/sessions/{sid}/profile/download"), None)
                .await;
        assert_eq!(download.status(), StatusCode::OK);
        let disposition = download
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment; filename=\"ppt_profile_"));
        assert!(json_body(download).await["profile_id"].is_string());
    }

    #[tokio::test]
    async fn test_customized_direction() {
        let app = build_router(test_state());
        let sid = new_session(&app).await;
        let uri = format!("/api/v1/sessions/{sid}/direction/1/1.1");

        let found = json_body(
            send(&app, Method::POST, &uri, Some(json!({ "user_choice": "교육" }))).await,
        )
        .await;
        assert_eq!(found["direction"]["focus"], "학습 목표 중심의 구조");

        let unmatched = json_body(
            send(&app, Method::POST, &uri, Some(json!({ "user_choice": "설득" }))).await,
        )
        .await;
        assert_eq!(unmatched["direction"], json!({}));

        let missing = send(&app, Method::POST, &uri, Some(json!({}))).await;
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_sessions_isolated_and_clearable() {
        let app = build_router(test_state());
        let a = new_session(&app).await;
        let b = new_session(&app).await;

        send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{a}/responses"),
            Some(json!({ "question_id": "q1.1.1", "response": "교육" })),
        )
        .await;

        let progress_b =
            json_body(send(&app, Method::GET, &format!("/api/v1/sessions/{b}/progress"), None).await)
                .await;
        assert_eq!(progress_b["answered_required"], 0);

        let cleared = send(&app, Method::POST, &format!("/api/v1/sessions/{a}/clear"), None).await;
        assert_eq!(cleared.status(), StatusCode::NO_CONTENT);
        let progress_a =
            json_body(send(&app, Method::GET, &format!("/api/v1/sessions/{a}/progress"), None).await)
                .await;
        assert_eq!(progress_a["answered_required"], 0);

        let deleted = send(&app, Method::DELETE, &format!("/api/v1/sessions/{a}"), None).await;
        assert_eq!(deleted.status(), StatusCode::NO_CONTENT);
        let gone = send(&app, Method::GET, &format!("/api/v1/sessions/{a}/progress"), None).await;
        assert_eq!(gone.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_template_catalog_and_search() {
        let app = build_router(test_state());

        let list = json_body(send(&app, Method::GET, "/api/v1/templates", None).await).await;
        assert_eq!(list["count"], 5);

        let found = json_body(
            send(
                &app,
                Method::POST,
                "/api/v1/templates/search",
                Some(json!({ "style": ["minimal"], "color_schemes": ["beige_orange"] })),
            )
            .await,
        )
        .await;
        assert_eq!(found["count"], 2);
    }
}
