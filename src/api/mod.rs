pub mod error;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderValue, Method},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{field, info, info_span, warn, Instrument, Span};
use uuid::Uuid;

use crate::config::AllowedOrigins;
use crate::food::error::{InputError, SuggestionError};
use crate::food::suggest::SuggestionGenerator;
use crate::food::validate::validate_request;

use self::error::ApiError;

#[derive(Clone)]
pub struct AppState {
    generator: Arc<SuggestionGenerator>,
    service_name: Arc<str>,
}

impl AppState {
    pub fn new(generator: SuggestionGenerator, service_name: &str) -> Self {
        Self {
            generator: Arc::new(generator),
            service_name: Arc::from(service_name),
        }
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    timestamp: String,
    service: String,
}

/// Create and configure the API router
pub fn create_api(state: AppState, origins: &AllowedOrigins) -> Router {
    Router::new()
        .route("/recipes", post(recipes_handler))
        .route("/health", get(health_check))
        .layer(cors_layer(origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &AllowedOrigins) -> CorsLayer {
    let allow_origin = match origins {
        AllowedOrigins::Any => AllowOrigin::from(Any),
        AllowedOrigins::List(list) => {
            let values: Vec<HeaderValue> = list
                .iter()
                .filter_map(|o| match HeaderValue::from_str(o) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!(origin = %o, "Ignoring invalid CORS origin");
                        None
                    }
                })
                .collect();
            AllowOrigin::list(values)
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600))
}

async fn recipes_handler(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let span = info_span!(
        "suggest",
        request_id = %Uuid::new_v4(),
        meal_type = field::Empty
    );
    suggest(state, payload).instrument(span).await
}

async fn suggest(state: AppState, payload: Result<Json<Value>, JsonRejection>) -> Response {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            warn!(error = %rejection, "Rejected request body");
            return ApiError::from(SuggestionError::from(InputError::Body))
                .with_received(Value::Null)
                .into_response();
        }
    };

    let request = match validate_request(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!(field = e.field(), "Invalid suggestion request");
            return ApiError::from(SuggestionError::from(e))
                .with_received(received(&body))
                .into_response();
        }
    };

    Span::current().record("meal_type", request.meal_type.as_str());
    info!(
        ingredients = request.ingredients.len(),
        model = state.generator.model_name(),
        "Generating recipe suggestions"
    );

    match state.generator.suggest(&request).await {
        Ok(recipes) => Json(recipes).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

fn received(body: &Value) -> Value {
    json!({
        "ingredients": body.get("ingredients").cloned().unwrap_or(Value::Null),
        "mealType": body.get("mealType").cloned().unwrap_or(Value::Null),
    })
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        timestamp: chrono::Utc::now().to_rfc3339(),
        service: state.service_name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::food::SuggestionSettings;
    use crate::providers::fake::FakeProvider;
    use crate::providers::traits::ProviderError;
    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::ServiceExt;

    const RECIPES: &str = r#"[
        {"name":"Crêpes","country":"France","flag":"🇫🇷","description":"Thin pancakes",
         "ingredients":["egg","flour","milk"],"steps":["Whisk","Rest","Pour","Flip"]},
        {"name":"Dutch baby","country":"USA","flag":"🇺🇸","description":"Puffed oven pancake",
         "ingredients":["egg","flour","butter"],"steps":["Heat pan","Blend","Bake","Serve"]}
    ]"#;

    fn app(provider: FakeProvider) -> Router {
        let generator = SuggestionGenerator::new(Arc::new(provider), SuggestionSettings::default());
        create_api(AppState::new(generator, "test-service"), &AllowedOrigins::Any)
    }

    async fn post_recipes(app: Router, body: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::post("/recipes")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    const BREAKFAST: &str = r#"{"ingredients":["egg","flour"],"mealType":"breakfast"}"#;

    #[tokio::test]
    async fn clean_reply_returns_recipes() {
        let (status, body) = post_recipes(app(FakeProvider::with_response(RECIPES)), BREAKFAST).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::from_str::<Value>(RECIPES).unwrap());
    }

    #[tokio::test]
    async fn empty_ingredients_are_rejected() {
        let (status, body) = post_recipes(
            app(FakeProvider::with_response(RECIPES)),
            r#"{"ingredients":[],"mealType":"dinner"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid ingredients"));
        assert_eq!(body["received"], json!({ "ingredients": [], "mealType": "dinner" }));
    }

    #[tokio::test]
    async fn validation_happens_before_the_upstream_call() {
        let provider = Arc::new(FakeProvider::with_response(RECIPES));
        let generator = SuggestionGenerator::new(provider.clone(), SuggestionSettings::default());
        let app = create_api(AppState::new(generator, "test-service"), &AllowedOrigins::Any);

        let (status, _) = post_recipes(app, r#"{"ingredients":["egg"]}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(provider.requests().is_empty());
    }

    #[tokio::test]
    async fn non_json_body_is_rejected() {
        let (status, body) = post_recipes(app(FakeProvider::with_response(RECIPES)), "egg, flour").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["received"], Value::Null);
    }

    #[tokio::test]
    async fn fenced_reply_is_accepted() {
        let fenced = format!("```json\n{}\n```", RECIPES);
        let (status, body) = post_recipes(app(FakeProvider::with_response(&fenced)), BREAKFAST).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn prose_reply_is_server_error_with_preview() {
        let (status, body) = post_recipes(
            app(FakeProvider::with_response("Here are some ideas: make an omelette.")),
            BREAKFAST,
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().starts_with("No valid JSON array found"));
        assert_eq!(body["raw"], "Here are some ideas: make an omelette.");
    }

    #[tokio::test]
    async fn connection_refused_is_service_unavailable() {
        let provider = FakeProvider::failing(ProviderError::Unreachable("connection refused".into()));
        let (status, body) = post_recipes(app(provider), BREAKFAST).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body["error"].as_str().unwrap().starts_with("Unable to connect"));
    }

    #[tokio::test]
    async fn upstream_timeout_is_service_unavailable() {
        use crate::providers::openai::OpenAIProvider;
        use httpmock::prelude::*;

        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/chat/completions");
                then.status(200)
                    .delay(Duration::from_secs(3))
                    .body(json!({ "choices": [{ "message": { "content": RECIPES } }] }).to_string());
            })
            .await;

        let provider = OpenAIProvider::new(
            "test-key".to_string(),
            "gpt-test".to_string(),
            server.url("/v1/chat/completions"),
            Duration::from_millis(300),
        )
        .unwrap();
        let generator = SuggestionGenerator::new(Arc::new(provider), SuggestionSettings::default());
        let app = create_api(AppState::new(generator, "test-service"), &AllowedOrigins::Any);

        let (status, body) = post_recipes(app, BREAKFAST).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body["error"].as_str().unwrap().starts_with("Unable to connect"));
    }

    #[tokio::test]
    async fn upstream_rate_limit_is_forwarded() {
        let provider = FakeProvider::failing(ProviderError::RateLimited { retry_after_secs: None });
        let (status, body) = post_recipes(app(provider), BREAKFAST).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert!(body["details"].is_string());
    }

    #[tokio::test]
    async fn partially_valid_reply_keeps_valid_recipe() {
        let mut recipes: Value = serde_json::from_str(RECIPES).unwrap();
        recipes[1].as_object_mut().unwrap().remove("steps");
        let (status, body) =
            post_recipes(app(FakeProvider::with_response(&recipes.to_string())), BREAKFAST).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["name"], "Crêpes");
    }

    #[tokio::test]
    async fn no_surviving_recipe_is_unprocessable() {
        let (status, body) =
            post_recipes(app(FakeProvider::with_response(r#"[{"name":"?"}]"#)), BREAKFAST).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn health_reports_service() {
        let response = app(FakeProvider::with_response(RECIPES))
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "OK");
        assert_eq!(body["service"], "test-service");
        assert!(chrono::DateTime::parse_from_rfc3339(body["timestamp"].as_str().unwrap()).is_ok());
    }

    #[tokio::test]
    async fn get_on_recipes_is_method_not_allowed() {
        let response = app(FakeProvider::with_response(RECIPES))
            .oneshot(Request::get("/recipes").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn preflight_is_answered_with_cors_headers() {
        let response = app(FakeProvider::with_response(RECIPES))
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/recipes")
                    .header(header::ORIGIN, "http://localhost:5173")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }
}
