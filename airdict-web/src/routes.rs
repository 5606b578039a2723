use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};

use airdict::WordEntry;
use airdict_mt::{LlmExplanation, Lookup, LookupError, SearchResponse, WordExplainer};

use crate::favorites::{Favorite, FavoritesError, FavoritesStore, NewFavorite};

pub const DEFAULT_SUGGEST_LIMIT: usize = 10;
pub const MAX_SUGGEST_LIMIT: usize = 50;

#[derive(Clone)]
pub struct AppState {
    pub lookup: Lookup,
    pub favorites: Arc<FavoritesStore>,
    /// `None` when no language model is configured
    pub explainer: Option<Arc<dyn WordExplainer>>,
}

#[derive(Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

#[derive(Serialize, Deserialize)]
pub struct ExplainRequest {
    pub word: String,
    /// Pass the dictionary gloss to the model as a known meaning
    #[serde(default = "include_by_default")]
    pub include_basic_definition: bool,
}

fn include_by_default() -> bool {
    true
}

#[derive(Deserialize)]
pub struct SuggestParams {
    #[serde(default)]
    pub prefix: String,
    pub limit: Option<usize>,
}

#[derive(Serialize, Deserialize)]
pub struct SuggestResponse {
    pub prefix: String,
    pub words: Vec<String>,
}

#[derive(Serialize, Deserialize)]
pub struct FavoriteCheck {
    pub word: String,
    pub is_favorited: bool,
    pub favorite_id: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn lookup_error(e: LookupError) -> ApiError {
    let status = match e {
        LookupError::NotFound(_) => StatusCode::NOT_FOUND,
        LookupError::EmptyQuery => StatusCode::BAD_REQUEST,
    };
    api_error(status, e.to_string())
}

fn favorites_error(action: &str, e: FavoritesError) -> ApiError {
    error!("Failed to {} favorites: {}", action, e);
    api_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("Failed to {} favorites: {}", action, e),
    )
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/search", post(search))
        .route("/api/definition/{word}", get(definition))
        .route("/api/suggest", get(suggest))
        .route("/api/llm-explain", post(explain))
        .route("/api/llm-explain/{word}", get(explain_path))
        .route("/api/favorites", get(list_favorites).post(add_favorite))
        .route("/api/favorites/{id}", delete(remove_favorite))
        .route("/api/favorites/check/{word}", get(check_favorite))
        .with_state(state)
}

async fn index() -> impl IntoResponse {
    Json(json!({
        "name": "Air Dict API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health",
            "search": "POST /api/search",
            "definition": "GET /api/definition/{word}",
            "suggest": "GET /api/suggest?prefix=&limit=",
            "llm": {
                "explain": "POST /api/llm-explain",
                "explain_get": "GET /api/llm-explain/{word}",
            },
            "favorites": {
                "list": "GET /api/favorites",
                "add": "POST /api/favorites",
                "delete": "DELETE /api/favorites/{id}",
                "check": "GET /api/favorites/check/{word}",
            },
        },
    }))
}

async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "message": "Air Dict API is running",
    }))
}

async fn search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let query = request.query.trim();
    info!("Search request: '{}'", query);

    let outcome = state.lookup.search(query).await.map_err(lookup_error)?;
    Ok(Json(SearchResponse::new(query, outcome)))
}

async fn definition(
    State(state): State<AppState>,
    Path(word): Path<String>,
) -> Result<Json<WordEntry>, ApiError> {
    info!("Definition request: '{}'", word);
    let entry = state.lookup.define(&word).await.map_err(lookup_error)?;
    Ok(Json(entry))
}

async fn suggest(
    State(state): State<AppState>,
    Query(params): Query<SuggestParams>,
) -> Json<SuggestResponse> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_SUGGEST_LIMIT)
        .min(MAX_SUGGEST_LIMIT);
    let words = state.lookup.suggest(&params.prefix, limit);
    Json(SuggestResponse {
        prefix: params.prefix,
        words,
    })
}

async fn explain(
    State(state): State<AppState>,
    Json(request): Json<ExplainRequest>,
) -> Result<Json<LlmExplanation>, ApiError> {
    explain_word(&state, &request.word, request.include_basic_definition)
        .await
        .map(Json)
}

async fn explain_path(
    State(state): State<AppState>,
    Path(word): Path<String>,
) -> Result<Json<LlmExplanation>, ApiError> {
    explain_word(&state, &word, true).await.map(Json)
}

async fn explain_word(
    state: &AppState,
    word: &str,
    include_basic_definition: bool,
) -> Result<LlmExplanation, ApiError> {
    let word = word.trim();
    if word.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Word cannot be empty"));
    }

    let Some(explainer) = &state.explainer else {
        return Err(api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "LLM service not configured. Please set OPENAI_API_KEY.",
        ));
    };

    let basic_definition = if include_basic_definition {
        state.lookup.primary_gloss(word)
    } else {
        None
    };
    info!(
        "Explaining '{}' via {} (gloss: {:?})",
        word,
        explainer.provider_name(),
        basic_definition
    );

    explainer
        .explain(word, basic_definition.as_deref())
        .await
        .map_err(|e| {
            error!("Failed to explain '{}': {}", word, e);
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to generate explanation: {}", e),
            )
        })
}

async fn list_favorites(State(state): State<AppState>) -> Result<Json<Vec<Favorite>>, ApiError> {
    let favorites = state
        .favorites
        .list()
        .await
        .map_err(|e| favorites_error("get", e))?;
    Ok(Json(favorites))
}

async fn add_favorite(
    State(state): State<AppState>,
    Json(request): Json<NewFavorite>,
) -> Result<(StatusCode, Json<Favorite>), ApiError> {
    if request.word.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Word cannot be empty"));
    }
    let favorite = state
        .favorites
        .add(request)
        .await
        .map_err(|e| favorites_error("add", e))?;
    Ok((StatusCode::CREATED, Json(favorite)))
}

async fn remove_favorite(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let removed = state
        .favorites
        .remove(&id)
        .await
        .map_err(|e| favorites_error("remove", e))?;

    if !removed {
        return Err(api_error(StatusCode::NOT_FOUND, "Favorite not found"));
    }
    Ok(Json(json!({
        "success": true,
        "message": "Removed from favorites",
    })))
}

async fn check_favorite(
    State(state): State<AppState>,
    Path(word): Path<String>,
) -> Result<Json<FavoriteCheck>, ApiError> {
    let favorite = state
        .favorites
        .check(&word)
        .await
        .map_err(|e| favorites_error("check", e))?;

    Ok(Json(FavoriteCheck {
        word,
        is_favorited: favorite.is_some(),
        favorite_id: favorite.map(|f| f.id),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use airdict::{DictionaryRecord, MemoryDictionary};
    use airdict_mt::{FieldTranslator, MockMode, MockTranslator, MtError, MtResult};
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request};
    use tempfile::TempDir;
    use tower::ServiceExt;

    /// Explainer that echoes the gloss it was given
    struct EchoExplainer;

    #[async_trait]
    impl WordExplainer for EchoExplainer {
        async fn explain(
            &self,
            word: &str,
            basic_definition: Option<&str>,
        ) -> MtResult<LlmExplanation> {
            if word == "broken" {
                return Err(MtError::InvalidResponse("empty completion".to_string()));
            }
            let data = json!({
                "basic_translation": basic_definition.unwrap_or("(none)"),
                "detailed_explanation": format!("About {}", word),
            });
            Ok(LlmExplanation::from_model_json(word, &data))
        }

        fn provider_name(&self) -> &str {
            "echo"
        }
    }

    /// Router plus the directory holding its favorites file
    struct TestApp {
        router: Router,
        _dir: TempDir,
    }

    fn test_app(
        dictionary: MemoryDictionary,
        translator: FieldTranslator,
        explainer: Option<Arc<dyn WordExplainer>>,
    ) -> TestApp {
        let dir = tempfile::tempdir().unwrap();
        let favorites = FavoritesStore::new(dir.path().join("favorites.json"));
        TestApp {
            router: router(AppState {
                lookup: Lookup::new(Arc::new(dictionary), translator),
                favorites: Arc::new(favorites),
                explainer,
            }),
            _dir: dir,
        }
    }

    fn app() -> TestApp {
        let dictionary: MemoryDictionary = [
            DictionaryRecord::new("hello")
                .with_phonetic("hə'ləʊ")
                .with_translation("interj. 喂, 嘿")
                .with_definition("n. an expression of greeting"),
            DictionaryRecord::new("help").with_translation("v. 帮助"),
        ]
        .into_iter()
        .collect();
        let translator = FieldTranslator::new(Arc::new(MockTranslator::with_mappings([
            ("苹果", "en", "apple"),
            ("an expression of greeting", "zh-CN", "问候语"),
        ])));
        test_app(dictionary, translator, Some(Arc::new(EchoExplainer)))
    }

    async fn send(
        app: &TestApp,
        method: Method,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&app(), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_index_lists_endpoints() {
        let (status, body) = send(&app(), Method::GET, "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["endpoints"]["search"], "POST /api/search");
        assert_eq!(body["endpoints"]["llm"]["explain"], "POST /api/llm-explain");
    }

    #[tokio::test]
    async fn test_search_english() {
        let (status, body) = send(
            &app(),
            Method::POST,
            "/api/search",
            Some(json!({ "query": " hello " })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["query"], "hello");
        assert_eq!(body["is_chinese"], false);
        assert_eq!(body["english_result"]["phonetic"], "/hə'ləʊ/");
        assert_eq!(body["english_result"]["meanings"][0]["pos"], "interjection");
        assert_eq!(body["english_result"]["meanings"][0]["meaning"], "喂; 嘿");
        assert!(body["chinese_result"].is_null());
    }

    #[tokio::test]
    async fn test_search_chinese() {
        let (status, body) = send(
            &app(),
            Method::POST,
            "/api/search",
            Some(json!({ "query": "苹果" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_chinese"], true);
        assert_eq!(body["chinese_result"]["translations"], json!(["apple"]));
    }

    #[tokio::test]
    async fn test_search_not_found_and_empty() {
        let app = app();
        let (status, body) =
            send(&app, Method::POST, "/api/search", Some(json!({ "query": "zzz" }))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Word not found: zzz");

        let (status, _) =
            send(&app, Method::POST, "/api/search", Some(json!({ "query": "  " }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_definition() {
        let (status, body) = send(&app(), Method::GET, "/api/definition/hello", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["word"], "hello");
        assert_eq!(body["chinese"], "喂, 嘿");
        assert_eq!(body["meanings"][1]["part_of_speech"], "noun");
        assert_eq!(
            body["meanings"][1]["definitions"][0]["definition"],
            "an expression of greeting"
        );
        assert_eq!(
            body["meanings"][1]["definitions"][0]["definition_chinese"],
            "问候语"
        );
    }

    #[tokio::test]
    async fn test_definition_not_found() {
        let (status, _) = send(&app(), Method::GET, "/api/definition/zzz", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_suggest() {
        let app = app();
        let (status, body) = send(&app, Method::GET, "/api/suggest?prefix=he", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["prefix"], "he");
        assert_eq!(body["words"], json!(["hello", "help"]));

        let (_, body) = send(&app, Method::GET, "/api/suggest?prefix=he&limit=1", None).await;
        assert_eq!(body["words"], json!(["hello"]));
    }

    #[tokio::test]
    async fn test_favorites_flow() {
        let app = app();

        let (status, created) = send(
            &app,
            Method::POST,
            "/api/favorites",
            Some(json!({ "word": "hello", "chinese": "喂" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_str().unwrap().to_string();

        let (_, list) = send(&app, Method::GET, "/api/favorites", None).await;
        assert_eq!(list.as_array().unwrap().len(), 1);

        let (_, check) = send(&app, Method::GET, "/api/favorites/check/HELLO", None).await;
        assert_eq!(check["is_favorited"], true);
        assert_eq!(check["favorite_id"], id.as_str());

        let (status, removed) =
            send(&app, Method::DELETE, &format!("/api/favorites/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(removed["success"], true);

        let (status, _) = send(&app, Method::DELETE, &format!("/api/favorites/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, check) = send(&app, Method::GET, "/api/favorites/check/hello", None).await;
        assert_eq!(check["is_favorited"], false);
        assert!(check["favorite_id"].is_null());
    }

    #[tokio::test]
    async fn test_add_favorite_requires_word() {
        let (status, _) = send(
            &app(),
            Method::POST,
            "/api/favorites",
            Some(json!({ "word": " " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_provider_failure_still_answers() {
        let dictionary: MemoryDictionary = [DictionaryRecord::new("hello")
            .with_definition("n. an expression of greeting")]
        .into_iter()
        .collect();
        let translator = FieldTranslator::new(Arc::new(MockTranslator::new(MockMode::Error(
            "503".to_string(),
        ))));
        let app = test_app(dictionary, translator, None);

        let (status, body) = send(&app, Method::GET, "/api/definition/hello", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["meanings"][0]["definitions"][0]["definition_chinese"],
            "an expression of greeting"
        );
    }

    #[tokio::test]
    async fn test_explain_uses_dictionary_gloss() {
        let (status, body) = send(
            &app(),
            Method::POST,
            "/api/llm-explain",
            Some(json!({ "word": " hello " })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["word"], "hello");
        assert_eq!(body["basic_translation"], "喂, 嘿");
        assert_eq!(body["examples"][0]["sentence"], "Example with hello.");
    }

    #[tokio::test]
    async fn test_explain_without_gloss() {
        let app = app();
        let (_, body) = send(
            &app,
            Method::POST,
            "/api/llm-explain",
            Some(json!({ "word": "hello", "include_basic_definition": false })),
        )
        .await;
        assert_eq!(body["basic_translation"], "(none)");

        // Unknown words are still explained
        let (status, body) = send(&app, Method::GET, "/api/llm-explain/serendipity", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["basic_translation"], "(none)");
        assert_eq!(body["detailed_explanation"], "About serendipity");
    }

    #[tokio::test]
    async fn test_explain_errors() {
        let app = app();
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/llm-explain",
            Some(json!({ "word": "  " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(&app, Method::GET, "/api/llm-explain/broken", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("empty completion"));
    }

    #[tokio::test]
    async fn test_explain_not_configured() {
        let translator = FieldTranslator::new(Arc::new(MockTranslator::new(MockMode::NoOp)));
        let app = test_app(MemoryDictionary::default(), translator, None);
        let (status, body) = send(&app, Method::GET, "/api/llm-explain/hello", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body["error"].as_str().unwrap().contains("OPENAI_API_KEY"));
    }
}
