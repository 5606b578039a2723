mod config;
mod favorites;
mod routes;

use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use airdict::load_dictionary_from_file;
use airdict_mt::{
    FieldTranslator, GoogleTranslateProvider, Lookup, MachineTranslator, MockMode, MockTranslator,
    OpenAiExplainer, WordExplainer,
};

use config::{Config, TranslatorKind};
use favorites::FavoritesStore;
use routes::{AppState, router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e.into());
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    info!("📖 Starting Air Dict web server");

    let dictionary = load_dictionary_from_file(&config.dict_path)?;

    let provider: Arc<dyn MachineTranslator> = match config.translator {
        TranslatorKind::Google => Arc::new(
            GoogleTranslateProvider::from_env()
                .map_err(|e| format!("Failed to initialize translator: {}", e))?,
        ),
        TranslatorKind::Mock => {
            warn!("Using mock translator, translations are placeholders");
            Arc::new(MockTranslator::new(MockMode::Suffix))
        }
    };

    let translator = FieldTranslator::new(provider)
        .with_max_concurrency(config.max_concurrent_translations)
        .with_call_timeout(config.translation_timeout);
    info!("Translator: {:?}", translator);

    let favorites = FavoritesStore::new(config.favorites_path.clone());
    info!("Favorites stored at {}", favorites.path().display());

    let explainer: Option<Arc<dyn WordExplainer>> = match OpenAiExplainer::from_env() {
        Ok(explainer) => {
            info!("LLM explanations via model {}", explainer.model());
            Some(Arc::new(explainer))
        }
        Err(e) => {
            warn!("LLM explanations disabled: {}", e);
            None
        }
    };

    let state = AppState {
        lookup: Lookup::new(Arc::new(dictionary), translator),
        favorites: Arc::new(favorites),
        explainer,
    };

    let app = router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("🚀 Server running at http://{}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
