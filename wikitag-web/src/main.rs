//! Servidor web Axum com WebSocket para tokenização e marcação BIO em tempo real

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};
use wikitag_core::{
    corpus::{demo_documents, demo_resolver},
    pipeline::{tag_document, tag_document_streaming, tag_nodes, PipelineEvent},
    resolver::{DocumentNode, StaticResolver},
    span::Annotation,
    tagger::EntitySpan,
    tokenizer::{tokenize, Token},
    AlignedToken,
};

/// Endereço padrão quando `WIKITAG_ADDR` não está definido
const DEFAULT_ADDR: &str = "0.0.0.0:3000";

/// Estado compartilhado da aplicação
struct AppState {
    /// Cache título → tag usado pelo endpoint `/tag-nodes`
    resolver: StaticResolver,
}

#[derive(Deserialize)]
struct TokenizeRequest {
    text: String,
}

#[derive(Serialize)]
struct TokenizeResponse {
    tokens: Vec<Token>,
    total: usize,
}

/// Corpo de `/tag` e das mensagens WebSocket
#[derive(Deserialize)]
struct TagRequest {
    text: String,
    #[serde(default)]
    annotations: Vec<Annotation>,
}

#[derive(Deserialize)]
struct TagNodesRequest {
    nodes: Vec<DocumentNode>,
}

#[derive(Serialize)]
struct TagResponse {
    sentences: Vec<Vec<AlignedToken>>,
    entities: Vec<(usize, EntitySpan)>,
    unmatched_groups: usize,
    total_tokens: usize,
}

impl From<wikitag_core::TaggedDocument> for TagResponse {
    fn from(document: wikitag_core::TaggedDocument) -> Self {
        Self {
            entities: document.entities(),
            total_tokens: document.total_tokens(),
            unmatched_groups: document.unmatched_groups,
            sentences: document.sentences,
        }
    }
}

/// Carrega o cache de tags de `WIKITAG_TAG_CACHE`, ou usa o das demonstrações.
fn load_resolver() -> StaticResolver {
    let Ok(path) = std::env::var("WIKITAG_TAG_CACHE") else {
        return demo_resolver();
    };
    let loaded = std::fs::read_to_string(&path)
        .map_err(|err| err.to_string())
        .and_then(|json| StaticResolver::from_json(&json).map_err(|err| err.to_string()));
    match loaded {
        Ok(resolver) => {
            info!(path = %path, titles = resolver.len(), "cache de tags carregado");
            resolver
        }
        Err(err) => {
            error!(path = %path, error = %err, "cache de tags ilegível; usando o de demonstração");
            demo_resolver()
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let state = Arc::new(AppState {
        resolver: load_resolver(),
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/tokenize", post(tokenize_handler))
        .route("/tag", post(tag_handler))
        .route("/tag-nodes", post(tag_nodes_handler))
        .route("/ws", get(ws_handler))
        .route("/demo-texts", get(demo_texts_handler))
        .layer(cors)
        .with_state(state);

    let addr = std::env::var("WIKITAG_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    info!("🚀 Servidor WikiTag iniciado em http://{}", addr);
    axum::serve(listener, app).await.unwrap();
}

fn empty_text() -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({"error": "Texto vazio"})),
    )
        .into_response()
}

/// Tokenização pura, sem marcação
async fn tokenize_handler(Json(req): Json<TokenizeRequest>) -> impl IntoResponse {
    let tokens = tokenize(&req.text);
    let total = tokens.len();
    Json(TokenizeResponse { tokens, total })
}

/// Marcação BIO via HTTP POST (sem streaming)
async fn tag_handler(Json(req): Json<TagRequest>) -> impl IntoResponse {
    if req.text.trim().is_empty() {
        return empty_text();
    }

    let document = tag_document(&req.text, &req.annotations);
    Json(TagResponse::from(document)).into_response()
}

/// Marcação de um documento em nós (texto + links), resolvendo as tags pelo cache
async fn tag_nodes_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TagNodesRequest>,
) -> impl IntoResponse {
    match tag_nodes(&req.nodes, &state.resolver) {
        Ok(document) => Json(TagResponse::from(document)).into_response(),
        Err(err) => (
            StatusCode::BAD_GATEWAY,
            Json(serde_json::json!({"error": err.to_string()})),
        )
            .into_response(),
    }
}

/// Retorna os documentos de demonstração
async fn demo_texts_handler() -> impl IntoResponse {
    let texts: Vec<serde_json::Value> = demo_documents()
        .iter()
        .map(|demo| {
            serde_json::json!({
                "title": demo.title,
                "domain": demo.domain,
                "nodes": demo.nodes,
            })
        })
        .collect();
    Json(texts)
}

/// Upgrade HTTP → WebSocket
async fn ws_handler(ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(handle_websocket)
}

/// Lógica do WebSocket: recebe `{text, annotations}` (ou texto puro), executa o pipeline
/// e envia os eventos
async fn handle_websocket(mut socket: WebSocket) {
    info!("WebSocket conectado");

    while let Some(Ok(msg)) = socket.recv().await {
        match msg {
            Message::Text(text) => {
                let (text_str, annotations) = match serde_json::from_str::<TagRequest>(&text) {
                    Ok(req) => (req.text.trim().to_string(), req.annotations),
                    Err(_) => (text.trim().to_string(), Vec::new()),
                };

                if text_str.is_empty() {
                    continue;
                }

                info!(
                    "Marcando via WebSocket: {} chars, {} anotações",
                    text_str.len(),
                    annotations.len()
                );

                // O pipeline é síncrono: roda fora do runtime
                let events = tokio::task::spawn_blocking(move || {
                    let (tx, rx) = std::sync::mpsc::channel::<PipelineEvent>();
                    tag_document_streaming(&text_str, &annotations, tx);
                    rx.into_iter().collect::<Vec<_>>()
                })
                .await
                .unwrap_or_default();

                for event in &events {
                    if let Ok(json) = serde_json::to_string(event) {
                        if socket.send(Message::Text(json)).await.is_err() {
                            return; // cliente desconectou
                        }
                    }
                }
            }
            Message::Close(_) => {
                info!("WebSocket desconectado");
                return;
            }
            Message::Ping(payload) => {
                let _ = socket.send(Message::Pong(payload)).await;
            }
            _ => {}
        }
    }
}
