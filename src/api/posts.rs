//! Post generation endpoints
//!
//! POST /posts         - compose text and render the image
//! POST /posts/compose - compose text only

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::Serialize;

use super::AppState;
use crate::error::{ErrorKind, PostError};
use crate::pipeline::{PipelineError, Stage};
use crate::post::{FinishedPost, GeneratedPost, PostRequest};

/// Build the posts router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/posts", post(create_post))
        .route("/posts/compose", post(compose_post))
}

/// Encoded image in a response
#[derive(Debug, Serialize)]
pub struct ImagePayload {
    pub mime_type: &'static str,
    pub sha256: String,
    pub base64: String,
}

/// Full post response
#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub copy: String,
    pub hashtags: String,
    pub image_prompt: String,
    pub image: ImagePayload,
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

impl From<FinishedPost> for PostResponse {
    fn from(finished: FinishedPost) -> Self {
        let image = ImagePayload {
            mime_type: finished.image.mime_type(),
            sha256: finished.image.sha256(),
            base64: BASE64.encode(&finished.image.data),
        };

        Self {
            copy: finished.post.copy,
            hashtags: finished.post.hashtags,
            image_prompt: finished.post.image_prompt,
            image,
            generated_at: finished.generated_at,
        }
    }
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: ErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Present when only the image stage failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<GeneratedPost>,
}

fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
        _ => StatusCode::BAD_GATEWAY,
    }
}

fn post_error_response(error: &PostError, stage: Option<Stage>) -> ErrorResponse {
    ErrorResponse {
        error: error.to_string(),
        kind: error.kind(),
        stage,
        detail: error.detail(),
        post: None,
    }
}

/// Malformed or incomplete request body
fn rejection_response(rejection: JsonRejection) -> Response {
    let body = ErrorResponse {
        error: format!("invalid input: {}", rejection.body_text()),
        kind: ErrorKind::InvalidInput,
        stage: None,
        detail: None,
        post: None,
    };
    (status_for(body.kind), Json(body)).into_response()
}

/// Compose text and render the image
async fn create_post(
    State(state): State<AppState>,
    req: Result<Json<PostRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match req {
        Ok(req) => req,
        Err(rejection) => return rejection_response(rejection),
    };

    match state.pipeline.run(req).await {
        Ok(finished) => (StatusCode::OK, Json(PostResponse::from(finished))).into_response(),
        Err(e) => {
            let kind = e.error().kind();
            let mut body = post_error_response(e.error(), Some(e.stage()));
            if let PipelineError::Image { post, .. } = e {
                body.post = Some(post);
            }
            (status_for(kind), Json(body)).into_response()
        }
    }
}

/// Compose text only
async fn compose_post(
    State(state): State<AppState>,
    req: Result<Json<PostRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match req {
        Ok(req) => req,
        Err(rejection) => return rejection_response(rejection),
    };

    match state.pipeline.compose(&req).await {
        Ok(post) => (StatusCode::OK, Json(post)).into_response(),
        Err(e) => (
            status_for(e.kind()),
            Json(post_error_response(&e, Some(Stage::Compose))),
        )
            .into_response(),
    }
}
