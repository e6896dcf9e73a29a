use axum::{
    extract::{FromRequest, Multipart, Path, Request, State},
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
        HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::api::{ApiError, AppState};
use crate::files::{is_allowed_type, FileStore, MAX_UPLOAD_BYTES};
use crate::models::*;

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Ideas
// ============================================================

pub async fn list_ideas(
    State(state): State<AppState>,
) -> Result<Json<Vec<IdeaWithDetails>>, ApiError> {
    state.db.list_ideas().map(Json).map_err(ApiError::from)
}

pub async fn get_idea(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<IdeaWithDetails>, ApiError> {
    state
        .db
        .get_idea(id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Idea not found".to_string()))
}

/// Create an idea. Accepts a JSON body, or multipart form data when the
/// submission includes file attachments.
pub async fn create_idea(
    State(state): State<AppState>,
    request: Request,
) -> Result<(StatusCode, Json<IdeaWithDetails>), ApiError> {
    let is_multipart = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"));

    let (input, uploads) = if is_multipart {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| ApiError::Validation(format!("Invalid multipart payload: {e}")))?;
        read_idea_form(multipart).await?
    } else {
        let Json(input) = Json::<CreateIdeaInput>::from_request(request, &())
            .await
            .map_err(|e| ApiError::Validation(e.to_string()))?;
        (input, Vec::new())
    };

    if input.text.trim().is_empty() {
        return Err(ApiError::Validation("Idea text is required".to_string()));
    }

    let idea = state.db.create_idea(input)?;

    for upload in uploads {
        let stored_name = state.files.save(&upload.original_name, &upload.bytes)?;
        state.db.add_attachment(
            idea.id,
            NewAttachment {
                original_name: upload.original_name,
                stored_name,
                mime_type: upload.mime_type,
                size: upload.bytes.len() as i64,
            },
        )?;
    }

    let created = state
        .db
        .get_idea(idea.id)?
        .ok_or_else(|| anyhow::anyhow!("Created idea disappeared"))?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// A file part buffered from a multipart request, not yet written to the
/// file store.
struct BufferedUpload {
    original_name: String,
    mime_type: String,
    bytes: axum::body::Bytes,
}

/// Read an idea-creation form: text fields plus any number of file parts.
/// File parts are validated against the size limit and type allow-list but
/// not yet persisted.
async fn read_idea_form(
    mut multipart: Multipart,
) -> Result<(CreateIdeaInput, Vec<BufferedUpload>), ApiError> {
    let mut input = CreateIdeaInput {
        text: String::new(),
        description: None,
        author: None,
        priority: None,
    };
    let mut uploads = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Invalid multipart payload: {e}")))?
    {
        if let Some(original_name) = field.file_name().map(str::to_string) {
            let mime_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::Validation(format!("Invalid file field: {e}")))?;
            validate_upload(&original_name, &mime_type, bytes.len())?;
            uploads.push(BufferedUpload {
                original_name,
                mime_type,
                bytes,
            });
            continue;
        }

        let name = field.name().unwrap_or_default().to_string();
        let value = field
            .text()
            .await
            .map_err(|e| ApiError::Validation(format!("Invalid field {name}: {e}")))?;
        match name.as_str() {
            "text" | "title" => input.text = value,
            "description" => input.description = Some(value),
            "author" => input.author = Some(value),
            "priority" => {
                input.priority = Some(value.trim().parse::<i64>().map_err(|_| {
                    ApiError::Validation("Priority must be an integer".to_string())
                })?);
            }
            _ => {}
        }
    }

    Ok((input, uploads))
}

fn validate_upload(original_name: &str, mime_type: &str, size: usize) -> Result<(), ApiError> {
    if size > MAX_UPLOAD_BYTES {
        return Err(ApiError::Validation(format!(
            "File {original_name} exceeds the {MAX_UPLOAD_BYTES} byte limit"
        )));
    }
    if !is_allowed_type(original_name, mime_type) {
        return Err(ApiError::Validation(format!(
            "File type not allowed for {original_name}. Allowed: images, PDFs, documents"
        )));
    }
    Ok(())
}

// ============================================================
// Voting
// ============================================================

pub async fn vote_idea(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Idea>, ApiError> {
    state
        .db
        .upvote(id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Idea not found".to_string()))
}

pub async fn downvote_idea(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Idea>, ApiError> {
    state
        .db
        .downvote(id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Idea not found".to_string()))
}

// ============================================================
// Notes
// ============================================================

pub async fn add_note(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    request: Request,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    let Json(input) = Json::<CreateNoteInput>::from_request(request, &())
        .await
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    if input.content.trim().is_empty() {
        return Err(ApiError::Validation("Note text is required".to_string()));
    }

    state
        .db
        .add_note(id, input)?
        .map(|note| (StatusCode::CREATED, Json(note)))
        .ok_or_else(|| ApiError::NotFound("Idea not found".to_string()))
}

// ============================================================
// Attachments
// ============================================================

/// Upload one or more files as attachments to an idea.
///
/// Files are persisted to the store as they arrive; if the idea turns out
/// not to exist, every file written during this request is deleted before
/// the 404 is returned so the store holds no orphans.
pub async fn add_attachments(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Vec<Attachment>>), ApiError> {
    let mut saved: Vec<NewAttachment> = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        remove_saved(&state.files, &saved);
        ApiError::Validation(format!("Invalid multipart payload: {e}"))
    })? {
        let Some(original_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field.bytes().await.map_err(|e| {
            remove_saved(&state.files, &saved);
            ApiError::Validation(format!("Invalid file field: {e}"))
        })?;

        if let Err(err) = validate_upload(&original_name, &mime_type, bytes.len()) {
            remove_saved(&state.files, &saved);
            return Err(err);
        }

        let stored_name = state.files.save(&original_name, &bytes)?;
        saved.push(NewAttachment {
            original_name,
            stored_name,
            mime_type,
            size: bytes.len() as i64,
        });
    }

    if saved.is_empty() {
        return Err(ApiError::Validation("No files provided".to_string()));
    }

    let mut attachments = Vec::new();
    for new in &saved {
        match state.db.add_attachment(id, new.clone()) {
            Ok(Some(attachment)) => attachments.push(attachment),
            Ok(None) => {
                remove_saved(&state.files, &saved);
                return Err(ApiError::NotFound("Idea not found".to_string()));
            }
            Err(err) => {
                remove_saved(&state.files, &saved);
                return Err(ApiError::Internal(err));
            }
        }
    }

    Ok((StatusCode::CREATED, Json(attachments)))
}

fn remove_saved(files: &FileStore, saved: &[NewAttachment]) {
    for attachment in saved {
        if let Err(err) = files.remove(&attachment.stored_name) {
            tracing::warn!(
                "Failed to remove orphaned upload {}: {}",
                attachment.stored_name,
                err
            );
        }
    }
}

/// Stream the attachment bytes back with the original filename as the
/// suggested download name.
pub async fn download_attachment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let attachment = state
        .db
        .get_attachment(id)?
        .ok_or_else(|| ApiError::NotFound("Attachment not found".to_string()))?;

    let bytes = state.files.read(&attachment.stored_name)?;

    let mut response = bytes.into_response();
    if let Ok(value) = HeaderValue::from_str(&attachment.mime_type) {
        response.headers_mut().insert(CONTENT_TYPE, value);
    }
    if let Ok(value) = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        attachment.original_name
    )) {
        response.headers_mut().insert(CONTENT_DISPOSITION, value);
    }
    Ok(response)
}

// ============================================================
// Stats
// ============================================================

pub async fn stats(State(state): State<AppState>) -> Result<Json<Stats>, ApiError> {
    state.db.stats().map(Json).map_err(ApiError::from)
}
