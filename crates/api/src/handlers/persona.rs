//! Handlers for the `/personas` resource.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use studio_cloud::object_key;
use studio_core::error::CoreError;
use studio_core::persona::{
    content_type_for_extension, validate_avatar_upload, validate_description, validate_name,
    AVATAR_FOLDER,
};
use studio_core::types::DbId;
use studio_db::models::article::Article;
use studio_db::models::persona::{CreatePersona, Persona, UpdatePersona};
use studio_db::repositories::{ArticleRepo, PersonaRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Persona",
        id,
    })
}

fn validation(e: validator::ValidationErrors) -> AppError {
    AppError::Core(CoreError::Validation(e.to_string()))
}

/// GET /api/v1/personas
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Persona>>>> {
    let personas = PersonaRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: personas }))
}

/// POST /api/v1/personas
///
/// Name and description are trimmed before storing. Names are unique
/// case-insensitively (409 on duplicates).
pub async fn create(
    State(state): State<AppState>,
    Json(mut input): Json<CreatePersona>,
) -> AppResult<(StatusCode, Json<DataResponse<Persona>>)> {
    input.name = validate_name(&input.name)?;
    input.description = validate_description(&input.description)?;
    input.validate().map_err(validation)?;

    let persona = PersonaRepo::create(&state.pool, &input).await?;
    tracing::info!(persona_id = persona.id, name = %persona.name, "Persona created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: persona })))
}

/// GET /api/v1/personas/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Persona>>> {
    let persona = PersonaRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(not_found(id))?;
    Ok(Json(DataResponse { data: persona }))
}

/// PUT /api/v1/personas/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdatePersona>,
) -> AppResult<Json<DataResponse<Persona>>> {
    if let Some(name) = &input.name {
        input.name = Some(validate_name(name)?);
    }
    if let Some(description) = &input.description {
        input.description = Some(validate_description(description)?);
    }
    input.validate().map_err(validation)?;

    let persona = PersonaRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(not_found(id))?;
    Ok(Json(DataResponse { data: persona }))
}

/// DELETE /api/v1/personas/{id}
///
/// Articles and media written for the persona are kept and detached.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if PersonaRepo::delete(&state.pool, id).await? {
        tracing::info!(persona_id = id, "Persona deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// GET /api/v1/personas/{id}/articles
pub async fn list_articles(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Article>>>> {
    PersonaRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(not_found(id))?;
    let articles = ArticleRepo::list_by_persona(&state.pool, id).await?;
    Ok(Json(DataResponse { data: articles }))
}

/// POST /api/v1/personas/{id}/avatar
///
/// Accepts a multipart upload with a single `file` field, stores it in
/// object storage and points the persona at the new URL. A previous avatar
/// held in the same store is removed.
pub async fn upload_avatar(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<Json<DataResponse<Persona>>> {
    let store = state
        .store
        .clone()
        .ok_or_else(|| AppError::ServiceUnavailable("Object storage is not configured".into()))?;

    let previous = PersonaRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(not_found(id))?
        .image_url;

    let mut file_data: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or("").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        file_data = Some((filename, data.to_vec()));
    }

    let (filename, data) =
        file_data.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;
    let ext = validate_avatar_upload(&filename, data.len())?;

    let key = object_key(AVATAR_FOLDER, &ext);
    let size = data.len();
    let url = store
        .put(&key, data, content_type_for_extension(&ext))
        .await?;

    let persona = PersonaRepo::set_image_url(&state.pool, id, &url)
        .await?
        .ok_or(not_found(id))?;
    tracing::info!(persona_id = id, %key, size, "Persona avatar uploaded");

    if let Some(old_key) = previous.as_deref().and_then(|u| store.key_for_url(u)) {
        if let Err(e) = store.delete(&old_key).await {
            tracing::warn!(persona_id = id, key = %old_key, error = %e, "Failed to remove previous avatar");
        }
    }
    Ok(Json(DataResponse { data: persona }))
}
