//! People import endpoint
//!
//! `POST /api/people/import` with a multipart form carrying `file` and
//! optionally `skipDuplicates`.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::HeaderMap,
    Json,
};
use tracing::{debug, info, warn};

use super::AppState;
use crate::auth::extract_auth;
use crate::error::{ApiError, ApiResult};
use crate::services::import::import_file;
use crate::types::{ImportOptions, ImportResult};

/// Uploaded file pulled out of the form
struct Upload {
    file_name: String,
    bytes: Vec<u8>,
}

pub async fn handle_people_import(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<ImportResult>> {
    let auth = extract_auth(&headers, &state.config.jwt_secret).map_err(|e| {
        warn!("Rejected import request: {}", e);
        ApiError::Unauthorized
    })?;

    let mut multipart = multipart.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let mut upload: Option<Upload> = None;
    let mut skip_duplicates: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                upload = Some(Upload {
                    file_name,
                    bytes: bytes.to_vec(),
                });
            }
            "skipDuplicates" => {
                skip_duplicates = Some(field.text().await?);
            }
            other => debug!("Ignoring form field '{}'", other),
        }
    }

    let upload = upload.ok_or_else(|| ApiError::BadRequest("No file provided".to_string()))?;
    let options = ImportOptions::from_form_value(skip_duplicates.as_deref());

    info!(
        "Import of '{}' ({} bytes) requested by {} <{}>",
        upload.file_name,
        upload.bytes.len(),
        auth.user_id,
        auth.email
    );

    let result = import_file(
        state.store.as_ref(),
        auth.user_id,
        &upload.file_name,
        &upload.bytes,
        options,
    )
    .await?;

    Ok(Json(result))
}
