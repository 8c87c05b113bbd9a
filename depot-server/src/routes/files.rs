use axum::extract::{Multipart, State};
use axum::routing::{delete, get, post, put};
use axum::Router;
use content_store::Upsert;

use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(add_files))
        .route("/list", get(list_files))
        .route("/delete", delete(delete_files))
        .route("/update", put(update_files))
}

/// Drain the `files` multipart fields into `(name, bytes)` pairs.
async fn collect_uploads(
    multipart: &mut Multipart,
) -> Result<Vec<(String, Vec<u8>)>, ApiError> {
    let mut uploads = Vec::new();

    loop {
        let field = multipart.next_field().await.map_err(|err| {
            ApiError::BadRequest(format!("malformed multipart request: {err}"))
        })?;
        let Some(field) = field else { break };
        if field.name() != Some("files") {
            continue;
        }

        let name = field.file_name().unwrap_or_default().to_owned();
        let bytes = field.bytes().await.map_err(|err| {
            ApiError::BadRequest(format!(
                "failed reading uploaded file `{name}`: {err}"
            ))
        })?;
        uploads.push((name, bytes.to_vec()));
    }

    if uploads.is_empty() {
        return Err(ApiError::BadRequest(
            "request carries no `files` field".to_owned(),
        ));
    }
    Ok(uploads)
}

async fn add_files(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<String, ApiError> {
    let uploads = collect_uploads(&mut multipart).await?;
    let records = state.store.add_many(uploads)?;
    log::info!("Stored {} uploaded file(s)", records.len());
    Ok("Files uploaded successfully\n".to_owned())
}

async fn list_files(
    State(state): State<AppState>,
) -> Result<String, ApiError> {
    let records = state.store.list()?;
    let mut out = String::new();
    for record in &records {
        out.push_str(&format!(
            "File ID: {}, Name: {}\n",
            record.id, record.name
        ));
    }
    Ok(out)
}

async fn delete_files(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<String, ApiError> {
    let uploads = collect_uploads(&mut multipart).await?;
    let contents = uploads.into_iter().map(|(_, bytes)| bytes).collect();
    state.store.remove_many(contents)?;
    Ok("File deleted successfully\n".to_owned())
}

async fn update_files(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<String, ApiError> {
    let uploads = collect_uploads(&mut multipart).await?;
    let outcomes = state.store.upsert_many(uploads)?;

    let all_updated = outcomes
        .iter()
        .all(|outcome| matches!(outcome, Upsert::Updated(_)));
    Ok(if all_updated {
        "Files updated successfully\n".to_owned()
    } else {
        "Files uploaded successfully\n".to_owned()
    })
}
