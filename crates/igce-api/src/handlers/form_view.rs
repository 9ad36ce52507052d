//! GET/POST flow shared by the upload forms
//!
//! GET renders the form with its defaults. POST streams the file part to a temporary file,
//! validates, and either re-renders with errors (422) or ingests and redirects with a flash
//! message.

use crate::error::{multipart_error, HttpAppError};
use crate::flash::Flash;
use crate::state::AppState;
use crate::templates::FormPage;
use crate::utils::upload::upload_stream_write;
use axum::{
    extract::multipart::{Field, MultipartError},
    extract::Multipart,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use futures::TryStreamExt;
use igce_core::config::UploadConfig;
use igce_core::forms::{
    default_values, FormErrors, FormSubmission, FormValues, UploadForm, FILE_FIELD,
};
use igce_core::models::{UploadedFile, UserContext};
use igce_core::{csv_allowed_dbs, AppError, ErrorMetadata};
use std::io;
use std::time::Instant;
use tokio_util::io::StreamReader;

/// Render a fresh form
pub async fn show_form<F: UploadForm>(
    state: &AppState,
    user: &UserContext,
    jar: CookieJar,
    action: &str,
) -> Result<Response, HttpAppError> {
    let flash = Flash::from_jar(&jar);
    render_form::<F>(
        state,
        user,
        jar,
        action,
        &default_values::<F>(),
        &FormErrors::default(),
        flash.as_ref(),
        StatusCode::OK,
    )
    .await
}

/// Handle a submission of `F`
pub async fn submit_form<F: UploadForm>(
    state: &AppState,
    user: &UserContext,
    jar: CookieJar,
    multipart: Multipart,
    action: &str,
    success_redirect: &str,
) -> Result<Response, HttpAppError> {
    let started = Instant::now();
    let submission = read_submission(&state.config.upload, multipart).await?;

    let outcome = submission
        .validate::<F>(
            user,
            state.catalog.as_ref(),
            state.security.as_ref(),
            &state.config.upload.allowed_extensions,
        )
        .await?;

    let upload = match outcome {
        Ok(upload) => upload,
        Err(rejected) => {
            state.stats.incr(&format!("{}.upload.invalid", F::KIND));
            tracing::debug!(
                kind = %F::KIND,
                fields = ?rejected.errors.iter().map(|(f, _)| f).collect::<Vec<_>>(),
                "Upload form rejected"
            );
            return render_form::<F>(
                state,
                user,
                jar,
                action,
                &rejected.values,
                &rejected.errors,
                None,
                StatusCode::UNPROCESSABLE_ENTITY,
            )
            .await;
        }
    };

    let filename = upload.file.original_filename.clone();
    let database_name = upload.database.database_name.clone();

    match state.ingest.ingest(user, upload).await {
        Ok(record) => {
            state.stats.incr(&format!("{}.upload.success", F::KIND));
            state
                .stats
                .timing(&format!("{}.upload", F::KIND), started.elapsed());
            tracing::info!(
                kind = %F::KIND,
                upload_id = %record.id,
                user_id = %user.user_id,
                "CSV upload accepted"
            );
            Ok(redirect_with_flash(
                jar,
                success_redirect,
                Flash::success(format!(
                    "CSV file \"{}\" uploaded to database \"{}\"",
                    filename, database_name
                )),
            ))
        }
        Err(e) => {
            state.stats.incr(&format!("{}.upload.failed", F::KIND));
            tracing::warn!(
                kind = %F::KIND,
                error = %e,
                error_type = e.error_type(),
                "CSV upload failed"
            );
            Ok(redirect_with_flash(
                jar,
                action,
                Flash::danger(format!(
                    "Unable to upload CSV file \"{}\" to database \"{}\". {}",
                    filename,
                    database_name,
                    e.client_message()
                )),
            ))
        }
    }
}

async fn render_form<F: UploadForm>(
    state: &AppState,
    user: &UserContext,
    jar: CookieJar,
    action: &str,
    values: &FormValues,
    errors: &FormErrors,
    flash: Option<&Flash>,
    status: StatusCode,
) -> Result<Response, HttpAppError> {
    let databases = csv_allowed_dbs(
        state.catalog.as_ref(),
        state.security.as_ref(),
        user,
        F::POLICY,
    )
    .await?;
    let fields = F::fields();

    let html = FormPage {
        title: F::TITLE,
        action,
        username: &user.username,
        fields: &fields,
        values,
        errors,
        databases: &databases,
        flash,
    }
    .render();

    Ok(html_page(status, html, jar, flash.is_some()))
}

/// HTML response, expiring the flash cookie once it has been displayed
pub fn html_page(
    status: StatusCode,
    html: String,
    jar: CookieJar,
    flash_shown: bool,
) -> Response {
    let jar = if flash_shown { Flash::clear(jar) } else { jar };
    (status, jar, Html(html)).into_response()
}

fn redirect_with_flash(jar: CookieJar, to: &str, flash: Flash) -> Response {
    (flash.store(jar), Redirect::to(to)).into_response()
}

/// Collect text fields and stream the file part to disk
async fn read_submission(
    config: &UploadConfig,
    mut multipart: Multipart,
) -> Result<FormSubmission, AppError> {
    let mut submission = FormSubmission::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string).unwrap_or_default();

        if name == FILE_FIELD {
            if submission.file.is_some() {
                return Err(AppError::BadRequest(format!(
                    "Multiple '{}' fields are not allowed",
                    FILE_FIELD
                )));
            }
            // Browsers send an empty part when no file was chosen
            let filename = field.file_name().map(str::to_string).unwrap_or_default();
            if filename.trim().is_empty() {
                continue;
            }
            let content_type = field
                .content_type()
                .map(str::to_string)
                .unwrap_or_else(|| "application/octet-stream".to_string());
            submission.file = Some(stream_to_temp(config, filename, content_type, field).await?);
        } else if !name.is_empty() {
            let value = field.text().await.map_err(multipart_error)?;
            submission.values.insert(name, value);
        }
    }

    Ok(submission)
}

async fn stream_to_temp(
    config: &UploadConfig,
    filename: String,
    content_type: String,
    field: Field<'_>,
) -> Result<UploadedFile, AppError> {
    let temp_folder = config.temp_folder();
    tokio::fs::create_dir_all(&temp_folder).await?;
    let temp_path = tempfile::Builder::new()
        .prefix("upload-")
        .suffix(".part")
        .tempfile_in(&temp_folder)?
        .into_temp_path();

    let reader = StreamReader::new(field.map_err(io::Error::other));
    tokio::pin!(reader);
    let size = upload_stream_write(reader, &temp_path, config.chunk_size)
        .await
        .map_err(stream_error)?;

    Ok(UploadedFile::new(filename, content_type, size, temp_path))
}

/// Unwrap multipart failures surfaced through the byte stream
fn stream_error(err: io::Error) -> AppError {
    let from_multipart = err
        .get_ref()
        .is_some_and(|inner| inner.is::<MultipartError>());
    if !from_multipart {
        return AppError::from(err);
    }
    match err.into_inner().map(|inner| inner.downcast::<MultipartError>()) {
        Some(Ok(multipart)) => multipart_error(*multipart),
        _ => AppError::BadRequest("Failed to read uploaded file".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderMap, HeaderValue};

    #[test]
    fn test_plain_io_errors_pass_through() {
        let err = stream_error(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        assert!(matches!(err, AppError::Internal(_) | AppError::InternalWithSource { .. }));
    }

    fn jar_with_flash() -> CookieJar {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("flash=success:done"));
        CookieJar::from_headers(&headers)
    }

    #[test]
    fn test_flash_page_clears_cookie() {
        let response = html_page(StatusCode::OK, "<p>ok</p>".to_string(), jar_with_flash(), true);
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(set_cookie.starts_with("flash=;"));
        assert!(set_cookie.contains("Max-Age=0"));

        let response = html_page(StatusCode::OK, "<p>ok</p>".to_string(), CookieJar::new(), false);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }

    #[test]
    fn test_redirect_sets_flash() {
        let response = redirect_with_flash(CookieJar::new(), "/pn", Flash::success("done"));
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/pn");
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(set_cookie.starts_with("flash="));
        assert!(set_cookie.contains("HttpOnly"));
        assert!(set_cookie.contains("SameSite=Lax"));
    }
}
