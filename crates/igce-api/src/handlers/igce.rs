use crate::auth::models::CurrentUser;
use crate::error::HttpAppError;
use crate::flash::Flash;
use crate::handlers::form_view::{html_page, show_form, submit_form};
use crate::state::AppState;
use crate::templates::render_upload_index;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::Response,
};
use axum_extra::extract::CookieJar;
use igce_core::models::UploadKind;
use igce_core::IgceUploadForm;
use std::sync::Arc;

pub const IGCE_UPLOAD_PATH: &str = "/igce/upload";
pub const IGCE_INDEX_PATH: &str = "/igce/";

pub async fn upload_form(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    jar: CookieJar,
) -> Result<Response, HttpAppError> {
    show_form::<IgceUploadForm>(&state, &user, jar, IGCE_UPLOAD_PATH).await
}

pub async fn upload_submit(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    jar: CookieJar,
    multipart: Multipart,
) -> Result<Response, HttpAppError> {
    submit_form::<IgceUploadForm>(
        &state,
        &user,
        jar,
        multipart,
        IGCE_UPLOAD_PATH,
        IGCE_INDEX_PATH,
    )
    .await
}

/// Landing page: flash messages and the user's latest IGCE uploads
pub async fn index(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    jar: CookieJar,
) -> Result<Response, HttpAppError> {
    let uploads = state
        .uploads
        .recent_uploads(
            UploadKind::Igce,
            user.user_id,
            state.config.upload.recent_uploads_limit,
        )
        .await?;
    let flash = Flash::from_jar(&jar);
    let html = render_upload_index(&user.username, flash.as_ref(), &uploads, IGCE_UPLOAD_PATH);
    Ok(html_page(StatusCode::OK, html, jar, flash.is_some()))
}
