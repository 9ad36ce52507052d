use crate::auth::models::CurrentUser;
use crate::error::HttpAppError;
use crate::handlers::form_view::{show_form, submit_form};
use crate::state::AppState;
use axum::{
    extract::{Multipart, State},
    response::Response,
};
use axum_extra::extract::CookieJar;
use igce_core::PricingHistoryUploadForm;
use std::sync::Arc;

pub const PRICING_HISTORY_PATH: &str = "/pn";

pub async fn upload_form(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    jar: CookieJar,
) -> Result<Response, HttpAppError> {
    show_form::<PricingHistoryUploadForm>(&state, &user, jar, PRICING_HISTORY_PATH).await
}

/// Success and failure both return to the form
pub async fn upload_submit(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    jar: CookieJar,
    multipart: Multipart,
) -> Result<Response, HttpAppError> {
    submit_form::<PricingHistoryUploadForm>(
        &state,
        &user,
        jar,
        multipart,
        PRICING_HISTORY_PATH,
        PRICING_HISTORY_PATH,
    )
    .await
}
