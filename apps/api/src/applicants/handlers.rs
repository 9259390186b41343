use axum::{
    extract::State,
    http::{header, StatusCode},
    Form, Json,
};
use serde::Serialize;

use crate::applicants::registry::{
    find_by_first_name, register_applicant, NewApplicant, Registration,
};
use crate::errors::AppError;
use crate::forms::FormFields;
use crate::models::applicant::ApplicantRow;
use crate::session::{
    end_session, expired_session_cookie, session_cookie, start_session, CurrentApplicant,
};
use crate::state::AppState;

type WithCookie<T> = (StatusCode, [(header::HeaderName, String); 1], Json<T>);

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    #[serde(flatten)]
    pub registration: Registration,
    pub session_token: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub applicant: ApplicantRow,
    pub session_token: String,
}

/// POST /register
pub async fn handle_register(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<WithCookie<RegisterResponse>, AppError> {
    let form = FormFields::from(pairs);
    let new = NewApplicant {
        first_name: form.required("first_name")?,
        last_name: form.required("last_name")?,
        experience: form.required("experience")?,
        universities: form.list("university"),
    };

    let registration = register_applicant(&state.db, new).await?;
    let ttl = state.config.session_ttl_hours;
    let session_token = start_session(&state.db, registration.applicant.id, ttl).await?;

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, session_cookie(&session_token))],
        Json(RegisterResponse {
            registration,
            session_token,
        }),
    ))
}

/// POST /login
pub async fn handle_login(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<WithCookie<LoginResponse>, AppError> {
    let first_name = FormFields::from(pairs).required("first_name")?;

    let applicant = find_by_first_name(&state.db, &first_name)
        .await?
        .ok_or_else(|| AppError::NotFound("No user with such name".to_string()))?;
    let session_token =
        start_session(&state.db, applicant.id, state.config.session_ttl_hours).await?;

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, session_cookie(&session_token))],
        Json(LoginResponse {
            applicant,
            session_token,
        }),
    ))
}

/// POST /logout
pub async fn handle_logout(
    State(state): State<AppState>,
    current: CurrentApplicant,
) -> Result<(StatusCode, [(header::HeaderName, String); 1]), AppError> {
    end_session(&state.db, &current.token).await?;
    Ok((
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, expired_session_cookie())],
    ))
}
