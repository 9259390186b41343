use axum::{extract::State, http::StatusCode, Form, Json};

use crate::errors::AppError;
use crate::forms::FormFields;
use crate::models::position::PositionWithLandmarks;
use crate::positions::catalog::{create_position, list_positions, CreatedPosition, NewPosition};
use crate::state::AppState;

/// POST /post_position_form
pub async fn handle_create_position(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<(StatusCode, Json<CreatedPosition>), AppError> {
    let form = FormFields::from(pairs);
    let salary = form.required("salary")?;
    let new = NewPosition {
        title: form.required("title")?,
        salary: salary
            .trim()
            .parse::<i64>()
            .map_err(|_| AppError::Validation(format!("Salary '{salary}' is not an integer")))?,
        landmarks: form.list("landmark"),
    };

    let created = create_position(&state.db, new).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /post_position_form
pub async fn handle_position_form_get() -> Result<(), AppError> {
    Err(AppError::MethodNotAllowed(
        "Incorrect request type".to_string(),
    ))
}

/// GET /positions
pub async fn handle_list_positions(
    State(state): State<AppState>,
) -> Result<Json<Vec<PositionWithLandmarks>>, AppError> {
    Ok(Json(list_positions(&state.db).await?))
}
