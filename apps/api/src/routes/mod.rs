pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::applicants::handlers as applicants;
use crate::applications::handlers as applications;
use crate::offers::handlers as offers;
use crate::positions::handlers as positions;
use crate::reports::handlers as reports;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Applicant identity
        .route("/register", post(applicants::handle_register))
        .route("/login", post(applicants::handle_login))
        .route("/logout", post(applicants::handle_logout))
        // Positions
        .route(
            "/post_position_form",
            get(positions::handle_position_form_get).post(positions::handle_create_position),
        )
        .route("/positions", get(positions::handle_list_positions))
        .route("/positions/:id", post(applications::handle_apply))
        // HR review
        .route("/applications", get(applications::handle_list_unreviewed))
        .route(
            "/applications/:id",
            post(applications::handle_update_recommendation),
        )
        .route(
            "/applications_filled",
            get(applications::handle_list_reviewed),
        )
        .route("/applications_filled/:id", post(offers::handle_send_offer))
        // Offers
        .route("/acceptance/:id", post(offers::handle_acceptance))
        .route("/offers", get(offers::handle_my_offers))
        // Reports
        .route(
            "/applicants_with_applications",
            get(reports::handle_applicants_with_applications),
        )
        .route(
            "/positions_with_three_applicants",
            get(reports::handle_positions_with_three_applicants),
        )
        .route(
            "/applicants_with_offers",
            get(reports::handle_applicants_with_offers),
        )
        .with_state(state)
}
