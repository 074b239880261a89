//! Pet-sitting marketplace API.
//!
//! A REST API where pet owners book visits with sitters and sitters manage
//! their profiles, availability and job responses.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries)
//! - **Authentication**: Argon2 password hashes, HS256 JWT bearer tokens
//! - **Format**: JSON requests/responses

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;

use axum::{
    Router, middleware as axum_middleware,
    routing::{delete, get, patch, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Build the HTTP router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    // Everything here needs a bearer token
    let authenticated_routes = Router::new()
        .route("/api/v1/auth/me", get(handlers::auth::me))
        // Pets
        .route(
            "/api/v1/pets",
            post(handlers::pets::create_pet).get(handlers::pets::list_pets),
        )
        .route(
            "/api/v1/pets/{id}",
            get(handlers::pets::get_pet)
                .patch(handlers::pets::update_pet)
                .delete(handlers::pets::delete_pet),
        )
        // Sitter profiles
        .route(
            "/api/v1/sitter-profiles",
            post(handlers::sitter_profiles::create_profile)
                .get(handlers::sitter_profiles::list_profiles),
        )
        .route(
            "/api/v1/sitter-profiles/me",
            get(handlers::sitter_profiles::get_my_profile),
        )
        .route(
            "/api/v1/sitter-profiles/{id}",
            get(handlers::sitter_profiles::get_profile)
                .patch(handlers::sitter_profiles::update_profile),
        )
        .route(
            "/api/v1/sitter-profiles/{id}/availability",
            post(handlers::sitter_profiles::add_availability)
                .get(handlers::sitter_profiles::list_availability),
        )
        .route(
            "/api/v1/sitter-profiles/{id}/availability/{availability_id}",
            delete(handlers::sitter_profiles::delete_availability),
        )
        .route(
            "/api/v1/sitter-profiles/{id}/slots",
            get(handlers::sitter_profiles::list_slots),
        )
        .route(
            "/api/v1/sitter-profiles/{id}/reviews",
            get(handlers::sitter_profiles::list_reviews),
        )
        // Visits
        .route(
            "/api/v1/visits",
            post(handlers::visits::create_visit).get(handlers::visits::list_visits),
        )
        .route("/api/v1/visits/{id}", get(handlers::visits::get_visit))
        .route(
            "/api/v1/visits/{id}/status",
            patch(handlers::visits::update_visit_status),
        )
        .route(
            "/api/v1/visits/{id}/photos",
            post(handlers::visits::add_photo).get(handlers::visits::list_photos),
        )
        .route(
            "/api/v1/visits/{id}/review",
            post(handlers::visits::create_review),
        )
        .route(
            "/api/v1/visits/{id}/messages",
            post(handlers::chats::post_message).get(handlers::chats::list_messages),
        )
        .route(
            "/api/v1/visits/{id}/transactions",
            get(handlers::visits::list_transactions),
        )
        // Notifications
        .route(
            "/api/v1/notifications",
            get(handlers::notifications::list_notifications),
        )
        .route(
            "/api/v1/notifications/{id}/read",
            post(handlers::notifications::mark_read),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::auth_middleware,
        ));

    Router::new()
        // Public routes
        .route("/health", get(handlers::health::health_check))
        .route("/api/v1/auth/register", post(handlers::auth::register))
        .route("/api/v1/auth/login", post(handlers::auth::login))
        .merge(authenticated_routes)
        .layer(TraceLayer::new_for_http())
        // The SPA is served from a different origin
        .layer(CorsLayer::permissive())
        .with_state(state)
}
