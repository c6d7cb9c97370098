use crate::application::entry_service::EntryService;
use crate::application::user_service::UserService;
use crate::data::entry_repository::InMemoryEntryRepository;
use crate::data::user_repository::InMemoryUserRepository;
use crate::domain::error::DomainError;
use crate::presentation::{entries, users};
use actix_web::{HttpResponse, ResponseError, http::StatusCode, web};
use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

pub struct AppState {
    pub user_service: UserService<InMemoryUserRepository>,
    pub entry_service: EntryService<InMemoryEntryRepository>,
}

// Uniform error response format
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    details: serde_json::Value,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Business rule violated: {0}")]
    BusinessRule(String),
    #[error("Authentication failed: {0}")]
    Authentication(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn message(&self) -> &str {
        match self {
            ApiError::BusinessRule(msg)
            | ApiError::Authentication(msg)
            | ApiError::NotFound(msg)
            | ApiError::Internal(msg) => msg,
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BusinessRule(_) => StatusCode::BAD_REQUEST,
            ApiError::Authentication(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_msg = self.to_string();

        match self {
            ApiError::Internal(_) => error!(error = %error_msg, status = %status, "Internal error"),
            _ => warn!(error = %error_msg, status = %status, "Request rejected"),
        }

        HttpResponse::build(status).json(ErrorResponse {
            error: error_msg,
            details: serde_json::json!({ "message": self.message() }),
        })
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::BusinessRule(msg) => ApiError::BusinessRule(msg),
            DomainError::Authentication(msg) => ApiError::Authentication(msg),
            DomainError::NotFound(msg) => ApiError::NotFound(msg),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<DomainError>() {
            Ok(domain) => domain.into(),
            Err(err) => ApiError::Internal(err.to_string()),
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    timestamp: String,
}

#[instrument]
pub async fn health_check() -> HttpResponse {
    info!("Health check requested");
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Mounts every route under `/api`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health_check))
            .route("/users", web::post().to(users::register))
            .route("/users/authenticate", web::post().to(users::authenticate))
            .route("/entries", web::post().to(entries::create_entry))
            .route("/entries", web::get().to(entries::search_entries))
            .route("/entries/{id}", web::put().to(entries::update_entry))
            .route("/entries/{id}", web::delete().to(entries::delete_entry))
            .route(
                "/entries/{id}/status",
                web::put().to(entries::update_entry_status),
            ),
    );
}
