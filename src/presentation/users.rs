use crate::domain::user::{CreateUser, Credentials};
use crate::presentation::handlers::{ApiError, AppState};
use actix_web::{HttpResponse, web};
use tracing::{info, instrument};

#[instrument(skip(state, req), fields(email = %req.email))]
pub async fn register(
    state: web::Data<AppState>,
    req: web::Json<CreateUser>,
) -> Result<HttpResponse, ApiError> {
    info!("Registration request received");
    let user = state.user_service.register(req.into_inner().into()).await?;
    Ok(HttpResponse::Created().json(user))
}

#[instrument(skip(state, req), fields(email = %req.email))]
pub async fn authenticate(
    state: web::Data<AppState>,
    req: web::Json<Credentials>,
) -> Result<HttpResponse, ApiError> {
    info!("Authentication request received");
    let credentials = req.into_inner();
    let user = state
        .user_service
        .authenticate(&credentials.email, &credentials.password)
        .await?;
    Ok(HttpResponse::Ok().json(user))
}
