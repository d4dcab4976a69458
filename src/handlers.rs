use crate::config::Config;
use crate::errors::{AppError, ResultExt};
use crate::models::{
    validate_address, CreatePhoneRequest, ErrorResponse, PhoneRecord, UpdatePhoneRequest,
    MAX_ADDRESS_LEN,
};
use crate::phone::{normalize_phone_in, CanonicalPhone};
use crate::repository::PhoneRepository;
use crate::service::PhoneService;
use crate::store::KvStore;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Phone → address operations.
    pub service: PhoneService,
    /// Application configuration.
    pub config: Config,
}

impl AppState {
    /// Wires repository and service on top of `store`.
    pub fn new(store: Arc<dyn KvStore>, config: Config) -> Self {
        let repository = PhoneRepository::new(store, config.key_prefix.clone());
        Self {
            service: PhoneService::new(repository),
            config,
        }
    }
}

/// Normalizes a phone from a body or path against the configured region.
fn normalize(state: &AppState, raw: &str) -> Result<CanonicalPhone, AppError> {
    normalize_phone_in(state.config.default_region, raw).map_err(|e| {
        tracing::warn!("❌ Rejected phone '{}': {}", raw, e);
        AppError::from(e)
    })
}

fn check_address(address: &str) -> Result<(), AppError> {
    validate_address(address).map_err(|len| {
        AppError::Validation(format!(
            "Address must be at most {} characters, got {}",
            MAX_ADDRESS_LEN, len
        ))
    })
}

/// Health check endpoint.
///
/// Returns the service status and version. Does not touch the store.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// Readiness check endpoint.
///
/// Returns 200 when the store answers a ping, 503 otherwise.
pub async fn ready(State(state): State<Arc<AppState>>) -> (StatusCode, Json<serde_json::Value>) {
    match state.service.ping().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ready" }))),
        Err(e) => {
            tracing::warn!("Readiness check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable", "error": e.to_string() })),
            )
        }
    }
}

/// POST /phones
///
/// Creates a phone → address record. The body phone is normalized first.
///
/// # Returns
///
/// * `201` with the stored record, `409` if the phone already exists,
///   `422` if the phone or address is invalid.
#[utoipa::path(
    post,
    path = "/phones",
    request_body = CreatePhoneRequest,
    responses(
        (status = 201, description = "Record created", body = PhoneRecord),
        (status = 409, description = "Phone already exists", body = ErrorResponse),
        (status = 422, description = "Invalid phone or address", body = ErrorResponse)
    ),
    tag = "phones"
)]
pub async fn create_phone(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreatePhoneRequest>,
) -> Result<(StatusCode, Json<PhoneRecord>), AppError> {
    let phone = normalize(&state, &body.phone)?;
    check_address(&body.address)?;

    let record = PhoneRecord {
        phone,
        address: body.address,
    };

    let created = state
        .service
        .create(&record)
        .await
        .with_context(|| format!("creating record for {}", record.phone))?;
    if !created {
        tracing::info!("POST /phones - {} already exists", record.phone);
        return Err(AppError::Conflict("Phone already exists".to_string()));
    }

    tracing::info!("POST /phones - created {}", record.phone);
    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /phones/:phone
///
/// Looks up the address for a phone. The path phone is normalized first.
#[utoipa::path(
    get,
    path = "/phones/{phone}",
    params(("phone" = String, Path, description = "Phone number in any common spelling")),
    responses(
        (status = 200, description = "Record found", body = PhoneRecord),
        (status = 404, description = "Phone not found", body = ErrorResponse),
        (status = 422, description = "Invalid phone", body = ErrorResponse)
    ),
    tag = "phones"
)]
pub async fn get_phone(
    State(state): State<Arc<AppState>>,
    Path(phone): Path<String>,
) -> Result<Json<PhoneRecord>, AppError> {
    let phone = normalize(&state, &phone)?;
    tracing::debug!("GET /phones/{}", phone);

    state
        .service
        .get_by_phone(&phone)
        .await
        .with_context(|| format!("reading record for {}", phone))?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Phone not found".to_string()))
}

/// PUT /phones/:phone
///
/// Replaces the address of an existing record.
#[utoipa::path(
    put,
    path = "/phones/{phone}",
    params(("phone" = String, Path, description = "Phone number in any common spelling")),
    request_body = UpdatePhoneRequest,
    responses(
        (status = 200, description = "Record updated", body = PhoneRecord),
        (status = 404, description = "Phone not found", body = ErrorResponse),
        (status = 422, description = "Invalid phone or address", body = ErrorResponse)
    ),
    tag = "phones"
)]
pub async fn update_phone(
    State(state): State<Arc<AppState>>,
    Path(phone): Path<String>,
    Json(body): Json<UpdatePhoneRequest>,
) -> Result<Json<PhoneRecord>, AppError> {
    let phone = normalize(&state, &phone)?;
    check_address(&body.address)?;

    let updated = state
        .service
        .update(&phone, &body.address)
        .await
        .with_context(|| format!("updating record for {}", phone))?;
    if !updated {
        return Err(AppError::NotFound("Phone not found".to_string()));
    }

    tracing::info!("PUT /phones/{} - address updated", phone);
    Ok(Json(PhoneRecord {
        phone,
        address: body.address,
    }))
}

/// DELETE /phones/:phone
///
/// Removes the record for a phone.
#[utoipa::path(
    delete,
    path = "/phones/{phone}",
    params(("phone" = String, Path, description = "Phone number in any common spelling")),
    responses(
        (status = 204, description = "Record deleted"),
        (status = 404, description = "Phone not found", body = ErrorResponse),
        (status = 422, description = "Invalid phone", body = ErrorResponse)
    ),
    tag = "phones"
)]
pub async fn delete_phone(
    State(state): State<Arc<AppState>>,
    Path(phone): Path<String>,
) -> Result<StatusCode, AppError> {
    let phone = normalize(&state, &phone)?;

    let deleted = state
        .service
        .delete(&phone)
        .await
        .with_context(|| format!("deleting record for {}", phone))?;
    if !deleted {
        return Err(AppError::NotFound("Phone not found".to_string()));
    }

    tracing::info!("DELETE /phones/{}", phone);
    Ok(StatusCode::NO_CONTENT)
}
