use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::access::Principal;
use super::auth::SessionToken;
use super::domain::{
    Credentials, InquirySubmission, Property, PropertyDraft, PropertyId, PropertyInquiry,
    PropertyStatus, PropertyUpdate, Registration, User,
};
use super::search::{is_unset, Page, PriceRange, PropertyQuery, SortKey, Threshold};
use super::service::{MarketplaceError, MarketplaceService, SessionGrant};
use super::store::MarketplaceStore;
use super::validation::ValidationReport;

type SharedService<S> = Arc<MarketplaceService<S>>;
type ApiResult<T> = Result<T, MarketplaceError>;

/// Router builder exposing the listing, inquiry, and account endpoints.
pub fn marketplace_router<S>(service: SharedService<S>) -> Router
where
    S: MarketplaceStore + 'static,
{
    Router::new()
        .route("/api/register", post(register_handler::<S>))
        .route("/api/login", post(login_handler::<S>))
        .route("/api/logout", post(logout_handler::<S>))
        .route("/api/user", get(current_user_handler::<S>))
        .route(
            "/api/properties",
            get(list_properties_handler::<S>).post(create_property_handler::<S>),
        )
        .route(
            "/api/properties/:id",
            get(property_handler::<S>)
                .put(update_property_handler::<S>)
                .delete(delete_property_handler::<S>),
        )
        .route(
            "/api/properties/:id/inquiries",
            post(submit_inquiry_handler::<S>),
        )
        .route("/api/search/properties", get(search_handler::<S>))
        .route("/api/seller/properties", get(seller_properties_handler::<S>))
        .route(
            "/api/seller/properties/:id/inquiries",
            get(property_inquiries_handler::<S>),
        )
        .route("/api/seller/inquiries", get(seller_inquiries_handler::<S>))
        .with_state(service)
}

fn bearer_token(headers: &HeaderMap) -> Option<SessionToken> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))?
        .trim();
    (!token.is_empty()).then(|| SessionToken::from(token))
}

async fn caller<S>(
    service: &MarketplaceService<S>,
    headers: &HeaderMap,
) -> ApiResult<Option<Principal>>
where
    S: MarketplaceStore + 'static,
{
    service.principal(bearer_token(headers).as_ref()).await
}

fn property_id(path: Result<Path<u64>, PathRejection>) -> ApiResult<PropertyId> {
    path.map(|Path(id)| PropertyId(id)).map_err(|rejection| {
        MarketplaceError::Validation(ValidationReport::single("id", rejection.body_text()))
    })
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| {
            MarketplaceError::Validation(ValidationReport::single("body", rejection.body_text()))
        })
}

pub(crate) async fn register_handler<S>(
    State(service): State<SharedService<S>>,
    payload: Result<Json<Registration>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SessionGrant>)>
where
    S: MarketplaceStore + 'static,
{
    let grant = service.register(body(payload)?).await?;
    Ok((StatusCode::CREATED, Json(grant)))
}

pub(crate) async fn login_handler<S>(
    State(service): State<SharedService<S>>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> ApiResult<Json<SessionGrant>>
where
    S: MarketplaceStore + 'static,
{
    Ok(Json(service.login(body(payload)?).await?))
}

pub(crate) async fn logout_handler<S>(
    State(service): State<SharedService<S>>,
    headers: HeaderMap,
) -> ApiResult<StatusCode>
where
    S: MarketplaceStore + 'static,
{
    if let Some(token) = bearer_token(&headers) {
        service.logout(&token).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn current_user_handler<S>(
    State(service): State<SharedService<S>>,
    headers: HeaderMap,
) -> ApiResult<Json<User>>
where
    S: MarketplaceStore + 'static,
{
    let caller = caller(&service, &headers).await?;
    Ok(Json(service.current_user(caller.as_ref())?))
}

pub(crate) async fn list_properties_handler<S>(
    State(service): State<SharedService<S>>,
) -> ApiResult<Json<Vec<Property>>>
where
    S: MarketplaceStore + 'static,
{
    Ok(Json(service.list_properties()?))
}

pub(crate) async fn property_handler<S>(
    State(service): State<SharedService<S>>,
    path: Result<Path<u64>, PathRejection>,
) -> ApiResult<Json<Property>>
where
    S: MarketplaceStore + 'static,
{
    Ok(Json(service.property(property_id(path)?)?))
}

pub(crate) async fn create_property_handler<S>(
    State(service): State<SharedService<S>>,
    headers: HeaderMap,
    payload: Result<Json<PropertyDraft>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Property>)>
where
    S: MarketplaceStore + 'static,
{
    let caller = caller(&service, &headers).await?;
    let property = service.create_property(caller.as_ref(), body(payload)?)?;
    Ok((StatusCode::CREATED, Json(property)))
}

pub(crate) async fn update_property_handler<S>(
    State(service): State<SharedService<S>>,
    headers: HeaderMap,
    path: Result<Path<u64>, PathRejection>,
    payload: Result<Json<PropertyUpdate>, JsonRejection>,
) -> ApiResult<Json<Property>>
where
    S: MarketplaceStore + 'static,
{
    let id = property_id(path)?;
    let caller = caller(&service, &headers).await?;
    let updated = service.update_property_with(caller.as_ref(), id, || body(payload))?;
    Ok(Json(updated))
}

pub(crate) async fn delete_property_handler<S>(
    State(service): State<SharedService<S>>,
    headers: HeaderMap,
    path: Result<Path<u64>, PathRejection>,
) -> ApiResult<StatusCode>
where
    S: MarketplaceStore + 'static,
{
    let id = property_id(path)?;
    let caller = caller(&service, &headers).await?;
    service.delete_property(caller.as_ref(), id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn submit_inquiry_handler<S>(
    State(service): State<SharedService<S>>,
    headers: HeaderMap,
    path: Result<Path<u64>, PathRejection>,
    payload: Result<Json<InquirySubmission>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<PropertyInquiry>)>
where
    S: MarketplaceStore + 'static,
{
    let id = property_id(path)?;
    let caller = caller(&service, &headers).await?;
    let inquiry = service.submit_inquiry_with(caller.as_ref(), id, || body(payload))?;
    Ok((StatusCode::CREATED, Json(inquiry)))
}

pub(crate) async fn seller_properties_handler<S>(
    State(service): State<SharedService<S>>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<Property>>>
where
    S: MarketplaceStore + 'static,
{
    let caller = caller(&service, &headers).await?;
    Ok(Json(service.seller_properties(caller.as_ref())?))
}

pub(crate) async fn seller_inquiries_handler<S>(
    State(service): State<SharedService<S>>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<PropertyInquiry>>>
where
    S: MarketplaceStore + 'static,
{
    let caller = caller(&service, &headers).await?;
    Ok(Json(service.seller_inquiries(caller.as_ref())?))
}

pub(crate) async fn property_inquiries_handler<S>(
    State(service): State<SharedService<S>>,
    headers: HeaderMap,
    path: Result<Path<u64>, PathRejection>,
) -> ApiResult<Json<Vec<PropertyInquiry>>>
where
    S: MarketplaceStore + 'static,
{
    let id = property_id(path)?;
    let caller = caller(&service, &headers).await?;
    Ok(Json(service.property_inquiries(caller.as_ref(), id)?))
}

/// Browse filters as sent by the listing page.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchParams {
    search: Option<String>,
    price: Option<String>,
    beds: Option<String>,
    baths: Option<String>,
    status: Option<String>,
    #[serde(rename = "type")]
    property_type: Option<String>,
    location: Option<String>,
    feature: Option<String>,
    sort: Option<String>,
    page: Option<usize>,
    page_size: Option<usize>,
}

impl SearchParams {
    fn to_query(&self) -> ApiResult<PropertyQuery> {
        let status = match self.status.as_deref().map(str::trim) {
            None => None,
            Some(raw) if is_unset(raw) => None,
            Some(raw) => Some(raw.parse::<PropertyStatus>().map_err(|message| {
                MarketplaceError::Validation(ValidationReport::single("status", message))
            })?),
        };

        Ok(PropertyQuery {
            search: self.search.clone().unwrap_or_default(),
            price: PriceRange::parse(self.price.as_deref().unwrap_or_default()),
            bedrooms: Threshold::parse(self.beds.as_deref().unwrap_or_default()),
            bathrooms: Threshold::parse(self.baths.as_deref().unwrap_or_default()),
            status,
            property_type: self.property_type.clone(),
            location: self.location.clone(),
            feature: self.feature.clone(),
            sort: SortKey::parse(self.sort.as_deref().unwrap_or_default()),
        })
    }
}

pub(crate) async fn search_handler<S>(
    State(service): State<SharedService<S>>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Page<Property>>>
where
    S: MarketplaceStore + 'static,
{
    let query = params.to_query()?;
    let page = service.search_properties(&query, params.page.unwrap_or(1), params.page_size)?;
    Ok(Json(page))
}

impl IntoResponse for MarketplaceError {
    fn into_response(self) -> Response {
        let status = match &self {
            MarketplaceError::Validation(_) => StatusCode::BAD_REQUEST,
            MarketplaceError::NotFound(_) => StatusCode::NOT_FOUND,
            MarketplaceError::Unauthenticated => StatusCode::UNAUTHORIZED,
            MarketplaceError::Forbidden(_) => StatusCode::FORBIDDEN,
            MarketplaceError::Conflict(_) => StatusCode::CONFLICT,
            MarketplaceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        match self {
            MarketplaceError::Validation(report) => (
                status,
                Json(json!({ "message": "validation failed", "errors": report })),
            )
                .into_response(),
            MarketplaceError::Unauthenticated => (
                status,
                [(header::WWW_AUTHENTICATE, "Bearer")],
                Json(json!({ "message": MarketplaceError::Unauthenticated.to_string() })),
            )
                .into_response(),
            MarketplaceError::Storage(detail) => {
                error!(%detail, "marketplace storage failure");
                (
                    status,
                    Json(json!({ "message": "internal server error" })),
                )
                    .into_response()
            }
            other => (status, Json(json!({ "message": other.to_string() }))).into_response(),
        }
    }
}
