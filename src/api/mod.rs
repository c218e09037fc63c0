/*
 * REST API module exposing wallet, token, swap and oracle actions
 */

use rocket::http::{ContentType, Status};
use rocket::serde::json::Json;
use rocket::{get, post, routes, State};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;
use crate::clock::ClockReading;
use crate::contracts::EndTimeSupport;
use crate::models::{Balances, NetVolumeReport, NvoError, SessionInfo, TimeRange, TransactionOutcome};
use crate::service::DemoService;

pub struct ApiState {
    pub service: Arc<DemoService>,
    pub clock: watch::Receiver<ClockReading>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct MintRequest {
    pub token: String,
    pub amount: String,
}

#[derive(Debug, Deserialize)]
pub struct SwapRequest {
    pub token_in: String,
    pub amount: String,
}

#[derive(Debug, Serialize)]
pub struct OracleInfo {
    pub pool_id: String,
    pub end_time_support: EndTimeSupport,
}

type ApiError = rocket::response::status::Custom<Json<ErrorBody>>;
type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

fn status_for(error: &NvoError) -> Status {
    match error {
        NvoError::InvalidAmount(_)
        | NvoError::InvalidAddress(_)
        | NvoError::UnknownToken(_)
        | NvoError::MissingRequiredArgument(_)
        | NvoError::UnsupportedArgument(_) => Status::BadRequest,
        NvoError::NotConnected => Status::Unauthorized,
        NvoError::RemoteCallFailed(_) => Status::BadGateway,
        _ => Status::InternalServerError,
    }
}

fn api_error(error: NvoError) -> ApiError {
    rocket::response::status::Custom(
        status_for(&error),
        Json(ErrorBody {
            error: error.kind().to_string(),
            message: error.to_string(),
        }),
    )
}

#[get("/api/v1/session")]
pub async fn get_session(state: &State<ApiState>) -> Json<SessionInfo> {
    Json(state.service.session_info().await)
}

#[post("/api/v1/session/connect")]
pub async fn connect(state: &State<ApiState>) -> ApiResult<SessionInfo> {
    state.service.connect().await.map(Json).map_err(api_error)
}

#[post("/api/v1/session/disconnect")]
pub async fn disconnect(state: &State<ApiState>) -> Json<SessionInfo> {
    Json(state.service.disconnect().await)
}

#[get("/api/v1/balances")]
pub async fn get_balances(state: &State<ApiState>) -> ApiResult<Balances> {
    state.service.balances().await.map(Json).map_err(api_error)
}

#[post("/api/v1/mint", format = "json", data = "<request>")]
pub async fn mint(request: Json<MintRequest>, state: &State<ApiState>) -> ApiResult<TransactionOutcome> {
    state
        .service
        .mint(&request.token, &request.amount)
        .await
        .map(Json)
        .map_err(api_error)
}

#[post("/api/v1/swap", format = "json", data = "<request>")]
pub async fn swap(request: Json<SwapRequest>, state: &State<ApiState>) -> ApiResult<TransactionOutcome> {
    state
        .service
        .swap(&request.token_in, &request.amount)
        .await
        .map(Json)
        .map_err(api_error)
}

#[get("/api/v1/net-volume?<start>&<end>")]
pub async fn get_net_volume(start: u64, end: Option<u64>, state: &State<ApiState>) -> ApiResult<NetVolumeReport> {
    state
        .service
        .net_volume(TimeRange::new(start, end))
        .await
        .map(Json)
        .map_err(api_error)
}

#[get("/api/v1/oracle")]
pub fn get_oracle(state: &State<ApiState>) -> Json<OracleInfo> {
    Json(OracleInfo {
        pool_id: state.service.pool_key().id_hex(),
        end_time_support: state.service.end_time_support(),
    })
}

#[get("/api/v1/clock")]
pub fn get_clock(state: &State<ApiState>) -> Json<ClockReading> {
    Json(*state.clock.borrow())
}

#[get("/metrics")]
pub fn get_metrics(state: &State<ApiState>) -> std::result::Result<(ContentType, String), Status> {
    state
        .service
        .metrics()
        .render()
        .map(|body| (ContentType::Plain, body))
        .map_err(|_| Status::InternalServerError)
}

#[must_use]
pub fn create_rocket(state: ApiState) -> rocket::Rocket<rocket::Build> {
    rocket::build().manage(state).mount(
        "/",
        routes![
            health_check,
            get_session,
            connect,
            disconnect,
            get_balances,
            mint,
            swap,
            get_net_volume,
            get_oracle,
            get_clock,
            get_metrics
        ],
    )
}

#[get("/health")]
pub async fn health_check() -> &'static str {
    "OK"
}
