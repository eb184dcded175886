//! 対局API データ転送オブジェクト (DTO) とエラー変換

use axum::{http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GameError;
use crate::game::{Move, ReplayFrame, Symbol};
use crate::storage::GameRecord;

/// POST /games で必須のフィールド
/// winner は null を許すがキー自体は省略できない
pub const REQUIRED_FIELDS: [&str; 6] = ["date", "player_name", "human_symbol", "winner", "size", "moves"];

/// POST /games のリクエストボディを検証して記録に変換する
pub fn parse_game_record(payload: Value) -> ApiResult<GameRecord> {
    let object = payload.as_object().ok_or_else(|| ApiError::InvalidPayload {
        reason: "request body must be a JSON object".to_string(),
    })?;

    if let Some(missing) = REQUIRED_FIELDS.iter().find(|field| !object.contains_key(**field)) {
        return Err(ApiError::MissingField {
            field: missing.to_string(),
        });
    }

    let record: GameRecord = serde_json::from_value(payload).map_err(|e| ApiError::InvalidPayload {
        reason: e.to_string(),
    })?;
    record.validate()?;
    Ok(record)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: u64,
}

/// リプレイの1コマ
#[derive(Debug, Serialize)]
pub struct ReplayFrameResponse {
    #[serde(rename = "move")]
    pub mv: Move,
    pub board: Vec<Vec<Option<Symbol>>>,
}

impl From<ReplayFrame> for ReplayFrameResponse {
    fn from(frame: ReplayFrame) -> Self {
        Self {
            mv: frame.mv,
            board: frame.board.to_symbols(),
        }
    }
}

/// GET /games/:id/replay のレスポンス
#[derive(Debug, Serialize)]
pub struct ReplayResponse {
    pub game_id: u64,
    /// 手の記録から推定した盤面サイズ
    pub size: usize,
    pub frames: Vec<ReplayFrameResponse>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

/// HTTP層のエラー
/// エンジンのエラーはそれぞれ別のエラーコードに変換する
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid JSON: {reason}")]
    InvalidJson { reason: String },

    #[error("Missing field: {field}")]
    MissingField { field: String },

    #[error("Invalid payload: {reason}")]
    InvalidPayload { reason: String },

    #[error("Step-by-step play is not implemented")]
    StepNotImplemented,

    #[error("Endpoint not found: {path}")]
    EndpointNotFound { path: String },

    #[error(transparent)]
    Game(#[from] GameError),
}

impl ApiError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::InvalidJson { .. } => "INVALID_JSON",
            ApiError::MissingField { .. } => "MISSING_FIELD",
            ApiError::InvalidPayload { .. } => "INVALID_PAYLOAD",
            ApiError::StepNotImplemented => "STEP_NOT_IMPLEMENTED",
            ApiError::EndpointNotFound { .. } => "ENDPOINT_NOT_FOUND",
            ApiError::Game(err) => match err {
                GameError::InvalidSize { .. } => "INVALID_SIZE",
                GameError::OutOfBounds { .. } => "OUT_OF_BOUNDS",
                GameError::CellOccupied { .. } => "CELL_OCCUPIED",
                GameError::GameOver => "GAME_OVER",
                GameError::EmptyLog => "EMPTY_LOG",
                GameError::InvalidMoveLog { .. } => "INVALID_MOVE_LOG",
                GameError::NotFound { .. } => "GAME_NOT_FOUND",
                GameError::Player { .. } => "PLAYER_ERROR",
                GameError::Persistence { .. } => "STORAGE_ERROR",
            },
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidJson { .. } => StatusCode::BAD_REQUEST,
            ApiError::MissingField { .. } => StatusCode::BAD_REQUEST,
            ApiError::InvalidPayload { .. } => StatusCode::BAD_REQUEST,
            ApiError::StepNotImplemented => StatusCode::BAD_REQUEST,
            ApiError::EndpointNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Game(err) => match err {
                GameError::InvalidSize { .. } => StatusCode::BAD_REQUEST,
                GameError::OutOfBounds { .. } => StatusCode::BAD_REQUEST,
                GameError::CellOccupied { .. } => StatusCode::BAD_REQUEST,
                GameError::GameOver => StatusCode::CONFLICT,
                GameError::EmptyLog => StatusCode::UNPROCESSABLE_ENTITY,
                GameError::InvalidMoveLog { .. } => StatusCode::BAD_REQUEST,
                GameError::NotFound { .. } => StatusCode::NOT_FOUND,
                GameError::Player { .. } => StatusCode::BAD_REQUEST,
                GameError::Persistence { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl From<crate::error::PersistenceError> for ApiError {
    fn from(err: crate::error::PersistenceError) -> Self {
        ApiError::Game(err.into())
    }
}

impl From<ApiError> for (StatusCode, Json<ErrorResponse>) {
    fn from(err: ApiError) -> Self {
        let status_code = err.status_code();
        let error_response = ErrorResponse::new(err.error_code(), err.to_string());
        (status_code, Json(error_response))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
