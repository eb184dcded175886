//! 対局記録APIのリクエストハンドラー
//! 一覧・取得・保存・リプレイの各エンドポイントを実装する。
//! ストレージ操作はファイルI/Oを伴うためブロッキングスレッドで実行する。

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{StatusCode, Uri},
    response::Json,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use super::dto::{
    parse_game_record, ApiError, ApiResult, CreatedResponse, ErrorResponse, ReplayFrameResponse,
    ReplayResponse,
};
use crate::{
    error::{GameError, PersistenceError},
    game::Replay,
    storage::{GameRepository, InMemoryRepository, StoredGame},
};

type ApiResponse<T> = std::result::Result<T, (StatusCode, Json<ErrorResponse>)>;

/// 全ハンドラーで共有するアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn GameRepository>,
}

impl AppState {
    pub fn new(repository: Arc<dyn GameRepository>) -> Self {
        Self { repository }
    }

    /// メモリ上のストレージで状態を作成する（テスト用）
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryRepository::new()))
    }

    /// ストレージ操作をブロッキングスレッドで実行する
    async fn with_repository<T, F>(&self, operation: F) -> ApiResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn GameRepository) -> ApiResult<T> + Send + 'static,
    {
        let repository = Arc::clone(&self.repository);
        tokio::task::spawn_blocking(move || operation(repository.as_ref()))
            .await
            .map_err(|e| {
                ApiError::from(PersistenceError::Storage {
                    message: format!("storage task failed: {e}"),
                })
            })?
    }
}

/// 数値でないIDは存在しないエンドポイントとして扱う
fn parse_game_id(path: Result<Path<u64>, PathRejection>, uri: &Uri) -> ApiResult<u64> {
    path.map(|Path(id)| id)
        .map_err(|_| ApiError::EndpointNotFound {
            path: uri.path().to_string(),
        })
}

/// GET /games
pub async fn list_games(State(state): State<AppState>) -> ApiResponse<Json<Vec<StoredGame>>> {
    let games = state
        .with_repository(|repository| Ok(repository.list_games()?))
        .await?;
    Ok(Json(games))
}

/// GET /games/:id
pub async fn get_game(
    State(state): State<AppState>,
    uri: Uri,
    path: Result<Path<u64>, PathRejection>,
) -> ApiResponse<Json<StoredGame>> {
    let game_id = parse_game_id(path, &uri)?;
    let game = state
        .with_repository(move |repository| {
            repository
                .get_game(game_id)?
                .ok_or_else(|| GameError::NotFound { game_id }.into())
        })
        .await?;
    Ok(Json(game))
}

/// POST /games
/// 必須フィールドと手の記録を検証してから保存する
pub async fn create_game(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResponse<(StatusCode, Json<CreatedResponse>)> {
    let Json(payload) = payload.map_err(|rejection| ApiError::InvalidJson {
        reason: rejection.body_text(),
    })?;

    let record = match parse_game_record(payload) {
        Ok(record) => record,
        Err(err) => {
            warn!(code = err.error_code(), %err, "Rejected game payload");
            return Err(err.into());
        }
    };

    let id = state
        .with_repository(move |repository| Ok(repository.save_game(record)?))
        .await?;
    info!(id, "Game stored via API");
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// GET /games/:id/replay
/// 盤面サイズは手の記録から推定する
pub async fn replay_game(
    State(state): State<AppState>,
    uri: Uri,
    path: Result<Path<u64>, PathRejection>,
) -> ApiResponse<Json<ReplayResponse>> {
    let game_id = parse_game_id(path, &uri)?;
    let moves = state
        .with_repository(move |repository| Ok(repository.load_moves(game_id)?))
        .await?;
    let replay = Replay::new(moves).map_err(ApiError::from)?;

    let frames = replay
        .frames()
        .map(|frame| frame.map(ReplayFrameResponse::from))
        .collect::<Result<Vec<_>, _>>()
        .map_err(ApiError::from)?;

    Ok(Json(ReplayResponse {
        game_id,
        size: replay.size(),
        frames,
    }))
}

/// POST /step/:id
/// 1手ずつ進める対局は未対応
pub async fn step_game(Path(_game_id): Path<String>) -> ApiResponse<Json<Value>> {
    Err(ApiError::StepNotImplemented.into())
}

/// どのルートにも一致しないリクエスト
pub async fn endpoint_not_found(uri: Uri) -> (StatusCode, Json<ErrorResponse>) {
    ApiError::EndpointNotFound {
        path: uri.path().to_string(),
    }
    .into()
}

pub async fn health_check() -> &'static str {
    "Tic-Tac-Toe API Server is running"
}
