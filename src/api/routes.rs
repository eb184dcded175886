//! ルーティング定義モジュール
//! エンドポイントとハンドラーの対応付け、ミドルウェアの適用を行う。

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;

use super::{
    handlers::{
        create_game, endpoint_not_found, get_game, health_check, list_games, replay_game,
        step_game, AppState,
    },
    middleware::{cors, logging},
};
use crate::config::ServerConfig;

/// 全エンドポイントのルーターを作成する
/// 一致しないパスはJSONの404を返す
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/games", get(list_games).post(create_game))
        .route("/games/:id", get(get_game))
        .route("/games/:id/replay", get(replay_game))
        .route("/step/:id", post(step_game))
        .route("/health", get(health_check))
        .fallback(endpoint_not_found)
}

/// 設定に応じてミドルウェアを付けたアプリケーションを組み立てる
pub fn create_app(state: AppState, config: &ServerConfig) -> Router {
    let mut router = create_router();

    if config.enable_cors {
        router = router.layer(middleware::from_fn(cors));
    }
    if config.enable_logging {
        router = router.layer(ServiceBuilder::new().layer(middleware::from_fn(logging)));
    }

    router.with_state(state)
}
