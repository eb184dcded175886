//! 対局記録のHTTP APIモジュール
//! 保存済み対局の一覧・取得・保存・リプレイをJSONで提供する。

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use handlers::AppState;
pub use routes::{create_app, create_router};
