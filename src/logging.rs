//! tracingによるログ出力の初期化

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// グローバルなsubscriberを設定する
/// RUST_LOGがあれば設定ファイルのフィルタより優先する。
/// 出力は対話CLIの表示と混ざらないよう標準エラーへ
pub fn init(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // 二重初期化（テストなど）は無視する
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
