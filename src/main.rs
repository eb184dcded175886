//! Tic-Tac-Toeのエントリポイント
//! 設定読み込み、ログ初期化、ストレージ生成を行い、
//! 対話メニューまたはHTTPサーバーを起動する。

use std::{io, path::PathBuf, process, sync::Arc};

use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};
use tictactoe::{
    api::{create_app, AppState},
    cli::CliApp,
    config::Config,
    logging,
    storage::{open_repository, GameRepository},
};
use tokio::net::TcpListener;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "tictactoe", version, about = "N×N tic-tac-toe against the computer")]
struct Args {
    /// 新しい対局を始める
    #[arg(short, long)]
    new: bool,

    /// 保存された対局の一覧
    #[arg(short, long)]
    list: bool,

    /// 指定IDの対局をリプレイする
    #[arg(short, long, value_name = "ID")]
    replay: Option<u64>,

    /// HTTP APIサーバーとして起動する
    #[arg(long)]
    serve: bool,

    /// 設定ファイルのパス
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    // 設定ファイルと環境変数から統合設定を読み込み
    let loaded = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            eprintln!("設定エラー: {}", e);
            process::exit(1);
        }
    };
    if let Err(e) = config.validate() {
        eprintln!("設定エラー: {}", e);
        process::exit(1);
    }

    logging::init(&config.logging);
    let repository = open_repository(&config.storage);

    if args.serve {
        let runtime = match tokio::runtime::Runtime::new() {
            Ok(runtime) => runtime,
            Err(e) => {
                eprintln!("ランタイム作成失敗: {}", e);
                process::exit(1);
            }
        };
        if let Err(e) = runtime.block_on(serve(&config, repository)) {
            error!(%e, "Server stopped");
            process::exit(1);
        }
        return;
    }

    let stdin = io::stdin();
    let mut app = CliApp::new(
        repository,
        config.replay.delay,
        stdin.lock(),
        io::stdout(),
        StdRng::from_entropy(),
    );

    let result = if args.new {
        app.new_game().map(|_| ())
    } else if args.list {
        app.list_games()
    } else if let Some(id) = args.replay {
        app.replay_game(id)
    } else {
        app.run_menu()
    };

    if let Err(e) = result {
        eprintln!("エラー: {}", e);
        process::exit(1);
    }
}

async fn serve(config: &Config, repository: Arc<dyn GameRepository>) -> io::Result<()> {
    let app = create_app(AppState::new(repository), &config.server);

    let bind_address = config.bind_address();
    let listener = TcpListener::bind(&bind_address).await?;
    info!(%bind_address, "Tic-Tac-Toe API server started");

    axum::serve(listener, app).await
}
