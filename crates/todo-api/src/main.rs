//! todo-api バイナリのエントリポイント
//! Lambda 上では lambda_http で、それ以外ではローカルの HTTP サーバとして起動します。

use infrastructure::{DynamoDbClient, DynamoDbTodoRepository};
use lambda_http::Error;
use shared::{init_tracing, Config};
use std::net::SocketAddr;
use std::sync::Arc;
use todo_api::{app, AppState};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing()?;

    let config = Config::from_env().map_err(|e| {
        error!(error = %e, "設定読み込みエラー");
        e
    })?;

    info!(
        table = %config.table_name,
        environment = %config.environment,
        "todo-api starting"
    );

    // ストアクライアントはプロセスにつき一つ
    let db_client = DynamoDbClient::new(&config).await;
    let state = AppState::new(Arc::new(DynamoDbTodoRepository::new(db_client)));
    let router = app(state);

    if std::env::var("AWS_LAMBDA_RUNTIME_API").is_ok() {
        return lambda_http::run(router).await;
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "server starting");

    axum::serve(listener, router).await?;
    Ok(())
}
