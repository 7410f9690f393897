use pos_server::{Config, Server, ServerState, print_banner, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 环境变量 (.env 可选)
    dotenv::dotenv().ok();

    // 2. 加载配置 + 日志
    let config = Config::from_env();
    setup_environment(&config);

    print_banner();
    tracing::info!(
        environment = %config.environment,
        port = config.http_port,
        "🍛 POS server starting..."
    );

    // 3. 初始化服务器状态 (--memory: 全内存模式)
    let in_memory = std::env::args().any(|arg| arg == "--memory");
    let state = if in_memory {
        tracing::warn!("Running in memory mode, orders are lost on exit");
        ServerState::initialize_in_memory(&config).await?
    } else {
        ServerState::initialize(&config).await?
    };

    // 4. 启动 HTTP 服务器
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
