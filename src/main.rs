use shoplist_sync::clients::{create_http_client, GrocyClient, MealieClient};
use shoplist_sync::{api, AppConfig, SyncService};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 本地时间格式，RUST_LOG 过滤（默认 info）
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置
    let config = AppConfig::load()?;
    info!("Starting server with config: {:?}", config);

    // 创建远程客户端（共享一个 HTTP 客户端）
    let http = create_http_client(config.http.timeout_secs, config.http.connect_timeout_secs)?;
    let mealie = Arc::new(MealieClient::new(
        http.clone(),
        config.mealie.base_url.clone(),
        config.mealie.api_key.clone(),
    ));
    let grocy = Arc::new(GrocyClient::new(
        http,
        config.grocy.base_url.clone(),
        config.grocy.api_key.clone(),
    ));

    let service = Arc::new(SyncService::new(mealie, grocy, config.units.special_units()));
    let app = api::router(service);

    // 启动服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  POST /api/shopping-list/sync - Mealie shopping list -> Grocy");
    info!("  POST /api/products/sync      - Grocy products -> Mealie foods");
    info!("  GET  /api/products/compare   - Compare product databases");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
