use anyhow::Result;
use indexing_submit::utils::logging;
use indexing_submit::{App, Config};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load()?;

    // 初始化日志
    logging::init(&config)?;

    // 初始化并运行应用
    if let Err(e) = run(config).await {
        error!("❌ 发生错误: {:#}", e);
        return Err(e);
    }

    info!("\n✅ 全部完成!");
    Ok(())
}

async fn run(config: Config) -> Result<()> {
    App::initialize(config).await?.run().await
}
