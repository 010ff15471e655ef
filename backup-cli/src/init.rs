use crate::project_info::{metadata, version_info};
use anyhow::{Context, Result};
use backup_core::config::AppConfig;
use std::path::Path;
use tracing::{info, warn};

/// 生成配置文件模板
pub fn run_init(config_path: &Path, force: bool) -> Result<()> {
    info!(
        "🛠️  {} ({} v{}) 初始化",
        metadata::display::CLI_FULL_NAME,
        metadata::PROJECT_NAME,
        version_info::CLI_VERSION
    );

    if config_path.exists() && !force {
        warn!("⚠️  配置文件已存在: {}", config_path.display());
        info!("如果您要重新生成，请使用 --force 参数");
        info!("示例: tc-backup init --force");
        return Ok(());
    }

    AppConfig::default()
        .save_to_file(config_path)
        .with_context(|| format!("写入配置文件失败: {}", config_path.display()))?;
    info!("   ✅ 创建配置文件: {}", config_path.display());

    info!("📝 接下来的步骤:");
    info!("   1️⃣  编辑配置文件，填写 [server] 中的 base_url 与 data_root");
    info!("   2️⃣  设置 TEAMCITY_USERNAME / TEAMCITY_PASSWORD 环境变量");
    info!("   3️⃣  运行 'tc-backup status' 检查连通性，再运行 'tc-backup run'");

    Ok(())
}
