use crate::app::CliApp;
use backup_core::error::Result;
use tracing::{info, warn};

/// 按保留策略清理过期备份
pub async fn run_purge(app: &CliApp, dry_run: bool) -> Result<()> {
    let backup_dir = app.settings.backup_dir()?;
    let prefix = app.settings.backup_request().purge_prefix();
    let today = chrono::Local::now().date_naive();

    info!("🧹 清理过期备份: {}", backup_dir.display());
    if dry_run {
        info!("   (dry-run 模式，不会删除任何文件)");
    }

    let report = app
        .settings
        .retention()
        .purge(&backup_dir, &prefix, today, dry_run)
        .await;

    for name in &report.purged {
        info!("   🗑️  {}", name);
    }
    for name in &report.unparsable {
        warn!("   ❓ 日期无法解析，已保留: {}", name);
    }
    for err in &report.failed {
        warn!("   ❌ {}", err);
    }
    Ok(())
}
