use crate::app::CliApp;
use backup_core::{
    api::{BackupApi, HttpBackupClient},
    error::Result,
};
use tracing::info;

/// 查询服务端当前备份状态
pub async fn run_status(app: &CliApp) -> Result<()> {
    let api_config = app.settings.api_config()?;
    let credentials = app.settings.credentials()?;

    info!("{}", api_config);
    let client = HttpBackupClient::new(api_config, credentials)?;
    let status = client.status().await?;

    if status.is_idle() {
        info!("✅ 服务端空闲，没有正在运行的备份");
    } else {
        info!("⏳ 备份进行中: {}", status);
    }
    Ok(())
}
