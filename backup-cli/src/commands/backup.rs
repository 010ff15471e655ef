use crate::app::CliApp;
use crate::utils::service_message;
use backup_core::{
    api::HttpBackupClient,
    backup::{BackupRunner, RunOptions, RunReport},
    error::Result,
};
use tracing::{info, warn};

/// 执行完整备份流程：触发 -> 等待完成 -> 校验文件 -> 清理过期备份
pub async fn run_backup(
    app: &CliApp,
    sleep_seconds: Option<u64>,
    timeout_seconds: Option<u64>,
    report_parameter: Option<String>,
) -> Result<()> {
    let settings = &app.settings;

    // 所有配置都在发出网络请求之前校验
    let api_config = settings.api_config()?;
    let credentials = settings.credentials()?;
    let backup_dir = settings.backup_dir()?;

    let options = RunOptions {
        request: settings.backup_request(),
        backup_dir,
        poll_interval: settings.poll_interval(sleep_seconds),
        poll_timeout: settings.poll_timeout(timeout_seconds),
        retention: settings.retention(),
        today: chrono::Local::now().date_naive(),
    };

    info!("💾 TeamCity 服务端备份");
    info!("===============");
    info!("服务器: {}", api_config.base_url);
    info!("备份目录: {}", options.backup_dir.display());

    let runner = BackupRunner::new(HttpBackupClient::new(api_config, credentials)?);
    let report = runner.run(&options).await?;

    if let Some(name) = report_parameter {
        println!("{}", service_message(&name, &report.artifact.to_string_lossy()));
    }

    print_summary(&report);
    Ok(())
}

fn print_summary(report: &RunReport) {
    info!("📋 备份结果");
    info!("   文件名: {}", report.filename);
    info!("   路径: {}", report.artifact.display());
    info!(
        "   状态查询: {} 次，耗时 {} 秒",
        report.poll.polls,
        report.poll.elapsed.as_secs()
    );
    info!(
        "   清理: 删除 {} 个，保留 {} 个，无法解析 {} 个",
        report.purge.purged.len(),
        report.purge.kept.len(),
        report.purge.unparsable.len()
    );

    if report.is_success() {
        info!("✅ 备份完成: {}", report.artifact.display());
    } else {
        warn!("⚠️  备份流程已结束，但有 {} 个警告:", report.warning_count());
        for warning in report.warnings.iter().chain(report.purge.failed.iter()) {
            warn!("   - {}", warning);
        }
    }
}
