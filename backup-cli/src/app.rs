use backup_core::{config::AppConfig, error::Result};
use std::path::Path;

use crate::cli::{Commands, ServerArgs};
use crate::commands;
use crate::settings::Settings;

#[derive(Clone)]
pub struct CliApp {
    pub settings: Settings,
}

impl CliApp {
    /// 加载配置文件并合并命令行参数
    pub fn new(config_path: &Path, args: ServerArgs) -> Result<Self> {
        let config = AppConfig::load_or_default(config_path)?;
        Ok(Self {
            settings: Settings::new(config, args),
        })
    }

    /// 运行应用命令
    pub async fn run_command(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Run {
                sleep_seconds,
                timeout_seconds,
                report_parameter,
                no_report,
            } => {
                let report_parameter = (!no_report).then_some(report_parameter);
                commands::run_backup(self, sleep_seconds, timeout_seconds, report_parameter).await
            }
            Commands::Status => commands::run_status(self).await,
            Commands::Purge { dry_run } => commands::run_purge(self, dry_run).await,
            Commands::Locate { filename } => commands::run_locate(self, &filename),
            Commands::Init { .. } => unreachable!(), // 已经在 main.rs 中处理
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backup_core::BackupError;
    use std::fs;
    use tempfile::tempdir;

    fn write_config(dir: &Path, body: &str) -> std::path::PathBuf {
        let path = dir.join("tc-backup.toml");
        fs::write(&path, body).unwrap();
        path
    }

    #[tokio::test]
    async fn test_run_without_server_fails_before_network() {
        let temp_dir = tempdir().unwrap();
        let path = write_config(temp_dir.path(), "[poll]\ntimeout_seconds = 1\n");
        let app = CliApp::new(&path, ServerArgs::default()).unwrap();

        let err = app
            .run_command(Commands::Run {
                sleep_seconds: None,
                timeout_seconds: None,
                report_parameter: "env.TEAMCITY_BACKUP_FILE".to_string(),
                no_report: false,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, BackupError::ConfigResolution(_)), "{err}");

        let err = app.run_command(Commands::Status).await.unwrap_err();
        assert!(matches!(err, BackupError::ConfigResolution(_)), "{err}");
    }

    #[tokio::test]
    async fn test_purge_uses_configured_backup_dir() {
        let temp_dir = tempdir().unwrap();
        let backup_dir = temp_dir.path().join("backup");
        fs::create_dir(&backup_dir).unwrap();
        let expired = backup_dir.join("TeamCity_Backup_20000110_020000.zip");
        fs::write(&expired, b"PK").unwrap();

        let path = write_config(
            temp_dir.path(),
            &format!("[backup]\nbackup_dir = '{}'\n", backup_dir.display()),
        );
        let app = CliApp::new(&path, ServerArgs::default()).unwrap();

        app.run_command(Commands::Purge { dry_run: true }).await.unwrap();
        assert!(expired.exists());

        app.run_command(Commands::Purge { dry_run: false }).await.unwrap();
        assert!(!expired.exists());
    }

    #[test]
    fn test_broken_config_file_is_error() {
        let temp_dir = tempdir().unwrap();
        let path = write_config(temp_dir.path(), "[server\n");
        assert!(matches!(
            CliApp::new(&path, ServerArgs::default()),
            Err(BackupError::Config(_))
        ));
    }
}
