use crate::api::BackupRequest;
use crate::constants::{api, backup, poll};
use crate::error::Result;
use crate::retention::RetentionPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 应用配置结构
///
/// 所有字段都有默认值，配置文件只需写出需要覆盖的部分
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub backup: BackupConfig,
    pub poll: PollConfig,
    pub retention: RetentionPolicy,
}

/// 服务器相关配置
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub base_url: String,
    pub data_root: String,
    pub username: String,
    pub request_timeout: u64,
}

/// 备份相关配置
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct BackupConfig {
    pub file_name: String,
    pub add_timestamp: bool,
    pub include_configs: bool,
    pub include_database: bool,
    pub include_build_logs: bool,
    pub include_personal_changes: bool,
    pub backup_dir: String,
}

/// 轮询相关配置
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct PollConfig {
    pub sleep_seconds: u64,
    pub timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            data_root: String::new(),
            username: String::new(),
            request_timeout: api::http::DEFAULT_TIMEOUT,
        }
    }
}

impl Default for BackupConfig {
    fn default() -> Self {
        let request = BackupRequest::default();
        Self {
            file_name: backup::DEFAULT_FILE_NAME.to_string(),
            add_timestamp: request.add_timestamp,
            include_configs: request.include_configs,
            include_database: request.include_database,
            include_build_logs: request.include_build_logs,
            include_personal_changes: request.include_personal_changes,
            backup_dir: String::new(),
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            sleep_seconds: poll::DEFAULT_SLEEP_SECONDS,
            timeout_seconds: poll::DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl AppConfig {
    /// 加载配置文件，文件不存在时使用默认配置
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            tracing::info!("找到配置文件: {}", path.display());
            Self::load_from_file(path)
        } else {
            tracing::debug!("未找到配置文件 {}，使用默认配置", path.display());
            Ok(Self::default())
        }
    }

    /// 从指定文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)?;
        let config: AppConfig = toml::from_str(&content)?;

        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = self.to_toml_with_comments();
        fs::write(&path, content)?;
        Ok(())
    }

    /// 生成带注释的TOML配置
    fn to_toml_with_comments(&self) -> String {
        const TEMPLATE: &str = include_str!("../templates/tc-backup.toml.template");

        TEMPLATE
            .replace("{request_timeout}", &self.server.request_timeout.to_string())
            .replace("{add_timestamp}", &self.backup.add_timestamp.to_string())
            .replace("{include_configs}", &self.backup.include_configs.to_string())
            .replace("{include_database}", &self.backup.include_database.to_string())
            .replace("{include_build_logs}", &self.backup.include_build_logs.to_string())
            .replace(
                "{include_personal_changes}",
                &self.backup.include_personal_changes.to_string(),
            )
            .replace("{sleep_seconds}", &self.poll.sleep_seconds.to_string())
            .replace("{timeout_seconds}", &self.poll.timeout_seconds.to_string())
            .replace("{window_days}", &self.retention.window_days.to_string())
            .replace("{keep_monthly}", &self.retention.keep_monthly.to_string())
            .replace("{base_url}", &toml_string(&self.server.base_url))
            .replace("{data_root}", &toml_string(&self.server.data_root))
            .replace("{username}", &toml_string(&self.server.username))
            .replace("{file_name}", &toml_string(&self.backup.file_name))
            .replace("{backup_dir}", &toml_string(&self.backup.backup_dir))
    }

    /// 根据配置构造备份触发参数
    pub fn backup_request(&self) -> BackupRequest {
        BackupRequest {
            file_name: self.backup.file_name.clone(),
            add_timestamp: self.backup.add_timestamp,
            include_configs: self.backup.include_configs,
            include_database: self.backup.include_database,
            include_build_logs: self.backup.include_build_logs,
            include_personal_changes: self.backup.include_personal_changes,
        }
    }
}

/// 转成带引号并已转义的 TOML 字符串
fn toml_string(value: &str) -> String {
    toml::Value::String(value.to_string()).to_string()
}
