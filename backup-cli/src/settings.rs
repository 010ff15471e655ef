//! 配置解析：命令行参数 > 环境变量 > 配置文件 > 默认值
//!
//! 核心库只接收这里校验过的值，自身不做任何配置发现

use crate::cli::ServerArgs;
use backup_core::{
    BackupError, Result,
    api::{BackupRequest, Credentials},
    api_config::ApiConfig,
    config::AppConfig,
    locator,
    retention::RetentionPolicy,
};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

#[derive(Clone)]
pub struct Settings {
    config: AppConfig,
    args: ServerArgs,
}

impl Settings {
    pub fn new(config: AppConfig, args: ServerArgs) -> Self {
        Self { config, args }
    }

    /// 校验后的服务器地址，必须是带主机名的 http(s) 地址
    pub fn base_url(&self) -> Result<String> {
        let raw = pick(self.args.server_url.as_deref(), &self.config.server.base_url)
            .ok_or_else(|| {
                BackupError::config("未配置 TeamCity 服务器地址 (--server-url / TEAMCITY_URL / [server].base_url)")
            })?;

        let url = Url::parse(raw)
            .map_err(|e| BackupError::config(format!("服务器地址无效 {raw}: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(BackupError::config(format!(
                "服务器地址必须是 http(s)://<主机> 形式: {raw}"
            )));
        }
        Ok(raw.to_string())
    }

    pub fn data_root(&self) -> Result<String> {
        pick(self.args.data_root.as_deref(), &self.config.server.data_root)
            .map(str::to_string)
            .ok_or_else(|| {
                BackupError::config("未配置 TeamCity 数据目录 (--data-root / TEAMCITY_DATA_ROOT / [server].data_root)")
            })
    }

    /// 备份目录：显式指定的本地目录优先，否则按服务器共享路径推算
    pub fn backup_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.args.backup_dir {
            return Ok(dir.clone());
        }
        if !self.config.backup.backup_dir.trim().is_empty() {
            return Ok(PathBuf::from(self.config.backup.backup_dir.trim()));
        }
        locator::resolve_backup_dir(&self.base_url()?, &self.data_root()?)
    }

    pub fn credentials(&self) -> Result<Credentials> {
        let username = pick(self.args.username.as_deref(), &self.config.server.username)
            .ok_or_else(|| BackupError::config("未提供用户名 (--username / TEAMCITY_USERNAME)"))?;
        let password = self
            .args
            .password
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| BackupError::config("未提供密码 (--password / TEAMCITY_PASSWORD)"))?;
        Ok(Credentials::new(username, password))
    }

    pub fn api_config(&self) -> Result<ApiConfig> {
        Ok(ApiConfig::new(self.base_url()?)
            .with_request_timeout(self.config.server.request_timeout))
    }

    pub fn backup_request(&self) -> BackupRequest {
        self.config.backup_request()
    }

    pub fn retention(&self) -> RetentionPolicy {
        self.config.retention
    }

    pub fn poll_interval(&self, flag: Option<u64>) -> Duration {
        Duration::from_secs(flag.unwrap_or(self.config.poll.sleep_seconds))
    }

    pub fn poll_timeout(&self, flag: Option<u64>) -> Duration {
        Duration::from_secs(flag.unwrap_or(self.config.poll.timeout_seconds))
    }
}

/// 取第一个非空值
fn pick<'a>(flag: Option<&'a str>, file: &'a str) -> Option<&'a str> {
    flag.map(str::trim)
        .filter(|v| !v.is_empty())
        .or_else(|| Some(file.trim()).filter(|v| !v.is_empty()))
}
