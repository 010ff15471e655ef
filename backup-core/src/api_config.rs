//! API配置模块 - TeamCity 服务端地址与端点

use crate::constants::api;
use serde::{Deserialize, Serialize};
use std::fmt;

/// API配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// 服务器基础地址，例如 `http://tc.example.com:8111`
    pub base_url: String,
    /// 备份端点（触发与状态查询共用）
    pub backup_endpoint: String,
    /// 单次请求超时（秒）
    pub request_timeout: u64,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            backup_endpoint: api::endpoints::SERVER_BACKUP.to_string(),
            request_timeout: api::http::DEFAULT_TIMEOUT,
        }
    }

    pub fn with_request_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout = seconds;
        self
    }

    /// 获取完整的端点URL
    pub fn get_endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), endpoint)
    }

    /// 备份端点的完整URL
    pub fn backup_url(&self) -> String {
        self.get_endpoint_url(&self.backup_endpoint)
    }
}

impl fmt::Display for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "TeamCity API 配置:")?;
        writeln!(f, "  服务器地址: {}", self.base_url)?;
        writeln!(f, "  备份端点: {}", self.backup_url())?;
        write!(f, "  请求超时: {} 秒", self.request_timeout)
    }
}
