use crate::api_config::ApiConfig;
use crate::constants::{api, backup};
use crate::error::{BackupError, Result};
use crate::status::BackupStatus;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, info};

/// HTTP Basic 认证凭据
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

// 日志里不能出现密码
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// 备份触发请求参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupRequest {
    /// 备份文件名前缀，服务端会追加时间戳与扩展名
    pub file_name: String,
    pub add_timestamp: bool,
    pub include_configs: bool,
    pub include_database: bool,
    pub include_build_logs: bool,
    pub include_personal_changes: bool,
}

impl Default for BackupRequest {
    fn default() -> Self {
        Self {
            file_name: backup::DEFAULT_FILE_NAME.to_string(),
            add_timestamp: true,
            include_configs: true,
            include_database: true,
            include_build_logs: false,
            include_personal_changes: true,
        }
    }
}

impl BackupRequest {
    /// 触发接口的查询参数（顺序固定）
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("addTimestamp", self.add_timestamp.to_string()),
            ("includeConfigs", self.include_configs.to_string()),
            ("includeDatabase", self.include_database.to_string()),
            ("includeBuildLogs", self.include_build_logs.to_string()),
            (
                "includePersonalChanges",
                self.include_personal_changes.to_string(),
            ),
            ("fileName", self.file_name.clone()),
        ]
    }

    /// 清理时用于匹配本工具生成的备份文件的前缀
    pub fn purge_prefix(&self) -> String {
        format!("{}_", self.file_name)
    }
}

/// 备份服务端接口
///
/// 编排逻辑只依赖这个 trait，生产环境使用 [`HttpBackupClient`]
pub trait BackupApi {
    /// 触发备份，返回服务端生成的备份文件名
    fn trigger(&self, request: &BackupRequest) -> impl Future<Output = Result<String>> + Send;

    /// 查询当前备份状态
    fn status(&self) -> impl Future<Output = Result<BackupStatus>> + Send;
}

/// TeamCity REST API 客户端
#[derive(Debug, Clone)]
pub struct HttpBackupClient {
    client: Client,
    config: ApiConfig,
    credentials: Credentials,
}

impl HttpBackupClient {
    /// 创建新的 API 客户端
    pub fn new(config: ApiConfig, credentials: Credentials) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .user_agent(api::http::USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            config,
            credentials,
        })
    }

    /// 获取当前API配置
    pub fn get_config(&self) -> &ApiConfig {
        &self.config
    }

    /// 预先附加 Basic 认证头，不等待质询
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request.basic_auth(&self.credentials.username, Some(&self.credentials.password))
    }

    async fn send(&self, request: RequestBuilder, url: &str) -> Result<Response> {
        self.authorize(request)
            .send()
            .await
            .map_err(|e| BackupError::network(format!("无法连接 {url}: {e}")))
    }

    /// 检查响应状态并读取响应体
    async fn read_body(&self, response: Response, url: &str) -> Result<String> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            error!("服务端拒绝认证: {} - {}", status, url);
            return Err(BackupError::Authentication {
                url: url.to_string(),
            });
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!("请求失败: {} - {}", status, text);
            return Err(BackupError::network(format!("{status} - {}", text.trim())));
        }

        Ok(response.text().await?.trim().to_string())
    }
}

impl BackupApi for HttpBackupClient {
    async fn trigger(&self, request: &BackupRequest) -> Result<String> {
        let url = self.config.backup_url();
        info!("触发服务端备份: {} (文件名前缀: {})", url, request.file_name);

        let builder = self.client.post(&url).query(&request.query_pairs());
        let response = self.send(builder, &url).await?;
        let filename = self.read_body(response, &url).await?;

        if filename.is_empty() {
            return Err(BackupError::network("服务端未返回备份文件名"));
        }

        info!("备份已开始，服务端文件名: {}", filename);
        Ok(filename)
    }

    async fn status(&self) -> Result<BackupStatus> {
        let url = self.config.backup_url();
        let response = self.send(self.client.get(&url), &url).await?;
        let body = self.read_body(response, &url).await?;

        let status = BackupStatus::from_body(&body);
        debug!("备份状态: {}", status);
        Ok(status)
    }
}
