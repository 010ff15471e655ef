use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BackupError>;

#[derive(Error, Debug)]
pub enum BackupError {
    #[error("配置解析失败: {0}")]
    ConfigResolution(String),

    #[error("配置文件格式错误: {0}")]
    Config(#[from] toml::de::Error),

    #[error("认证失败 (401): {url}，请确认服务端已启用 HTTP Basic 认证且账号密码正确")]
    Authentication { url: String },

    #[error("网络请求失败: {0}")]
    Network(String),

    #[error("HTTP 请求错误: {0}")]
    Http(#[from] reqwest::Error),

    #[error("服务器地址无效: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("等待备份完成超时 ({waited_seconds} 秒)，备份可能仍在服务端继续执行")]
    TimeoutExceeded { waited_seconds: u64 },

    #[error("备份文件位置未知，预期路径不存在: {}", .0.display())]
    ArtifactNotFound(PathBuf),

    #[error("无法从文件名解析备份日期，已保留: {0}")]
    UnparsableFilename(String),

    #[error("删除备份文件失败: {}: {reason}", .path.display())]
    DeleteFailed { path: PathBuf, reason: String },
}

impl BackupError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigResolution(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// 致命错误会中止当前调用；其余错误只作为警告输出，流程继续
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            BackupError::ConfigResolution(_)
                | BackupError::Config(_)
                | BackupError::Authentication { .. }
                | BackupError::Network(_)
                | BackupError::Http(_)
                | BackupError::Url(_)
        )
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, BackupError::Authentication { .. })
    }
}
