use crate::constants::backup::IDLE_STATUS;
use std::fmt;

/// 服务端返回的备份状态
///
/// 服务端的状态词汇除了 `Idle` 之外没有文档，
/// 因此只区分"空闲"和"其它"，未知值一律视为仍在进行中
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupStatus {
    /// 没有备份在运行
    Idle,
    /// 备份进行中（携带服务端原始状态文本）
    InProgress(String),
}

impl BackupStatus {
    /// 从响应体解析状态
    pub fn from_body(body: &str) -> Self {
        let text = body.trim();
        if text == IDLE_STATUS {
            BackupStatus::Idle
        } else {
            BackupStatus::InProgress(text.to_string())
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, BackupStatus::Idle)
    }
}

impl fmt::Display for BackupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackupStatus::Idle => write!(f, "{IDLE_STATUS}"),
            BackupStatus::InProgress(raw) if raw.is_empty() => write!(f, "<空响应>"),
            BackupStatus::InProgress(raw) => write!(f, "{raw}"),
        }
    }
}
