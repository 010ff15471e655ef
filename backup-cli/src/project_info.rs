/// tc-backup 项目信息模块
///
/// 项目元数据统一在这里定义，backup-core 作为内部库只提供技术性常量

/// 项目元数据（自动从 Cargo.toml 同步）
pub mod metadata {
    /// 项目名称
    pub const PROJECT_NAME: &str = env!("CARGO_PKG_NAME");

    /// 项目描述
    pub const PROJECT_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

    /// 项目作者
    pub const PROJECT_AUTHORS: &str = env!("CARGO_PKG_AUTHORS");

    /// 用户友好的显示名称
    pub mod display {
        /// CLI 工具的完整名称
        pub const CLI_FULL_NAME: &str = "TeamCity Backup CLI";

        /// 项目详细描述
        pub const DESCRIPTION_LONG: &str = "通过 TeamCity REST API 触发服务端备份，轮询等待备份完成，\
确认备份文件已写入服务器数据目录，并按滚动窗口（默认 14 天，每月 1 日永久保留）清理过期备份";
    }
}

/// 版本信息
pub mod version_info {
    /// CLI 版本
    pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");
}
