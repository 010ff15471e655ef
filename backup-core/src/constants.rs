/// API服务相关常量
pub mod api {
    /// API端点路径
    pub mod endpoints {
        /// 服务端备份端点：POST 触发备份，GET 查询备份状态
        pub const SERVER_BACKUP: &str = "/httpAuth/app/rest/server/backup";
    }

    /// HTTP相关常量
    pub mod http {
        /// 单次请求超时时间（秒）
        pub const DEFAULT_TIMEOUT: u64 = 30;

        /// User-Agent头
        pub const USER_AGENT: &str = concat!("tc-backup/", env!("CARGO_PKG_VERSION"));
    }
}

/// 备份相关常量
pub mod backup {
    /// 默认备份文件名（服务端会追加 `_yyyyMMdd_HHmmss.zip`）
    pub const DEFAULT_FILE_NAME: &str = "TeamCity_Backup";

    /// 备份文件扩展名
    pub const BACKUP_EXTENSION: &str = ".zip";

    /// 数据目录下的备份目录名
    pub const BACKUP_DIR_NAME: &str = "backup";

    /// 文件名中内嵌的时间戳格式（yyyyMMdd_HHmmss）
    pub const TIMESTAMP_PATTERN: &str = "%Y%m%d_%H%M%S";

    /// 时间戳的字符长度
    pub const TIMESTAMP_LEN: usize = 15;

    /// 服务端表示"没有备份在运行"的状态值
    pub const IDLE_STATUS: &str = "Idle";
}

/// 状态轮询相关常量
pub mod poll {
    /// 两次状态查询之间的间隔（秒）
    pub const DEFAULT_SLEEP_SECONDS: u64 = 10;

    /// 等待备份完成的总超时（秒）
    pub const DEFAULT_TIMEOUT_SECONDS: u64 = 600;
}

/// 保留策略相关常量
pub mod retention {
    /// 滚动保留窗口（天）
    pub const DEFAULT_WINDOW_DAYS: i64 = 14;

    /// 每月该日的备份永久保留
    pub const MONTHLY_ARCHIVE_DAY: u32 = 1;
}

/// 配置相关常量
pub mod config {
    /// 默认配置文件名
    pub const DEFAULT_CONFIG_FILE: &str = "tc-backup.toml";

    /// 用户名环境变量
    pub const USERNAME_ENV: &str = "TEAMCITY_USERNAME";

    /// 密码环境变量
    pub const PASSWORD_ENV: &str = "TEAMCITY_PASSWORD";

    /// 日志文件环境变量
    pub const LOG_FILE_ENV: &str = "TC_BACKUP_LOG_FILE";

    /// 构建系统参数名默认值
    pub const DEFAULT_REPORT_PARAMETER: &str = "env.TEAMCITY_BACKUP_FILE";
}
