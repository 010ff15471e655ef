use crate::project_info::{metadata, version_info};
use backup_core::constants::config::{
    DEFAULT_CONFIG_FILE, DEFAULT_REPORT_PARAMETER, PASSWORD_ENV, USERNAME_ENV,
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// 服务器与凭据参数，覆盖配置文件中的对应项
#[derive(Args, Clone, Default)]
pub struct ServerArgs {
    /// TeamCity 服务器地址，例如 http://tc.example.com:8111
    #[arg(long, global = true, env = "TEAMCITY_URL")]
    pub server_url: Option<String>,

    /// 服务器上的 TeamCity 数据目录，例如 C:\ProgramData\JetBrains\TeamCity
    #[arg(long, global = true, env = "TEAMCITY_DATA_ROOT")]
    pub data_root: Option<String>,

    /// 本地挂载的备份目录（替代 \\<主机>\<数据目录>\backup 共享路径）
    #[arg(long, global = true)]
    pub backup_dir: Option<PathBuf>,

    /// 用户名
    #[arg(short, long, global = true, env = USERNAME_ENV)]
    pub username: Option<String>,

    /// 密码
    #[arg(short, long, global = true, env = PASSWORD_ENV, hide_env_values = true)]
    pub password: Option<String>,
}

/// TeamCity Backup CLI - 服务端备份触发与清理工具
#[derive(Parser)]
#[command(name = "tc-backup")]
#[command(about = metadata::PROJECT_DESCRIPTION)]
#[command(version = version_info::CLI_VERSION)]
#[command(long_about = metadata::display::DESCRIPTION_LONG)]
#[command(author = metadata::PROJECT_AUTHORS)]
pub struct Cli {
    /// 配置文件路径
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// 详细输出
    #[arg(short, long)]
    pub verbose: bool,

    #[command(flatten)]
    pub server: ServerArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 触发备份，等待完成，校验备份文件并清理过期备份
    Run {
        /// 状态查询间隔（秒）
        #[arg(long)]
        sleep_seconds: Option<u64>,
        /// 等待备份完成的总超时（秒）
        #[arg(long)]
        timeout_seconds: Option<u64>,
        /// 向构建系统报告备份文件路径时使用的参数名
        #[arg(long, default_value = DEFAULT_REPORT_PARAMETER)]
        report_parameter: String,
        /// 不输出构建系统服务消息
        #[arg(long)]
        no_report: bool,
    },
    /// 查询服务端当前备份状态
    Status,
    /// 按保留策略清理过期备份
    Purge {
        /// 只列出将被删除的文件，不实际删除
        #[arg(long)]
        dry_run: bool,
    },
    /// 显示备份文件在服务器上的路径
    Locate {
        /// 备份文件名，例如 TeamCity_Backup_20240101_020000.zip
        filename: String,
    },
    /// 生成配置文件模板
    Init {
        /// 如果配置文件已存在，强制覆盖
        #[arg(long)]
        force: bool,
    },
}
