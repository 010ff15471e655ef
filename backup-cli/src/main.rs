use backup_cli::{Cli, CliApp, Commands, run_init, setup_logging};
use clap::Parser;
use tracing::error;

#[tokio::main]
async fn main() {
    // 解析命令行参数
    let cli = Cli::parse();

    // 设置日志记录
    setup_logging(cli.verbose);

    // `init` 命令是特例，它不需要预先加载配置
    if let Commands::Init { force } = cli.command {
        if let Err(e) = run_init(&cli.config, force) {
            error!("❌ 初始化失败: {:#}", e);
            std::process::exit(1);
        }
        return;
    }

    let app = match CliApp::new(&cli.config, cli.server) {
        Ok(app) => app,
        Err(e) => {
            error!("❌ 配置文件 '{}' 加载失败: {}", cli.config.display(), e);
            std::process::exit(1);
        }
    };

    // 超时、文件缺失、清理失败都只是警告，只有配置、认证和触发失败才以非零退出
    if let Err(e) = app.run_command(cli.command).await {
        error!("❌ 操作失败: {}", e);
        if e.is_authentication() {
            error!("👉 请在 TeamCity 服务端启用 HTTP Basic 认证，并确认账号具有系统管理员权限");
        }
        std::process::exit(1);
    }
}
