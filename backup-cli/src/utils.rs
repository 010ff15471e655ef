use backup_core::constants::config::LOG_FILE_ENV;

/// # tc-backup 日志系统使用说明
///
/// - 库代码只使用 `tracing` 宏：`info!()`, `warn!()`, `error!()`, `debug!()`
/// - 应用入口在 `main.rs` 中调用 `setup_logging()`
/// - 日志写到 stderr，stdout 只留给构建系统服务消息和 `locate` 的输出
///
/// ## 日志配置选项
///
/// - `-v, --verbose`：启用详细日志模式（DEBUG 级别）
/// - `RUST_LOG`：标准的 Rust 日志级别控制，优先于 `--verbose`
/// - `TC_BACKUP_LOG_FILE`：日志文件路径，设置后日志追加到文件而非终端
///
/// ```bash
/// TC_BACKUP_LOG_FILE=tc-backup.log tc-backup run
/// RUST_LOG=backup_core::retention=debug tc-backup purge --dry-run
/// ```
pub fn setup_logging(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    // 根据verbose参数和环境变量确定日志级别
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let log_file = std::env::var(LOG_FILE_ENV).ok().and_then(|path| {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| eprintln!("无法打开日志文件 {path}: {e}，改为输出到终端"))
            .ok()
    });

    if let Some(file) = log_file {
        // 输出到文件 - 使用详细格式便于调试
        fmt()
            .with_env_filter(env_filter)
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_line_number(true)
            .init();
    } else {
        // 输出到终端 - 使用简洁格式，用户友好
        fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false)
            .compact()
            .init();
    }
}

/// 生成 TeamCity 服务消息，把值写入构建参数
///
/// `##teamcity[setParameter name='<name>' value='<value>']`
pub fn service_message(name: &str, value: &str) -> String {
    format!(
        "##teamcity[setParameter name='{}' value='{}']",
        escape_service_value(name),
        escape_service_value(value)
    )
}

/// TeamCity 服务消息的转义规则
fn escape_service_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '|' => escaped.push_str("||"),
            '\'' => escaped.push_str("|'"),
            '[' => escaped.push_str("|["),
            ']' => escaped.push_str("|]"),
            '\n' => escaped.push_str("|n"),
            '\r' => escaped.push_str("|r"),
            '\u{0085}' => escaped.push_str("|x"),
            '\u{2028}' => escaped.push_str("|l"),
            '\u{2029}' => escaped.push_str("|p"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_message_for_unc_path() {
        let message = service_message(
            "env.TEAMCITY_BACKUP_FILE",
            r"\\tc.example.com\C$\ProgramData\TeamCity\backup\TeamCity_Backup_20240615_030000.zip",
        );
        assert_eq!(
            message,
            r"##teamcity[setParameter name='env.TEAMCITY_BACKUP_FILE' value='\\tc.example.com\C$\ProgramData\TeamCity\backup\TeamCity_Backup_20240615_030000.zip']"
        );
    }

    #[test]
    fn test_escape_special_characters() {
        assert_eq!(escape_service_value("a|b"), "a||b");
        assert_eq!(escape_service_value("it's"), "it|'s");
        assert_eq!(escape_service_value("[x]"), "|[x|]");
        assert_eq!(escape_service_value("l1\r\nl2"), "l1|r|nl2");
        assert_eq!(escape_service_value("plain"), "plain");
    }
}
