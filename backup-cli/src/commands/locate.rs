use crate::app::CliApp;
use backup_core::{error::Result, locator};

/// 输出备份文件在服务器上的路径
pub fn run_locate(app: &CliApp, filename: &str) -> Result<()> {
    let backup_dir = app.settings.backup_dir()?;
    println!("{}", locator::artifact_path(&backup_dir, filename).display());
    Ok(())
}
