//! 备份文件位置解析
//!
//! TeamCity 把备份写到服务器数据目录下的 `backup` 子目录，
//! 本工具通过网络共享访问它：`\\<主机>\<数据目录>\backup\<文件名>`，
//! 其中盘符 `C:` 转写为管理共享 `C$`。

use crate::constants::backup::BACKUP_DIR_NAME;
use crate::error::{BackupError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;
use url::{Host, Url};

const UNC_PREFIX: &str = r"\\";

/// 计算服务器上备份目录的共享路径
pub fn resolve_backup_dir(base_address: &str, data_root: &str) -> Result<PathBuf> {
    let url = Url::parse(base_address)?;
    let host = match url.host() {
        Some(Host::Domain(domain)) => domain.to_string(),
        Some(Host::Ipv4(addr)) => addr.to_string(),
        // `[::1]` 不是合法的 UNC 主机名
        Some(Host::Ipv6(_)) => {
            return Err(BackupError::config(format!(
                "IPv6 地址无法推算共享路径，请改用主机名或指定 backup_dir: {base_address}"
            )));
        }
        None => {
            return Err(BackupError::config(format!(
                "服务器地址缺少主机名: {base_address}"
            )));
        }
    };

    let root = data_root.trim();
    if root.is_empty() {
        return Err(BackupError::config("数据目录不能为空"));
    }

    // 已经是共享路径时直接使用
    let share = if root.starts_with(UNC_PREFIX) || root.starts_with("//") {
        format!("{UNC_PREFIX}{}", escape_share_path(root))
    } else {
        format!("{UNC_PREFIX}{host}\\{}", escape_share_path(root))
    };

    Ok(PathBuf::from(format!("{share}\\{BACKUP_DIR_NAME}")))
}

/// 计算备份文件的完整路径
pub fn resolve(base_address: &str, data_root: &str, filename: &str) -> Result<PathBuf> {
    let dir = resolve_backup_dir(base_address, data_root)?;
    Ok(artifact_path(&dir, filename))
}

/// 在备份目录下拼接文件名
///
/// 共享路径始终使用 `\` 分隔，本地挂载目录按平台规则拼接
pub fn artifact_path(dir: &Path, filename: &str) -> PathBuf {
    let dir_str = dir.to_string_lossy();
    if dir_str.starts_with(UNC_PREFIX) {
        PathBuf::from(format!("{}\\{filename}", dir_str.trim_end_matches('\\')))
    } else {
        dir.join(filename)
    }
}

/// 检查备份文件是否已经落盘，无法访问视为不存在
pub async fn artifact_exists(path: &Path) -> bool {
    match tokio::fs::try_exists(path).await {
        Ok(exists) => exists,
        Err(e) => {
            debug!("无法访问备份文件 {}: {}", path.display(), e);
            false
        }
    }
}

/// 统一分隔符、去掉空段，并把盘符冒号转写为 `$`
fn escape_share_path(root: &str) -> String {
    let normalized = root.replace('/', "\\");
    normalized
        .split('\\')
        .filter(|segment| !segment.is_empty())
        .enumerate()
        .map(|(i, segment)| {
            if i == 0 && is_drive(segment) {
                format!("{}$", &segment[..1])
            } else {
                segment.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\\")
}

fn is_drive(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.len() == 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_resolve_drive_letter_root() {
        let path = resolve(
            "http://tc.example.com:8111",
            r"C:\ProgramData\TeamCity",
            "TeamCity_Backup_20240101_020000.zip",
        )
        .unwrap();
        assert_eq!(
            path.to_string_lossy(),
            r"\\tc.example.com\C$\ProgramData\TeamCity\backup\TeamCity_Backup_20240101_020000.zip"
        );
    }

    #[test]
    fn test_resolve_normalizes_separators() {
        let dir = resolve_backup_dir("https://ci.internal/teamcity/", "d:/TeamCity//data/").unwrap();
        assert_eq!(dir.to_string_lossy(), r"\\ci.internal\d$\TeamCity\data\backup");
    }

    #[test]
    fn test_resolve_share_relative_root() {
        let dir = resolve_backup_dir("http://10.0.0.5:8111", r"TeamCityData").unwrap();
        assert_eq!(dir.to_string_lossy(), r"\\10.0.0.5\TeamCityData\backup");
    }

    #[test]
    fn test_resolve_existing_unc_root() {
        let dir = resolve_backup_dir("http://tc:8111", r"\\nas01\teamcity").unwrap();
        assert_eq!(dir.to_string_lossy(), r"\\nas01\teamcity\backup");
    }

    #[test]
    fn test_resolve_rejects_bad_input() {
        assert!(matches!(
            resolve_backup_dir("not a url", r"C:\TeamCity"),
            Err(BackupError::Url(_))
        ));
        assert!(matches!(
            resolve_backup_dir("http://tc:8111", "   "),
            Err(BackupError::ConfigResolution(_))
        ));
        assert!(matches!(
            resolve_backup_dir("file:///tmp/x", r"C:\TeamCity"),
            Err(BackupError::ConfigResolution(_))
        ));
    }

    #[test]
    fn test_resolve_rejects_ipv6_host() {
        for base in ["http://[::1]:8111", "https://[fe80::1]/teamcity"] {
            assert!(
                matches!(
                    resolve_backup_dir(base, r"C:\TeamCity"),
                    Err(BackupError::ConfigResolution(_))
                ),
                "{base}"
            );
        }
    }

    #[test]
    fn test_artifact_path_local_dir() {
        let path = artifact_path(Path::new("/mnt/teamcity/backup"), "a.zip");
        assert_eq!(path, Path::new("/mnt/teamcity/backup").join("a.zip"));
    }

    #[tokio::test]
    async fn test_artifact_exists() {
        let temp_dir = tempdir().unwrap();
        let file = temp_dir.path().join("TeamCity_Backup_20240615_030000.zip");
        assert!(!artifact_exists(&file).await);

        std::fs::write(&file, b"PK").unwrap();
        assert!(artifact_exists(&file).await);
    }
}
