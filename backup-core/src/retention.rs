use crate::constants::backup::BACKUP_EXTENSION;
use crate::constants::retention::{DEFAULT_WINDOW_DAYS, MONTHLY_ARCHIVE_DAY};
use crate::date_codec;
use crate::error::BackupError;
use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// 单个备份文件的保留结论
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetentionDecision {
    Keep,
    Purge,
}

/// 备份保留策略：滚动窗口 + 每月首日归档
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionPolicy {
    /// 滚动保留天数（按日期比较，不看时间）
    pub window_days: i64,
    /// 是否永久保留每月 1 日的备份
    pub keep_monthly: bool,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_WINDOW_DAYS,
            keep_monthly: true,
        }
    }
}

/// 一次清理的结果
#[derive(Debug, Default)]
pub struct PurgeReport {
    pub kept: Vec<String>,
    pub purged: Vec<String>,
    /// 日期无法解析而保留的文件
    pub unparsable: Vec<String>,
    pub failed: Vec<BackupError>,
}

impl PurgeReport {
    pub fn scanned(&self) -> usize {
        self.kept.len() + self.purged.len() + self.unparsable.len() + self.failed.len()
    }
}

impl RetentionPolicy {
    /// 根据备份日期与今天的日期判断是否保留
    pub fn decide(&self, backup_time: NaiveDateTime, today: NaiveDate) -> RetentionDecision {
        let backup_date = backup_time.date();

        let cutoff = u64::try_from(self.window_days)
            .ok()
            .and_then(|days| today.checked_sub_days(Days::new(days)));
        // 窗口过大无法计算时视为全部在窗口内
        let Some(cutoff) = cutoff else {
            return RetentionDecision::Keep;
        };

        if backup_date >= cutoff {
            return RetentionDecision::Keep;
        }

        if self.keep_monthly && backup_date.day() == MONTHLY_ARCHIVE_DAY {
            return RetentionDecision::Keep;
        }

        RetentionDecision::Purge
    }

    /// 判断文件是否应当被清理
    ///
    /// 文件名日期无法确定时一律保留：宁可多留，不可误删
    pub fn is_purge_candidate(&self, filename: &str, prefix: &str, today: NaiveDate) -> bool {
        match embedded_timestamp(filename, prefix) {
            Some(backup_time) => self.decide(backup_time, today) == RetentionDecision::Purge,
            None => false,
        }
    }

    /// 扫描备份目录并删除过期备份
    ///
    /// 每个文件的删除互不影响，失败只记入报告。`dry_run` 时只报告不删除。
    pub async fn purge(
        &self,
        folder: &Path,
        prefix: &str,
        today: NaiveDate,
        dry_run: bool,
    ) -> PurgeReport {
        self.purge_with(folder, prefix, today, dry_run, |path| {
            tokio::fs::remove_file(path)
        })
        .await
    }

    /// 使用给定的删除操作执行清理
    async fn purge_with<R, Fut>(
        &self,
        folder: &Path,
        prefix: &str,
        today: NaiveDate,
        dry_run: bool,
        mut remove: R,
    ) -> PurgeReport
    where
        R: FnMut(PathBuf) -> Fut,
        Fut: Future<Output = std::io::Result<()>>,
    {
        let mut report = PurgeReport::default();

        info!(
            "开始清理过期备份: {} (保留 {} 天{})",
            folder.display(),
            self.window_days,
            if self.keep_monthly { "，每月1日永久保留" } else { "" }
        );

        let candidates = match list_backup_files(folder, prefix).await {
            Ok(files) => files,
            Err(e) => {
                warn!("无法读取备份目录 {}: {}", folder.display(), e);
                return report;
            }
        };

        for (name, path) in candidates {
            let Some(backup_time) = embedded_timestamp(&name, prefix) else {
                warn!("{}", BackupError::UnparsableFilename(name.clone()));
                report.unparsable.push(name);
                continue;
            };

            if self.decide(backup_time, today) == RetentionDecision::Keep {
                debug!("保留备份: {}", name);
                report.kept.push(name);
                continue;
            }

            if dry_run {
                info!("[dry-run] 将删除过期备份: {}", name);
                report.purged.push(name);
                continue;
            }

            match remove(path.clone()).await {
                Ok(()) => {
                    info!("已删除过期备份: {}", name);
                    report.purged.push(name);
                }
                Err(e) => {
                    let err = BackupError::DeleteFailed {
                        path,
                        reason: e.to_string(),
                    };
                    warn!("{}", err);
                    report.failed.push(err);
                }
            }
        }

        info!(
            "清理完成: 扫描 {} 个，删除 {} 个，保留 {} 个，无法解析 {} 个，失败 {} 个",
            report.scanned(),
            report.purged.len(),
            report.kept.len(),
            report.unparsable.len(),
            report.failed.len()
        );
        report
    }
}

/// 去掉前缀与扩展名后解析文件名中的时间戳
fn embedded_timestamp(filename: &str, prefix: &str) -> Option<NaiveDateTime> {
    let stamp = filename
        .strip_prefix(prefix)?
        .strip_suffix(BACKUP_EXTENSION)?;
    date_codec::parse(stamp)
}

/// 列出目录中 `<prefix>*.zip` 的普通文件，按文件名排序
async fn list_backup_files(folder: &Path, prefix: &str) -> std::io::Result<Vec<(String, PathBuf)>> {
    let mut entries = tokio::fs::read_dir(folder).await?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if !name.starts_with(prefix) || !name.ends_with(BACKUP_EXTENSION) {
            continue;
        }
        match entry.file_type().await {
            Ok(file_type) if file_type.is_file() => files.push((name, entry.path())),
            _ => debug!("跳过非文件条目: {}", name),
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const PREFIX: &str = "TeamCity_Backup_";

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn backup_name(date: NaiveDate, time: &str) -> String {
        format!("{PREFIX}{}_{time}.zip", date.format("%Y%m%d"))
    }

    #[test]
    fn test_window_boundary() {
        let policy = RetentionPolicy::default();
        let today = day(2024, 6, 20);

        for (days_ago, expected) in [(0, false), (13, false), (14, false), (15, true), (40, true)] {
            let date = today.checked_sub_days(Days::new(days_ago)).unwrap();
            // 时间部分不影响判断
            for time in ["000000", "235959"] {
                let name = backup_name(date, time);
                assert_eq!(
                    policy.is_purge_candidate(&name, PREFIX, today),
                    expected,
                    "{days_ago} 天前的备份 {name}"
                );
            }
        }
    }

    #[test]
    fn test_first_of_month_kept_forever() {
        let policy = RetentionPolicy::default();
        let today = day(2024, 6, 20);

        for date in [day(2024, 5, 1), day(2023, 1, 1), day(2019, 2, 1)] {
            assert!(!policy.is_purge_candidate(&backup_name(date, "020000"), PREFIX, today));
        }
        assert!(policy.is_purge_candidate(&backup_name(day(2024, 5, 2), "020000"), PREFIX, today));

        let no_monthly = RetentionPolicy {
            keep_monthly: false,
            ..RetentionPolicy::default()
        };
        assert!(no_monthly.is_purge_candidate(&backup_name(day(2024, 5, 1), "020000"), PREFIX, today));
    }

    #[test]
    fn test_unparsable_names_are_kept() {
        let policy = RetentionPolicy::default();
        let today = day(2024, 6, 20);

        for name in [
            "TeamCity_Backup_manual.zip",
            "TeamCity_Backup_20240230_020000.zip",
            "TeamCity_Backup_20200101_0200.zip",
            "TeamCity_Backup_20200102_020000.tar.gz",
            "Other_20200102_020000.zip",
        ] {
            assert!(!policy.is_purge_candidate(name, PREFIX, today), "{name}");
        }
    }

    #[test]
    fn test_custom_window() {
        let policy = RetentionPolicy {
            window_days: 3,
            keep_monthly: true,
        };
        let today = day(2024, 6, 20);
        assert!(!policy.is_purge_candidate(&backup_name(day(2024, 6, 17), "000000"), PREFIX, today));
        assert!(policy.is_purge_candidate(&backup_name(day(2024, 6, 16), "000000"), PREFIX, today));

        // 负数窗口算不出截止日期，全部保留
        let policy = RetentionPolicy {
            window_days: -1,
            keep_monthly: false,
        };
        assert!(!policy.is_purge_candidate(&backup_name(day(2020, 6, 2), "000000"), PREFIX, today));
    }

    #[tokio::test]
    async fn test_purge_deletes_only_candidates() {
        let temp_dir = tempdir().unwrap();
        let dir = temp_dir.path();
        let today = day(2024, 6, 20);

        let recent = backup_name(day(2024, 6, 10), "030000");
        let boundary = backup_name(day(2024, 6, 6), "030000");
        let expired = backup_name(day(2024, 6, 5), "030000");
        let monthly = backup_name(day(2024, 3, 1), "030000");
        let old = backup_name(day(2023, 11, 17), "030000");
        let garbled = "TeamCity_Backup_copy.zip".to_string();
        let foreign = "notes_20200101_000000.zip".to_string();

        for name in [&recent, &boundary, &expired, &monthly, &old, &garbled, &foreign] {
            fs::write(dir.join(name), b"PK").unwrap();
        }
        // 名字匹配的目录不应被处理
        fs::create_dir(dir.join(backup_name(day(2020, 2, 2), "000000"))).unwrap();

        let report = RetentionPolicy::default().purge(dir, PREFIX, today, false).await;

        assert_eq!(report.purged, vec![old.clone(), expired.clone()]);
        assert_eq!(report.kept, vec![monthly.clone(), boundary.clone(), recent.clone()]);
        assert_eq!(report.unparsable, vec![garbled.clone()]);
        assert!(report.failed.is_empty());

        assert!(!dir.join(&expired).exists());
        assert!(!dir.join(&old).exists());
        for name in [&recent, &boundary, &monthly, &garbled, &foreign] {
            assert!(dir.join(name).exists(), "{name} 应当保留");
        }
    }

    #[tokio::test]
    async fn test_delete_failure_does_not_stop_purge() {
        let temp_dir = tempdir().unwrap();
        let dir = temp_dir.path();
        let locked = backup_name(day(2024, 1, 5), "030000");
        let expired = backup_name(day(2024, 2, 5), "030000");
        fs::write(dir.join(&locked), b"PK").unwrap();
        fs::write(dir.join(&expired), b"PK").unwrap();

        let locked_path = dir.join(&locked);
        let report = RetentionPolicy::default()
            .purge_with(dir, PREFIX, day(2024, 6, 20), false, |path: PathBuf| {
                let in_use = path == locked_path;
                async move {
                    if in_use {
                        Err(std::io::Error::new(
                            std::io::ErrorKind::PermissionDenied,
                            "file in use",
                        ))
                    } else {
                        tokio::fs::remove_file(path).await
                    }
                }
            })
            .await;

        assert_eq!(report.failed.len(), 1);
        assert!(matches!(
            &report.failed[0],
            BackupError::DeleteFailed { path, reason }
                if path == &locked_path && reason.contains("file in use")
        ));
        assert_eq!(report.purged, vec![expired.clone()]);
        assert!(dir.join(&locked).exists());
        assert!(!dir.join(&expired).exists());
        assert_eq!(report.scanned(), 2);
    }

    #[tokio::test]
    async fn test_purge_dry_run_keeps_files() {
        let temp_dir = tempdir().unwrap();
        let expired = backup_name(day(2024, 1, 5), "030000");
        fs::write(temp_dir.path().join(&expired), b"PK").unwrap();

        let report = RetentionPolicy::default()
            .purge(temp_dir.path(), PREFIX, day(2024, 6, 20), true)
            .await;

        assert_eq!(report.purged, vec![expired.clone()]);
        assert!(temp_dir.path().join(&expired).exists());
    }

    #[tokio::test]
    async fn test_purge_missing_folder_is_not_fatal() {
        let temp_dir = tempdir().unwrap();
        let report = RetentionPolicy::default()
            .purge(&temp_dir.path().join("missing"), PREFIX, day(2024, 6, 20), false)
            .await;
        assert_eq!(report.scanned(), 0);
    }
}
