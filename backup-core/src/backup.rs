use crate::{
    BackupError, Result,
    api::{BackupApi, BackupRequest},
    locator,
    poll::{PollState, poll_until_idle},
    retention::{PurgeReport, RetentionPolicy},
};
use chrono::NaiveDate;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// 一次备份运行的参数
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// 备份触发参数
    pub request: BackupRequest,
    /// 备份所在目录（共享路径或本地挂载点）
    pub backup_dir: PathBuf,
    /// 状态查询间隔
    pub poll_interval: Duration,
    /// 等待备份完成的总超时
    pub poll_timeout: Duration,
    /// 保留策略
    pub retention: RetentionPolicy,
    /// 保留策略中的"今天"
    pub today: NaiveDate,
}

/// 一次备份运行的结果
#[derive(Debug)]
pub struct RunReport {
    /// 服务端生成的备份文件名
    pub filename: String,
    /// 备份文件的预期路径
    pub artifact: PathBuf,
    pub poll: PollState,
    pub artifact_found: bool,
    pub purge: PurgeReport,
    /// 超时、文件缺失等非致命问题
    pub warnings: Vec<BackupError>,
}

impl RunReport {
    /// 备份完成且文件已确认落盘
    pub fn is_success(&self) -> bool {
        self.poll.is_completed() && self.artifact_found
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len() + self.purge.failed.len()
    }
}

/// 备份生命周期编排：触发 -> 轮询 -> 校验文件 -> 清理过期备份
#[derive(Debug, Clone)]
pub struct BackupRunner<A> {
    api: A,
}

impl<A: BackupApi> BackupRunner<A> {
    /// 创建新的备份编排器
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// 执行完整的备份流程
    ///
    /// 只有触发失败（认证、网络）会返回错误；之后的问题都降级为警告，
    /// 清理步骤在超时后同样执行，因为它只处理已经落盘的文件
    #[instrument(skip_all, fields(file_name = %options.request.file_name))]
    pub async fn run(&self, options: &RunOptions) -> Result<RunReport> {
        info!("💾 开始 TeamCity 服务端备份");

        let filename = self.api.trigger(&options.request).await?;
        let artifact = locator::artifact_path(&options.backup_dir, &filename);

        let poll = poll_until_idle(
            || self.api.status(),
            options.poll_interval,
            options.poll_timeout,
        )
        .await?;

        let mut warnings = Vec::new();
        let mut artifact_found = false;

        if poll.is_completed() {
            artifact_found = locator::artifact_exists(&artifact).await;
            if artifact_found {
                info!("✅ 备份文件已确认: {}", artifact.display());
            } else {
                let warning = BackupError::ArtifactNotFound(artifact.clone());
                warn!("⚠️  {}", warning);
                warnings.push(warning);
            }
        } else {
            let warning = BackupError::TimeoutExceeded {
                waited_seconds: poll.elapsed.as_secs(),
            };
            warn!("⚠️  {}", warning);
            warnings.push(warning);
        }

        let purge = options
            .retention
            .purge(
                &options.backup_dir,
                &options.request.purge_prefix(),
                options.today,
                false,
            )
            .await;

        Ok(RunReport {
            filename,
            artifact,
            poll,
            artifact_found,
            purge,
            warnings,
        })
    }
}
