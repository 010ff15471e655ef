use crate::error::Result;
use crate::status::BackupStatus;
use std::future::Future;
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

/// 轮询的终止状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// 服务端返回 Idle
    Completed,
    /// 超过总超时仍未空闲
    TimedOut,
}

/// 轮询结束时的状态快照
#[derive(Debug, Clone)]
pub struct PollState {
    /// 最后一次查询到的状态
    pub status: BackupStatus,
    /// 从轮询开始经过的时间（单调时钟）
    pub elapsed: Duration,
    /// 状态查询次数
    pub polls: u32,
    pub outcome: PollOutcome,
}

impl PollState {
    pub fn is_completed(&self) -> bool {
        self.outcome == PollOutcome::Completed
    }
}

/// 反复查询状态直到服务端空闲或超时
///
/// 每一轮先查询状态：空闲则完成；已达到超时则结束；否则休眠 `interval`
/// （不超过剩余时间）后进入下一轮。因此 `timeout` 为零时只查询一次且不休眠，
/// 总耗时不超过 `timeout` 加一次查询的往返时间。
///
/// 认证失败会直接返回错误，其它查询失败只记录警告并按"仍在进行"处理。
pub async fn poll_until_idle<F, Fut>(
    mut status_fn: F,
    interval: Duration,
    timeout: Duration,
) -> Result<PollState>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<BackupStatus>>,
{
    let start_time = Instant::now();
    let mut polls = 0u32;

    info!(
        "开始等待备份完成，查询间隔: {} 秒，超时: {} 秒",
        interval.as_secs(),
        timeout.as_secs()
    );

    loop {
        polls += 1;
        let status = match status_fn().await {
            Ok(status) => status,
            Err(e) if e.is_authentication() => return Err(e),
            Err(e) => {
                warn!("查询备份状态时出错，按进行中处理: {}", e);
                BackupStatus::InProgress(String::new())
            }
        };
        let elapsed = start_time.elapsed();
        debug!(polls, elapsed_secs = elapsed.as_secs(), %status, "备份状态查询");

        if status.is_idle() {
            info!("备份已完成，共查询 {} 次，耗时 {} 秒", polls, elapsed.as_secs());
            return Ok(PollState {
                status,
                elapsed,
                polls,
                outcome: PollOutcome::Completed,
            });
        }

        if elapsed >= timeout {
            warn!(
                "等待备份完成超时 ({} 秒)，最后状态: {}",
                timeout.as_secs(),
                status
            );
            return Ok(PollState {
                status,
                elapsed,
                polls,
                outcome: PollOutcome::TimedOut,
            });
        }

        // 最后一次查询恰好落在截止时间上
        let wait = interval.min(timeout.saturating_sub(elapsed));
        info!("备份进行中 ({})，{} 秒后再次查询...", status, wait.as_secs());
        sleep(wait).await;
    }
}
