//! 引擎指标（原子计数器）

use std::sync::atomic::{AtomicU64, Ordering};

/// 引擎计数器集合
///
/// 所有计数器都是单调递增的原子量，排空线程与接收线程并发更新。
#[derive(Debug, Default)]
pub struct EngineMetrics {
    enqueued: AtomicU64,
    drained: AtomicU64,
    immediate: AtomicU64,
    failures: AtomicU64,
    clears: AtomicU64,
}

impl EngineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_enqueued(&self, count: u64) {
        self.enqueued.fetch_add(count, Ordering::Relaxed);
    }

    pub(crate) fn record_drained(&self) {
        self.drained.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_immediate(&self) {
        self.immediate.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_clear(&self) {
        self.clears.fetch_add(1, Ordering::Relaxed);
    }

    /// 一致性快照（各计数器独立读取，非事务性）
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            enqueued: self.enqueued.load(Ordering::Relaxed),
            drained: self.drained.load(Ordering::Relaxed),
            immediate: self.immediate.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            clears: self.clears.load(Ordering::Relaxed),
        }
    }
}

/// 指标快照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    /// 入队的指令总数
    pub enqueued: u64,
    /// 排空成功的条目总数
    pub drained: u64,
    /// 立即路径执行的指令总数
    pub immediate: u64,
    /// 执行失败总数（两条路径合计）
    pub failures: u64,
    /// 清队次数
    pub clears: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_counters() {
        let metrics = EngineMetrics::new();
        metrics.record_enqueued(3);
        metrics.record_drained();
        metrics.record_drained();
        metrics.record_failure();
        metrics.record_clear();

        let snap = metrics.snapshot();
        assert_eq!(snap.enqueued, 3);
        assert_eq!(snap.drained, 2);
        assert_eq!(snap.immediate, 0);
        assert_eq!(snap.failures, 1);
        assert_eq!(snap.clears, 1);
    }
}
