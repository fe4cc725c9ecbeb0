/// Dashboard 服务
///
/// 历史正确率，按最近 N 天截取并换算为百分比
use std::sync::Arc;

use tracing::debug;

use crate::clients::Backend;
use crate::error::{AppError, AppResult};

/// 支持的时间窗口（天）
pub const WINDOWS: [usize; 3] = [3, 5, 7];

/// 历史正确率，取值 [0, 1]，按时间先后排列
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardStats {
    pub accuracy_rates: Vec<f64>,
}

impl DashboardStats {
    /// 最近 `days` 天的正确率百分比，不足 `days` 天时返回全部
    pub fn window(&self, days: usize) -> Vec<f64> {
        let start = self.accuracy_rates.len().saturating_sub(days);
        self.accuracy_rates[start..]
            .iter()
            .map(|rate| (rate * 10_000.0).round() / 100.0)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.accuracy_rates.is_empty()
    }
}

pub struct DashboardService {
    backend: Arc<dyn Backend>,
}

impl DashboardService {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    pub async fn accuracy_history(&self) -> AppResult<DashboardStats> {
        let accuracy_rates = self.backend.accuracy_rates().await?;
        debug!("📈 获取到 {} 天的正确率", accuracy_rates.len());
        Ok(DashboardStats { accuracy_rates })
    }

    /// 拉取并截取最近 `days` 天
    pub async fn window(&self, days: usize) -> AppResult<Vec<f64>> {
        if !WINDOWS.contains(&days) {
            return Err(AppError::invalid_input(format!(
                "时间窗口只支持 {:?} 天",
                WINDOWS
            )));
        }
        Ok(self.accuracy_history().await?.window(days))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockBackend;

    #[test]
    fn window_takes_the_most_recent_days_as_percentages() {
        let stats = DashboardStats {
            accuracy_rates: vec![0.1, 0.2, 0.5, 0.75, 1.0],
        };
        assert_eq!(stats.window(3), vec![50.0, 75.0, 100.0]);
        assert_eq!(stats.window(7).len(), 5);
        assert!(DashboardStats::default().window(3).is_empty());
    }

    #[tokio::test]
    async fn unsupported_window_is_rejected_locally() {
        let mock = Arc::new(MockBackend::new());
        mock.set_accuracy_rates(vec![0.5, 0.6]);
        let service = DashboardService::new(mock.clone());

        assert!(service.window(4).await.unwrap_err().is_precondition());
        assert_eq!(mock.total_calls(), 0);
        assert_eq!(service.window(5).await.unwrap(), vec![50.0, 60.0]);
    }
}
