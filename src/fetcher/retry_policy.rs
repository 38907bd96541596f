// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::time::Duration;

/// 重试策略配置
///
/// 描述抓取客户端的重试预算与退避日程：第一次尝试前等待一个
/// 基础限速间隔，第 k 次尝试（k≥2）前等待 `base * multiplier^(k-1)`，
/// 并可叠加抖动以避免并发重试风暴同步。
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// 最大尝试次数（含首次尝试）
    pub max_attempts: u32,
    /// 基础退避间隔，等于限速间隔
    pub base_interval: Duration,
    /// 最大退避时间
    pub max_backoff: Duration,
    /// 退避乘数
    pub backoff_multiplier: f64,
    /// 抖动因子 (0.0-1.0)
    pub jitter_factor: f64,
    /// 是否启用抖动
    pub enable_jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_interval: Duration::from_secs(1),
            max_backoff: Duration::from_secs(60),
            backoff_multiplier: 2.0,
            jitter_factor: 0.1,
            enable_jitter: true,
        }
    }
}

impl RetryPolicy {
    /// 按每秒请求数构造策略，基础间隔取限速间隔
    pub fn with_rate(max_attempts: u32, requests_per_second: u32) -> Self {
        let rps = requests_per_second.max(1);
        Self {
            max_attempts,
            base_interval: Duration::from_secs_f64(1.0 / rps as f64),
            ..Self::default()
        }
    }

    /// 计算第 `attempt` 次尝试（1起始）前的退避时间
    ///
    /// 首次尝试退避一个基础间隔，之后按指数增长并受最大退避约束。
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return self.base_interval;
        }

        let backoff_secs = self.base_interval.as_secs_f64()
            * self.backoff_multiplier.powi(attempt as i32 - 1);
        let capped = backoff_secs.min(self.max_backoff.as_secs_f64());

        let final_backoff = if self.enable_jitter {
            let jitter_range = capped * self.jitter_factor;
            if jitter_range > 0.0 {
                let jitter = rand::random_range(-jitter_range..jitter_range);
                (capped + jitter).max(0.0)
            } else {
                capped
            }
        } else {
            capped
        };

        Duration::from_secs_f64(final_backoff)
    }

    /// 第 `attempt` 次尝试失败后是否还应重试
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_jitter(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_interval: Duration::from_secs(1),
            enable_jitter: false,
            ..RetryPolicy::default()
        }
    }

    #[test]
    fn test_first_attempt_waits_one_base_interval() {
        let policy = no_jitter(4);
        assert_eq!(policy.delay_before(1), Duration::from_secs(1));
    }

    #[test]
    fn test_backoff_doubles_per_attempt() {
        let policy = no_jitter(4);
        assert_eq!(policy.delay_before(2), Duration::from_secs(2));
        assert_eq!(policy.delay_before(3), Duration::from_secs(4));
        assert_eq!(policy.delay_before(4), Duration::from_secs(8));
    }

    #[test]
    fn test_backoff_is_capped() {
        let policy = RetryPolicy {
            max_backoff: Duration::from_secs(5),
            ..no_jitter(10)
        };
        assert_eq!(policy.delay_before(8), Duration::from_secs(5));
    }

    #[test]
    fn test_jitter_stays_within_bounds() {
        let policy = RetryPolicy {
            enable_jitter: true,
            jitter_factor: 0.1,
            ..no_jitter(4)
        };
        for _ in 0..100 {
            let delay = policy.delay_before(3).as_secs_f64();
            assert!((3.6..=4.4).contains(&delay), "delay out of bounds: {}", delay);
        }
    }

    #[test]
    fn test_retry_budget() {
        let policy = no_jitter(4);
        assert!(policy.should_retry(1));
        assert!(policy.should_retry(3));
        assert!(!policy.should_retry(4));
    }
}
