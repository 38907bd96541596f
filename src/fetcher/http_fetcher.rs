// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::fetcher::retry_policy::RetryPolicy;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use serde_json::Value;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// 抓取错误类型
#[derive(Error, Debug)]
pub enum FetchError {
    /// 瞬时失败：网络错误、超时、5xx、429，可在重试预算内重试
    #[error("Transient fetch failure for {url}: {reason}")]
    Transient {
        /// 目标URL
        url: String,
        /// 失败原因
        reason: String,
    },
    /// 永久失败：非429的4xx或响应体不是合法JSON，不重试
    #[error("Fatal fetch failure for {url}: {reason}")]
    Fatal {
        /// 目标URL
        url: String,
        /// 失败原因
        reason: String,
    },
}

impl FetchError {
    /// 判断错误是否可重试
    pub fn is_retryable(&self) -> bool {
        matches!(self, FetchError::Transient { .. })
    }
}

/// HTTP JSON抓取客户端
///
/// 对上游接口的所有请求都经过共享的速率限制器，瞬时失败按
/// 重试策略做有界指数退避重试，永久失败立即返回。除发出请求
/// 外没有其他副作用，不做任何缓存。
pub struct HttpFetcher {
    client: reqwest::Client,
    limiter: Arc<DefaultDirectRateLimiter>,
    policy: RetryPolicy,
}

impl HttpFetcher {
    /// 创建新的抓取客户端
    ///
    /// # 参数
    ///
    /// * `policy` - 重试策略
    /// * `requests_per_second` - 商店级速率限制（每秒请求数）
    /// * `request_timeout` - 单次尝试的请求截止时间
    pub fn new(
        policy: RetryPolicy,
        requests_per_second: u32,
        request_timeout: Duration,
    ) -> anyhow::Result<Self> {
        let rps = NonZeroU32::new(requests_per_second.max(1)).unwrap_or(NonZeroU32::MIN);
        let client = reqwest::Client::builder()
            .user_agent(
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
                 AppleWebKit/537.36 (KHTML, like Gecko) Chrome/136.0.0.0 Safari/537.36",
            )
            .timeout(request_timeout)
            .build()?;

        Ok(Self {
            client,
            limiter: Arc::new(RateLimiter::direct(Quota::per_second(rps))),
            policy,
        })
    }

    /// 抓取URL并解析为JSON文档
    ///
    /// # 返回值
    ///
    /// * `Ok(Value)` - 解析出的JSON文档
    /// * `Err(FetchError)` - 重试预算耗尽后的瞬时失败或立即返回的永久失败
    pub async fn fetch(&self, url: &str) -> Result<Value, FetchError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            // 首次尝试也等一个基础间隔，重试按策略退避
            tokio::time::sleep(self.policy.delay_before(attempt)).await;
            self.limiter.until_ready().await;

            match self.try_fetch(url).await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && self.policy.should_retry(attempt) => {
                    warn!(
                        url = url,
                        attempt = attempt,
                        error = %err,
                        "Transient fetch failure, will retry"
                    );
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn try_fetch(&self, url: &str) -> Result<Value, FetchError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| classify_request_error(url, &e))?;

        let status = response.status();
        if status.is_server_error() || status.as_u16() == 429 {
            return Err(FetchError::Transient {
                url: url.to_string(),
                reason: format!("HTTP {}", status.as_u16()),
            });
        }
        if status.is_client_error() {
            return Err(FetchError::Fatal {
                url: url.to_string(),
                reason: format!("HTTP {}", status.as_u16()),
            });
        }

        response.json::<Value>().await.map_err(|e| FetchError::Fatal {
            url: url.to_string(),
            reason: format!("Malformed JSON response: {}", e),
        })
    }
}

fn classify_request_error(url: &str, err: &reqwest::Error) -> FetchError {
    if err.is_timeout() || err.is_connect() || err.is_request() {
        FetchError::Transient {
            url: url.to_string(),
            reason: err.to_string(),
        }
    } else {
        FetchError::Fatal {
            url: url.to_string(),
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "http_fetcher_test.rs"]
mod tests;
