// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 抓取客户端模块
///
/// 提供带速率限制与有界指数退避重试的HTTP JSON客户端，
/// 供发现阶段访问搜索接口与详情接口使用。
pub mod http_fetcher;
pub mod retry_policy;

pub use http_fetcher::{FetchError, HttpFetcher};
pub use retry_policy::RetryPolicy;
