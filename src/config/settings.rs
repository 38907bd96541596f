// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::HashMap;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::discovery::profile::ShopProfile;

/// 应用程序配置设置
///
/// 包含 Redis、发现、调度、队列、事件流和工作器等所有配置项
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// Redis配置
    pub redis: RedisSettings,
    /// 商品发现配置
    pub discovery: DiscoverySettings,
    /// 批次调度配置
    pub scheduler: SchedulerSettings,
    /// 工作队列配置
    pub queue: QueueSettings,
    /// 事件流配置
    pub stream: StreamSettings,
    /// 工作器配置
    pub worker: WorkerSettings,
    /// 流水线各阶段的启停配置
    pub pipeline: PipelineSettings,
    /// 各商店的接入配置，键为商店名
    #[serde(default)]
    pub shops: HashMap<String, ShopProfile>,
}

/// Redis配置设置
#[derive(Debug, Deserialize)]
pub struct RedisSettings {
    /// Redis连接URL
    pub url: String,
}

/// 商品发现配置设置
#[derive(Debug, Deserialize)]
pub struct DiscoverySettings {
    /// 详情接口每次请求的标识符数量
    pub detail_batch_size: usize,
    /// 每秒最大请求数
    pub rate_limit: u32,
    /// 单个请求的最大尝试次数
    pub max_attempts: u32,
    /// 请求超时时间（秒）
    pub request_timeout_secs: u64,
    /// 分页抓取的最大并发数
    pub fanout_limit: usize,
}

/// 批次调度配置设置
#[derive(Debug, Deserialize)]
pub struct SchedulerSettings {
    /// 每个任务批次的商品数量上限
    pub batch_size: usize,
    /// 写入批次的处理模式
    pub mode: String,
}

/// 工作队列配置设置
#[derive(Debug, Deserialize)]
pub struct QueueSettings {
    /// 主队列键名
    pub name: String,
    /// 死信队列键名
    pub dead_letter_name: String,
    /// 单条消息的最大投递次数，超过后进入死信队列
    pub max_deliveries: u32,
}

/// 事件流配置设置
#[derive(Debug, Deserialize)]
pub struct StreamSettings {
    /// 价格事件发布的流主题
    pub topic: String,
}

/// 工作器配置设置
#[derive(Debug, Deserialize)]
pub struct WorkerSettings {
    /// 工作器数量
    pub count: usize,
    /// 队列为空时的轮询间隔（秒）
    pub poll_interval_secs: u64,
    /// 边缘代理抓取端点URL
    pub edge_url: String,
}

/// 流水线配置设置
///
/// 发现与调度是按需执行的阶段，默认只运行工作器
#[derive(Debug, Deserialize)]
pub struct PipelineSettings {
    /// 启动时是否运行商品发现
    pub run_discovery: bool,
    /// 启动时是否把目录调度进工作队列
    pub run_scheduler: bool,
    /// 商品目录文件路径
    pub catalog_path: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从配置文件和环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Start with default settings
            .set_default("redis.url", "redis://127.0.0.1:6379")?
            // Default discovery settings
            .set_default("discovery.detail_batch_size", 20)?
            .set_default("discovery.rate_limit", 1)?
            .set_default("discovery.max_attempts", 4)?
            .set_default("discovery.request_timeout_secs", 20)?
            .set_default("discovery.fanout_limit", 4)?
            // Default scheduler settings
            .set_default("scheduler.batch_size", 25)?
            .set_default("scheduler.mode", "edge")?
            // Default queue settings
            .set_default("queue.name", "scrape-tasks")?
            .set_default("queue.dead_letter_name", "scrape-tasks-dead")?
            .set_default("queue.max_deliveries", 5)?
            // Default stream settings
            .set_default("stream.topic", "price-events")?
            // Default worker settings
            .set_default("worker.count", 4)?
            .set_default("worker.poll_interval_secs", 1)?
            .set_default("worker.edge_url", "http://127.0.0.1:8787/scrape")?
            // Default pipeline settings
            .set_default("pipeline.run_discovery", false)?
            .set_default("pipeline.run_scheduler", false)?
            .set_default("pipeline.catalog_path", "config/sites.yml")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("PRICERS").separator("__"));

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
