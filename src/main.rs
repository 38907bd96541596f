// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use pricers::config::settings::Settings;
use pricers::discovery::discoverer::Discoverer;
use pricers::discovery::profile::ShopProfile;
use pricers::discovery::refresh::refresh_catalog;
use pricers::fetcher::http_fetcher::HttpFetcher;
use pricers::fetcher::retry_policy::RetryPolicy;
use pricers::infrastructure::catalog_store::{CatalogStore, YamlCatalogStore};
use pricers::plugins::edge::EdgeProxyPlugin;
use pricers::plugins::registry::PluginRegistry;
use pricers::queue::redis_queue::RedisWorkQueue;
use pricers::scheduler::scheduler::BatchScheduler;
use pricers::stream::redis_stream::RedisEventStream;
use pricers::utils::telemetry;
use pricers::workers::manager::WorkerManager;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting pricers...");

    // Initialize Prometheus Metrics
    pricers::infrastructure::metrics::init_metrics();

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!("Configuration loaded");

    // 3. Initialize work queue and event stream
    let queue = Arc::new(RedisWorkQueue::new(
        &settings.redis.url,
        &settings.queue.name,
        &settings.queue.dead_letter_name,
        settings.queue.max_deliveries,
    )?);
    let recovered = queue.recover().await?;
    if recovered > 0 {
        warn!("Recovered {} in-flight messages from previous run", recovered);
    }

    let stream = Arc::new(RedisEventStream::new(
        &settings.redis.url,
        &settings.stream.topic,
    )?);
    info!("Redis queue and event stream initialized");

    // 4. Resolve shop profiles, interdiscount is built in
    let mut shops = settings.shops.clone();
    shops
        .entry("interdiscount".to_string())
        .or_insert_with(ShopProfile::interdiscount);

    // 5. Optionally refresh the catalog via discovery
    let catalog_store = YamlCatalogStore::new(&settings.pipeline.catalog_path);
    if settings.pipeline.run_discovery {
        let policy = RetryPolicy::with_rate(
            settings.discovery.max_attempts,
            settings.discovery.rate_limit,
        );
        let fetcher = Arc::new(HttpFetcher::new(
            policy,
            settings.discovery.rate_limit,
            Duration::from_secs(settings.discovery.request_timeout_secs),
        )?);
        let discoverer = Discoverer::new(
            fetcher,
            settings.discovery.detail_batch_size,
            settings.discovery.fanout_limit,
        );

        refresh_catalog(&discoverer, &catalog_store, &shops).await?;
    }

    // 6. Optionally schedule the catalog onto the work queue
    if settings.pipeline.run_scheduler {
        let scheduler = BatchScheduler::new(
            queue.clone(),
            settings.scheduler.batch_size,
            settings.scheduler.mode.clone(),
        );
        let catalog = catalog_store.load().await?;
        for (shop, items) in &catalog {
            let batches = scheduler.schedule(shop, items).await?;
            info!("Scheduled {} batches for shop {}", batches, shop);
        }
    }

    // 7. Register shop plugins
    let mut registry = PluginRegistry::new();
    for shop in shops.keys() {
        registry.register(Arc::new(EdgeProxyPlugin::new(
            shop.clone(),
            settings.worker.edge_url.clone(),
        )));
    }
    let registry = Arc::new(registry);
    info!("Registered plugins for shops: {:?}", registry.shops());

    // 8. Start workers and wait for shutdown
    let mut worker_manager = WorkerManager::new(
        queue,
        stream,
        registry,
        Duration::from_secs(settings.worker.poll_interval_secs),
    );
    worker_manager.start_workers(settings.worker.count);
    worker_manager.wait_for_shutdown().await;

    Ok(())
}
