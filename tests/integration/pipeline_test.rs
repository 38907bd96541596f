// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::stream;
use futures::StreamExt;
use tokio::sync::watch;

use pricers::domain::models::item::{Item, ShopCatalog};
use pricers::domain::models::price_event::PriceEvent;
use pricers::domain::models::task::TaskItem;
use pricers::plugins::registry::PluginRegistry;
use pricers::plugins::stub::StubPlugin;
use pricers::plugins::traits::{PriceEventStream, ShopPlugin};
use pricers::scheduler::scheduler::BatchScheduler;
use pricers::workers::scrape_worker::ScrapeWorker;

use crate::helpers::{wait_until, MockEventStream, MockWorkQueue};

fn sample_catalog(count: usize) -> ShopCatalog {
    let mut catalog = BTreeMap::new();
    for i in 0..count {
        let id = format!("10{:04}", i);
        catalog.insert(
            id.clone(),
            Item {
                id: id.clone(),
                ean: Some(format!("764016574{:04}", i)),
                url: format!("https://www.interdiscount.ch/de/p/{}", id),
                name: Some(format!("Product {}", i)),
                price: None,
                selector: "script[type=\"application/ld+json\"]".to_string(),
            },
        );
    }
    catalog
}

/// 调度器写入的批次被工作器消费，每个商品产出一条价格事件
#[tokio::test]
async fn test_catalog_flows_from_scheduler_to_event_stream() {
    let queue = Arc::new(MockWorkQueue::new(5));
    let stream = Arc::new(MockEventStream::new());

    let scheduler = BatchScheduler::new(queue.clone(), 2, "edge");
    let catalog = sample_catalog(5);
    let batches = scheduler.schedule("interdiscount", &catalog).await.unwrap();
    assert_eq!(batches, 3);
    assert_eq!(queue.ready_len(), 3);

    let mut registry = PluginRegistry::new();
    registry.register(Arc::new(StubPlugin::new("interdiscount", 42.5)));

    let worker = ScrapeWorker::new(
        queue.clone(),
        stream.clone(),
        Arc::new(registry),
        Duration::from_millis(5),
    );
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(async move { worker.run(shutdown_rx).await });

    let drained = wait_until(Duration::from_secs(5), || {
        stream.len() == 5 && queue.is_drained()
    })
    .await;
    shutdown_tx.send(true).unwrap();
    handle.await.unwrap();

    assert!(drained, "worker did not drain the queue in time");
    assert!(queue.dead_letters().is_empty());

    // 每个目录条目恰好一条事件，身份字段来自目录
    let mut events: Vec<PriceEvent> = stream.events();
    events.sort_by(|a, b| a.id.cmp(&b.id));
    let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["100000", "100001", "100002", "100003", "100004"]);
    assert!(events.iter().all(|e| e.shop == "interdiscount" && e.price == 42.5));
    assert_eq!(events[0].ean.as_deref(), Some("7640165740000"));
}

/// 首次投递失败的批次被重投递并最终成功，体现至少一次语义
#[tokio::test]
async fn test_abandoned_batch_is_redelivered_until_success() {
    struct FlakyOncePlugin {
        calls: AtomicUsize,
    }

    impl ShopPlugin for FlakyOncePlugin {
        fn shop(&self) -> &str {
            "interdiscount"
        }

        fn fetch_batch(&self, items: Vec<TaskItem>) -> PriceEventStream<'_> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call == 0 {
                stream::iter(vec![Err(pricers::plugins::traits::PluginError::Other(
                    "first delivery fails".to_string(),
                ))])
                .boxed()
            } else {
                stream::iter(items.into_iter().map(|item| {
                    Ok(PriceEvent {
                        shop: "interdiscount".to_string(),
                        id: item.id,
                        ean: item.ean,
                        price: 99.0,
                        observed_at: chrono::Utc::now(),
                    })
                }))
                .boxed()
            }
        }
    }

    let queue = Arc::new(MockWorkQueue::new(5));
    let stream = Arc::new(MockEventStream::new());

    let scheduler = BatchScheduler::new(queue.clone(), 10, "edge");
    scheduler
        .schedule("interdiscount", &sample_catalog(2))
        .await
        .unwrap();

    let mut registry = PluginRegistry::new();
    registry.register(Arc::new(FlakyOncePlugin {
        calls: AtomicUsize::new(0),
    }));

    let worker = ScrapeWorker::new(
        queue.clone(),
        stream.clone(),
        Arc::new(registry),
        Duration::from_millis(5),
    );
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(async move { worker.run(shutdown_rx).await });

    let drained = wait_until(Duration::from_secs(5), || {
        stream.len() == 2 && queue.is_drained()
    })
    .await;
    shutdown_tx.send(true).unwrap();
    handle.await.unwrap();

    assert!(drained, "batch was not redelivered in time");
    assert!(queue.dead_letters().is_empty());
    assert_eq!(stream.len(), 2);
}
