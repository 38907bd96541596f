// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use pricers::domain::models::task::{TaskBatch, TaskItem};
use pricers::plugins::registry::PluginRegistry;
use pricers::plugins::stub::StubPlugin;
use pricers::queue::task_queue::WorkQueue;
use pricers::workers::scrape_worker::ScrapeWorker;

use crate::helpers::{wait_until, MockEventStream, MockWorkQueue};

/// 无法处理的批次在耗尽投递次数后进入死信，不再无限重投递
#[tokio::test]
async fn test_poison_batch_lands_in_dead_letter_queue() {
    let queue = Arc::new(MockWorkQueue::new(3));
    let stream = Arc::new(MockEventStream::new());

    // 没有插件能处理这个商店，每次投递都会被放弃
    let poison = TaskBatch::new(
        "defunct-shop",
        "edge",
        vec![TaskItem {
            id: "100200".to_string(),
            ean: None,
            url: "https://defunct.example/p/100200".to_string(),
            selector: "meta[itemprop=\"price\"]".to_string(),
        }],
    );
    queue.publish(&poison).await.unwrap();

    // 正常批次与毒消息共存，不受其影响
    let healthy = TaskBatch::new(
        "interdiscount",
        "edge",
        vec![TaskItem {
            id: "100300".to_string(),
            ean: Some("7640165741003".to_string()),
            url: "https://www.interdiscount.ch/de/p/100300".to_string(),
            selector: "script[type=\"application/ld+json\"]".to_string(),
        }],
    );
    queue.publish(&healthy).await.unwrap();

    let mut registry = PluginRegistry::new();
    registry.register(Arc::new(StubPlugin::new("interdiscount", 15.0)));

    let worker = ScrapeWorker::new(
        queue.clone(),
        stream.clone(),
        Arc::new(registry),
        Duration::from_millis(5),
    );
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(async move { worker.run(shutdown_rx).await });

    let settled = wait_until(Duration::from_secs(5), || {
        queue.is_drained() && !queue.dead_letters().is_empty()
    })
    .await;
    shutdown_tx.send(true).unwrap();
    handle.await.unwrap();

    assert!(settled, "poison batch was not dead lettered in time");

    let dead = queue.dead_letters();
    assert_eq!(dead.len(), 1);
    assert_eq!(dead[0].shop, "defunct-shop");

    // 正常批次照常产出事件
    let events = stream.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id, "100300");
    assert_eq!(events[0].price, 15.0);
}
