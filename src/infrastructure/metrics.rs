// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::describe_counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::info;

pub fn init_metrics() {
    let builder = PrometheusBuilder::new();
    let addr: SocketAddr = "0.0.0.0:9000".parse().expect("Invalid metrics address");

    // Start the exporter
    // Ignore error if address is already in use (for development/testing)
    if let Err(e) = builder.with_http_listener(addr).install() {
        tracing::warn!("Failed to install Prometheus recorder: {}. This might happen if the port is already in use.", e);
    }

    describe_counter!(
        "discovery_pages_fetched_total",
        "Search pages fetched during discovery runs"
    );
    describe_counter!(
        "discovery_detail_batches_total",
        "Detail batches resolved during discovery runs"
    );
    describe_counter!(
        "scheduler_batches_published_total",
        "Task batches published to the work queue"
    );
    describe_counter!(
        "queue_messages_dead_lettered_total",
        "Messages moved to the dead letter queue after exhausting deliveries"
    );
    describe_counter!(
        "stream_events_published_total",
        "Price events appended to the event stream"
    );
    describe_counter!(
        "worker_messages_acked_total",
        "Batch messages acknowledged after successful processing"
    );
    describe_counter!(
        "worker_messages_abandoned_total",
        "Batch messages abandoned back to the queue"
    );
    describe_counter!(
        "worker_events_published_total",
        "Price events published by workers"
    );

    info!("Metrics exporter listening on {}", addr);
}
