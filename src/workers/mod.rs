// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// 提供后台批次处理和工作器生命周期管理功能
pub mod manager;
pub mod scrape_worker;

pub use manager::WorkerManager;
pub use scrape_worker::ScrapeWorker;
