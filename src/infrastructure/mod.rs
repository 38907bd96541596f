// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 该模块包含系统的技术实现细节，负责与外部系统的交互。
///
/// 包含的子模块：
/// - 目录存储（catalog_store）：商品目录的持久化读写
/// - 指标（metrics）：提供系统监控和性能指标收集
pub mod catalog_store;
pub mod metrics;
