// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含流水线的核心业务实体（models）。
/// 领域层不依赖任何外部实现，只定义发现、调度与
/// 消费各阶段之间共享的数据契约。
pub mod models;
