//! # ADProject Client
//!
//! 学生端学习平台的客户端核心：题库浏览、作业批改、推荐练习、班级与账号
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 接入层（Clients）
//! - `clients/` - 后端接口抽象与 HTTP 实现
//! - `Backend` - 所有业务组件只依赖这个 trait
//! - `HttpBackend` - reqwest 实现，固定根路径、cookie、Bearer token
//!
//! ### ② 基础设施层（Infrastructure）
//! - `infrastructure/` - 跨业务共享的资源
//! - `ScreenScope` - 页面生命周期，关闭时取消未完成的操作
//! - `SessionStore` / `ProgressStore` - 会话和作答进度的存储端口
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 核心状态机
//! - `QuestionBrowser` - 筛选 + 分页 + 代数计数 + 防抖
//! - `AssignmentGrader` - 并发拉取答案、归一化下标、计算正确率、提交
//! - `RecommendationPoller` - 触发、有限次轮询、串行解析
//!
//! ### ④ 业务服务层（Services）
//! - `services/` - 账号、班级与公告、单题练习、Dashboard
//!
//! ### ⑤ 编排层（Orchestration）
//! - `orchestrator/app` - 命令行驱动，串起一次完整运行
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

#[cfg(test)]
pub(crate) mod testing;

// 重新导出常用类型
pub use clients::{Backend, HttpBackend};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::ScreenScope;
pub use orchestrator::App;
pub use workflow::{AssignmentGrader, QuestionBrowser, RecommendationPoller};
