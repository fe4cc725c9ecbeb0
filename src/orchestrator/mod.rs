//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 组装后端客户端、本地存储和各业务组件，驱动一次完整的运行。
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::App (命令行驱动)
//!     ↓
//! services (账号 / 班级 / 练习 / Dashboard)
//! workflow (题库浏览 / 作业批改 / 推荐轮询)
//!     ↓
//! clients (Backend trait + HttpBackend)
//! infrastructure (ScreenScope / SessionStore / ProgressStore)
//! ```

pub mod app;

pub use app::App;
