//! 基础设施层
//!
//! 持有跨业务共享的资源：页面生命周期、会话存储、作答进度存储。
//! 这一层不认识题目检索或批改流程。

pub mod progress_store;
pub mod screen_scope;
pub mod session_store;

pub use progress_store::{FileProgressStore, MemoryProgressStore, ProgressStore};
pub use screen_scope::ScreenScope;
pub use session_store::{FileSessionStore, MemorySessionStore, SessionStore};
