/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// `RUST_LOG` 优先；未设置时默认 `info`，详细模式下为 `debug`。
/// 重复初始化（例如测试中）会被忽略。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `base_url`: 后端接口地址
/// - `user`: 当前登录用户（未登录为 None）
pub fn log_startup(base_url: &str, user: Option<&str>) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
    info!("🌐 后端地址: {}", base_url);
    match user {
        Some(name) => info!("👤 当前用户: {}", name),
        None => info!("👤 当前未登录"),
    }
    info!("{}", "=".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `loaded`: 已加载题目数
/// - `recommended`: 已获取推荐数
/// - `placeholders`: 推荐详情获取失败（占位）数
pub fn print_final_stats(loaded: usize, recommended: usize, placeholders: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📊 运行统计");
    info!("完成时间: {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
    info!("{}", "=".repeat(60));
    info!("📚 已加载题目: {}", loaded);
    info!("✅ 推荐题目: {}", recommended);
    info!("⚠️ 推荐占位: {}", placeholders);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
