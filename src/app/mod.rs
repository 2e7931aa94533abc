// ==========================================
// M2O 主数据配置系统 - 应用层
// ==========================================
// 职责: 会话编排,连接导入、引擎与导出
// ==========================================

pub mod selection_file;
pub mod session;

// 重导出
pub use selection_file::{SelectionEntry, SelectionFile};
pub use session::ConfiguratorSession;
