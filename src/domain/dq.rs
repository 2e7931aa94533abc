// ==========================================
// M2O 主数据配置系统 - 数据质量记录
// ==========================================
// 用途: 目录 / 价格表导入时的数据质量违规与汇总
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// DqLevel - 数据质量级别
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DqLevel {
    Error,    // 错误（该行未导入）
    Warning,  // 警告（已导入）
    Conflict, // 冲突（重复键,保留首行）
}

// ==========================================
// DqViolation - 数据质量违规记录
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DqViolation {
    pub source: String,          // 数据源（目录 / 价格表工作表）
    pub row_number: usize,       // 原始文件行号
    pub key: Option<String>,     // item_no / article_no（如果可解析）
    pub level: DqLevel,          // 违规级别
    pub field: String,           // 违规字段
    pub message: String,         // 违规描述
}

// ==========================================
// DqSummary - 数据质量汇总
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DqSummary {
    pub total_rows: usize, // 总行数
    pub accepted: usize,   // 成功导入
    pub blocked: usize,    // 阻断（ERROR）
    pub warning: usize,    // 警告（WARNING）
    pub conflict: usize,   // 冲突（CONFLICT）
}

// ==========================================
// DqReport - 数据质量报告
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DqReport {
    pub summary: DqSummary,
    pub violations: Vec<DqViolation>,
}

impl DqReport {
    /// 由违规明细生成报告（总行数 / 成功数由调用方提供）
    pub fn from_violations(total_rows: usize, accepted: usize, violations: Vec<DqViolation>) -> Self {
        let count = |level: DqLevel| violations.iter().filter(|v| v.level == level).count();
        Self {
            summary: DqSummary {
                total_rows,
                accepted,
                blocked: count(DqLevel::Error),
                warning: count(DqLevel::Warning),
                conflict: count(DqLevel::Conflict),
            },
            violations,
        }
    }

    /// 合并多个数据源的报告
    pub fn merge(&mut self, other: DqReport) {
        self.summary.total_rows += other.summary.total_rows;
        self.summary.accepted += other.summary.accepted;
        self.summary.blocked += other.summary.blocked;
        self.summary.warning += other.summary.warning;
        self.summary.conflict += other.summary.conflict;
        self.violations.extend(other.violations);
    }
}
