// ==========================================
// 库存管理系统 - 商品目录领域模型
// ==========================================
// 对齐: categories / brands / product_catalog 表
// 用途: 导入层写入,查询层只读
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// Category - 商品分类
// ==========================================
// 说明: 导入时由 Sortly 文件夹标签惰性创建（每个标签至多一次）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,                  // 分类 ID（UUID v4）
    pub name: String,                // 分类名称（唯一）
    pub parent_id: Option<String>,   // 父分类（导入创建的分类均为根分类）
    pub description: Option<String>, // 描述
}

impl Category {
    /// 以新生成的 ID 构造根分类
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            parent_id: None,
            description: None,
        }
    }
}

// ==========================================
// Brand - 品牌
// ==========================================
// 红线: name 在存储层唯一（INSERT .. ON CONFLICT(name) DO NOTHING）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brand {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
}

impl Brand {
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: None,
            website: None,
        }
    }
}

// ==========================================
// Product - 商品主数据
// ==========================================
// 红线: category_id 必须指向已存在的分类
// 冲突键: sku（Sortly ID）
// 对齐: product_catalog 表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    // ===== 主键与业务键 =====
    pub id: String,  // 记录 ID（UUID v4，更新分支中保持原值）
    pub sku: String, // 外部业务键（Sortly ID）

    // ===== 基础信息 =====
    pub name: String,
    pub description: Option<String>,
    pub category_id: String,
    pub brand_id: Option<String>,

    // ===== 规格 =====
    pub volume_ml: Option<i32>,        // 容量（毫升，>0）
    pub weight_kg: Option<f64>,        // 重量（千克）
    pub dimensions_cm: Option<String>, // 尺寸描述

    // ===== 商务字段 =====
    pub standard_cost: Option<f64>,
    pub standard_price: Option<f64>,
    pub markup_percentage: Option<f64>,
    pub reorder_point: i32, // 补货点（>=0，默认 0）

    // ===== 供应商 =====
    pub primary_supplier_id: Option<String>,
    pub supplier_sku: Option<String>,

    // ===== 标志位 =====
    pub is_active: bool,
    pub is_perishable: bool,

    pub notes: Option<String>,

    // ===== 审计字段 =====
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ==========================================
// EnsureOutcome - 插入或忽略的结果
// ==========================================
// 说明: id 为存储中该名称实际对应的 ID；
//       若名称已存在，则为已有记录的 ID 而非本次生成的 ID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnsureOutcome {
    pub id: String,
    pub created: bool,
}

// ==========================================
// UpsertOutcome - 商品落库分支
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpsertOutcome {
    Inserted, // 新 SKU
    Updated,  // SKU 冲突，走更新分支
}
