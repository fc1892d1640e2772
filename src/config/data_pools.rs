// ==========================================
// MES 数据仿真系统 - 数据池配置
// ==========================================
// 职责: 定义实体抽样所依赖的名称池/取值区间/分类选项
// 来源: data_pools.json (结构化 JSON 文档)
// 红线: 配置错误属于致命错误，禁止带病生成
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// 配置层错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// serde 解析错误会点名缺失字段 (missing field `xxx`)
    #[error("配置文件解析失败 ({path}): {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("配置键 `{key}` 取值非法: {message}")]
    InvalidValue { key: String, message: String },
}

/// 数值区间 [min, max]
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

/// 成本区间集合（按实体类别）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostRanges {
    pub products: Range,
    pub components: Range,
    pub work_centers: Range,
    pub machines: Range,
}

/// 供应商候选
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierSpec {
    pub name: String,
    pub lead_time: i64,
}

/// 工作中心候选
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkCenterSpec {
    pub name: String,
    pub description: String,
    pub capacity: f64,
    pub capacity_uom: String,
    /// 适配机型关键词（子串匹配，用于机台落位）
    pub associated_machines: Vec<String>,
}

/// 停机原因池（按类别）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DowntimeReasons {
    pub planned: Vec<String>,
    pub unplanned: Vec<String>,
}

/// 数据池配置全集
///
/// 所有字段均为必需项：serde 反序列化在字段缺失时直接报
/// `missing field` 错误，随后 `validate()` 做取值层面的检查。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPools {
    pub product_names: Vec<String>,
    pub product_descriptions: Vec<String>,
    pub inventory_names: Vec<String>,
    pub suppliers: Vec<SupplierSpec>,
    pub work_centers: Vec<WorkCenterSpec>,
    pub machine_types: Vec<String>,
    /// 机型 -> 额定产能区间
    pub nominal_capacity: BTreeMap<String, Range>,
    /// 机型 -> 产能计量单位
    pub capacity_uom: BTreeMap<String, String>,
    pub material_categories: Vec<String>,
    pub storage_locations: Vec<String>,
    pub cost_ranges: CostRanges,
    pub lead_time_range: Range,
    pub employee_hourly_rate_range: Range,
    pub downtime_reasons: DowntimeReasons,
    /// 质检评语池（按缺陷类别）
    pub qc_comments: BTreeMap<String, Vec<String>>,
}

impl DataPools {
    /// 从 JSON 文件加载并校验数据池配置
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: display.clone(),
            source: e,
        })?;
        let pools: DataPools = serde_json::from_str(&raw).map_err(|e| ConfigError::Parse {
            path: display,
            source: e,
        })?;
        pools.validate()?;
        Ok(pools)
    }

    /// 从 JSON 字符串加载（测试与内嵌配置用）
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let pools: DataPools = serde_json::from_str(raw).map_err(|e| ConfigError::Parse {
            path: "<inline>".to_string(),
            source: e,
        })?;
        pools.validate()?;
        Ok(pools)
    }

    /// 取值层面校验
    ///
    /// # 规则
    /// - 名称池非空
    /// - 区间满足 min <= max
    /// - 每个机型都有额定产能与计量单位
    /// - 产品名称与描述一一对应
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn non_empty<T>(key: &str, v: &[T]) -> Result<(), ConfigError> {
            if v.is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: "列表不能为空".to_string(),
                });
            }
            Ok(())
        }

        fn check_range(key: &str, r: &Range) -> Result<(), ConfigError> {
            if r.min > r.max {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("min ({}) 大于 max ({})", r.min, r.max),
                });
            }
            Ok(())
        }

        non_empty("product_names", &self.product_names)?;
        non_empty("inventory_names", &self.inventory_names)?;
        non_empty("suppliers", &self.suppliers)?;
        non_empty("work_centers", &self.work_centers)?;
        non_empty("machine_types", &self.machine_types)?;
        non_empty("material_categories", &self.material_categories)?;
        non_empty("storage_locations", &self.storage_locations)?;
        non_empty("downtime_reasons.planned", &self.downtime_reasons.planned)?;
        non_empty("downtime_reasons.unplanned", &self.downtime_reasons.unplanned)?;

        if self.product_descriptions.len() != self.product_names.len() {
            return Err(ConfigError::InvalidValue {
                key: "product_descriptions".to_string(),
                message: format!(
                    "描述数量 ({}) 与产品名称数量 ({}) 不一致",
                    self.product_descriptions.len(),
                    self.product_names.len()
                ),
            });
        }

        check_range("cost_ranges.products", &self.cost_ranges.products)?;
        check_range("cost_ranges.components", &self.cost_ranges.components)?;
        check_range("cost_ranges.work_centers", &self.cost_ranges.work_centers)?;
        check_range("cost_ranges.machines", &self.cost_ranges.machines)?;
        check_range("lead_time_range", &self.lead_time_range)?;
        check_range(
            "employee_hourly_rate_range",
            &self.employee_hourly_rate_range,
        )?;

        for machine_type in &self.machine_types {
            let range = self.nominal_capacity.get(machine_type).ok_or_else(|| {
                ConfigError::InvalidValue {
                    key: "nominal_capacity".to_string(),
                    message: format!("缺少机型 `{}` 的额定产能区间", machine_type),
                }
            })?;
            check_range(&format!("nominal_capacity.{}", machine_type), range)?;

            if !self.capacity_uom.contains_key(machine_type) {
                return Err(ConfigError::InvalidValue {
                    key: "capacity_uom".to_string(),
                    message: format!("缺少机型 `{}` 的计量单位", machine_type),
                });
            }
        }

        Ok(())
    }
}
