//! 检测结果与分拣路由
//!
//! 标签规则（不区分大小写的子串匹配，按顺序判定）：
//!
//! | 标签包含 | 成熟度 | 分拣箱 | 显示名 |
//! |---|---|---|---|
//! | `ripe` | `Ripe` | A | `YELLOW (Ripe)` |
//! | `rotten` | `Rotten` | B | `RED (Unripe/Rotten)` |
//! | 其他 | `Unripe` | B | `RED (Unripe)` |
//!
//! 注意 `unripe` 也包含子串 `ripe`，因此会路由到 A 箱。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 分类器输出的一条检测结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// 类别标签
    pub label: String,
    /// 置信度（0.0-1.0）
    pub confidence: f64,
}

impl Detection {
    pub fn new(label: impl Into<String>, confidence: f64) -> Self {
        Detection {
            label: label.into(),
            confidence,
        }
    }

    /// 置信度是否严格高于阈值
    #[inline]
    pub fn exceeds(&self, threshold: f64) -> bool {
        self.confidence > threshold
    }

    /// 根据标签判定成熟度
    pub fn ripeness(&self) -> Ripeness {
        Ripeness::from_label(&self.label)
    }
}

/// 成熟度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ripeness {
    Ripe,
    Rotten,
    Unripe,
}

impl Ripeness {
    /// 按标签子串判定
    pub fn from_label(label: &str) -> Self {
        let label = label.to_lowercase();
        if label.contains("ripe") {
            Ripeness::Ripe
        } else if label.contains("rotten") {
            Ripeness::Rotten
        } else {
            Ripeness::Unripe
        }
    }

    #[inline]
    pub fn is_ripe(self) -> bool {
        matches!(self, Ripeness::Ripe)
    }

    /// 目标分拣箱
    pub fn bin(self) -> Bin {
        Bin::for_ripe(self.is_ripe())
    }

    /// 显示用的分拣箱名称
    pub fn bin_label(self) -> &'static str {
        match self {
            Ripeness::Ripe => "YELLOW (Ripe)",
            Ripeness::Rotten => "RED (Unripe/Rotten)",
            Ripeness::Unripe => "RED (Unripe)",
        }
    }
}

/// 分拣箱
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bin {
    /// 黄色箱（成熟）
    A,
    /// 红色箱（未熟/腐烂）
    B,
}

impl Bin {
    #[inline]
    pub fn for_ripe(is_ripe: bool) -> Self {
        if is_ripe { Bin::A } else { Bin::B }
    }
}

impl fmt::Display for Bin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bin::A => f.write_str("BIN_A"),
            Bin::B => f.write_str("BIN_B"),
        }
    }
}

/// 分拣记录
///
/// 在派发分拣任务时创建，只追加、不修改。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortRecord {
    pub label: String,
    pub confidence: f64,
    pub ripeness: Ripeness,
}

impl SortRecord {
    pub fn from_detection(detection: &Detection) -> Self {
        SortRecord {
            label: detection.label.clone(),
            confidence: detection.confidence,
            ripeness: detection.ripeness(),
        }
    }

    /// 分配的分拣箱
    #[inline]
    pub fn bin(&self) -> Bin {
        self.ripeness.bin()
    }

    /// 分配的分拣箱显示名
    #[inline]
    pub fn assigned_bin(&self) -> &'static str {
        self.ripeness.bin_label()
    }
}

impl fmt::Display for SortRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Fruit: {}, Confidence: {:.2}, Bin: {}",
            self.label,
            self.confidence,
            self.assigned_bin()
        )
    }
}
