//! 关节索引与标定位姿
//!
//! 手臂由 5 个位置关节（ID 1-5）和 1 个夹爪关节（ID 6）组成。
//! 位姿是预先标定好的常量，不做逆运动学求解。
//!
//! # 示例
//!
//! ```rust
//! use sortarm_protocol::{JointId, JointPose, NamedPose, PoseTable};
//!
//! let table = PoseTable::default();
//! let home = table.get(NamedPose::Home);
//! assert_eq!(home, &JointPose::HOME);
//!
//! for (joint, angle) in home.iter() {
//!     println!("{}: {}", joint, angle);
//! }
//! assert_eq!(JointId::Gripper.id(), 6);
//! ```

use crate::units::Deg;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;

/// 关节枚举
///
/// 判别值即舵机总线上的 ID。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum JointId {
    /// 关节 1（底座旋转）
    J1 = 1,
    /// 关节 2（肩部俯仰）
    J2 = 2,
    /// 关节 3（肘部俯仰）
    J3 = 3,
    /// 关节 4（腕部俯仰）
    J4 = 4,
    /// 关节 5（腕部旋转，最慢到位的轴）
    J5 = 5,
    /// 夹爪
    Gripper = 6,
}

impl JointId {
    /// 组成手臂位姿的关节，按写入顺序排列
    pub const ARM: [JointId; 5] = [JointId::J1, JointId::J2, JointId::J3, JointId::J4, JointId::J5];

    /// 总线 ID（1-6）
    #[inline]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// 从总线 ID 创建（范围检查）
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(JointId::J1),
            2 => Some(JointId::J2),
            3 => Some(JointId::J3),
            4 => Some(JointId::J4),
            5 => Some(JointId::J5),
            6 => Some(JointId::Gripper),
            _ => None,
        }
    }

    /// 是否为夹爪
    #[inline]
    pub const fn is_gripper(self) -> bool {
        matches!(self, JointId::Gripper)
    }

    /// 获取关节名称
    pub const fn name(self) -> &'static str {
        match self {
            JointId::J1 => "J1",
            JointId::J2 => "J2",
            JointId::J3 => "J3",
            JointId::J4 => "J4",
            JointId::J5 => "J5",
            JointId::Gripper => "gripper",
        }
    }
}

impl fmt::Display for JointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 手臂位姿
///
/// 5 个关节的目标角度，下标 0 对应 J1。安全范围由执行器负责检查。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JointPose {
    angles: [Deg; 5],
}

impl JointPose {
    /// 原点/待机位姿
    pub const HOME: JointPose = JointPose::from_degrees([90, 130, 0, 0, 90]);
    /// 中间抬升位姿
    pub const LIFT: JointPose = JointPose::from_degrees([90, 80, 50, 50, 270]);
    /// 抓取位姿
    pub const PICKUP: JointPose = JointPose::from_degrees([90, 53, 60, 20, 270]);
    /// A 箱（黄色，成熟）
    pub const BIN_A: JointPose = JointPose::from_degrees([25, 135, 0, 0, 90]);
    /// B 箱（红色，未熟/腐烂）
    pub const BIN_B: JointPose = JointPose::from_degrees([175, 135, 0, 0, 90]);

    /// 由角度数组创建
    #[inline]
    pub const fn new(angles: [Deg; 5]) -> Self {
        JointPose { angles }
    }

    /// 由整数角度创建
    pub const fn from_degrees(values: [i32; 5]) -> Self {
        JointPose {
            angles: [
                Deg(values[0] as f64),
                Deg(values[1] as f64),
                Deg(values[2] as f64),
                Deg(values[3] as f64),
                Deg(values[4] as f64),
            ],
        }
    }

    /// 获取某个手臂关节的目标角度
    ///
    /// 夹爪不属于位姿，返回 `None`。
    pub fn angle(&self, joint: JointId) -> Option<Deg> {
        if joint.is_gripper() {
            return None;
        }
        Some(self.angles[joint.id() as usize - 1])
    }

    /// 按 J1..J5 顺序迭代 (关节, 角度)
    pub fn iter(&self) -> impl Iterator<Item = (JointId, Deg)> + '_ {
        JointId::ARM.iter().copied().zip(self.angles.iter().copied())
    }

    /// 获取内部数组
    #[inline]
    pub fn as_array(&self) -> &[Deg; 5] {
        &self.angles
    }
}

impl Index<usize> for JointPose {
    type Output = Deg;

    #[inline]
    fn index(&self, index: usize) -> &Deg {
        &self.angles[index]
    }
}

impl fmt::Display for JointPose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e] = self.angles;
        write!(f, "[{}, {}, {}, {}, {}]", a.0, b.0, c.0, d.0, e.0)
    }
}

/// 命名位姿
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamedPose {
    Home,
    Lift,
    Pickup,
    BinA,
    BinB,
}

impl NamedPose {
    /// 所有命名位姿
    pub const ALL: [NamedPose; 5] = [
        NamedPose::Home,
        NamedPose::Lift,
        NamedPose::Pickup,
        NamedPose::BinA,
        NamedPose::BinB,
    ];

    /// 配置文件与命令行中使用的名字
    pub const fn name(self) -> &'static str {
        match self {
            NamedPose::Home => "home",
            NamedPose::Lift => "lift",
            NamedPose::Pickup => "pickup",
            NamedPose::BinA => "bin_a",
            NamedPose::BinB => "bin_b",
        }
    }

    /// 按名字查找（不区分大小写）
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        NamedPose::ALL.iter().copied().find(|pose| pose.name() == name)
    }
}

impl fmt::Display for NamedPose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 标定位姿表
///
/// 启动时构造一次，之后只读。缺省值为出厂标定常量。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseTable {
    pub home: JointPose,
    pub lift: JointPose,
    pub pickup: JointPose,
    pub bin_a: JointPose,
    pub bin_b: JointPose,
}

impl Default for PoseTable {
    fn default() -> Self {
        PoseTable {
            home: JointPose::HOME,
            lift: JointPose::LIFT,
            pickup: JointPose::PICKUP,
            bin_a: JointPose::BIN_A,
            bin_b: JointPose::BIN_B,
        }
    }
}

impl PoseTable {
    /// 查询命名位姿
    pub fn get(&self, pose: NamedPose) -> &JointPose {
        match pose {
            NamedPose::Home => &self.home,
            NamedPose::Lift => &self.lift,
            NamedPose::Pickup => &self.pickup,
            NamedPose::BinA => &self.bin_a,
            NamedPose::BinB => &self.bin_b,
        }
    }

    /// 按 [`NamedPose::ALL`] 顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = (NamedPose, &JointPose)> + '_ {
        NamedPose::ALL.into_iter().map(move |pose| (pose, self.get(pose)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joint_ids() {
        assert_eq!(JointId::J1.id(), 1);
        assert_eq!(JointId::J5.id(), 5);
        assert_eq!(JointId::Gripper.id(), 6);
        assert_eq!(JointId::from_id(3), Some(JointId::J3));
        assert_eq!(JointId::from_id(0), None);
        assert_eq!(JointId::from_id(7), None);
        assert!(JointId::Gripper.is_gripper());
        assert!(!JointId::J5.is_gripper());
    }

    #[test]
    fn test_arm_order_is_ascending() {
        let ids: Vec<u8> = JointId::ARM.iter().map(|j| j.id()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_pose_constants() {
        assert_eq!(JointPose::HOME.as_array()[1], Deg(130.0));
        assert_eq!(JointPose::PICKUP.angle(JointId::J2), Some(Deg(53.0)));
        assert_eq!(JointPose::LIFT.angle(JointId::J5), Some(Deg(270.0)));
        assert_eq!(JointPose::BIN_A[0], Deg(25.0));
        assert_eq!(JointPose::BIN_B[0], Deg(175.0));
        assert_eq!(JointPose::HOME.angle(JointId::Gripper), None);
    }

    #[test]
    fn test_pose_iter() {
        let pairs: Vec<(JointId, Deg)> = JointPose::PICKUP.iter().collect();
        assert_eq!(pairs.len(), 5);
        assert_eq!(pairs[0], (JointId::J1, Deg(90.0)));
        assert_eq!(pairs[4], (JointId::J5, Deg(270.0)));
    }

    #[test]
    fn test_named_pose_lookup() {
        assert_eq!(NamedPose::from_name("home"), Some(NamedPose::Home));
        assert_eq!(NamedPose::from_name(" BIN_A "), Some(NamedPose::BinA));
        assert_eq!(NamedPose::from_name("unknown"), None);

        let table = PoseTable::default();
        assert_eq!(table.get(NamedPose::BinB), &JointPose::BIN_B);
    }

    #[test]
    fn test_pose_table_partial_toml() {
        let table: PoseTable = toml::from_str("home = [80, 120, 0, 0, 90]\n").unwrap();
        assert_eq!(table.home, JointPose::from_degrees([80, 120, 0, 0, 90]));
        assert_eq!(table.pickup, JointPose::PICKUP);
    }

    #[test]
    fn test_pose_display() {
        assert_eq!(JointPose::HOME.to_string(), "[90, 130, 0, 0, 90]");
    }
}
