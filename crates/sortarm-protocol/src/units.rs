//! 角度单位
//!
//! 舵机以"度"为单位收发角度。使用 NewType 防止与时长、计数等裸数值混用。
//!
//! # 示例
//!
//! ```rust
//! use sortarm_protocol::Deg;
//!
//! let current = Deg(120.0);
//! let target = current + Deg(5.0);
//! assert_eq!(target, Deg(125.0));
//! assert!((target - Deg(124.5)).abs() < Deg(1.0));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// 角度（NewType）
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Deg(pub f64);

impl Deg {
    /// 零度常量
    pub const ZERO: Self = Deg(0.0);

    /// 创建新的角度值
    #[inline]
    pub const fn new(value: f64) -> Self {
        Deg(value)
    }

    /// 获取原始值
    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }

    /// 绝对值
    #[inline]
    pub fn abs(self) -> Self {
        Deg(self.0.abs())
    }

    /// 限制在区间内
    #[inline]
    pub fn clamp(self, min: Deg, max: Deg) -> Self {
        Deg(self.0.clamp(min.0, max.0))
    }
}

impl fmt::Display for Deg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°", self.0)
    }
}

impl From<i32> for Deg {
    fn from(value: i32) -> Self {
        Deg(f64::from(value))
    }
}

impl Add for Deg {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Deg(self.0 + rhs.0)
    }
}

impl Sub for Deg {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Deg(self.0 - rhs.0)
    }
}

impl AddAssign for Deg {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Deg {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Deg {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Deg(-self.0)
    }
}
