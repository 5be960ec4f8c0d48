//! 模拟舵机臂
//!
//! - 手臂关节：写入后立即到达目标角度
//! - 夹爪：向闭合方向（角度增大）运动时被物体挡住，停在接触角；
//!   没有物体时停在机械限位
//! - 故障注入：按 (关节, 角度) 匹配、按写入次数、按读取关节

use crate::JointActuator;
use crate::error::ActuatorError;
use parking_lot::Mutex;
use sortarm_protocol::{Deg, JointId, JointPose};
use std::sync::Arc;

/// 夹爪机械限位
const GRIPPER_LIMIT: Deg = Deg(180.0);

/// 一次舵机写入记录
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServoWrite {
    pub joint: JointId,
    pub angle: Deg,
    pub duration_ms: u32,
}

/// 注入的故障
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArmFault {
    /// 向指定关节写入指定角度时失败
    WriteTo { joint: JointId, angle: Deg },
    /// 第 N 次写入（从 1 计）及之后全部失败
    AfterWrites(usize),
    /// 读取指定关节失败
    ReadOf(JointId),
}

#[derive(Debug)]
struct SimArmState {
    /// 下标为总线 ID - 1
    angles: [Deg; 6],
    /// 物体接触角（None 表示夹爪中没有物体）
    object_contact: Option<Deg>,
    /// 夹爪卡死（读数永远不变）
    gripper_jammed: bool,
    writes: Vec<ServoWrite>,
    reads: usize,
    faults: Vec<ArmFault>,
}

/// 模拟舵机臂（共享句柄）
#[derive(Debug, Clone)]
pub struct SimArm {
    state: Arc<Mutex<SimArmState>>,
}

impl Default for SimArm {
    fn default() -> Self {
        Self::new()
    }
}

impl SimArm {
    /// 创建停在原点、夹爪半开的模拟臂
    pub fn new() -> Self {
        let home = JointPose::HOME;
        SimArm {
            state: Arc::new(Mutex::new(SimArmState {
                angles: [home[0], home[1], home[2], home[3], home[4], Deg(90.0)],
                object_contact: None,
                gripper_jammed: false,
                writes: Vec::new(),
                reads: 0,
                faults: Vec::new(),
            })),
        }
    }

    /// 在夹爪中放入一个物体，夹爪闭合到 `contact` 时被挡住
    pub fn with_object(self, contact: Deg) -> Self {
        self.state.lock().object_contact = Some(contact);
        self
    }

    /// 夹爪卡死，任何写入都不改变读数
    pub fn with_jammed_gripper(self) -> Self {
        self.state.lock().gripper_jammed = true;
        self
    }

    /// 注入故障
    pub fn inject_fault(&self, fault: ArmFault) {
        self.state.lock().faults.push(fault);
    }

    /// 清除所有故障
    pub fn clear_faults(&self) {
        self.state.lock().faults.clear();
    }

    /// 放入/取走物体
    pub fn set_object(&self, contact: Option<Deg>) {
        self.state.lock().object_contact = contact;
    }

    /// 直接设定某个关节的角度
    pub fn set_angle(&self, joint: JointId, angle: Deg) {
        self.state.lock().angles[index(joint)] = angle;
    }

    /// 当前角度
    pub fn angle(&self, joint: JointId) -> Deg {
        self.state.lock().angles[index(joint)]
    }

    /// 当前手臂位姿
    pub fn pose(&self) -> JointPose {
        let a = self.state.lock().angles;
        JointPose::new([a[0], a[1], a[2], a[3], a[4]])
    }

    /// 所有成功的写入记录
    pub fn writes(&self) -> Vec<ServoWrite> {
        self.state.lock().writes.clone()
    }

    /// 指定关节的写入记录
    pub fn writes_to(&self, joint: JointId) -> Vec<ServoWrite> {
        self.state
            .lock()
            .writes
            .iter()
            .filter(|w| w.joint == joint)
            .copied()
            .collect()
    }

    /// 读取次数
    pub fn read_count(&self) -> usize {
        self.state.lock().reads
    }

    /// 清空记录
    pub fn clear_log(&self) {
        let mut state = self.state.lock();
        state.writes.clear();
        state.reads = 0;
    }
}

impl JointActuator for SimArm {
    fn write(&mut self, joint: JointId, angle: Deg, duration_ms: u32) -> Result<(), ActuatorError> {
        let mut state = self.state.lock();
        let attempt = state.writes.len() + 1;
        for fault in &state.faults {
            match *fault {
                ArmFault::WriteTo { joint: j, angle: a } if j == joint && a == angle => {
                    return Err(ActuatorError::write(joint, "injected fault"));
                },
                ArmFault::AfterWrites(n) if attempt >= n => {
                    return Err(ActuatorError::write(joint, "servo bus timeout"));
                },
                _ => {},
            }
        }

        let reached = if joint.is_gripper() {
            let current = state.angles[index(joint)];
            if state.gripper_jammed {
                current
            } else {
                let stop = state.object_contact.unwrap_or(GRIPPER_LIMIT);
                if angle > current {
                    // 闭合方向：被物体或限位挡住
                    if angle <= stop {
                        angle
                    } else if stop >= current {
                        stop
                    } else {
                        current
                    }
                } else {
                    angle.clamp(Deg::ZERO, GRIPPER_LIMIT)
                }
            }
        } else {
            angle
        };

        state.angles[index(joint)] = reached;
        state.writes.push(ServoWrite {
            joint,
            angle,
            duration_ms,
        });
        tracing::trace!("sim servo {} <- {} ({}ms), now {}", joint, angle, duration_ms, reached);
        Ok(())
    }

    fn read(&mut self, joint: JointId) -> Result<Deg, ActuatorError> {
        let mut state = self.state.lock();
        if state.faults.contains(&ArmFault::ReadOf(joint)) {
            return Err(ActuatorError::read(joint, "injected fault"));
        }
        state.reads += 1;
        Ok(state.angles[index(joint)])
    }
}

#[inline]
fn index(joint: JointId) -> usize {
    joint.id() as usize - 1
}
