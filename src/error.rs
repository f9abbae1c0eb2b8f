//! Error types.
//!
//! 错误类型。

use std::io;
use std::time::Duration;

use thiserror::Error;

/// Invalid [`CycleConfig`](crate::CycleConfig)
///
/// 无效的周期配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The lower bound is above the upper bound
    ///
    /// 下界大于上界
    #[error("cycle range is empty: min {min:?} > max {max:?}")]
    EmptyRange { min: Duration, max: Duration },

    /// The upper bound is below one millisecond, the resolution of the drawn durations
    ///
    /// 上界小于一毫秒（抽取时长的精度），信号灯将不停切换
    #[error("cycle upper bound must be at least 1ms, got {max:?}")]
    TooShort { max: Duration },
}

/// Failure to start the timer loop
///
/// 启动计时循环失败
#[derive(Debug, Error)]
pub enum SimulateError {
    /// The timer loop of this controller is already running
    ///
    /// 该控制器的计时循环已在运行
    #[error("timer loop already running")]
    AlreadyRunning,

    /// The OS refused to start the timer thread
    ///
    /// 操作系统拒绝创建计时线程
    #[error("failed to spawn timer thread: {0}")]
    Spawn(#[from] io::Error),
}
