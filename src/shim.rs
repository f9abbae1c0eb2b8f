//! Shim module to abstract over std and loom primitives.
//!
//! Every lock, condition variable and atomic used by the crate comes through here, so the
//! queue and the stop latch can be model checked under `--features loom` without touching
//! their code.
//!
//! 屏蔽 std 与 loom 原语差异的模块。crate 中所有锁、条件变量和原子类型都经由此处导入，
//! 因此在 `--features loom` 下可以直接对队列和停止信号进行模型检查。

#[cfg(not(feature = "loom"))]
pub mod atomic {
    pub use std::sync::atomic::*;
}

#[cfg(feature = "loom")]
pub mod atomic {
    pub use loom::sync::atomic::*;
}

#[cfg(not(feature = "loom"))]
pub mod sync {
    pub use std::sync::{Arc, Condvar, Mutex};
}

#[cfg(feature = "loom")]
pub mod sync {
    pub use loom::sync::{Arc, Condvar, Mutex};
}

use std::sync::{LockResult, PoisonError};

/// Recover the guard from a poisoned lock
///
/// Guarded data in this crate is only ever written in a single statement.
///
/// 从中毒的锁中恢复 guard
#[inline]
pub(crate) fn recover<G>(result: LockResult<G>) -> G {
    result.unwrap_or_else(PoisonError::into_inner)
}
