//! Light phase and its lock-free storage.
//!
//! 信号灯相位及其无锁存储。

use std::fmt;

use crate::shim::atomic::{AtomicU8, Ordering};

const STOP: u8 = 0;
const GO: u8 = 1;

/// Externally observable state of the light
///
/// `Stop` is red, `Go` is green. There are no other states.
///
/// 信号灯的外部可观察状态
///
/// `Stop` 为红灯，`Go` 为绿灯，没有其他状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// Red, traffic must wait
    ///
    /// 红灯，需要等待
    #[default]
    Stop,
    /// Green, traffic may pass
    ///
    /// 绿灯，可以通行
    Go,
}

impl Phase {
    /// The phase the light switches to next
    ///
    /// 下一个相位
    #[inline]
    pub const fn toggled(self) -> Self {
        match self {
            Phase::Stop => Phase::Go,
            Phase::Go => Phase::Stop,
        }
    }

    #[inline]
    pub const fn is_go(self) -> bool {
        matches!(self, Phase::Go)
    }

    #[inline]
    const fn to_u8(self) -> u8 {
        match self {
            Phase::Stop => STOP,
            Phase::Go => GO,
        }
    }

    #[inline]
    const fn from_u8(value: u8) -> Option<Self> {
        match value {
            STOP => Some(Phase::Stop),
            GO => Some(Phase::Go),
            _ => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Stop => write!(f, "stop"),
            Phase::Go => write!(f, "go"),
        }
    }
}

/// Phase cell readable from any thread without locking
///
/// The phase is encoded as a `u8` inside an `AtomicU8`, so reads never block and never
/// tear. Only the timer loop writes it.
///
/// 可在任意线程无锁读取的相位单元
///
/// 相位以 `u8` 编码存放在 `AtomicU8` 中，读取既不阻塞也不会撕裂。只有计时循环会写入。
pub(crate) struct AtomicPhase {
    state: AtomicU8,
}

impl AtomicPhase {
    #[inline]
    pub(crate) fn new(phase: Phase) -> Self {
        Self {
            state: AtomicU8::new(phase.to_u8()),
        }
    }

    #[inline]
    pub(crate) fn load(&self) -> Phase {
        // Every write leaves a valid encoding behind
        Phase::from_u8(self.state.load(Ordering::Acquire)).unwrap_or_default()
    }

    #[inline]
    pub(crate) fn store(&self, phase: Phase) {
        self.state.store(phase.to_u8(), Ordering::Release);
    }

    /// Flip the phase and return the new value
    ///
    /// 翻转相位并返回新值
    #[inline]
    pub(crate) fn toggle(&self) -> Phase {
        // STOP and GO differ only in the low bit
        let prev = self.state.fetch_xor(STOP ^ GO, Ordering::AcqRel);
        Phase::from_u8(prev).unwrap_or_default().toggled()
    }
}

impl fmt::Debug for AtomicPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AtomicPhase")
            .field("phase", &self.load())
            .finish()
    }
}
