//! Cooperative stop latch for background loops
//!
//! Once [`StopSignal::stop`] is called the latch stays set, and every thread sleeping in
//! [`StopSignal::wait_timeout`] is woken at once. A loop that sleeps through the latch
//! can therefore wait for its next deadline and still react to a stop request immediately.
//!
//! 后台循环的协作式停止信号
//!
//! 调用 [`StopSignal::stop`] 后信号保持置位，所有在 [`StopSignal::wait_timeout`] 中休眠的线程
//! 会被同时唤醒。因此循环可以通过它等待下一个截止时间，同时仍能立即响应停止请求。

use std::fmt;
use std::time::{Duration, Instant};

use crate::shim::recover;
use crate::shim::sync::{Arc, Condvar, Mutex};

struct Inner {
    stopped: Mutex<bool>,
    cond: Condvar,
}

/// Clonable one-way stop flag
///
/// All clones share the same latch.
///
/// 可克隆的单向停止标志，所有克隆共享同一个信号
#[derive(Clone)]
pub struct StopSignal {
    inner: Arc<Inner>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                stopped: Mutex::new(false),
                cond: Condvar::new(),
            }),
        }
    }

    /// Set the latch and wake every waiter
    ///
    /// Calling it again has no further effect.
    ///
    /// 置位并唤醒所有等待者，重复调用无额外效果
    pub fn stop(&self) {
        let mut stopped = recover(self.inner.stopped.lock());
        *stopped = true;
        self.inner.cond.notify_all();
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        *recover(self.inner.stopped.lock())
    }

    /// Sleep for up to `timeout`, returning early if stopped
    ///
    /// Returns `true` if the latch is set, `false` if the full timeout elapsed.
    ///
    /// 最多休眠 `timeout`，若被停止则提前返回
    ///
    /// 已停止返回 `true`，完整超时返回 `false`。
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now().checked_add(timeout);
        let mut stopped = recover(self.inner.stopped.lock());
        loop {
            if *stopped {
                return true;
            }

            match deadline {
                Some(deadline) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    if remaining.is_zero() {
                        return false;
                    }
                    let (guard, _) = recover(self.inner.cond.wait_timeout(stopped, remaining));
                    stopped = guard;
                }
                None => stopped = recover(self.inner.cond.wait(stopped)),
            }
        }
    }
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StopSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StopSignal")
            .field("stopped", &self.is_stopped())
            .finish()
    }
}
