//! Single-slot blocking handoff queue
//!
//! A thread-safe mailbox that holds at most one pending value. Every `send` overwrites
//! whatever is in the slot, and every `receive` blocks until the slot is filled and then
//! takes the value out. Only the latest unconsumed value is ever delivered.
//!
//! 单槽阻塞交接队列
//!
//! 一个线程安全的邮箱，最多保存一个待取值。每次 `send` 都会覆盖槽中已有的值，
//! 每次 `receive` 都会阻塞直到槽被填充，然后取出该值。只会投递最新的未消费值。
//!
//! # Wake discipline | 唤醒策略
//!
//! The slot can hold one value, so `send` wakes exactly one blocked receiver
//! (`Condvar::notify_one`). Which receiver wins is unspecified.
//!
//! 槽只能容纳一个值，因此 `send` 只唤醒一个阻塞的接收者（`Condvar::notify_one`），
//! 不保证唤醒的是哪一个。
//!
//! # Example
//!
//! ```
//! use traffic_light::SlotQueue;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let queue = Arc::new(SlotQueue::new());
//! let tx = queue.clone();
//!
//! thread::spawn(move || {
//!     tx.send(String::from("first"));
//!     tx.send(String::from("second"));
//! })
//! .join()
//! .unwrap();
//!
//! // "first" was overwritten before anyone took it
//! assert_eq!(queue.receive(), "second");
//! assert!(queue.try_receive().is_none());
//! ```

use std::fmt;
use std::time::{Duration, Instant};

use crate::shim::recover;
use crate::shim::sync::{Condvar, Mutex};

/// Capacity-one mailbox with latest-value-wins semantics
///
/// `T` only needs to be movable; nothing is cloned.
///
/// 容量为一、最新值优先的邮箱
///
/// `T` 只需可移动，不会被克隆。
pub struct SlotQueue<T> {
    slot: Mutex<Option<T>>,
    filled: Condvar,
}

impl<T> SlotQueue<T> {
    /// Create an empty queue
    ///
    /// 创建一个空队列
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
            filled: Condvar::new(),
        }
    }

    /// Store `value`, discarding any unreceived value, and wake one receiver
    ///
    /// Never waits for a receiver.
    ///
    /// 存入 `value`，丢弃尚未被接收的旧值，并唤醒一个接收者
    ///
    /// 从不等待接收者。
    #[inline]
    pub fn send(&self, value: T) {
        let _ = self.replace(value);
    }

    /// Like [`send`](Self::send) but returns the value that was overwritten, if any
    ///
    /// 与 [`send`](Self::send) 相同，但返回被覆盖的旧值（如果有）
    pub fn replace(&self, value: T) -> Option<T> {
        let mut slot = recover(self.slot.lock());
        let dropped = slot.replace(value);
        self.filled.notify_one();
        dropped
    }

    /// Block until a value is available, then take it
    ///
    /// There is no timeout; see [`receive_timeout`](Self::receive_timeout) for a bounded wait.
    ///
    /// 阻塞直到有值可用，然后取出
    ///
    /// 没有超时；如需有限等待请使用 [`receive_timeout`](Self::receive_timeout)。
    pub fn receive(&self) -> T {
        let mut slot = recover(self.slot.lock());
        loop {
            if let Some(value) = slot.take() {
                return value;
            }
            slot = recover(self.filled.wait(slot));
        }
    }

    /// Take the value if one is present, without blocking
    ///
    /// 如果有值则取出，不阻塞
    pub fn try_receive(&self) -> Option<T> {
        recover(self.slot.lock()).take()
    }

    /// Block for at most `timeout` waiting for a value
    ///
    /// Returns `None` if the deadline passes with the slot still empty.
    ///
    /// 最多阻塞 `timeout` 等待一个值
    ///
    /// 如果截止时间到达时槽仍为空则返回 `None`。
    pub fn receive_timeout(&self, timeout: Duration) -> Option<T> {
        let deadline = Instant::now().checked_add(timeout);
        let mut slot = recover(self.slot.lock());
        loop {
            if let Some(value) = slot.take() {
                return Some(value);
            }

            let remaining = match deadline {
                Some(deadline) => deadline.saturating_duration_since(Instant::now()),
                // Timeout too large to represent, wait like `receive`
                None => {
                    slot = recover(self.filled.wait(slot));
                    continue;
                }
            };
            if remaining.is_zero() {
                return None;
            }

            let (guard, _) = recover(self.filled.wait_timeout(slot, remaining));
            slot = guard;
        }
    }

    /// Whether the slot is currently empty
    ///
    /// Only a snapshot: another thread may fill or drain it right after.
    ///
    /// 槽当前是否为空（仅为快照）
    pub fn is_empty(&self) -> bool {
        recover(self.slot.lock()).is_none()
    }
}

impl<T> Default for SlotQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for SlotQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotQueue")
            .field("is_empty", &self.is_empty())
            .finish()
    }
}
