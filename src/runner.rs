//! Thread entry capability and the handle that owns the thread
//!
//! Anything that should run on its own named thread implements [`Runnable`]; a
//! [`Worker`] spawns it with a fresh [`StopSignal`] and keeps the join handle.
//!
//! 线程入口能力及持有线程的句柄
//!
//! 需要在独立命名线程中运行的对象实现 [`Runnable`]；[`Worker`] 使用新的 [`StopSignal`]
//! 启动它并保存 join 句柄。

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::stop::StopSignal;

/// A body that runs on a dedicated thread until `stop` is set
///
/// Implementations must check `stop` regularly and return once it is set.
///
/// 在专用线程上运行直到 `stop` 被置位的执行体
///
/// 实现者必须定期检查 `stop`，并在其置位后返回。
pub trait Runnable: Send + Sync + 'static {
    fn run(&self, stop: &StopSignal);
}

/// Owner of a spawned [`Runnable`] thread
///
/// Dropping a `Worker` requests a stop but does not wait for the thread.
///
/// 已启动的 [`Runnable`] 线程的所有者
///
/// 丢弃 `Worker` 会请求停止，但不会等待线程结束。
#[derive(Debug)]
pub struct Worker {
    stop: StopSignal,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    /// Run `runnable` on a new thread called `name`
    ///
    /// 在名为 `name` 的新线程中运行 `runnable`
    pub fn spawn<R: Runnable>(name: impl Into<String>, runnable: Arc<R>) -> io::Result<Self> {
        let stop = StopSignal::new();
        let thread_stop = stop.clone();
        let handle = thread::Builder::new()
            .name(name.into())
            .spawn(move || runnable.run(&thread_stop))?;

        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Request a stop and wait for the thread to exit
    ///
    /// A panic inside the runnable is re-raised here.
    ///
    /// 请求停止并等待线程退出；执行体内的 panic 会在此处重新抛出
    pub fn stop(mut self) {
        self.stop.stop();
        if let Some(handle) = self.handle.take()
            && let Err(panic) = handle.join()
        {
            std::panic::resume_unwind(panic);
        }
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.stop.stop();
    }
}
