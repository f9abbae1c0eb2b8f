//! # traffic-light
//!
//! A traffic-light phase controller built on a single-slot blocking handoff queue.
//!
//! 基于单槽阻塞交接队列的信号灯相位控制器。
//!
//! ## Overview / 概述
//!
//! A background timer thread flips a light between [`Phase::Stop`] and [`Phase::Go`]
//! after a random dwell time, and publishes each new phase into a [`SlotQueue`].
//! Observer threads block in [`TrafficLight::wait_for_green`] until a `Go` comes through.
//!
//! 后台计时线程在随机持续时间后让信号灯在 [`Phase::Stop`] 与 [`Phase::Go`] 之间切换，
//! 并把每个新相位发布到 [`SlotQueue`]。观察者线程在 [`TrafficLight::wait_for_green`]
//! 中阻塞，直到收到 `Go`。
//!
//! ## Modules / 模块
//!
//! ### [`slot_queue`]
//!
//! Capacity-one mailbox. `send` overwrites any unreceived value and wakes one receiver;
//! `receive` blocks until a value is present. Only the latest value is delivered.
//!
//! 容量为一的邮箱。`send` 覆盖尚未接收的值并唤醒一个接收者；`receive` 阻塞直到有值。
//! 只投递最新值。
//!
//! ### [`light`]
//!
//! The phase state machine and its timer loop. The loop sleeps until its next deadline
//! instead of polling, and exits when [`TrafficLight::stop`] is called or the light is
//! dropped.
//!
//! 相位状态机及其计时循环。循环休眠到下一个截止时间而不是轮询，
//! 在调用 [`TrafficLight::stop`] 或信号灯被丢弃时退出。
//!
//! ### [`stop`] and [`runner`]
//!
//! A clonable stop latch and the [`Runnable`] capability used to put a loop on its own
//! named thread.
//!
//! 可克隆的停止信号，以及用于把循环放到独立命名线程上的 [`Runnable`] 能力。
//!
//! ## Example / 示例
//!
//! ```
//! use std::sync::Arc;
//! use std::thread;
//! use std::time::Duration;
//! use traffic_light::{CycleConfig, Phase, TrafficLight};
//!
//! let config = CycleConfig::default()
//!     .with_bounds(Duration::from_millis(20), Duration::from_millis(40));
//! let light = Arc::new(TrafficLight::with_config(config).unwrap());
//! assert_eq!(light.current_phase(), Phase::Stop);
//!
//! light.simulate().unwrap();
//!
//! let observer = light.clone();
//! thread::spawn(move || observer.wait_for_green())
//!     .join()
//!     .unwrap();
//!
//! light.stop();
//! ```
//!
//! ## Model checking / 模型检查
//!
//! Locks, condition variables and atomics go through an internal shim so the queue and
//! the stop latch can be checked with `loom`:
//!
//! ```text
//! cargo test --release --features loom --test slot_queue
//! ```

mod shim;

pub mod config;
pub mod error;
pub mod light;
pub mod phase;
pub mod runner;
pub mod slot_queue;
pub mod stop;

pub use config::{CycleConfig, DEFAULT_MAX_CYCLE, DEFAULT_MIN_CYCLE};
pub use error::{ConfigError, SimulateError};
pub use light::TrafficLight;
pub use phase::Phase;
pub use runner::{Runnable, Worker};
pub use slot_queue::SlotQueue;
pub use stop::StopSignal;
