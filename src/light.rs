//! Traffic-light phase controller
//!
//! A [`TrafficLight`] owns the current [`Phase`] and a [`SlotQueue`] of phase transitions.
//! [`TrafficLight::simulate`] starts a timer thread that flips the phase after a random
//! dwell time and publishes every new phase into the queue. Observers call
//! [`TrafficLight::wait_for_green`] to block until a `Go` comes through.
//!
//! 信号灯相位控制器
//!
//! [`TrafficLight`] 持有当前 [`Phase`] 以及一个相位变化的 [`SlotQueue`]。
//! [`TrafficLight::simulate`] 启动计时线程，在随机持续时间后翻转相位并把新相位发布到队列。
//! 观察者调用 [`TrafficLight::wait_for_green`] 阻塞直到收到 `Go`。
//!
//! # Delivery | 投递
//!
//! The queue keeps only the latest phase. Several observers blocked at once compete for
//! each published phase and only one of them receives it, so a single `Go` releases a
//! single observer.
//!
//! 队列只保留最新相位。多个同时阻塞的观察者争抢每一次发布，只有一个能收到，
//! 因此一次 `Go` 只会释放一个观察者。

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, trace, warn};

use crate::config::{CycleConfig, millis};
use crate::error::{ConfigError, SimulateError};
use crate::phase::{AtomicPhase, Phase};
use crate::runner::{Runnable, Worker};
use crate::shim::recover;
use crate::slot_queue::SlotQueue;
use crate::stop::StopSignal;

const TIMER_THREAD_NAME: &str = "traffic-light-timer";

/// State shared between the controller and its timer thread
///
/// 控制器与计时线程共享的状态
#[derive(Debug)]
struct Shared {
    phase: AtomicPhase,
    queue: SlotQueue<Phase>,
    config: CycleConfig,
}

impl Runnable for Shared {
    fn run(&self, stop: &StopSignal) {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let mut cycle = self.config.draw(&mut rng);
        let mut last = Instant::now();
        info!(
            min_ms = millis(self.config.min_cycle),
            max_ms = millis(self.config.max_cycle),
            first_cycle_ms = millis(cycle),
            "timer loop started"
        );

        loop {
            let now = Instant::now();
            let elapsed = now.duration_since(last);

            if elapsed >= cycle {
                let phase = self.phase.toggle();
                last = now;
                cycle = self.config.draw(&mut rng);
                debug!(%phase, next_cycle_ms = millis(cycle), "phase toggled");
                self.queue.send(phase);
                if stop.is_stopped() {
                    break;
                }
                continue;
            }

            // Sleep until the deadline; a stop request cuts it short
            if stop.wait_timeout(cycle - elapsed) {
                break;
            }
        }

        info!(phase = %self.phase.load(), "timer loop stopped");
    }
}

/// A single light cycling between [`Phase::Stop`] and [`Phase::Go`]
///
/// Share it between threads with `Arc`; every method takes `&self`.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use std::thread;
/// use traffic_light::{Phase, TrafficLight};
///
/// let light = Arc::new(TrafficLight::new());
/// assert_eq!(light.current_phase(), Phase::Stop);
/// light.simulate()?;
///
/// let observer = light.clone();
/// thread::spawn(move || {
///     observer.wait_for_green();
///     println!("green, crossing");
/// })
/// .join()
/// .unwrap();
/// # Ok::<(), traffic_light::SimulateError>(())
/// ```
///
/// 在 [`Phase::Stop`] 与 [`Phase::Go`] 之间循环的单个信号灯
///
/// 通过 `Arc` 在线程间共享；所有方法都只需要 `&self`。
#[derive(Debug)]
pub struct TrafficLight {
    shared: Arc<Shared>,
    worker: Mutex<Option<Worker>>,
}

impl TrafficLight {
    /// Create a light showing `Stop`, cycling every 4 to 6 seconds once started
    ///
    /// 创建一个显示 `Stop` 的信号灯，启动后每 4 到 6 秒切换一次
    pub fn new() -> Self {
        Self::from_valid_config(CycleConfig::default())
    }

    /// Create a light with custom cycle bounds
    ///
    /// 使用自定义周期边界创建信号灯
    pub fn with_config(config: CycleConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: CycleConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                phase: AtomicPhase::new(Phase::Stop),
                queue: SlotQueue::new(),
                config,
            }),
            worker: Mutex::new(None),
        }
    }

    #[inline]
    pub fn config(&self) -> &CycleConfig {
        &self.shared.config
    }

    /// Snapshot of the current phase
    ///
    /// Never blocks. The value may already be out of date when it is returned.
    ///
    /// 当前相位的快照
    ///
    /// 从不阻塞，返回时值可能已经过时。
    #[inline]
    pub fn current_phase(&self) -> Phase {
        self.shared.phase.load()
    }

    /// Start the timer thread and return immediately
    ///
    /// Fails with [`SimulateError::AlreadyRunning`] if the loop is running, or
    /// [`SimulateError::Spawn`] if the thread could not be created. After
    /// [`stop`](Self::stop) the light can be started again and resumes from its
    /// current phase.
    ///
    /// 启动计时线程并立即返回
    ///
    /// 循环已在运行时返回 [`SimulateError::AlreadyRunning`]，无法创建线程时返回
    /// [`SimulateError::Spawn`]。调用 [`stop`](Self::stop) 后可以再次启动，并从当前相位继续。
    pub fn simulate(&self) -> Result<(), SimulateError> {
        let mut worker = recover(self.worker.lock());
        if worker.as_ref().is_some_and(|w| !w.is_finished()) {
            return Err(SimulateError::AlreadyRunning);
        }

        *worker = Some(Worker::spawn(TIMER_THREAD_NAME, self.shared.clone())?);
        Ok(())
    }

    /// Whether the timer thread is running
    ///
    /// 计时线程是否在运行
    pub fn is_running(&self) -> bool {
        recover(self.worker.lock())
            .as_ref()
            .is_some_and(|w| !w.is_finished())
    }

    /// Stop the timer thread and wait for it to exit
    ///
    /// The phase stays where it was. Does nothing if the light was never started.
    ///
    /// 停止计时线程并等待其退出；相位保持不变。若从未启动则不做任何事。
    pub fn stop(&self) {
        // Held until the thread has exited so `simulate` cannot start a second loop meanwhile
        let mut worker = recover(self.worker.lock());
        match worker.take() {
            Some(worker) => worker.stop(),
            None => warn!("stop requested on a traffic light that is not running"),
        }
    }

    /// Block until a `Go` phase is received from the queue
    ///
    /// Every `Stop` taken from the queue is discarded. Only the latest published phase
    /// is visible, so intermediate transitions may be skipped.
    ///
    /// 阻塞直到从队列收到 `Go` 相位
    ///
    /// 从队列取出的 `Stop` 都会被丢弃。只能看到最新发布的相位，中间的变化可能被跳过。
    pub fn wait_for_green(&self) {
        loop {
            let phase = self.shared.queue.receive();
            if phase.is_go() {
                return;
            }
            trace!(%phase, "discarding phase while waiting for green");
        }
    }

    /// Like [`wait_for_green`](Self::wait_for_green) but gives up after `timeout`
    ///
    /// Returns `true` if a `Go` was received in time.
    ///
    /// 与 [`wait_for_green`](Self::wait_for_green) 相同，但在 `timeout` 后放弃。
    /// 及时收到 `Go` 时返回 `true`。
    pub fn wait_for_green_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now().checked_add(timeout);
        loop {
            let remaining = match deadline {
                Some(deadline) => deadline.saturating_duration_since(Instant::now()),
                None => timeout,
            };

            match self.shared.queue.receive_timeout(remaining) {
                Some(Phase::Go) => return true,
                Some(phase) => trace!(%phase, "discarding phase while waiting for green"),
                None => return false,
            }
        }
    }
}

impl Default for TrafficLight {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(all(test, not(feature = "loom")))]
mod tests {
    use super::*;
    use std::thread;

    fn fast_light(min_ms: u64, max_ms: u64) -> TrafficLight {
        let config = CycleConfig::default()
            .with_bounds(Duration::from_millis(min_ms), Duration::from_millis(max_ms));
        TrafficLight::with_config(config).unwrap()
    }

    fn wait_until(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
        let start = Instant::now();
        while start.elapsed() < timeout {
            if cond() {
                return true;
            }
            thread::sleep(Duration::from_millis(1));
        }
        cond()
    }

    #[test]
    fn test_new_light_is_stopped_and_idle() {
        let light = TrafficLight::new();
        assert_eq!(light.current_phase(), Phase::Stop);
        assert!(!light.is_running());
        assert_eq!(*light.config(), CycleConfig::default());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = CycleConfig::default()
            .with_bounds(Duration::from_millis(50), Duration::from_millis(10));
        assert!(matches!(
            TrafficLight::with_config(config),
            Err(ConfigError::EmptyRange { .. })
        ));
    }

    #[test]
    fn test_simulate_twice_is_rejected() {
        let light = fast_light(20, 30);
        light.simulate().unwrap();
        assert!(matches!(light.simulate(), Err(SimulateError::AlreadyRunning)));
        light.stop();
    }

    #[test]
    fn test_phase_toggles_and_publishes() {
        let light = fast_light(20, 30);
        light.simulate().unwrap();

        assert!(wait_until(Duration::from_secs(5), || light.current_phase() == Phase::Go));
        assert!(wait_until(Duration::from_secs(5), || light.current_phase() == Phase::Stop));
        light.stop();

        // Whatever was published last is what the queue holds
        let published = light.shared.queue.try_receive();
        assert_eq!(published, Some(light.current_phase()));
    }

    #[test]
    fn test_wait_for_green_not_before_min_cycle() {
        let light = Arc::new(fast_light(200, 300));
        let observer = light.clone();

        let start = Instant::now();
        light.simulate().unwrap();
        let handle = thread::spawn(move || {
            observer.wait_for_green();
            start.elapsed()
        });

        let elapsed = handle.join().unwrap();
        assert!(elapsed >= Duration::from_millis(200), "returned after {elapsed:?}");
        assert_eq!(light.current_phase(), Phase::Go);
        light.stop();
    }

    #[test]
    fn test_wait_for_green_skips_stop() {
        let light = fast_light(1000, 1000);

        // A stale Stop left in the queue is discarded
        light.shared.queue.send(Phase::Stop);
        assert!(!light.wait_for_green_timeout(Duration::from_millis(30)));
        assert!(light.shared.queue.is_empty());

        light.shared.queue.send(Phase::Go);
        assert!(light.wait_for_green_timeout(Duration::from_millis(30)));
    }

    #[test]
    fn test_wait_for_green_timeout_without_simulation() {
        let light = TrafficLight::new();
        let start = Instant::now();
        assert!(!light.wait_for_green_timeout(Duration::from_millis(50)));
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn test_stop_freezes_phase() {
        let light = fast_light(10, 20);
        light.simulate().unwrap();
        assert!(wait_until(Duration::from_secs(5), || light.current_phase() == Phase::Go));

        light.stop();
        assert!(!light.is_running());
        let frozen = light.current_phase();
        thread::sleep(Duration::from_millis(80));
        assert_eq!(light.current_phase(), frozen);
    }

    #[test]
    fn test_stop_returns_with_one_millisecond_cycles() {
        let light = Arc::new(fast_light(0, 1));
        light.simulate().unwrap();
        thread::sleep(Duration::from_millis(20));

        let (done_tx, done_rx) = std::sync::mpsc::channel();
        let stopper = light.clone();
        thread::spawn(move || {
            stopper.stop();
            done_tx.send(()).unwrap();
        });

        assert!(
            done_rx.recv_timeout(Duration::from_secs(3)).is_ok(),
            "stop() did not return"
        );
        assert!(!light.is_running());
    }

    #[test]
    fn test_stop_and_simulate_never_overlap_loops() {
        let light = Arc::new(fast_light(1, 2));
        let shared = light.shared.clone();

        let stopper = {
            let light = light.clone();
            thread::spawn(move || {
                for _ in 0..200 {
                    light.stop();
                }
            })
        };

        // Controller, this test and at most one timer thread
        for _ in 0..200 {
            if light.simulate().is_ok() {
                assert!(Arc::strong_count(&shared) <= 3);
            }
            thread::yield_now();
        }

        stopper.join().unwrap();
        light.stop();
        assert_eq!(Arc::strong_count(&shared), 2);
    }

    #[test]
    fn test_stop_without_simulate_is_noop() {
        let light = TrafficLight::new();
        light.stop();
        light.stop();
        assert_eq!(light.current_phase(), Phase::Stop);
    }

    #[test]
    fn test_restart_after_stop() {
        let light = fast_light(10, 20);
        light.simulate().unwrap();
        light.stop();

        light.simulate().unwrap();
        assert!(light.is_running());
        let before = light.current_phase();
        assert!(wait_until(Duration::from_secs(5), || light.current_phase() != before));
        light.stop();
    }

    #[test]
    fn test_drop_ends_timer_thread() {
        let light = fast_light(10, 20);
        light.simulate().unwrap();
        let shared = light.shared.clone();

        drop(light);
        assert!(wait_until(Duration::from_secs(5), || Arc::strong_count(&shared) == 1));
    }

    #[test]
    fn test_each_go_releases_one_observer() {
        let light = Arc::new(fast_light(1000, 1000));

        let observers: Vec<_> = (0..2)
            .map(|_| {
                let light = light.clone();
                thread::spawn(move || light.wait_for_green_timeout(Duration::from_millis(300)))
            })
            .collect();

        thread::sleep(Duration::from_millis(30));
        light.shared.queue.send(Phase::Go);

        let released = observers
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|released| *released)
            .count();
        assert_eq!(released, 1);
    }
}
