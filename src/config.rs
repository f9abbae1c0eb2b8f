//! Timer loop configuration
//!
//! The dwell time of each phase is drawn uniformly from a closed millisecond range,
//! `[4000, 6000]` by default.
//!
//! 计时循环配置
//!
//! 每个相位的持续时间从闭区间（毫秒）中均匀抽取，默认 `[4000, 6000]`。

use std::time::Duration;

use rand::Rng;

use crate::error::ConfigError;

/// Default shortest phase duration
///
/// 默认最短相位时长
pub const DEFAULT_MIN_CYCLE: Duration = Duration::from_millis(4000);

/// Default longest phase duration
///
/// 默认最长相位时长
pub const DEFAULT_MAX_CYCLE: Duration = Duration::from_millis(6000);

/// Durations are drawn in whole milliseconds
const MIN_RESOLUTION: Duration = Duration::from_millis(1);

/// Bounds and seeding for the randomized phase duration
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use traffic_light::CycleConfig;
///
/// let config = CycleConfig::default()
///     .with_bounds(Duration::from_millis(40), Duration::from_millis(60))
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
///
/// 随机相位时长的边界与种子
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleConfig {
    /// Shortest dwell time, inclusive
    pub min_cycle: Duration,
    /// Longest dwell time, inclusive
    pub max_cycle: Duration,
    /// Fixed RNG seed; `None` seeds from the OS
    ///
    /// 固定随机种子；`None` 表示使用操作系统熵源
    pub seed: Option<u64>,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            min_cycle: DEFAULT_MIN_CYCLE,
            max_cycle: DEFAULT_MAX_CYCLE,
            seed: None,
        }
    }
}

impl CycleConfig {
    #[must_use]
    pub fn with_bounds(mut self, min_cycle: Duration, max_cycle: Duration) -> Self {
        self.min_cycle = min_cycle;
        self.max_cycle = max_cycle;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check that the bounds describe a non-empty range reaching at least 1ms
    ///
    /// 检查边界是否构成非空且上界至少为 1ms 的区间
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_cycle > self.max_cycle {
            return Err(ConfigError::EmptyRange {
                min: self.min_cycle,
                max: self.max_cycle,
            });
        }
        if self.max_cycle < MIN_RESOLUTION {
            return Err(ConfigError::TooShort {
                max: self.max_cycle,
            });
        }
        Ok(())
    }

    /// Draw the next dwell time in whole milliseconds from `[min_cycle, max_cycle]`
    ///
    /// Assumes a validated config.
    ///
    /// 从 `[min_cycle, max_cycle]` 中以整毫秒抽取下一个持续时间（假定配置已验证）
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let min = millis(self.min_cycle);
        let max = millis(self.max_cycle).max(min);
        Duration::from_millis(rng.random_range(min..=max))
    }
}

/// Whole milliseconds, saturating at `u64::MAX`
#[inline]
pub(crate) fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
