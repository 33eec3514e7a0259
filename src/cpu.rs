use std::fs;
use std::path::{Path, PathBuf};

/// Default kernel statistics source
pub const PROC_STAT: &str = "/proc/stat";

/// Busy and total jiffies for one CPU line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuTimes {
    pub work: u64,
    pub total: u64,
}

impl CpuTimes {
    /// Parse a `cpuN user nice system idle iowait irq softirq [steal ...]` line.
    ///
    /// At least seven counters are required. `steal` counts toward the total
    /// when present; guest columns are already included in user time. Lines
    /// whose sums overflow `u64` are rejected.
    pub fn parse(line: &str) -> Option<Self> {
        let mut fields = line.split_whitespace();
        if !fields.next()?.starts_with("cpu") {
            return None;
        }
        let counters: Vec<u64> = fields.map_while(|f| f.parse().ok()).collect();
        if counters.len() < 7 {
            return None;
        }
        let steal = counters.get(7).copied().unwrap_or(0);
        let work = checked_sum(counters[..3].iter().copied())?;
        let idle = checked_sum(counters[3..7].iter().copied().chain([steal]))?;
        let total = work.checked_add(idle)?;
        Some(Self { work, total })
    }
}

fn checked_sum(mut values: impl Iterator<Item = u64>) -> Option<u64> {
    values.try_fold(0u64, |acc, v| acc.checked_add(v))
}

/// Find and parse the `cpu0` line of a stat dump
pub fn parse_cpu0(stat: &str) -> Option<CpuTimes> {
    stat.lines()
        .find(|line| line.split_whitespace().next() == Some("cpu0"))
        .and_then(CpuTimes::parse)
}

/// Utilization of logical CPU 0 from consecutive stat snapshots
#[derive(Debug, Clone)]
pub struct CpuSampler {
    path: PathBuf,
    last: CpuTimes,
    usage: f32,
}

impl CpuSampler {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last: CpuTimes::default(),
            usage: 0.0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Most recent usage in percent
    pub fn usage(&self) -> f32 {
        self.usage
    }

    /// Read the source once and update the usage.
    ///
    /// Returns the new usage, or `None` when the source could not be read or
    /// no time elapsed since the last sample; the previous usage is kept.
    pub fn sample(&mut self) -> Option<f32> {
        let stat = match fs::read_to_string(&self.path) {
            Ok(stat) => stat,
            Err(e) => {
                log::debug!("cpu sample skipped, {}: {}", self.path.display(), e);
                return None;
            }
        };
        let Some(times) = parse_cpu0(&stat) else {
            log::debug!("cpu sample skipped, no cpu0 line in {}", self.path.display());
            return None;
        };
        self.record(times)
    }

    /// Feed one snapshot directly
    pub fn record(&mut self, times: CpuTimes) -> Option<f32> {
        let total = times.total.wrapping_sub(self.last.total);
        if total == 0 {
            return None;
        }
        let work = times.work.wrapping_sub(self.last.work);
        self.last = times;
        self.usage = (work as f64 / total as f64 * 100.0) as f32;
        Some(self.usage)
    }
}

impl Default for CpuSampler {
    fn default() -> Self {
        Self::new(PROC_STAT)
    }
}
