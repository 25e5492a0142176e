use super::ContainerRecord;

/// Aggregate resource usage over a set of containers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupStats {
    pub total: usize,
    pub running: usize,
    /// Sum of CPU percentages, rounded to one decimal
    pub cpu_sum: f64,
    /// Sum of memory usage in MB, rounded to the nearest MB
    pub memory_sum_mb: u64,
}

impl GroupStats {
    /// Aggregate over members. Missing or NaN numerics count as zero.
    pub fn from_members<'a, I>(members: I) -> Self
    where
        I: IntoIterator<Item = &'a ContainerRecord>,
    {
        let mut total = 0;
        let mut running = 0;
        let mut cpu = 0.0;
        let mut memory = 0.0;

        for record in members {
            total += 1;
            if record.status.is_running() {
                running += 1;
            }
            cpu += record.cpu();
            memory += record.memory_mb();
        }

        Self {
            total,
            running,
            cpu_sum: (cpu * 10.0).round() / 10.0,
            memory_sum_mb: memory.max(0.0).round() as u64,
        }
    }

    /// "2/3 running"
    pub fn running_display(&self) -> String {
        format!("{}/{} running", self.running, self.total)
    }

    pub fn cpu_display(&self) -> String {
        format!("{:.1}%", self.cpu_sum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContainerStatus;

    fn record(status: ContainerStatus, cpu: Option<f64>, mem: Option<f64>) -> ContainerRecord {
        let mut r = ContainerRecord::new("id", "name");
        r.status = status;
        r.cpu_percent = cpu;
        r.memory_usage_mb = mem;
        r
    }

    #[test]
    fn test_stats_tolerate_missing_numbers() {
        let members = vec![
            record(ContainerStatus::Running, Some(12.34), Some(100.4)),
            record(ContainerStatus::Exited, None, None),
            record(ContainerStatus::Running, Some(f64::NAN), Some(50.3)),
        ];
        let stats = GroupStats::from_members(&members);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.running, 2);
        assert_eq!(stats.cpu_sum, 12.3);
        assert_eq!(stats.memory_sum_mb, 151);
        assert_eq!(stats.running_display(), "2/3 running");
    }
}
