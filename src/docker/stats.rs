use bollard::container::{Stats, StatsOptions};
use bollard::Docker;
use futures_util::StreamExt;

use crate::error::Result;

/// CPU and memory figures for one running container
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Usage {
    pub cpu_percent: f64,
    pub memory_usage_mb: f64,
}

/// One-shot stats snapshot. None if the engine sent nothing.
pub async fn container_usage(docker: &Docker, id: &str) -> Result<Option<Usage>> {
    let options = StatsOptions {
        stream: false,
        one_shot: true,
    };

    let mut stream = docker.stats(id, Some(options));
    match stream.next().await {
        Some(result) => Ok(Some(usage_from_stats(&result?))),
        None => Ok(None),
    }
}

fn usage_from_stats(stats: &Stats) -> Usage {
    let memory_bytes = stats.memory_stats.usage.unwrap_or(0) as f64;
    Usage {
        cpu_percent: round2(cpu_percent(stats)),
        memory_usage_mb: round2(memory_bytes / 1024.0 / 1024.0),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn cpu_percent(stats: &Stats) -> f64 {
    let cpu = &stats.cpu_stats;
    let precpu = &stats.precpu_stats;

    let cpu_delta = cpu.cpu_usage.total_usage as f64 - precpu.cpu_usage.total_usage as f64;
    let system_delta =
        cpu.system_cpu_usage.unwrap_or(0) as f64 - precpu.system_cpu_usage.unwrap_or(0) as f64;

    let num_cpus = cpu
        .online_cpus
        .or(cpu.cpu_usage.percpu_usage.as_ref().map(|v| v.len() as u64))
        .unwrap_or(1) as f64;

    if system_delta > 0.0 && cpu_delta > 0.0 {
        (cpu_delta / system_delta) * num_cpus * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(12.3456), 12.35);
        assert_eq!(round2(0.0), 0.0);
    }
}
