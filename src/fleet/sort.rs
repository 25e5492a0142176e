use std::cmp::Ordering;

use super::filter::{SortDirection, SortKey};
use crate::models::ContainerRecord;

/// Order records by `key`. The sort is stable, so records with equal keys
/// keep the order the backend delivered them in.
///
/// Name ordering is always A to Z and ignores `direction`. Numeric keys
/// (cpu, memory, uptime) put the largest first for `Desc` and the smallest
/// first for `Asc`; a missing value counts as zero.
pub fn sort(records: &mut [ContainerRecord], key: SortKey, direction: SortDirection) {
    match key {
        SortKey::Name => records.sort_by(|a, b| compare_names(&a.name, &b.name)),
        SortKey::Cpu => records.sort_by(|a, b| numeric(a.cpu(), b.cpu(), direction)),
        SortKey::Memory => {
            records.sort_by(|a, b| numeric(a.memory_mb(), b.memory_mb(), direction))
        }
        SortKey::Uptime => records.sort_by(|a, b| {
            numeric(a.uptime_minutes() as f64, b.uptime_minutes() as f64, direction)
        }),
    }
}

/// Sorted copy, leaving the input untouched
pub fn sorted(records: &[ContainerRecord], key: SortKey, direction: SortDirection) -> Vec<ContainerRecord> {
    let mut out = records.to_vec();
    sort(&mut out, key, direction);
    out
}

/// Order by primary tag, then by name. Untagged records go last.
pub fn sort_by_tag(records: &mut [ContainerRecord]) {
    records.sort_by(|a, b| match (a.primary_tag(), b.primary_tag()) {
        (Some(x), Some(y)) => x.cmp(y).then_with(|| compare_names(&a.name, &b.name)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => compare_names(&a.name, &b.name),
    });
}

/// Human ordering for names: letters compare without regard to case, with
/// the exact spelling as tie-break so distinct names never compare equal.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| a.cmp(b))
}

fn numeric(a: f64, b: f64, direction: SortDirection) -> Ordering {
    let ascending = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
    match direction {
        SortDirection::Asc => ascending,
        SortDirection::Desc => ascending.reverse(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Uptime;

    fn record(name: &str, cpu: Option<f64>) -> ContainerRecord {
        let mut r = ContainerRecord::new(name, name);
        r.cpu_percent = cpu;
        r
    }

    fn names(records: &[ContainerRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_name_sort_ignores_direction() {
        let records = vec![record("zeta", None), record("Alpha", None), record("beta", None)];
        for direction in [SortDirection::Asc, SortDirection::Desc] {
            let out = sorted(&records, SortKey::Name, direction);
            assert_eq!(names(&out), vec!["Alpha", "beta", "zeta"]);
        }
    }

    #[test]
    fn test_cpu_defaults_to_highest_first() {
        let records = vec![record("a", Some(1.0)), record("b", None), record("c", Some(50.0))];
        let out = sorted(&records, SortKey::Cpu, SortDirection::default());
        assert_eq!(names(&out), vec!["c", "a", "b"]);

        let out = sorted(&records, SortKey::Cpu, SortDirection::Asc);
        assert_eq!(names(&out), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let records = vec![
            record("first", Some(5.0)),
            record("second", None),
            record("third", Some(5.0)),
            record("fourth", Some(0.0)),
        ];
        let out = sorted(&records, SortKey::Cpu, SortDirection::Desc);
        assert_eq!(names(&out), vec!["first", "third", "second", "fourth"]);
    }

    #[test]
    fn test_uptime_missing_is_zero() {
        let mut a = record("a", None);
        a.uptime = Some(Uptime::from_minutes(10));
        let b = record("b", None);
        let mut c = record("c", None);
        c.uptime = Some(Uptime::from_minutes(600));
        let out = sorted(&[a, b, c], SortKey::Uptime, SortDirection::Desc);
        assert_eq!(names(&out), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_memory_sort() {
        let mut a = record("a", None);
        a.memory_usage_mb = Some(512.0);
        let mut b = record("b", None);
        b.memory_usage_mb = Some(2048.0);
        let out = sorted(&[a, b], SortKey::Memory, SortDirection::Desc);
        assert_eq!(names(&out), vec!["b", "a"]);
    }

    #[test]
    fn test_tag_order_then_name() {
        let mut a = record("web", None);
        a.tags = vec!["prod".into()];
        let mut b = record("api", None);
        b.tags = vec!["prod".into(), "alpha".into()];
        let c = record("cron", None);
        let mut d = record("cache", None);
        d.tags = vec!["infra".into()];
        let mut records = vec![a, b, c, d];
        sort_by_tag(&mut records);
        assert_eq!(names(&records), vec!["cache", "api", "web", "cron"]);
    }
}
