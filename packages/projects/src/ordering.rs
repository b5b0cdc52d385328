use std::cmp::Ordering;
use trellis_core::Project;

/// Most recently active bucket first, newest creation first within a bucket
pub fn compare_by_activity(a: &Project, b: &Project, bucket_ms: i64) -> Ordering {
    let bucket = |p: &Project| p.last_active_time / bucket_ms.max(1);
    bucket(b)
        .cmp(&bucket(a))
        .then_with(|| b.create_time.cmp(&a.create_time))
}

pub fn sort_projects(projects: &mut [Project], bucket_ms: i64) {
    projects.sort_by(|a, b| compare_by_activity(a, b, bucket_ms));
}
