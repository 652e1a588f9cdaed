use crate::models::{DashboardStats, DayCount, DocumentKind, TrackerData};
use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};

pub fn build_dashboard_stats(data: &TrackerData) -> DashboardStats {
    build_dashboard_stats_at(Local::now().naive_local(), data)
}

pub fn build_dashboard_stats_at(now: NaiveDateTime, data: &TrackerData) -> DashboardStats {
    const DAY_COUNT: i64 = 7;

    let today = now.date();
    let today_start = start_of(today);
    let scraped_since = now - Duration::hours(24);
    let mut week_floor = start_of(week_start(today));
    if let Some(reset_at) = data.weekly_reset_at {
        week_floor = week_floor.max(reset_at);
    }

    let mut stats = DashboardStats::default();
    let mut per_day = [0u64; DAY_COUNT as usize];
    let first_day = today - Duration::days(DAY_COUNT - 1);

    for job in data.jobs.values() {
        *stats
            .application_status_breakdown
            .entry(job.status.as_str().to_string())
            .or_default() += 1;

        if job.date_loaded >= scraped_since {
            stats.jobs_scraped_last_24_hours += 1;
        }

        let applied_at = match job.application_date {
            Some(applied_at) if job.status.is_application() => applied_at,
            _ => continue,
        };

        stats.total_applications += 1;
        *stats
            .applications_by_source
            .entry(job.source.clone())
            .or_default() += 1;

        if applied_at >= today_start {
            stats.applications_today += 1;
        }
        if applied_at >= week_floor {
            stats.applications_this_week += 1;
        }

        let offset = (applied_at.date() - first_day).num_days();
        if (0..DAY_COUNT).contains(&offset) {
            per_day[offset as usize] += 1;
        }
    }

    for document in &data.documents {
        let created_today = document.generated_at >= today_start;
        match document.kind {
            DocumentKind::Resume => {
                stats.resumes_created_total += 1;
                stats.resumes_created_today += u64::from(created_today);
            }
            DocumentKind::CoverLetter => {
                stats.cover_letters_created_total += 1;
                stats.cover_letters_created_today += u64::from(created_today);
            }
        }
    }

    stats.applications_last_7_days = per_day
        .iter()
        .enumerate()
        .map(|(offset, count)| DayCount {
            date: date_key(first_day + Duration::days(offset as i64)),
            count: *count,
        })
        .collect();

    stats
}

fn start_of(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}
