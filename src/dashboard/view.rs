use super::goals::GoalProgress;
use crate::models::DashboardStats;

/// The KPI counters shown at the top of the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Kpis {
    pub jobs_scraped_24h: u64,
    pub applications_today: u64,
    pub applications_this_week: u64,
    pub total_applications: u64,
    pub resumes_created_today: u64,
    pub resumes_created_total: u64,
    pub cover_letters_created_today: u64,
    pub cover_letters_created_total: u64,
}

impl Kpis {
    pub fn from_stats(stats: &DashboardStats) -> Self {
        Self {
            jobs_scraped_24h: stats.jobs_scraped_last_24_hours,
            applications_today: stats.applications_today,
            applications_this_week: stats.applications_this_week,
            total_applications: stats.total_applications,
            resumes_created_today: stats.resumes_created_today,
            resumes_created_total: stats.resumes_created_total,
            cover_letters_created_today: stats.cover_letters_created_today,
            cover_letters_created_total: stats.cover_letters_created_total,
        }
    }

    pub fn entries(&self) -> [(&'static str, u64); 8] {
        [
            ("Jobs scraped (24h)", self.jobs_scraped_24h),
            ("Applications today", self.applications_today),
            ("Applications this week", self.applications_this_week),
            ("Total applications", self.total_applications),
            ("Resumes today", self.resumes_created_today),
            ("Resumes total", self.resumes_created_total),
            ("Cover letters today", self.cover_letters_created_today),
            ("Cover letters total", self.cover_letters_created_total),
        ]
    }
}

/// The non-chart regions of a dashboard. Charts go through a chart backend.
pub trait DashboardView {
    fn show_kpis(&mut self, kpis: &Kpis);

    fn show_goal(&mut self, progress: &GoalProgress);

    fn show_quote(&mut self, text: &str);
}
