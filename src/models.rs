use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Inbox,
    WantToApply,
    Applied,
    Interviewing,
    Offer,
    Rejected,
    RejectedAfterInterview,
    OfferDeclined,
    Archived,
}

impl JobStatus {
    pub const ALL: [JobStatus; 9] = [
        JobStatus::Inbox,
        JobStatus::WantToApply,
        JobStatus::Applied,
        JobStatus::Interviewing,
        JobStatus::Offer,
        JobStatus::Rejected,
        JobStatus::RejectedAfterInterview,
        JobStatus::OfferDeclined,
        JobStatus::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Inbox => "inbox",
            JobStatus::WantToApply => "want_to_apply",
            JobStatus::Applied => "applied",
            JobStatus::Interviewing => "interviewing",
            JobStatus::Offer => "offer",
            JobStatus::Rejected => "rejected",
            JobStatus::RejectedAfterInterview => "rejected_after_interview",
            JobStatus::OfferDeclined => "offer_declined",
            JobStatus::Archived => "archived",
        }
    }

    /// Statuses that mean an application was actually sent.
    pub fn is_application(&self) -> bool {
        matches!(
            self,
            JobStatus::Applied
                | JobStatus::Interviewing
                | JobStatus::Offer
                | JobStatus::Rejected
                | JobStatus::RejectedAfterInterview
                | JobStatus::OfferDeclined
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        JobStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| format!("unknown status '{}'", value.trim()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: u64,
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub job_url: Option<String>,
    pub source: String,
    pub status: JobStatus,
    pub date_loaded: NaiveDateTime,
    #[serde(default)]
    pub application_date: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Resume,
    CoverLetter,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentGeneration {
    pub job_id: u64,
    pub kind: DocumentKind,
    pub generated_at: NaiveDateTime,
}

/// Everything the server persists between restarts.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TrackerData {
    #[serde(default)]
    pub next_id: u64,
    #[serde(default)]
    pub jobs: BTreeMap<u64, JobRecord>,
    #[serde(default)]
    pub documents: Vec<DocumentGeneration>,
    #[serde(default)]
    pub weekly_reset_at: Option<NaiveDateTime>,
}

impl TrackerData {
    pub fn allocate_id(&mut self) -> u64 {
        let floor = self.jobs.keys().next_back().copied().unwrap_or(0);
        self.next_id = self.next_id.max(floor).saturating_add(1);
        self.next_id
    }
}

#[derive(Debug, Deserialize)]
pub struct NewJobRequest {
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: String,
    pub source: String,
    #[serde(default)]
    pub job_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct DocumentsRequest {
    #[serde(default)]
    pub resume: bool,
    #[serde(default)]
    pub cover_letter: bool,
}

#[derive(Debug, Deserialize)]
pub struct JobsQuery {
    pub status: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Acknowledgement {
    pub success: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCount {
    #[serde(default)]
    pub date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: u64,
}

/// Aggregate numbers behind the dashboard. Missing or null fields decode as
/// zero / empty so a partial payload still renders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardStats {
    #[serde(deserialize_with = "null_as_default")]
    pub jobs_scraped_last_24_hours: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub applications_today: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub applications_this_week: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_applications: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub resumes_created_today: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub resumes_created_total: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub cover_letters_created_today: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub cover_letters_created_total: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub application_status_breakdown: BTreeMap<String, u64>,
    #[serde(deserialize_with = "null_as_default")]
    pub applications_by_source: BTreeMap<String, u64>,
    #[serde(deserialize_with = "null_as_default")]
    pub applications_last_7_days: Vec<DayCount>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    #[serde(default, deserialize_with = "null_as_default")]
    pub quote: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub author: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_missing_and_null_fields_decode_as_zero() {
        let stats: DashboardStats = serde_json::from_str(
            r#"{"applications_today": 4, "total_applications": null, "applications_by_source": null}"#,
        )
        .unwrap();
        assert_eq!(stats.applications_today, 4);
        assert_eq!(stats.total_applications, 0);
        assert!(stats.applications_by_source.is_empty());
        assert!(stats.applications_last_7_days.is_empty());
    }

    #[test]
    fn negative_count_is_rejected() {
        let result = serde_json::from_str::<DashboardStats>(r#"{"applications_today": -1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("Applied".parse::<JobStatus>(), Ok(JobStatus::Applied));
        assert_eq!(
            " want_to_apply ".parse::<JobStatus>(),
            Ok(JobStatus::WantToApply)
        );
        assert!("hired".parse::<JobStatus>().is_err());
        assert!(JobStatus::OfferDeclined.is_application());
        assert!(!JobStatus::Archived.is_application());
    }

    #[test]
    fn allocate_id_skips_existing_keys() {
        let mut data = TrackerData::default();
        assert_eq!(data.allocate_id(), 1);
        data.next_id = 0;
        data.jobs.insert(
            7,
            JobRecord {
                id: 7,
                title: "t".into(),
                company: "c".into(),
                location: String::new(),
                job_url: None,
                source: "linkedin".into(),
                status: JobStatus::Inbox,
                date_loaded: chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap(),
                application_date: None,
            },
        );
        assert_eq!(data.allocate_id(), 8);
    }
}
