use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;

use super::domain::{Application, ApplicationStatus};

/// Days to wait before the next contact attempt, per status. Zero means
/// no follow-up is suggested for that status.
pub const fn followup_interval_days(status: ApplicationStatus) -> i64 {
    match status {
        ApplicationStatus::Submitted => 14,
        ApplicationStatus::Viewed => 7,
        _ => 0,
    }
}

/// Compute the next follow-up date for an application in `status`.
///
/// The base is the last follow-up when one was made, otherwise the
/// submission time, otherwise `now`; the interval table above is added
/// on top. Statuses with a zero interval yield `None`.
pub fn next_followup(
    status: ApplicationStatus,
    submitted_at: Option<NaiveDateTime>,
    last_followup_at: Option<NaiveDateTime>,
    now: NaiveDateTime,
) -> Option<NaiveDateTime> {
    let interval = followup_interval_days(status);
    if interval == 0 {
        return None;
    }

    let base = last_followup_at.or(submitted_at).unwrap_or(now);
    Some(base + Duration::days(interval))
}

/// Follow-up email body for the given status, or `None` when that status
/// has no outreach template.
pub fn template(
    status: ApplicationStatus,
    company: &str,
    role: &str,
    submitted_at: Option<NaiveDateTime>,
) -> Option<String> {
    let submitted = submitted_at
        .map(|ts| ts.format("%B %d, %Y").to_string())
        .unwrap_or_default();

    match status {
        ApplicationStatus::Submitted => Some(format!(
            "Subject: Following Up - {role} Application at {company}\n\n\
             Hi there,\n\n\
             I wanted to follow up on my application for the {role} position at {company} \
             that I submitted on {submitted}.\n\n\
             I remain very interested in this opportunity and would appreciate any updates \
             on the status of my application.\n\n\
             Best regards,\n[Your Name]"
        )),
        ApplicationStatus::Viewed => Some(format!(
            "Subject: Re: {role} Position at {company}\n\n\
             Hi there,\n\n\
             Thank you for reviewing my application for the {role} position at {company}. \
             I'm very excited about the opportunity to contribute to your team and would \
             love to discuss this role further.\n\n\
             Best regards,\n[Your Name]"
        )),
        ApplicationStatus::Interview => Some(format!(
            "Subject: Thank You for the Interview - {role} at {company}\n\n\
             Hi there,\n\n\
             Thank you for taking the time to interview me for the {role} position at \
             {company}. I really enjoyed our conversation and I'm very interested in this \
             opportunity.\n\n\
             Best regards,\n[Your Name]"
        )),
        _ => None,
    }
}

/// An application whose follow-up date has arrived, with its outreach
/// template attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DueFollowup {
    pub job_id: String,
    pub company: String,
    pub role: String,
    pub status: ApplicationStatus,
    pub next_followup_at: NaiveDateTime,
    pub days_overdue: i64,
    pub template: Option<String>,
}

/// Applications whose `next_followup_at` is on or before `today`, most
/// overdue first. The sort is stable, so equally-overdue entries keep the
/// caller's iteration order — the store iterates its map in job_id order,
/// which makes the result deterministic.
pub fn due_followups<'a, I>(applications: I, today: NaiveDate) -> Vec<DueFollowup>
where
    I: IntoIterator<Item = &'a Application>,
{
    let mut due: Vec<DueFollowup> = applications
        .into_iter()
        .filter_map(|app| {
            let next = app.next_followup_at?;
            if next.date() > today {
                return None;
            }
            Some(DueFollowup {
                job_id: app.job_id.clone(),
                company: app.company.clone(),
                role: app.role.clone(),
                status: app.status,
                next_followup_at: next,
                days_overdue: (today - next.date()).num_days(),
                template: template(app.status, &app.company, &app.role, app.submitted_at),
            })
        })
        .collect();

    due.sort_by(|a, b| b.days_overdue.cmp(&a.days_overdue));
    due
}
