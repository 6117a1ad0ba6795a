use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::domain::{Application, ApplicationStatus};
use super::followup::{self, DueFollowup};
use super::lifecycle::{self, TransitionError};

const LOG_COLUMNS: [&str; 12] = [
    "job_id",
    "company",
    "role",
    "apply_url",
    "status",
    "submitted_at",
    "filled_fields",
    "ambiguous_fields_filled",
    "status_history",
    "last_followup_at",
    "next_followup_at",
    "notes",
];

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("job_id must not be empty")]
    EmptyJobId,
    #[error("application '{0}' already exists")]
    Duplicate(String),
    #[error("application '{0}' not found")]
    NotFound(String),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("failed to access application log {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode application log {path}: {source}")]
    Log {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// File-backed application table.
///
/// Every mutation appends one full-snapshot row to an append-only CSV
/// log; opening the store replays the log to reconstruct the current
/// map. Single-writer: all public methods serialize on the internal
/// mutex, so a dashboard handler and a batch job cannot interleave
/// appends.
pub struct ApplicationStore {
    inner: Mutex<StoreInner>,
}

struct StoreInner {
    log_path: PathBuf,
    applications: BTreeMap<String, Application>,
}

impl ApplicationStore {
    /// Open (creating if absent) the durable log and replay it.
    pub fn open(log_path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let log_path = log_path.into();

        if let Some(parent) = log_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        if !log_path.exists() {
            let mut writer =
                csv::Writer::from_path(&log_path).map_err(|source| StoreError::Log {
                    path: log_path.clone(),
                    source,
                })?;
            writer
                .write_record(LOG_COLUMNS)
                .map_err(|source| StoreError::Log {
                    path: log_path.clone(),
                    source,
                })?;
            writer.flush().map_err(|source| StoreError::Io {
                path: log_path.clone(),
                source,
            })?;
        }

        let applications = replay_log(&log_path)?;
        Ok(Self {
            inner: Mutex::new(StoreInner {
                log_path,
                applications,
            }),
        })
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Create a new application record. The job_id is externally supplied
    /// and must be unique.
    pub fn add(
        &self,
        job_id: &str,
        company: &str,
        role: &str,
        apply_url: &str,
        status: ApplicationStatus,
    ) -> Result<Application, StoreError> {
        if job_id.trim().is_empty() {
            return Err(StoreError::EmptyJobId);
        }

        let mut inner = self.lock();
        if inner.applications.contains_key(job_id) {
            return Err(StoreError::Duplicate(job_id.to_string()));
        }

        let now = Utc::now().naive_utc();
        let mut app = Application::new(job_id, company, role, apply_url, status, now);
        app.next_followup_at = followup::next_followup(status, app.submitted_at, None, now);
        inner.append_row(&app)?;
        inner.applications.insert(job_id.to_string(), app.clone());
        Ok(app)
    }

    /// Partially update an application. Maps merge key-by-key; `status`
    /// is deliberately absent — it only moves through [`Self::transition`].
    pub fn update(
        &self,
        job_id: &str,
        update: ApplicationUpdate,
    ) -> Result<Application, StoreError> {
        let mut inner = self.lock();
        let mut app = inner
            .applications
            .get(job_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(job_id.to_string()))?;

        if let Some(fields) = update.filled_fields {
            app.filled_fields.extend(fields);
        }
        if let Some(fields) = update.ambiguous_fields_filled {
            app.ambiguous_fields_filled.extend(fields);
        }
        if let Some(notes) = update.notes {
            app.notes = notes;
        }
        if let Some(ts) = update.last_followup_at {
            app.last_followup_at = Some(ts);
        }
        if let Some(ts) = update.next_followup_at {
            app.next_followup_at = Some(ts);
        }

        inner.append_row(&app)?;
        inner.applications.insert(job_id.to_string(), app.clone());
        Ok(app)
    }

    /// Move an application through the lifecycle state machine and
    /// recompute its next follow-up date for the new status.
    ///
    /// A rejected transition leaves both the in-memory record and the
    /// durable log untouched.
    pub fn transition(
        &self,
        job_id: &str,
        new_status: ApplicationStatus,
        notes: &str,
    ) -> Result<Application, StoreError> {
        let now = Utc::now().naive_utc();
        let mut inner = self.lock();
        let mut app = inner
            .applications
            .get(job_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(job_id.to_string()))?;

        lifecycle::transition(&mut app, new_status, notes, now)?;
        app.next_followup_at =
            followup::next_followup(new_status, app.submitted_at, app.last_followup_at, now);

        inner.append_row(&app)?;
        inner.applications.insert(job_id.to_string(), app.clone());
        Ok(app)
    }

    pub fn get(&self, job_id: &str) -> Option<Application> {
        self.lock().applications.get(job_id).cloned()
    }

    pub fn query_by_status(&self, status: ApplicationStatus) -> Vec<Application> {
        self.lock()
            .applications
            .values()
            .filter(|app| app.status == status)
            .cloned()
            .collect()
    }

    /// All applications in job_id order.
    pub fn snapshot(&self) -> Vec<Application> {
        self.lock().applications.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().applications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().applications.is_empty()
    }

    /// Applications whose follow-up date has arrived, most overdue first.
    pub fn due_followups(&self, today: NaiveDate) -> Vec<DueFollowup> {
        let inner = self.lock();
        followup::due_followups(inner.applications.values(), today)
    }

    pub fn summary(&self, today: NaiveDate) -> StoreSummary {
        let inner = self.lock();

        let mut by_status: BTreeMap<String, usize> = ApplicationStatus::all()
            .into_iter()
            .map(|status| (status.label().to_string(), 0))
            .collect();
        let mut needing_followup = 0;

        for app in inner.applications.values() {
            if let Some(count) = by_status.get_mut(app.status.label()) {
                *count += 1;
            }
            if app
                .next_followup_at
                .map(|ts| ts.date() <= today)
                .unwrap_or(false)
            {
                needing_followup += 1;
            }
        }

        let submitted = by_status[ApplicationStatus::Submitted.label()];
        let interviews = by_status[ApplicationStatus::Interview.label()];
        let success_rate =
            (submitted > 0).then(|| interviews as f32 / submitted as f32 * 100.0);

        StoreSummary {
            total_applications: inner.applications.len(),
            by_status,
            needing_followup,
            success_rate,
        }
    }
}

impl StoreInner {
    fn append_row(&self, app: &Application) -> Result<(), StoreError> {
        let file = OpenOptions::new()
            .append(true)
            .open(&self.log_path)
            .map_err(|source| StoreError::Io {
                path: self.log_path.clone(),
                source,
            })?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer
            .serialize(LogRow::from_application(app))
            .map_err(|source| StoreError::Log {
                path: self.log_path.clone(),
                source,
            })?;
        writer.flush().map_err(|source| StoreError::Io {
            path: self.log_path.clone(),
            source,
        })
    }
}

/// Partial-field update payload for [`ApplicationStore::update`].
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ApplicationUpdate {
    #[serde(default)]
    pub filled_fields: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub ambiguous_fields_filled: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub last_followup_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub next_followup_at: Option<NaiveDateTime>,
}

/// Aggregate counts for dashboards and the CLI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreSummary {
    pub total_applications: usize,
    pub by_status: BTreeMap<String, usize>,
    pub needing_followup: usize,
    /// interviews / submitted, as a percentage; None when nothing has
    /// been submitted yet.
    pub success_rate: Option<f32>,
}

impl StoreSummary {
    pub fn success_rate_label(&self) -> String {
        match self.success_rate {
            Some(rate) => format!("{rate:.1}%"),
            None => "N/A".to_string(),
        }
    }
}

fn replay_log(path: &Path) -> Result<BTreeMap<String, Application>, StoreError> {
    let mut reader = csv::Reader::from_path(path).map_err(|source| StoreError::Log {
        path: path.to_path_buf(),
        source,
    })?;

    let mut applications = BTreeMap::new();
    for row in reader.deserialize::<LogRow>() {
        let row = match row {
            Ok(row) => row,
            Err(error) => {
                // one bad row never loses the rest of the data set
                warn!(%error, log = %path.display(), "skipping malformed application log row");
                continue;
            }
        };
        let Some(app) = row.into_application() else {
            continue;
        };

        let app = match applications.remove(&app.job_id) {
            Some(previous) => merge_replay(previous, app),
            None => app,
        };
        applications.insert(app.job_id.clone(), app);
    }

    Ok(applications)
}

/// Later rows win field-by-field, but the status history only ever
/// accumulates: a shorter history in a later row never truncates what an
/// earlier row already established.
fn merge_replay(previous: Application, mut latest: Application) -> Application {
    if latest.status_history.len() < previous.status_history.len() {
        latest.status_history = previous.status_history;
    }
    latest
}

/// One durable log row. Structured sub-fields are JSON-encoded inside
/// their cells, matching the original tabular format.
#[derive(Debug, Serialize, Deserialize)]
struct LogRow {
    job_id: String,
    company: String,
    role: String,
    apply_url: String,
    status: String,
    submitted_at: String,
    filled_fields: String,
    ambiguous_fields_filled: String,
    status_history: String,
    last_followup_at: String,
    next_followup_at: String,
    notes: String,
}

impl LogRow {
    fn from_application(app: &Application) -> Self {
        Self {
            job_id: app.job_id.clone(),
            company: app.company.clone(),
            role: app.role.clone(),
            apply_url: app.apply_url.clone(),
            status: app.status.label().to_string(),
            submitted_at: app.submitted_at.map(format_ts).unwrap_or_default(),
            filled_fields: serde_json::to_string(&app.filled_fields).unwrap_or_default(),
            ambiguous_fields_filled: serde_json::to_string(&app.ambiguous_fields_filled)
                .unwrap_or_default(),
            status_history: serde_json::to_string(&app.status_history).unwrap_or_default(),
            last_followup_at: app.last_followup_at.map(format_ts).unwrap_or_default(),
            next_followup_at: app.next_followup_at.map(format_ts).unwrap_or_default(),
            notes: app.notes.clone(),
        }
    }

    fn into_application(self) -> Option<Application> {
        if self.job_id.trim().is_empty() {
            return None;
        }

        let status = match ApplicationStatus::from_label(&self.status) {
            Some(status) => status,
            None => {
                warn!(
                    job_id = %self.job_id,
                    status = %self.status,
                    "unknown status label, defaulting to pending"
                );
                ApplicationStatus::Pending
            }
        };

        Some(Application {
            status,
            submitted_at: parse_ts(&self.submitted_at),
            filled_fields: decode_json_cell(&self.filled_fields, &self.job_id, "filled_fields"),
            ambiguous_fields_filled: decode_json_cell(
                &self.ambiguous_fields_filled,
                &self.job_id,
                "ambiguous_fields_filled",
            ),
            status_history: decode_json_cell(&self.status_history, &self.job_id, "status_history"),
            last_followup_at: parse_ts(&self.last_followup_at),
            next_followup_at: parse_ts(&self.next_followup_at),
            job_id: self.job_id,
            company: self.company,
            role: self.role,
            apply_url: self.apply_url,
            notes: self.notes,
        })
    }
}

fn format_ts(ts: NaiveDateTime) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S").to_string()
}

fn parse_ts(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<NaiveDateTime>().ok()
}

/// Decode a JSON-encoded cell, degrading to the default value on corrupt
/// input instead of aborting the load.
fn decode_json_cell<T>(raw: &str, job_id: &str, column: &str) -> T
where
    T: Default + for<'de> Deserialize<'de>,
{
    if raw.trim().is_empty() {
        return T::default();
    }
    match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(error) => {
            warn!(job_id, column, %error, "corrupt embedded json, defaulting to empty");
            T::default()
        }
    }
}
