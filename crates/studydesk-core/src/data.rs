//! The per-session data context
//!
//! `StudyData` owns one mirror cache per entity kind and moves all of them
//! together when the signed-in identity changes.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use tracing::{info, warn};

use studydesk_store::{DocumentStore, MemoryDocumentStore};

use crate::config::{ConfigError, StoreBackend, StudyConfig};
use crate::entity::{
    CalendarEvent, EntityKind, Note, Record, StudyPlan, SupportTicket, TestResult,
};
use crate::error::{DataError, Result};
use crate::identity::{AuthProvider, UserIdentity};
use crate::mirror::MirrorCache;
use crate::questions::QuestionBank;
use crate::quiz::{QuizHistory, QuizOutcome};

/// Outcome of loading every kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: BTreeMap<EntityKind, usize>,
    pub failed: BTreeMap<EntityKind, String>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.loaded.values().sum()
    }
}

pub struct StudyData {
    store: Arc<dyn DocumentStore>,
    config: StudyConfig,
    identity: RwLock<Option<UserIdentity>>,
    loading: AtomicBool,
    pub notes: MirrorCache<Note>,
    pub plans: MirrorCache<StudyPlan>,
    pub events: MirrorCache<CalendarEvent>,
    pub results: MirrorCache<TestResult>,
    pub tickets: MirrorCache<SupportTicket>,
}

impl StudyData {
    pub fn new(store: Arc<dyn DocumentStore>, config: StudyConfig) -> Self {
        Self {
            notes: MirrorCache::new(store.clone()),
            plans: MirrorCache::new(store.clone()),
            events: MirrorCache::new(store.clone()),
            results: MirrorCache::new(store.clone()),
            tickets: MirrorCache::new(store.clone()),
            store,
            config,
            identity: RwLock::new(None),
            loading: AtomicBool::new(false),
        }
    }

    /// Build the context with the backend named in `config`.
    pub fn from_config(config: StudyConfig) -> Result<Self> {
        config.validate()?;
        let store: Arc<dyn DocumentStore> = match config.store.backend {
            StoreBackend::Memory => Arc::new(MemoryDocumentStore::new()),
            StoreBackend::Sqlite => open_sqlite(&config)?,
        };
        Ok(Self::new(store, config))
    }

    pub fn config(&self) -> &StudyConfig {
        &self.config
    }

    pub fn store(&self) -> Arc<dyn DocumentStore> {
        self.store.clone()
    }

    pub fn identity(&self) -> Option<UserIdentity> {
        self.identity.read().ok().and_then(|i| i.clone())
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Attach and load every cache for `user`, or clear them all on `None`.
    pub fn set_identity(&self, user: Option<UserIdentity>) -> Result<LoadReport> {
        *self.identity.write()? = user.clone();
        match user {
            Some(user) => {
                info!("Loading data for {}", user.id);
                self.notes.attach(user.clone())?;
                self.plans.attach(user.clone())?;
                self.events.attach(user.clone())?;
                self.results.attach(user.clone())?;
                self.tickets.attach(user)?;
                Ok(self.load_all())
            }
            None => {
                info!("Signed out, clearing local data");
                self.notes.detach()?;
                self.plans.detach()?;
                self.events.detach()?;
                self.results.detach()?;
                self.tickets.detach()?;
                Ok(LoadReport::default())
            }
        }
    }

    /// Follow whatever identity the auth collaborator currently reports.
    pub fn sync_with(&self, auth: &dyn AuthProvider) -> Result<LoadReport> {
        let current = auth.current_user();
        if current == self.identity() {
            return Ok(LoadReport::default());
        }
        self.set_identity(current)
    }

    pub fn sign_out(&self, auth: &dyn AuthProvider) -> Result<()> {
        auth.sign_out()?;
        self.set_identity(None)?;
        Ok(())
    }

    /// Reload every kind for the current identity.
    pub fn reload(&self) -> Result<LoadReport> {
        if self.identity().is_none() {
            return Err(DataError::NotSignedIn);
        }
        Ok(self.load_all())
    }

    fn load_all(&self) -> LoadReport {
        self.loading.store(true, Ordering::SeqCst);
        let mut report = LoadReport::default();
        let outcomes = [
            (EntityKind::Note, self.notes.load()),
            (EntityKind::StudyPlan, self.plans.load()),
            (EntityKind::CalendarEvent, self.events.load()),
            (EntityKind::TestResult, self.results.load()),
            (EntityKind::SupportTicket, self.tickets.load()),
        ];
        for (kind, outcome) in outcomes {
            match outcome {
                Ok(n) => {
                    report.loaded.insert(kind, n);
                }
                Err(e) => {
                    warn!("Failed to load {}: {}", kind, e);
                    report.failed.insert(kind, e.to_string());
                }
            }
        }
        self.loading.store(false, Ordering::SeqCst);
        report
    }

    /// Persist a finished quiz and mirror it.
    pub fn record_test_result(&self, outcome: &QuizOutcome) -> Result<Record<TestResult>> {
        self.results.add(outcome.result.clone())
    }

    pub fn history(&self) -> QuizHistory {
        QuizHistory::new(self.store.clone())
    }

    pub fn questions(&self) -> QuestionBank {
        QuestionBank::new(self.store.clone(), self.config.quiz.clone())
    }
}

#[cfg(feature = "sqlite")]
fn open_sqlite(config: &StudyConfig) -> Result<Arc<dyn DocumentStore>> {
    let path = config
        .store
        .sqlite_path()
        .ok_or_else(|| ConfigError::MissingField("store.path".into()))?;
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::Io(e.to_string()))?;
    }
    let store = studydesk_store::SqliteDocumentStore::open(&path)?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "sqlite"))]
fn open_sqlite(_config: &StudyConfig) -> Result<Arc<dyn DocumentStore>> {
    Err(ConfigError::Unsupported("sqlite (built without the `sqlite` feature)".into()).into())
}
