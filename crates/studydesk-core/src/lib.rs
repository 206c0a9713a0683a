//! Studydesk Core - data layer for a personal study manager
//!
//! This crate provides everything between the document store and the screens:
//!
//! - **Entity**: Note, StudyPlan, CalendarEvent, TestResult and SupportTicket records
//! - **Mirror**: Per-kind local cache, updated only after the remote write is confirmed
//! - **Data**: The session context that attaches, loads and clears all caches together
//! - **Views**: Pure dashboard, notebook, planning, calendar and results computations
//! - **Quiz**: Result history, statistics and the running-test state machine
//! - **Questions**: Random sampling from the shared question bank
//! - **Navigation**: Active section and auth form
//! - **Config**: Store backend, view windows, quiz choices and log filter
//!
//! # Data flow
//!
//! ```text
//! AuthProvider → StudyData → MirrorCache<E> ⇄ DocumentStore
//!                               ↓ snapshot()
//!                             views::*
//! ```

pub mod config;
pub mod data;
pub mod entity;
pub mod error;
pub mod identity;
pub mod logging;
pub mod mirror;
pub mod navigation;
pub mod questions;
pub mod quiz;
pub mod views;

pub use config::{
    ConfigError, DashboardConfig, LoggingConfig, QuizConfig, StoreBackend, StoreConfig,
    StudyConfig, MAX_WINDOW_DAYS,
};
pub use data::{LoadReport, StudyData};
pub use entity::{
    score_percent, CalendarEvent, CalendarEventPatch, Entity, EntityKind, EventKind, Note,
    NotePatch, PlanStatus, Priority, Record, StudyPlan, StudyPlanPatch, SupportTicket,
    SupportTicketPatch, TestResult, TestResultPatch, TicketStatus,
};
pub use error::{DataError, Result};
pub use identity::{AuthProvider, SessionAuth, UserIdentity};
pub use mirror::{ConfirmPrompt, MirrorCache};
pub use navigation::{AuthView, Navigator, Section};
pub use questions::{QuestionBank, Subject, SubjectInfo};
pub use quiz::{
    Advance, AnswerRecord, Question, QuizHistory, QuizOutcome, QuizSession, QuizStats,
    SubjectStats,
};
