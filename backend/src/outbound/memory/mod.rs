//! In-memory adapter implementing every repository port.
//!
//! Serves the application when no database URL is configured and backs the
//! handler and scenario tests. All tables sit behind one mutex, so a
//! multi-row write either lands completely or not at all. Uniqueness and
//! foreign-key rules report the same constraint names as the PostgreSQL
//! schema in `backend/migrations`.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use mockable::Clock;

use crate::domain::ports::PersistenceError;
use crate::domain::{
    AccessLogEntry, Activity, AnalyticsRecord, Assessment, Canvas, Class, Content, Enrollment,
    Membership, Message, Note, Organization, Program, ProgramEnrollment, Repositories, Sighting,
    Submission, User, UserId, UserProfile,
};

mod access_log;
mod analytics;
mod classes;
mod library;
mod messages;
mod organizations;
mod programs;
mod submissions;
mod users;

/// Rows of one table keyed by a store-assigned serial id.
struct Table<T> {
    rows: BTreeMap<i64, T>,
    last_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<T: Clone> Table<T> {
    /// Allocate the next id and store the row built from it.
    fn insert_with(&mut self, build: impl FnOnce(i64) -> T) -> T {
        self.last_id += 1;
        let row = build(self.last_id);
        self.rows.insert(self.last_id, row.clone());
        row
    }

    /// Id the next insert will receive.
    const fn next_id(&self) -> i64 {
        self.last_id + 1
    }

    fn get(&self, id: i64) -> Option<&T> {
        self.rows.get(&id)
    }

    fn get_mut(&mut self, id: i64) -> Option<&mut T> {
        self.rows.get_mut(&id)
    }

    fn contains(&self, id: i64) -> bool {
        self.rows.contains_key(&id)
    }

    fn values(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }

    fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.rows.values_mut()
    }
}

#[derive(Default)]
struct Tables {
    users: Table<User>,
    profiles: BTreeMap<UserId, UserProfile>,
    organizations: Table<Organization>,
    memberships: Table<Membership>,
    classes: Table<Class>,
    enrollments: Table<Enrollment>,
    programs: Table<Program>,
    program_enrollments: Table<ProgramEnrollment>,
    activities: Table<Activity>,
    canvases: Table<Canvas>,
    submissions: Table<Submission>,
    assessments: Table<Assessment>,
    content: Table<Content>,
    sightings: Table<Sighting>,
    notes: Table<Note>,
    analytics: Table<AnalyticsRecord>,
    messages: Table<Message>,
    access_log: Table<AccessLogEntry>,
}

/// Reject a write whose referenced row is missing.
fn require_row(exists: bool, constraint: &str) -> Result<(), PersistenceError> {
    if exists {
        Ok(())
    } else {
        Err(PersistenceError::constraint_violation(constraint))
    }
}

/// Reject a write that would duplicate a unique key.
fn reject_duplicate(duplicate: bool, constraint: &str) -> Result<(), PersistenceError> {
    if duplicate {
        Err(PersistenceError::constraint_violation(constraint))
    } else {
        Ok(())
    }
}

/// Shared handle on the in-memory tables.
///
/// Clones share state; every repository built from one store sees the same
/// rows.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bundle this store behind every repository port.
    #[must_use]
    pub fn repositories(&self, clock: Arc<dyn Clock>) -> Repositories {
        Repositories {
            users: Arc::new(self.clone()),
            organizations: Arc::new(self.clone()),
            classes: Arc::new(self.clone()),
            programs: Arc::new(self.clone()),
            submissions: Arc::new(self.clone()),
            library: Arc::new(self.clone()),
            messages: Arc::new(self.clone()),
            access_log: Arc::new(self.clone()),
            analytics: Arc::new(self.clone()),
            clock,
        }
    }

    /// Run `operation` with exclusive access to the tables.
    ///
    /// The operation must validate before mutating so a rejected write leaves
    /// every table untouched.
    fn with_tables<T>(
        &self,
        operation: impl FnOnce(&mut Tables) -> Result<T, PersistenceError>,
    ) -> Result<T, PersistenceError> {
        let mut tables = self
            .tables
            .lock()
            .map_err(|_| PersistenceError::unavailable("memory store lock poisoned"))?;
        operation(&mut tables)
    }
}
