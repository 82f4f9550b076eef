//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on the driving ports and stay testable against any repository adapter.

use std::sync::Arc;

use crate::domain::ports::{
    Accounts, Analytics, AuditQuery, Classrooms, Library, Messaging, Organizations, Programs,
};
use crate::domain::{
    AccountService, AnalyticsService, AuditService, ClassroomService, LibraryService, MessagingService,
    OrganizationService, ProgramService, Repositories,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn Accounts>,
    pub organizations: Arc<dyn Organizations>,
    pub classrooms: Arc<dyn Classrooms>,
    pub programs: Arc<dyn Programs>,
    pub library: Arc<dyn Library>,
    pub messaging: Arc<dyn Messaging>,
    pub audit: Arc<dyn AuditQuery>,
    pub analytics: Arc<dyn Analytics>,
}

impl HttpState {
    /// Wire the domain services over one repository bundle.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use komodo_hub::inbound::http::state::HttpState;
    /// use komodo_hub::outbound::memory::MemoryStore;
    /// use mockable::DefaultClock;
    ///
    /// let store = MemoryStore::new();
    /// let state = HttpState::from_repositories(&store.repositories(Arc::new(DefaultClock)));
    /// let _accounts = state.accounts.clone();
    /// ```
    pub fn from_repositories(repos: &Repositories) -> Self {
        Self {
            accounts: Arc::new(AccountService::new(repos)),
            organizations: Arc::new(OrganizationService::new(repos)),
            classrooms: Arc::new(ClassroomService::new(repos)),
            programs: Arc::new(ProgramService::new(repos)),
            library: Arc::new(LibraryService::new(repos)),
            messaging: Arc::new(MessagingService::new(repos)),
            audit: Arc::new(AuditService::new(repos)),
            analytics: Arc::new(AnalyticsService::new(repos)),
        }
    }
}
