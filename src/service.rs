//! Command dispatch for a link checking host
//!
//! A host (the CLI, or anything embedding the library) talks to the checker
//! through `Command` values. `LinkCheckService` owns the single orchestrator
//! and reporter of the process and routes each command to them.

use crate::checker::{CheckerOptions, Orchestrator, ReqwestTransport};
use crate::config::Config;
use crate::extract::{HttpPageInspector, PageInspector};
use crate::output::to_csv;
use crate::report::{ProgressReporter, Subscription};
use crate::state::{LinkDescriptor, Session, SessionStatus};
use crate::storage::{open_session_store, SessionStore};
use crate::CheckError;
use chrono::Utc;
use std::path::Path;
use std::sync::Arc;

/// A request from the host
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Extract the checkable references of a page
    ExtractLinks { page_url: String },

    /// Draw attention to the element with the given identifier
    Highlight { id: String },

    /// Validate `links` as a fresh run
    StartValidation {
        page_url: String,
        links: Vec<LinkDescriptor>,
    },

    /// Continue the stored run if it was interrupted
    ResumeValidation,

    /// Cancel the active run
    CancelValidation,

    /// Fetch the stored session record
    GetStoredSession,

    /// Render the stored session's outcomes as CSV
    ExportCsv,
}

/// The reply to a `Command`
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Links(Vec<LinkDescriptor>),
    Highlighted(bool),
    Finished(Session),
    Resumed(Option<Session>),
    Cancelled,
    StoredSession(Option<Session>),
    Csv(Option<String>),
}

/// Routes host commands to the orchestrator, reporter, and page inspector
pub struct LinkCheckService {
    orchestrator: Arc<Orchestrator>,
    reporter: Arc<ProgressReporter>,
    inspector: Arc<dyn PageInspector>,
}

impl LinkCheckService {
    pub fn new(
        orchestrator: Arc<Orchestrator>,
        reporter: Arc<ProgressReporter>,
        inspector: Arc<dyn PageInspector>,
    ) -> Self {
        Self {
            orchestrator,
            reporter,
            inspector,
        }
    }

    /// Wires the service from configuration, opening the SQLite store
    pub fn from_config(config: &Config) -> Result<Self, CheckError> {
        let store = open_session_store(Path::new(&config.storage.database_path))?;
        Self::with_store(config, store)
    }

    /// Wires the service from configuration over an existing store
    pub fn with_store(config: &Config, store: SessionStore) -> Result<Self, CheckError> {
        let transport = Arc::new(ReqwestTransport::from_config(&config.user_agent)?);
        let orchestrator = Orchestrator::new(
            store.clone(),
            transport,
            CheckerOptions::from(&config.checker),
        );
        let inspector = HttpPageInspector::from_config(&config.user_agent)?;

        Ok(Self::new(
            Arc::new(orchestrator),
            Arc::new(ProgressReporter::new(store)),
            Arc::new(inspector),
        ))
    }

    pub fn orchestrator(&self) -> &Arc<Orchestrator> {
        &self.orchestrator
    }

    pub fn reporter(&self) -> &Arc<ProgressReporter> {
        &self.reporter
    }

    /// Subscribes to progress and completion events
    pub fn subscribe(&self) -> Subscription {
        self.reporter.subscribe()
    }

    /// Handles one command
    ///
    /// Validation commands resolve once the run is finalized. A cancel command
    /// may be dispatched concurrently from another task while a run is active.
    pub async fn dispatch(&self, command: Command) -> Result<Response, CheckError> {
        match command {
            Command::ExtractLinks { page_url } => {
                let links = self.inspector.extract_links(&page_url).await?;
                Ok(Response::Links(links))
            }
            Command::Highlight { id } => {
                let found = self.inspector.highlight(&id).await;
                Ok(Response::Highlighted(found))
            }
            Command::StartValidation { page_url, links } => {
                // The reporter clears the previous run only once this one is admitted
                let session = self
                    .orchestrator
                    .start(&page_url, links, &*self.reporter)
                    .await?;
                self.publish_finish(&session);
                Ok(Response::Finished(session))
            }
            Command::ResumeValidation => {
                let session = self.orchestrator.resume(&*self.reporter).await?;
                if let Some(session) = &session {
                    self.publish_finish(session);
                }
                Ok(Response::Resumed(session))
            }
            Command::CancelValidation => {
                self.orchestrator.cancel();
                Ok(Response::Cancelled)
            }
            Command::GetStoredSession => {
                let stored = self.orchestrator.get_stored_session();
                Ok(Response::StoredSession(stored))
            }
            Command::ExportCsv => {
                let csv = self
                    .orchestrator
                    .get_stored_session()
                    .map(|session| to_csv(&session.page_url, &session.results, Utc::now()));
                Ok(Response::Csv(csv))
            }
        }
    }

    fn publish_finish(&self, session: &Session) {
        match session.status {
            SessionStatus::Completed => self.reporter.report_complete(&session.results),
            SessionStatus::Cancelled => self.reporter.report_cancelled(),
            SessionStatus::Checking => {}
        }
    }
}
