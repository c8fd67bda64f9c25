//! High-level booking service facade.
//!
//! [`BookingService`] wires the storage adapter, seed loader, repository,
//! query engine, transfer, session, and user-admin components over one shared
//! backend and is the recommended entry point. It is cheap to clone; clones
//! share the same storage.
//!
//! Role enforcement lives here: booking and slot listing are public, status
//! transitions require a staff or admin session, and data administration
//! (export, import, clear, accounts) requires admin.

use crate::backend::StorageBackend;
use crate::error::Result;
use crate::model::{
    Appointment, BookingRequest, Role, Service, Session, Status, User,
};
use crate::query::{AppointmentFilter, QueryEngine};
use crate::repository::AppointmentRepository;
use crate::seed::{default_services, ReferenceSource, SeedLoader};
use crate::session::SessionStore;
use crate::store::{Store, KEY_SERVICES};
use crate::transfer::{DataTransfer, ExportFile, ImportSummary};
use crate::users::UserAdmin;

/// One facade over every booking operation.
///
/// # Example
/// ```no_run
/// use booking_kit::{BookingService, BookingRequest, InMemoryBackend};
/// use booking_kit::seed::BuiltinDefaults;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let service = BookingService::new(InMemoryBackend::new());
///     service.init(&BuiltinDefaults).await?;
///
///     let appointment = service
///         .book(&BookingRequest {
///             name: "Jane Doe".into(),
///             email: "jane@example.com".into(),
///             id_number: "AB12345".into(),
///             phone: "0771234567".into(),
///             service_id: "SVC-001".into(),
///             date: "2026-09-01".into(),
///             time: "09:00 AM".into(),
///         })
///         .await?;
///     println!("Booked {}", appointment.number);
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct BookingService<B: StorageBackend> {
    store: Store<B>,
    seed: SeedLoader<B>,
    repository: AppointmentRepository<B>,
    query: QueryEngine<B>,
    transfer: DataTransfer<B>,
    sessions: SessionStore<B>,
    users: UserAdmin<B>,
}

impl<B: StorageBackend> BookingService<B> {
    /// Build a service over the given backend.
    pub fn new(backend: B) -> Self {
        let store = Store::new(backend);
        BookingService {
            seed: SeedLoader::new(store.clone()),
            repository: AppointmentRepository::new(store.clone()),
            query: QueryEngine::new(store.clone()),
            transfer: DataTransfer::new(store.clone()),
            sessions: SessionStore::new(store.clone()),
            users: UserAdmin::new(store.clone()),
            store,
        }
    }

    /// Seed reference data from `source`, once per storage lifetime.
    ///
    /// Returns `true` when this call performed the seed.
    ///
    /// # Errors
    /// Returns `Err` only if the seeded data cannot be written
    pub async fn init<S: ReferenceSource>(&self, source: &S) -> Result<bool> {
        self.seed.seed_once(source).await
    }

    // ========================================================================
    // Public (requester-facing) operations
    // ========================================================================

    /// The bookable service list.
    pub async fn services(&self) -> Vec<Service> {
        self.store.get_or(KEY_SERVICES, default_services()).await
    }

    /// Book an appointment. No session required.
    ///
    /// # Errors
    /// See [`AppointmentRepository::create`]
    pub async fn book(&self, input: &BookingRequest) -> Result<Appointment> {
        self.repository.create(input).await
    }

    /// Look up an appointment by its `APT-...` number. No session required.
    pub async fn find_by_number(&self, number: &str) -> Option<Appointment> {
        self.repository.find_by_number(number).await
    }

    // ========================================================================
    // Staff operations
    // ========================================================================

    /// List appointments matching `filter`, sorted chronologically.
    ///
    /// # Errors
    /// Returns `Error::Unauthorized` when the session is not staff or admin
    pub async fn list(
        &self,
        session: &Session,
        filter: &AppointmentFilter,
    ) -> Result<Vec<Appointment>> {
        session.require_staff()?;
        Ok(self.query.list(filter).await)
    }

    /// Move a PENDING appointment to COMPLETED or CANCELLED.
    ///
    /// # Errors
    /// `Error::Unauthorized` for non-staff sessions, otherwise see
    /// [`AppointmentRepository::transition`]
    pub async fn transition(
        &self,
        session: &Session,
        id: &str,
        status: Status,
    ) -> Result<Appointment> {
        session.require_staff()?;
        self.repository.transition(id, status).await
    }

    // ========================================================================
    // Admin operations
    // ========================================================================

    /// Export all COMPLETED appointments.
    ///
    /// # Errors
    /// Returns `Error::Unauthorized` when the session is not an admin
    pub async fn export_completed(&self, session: &Session) -> Result<Option<ExportFile>> {
        session.require_admin()?;
        self.transfer.export_completed().await
    }

    /// Merge an exported payload into the collection.
    ///
    /// # Errors
    /// `Error::Unauthorized` for non-admin sessions, otherwise see
    /// [`DataTransfer::import_merge`]
    pub async fn import_merge(&self, session: &Session, payload: &str) -> Result<ImportSummary> {
        session.require_admin()?;
        self.transfer.import_merge(payload).await
    }

    /// Empty the appointment collection. Numbering counters survive.
    ///
    /// # Errors
    /// Returns `Error::Unauthorized` when the session is not an admin
    pub async fn clear_all(&self, session: &Session) -> Result<()> {
        session.require_admin()?;
        self.repository.clear_all().await
    }

    /// List accounts (admin only).
    ///
    /// # Errors
    /// Returns `Error::Unauthorized` when the session is not an admin
    pub async fn list_users(&self, session: &Session) -> Result<Vec<User>> {
        self.users.list(session).await
    }

    /// Add an account (admin only).
    ///
    /// # Errors
    /// See [`UserAdmin::add_user`]
    pub async fn add_user(
        &self,
        session: &Session,
        username: &str,
        password: &str,
        display_name: &str,
        role: Role,
    ) -> Result<User> {
        self.users
            .add_user(session, username, password, display_name, role)
            .await
    }

    /// Remove an account (admin only).
    ///
    /// # Errors
    /// See [`UserAdmin::delete_user`]
    pub async fn delete_user(&self, session: &Session, username: &str) -> Result<()> {
        self.users.delete_user(session, username).await
    }

    // ========================================================================
    // Sessions
    // ========================================================================

    /// Authenticate and open a session.
    ///
    /// # Errors
    /// Returns `Error::Unauthorized` when no user matches the credentials
    pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
        self.sessions.login(username, password).await
    }

    /// The active session, if any.
    pub async fn current_session(&self) -> Option<Session> {
        self.sessions.current().await
    }

    /// Drop the active session.
    ///
    /// # Errors
    /// Returns `Err` if the backend cannot be written
    pub async fn logout(&self) -> Result<()> {
        self.sessions.logout().await
    }

    // ========================================================================
    // Component access
    // ========================================================================

    /// Direct access to the query engine, for read paths that need counts.
    pub fn query(&self) -> &QueryEngine<B> {
        &self.query
    }

    /// Direct access to the repository.
    pub fn repository(&self) -> &AppointmentRepository<B> {
        &self.repository
    }

    /// Direct access to the typed store.
    pub fn store(&self) -> &Store<B> {
        &self.store
    }
}
