// tests/support/builders.rs
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use marketplace_admin::application::{
    ports::{
        rate_limit::{RateLimitPreset, RateLimitStore},
        security::IdentityVerifier,
    },
    services::{
        ApplicationServices, PipelineSettings, dispatch::FailureReceiver,
        rate_limiter::RateLimitPresets,
    },
};
use marketplace_admin::domain::{
    audit::AuditLogRepository,
    entity::{AccountStatus, EntityStore, ProfessionalStatus},
    notification::NotificationRepository,
    user::{DirectoryEntry, Role, UserDirectory},
};
use marketplace_admin::infrastructure::{
    rate_limit::InMemoryRateLimitStore,
    repositories::{
        InMemoryAuditLogRepository, InMemoryEntityStore, InMemoryNotificationRepository,
        InMemoryUserDirectory,
    },
};
use marketplace_admin::presentation::http::{
    routes::build_router_with_rate_limiter, state::HttpState,
};

use super::mocks::{
    ADMIN_EMAIL, ADMIN_UID, CLIENT_UID, CountingEntityStore, DummyIdentityVerifier, FixedClock,
};

pub const PENDING_PRO: &str = "pro-pending";
pub const APPROVED_PRO: &str = "pro-approved";
pub const REJECTED_PRO: &str = "pro-rejected";
pub const ACTIVE_USER: &str = CLIENT_UID;

/// Fully wired application over in-memory stores, seeded with one admin, one
/// client account and a professional in each status.
pub struct TestApp {
    pub router: Router,
    pub services: Arc<ApplicationServices>,
    pub entities: Arc<InMemoryEntityStore>,
    pub entity_store: Arc<CountingEntityStore>,
    pub directory: Arc<InMemoryUserDirectory>,
    pub audit: Arc<InMemoryAuditLogRepository>,
    pub notifications: Arc<InMemoryNotificationRepository>,
    pub failures: FailureReceiver,
}

pub struct TestAppBuilder {
    admin_limit: u32,
    api_limit: u32,
    auth_timeout: Duration,
    verifier: Arc<dyn IdentityVerifier>,
    rate_limit_store: Arc<dyn RateLimitStore>,
    audit_repo: Option<Arc<dyn AuditLogRepository>>,
    notification_repo: Option<Arc<dyn NotificationRepository>>,
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            admin_limit: 100,
            api_limit: 100,
            auth_timeout: Duration::from_secs(1),
            verifier: Arc::new(DummyIdentityVerifier),
            rate_limit_store: Arc::new(InMemoryRateLimitStore::new()),
            audit_repo: None,
            notification_repo: None,
        }
    }

    pub fn admin_limit(mut self, max_requests: u32) -> Self {
        self.admin_limit = max_requests;
        self
    }

    pub fn api_limit(mut self, max_requests: u32) -> Self {
        self.api_limit = max_requests;
        self
    }

    pub fn auth_timeout(mut self, timeout: Duration) -> Self {
        self.auth_timeout = timeout;
        self
    }

    pub fn verifier(mut self, verifier: Arc<dyn IdentityVerifier>) -> Self {
        self.verifier = verifier;
        self
    }

    pub fn rate_limit_store(mut self, store: Arc<dyn RateLimitStore>) -> Self {
        self.rate_limit_store = store;
        self
    }

    pub fn audit_repo(mut self, repo: Arc<dyn AuditLogRepository>) -> Self {
        self.audit_repo = Some(repo);
        self
    }

    pub fn notification_repo(mut self, repo: Arc<dyn NotificationRepository>) -> Self {
        self.notification_repo = Some(repo);
        self
    }

    pub fn build(self) -> TestApp {
        let entities = Arc::new(InMemoryEntityStore::new());
        seed_entities(&entities);
        let entity_store = Arc::new(CountingEntityStore::new(Arc::clone(&entities)));

        let directory = Arc::new(InMemoryUserDirectory::new());
        seed_directory(&directory);

        let audit = Arc::new(InMemoryAuditLogRepository::new());
        let notifications = Arc::new(InMemoryNotificationRepository::new());

        let audit_repo: Arc<dyn AuditLogRepository> = self
            .audit_repo
            .unwrap_or_else(|| Arc::clone(&audit) as Arc<dyn AuditLogRepository>);
        let notification_repo: Arc<dyn NotificationRepository> = self
            .notification_repo
            .unwrap_or_else(|| Arc::clone(&notifications) as Arc<dyn NotificationRepository>);

        let settings = PipelineSettings {
            presets: RateLimitPresets {
                admin: RateLimitPreset::new(self.admin_limit, 60),
                api: RateLimitPreset::new(self.api_limit, 60),
                ..RateLimitPresets::default()
            },
            auth_timeout: self.auth_timeout,
            rate_limit_timeout: Duration::from_secs(1),
        };

        let (services, failures) = ApplicationServices::new(
            Arc::clone(&entity_store) as Arc<dyn EntityStore>,
            Arc::clone(&directory) as Arc<dyn UserDirectory>,
            audit_repo,
            notification_repo,
            self.verifier,
            self.rate_limit_store,
            Arc::new(FixedClock),
            settings,
        );
        let services = Arc::new(services);

        let state = HttpState {
            services: Arc::clone(&services),
        };
        let router = build_router_with_rate_limiter(state, false);

        TestApp {
            router,
            services,
            entities,
            entity_store,
            directory,
            audit,
            notifications,
            failures,
        }
    }
}

fn seed_entities(entities: &InMemoryEntityStore) {
    for (id, status) in [
        (PENDING_PRO, ProfessionalStatus::Pending),
        (APPROVED_PRO, ProfessionalStatus::Approved),
        (REJECTED_PRO, ProfessionalStatus::Rejected),
    ] {
        entities
            .seed_professional(id, status, "Dana Pro", &format!("{id}@example.com"))
            .expect("seed professional");
    }
    entities
        .seed_user(ACTIVE_USER, AccountStatus::Active, "Casey Client", "client@example.com")
        .expect("seed user");
}

fn seed_directory(directory: &InMemoryUserDirectory) {
    directory
        .upsert(DirectoryEntry {
            uid: ADMIN_UID.into(),
            role: Role::Admin,
            email: Some(ADMIN_EMAIL.into()),
            display_name: Some("Ada Admin".into()),
        })
        .expect("seed admin");
    directory
        .upsert(DirectoryEntry {
            uid: CLIENT_UID.into(),
            role: Role::Client,
            email: Some("client@example.com".into()),
            display_name: Some("Casey Client".into()),
        })
        .expect("seed client");
}
