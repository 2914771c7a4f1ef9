// src/application/services/mod.rs
pub mod audit_writer;
pub mod authorization;
pub mod dispatch;
pub mod rate_limiter;

use std::{sync::Arc, time::Duration};

use crate::{
    application::{
        commands::admin::AdminCommandService,
        notifications::{NotificationHub, NotificationService},
        ports::{rate_limit::RateLimitStore, security::IdentityVerifier, time::Clock},
        queries::audit::AuditQueryService,
    },
    domain::{
        audit::AuditLogRepository, entity::EntityStore, notification::NotificationRepository,
        user::UserDirectory,
    },
};

use self::{
    audit_writer::AuditLogWriter,
    authorization::AuthorizationGuard,
    dispatch::{BestEffortDispatcher, FailureReceiver},
    rate_limiter::{RateLimitPresets, RateLimiter},
};

/// Immutable pipeline settings, built once at start-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    pub presets: RateLimitPresets,
    pub auth_timeout: Duration,
    pub rate_limit_timeout: Duration,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            presets: RateLimitPresets::default(),
            auth_timeout: Duration::from_secs(3),
            rate_limit_timeout: Duration::from_millis(500),
        }
    }
}

pub struct ApplicationServices {
    pub admin_commands: Arc<AdminCommandService>,
    pub audit_queries: Arc<AuditQueryService>,
    pub notifications: Arc<NotificationService>,
    rate_limiter: Arc<RateLimiter>,
    guard: Arc<AuthorizationGuard>,
}

impl ApplicationServices {
    /// Wire every service. The returned receiver carries best-effort
    /// failures; hand it to `dispatch::spawn_failure_logger` (or inspect it
    /// in tests).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        entity_store: Arc<dyn EntityStore>,
        user_directory: Arc<dyn UserDirectory>,
        audit_repo: Arc<dyn AuditLogRepository>,
        notification_repo: Arc<dyn NotificationRepository>,
        identity_verifier: Arc<dyn IdentityVerifier>,
        rate_limit_store: Arc<dyn RateLimitStore>,
        clock: Arc<dyn Clock>,
        settings: PipelineSettings,
    ) -> (Self, FailureReceiver) {
        let (dispatcher, failures) = BestEffortDispatcher::new();

        let rate_limiter = Arc::new(RateLimiter::new(
            rate_limit_store,
            Arc::clone(&clock),
            settings.presets,
            settings.rate_limit_timeout,
        ));
        let guard = Arc::new(AuthorizationGuard::new(
            identity_verifier,
            Arc::clone(&user_directory),
            settings.auth_timeout,
        ));
        let audit_writer = Arc::new(AuditLogWriter::new(
            Arc::clone(&audit_repo),
            user_directory,
            Arc::clone(&clock),
        ));
        let notifications = Arc::new(NotificationService::new(
            notification_repo,
            NotificationHub::new(),
            Arc::clone(&clock),
        ));

        let admin_commands = Arc::new(AdminCommandService::new(
            Arc::clone(&rate_limiter),
            Arc::clone(&guard),
            entity_store,
            audit_writer,
            Arc::clone(&notifications),
            dispatcher,
            clock,
        ));
        let audit_queries = Arc::new(AuditQueryService::new(audit_repo));

        let services = Self {
            admin_commands,
            audit_queries,
            notifications,
            rate_limiter,
            guard,
        };
        (services, failures)
    }

    pub fn rate_limiter(&self) -> Arc<RateLimiter> {
        Arc::clone(&self.rate_limiter)
    }

    pub fn authorization_guard(&self) -> Arc<AuthorizationGuard> {
        Arc::clone(&self.guard)
    }
}
