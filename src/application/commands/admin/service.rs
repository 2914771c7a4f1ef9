use super::stage::AdminActionStage;
use crate::application::{
    dto::{AdminActionOutcome, AdminIdentity},
    error::{ApplicationError, ApplicationResult},
    notifications::NotificationService,
    ports::{rate_limit::RouteClass, time::Clock},
    services::{
        audit_writer::{AuditLogWriter, AuditRecord},
        authorization::AuthorizationGuard,
        dispatch::{BestEffortDispatcher, BestEffortStep},
        rate_limiter::RateLimiter,
    },
};
use crate::domain::{
    audit::{AuditAction, TargetKind},
    entity::{EntityId, EntityKind, EntityStore, GovernedEntity, GovernedStatus, StatusUpdate, transition},
    notification::NotificationPayload,
};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info};

/// Transport-independent view of an incoming admin request.
#[derive(Debug, Clone)]
pub struct AdminRequest {
    /// Client address (or another caller key) used for rate limiting.
    pub caller: String,
    pub bearer: Option<String>,
}

impl AdminRequest {
    pub fn new(caller: impl Into<String>, bearer: Option<String>) -> Self {
        Self {
            caller: caller.into(),
            bearer,
        }
    }
}

/// What the best-effort follow-up of one applied action has to do.
pub(super) struct FollowUp {
    pub action: AuditAction,
    pub target_kind: TargetKind,
    pub extra_details: Map<String, Value>,
    pub notification: Option<(String, NotificationPayload)>,
}

/// Runs the admin action pipeline: rate limit, authorize, validate, apply,
/// then audit and notify off the request path.
pub struct AdminCommandService {
    pub(super) rate_limiter: Arc<RateLimiter>,
    pub(super) guard: Arc<AuthorizationGuard>,
    pub(super) entities: Arc<dyn EntityStore>,
    pub(super) audit: Arc<AuditLogWriter>,
    pub(super) notifications: Arc<NotificationService>,
    pub(super) dispatcher: BestEffortDispatcher,
    pub(super) clock: Arc<dyn Clock>,
}

impl AdminCommandService {
    pub fn new(
        rate_limiter: Arc<RateLimiter>,
        guard: Arc<AuthorizationGuard>,
        entities: Arc<dyn EntityStore>,
        audit: Arc<AuditLogWriter>,
        notifications: Arc<NotificationService>,
        dispatcher: BestEffortDispatcher,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            rate_limiter,
            guard,
            entities,
            audit,
            notifications,
            dispatcher,
            clock,
        }
    }

    /// The two cheap gates every admin operation passes first, in this order.
    pub async fn admit(&self, request: &AdminRequest) -> ApplicationResult<AdminIdentity> {
        self.rate_limiter
            .check(RouteClass::Admin, &request.caller)
            .await
            .inspect_err(log_rejection)?;

        self.guard
            .authorize(request.bearer.as_deref())
            .await
            .inspect_err(log_rejection)
    }

    /// Fail a request whose payload could not be decoded, but only after the
    /// caller has passed the gates; a throttled or anonymous caller still
    /// gets the gate's answer.
    pub async fn refuse_payload<T>(
        &self,
        request: &AdminRequest,
        err: ApplicationError,
    ) -> ApplicationResult<T> {
        self.admit(request).await?;
        log_rejection(&err);
        Err(err)
    }

    /// Load, validate and persist one status change, then hand audit and
    /// notification to the dispatcher. Only the entity write can fail the
    /// request from here on.
    pub(super) async fn apply(
        &self,
        admin: &AdminIdentity,
        kind: EntityKind,
        id: EntityId,
        requested: GovernedStatus,
        follow_up: impl FnOnce(&GovernedEntity) -> FollowUp,
    ) -> ApplicationResult<AdminActionOutcome> {
        let current = self
            .entities
            .get(kind, &id)
            .await?
            .ok_or_else(|| ApplicationError::not_found(format!("{kind} not found")))
            .inspect_err(log_rejection)?;

        let change = transition(kind, current.status, requested)
            .map_err(ApplicationError::from)
            .inspect_err(log_rejection)?;

        let update = StatusUpdate::new(id, change.next, self.clock.now(), admin.uid.clone());
        let updated = self.entities.update_status(update).await?;

        info!(
            stage = %AdminActionStage::Applied,
            admin_uid = %admin.uid,
            target_id = %updated.id,
            kind = %kind,
            previous_status = %change.previous,
            new_status = %change.next,
            "admin action applied"
        );

        let follow_up = follow_up(&current);
        let mut details = Map::new();
        details.insert("previousStatus".into(), Value::from(change.previous.as_str()));
        details.insert("newStatus".into(), Value::from(change.next.as_str()));
        if let Some(name) = current.display_name.as_deref() {
            details.insert("displayName".into(), Value::from(name));
        }
        if let Some(email) = current.email.as_deref() {
            details.insert("email".into(), Value::from(email));
        }
        details.extend(follow_up.extra_details);

        let record = AuditRecord {
            admin_uid: admin.uid.clone(),
            admin_email: admin.email.clone(),
            action: follow_up.action,
            target_id: updated.id.to_string(),
            target_kind: follow_up.target_kind,
            details,
        };
        self.dispatch_follow_up(record, follow_up.notification);

        Ok(AdminActionOutcome::new(updated, change))
    }

    fn dispatch_follow_up(
        &self,
        record: AuditRecord,
        notification: Option<(String, NotificationPayload)>,
    ) {
        let dispatcher = self.dispatcher.clone();
        let audit = Arc::clone(&self.audit);
        let notifications = Arc::clone(&self.notifications);

        self.dispatcher.spawn(async move {
            let target_id = record.target_id.clone();

            let audited = dispatcher
                .run(BestEffortStep::Audit, &target_id, audit.record(record))
                .await;
            let stage = if audited {
                AdminActionStage::AuditOk
            } else {
                AdminActionStage::AuditFailed
            };
            debug!(%stage, %target_id, "audit step finished");

            if let Some((recipient_id, payload)) = notification {
                let notified = dispatcher
                    .run(
                        BestEffortStep::Notify,
                        &target_id,
                        notifications.create(&recipient_id, payload),
                    )
                    .await;
                let stage = if notified {
                    AdminActionStage::NotifyOk
                } else {
                    AdminActionStage::NotifyFailed
                };
                debug!(%stage, %target_id, "notify step finished");
            }
        });
    }
}

fn log_rejection(err: &ApplicationError) {
    debug!(stage = %AdminActionStage::rejected_at(err), error = %err, "admin action rejected");
}
