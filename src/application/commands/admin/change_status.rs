use super::service::{AdminCommandService, AdminRequest, FollowUp};
use crate::application::{dto::AdminActionOutcome, error::ApplicationResult};
use crate::domain::{
    audit::{AuditAction, TargetKind},
    entity::{AccountStatus, EntityId, EntityKind, GovernedStatus},
    notification::NotificationPayload,
};
use serde_json::Map;

pub struct ChangeUserStatusCommand {
    pub user_id: String,
    /// Raw requested status, matched exactly; anything outside the four
    /// account statuses is rejected before the account is read.
    pub status: String,
}

impl AdminCommandService {
    pub async fn change_user_status(
        &self,
        request: &AdminRequest,
        command: ChangeUserStatusCommand,
    ) -> ApplicationResult<AdminActionOutcome> {
        let admin = self.admit(request).await?;
        let requested: AccountStatus = command.status.parse()?;
        let id = EntityId::new(command.user_id)?;

        self.apply(
            &admin,
            EntityKind::User,
            id,
            GovernedStatus::Account(requested),
            |account| FollowUp {
                action: AuditAction::UpdateUserStatus,
                target_kind: TargetKind::User,
                extra_details: Map::new(),
                notification: NotificationPayload::account_status_changed(
                    account.status,
                    GovernedStatus::Account(requested),
                )
                .map(|payload| (account.id.to_string(), payload)),
            },
        )
        .await
    }
}
