use super::service::{AdminCommandService, AdminRequest, FollowUp};
use crate::application::{dto::AdminActionOutcome, error::ApplicationResult};
use crate::domain::{
    audit::{AuditAction, TargetKind},
    entity::{EntityId, EntityKind, GovernedStatus, ProfessionalStatus},
    notification::NotificationPayload,
};
use serde_json::Map;

pub struct ApproveProfessionalCommand {
    pub professional_id: String,
}

impl AdminCommandService {
    pub async fn approve_professional(
        &self,
        request: &AdminRequest,
        command: ApproveProfessionalCommand,
    ) -> ApplicationResult<AdminActionOutcome> {
        let admin = self.admit(request).await?;
        let id = EntityId::new(command.professional_id)?;

        self.apply(
            &admin,
            EntityKind::Professional,
            id,
            GovernedStatus::Professional(ProfessionalStatus::Approved),
            |professional| FollowUp {
                action: AuditAction::ApproveProfessional,
                target_kind: TargetKind::Professional,
                extra_details: Map::new(),
                notification: Some((
                    professional.id.to_string(),
                    NotificationPayload::ProfessionalApproved,
                )),
            },
        )
        .await
    }
}
