use super::service::{AdminCommandService, AdminRequest, FollowUp};
use crate::application::{dto::AdminActionOutcome, error::ApplicationResult};
use crate::domain::{
    audit::{AuditAction, TargetKind},
    entity::{EntityId, EntityKind, GovernedStatus, ProfessionalStatus},
    notification::NotificationPayload,
};
use serde_json::{Map, Value};

pub struct RejectProfessionalCommand {
    pub professional_id: String,
    pub reason: Option<String>,
}

impl AdminCommandService {
    pub async fn reject_professional(
        &self,
        request: &AdminRequest,
        command: RejectProfessionalCommand,
    ) -> ApplicationResult<AdminActionOutcome> {
        let admin = self.admit(request).await?;
        let id = EntityId::new(command.professional_id)?;
        let reason = command
            .reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());

        self.apply(
            &admin,
            EntityKind::Professional,
            id,
            GovernedStatus::Professional(ProfessionalStatus::Rejected),
            |professional| {
                let mut extra_details = Map::new();
                if let Some(reason) = reason.as_deref() {
                    extra_details.insert("reason".into(), Value::from(reason));
                }
                FollowUp {
                    action: AuditAction::RejectProfessional,
                    target_kind: TargetKind::Professional,
                    extra_details,
                    notification: Some((
                        professional.id.to_string(),
                        NotificationPayload::ProfessionalRejected { reason },
                    )),
                }
            },
        )
        .await
    }
}
