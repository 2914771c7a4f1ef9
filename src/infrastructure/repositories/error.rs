use crate::domain::errors::DomainError;

const CNT_AUDIT_CALL: &str = "audit_logs_call_key";
const CNT_NOTIFICATION_PK: &str = "notifications_pkey";
const CNT_USER_STATUS: &str = "users_status_chk";
const CNT_PROFESSIONAL_STATUS: &str = "professionals_status_chk";

pub fn map_sqlx(err: sqlx::Error) -> DomainError {
    match &err {
        sqlx::Error::Database(db_err) => {
            if let Some(constraint) = db_err.constraint() {
                return match constraint {
                    CNT_AUDIT_CALL => {
                        DomainError::Conflict("audit entry already recorded".into())
                    }
                    CNT_NOTIFICATION_PK => {
                        DomainError::Conflict("notification id already exists".into())
                    }
                    CNT_USER_STATUS | CNT_PROFESSIONAL_STATUS => {
                        DomainError::InvalidTransition("status rejected by the store".into())
                    }
                    other => {
                        DomainError::Persistence(format!("database constraint violation: {other}"))
                    }
                };
            }

            if let Some(code) = db_err.code() {
                match code.as_ref() {
                    "23505" => {
                        return DomainError::Conflict("unique constraint violated".into());
                    }
                    "23503" => {
                        return DomainError::NotFound("referenced record not found".into());
                    }
                    "23514" => {
                        return DomainError::Validation("check constraint violated".into());
                    }
                    _ => {}
                }
            }

            DomainError::Persistence(db_err.message().to_string())
        }
        _ => DomainError::Persistence(err.to_string()),
    }
}
