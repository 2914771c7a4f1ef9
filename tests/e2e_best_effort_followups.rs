use axum::http::{Method, StatusCode};
use marketplace_admin::application::services::dispatch::BestEffortStep;
use marketplace_admin::domain::entity::{
    EntityId, EntityKind, EntityStore, GovernedStatus, ProfessionalStatus,
};
use marketplace_admin::domain::notification::NotificationRepository;
use std::sync::Arc;
use std::time::Duration;

mod support;

use support::{
    ADMIN_TOKEN, FailingAuditRepo, FailingNotificationRepo, PENDING_PRO, TestAppBuilder,
};

async fn next_failure(
    failures: &mut marketplace_admin::application::services::dispatch::FailureReceiver,
) -> marketplace_admin::application::services::dispatch::BestEffortFailure {
    tokio::time::timeout(Duration::from_secs(1), failures.recv())
        .await
        .expect("failure reported in time")
        .expect("failure channel open")
}

/// 監査ストアが落ちていても管理操作は成功し、失敗は専用チャネルに報告されることを確認する
#[tokio::test]
async fn e2e_audit_outage_does_not_fail_the_action() {
    let mut app = TestAppBuilder::new()
        .audit_repo(Arc::new(FailingAuditRepo))
        .build();

    let resp = support::send(
        &app,
        support::request(
            Method::POST,
            &format!("/api/v1/admin/professionals/{PENDING_PRO}/approve"),
            Some(ADMIN_TOKEN),
            None,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = support::read_json(resp).await;
    assert_eq!(body["data"]["entity"]["status"], "approved");

    let failure = next_failure(&mut app.failures).await;
    assert_eq!(failure.step, BestEffortStep::Audit);
    assert_eq!(failure.target_id, PENDING_PRO);

    let stored = app
        .entities
        .get(
            EntityKind::Professional,
            &EntityId::new(PENDING_PRO).unwrap(),
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        stored.status,
        GovernedStatus::Professional(ProfessionalStatus::Approved)
    );

    // the notification step still runs after the failed audit step
    assert!(
        support::eventually(|| async {
            app.notifications
                .list_for_recipient(PENDING_PRO)
                .await
                .unwrap()
                .len()
                == 1
        })
        .await
    );
}

/// 通知ストアが落ちていても管理操作は成功し、監査ログは残ることを確認する
#[tokio::test]
async fn e2e_notification_outage_does_not_fail_the_action() {
    let mut app = TestAppBuilder::new()
        .notification_repo(Arc::new(FailingNotificationRepo))
        .build();

    let resp = support::send(
        &app,
        support::request(
            Method::POST,
            &format!("/api/v1/admin/professionals/{PENDING_PRO}/reject"),
            Some(ADMIN_TOKEN),
            None,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let failure = next_failure(&mut app.failures).await;
    assert_eq!(failure.step, BestEffortStep::Notify);

    assert_eq!(app.audit.snapshot().len(), 1);
    assert!(app.failures.try_recv().is_err());
}

/// 監査ログ一覧は管理者のみ取得でき、新しい順で件数指定に従うことを確認する
#[tokio::test]
async fn e2e_audit_log_listing_is_newest_first() {
    let app = support::make_test_app();

    for (written, (uri, body)) in [
        (
            format!("/api/v1/admin/professionals/{PENDING_PRO}/approve"),
            None,
        ),
        (
            format!("/api/v1/admin/users/{}/status", support::ACTIVE_USER),
            Some(serde_json::json!({ "status": "inactive" })),
        ),
    ]
    .into_iter()
    .enumerate()
    {
        let resp = support::send(
            &app,
            support::request(Method::POST, &uri, Some(ADMIN_TOKEN), body),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        // keep the audit order deterministic
        assert!(support::eventually(|| async { app.audit.snapshot().len() == written + 1 }).await);
    }

    let resp = support::send(
        &app,
        support::request(
            Method::GET,
            "/api/v1/admin/audit-logs",
            Some(ADMIN_TOKEN),
            None,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = support::read_json(resp).await;
    let entries = body["data"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["action"], "update_user_status");
    assert_eq!(entries[0]["targetType"], "user");
    assert_eq!(entries[1]["action"], "approve_professional");
    assert_eq!(entries[1]["adminEmail"], support::ADMIN_EMAIL);

    let resp = support::send(
        &app,
        support::request(
            Method::GET,
            "/api/v1/admin/audit-logs?limit=1",
            Some(ADMIN_TOKEN),
            None,
        ),
    )
    .await;
    let body = support::read_json(resp).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let resp = support::send(
        &app,
        support::request(
            Method::GET,
            "/api/v1/admin/audit-logs",
            Some(support::CLIENT_TOKEN),
            None,
        ),
    )
    .await;
    support::assert_error_response(resp, StatusCode::UNAUTHORIZED, "unauthorized").await;
}
