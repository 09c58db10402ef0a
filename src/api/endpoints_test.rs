use std::sync::Arc;

use super::*;
use crate::session::storage::{AUTH_TOKEN_KEY, SessionStorage};
use crate::session::{AuthInterceptor, SessionProvider};
use crate::test_helpers::{spawn_fake_backend, test_client, test_session};

#[test]
fn path_helpers_match_backend_routes() {
    let id = EntityId::from(42);
    assert_eq!(users_by_role_path(Role::Technician), "/user/role/technician");
    assert_eq!(asset_update_path(&id), "/asset/update/42");
    assert_eq!(asset_delete_path(&id), "/asset/delete/42");
    assert_eq!(workorders_for_user_path(&EntityId::from("U7")), "/workorder/user/U7");
    assert_eq!(workorder_update_path(&id), "/workorder/update/42");
    assert_eq!(workorder_status_path(&id), "/workorder/updateStatus/42");
}

#[tokio::test]
async fn password_login_establishes_session() {
    let (base_url, _) = spawn_fake_backend().await;
    let client = test_client(&base_url);
    let (session, storage, _) = test_session();

    let user = login_with_password(&client, &session, "tess@utility.test", "secret").await.unwrap();

    assert_eq!(user.role, Role::Technician);
    assert_eq!(user.profile.skill.as_deref(), Some("HVAC"));
    assert_eq!(session.user(), Some(user));
    assert_eq!(session.authorization_header().as_deref(), Some("Bearer tok-123"));
    assert_eq!(storage.get(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("tok-123"));
}

#[tokio::test]
async fn rejected_password_leaves_session_untouched() {
    let (base_url, _) = spawn_fake_backend().await;
    let client = test_client(&base_url);
    let (session, storage, _) = test_session();

    let err = login_with_password(&client, &session, "tess@utility.test", "wrong").await.unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized { .. }));
    assert!(!session.is_authenticated());
    assert!(storage.is_empty());
}

#[tokio::test]
async fn google_login_establishes_session() {
    let (base_url, _) = spawn_fake_backend().await;
    let client = test_client(&base_url);
    let (session, _, _) = test_session();

    let user = login_with_google(&client, &session, "google-cred").await.unwrap();

    assert_eq!(user.role, Role::Supervisor);
    assert_eq!(user.id, Some(EntityId::Text("sup-1".into())));
    assert_eq!(session.token().as_deref(), Some("g-tok"));
}

#[tokio::test]
async fn data_calls_carry_the_session_token() {
    let (base_url, seen) = spawn_fake_backend().await;
    let client = test_client(&base_url);
    let (session, _, _) = test_session();
    let _provider = SessionProvider::mount(session.clone(), &client);
    login_with_password(&client, &session, "tess@utility.test", "secret").await.unwrap();

    let assets = list_assets(&client).await.unwrap();
    let orders = list_work_orders(&client).await.unwrap();
    let plans = list_maintenance_plans(&client).await.unwrap();
    let technicians = users_by_role(&client, Role::Technician).await.unwrap();

    assert_eq!(assets.len(), 2);
    assert_eq!(assets[1].id, Some(EntityId::Text("2".into())));
    assert_eq!(orders.len(), 3);
    assert_eq!(plans[0].frequency, Some(crate::api::Frequency::Days(30)));
    assert!(plans[0].extra.contains_key("technician"));
    assert_eq!(technicians[0].profile.phno.as_deref(), Some("5550100"));
    assert!(seen.all().iter().all(|h| h.as_deref() == Some("Bearer tok-123")));
    assert_eq!(seen.all().len(), 4);
}

#[tokio::test]
async fn writes_round_trip_through_the_backend() {
    let (base_url, _) = spawn_fake_backend().await;
    let client = test_client(&base_url);

    let created = create_asset(
        &client,
        &NewAsset {
            name: "Gen".into(),
            asset_type: "Generator".into(),
            site_code: "S-9".into(),
            description: "Backup".into(),
            count: 1,
            reg_date: "2024-01-02".into(),
        },
    )
    .await
    .unwrap();
    assert_eq!(created.id, Some(EntityId::Number(99)));
    assert_eq!(created.asset_type, "Generator");

    let updated = update_work_order_status(&client, &EntityId::from(1), "Pending").await.unwrap();
    assert_eq!(updated.status.as_deref(), Some("Pending"));

    delete_asset(&client, &EntityId::from(4)).await.unwrap();

    let report = TaskReport {
        description: "Seal replaced".into(),
        est_hours: Some("2".into()),
        technician_id: EntityId::from(11),
        work_id: EntityId::from(1),
        completed_date: "2024-04-02".into(),
    };
    submit_task_report(&client, &report).await.unwrap();
}

#[tokio::test]
async fn interceptor_without_provider_also_authorizes() {
    let (base_url, seen) = spawn_fake_backend().await;
    let client = test_client(&base_url);
    let (session, _, _) = test_session();
    let _handle = client.register_interceptor(Arc::new(AuthInterceptor::new(session.clone())));
    session.login(UserRecord::local("Demo", "demo@x", Role::Admin), Some("manual".into())).unwrap();

    list_assets(&client).await.unwrap();

    assert_eq!(seen.last().as_deref(), Some("Bearer manual"));
}
