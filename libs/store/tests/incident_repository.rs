use warroom_domain::incident::{Severity, Status};
use warroom_domain::principal::Role;
use warroom_domain::update::{AssignmentAction, UpdateContent};
use warroom_store::{IncidentRepository, StoreClient, UserRepository};

async fn repository() -> IncidentRepository {
    let client = StoreClient::connect(":memory:", None).await.expect("in-memory store should connect");
    IncidentRepository::new(client)
}

#[tokio::test]
async fn create_and_get_round_trip() {
    let repository = repository().await;
    let created_by = uuid::Uuid::new_v4();

    let incident = repository
        .create("Payments API returning 500s", Some("Spike started at 14:02 UTC"), Severity::Critical, created_by, created_by)
        .await
        .unwrap();

    assert_eq!(incident.status, Status::Investigating);
    assert!(incident.resolved_at.is_none());

    let fetched = repository.get(incident.id).await.unwrap();
    assert_eq!(fetched.title, incident.title);
}

#[tokio::test]
async fn resolved_at_is_stamped_once_and_survives_a_reopen() {
    let repository = repository().await;
    let author = uuid::Uuid::new_v4();
    let incident = repository.create("Disk nearly full", None, Severity::High, author, author).await.unwrap();

    let (resolved, update) = repository.update_status(incident.id, author, Status::Resolved).await.unwrap();
    let first_resolved_at = resolved.resolved_at.expect("resolved_at should be set on resolution");
    assert!(matches!(update.content, UpdateContent::StatusChange { new_status: Status::Resolved, .. }));

    let (reopened, _) = repository.update_status(incident.id, author, Status::Investigating).await.unwrap();
    assert_eq!(
        reopened.resolved_at,
        Some(first_resolved_at),
        "resolved_at must stay pinned to the first resolution, not clear on reopen"
    );

    let (resolved_again, _) = repository.update_status(incident.id, author, Status::Resolved).await.unwrap();
    assert_eq!(
        resolved_again.resolved_at,
        Some(first_resolved_at),
        "a later resolution must not overwrite the original timestamp"
    );
}

#[tokio::test]
async fn assign_then_unassign_round_trips_the_assignee_list() {
    let repository = repository().await;
    let author = uuid::Uuid::new_v4();
    let target = uuid::Uuid::new_v4();
    let incident = repository.create("Elevated error rate", None, Severity::Medium, author, author).await.unwrap();

    let (assigned, update) = repository.assign(incident.id, author, target).await.unwrap();
    assert!(assigned.has_assignee(target));
    assert!(matches!(update.content, UpdateContent::Assignment { action: AssignmentAction::Assigned, .. }));

    let (unassigned, _) = repository.unassign(incident.id, author, target).await.unwrap();
    assert!(!unassigned.has_assignee(target));
}

#[tokio::test]
async fn action_items_can_be_added_and_toggled() {
    let repository = repository().await;
    let author = uuid::Uuid::new_v4();
    let incident = repository.create("Queue backing up", None, Severity::Medium, author, author).await.unwrap();

    let (_, added) = repository.add_action_item(incident.id, author, "Scale consumers to 8 replicas").await.unwrap();
    let UpdateContent::ActionItem { completed, .. } = added.content else {
        panic!("expected an action item update");
    };
    assert!(!completed);

    let (_, toggled) = repository.toggle_action_item(incident.id, added.id, true).await.unwrap();
    let UpdateContent::ActionItem { completed, .. } = toggled.content else {
        panic!("expected an action item update");
    };
    assert!(completed);
}

#[tokio::test]
async fn create_seeds_a_status_change_audit_record() {
    let repository = repository().await;
    let author = uuid::Uuid::new_v4();
    let incident = repository.create("New fire drill", None, Severity::Low, author, author).await.unwrap();

    let updates = repository.list_updates(incident.id).await.unwrap();
    assert_eq!(updates.len(), 1);
    assert!(matches!(
        &updates[0].content,
        UpdateContent::StatusChange { previous_status: None, new_status: Status::Investigating }
    ));
}

#[tokio::test]
async fn notes_are_appended_to_the_update_log() {
    let repository = repository().await;
    let author = uuid::Uuid::new_v4();
    let incident = repository.create("Latency regression", None, Severity::Low, author, author).await.unwrap();

    repository.add_note(incident.id, author, "Rolled back deploy abc123").await.unwrap();
    let updates = repository.list_updates(incident.id).await.unwrap();

    assert_eq!(updates.len(), 2, "the seed status-change record plus the new note");
    assert!(matches!(&updates[0].content, UpdateContent::StatusChange { previous_status: None, .. }));
    assert!(matches!(&updates[1].content, UpdateContent::Note { text } if text == "Rolled back deploy abc123"));
}

#[tokio::test]
async fn user_repository_rejects_duplicate_emails() {
    let client = StoreClient::connect(":memory:", None).await.unwrap();
    let users = UserRepository::new(client);

    users.create("Responder One", "oncall@example.com", "hash-a", Role::Responder).await.unwrap();
    let duplicate = users.create("Responder Two", "oncall@example.com", "hash-b", Role::Responder).await;

    assert!(duplicate.is_err());
}
