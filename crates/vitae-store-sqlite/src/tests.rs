//! Integration tests for `SqliteStore` against an in-memory database.

use vitae_core::{
  EntityKind, Error as CoreError, OwnerId, RecordFields, RecordId,
  activity::Post,
  auth::User,
  blob::Blob,
  profile::ProfileUpdate,
  reorder::ReorderCoordinator,
  repository::Repository,
  store::PortfolioStore,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn alice() -> OwnerId { OwnerId::from("alice") }

fn bob() -> OwnerId { OwnerId::from("bob") }

fn project(name: &str, start: &str) -> RecordFields {
  RecordFields::new().with("name", name).with("start_date", start)
}

async fn ids_of(s: &SqliteStore, owner: &OwnerId, kind: EntityKind) -> Vec<RecordId> {
  Repository::new(s)
    .list(owner, kind)
    .await
    .unwrap()
    .into_iter()
    .map(|r| r.id)
    .collect()
}

// ─── Schema ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn record_tables_match_kind_descriptors() {
  use strum::IntoEnumIterator as _;

  let s = store().await;
  for kind in EntityKind::iter() {
    let columns = s.table_columns(kind.table()).await.unwrap();
    for column in kind.schema().columns() {
      assert!(columns.iter().any(|c| c == column), "{kind}: missing {column}");
    }
    assert_eq!(
      columns.iter().any(|c| c == "display_order"),
      kind.is_ordered(),
      "{kind}: display_order presence"
    );
  }
}

// ─── Records ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_is_empty_for_new_owner() {
  let s = store().await;
  let list = Repository::new(&s).list(&alice(), EntityKind::Experiences).await.unwrap();
  assert!(list.is_empty());
}

#[tokio::test]
async fn create_then_list_returns_every_record() {
  let s = store().await;
  let repo = Repository::new(&s);
  for i in 0..4 {
    repo
      .create(&alice(), EntityKind::Certifications, RecordFields::new().with("name", format!("c{i}")))
      .await
      .unwrap();
  }
  let list = repo.list(&alice(), EntityKind::Certifications).await.unwrap();
  assert_eq!(list.len(), 4);
  let orders: Vec<_> = list.iter().map(|r| r.display_order).collect();
  assert_eq!(orders, vec![Some(1), Some(2), Some(3), Some(4)]);
}

#[tokio::test]
async fn create_continues_from_previous_max() {
  let s = store().await;
  let repo = Repository::new(&s);
  let a = repo.create(&alice(), EntityKind::Projects, project("a", "2020")).await.unwrap();
  let b = repo.create(&alice(), EntityKind::Projects, project("b", "2021")).await.unwrap();

  ReorderCoordinator::new(&s)
    .reorder(&alice(), "projects", vec![b.clone(), a.clone()])
    .await
    .unwrap();
  // orders are now b=0, a=1
  let c = repo.create(&alice(), EntityKind::Projects, project("c", "2022")).await.unwrap();

  let list = repo.list(&alice(), EntityKind::Projects).await.unwrap();
  let last = list.last().unwrap();
  assert_eq!(last.id, c);
  assert_eq!(last.display_order, Some(2));
}

#[tokio::test]
async fn ties_are_broken_by_date_descending() {
  let s = store().await;
  let repo = Repository::new(&s);
  let old = repo.create(&alice(), EntityKind::Projects, project("old", "2015-01")).await.unwrap();
  let new = repo.create(&alice(), EntityKind::Projects, project("new", "2023-06")).await.unwrap();

  ReorderCoordinator::new(&s)
    .reorder(&alice(), "projects", vec![old.clone()])
    .await
    .unwrap();
  ReorderCoordinator::new(&s)
    .reorder(&alice(), "projects", vec![new.clone()])
    .await
    .unwrap();

  // both now have display_order 0
  assert_eq!(ids_of(&s, &alice(), EntityKind::Projects).await, vec![new, old]);
}

#[tokio::test]
async fn skills_are_listed_by_name() {
  let s = store().await;
  let repo = Repository::new(&s);
  for name in ["Rust", "Go", "SQL"] {
    repo
      .create(&alice(), EntityKind::Skills, RecordFields::new().with("name", name))
      .await
      .unwrap();
  }
  let list = repo.list(&alice(), EntityKind::Skills).await.unwrap();
  let names: Vec<_> = list.iter().map(|r| r.title(EntityKind::Skills)).collect();
  assert_eq!(names, vec!["Go", "Rust", "SQL"]);
  assert!(list.iter().all(|r| r.display_order.is_none()));
}

#[tokio::test]
async fn absent_fields_are_stored_as_null() {
  let s = store().await;
  let repo = Repository::new(&s);
  repo
    .create(&alice(), EntityKind::Education, RecordFields::new().with("school", "MIT"))
    .await
    .unwrap();
  let record = &repo.list(&alice(), EntityKind::Education).await.unwrap()[0];
  assert_eq!(record.fields.get("school"), Some("MIT"));
  assert_eq!(record.fields.get("degree"), None);
  assert_eq!(record.owner_id, alice());
}

#[tokio::test]
async fn update_replaces_every_field() {
  let s = store().await;
  let repo = Repository::new(&s);
  let id = repo
    .create(&alice(), EntityKind::Publications, RecordFields::new().with("title", "Draft").with("url", "x"))
    .await
    .unwrap();

  let affected = repo
    .update(&alice(), EntityKind::Publications, &id, RecordFields::new().with("title", "Final"))
    .await
    .unwrap();
  assert_eq!(affected, 1);

  let record = &repo.list(&alice(), EntityKind::Publications).await.unwrap()[0];
  assert_eq!(record.fields.get("title"), Some("Final"));
  assert_eq!(record.fields.get("url"), None);
  assert!(record.updated_at >= record.created_at);
  assert_eq!(record.display_order, Some(1));
}

#[tokio::test]
async fn update_of_other_owners_record_changes_nothing() {
  let s = store().await;
  let repo = Repository::new(&s);
  let id = repo.create(&bob(), EntityKind::Projects, project("bob's", "2020")).await.unwrap();
  let before = repo.list(&bob(), EntityKind::Projects).await.unwrap();

  let affected = repo
    .update(&alice(), EntityKind::Projects, &id, project("mine now", "2020"))
    .await
    .unwrap();
  assert_eq!(affected, 0);
  assert_eq!(repo.list(&bob(), EntityKind::Projects).await.unwrap(), before);
}

#[tokio::test]
async fn update_of_missing_id_leaves_store_unchanged() {
  let s = store().await;
  let repo = Repository::new(&s);
  repo.create(&alice(), EntityKind::Projects, project("a", "2020")).await.unwrap();
  let before = repo.list(&alice(), EntityKind::Projects).await.unwrap();

  let affected = repo
    .update(&alice(), EntityKind::Projects, &"nope".into(), project("x", "2020"))
    .await
    .unwrap();
  assert_eq!(affected, 0);
  assert_eq!(repo.list(&alice(), EntityKind::Projects).await.unwrap(), before);
}

#[tokio::test]
async fn delete_is_idempotent_and_owner_scoped() {
  let s = store().await;
  let repo = Repository::new(&s);
  let id = repo.create(&alice(), EntityKind::Projects, project("a", "2020")).await.unwrap();

  assert_eq!(repo.delete(&bob(), EntityKind::Projects, &id).await.unwrap(), 0);
  assert_eq!(repo.delete(&alice(), EntityKind::Projects, &id).await.unwrap(), 1);
  assert_eq!(repo.delete(&alice(), EntityKind::Projects, &id).await.unwrap(), 0);
  assert_eq!(repo.delete(&alice(), EntityKind::Projects, &"ghost".into()).await.unwrap(), 0);
  assert_eq!(repo.delete(&alice(), EntityKind::Projects, &"ghost".into()).await.unwrap(), 0);
}

// ─── Reorder ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn reorder_sets_zero_based_positions() {
  let s = store().await;
  let repo = Repository::new(&s);
  let mut ids = Vec::new();
  for t in ["one", "two", "three"] {
    ids.push(
      repo
        .create(&alice(), EntityKind::Experiences, RecordFields::new().with("title", t))
        .await
        .unwrap(),
    );
  }

  ReorderCoordinator::new(&s)
    .reorder(&alice(), "experiences", vec![ids[2].clone(), ids[0].clone(), ids[1].clone()])
    .await
    .unwrap();

  let list = repo.list(&alice(), EntityKind::Experiences).await.unwrap();
  let got: Vec<_> = list.iter().map(|r| (r.id.clone(), r.display_order)).collect();
  assert_eq!(got, vec![
    (ids[2].clone(), Some(0)),
    (ids[0].clone(), Some(1)),
    (ids[1].clone(), Some(2)),
  ]);
}

#[tokio::test]
async fn create_list_reorder_list_scenario() {
  let s = store().await;
  let repo = Repository::new(&s);
  let a = repo.create(&alice(), EntityKind::Projects, project("A", "2020")).await.unwrap();
  let b = repo.create(&alice(), EntityKind::Projects, project("B", "2020")).await.unwrap();
  let c = repo.create(&alice(), EntityKind::Projects, project("C", "2020")).await.unwrap();

  assert_eq!(ids_of(&s, &alice(), EntityKind::Projects).await, vec![
    a.clone(),
    b.clone(),
    c.clone()
  ]);

  ReorderCoordinator::new(&s)
    .reorder(&alice(), "projects", vec![c.clone(), a.clone(), b.clone()])
    .await
    .unwrap();

  assert_eq!(ids_of(&s, &alice(), EntityKind::Projects).await, vec![c, a, b]);
}

#[tokio::test]
async fn reorder_skills_is_invalid() {
  let s = store().await;
  let err = ReorderCoordinator::new(&s)
    .reorder(&alice(), "skills", vec!["x".into()])
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::InvalidKind(_)));
}

#[tokio::test]
async fn empty_reorder_succeeds() {
  let s = store().await;
  ReorderCoordinator::new(&s)
    .reorder(&alice(), "experiences", vec![])
    .await
    .unwrap();
}

#[tokio::test]
async fn reorder_ignores_other_owners_rows() {
  let s = store().await;
  let repo = Repository::new(&s);
  let theirs = repo.create(&bob(), EntityKind::Education, RecordFields::new()).await.unwrap();

  ReorderCoordinator::new(&s)
    .reorder(&alice(), "education", vec!["unknown".into(), theirs.clone()])
    .await
    .unwrap();

  let bobs = repo.list(&bob(), EntityKind::Education).await.unwrap();
  assert_eq!(bobs[0].display_order, Some(1));
}

// ─── Profile ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn profile_upsert_then_get() {
  let s = store().await;
  assert!(s.get_profile(&alice()).await.unwrap().is_none());

  let update = ProfileUpdate {
    name: Some("Alice".into()),
    headline: Some("Engineer".into()),
    ..Default::default()
  };
  s.upsert_profile(&alice(), update, 10).await.unwrap();

  let update = ProfileUpdate { name: Some("Alice L.".into()), ..Default::default() };
  s.upsert_profile(&alice(), update, 20).await.unwrap();

  let profile = s.get_profile(&alice()).await.unwrap().unwrap();
  assert_eq!(profile.name.as_deref(), Some("Alice L."));
  assert_eq!(profile.headline, None);
  assert_eq!(profile.updated_at, 20);
}

// ─── Posts ───────────────────────────────────────────────────────────────────

fn post(id: &str, owner: OwnerId, at: i64) -> Post {
  Post {
    id:         id.into(),
    user_id:    owner,
    content:    format!("post {id}"),
    image_url:  None,
    created_at: at,
  }
}

#[tokio::test]
async fn posts_are_newest_first_with_author_details() {
  let s = store().await;
  s.upsert_profile(
    &alice(),
    ProfileUpdate { name: Some("Alice".into()), ..Default::default() },
    1,
  )
  .await
  .unwrap();
  s.insert_post(post("p1", alice(), 100)).await.unwrap();
  s.insert_post(post("p2", bob(), 200)).await.unwrap();

  let posts = s.list_posts().await.unwrap();
  let ids: Vec<_> = posts.iter().map(|p| p.post.id.as_str()).collect();
  assert_eq!(ids, vec!["p2", "p1"]);
  assert_eq!(posts[1].name.as_deref(), Some("Alice"));
  assert_eq!(posts[0].name, None);
}

#[tokio::test]
async fn post_delete_is_owner_scoped() {
  let s = store().await;
  s.insert_post(post("p1", alice(), 100)).await.unwrap();
  assert_eq!(s.delete_post(&bob(), &"p1".into()).await.unwrap(), 0);
  assert_eq!(s.delete_post(&alice(), &"p1".into()).await.unwrap(), 1);
  assert!(s.list_posts().await.unwrap().is_empty());
}

// ─── Profile views ───────────────────────────────────────────────────────────

#[tokio::test]
async fn view_counts_respect_window_and_owner() {
  let s = store().await;
  for at in [10, 50, 90, 100] {
    s.record_profile_view(&alice(), at).await.unwrap();
  }
  s.record_profile_view(&bob(), 100).await.unwrap();

  assert_eq!(s.count_profile_views(&alice(), 0).await.unwrap(), 4);
  assert_eq!(s.count_profile_views(&alice(), 50).await.unwrap(), 3);
  assert_eq!(s.count_profile_views(&bob(), 0).await.unwrap(), 1);
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn find_user_by_username_or_email() {
  let s = store().await;
  s.insert_user(User {
    id:            alice(),
    username:      "alice".into(),
    email:         Some("alice@example.com".into()),
    password_hash: "$argon2id$stub".into(),
    created_at:    1,
  })
  .await
  .unwrap();

  let by_name = s.find_user("alice").await.unwrap().unwrap();
  let by_email = s.find_user("alice@example.com").await.unwrap().unwrap();
  assert_eq!(by_name.id, by_email.id);
  assert!(s.find_user("mallory").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_username_is_a_database_error() {
  let s = store().await;
  let user = User {
    id:            alice(),
    username:      "alice".into(),
    email:         None,
    password_hash: "h".into(),
    created_at:    1,
  };
  s.insert_user(user.clone()).await.unwrap();
  let again = User { id: bob(), ..user };
  assert!(matches!(s.insert_user(again).await, Err(crate::Error::Database(_))));
}

// ─── Blobs ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn blob_put_get_and_replace() {
  let s = store().await;
  assert!(s.get_blob("k").await.unwrap().is_none());

  let blob = Blob {
    key:          "k".into(),
    content_type: Some("image/png".into()),
    etag:         "\"aa\"".into(),
    data:         vec![1, 2, 3],
    created_at:   5,
  };
  s.put_blob(blob.clone()).await.unwrap();
  assert_eq!(s.get_blob("k").await.unwrap(), Some(blob.clone()));

  let replaced = Blob { data: vec![9], etag: "\"bb\"".into(), ..blob };
  s.put_blob(replaced.clone()).await.unwrap();
  assert_eq!(s.get_blob("k").await.unwrap(), Some(replaced));
}
