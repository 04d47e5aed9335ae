use blogcrate::{
    CrudRepository,
    domain::{Post, PostStatus, PostStatusCriteria},
    filtering::{LongFilter, StringFilter},
};

mod common;
use common::{at, collect, save_post, save_status, setup_test_db};

fn statuses(found: &[PostStatus]) -> Vec<&str> {
    found.iter().map(|s| s.status.as_str()).collect()
}

#[tokio::test]
async fn test_save_assigns_id_and_update_keeps_it() {
    let db = setup_test_db().await.unwrap();
    let mut saved = save_status(&db, "DRAFT").await;
    let id = saved.id().expect("id assigned on save");

    saved.status = "ARCHIVED".to_string();
    let updated = PostStatus::save(&db, saved).await.unwrap();
    assert_eq!(updated.id(), Some(id));

    let loaded = PostStatus::find_by_id(&db, id).await.unwrap().unwrap();
    assert_eq!(loaded.status, "ARCHIVED");
    assert_eq!(PostStatus::count_all(&db).await.unwrap(), 1);
}

#[tokio::test]
async fn test_status_criteria() {
    let db = setup_test_db().await.unwrap();
    let draft = save_status(&db, "DRAFT").await;
    save_status(&db, "PUBLISHED").await;
    save_status(&db, "UNPUBLISHED").await;

    let criteria = PostStatusCriteria {
        status: Some(StringFilter::new().with_contains("PUBLISHED")),
        ..Default::default()
    };
    let found = collect(PostStatus::find_by_criteria(&db, Some(&criteria), None)).await;
    assert_eq!(statuses(&found), vec!["PUBLISHED", "UNPUBLISHED"]);

    let criteria = PostStatusCriteria {
        id: Some(LongFilter::new().with_not_equals(draft.id().unwrap())),
        status: Some(StringFilter::new().with_not_in(vec!["UNPUBLISHED".to_string()])),
        ..Default::default()
    };
    let found = collect(PostStatus::find_by_criteria(&db, Some(&criteria), None)).await;
    assert_eq!(statuses(&found), vec!["PUBLISHED"]);
    assert_eq!(PostStatus::count_by_criteria(&db, Some(&criteria)).await.unwrap(), 1);
}

#[tokio::test]
async fn test_statuses_without_post() {
    let db = setup_test_db().await.unwrap();
    let used = save_status(&db, "USED").await;
    save_status(&db, "SPARE").await;
    save_post(&db, Post::new("holder", at(1), at(1)).with_post_status(used)).await;
    save_post(&db, Post::new("no status", at(2), at(2))).await;

    let spare = collect(PostStatus::find_all_where_post_is_null(&db)).await;
    assert_eq!(statuses(&spare), vec!["SPARE"]);

    let named = PostStatus::named_filter(&db, "post-is-null").expect("known filter");
    assert_eq!(statuses(&collect(named).await), vec!["SPARE"]);
    assert!(PostStatus::named_filter(&db, "nope").is_none());
}

#[tokio::test]
async fn test_delete_status_leaves_post_reference() {
    let db = setup_test_db().await.unwrap();
    let status = save_status(&db, "TEMP").await;
    let status_id = status.id().unwrap();
    let post = save_post(&db, Post::new("holder", at(1), at(1)).with_post_status(status)).await;

    PostStatus::delete_by_id(&db, status_id).await.unwrap();
    assert!(!PostStatus::exists_by_id(&db, status_id).await.unwrap());

    let loaded = Post::find_by_id(&db, post.id().unwrap()).await.unwrap().unwrap();
    assert_eq!(loaded.post_status_id(), Some(status_id));
    assert!(loaded.post_status().is_none());
}
