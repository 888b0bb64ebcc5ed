//! Integration tests for the repository layer against a real database:
//! - Create/read for users, videos, prompts, outputs
//! - Unique constraint behaviour (email, youtube_id, video+prompt)
//! - Exact-text prompt reuse lookup
//! - Pagination ordering

use assert_matches::assert_matches;
use labelbase_core::prompt::content_hash;
use labelbase_db::models::output::CreateOutput;
use labelbase_db::models::prompt::CreatePrompt;
use labelbase_db::models::user::CreateUser;
use labelbase_db::models::video::CreateVideo;
use labelbase_db::repositories::{OutputRepo, PromptRepo, UserRepo, VideoRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_video(youtube_id: &str) -> CreateVideo {
    CreateVideo {
        youtube_id: youtube_id.to_string(),
        title: format!("Video {youtube_id}"),
        description: None,
        video_metadata: Some(serde_json::json!({"video_id": youtube_id})),
        user_id: None,
    }
}

fn new_prompt(text: &str) -> CreatePrompt {
    CreatePrompt {
        system_prompt: None,
        user_prompt: text.to_string(),
        user_id: None,
    }
}

fn new_output(video_id: i64, prompt_id: &str, content: &str) -> CreateOutput {
    CreateOutput {
        video_id,
        prompt_id: prompt_id.to_string(),
        llm_output: serde_json::json!({"content": content, "model": "test", "usage": {}}),
        time_to_generate: 1.5,
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn user_create_and_lookup(pool: PgPool) {
    let user = UserRepo::create(
        &pool,
        &CreateUser {
            email: "a@example.com".into(),
            hashed_password: "$argon2id$fake".into(),
        },
    )
    .await
    .unwrap();

    let by_id = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(by_id.email, "a@example.com");

    let by_email = UserRepo::find_by_email(&pool, "a@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_email.id, user.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_email_violates_unique_constraint(pool: PgPool) {
    let input = CreateUser {
        email: "dup@example.com".into(),
        hashed_password: "x".into(),
    };
    UserRepo::create(&pool, &input).await.unwrap();

    let err = UserRepo::create(&pool, &input).await.unwrap_err();
    assert_matches!(err, sqlx::Error::Database(ref db) if db.constraint() == Some("uq_users_email"));
}

// ---------------------------------------------------------------------------
// Videos
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn video_create_if_absent_is_idempotent(pool: PgPool) {
    let first = VideoRepo::create_if_absent(&pool, &new_video("abc123"))
        .await
        .unwrap();
    assert!(first.is_some());

    let second = VideoRepo::create_if_absent(&pool, &new_video("abc123"))
        .await
        .unwrap();
    assert!(second.is_none(), "second insert must not create a row");

    assert_eq!(VideoRepo::count(&pool).await.unwrap(), 1);

    let found = VideoRepo::find_by_youtube_id(&pool, "abc123")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, first.unwrap().id);
    assert_eq!(found.video_metadata.unwrap()["video_id"], "abc123");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn video_find_missing_returns_none(pool: PgPool) {
    assert!(VideoRepo::find_by_id(&pool, 999_999).await.unwrap().is_none());
    assert!(VideoRepo::find_by_youtube_id(&pool, "nope")
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn video_list_paginates_in_insertion_order(pool: PgPool) {
    for id in ["v1", "v2", "v3", "v4"] {
        VideoRepo::create_if_absent(&pool, &new_video(id))
            .await
            .unwrap();
    }

    let page = VideoRepo::list(&pool, 1, 2).await.unwrap();
    let ids: Vec<_> = page.iter().map(|v| v.youtube_id.as_str()).collect();
    assert_eq!(ids, vec!["v2", "v3"]);

    let tail = VideoRepo::list(&pool, 3, 100).await.unwrap();
    assert_eq!(tail.len(), 1);
}

// ---------------------------------------------------------------------------
// Prompts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn prompt_ids_are_opaque_uuids(pool: PgPool) {
    let a = PromptRepo::create(&pool, &new_prompt("one")).await.unwrap();
    let b = PromptRepo::create(&pool, &new_prompt("one")).await.unwrap();
    assert_ne!(a.id, b.id);
    assert!(uuid::Uuid::parse_str(&a.id).is_ok());
    assert_eq!(a.content_hash, b.content_hash);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reusable_lookup_matches_exact_text_only(pool: PgPool) {
    let created = PromptRepo::create(&pool, &new_prompt("Summarize this video"))
        .await
        .unwrap();

    let hit = PromptRepo::find_reusable_by_text(&pool, "Summarize this video")
        .await
        .unwrap();
    assert_eq!(hit.unwrap().id, created.id);

    let miss = PromptRepo::find_reusable_by_text(&pool, "summarize this video")
        .await
        .unwrap();
    assert!(miss.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reusable_lookup_skips_prompts_with_system_text(pool: PgPool) {
    PromptRepo::create(
        &pool,
        &CreatePrompt {
            system_prompt: Some("You are terse.".into()),
            user_prompt: "Summarize".into(),
            user_id: None,
        },
    )
    .await
    .unwrap();

    let hit = PromptRepo::find_reusable_by_text(&pool, "Summarize")
        .await
        .unwrap();
    assert!(hit.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn text_lock_is_held_until_commit(pool: PgPool) {
    let try_lock = "SELECT pg_try_advisory_xact_lock(hashtext($1))";
    let key = content_hash("Summarize");

    let mut tx = pool.begin().await.unwrap();
    PromptRepo::lock_text(&mut *tx, "Summarize").await.unwrap();

    let acquired: bool = sqlx::query_scalar(try_lock)
        .bind(&key)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!(!acquired, "lock must be held by the open transaction");

    tx.commit().await.unwrap();

    let acquired: bool = sqlx::query_scalar(try_lock)
        .bind(&key)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!(acquired);
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn output_pair_is_unique(pool: PgPool) {
    let video = VideoRepo::create_if_absent(&pool, &new_video("abc123"))
        .await
        .unwrap()
        .unwrap();
    let prompt = PromptRepo::create(&pool, &new_prompt("p")).await.unwrap();

    let first = OutputRepo::create_if_absent(&pool, &new_output(video.id, &prompt.id, "first"))
        .await
        .unwrap()
        .unwrap();
    let second = OutputRepo::create_if_absent(&pool, &new_output(video.id, &prompt.id, "second"))
        .await
        .unwrap();
    assert!(second.is_none());

    let stored = OutputRepo::find_by_video_and_prompt(&pool, video.id, &prompt.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.id, first.id);
    assert_eq!(stored.llm_output["content"], "first");
    assert!((stored.time_to_generate - 1.5).abs() < f64::EPSILON);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn outputs_listed_by_prompt_and_video(pool: PgPool) {
    let v1 = VideoRepo::create_if_absent(&pool, &new_video("v1"))
        .await
        .unwrap()
        .unwrap();
    let v2 = VideoRepo::create_if_absent(&pool, &new_video("v2"))
        .await
        .unwrap()
        .unwrap();
    let prompt = PromptRepo::create(&pool, &new_prompt("p")).await.unwrap();

    OutputRepo::create_if_absent(&pool, &new_output(v1.id, &prompt.id, "a"))
        .await
        .unwrap();
    OutputRepo::create_if_absent(&pool, &new_output(v2.id, &prompt.id, "b"))
        .await
        .unwrap();

    assert_eq!(OutputRepo::list_by_prompt(&pool, &prompt.id).await.unwrap().len(), 2);
    assert_eq!(OutputRepo::list_by_video(&pool, v1.id).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn output_requires_existing_video(pool: PgPool) {
    let prompt = PromptRepo::create(&pool, &new_prompt("p")).await.unwrap();
    let err = OutputRepo::create_if_absent(&pool, &new_output(424_242, &prompt.id, "x"))
        .await
        .unwrap_err();
    assert_matches!(err, sqlx::Error::Database(_));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rolled_back_transaction_leaves_no_rows(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    VideoRepo::create_if_absent(&mut *tx, &new_video("abc123"))
        .await
        .unwrap();
    PromptRepo::create(&mut *tx, &new_prompt("p")).await.unwrap();
    drop(tx);

    assert_eq!(VideoRepo::count(&pool).await.unwrap(), 0);
    assert_eq!(PromptRepo::count(&pool).await.unwrap(), 0);
}
