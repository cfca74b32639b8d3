//! Integration tests for the query layer against a real database:
//! - Locale fallback on single reads
//! - Translation-aware filtering and sorting in listings
//! - Pagination envelope math against seeded rows
//! - Relation eager loading (courses and the artist catalog)
//! - Cache invalidation flow around a write

use std::sync::Arc;
use std::time::Duration;

use danza_cache::{Cache, CacheKeys, MemoryCache};
use danza_core::locale::Locale;
use danza_core::query::request::{normalize_list_request, ListRequest, RawListRequest};
use danza_db::models::album::CreateAlbum;
use danza_db::models::artist::{CreateArtist, ARTIST_FIELDS, ARTIST_RELATIONS};
use danza_db::models::course::{CreateCourse, UpdateCourse, COURSE_FIELDS, COURSE_RELATIONS};
use danza_db::models::song::CreateSong;
use danza_db::models::user::CreateUser;
use danza_db::models::TranslationUpsert;
use danza_db::repositories::translatable::TranslationOpts;
use danza_db::repositories::{AlbumRepo, ArtistRepo, CourseRepo, SongRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn locale(tag: &str) -> Locale {
    tag.parse().unwrap()
}

fn translation(tag: &str, name: &str) -> TranslationUpsert {
    TranslationUpsert {
        locale: locale(tag),
        name: name.to_string(),
        description: None,
    }
}

fn new_course(slug: &str, instructor_id: i64, translations: Vec<TranslationUpsert>) -> CreateCourse {
    CreateCourse {
        slug: slug.to_string(),
        instructor_id,
        venue_id: None,
        dance_style: "salsa".to_string(),
        level: None,
        price_cents: Some(5_000),
        currency: None,
        starts_at: None,
        translations,
    }
}

async fn seed_instructor(pool: &PgPool) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            email: "instructor@danza.test".to_string(),
            display_name: "Instructor".to_string(),
            role: Some("instructor".to_string()),
        },
    )
    .await
    .unwrap()
    .id
}

fn list_request(
    raw: &RawListRequest<'_>,
    table: &'static danza_core::query::fields::FieldTable,
    relations: &[&str],
) -> ListRequest {
    normalize_list_request(raw, table, relations).unwrap()
}

// ---------------------------------------------------------------------------
// Locale fallback
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn find_by_id_falls_back_to_default_locale(pool: PgPool) {
    let instructor = seed_instructor(&pool).await;
    let created = CourseRepo::create(
        &pool,
        &new_course("salsa-101", instructor, vec![translation("en", "Salsa Basics")]),
    )
    .await
    .unwrap();

    // Requested locale has no translation; the configured default wins.
    let fr = locale("fr");
    let en = locale("en");
    let course = CourseRepo::find_by_id(
        &pool,
        created.entity.id,
        TranslationOpts {
            locale: Some(&fr),
            include_all: false,
            default_locale: &en,
        },
    )
    .await
    .unwrap()
    .unwrap();

    let attached = course.translation.expect("fallback translation attached");
    assert_eq!(attached.locale, "en");
    assert_eq!(attached.name, "Salsa Basics");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn find_by_id_prefers_requested_locale(pool: PgPool) {
    let instructor = seed_instructor(&pool).await;
    let created = CourseRepo::create(
        &pool,
        &new_course(
            "tango-basics",
            instructor,
            vec![translation("en", "Tango Basics"), translation("de", "Tango Grundlagen")],
        ),
    )
    .await
    .unwrap();

    let de = locale("de");
    let en = locale("en");
    let course = CourseRepo::find_by_id(
        &pool,
        created.entity.id,
        TranslationOpts {
            locale: Some(&de),
            include_all: false,
            default_locale: &en,
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(course.translation.unwrap().name, "Tango Grundlagen");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn include_all_attaches_every_translation(pool: PgPool) {
    let instructor = seed_instructor(&pool).await;
    let created = CourseRepo::create(
        &pool,
        &new_course(
            "bachata-1",
            instructor,
            vec![translation("en", "Bachata"), translation("de", "Bachata (DE)")],
        ),
    )
    .await
    .unwrap();

    let en = locale("en");
    let course = CourseRepo::find_by_id(
        &pool,
        created.entity.id,
        TranslationOpts {
            locale: None,
            include_all: true,
            default_locale: &en,
        },
    )
    .await
    .unwrap()
    .unwrap();

    let translations = course.translations.unwrap();
    assert_eq!(translations.len(), 2);
    assert!(course.translation.is_none());
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn paginate_envelope_math(pool: PgPool) {
    let instructor = seed_instructor(&pool).await;
    for i in 0..25 {
        CourseRepo::create(
            &pool,
            &new_course(
                &format!("course-{i:02}"),
                instructor,
                vec![translation("en", &format!("Course {i:02}"))],
            ),
        )
        .await
        .unwrap();
    }

    let raw = RawListRequest {
        page: Some(3),
        limit: Some(10),
        ..Default::default()
    };
    let req = list_request(&raw, &COURSE_FIELDS, COURSE_RELATIONS);
    let page = CourseRepo::paginate(&pool, &req, &locale("en")).await.unwrap();

    assert_eq!(page.total, 25);
    assert_eq!(page.data.len(), 5);
    assert_eq!(page.total_pages, 3);
    assert!(!page.has_next);
    assert!(page.has_prev);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn paginate_filters_on_translation_field(pool: PgPool) {
    let instructor = seed_instructor(&pool).await;
    CourseRepo::create(
        &pool,
        &new_course("salsa-a", instructor, vec![translation("en", "Salsa Advanced")]),
    )
    .await
    .unwrap();
    CourseRepo::create(
        &pool,
        &new_course("tango-a", instructor, vec![translation("en", "Tango Advanced")]),
    )
    .await
    .unwrap();

    let raw = RawListRequest {
        filter: Some(r#"{"field":"translation.name","operator":"ilike","value":"%salsa%"}"#),
        locale: Some("en"),
        ..Default::default()
    };
    let req = list_request(&raw, &COURSE_FIELDS, COURSE_RELATIONS);
    let page = CourseRepo::paginate(&pool, &req, &locale("en")).await.unwrap();

    assert_eq!(page.total, 1);
    assert_eq!(page.data[0].course.entity.slug, "salsa-a");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn paginate_sorts_on_translation_field(pool: PgPool) {
    let instructor = seed_instructor(&pool).await;
    for (slug, name) in [("c-1", "Zouk"), ("c-2", "Afro"), ("c-3", "Merengue")] {
        CourseRepo::create(
            &pool,
            &new_course(slug, instructor, vec![translation("en", name)]),
        )
        .await
        .unwrap();
    }

    let raw = RawListRequest {
        sort: Some(r#"{"field":"translation.name","order":"asc"}"#),
        ..Default::default()
    };
    let req = list_request(&raw, &COURSE_FIELDS, COURSE_RELATIONS);
    let page = CourseRepo::paginate(&pool, &req, &locale("en")).await.unwrap();

    let names: Vec<&str> = page
        .data
        .iter()
        .map(|c| c.course.translation.as_ref().unwrap().name.as_str())
        .collect();
    assert_eq!(names, ["Afro", "Merengue", "Zouk"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn paginate_eager_loads_requested_relations(pool: PgPool) {
    let instructor = seed_instructor(&pool).await;
    let course = CourseRepo::create(
        &pool,
        &new_course("kizomba-1", instructor, vec![translation("en", "Kizomba")]),
    )
    .await
    .unwrap();
    danza_db::repositories::LessonRepo::create(
        &pool,
        &danza_db::models::lesson::CreateLesson {
            course_id: course.entity.id,
            position: Some(1),
            starts_at: None,
            duration_mins: None,
            translations: vec![translation("en", "Footwork")],
        },
    )
    .await
    .unwrap();

    let raw = RawListRequest {
        include: Some("lessons"),
        ..Default::default()
    };
    let req = list_request(&raw, &COURSE_FIELDS, COURSE_RELATIONS);
    let page = CourseRepo::paginate(&pool, &req, &locale("en")).await.unwrap();

    let lessons = page.data[0].lessons.as_ref().expect("lessons attached");
    assert_eq!(lessons.len(), 1);
    assert_eq!(lessons[0].translation.as_ref().unwrap().name, "Footwork");
    // Venue was not requested, so it is absent rather than empty.
    assert!(page.data[0].venue.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn artist_listing_eager_loads_nested_songs(pool: PgPool) {
    let artist = ArtistRepo::create(
        &pool,
        &CreateArtist {
            name: "Grupo Extra".to_string(),
            country: Some("DO".to_string()),
        },
    )
    .await
    .unwrap();
    let album = AlbumRepo::create(
        &pool,
        &CreateAlbum {
            artist_id: artist.id,
            title: "Dance Floor".to_string(),
            released_on: None,
        },
    )
    .await
    .unwrap();
    SongRepo::create(
        &pool,
        &CreateSong {
            album_id: album.id,
            title: "Me Emborrachare".to_string(),
            duration_secs: Some(222),
            bpm: Some(128),
        },
    )
    .await
    .unwrap();

    let raw = RawListRequest {
        include: Some("albums.songs"),
        ..Default::default()
    };
    let req = list_request(&raw, &ARTIST_FIELDS, ARTIST_RELATIONS);
    let page = ArtistRepo::paginate(&pool, &req).await.unwrap();

    let albums = page.data[0].albums.as_ref().expect("albums attached");
    assert_eq!(albums.len(), 1);
    let songs = albums[0].songs.as_ref().expect("songs attached");
    assert_eq!(songs.len(), 1);
    assert_eq!(songs[0].title, "Me Emborrachare");
}

// ---------------------------------------------------------------------------
// Cache invalidation flow
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn write_invalidates_cached_listing(pool: PgPool) {
    let instructor = seed_instructor(&pool).await;
    let created = CourseRepo::create(
        &pool,
        &new_course("cache-flow", instructor, vec![translation("en", "Before")]),
    )
    .await
    .unwrap();

    let cache = Cache::new(Arc::new(MemoryCache::new()), Duration::from_secs(300));
    let keys = CacheKeys::new("course");

    let req = list_request(&RawListRequest::default(), &COURSE_FIELDS, COURSE_RELATIONS);
    let key = keys.paginated(&req);

    // Fill the cache from the first read.
    let page = CourseRepo::paginate(&pool, &req, &locale("en")).await.unwrap();
    cache.set(&key, &page).await.unwrap();
    assert!(cache
        .get::<danza_core::query::pagination::Page<danza_db::repositories::CourseDetail>>(&key)
        .await
        .unwrap()
        .is_some());

    // Write, then invalidate the way the handlers do.
    CourseRepo::update(
        &pool,
        created.entity.id,
        &UpdateCourse {
            translations: vec![translation("en", "After")],
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    cache.delete(&keys.by_id(created.entity.id)).await.unwrap();
    cache.delete_by_pattern(&keys.all_paginated()).await.unwrap();

    // The stale envelope is gone; the next read sees the new name.
    assert!(cache
        .get::<danza_core::query::pagination::Page<danza_db::repositories::CourseDetail>>(&key)
        .await
        .unwrap()
        .is_none());
    let page = CourseRepo::paginate(&pool, &req, &locale("en")).await.unwrap();
    assert_eq!(
        page.data[0].course.translation.as_ref().unwrap().name,
        "After"
    );
}

// ---------------------------------------------------------------------------
// Deletes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_cascades_translations_and_reports_absence(pool: PgPool) {
    let instructor = seed_instructor(&pool).await;
    let created = CourseRepo::create(
        &pool,
        &new_course("to-delete", instructor, vec![translation("en", "Gone Soon")]),
    )
    .await
    .unwrap();

    assert!(CourseRepo::delete(&pool, created.entity.id).await.unwrap());
    // Second delete reports absence.
    assert!(!CourseRepo::delete(&pool, created.entity.id).await.unwrap());

    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM course_translations WHERE course_id = $1")
            .bind(created.entity.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(count, 0);
}
