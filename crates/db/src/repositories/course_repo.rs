//! Repository for the `courses` and `course_translations` tables.
//!
//! Courses are the central translatable entity: writes upsert their
//! translations in the same transaction, reads resolve a locale, and
//! listings can eager-load `lessons` and `venue`.

use std::collections::HashMap;

use danza_core::locale::Locale;
use danza_core::query::pagination::Page;
use danza_core::query::request::ListRequest;
use danza_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, Transaction};

use super::lesson_repo::{LessonEntity, LESSON_COLUMNS};
use super::translatable::{
    self, Translated, TranslatableEntity, TranslationJoin, TranslationOpts,
};
use super::venue_repo::{VenueEntity, VENUE_COLUMNS};
use crate::models::course::{
    Course, CourseTranslation, CreateCourse, UpdateCourse, COURSE_FIELDS,
};
use crate::models::lesson::Lesson;
use crate::models::venue::Venue;
use crate::models::TranslationUpsert;

/// Column list for `courses` queries.
pub(crate) const COURSE_COLUMNS: &str = "\
    id, slug, instructor_id, venue_id, dance_style, level, price_cents, \
    currency, is_published, starts_at, created_at, updated_at";

/// Column list for `course_translations` queries.
const TRANSLATION_COLUMNS: &str = "id, course_id, locale, name, description";

/// Facade binding for courses.
pub struct CourseEntity;

impl TranslatableEntity for CourseEntity {
    const ENTITY: &'static str = "Course";
    const TABLE: &'static str = "courses";
    const COLUMNS: &'static str = COURSE_COLUMNS;
    const TRANSLATION: TranslationJoin = TranslationJoin {
        table: "course_translations",
        fk: "course_id",
    };
    const TRANSLATION_COLUMNS: &'static str = TRANSLATION_COLUMNS;

    type Row = Course;
    type TranslationRow = CourseTranslation;

    fn fields() -> &'static danza_core::query::fields::FieldTable {
        &COURSE_FIELDS
    }
}

/// A course plus its eager-loaded relations. Relations that were not
/// requested are omitted from the serialized form entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseDetail {
    #[serde(flatten)]
    pub course: Translated<CourseEntity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lessons: Option<Vec<Translated<LessonEntity>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<Translated<VenueEntity>>,
}

/// Provides CRUD and listing operations for courses.
pub struct CourseRepo;

impl CourseRepo {
    /// Create a course and its translations in one transaction.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCourse,
    ) -> Result<Translated<CourseEntity>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO courses \
                 (slug, instructor_id, venue_id, dance_style, level, price_cents, currency, starts_at) \
             VALUES ($1, $2, $3, $4, COALESCE($5, 'beginner'), COALESCE($6, 0), COALESCE($7, 'EUR'), $8) \
             RETURNING {COURSE_COLUMNS}"
        );
        let course: Course = sqlx::query_as(&query)
            .bind(&input.slug)
            .bind(input.instructor_id)
            .bind(input.venue_id)
            .bind(&input.dance_style)
            .bind(input.level.as_deref())
            .bind(input.price_cents)
            .bind(input.currency.as_deref())
            .bind(input.starts_at)
            .fetch_one(&mut *tx)
            .await?;

        for translation in &input.translations {
            upsert_translation(&mut tx, course.id, translation).await?;
        }
        tx.commit().await?;

        tracing::info!(course_id = course.id, slug = %course.slug, "Course created");
        Self::with_all_translations(pool, course).await
    }

    /// Update a course; absent fields keep their value, supplied
    /// translations are upserted per locale. `None` if the id is unknown.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCourse,
    ) -> Result<Option<Translated<CourseEntity>>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE courses SET \
                 venue_id = COALESCE($2, venue_id), \
                 dance_style = COALESCE($3, dance_style), \
                 level = COALESCE($4, level), \
                 price_cents = COALESCE($5, price_cents), \
                 currency = COALESCE($6, currency), \
                 is_published = COALESCE($7, is_published), \
                 starts_at = COALESCE($8, starts_at), \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {COURSE_COLUMNS}"
        );
        let course: Option<Course> = sqlx::query_as(&query)
            .bind(id)
            .bind(input.venue_id)
            .bind(input.dance_style.as_deref())
            .bind(input.level.as_deref())
            .bind(input.price_cents)
            .bind(input.currency.as_deref())
            .bind(input.is_published)
            .bind(input.starts_at)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(course) = course else {
            return Ok(None);
        };

        for translation in &input.translations {
            upsert_translation(&mut tx, course.id, translation).await?;
        }
        tx.commit().await?;

        Ok(Some(Self::with_all_translations(pool, course).await?))
    }

    /// Fetch one course with its translation(s).
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
        opts: TranslationOpts<'_>,
    ) -> Result<Option<Translated<CourseEntity>>, sqlx::Error> {
        translatable::find_by_id::<CourseEntity>(pool, id, opts).await
    }

    /// Paginated course listing with optional `lessons`/`venue` eager
    /// loads driven by the request's relation map.
    pub async fn paginate(
        pool: &PgPool,
        req: &ListRequest,
        default_locale: &Locale,
    ) -> Result<Page<CourseDetail>, sqlx::Error> {
        let page = translatable::paginate::<CourseEntity>(pool, req, default_locale).await?;

        let want_lessons = req.relations.contains("lessons");
        let want_venue = req.relations.contains("venue");
        if !want_lessons && !want_venue {
            return Ok(page.map(|course| CourseDetail {
                course,
                lessons: None,
                venue: None,
            }));
        }

        let opts = TranslationOpts {
            locale: req.locale.as_ref(),
            include_all: req.include_all_translations,
            default_locale,
        };
        let course_ids: Vec<DbId> = page.data.iter().map(|c| c.entity.id).collect();

        let mut lessons_by_course: HashMap<DbId, Vec<Translated<LessonEntity>>> = HashMap::new();
        if want_lessons && !course_ids.is_empty() {
            let query = format!(
                "SELECT {LESSON_COLUMNS} FROM lessons \
                 WHERE course_id = ANY($1) \
                 ORDER BY course_id, position, id"
            );
            let rows: Vec<Lesson> = sqlx::query_as(&query)
                .bind(&course_ids)
                .fetch_all(pool)
                .await?;
            for lesson in translatable::attach_translations::<LessonEntity>(pool, rows, opts).await?
            {
                lessons_by_course
                    .entry(lesson.entity.course_id)
                    .or_default()
                    .push(lesson);
            }
        }

        let mut venues_by_id: HashMap<DbId, Translated<VenueEntity>> = HashMap::new();
        if want_venue {
            let venue_ids: Vec<DbId> = page
                .data
                .iter()
                .filter_map(|c| c.entity.venue_id)
                .collect();
            if !venue_ids.is_empty() {
                let query =
                    format!("SELECT {VENUE_COLUMNS} FROM venues WHERE id = ANY($1)");
                let rows: Vec<Venue> = sqlx::query_as(&query)
                    .bind(&venue_ids)
                    .fetch_all(pool)
                    .await?;
                for venue in
                    translatable::attach_translations::<VenueEntity>(pool, rows, opts).await?
                {
                    venues_by_id.insert(venue.entity.id, venue);
                }
            }
        }

        Ok(page.map(|course| {
            let lessons = want_lessons
                .then(|| lessons_by_course.remove(&course.entity.id).unwrap_or_default());
            let venue = if want_venue {
                course
                    .entity
                    .venue_id
                    .and_then(|vid| venues_by_id.get(&vid).cloned())
            } else {
                None
            };
            CourseDetail {
                course,
                lessons,
                venue,
            }
        }))
    }

    /// Delete a course. Lessons, translations, and enrollments cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        translatable::delete::<CourseEntity>(pool, id).await
    }

    async fn with_all_translations(
        pool: &PgPool,
        course: Course,
    ) -> Result<Translated<CourseEntity>, sqlx::Error> {
        let query = format!(
            "SELECT {TRANSLATION_COLUMNS} FROM course_translations WHERE course_id = $1"
        );
        let translations: Vec<CourseTranslation> = sqlx::query_as(&query)
            .bind(course.id)
            .fetch_all(pool)
            .await?;
        Ok(Translated {
            entity: course,
            translation: None,
            translations: Some(translations),
        })
    }
}

async fn upsert_translation(
    tx: &mut Transaction<'_, Postgres>,
    course_id: DbId,
    translation: &TranslationUpsert,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO course_translations (course_id, locale, name, description) \
         VALUES ($1, $2, $3, $4) \
         ON CONFLICT (course_id, locale) DO UPDATE \
             SET name = EXCLUDED.name, description = EXCLUDED.description",
    )
    .bind(course_id)
    .bind(translation.locale.as_str())
    .bind(&translation.name)
    .bind(translation.description.as_deref())
    .execute(&mut **tx)
    .await?;
    Ok(())
}
