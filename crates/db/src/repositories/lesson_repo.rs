//! Repository for the `lessons` and `lesson_translations` tables.

use danza_core::locale::Locale;
use danza_core::query::pagination::Page;
use danza_core::query::request::ListRequest;
use danza_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use super::translatable::{
    self, Translated, TranslatableEntity, TranslationJoin, TranslationOpts,
};
use crate::models::lesson::{
    CreateLesson, Lesson, LessonTranslation, UpdateLesson, LESSON_FIELDS,
};
use crate::models::TranslationUpsert;

/// Column list for `lessons` queries.
pub(crate) const LESSON_COLUMNS: &str = "\
    id, course_id, position, starts_at, duration_mins, created_at, updated_at";

const TRANSLATION_COLUMNS: &str = "id, lesson_id, locale, name, description";

/// Facade binding for lessons.
pub struct LessonEntity;

impl TranslatableEntity for LessonEntity {
    const ENTITY: &'static str = "Lesson";
    const TABLE: &'static str = "lessons";
    const COLUMNS: &'static str = LESSON_COLUMNS;
    const TRANSLATION: TranslationJoin = TranslationJoin {
        table: "lesson_translations",
        fk: "lesson_id",
    };
    const TRANSLATION_COLUMNS: &'static str = TRANSLATION_COLUMNS;

    type Row = Lesson;
    type TranslationRow = LessonTranslation;

    fn fields() -> &'static danza_core::query::fields::FieldTable {
        &LESSON_FIELDS
    }
}

/// Provides CRUD and listing operations for lessons.
pub struct LessonRepo;

impl LessonRepo {
    /// Create a lesson and its translations in one transaction.
    pub async fn create(
        pool: &PgPool,
        input: &CreateLesson,
    ) -> Result<Translated<LessonEntity>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO lessons (course_id, position, starts_at, duration_mins) \
             VALUES ($1, COALESCE($2, 0), $3, COALESCE($4, 60)) \
             RETURNING {LESSON_COLUMNS}"
        );
        let lesson: Lesson = sqlx::query_as(&query)
            .bind(input.course_id)
            .bind(input.position)
            .bind(input.starts_at)
            .bind(input.duration_mins)
            .fetch_one(&mut *tx)
            .await?;

        for translation in &input.translations {
            upsert_translation(&mut tx, lesson.id, translation).await?;
        }
        tx.commit().await?;

        Self::with_all_translations(pool, lesson).await
    }

    /// Update a lesson. `None` if the id is unknown.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateLesson,
    ) -> Result<Option<Translated<LessonEntity>>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE lessons SET \
                 position = COALESCE($2, position), \
                 starts_at = COALESCE($3, starts_at), \
                 duration_mins = COALESCE($4, duration_mins), \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {LESSON_COLUMNS}"
        );
        let lesson: Option<Lesson> = sqlx::query_as(&query)
            .bind(id)
            .bind(input.position)
            .bind(input.starts_at)
            .bind(input.duration_mins)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(lesson) = lesson else {
            return Ok(None);
        };

        for translation in &input.translations {
            upsert_translation(&mut tx, lesson.id, translation).await?;
        }
        tx.commit().await?;

        Ok(Some(Self::with_all_translations(pool, lesson).await?))
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
        opts: TranslationOpts<'_>,
    ) -> Result<Option<Translated<LessonEntity>>, sqlx::Error> {
        translatable::find_by_id::<LessonEntity>(pool, id, opts).await
    }

    pub async fn paginate(
        pool: &PgPool,
        req: &ListRequest,
        default_locale: &Locale,
    ) -> Result<Page<Translated<LessonEntity>>, sqlx::Error> {
        translatable::paginate::<LessonEntity>(pool, req, default_locale).await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        translatable::delete::<LessonEntity>(pool, id).await
    }

    async fn with_all_translations(
        pool: &PgPool,
        lesson: Lesson,
    ) -> Result<Translated<LessonEntity>, sqlx::Error> {
        let query = format!(
            "SELECT {TRANSLATION_COLUMNS} FROM lesson_translations WHERE lesson_id = $1"
        );
        let translations: Vec<LessonTranslation> = sqlx::query_as(&query)
            .bind(lesson.id)
            .fetch_all(pool)
            .await?;
        Ok(Translated {
            entity: lesson,
            translation: None,
            translations: Some(translations),
        })
    }
}

async fn upsert_translation(
    tx: &mut Transaction<'_, Postgres>,
    lesson_id: DbId,
    translation: &TranslationUpsert,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO lesson_translations (lesson_id, locale, name, description) \
         VALUES ($1, $2, $3, $4) \
         ON CONFLICT (lesson_id, locale) DO UPDATE \
             SET name = EXCLUDED.name, description = EXCLUDED.description",
    )
    .bind(lesson_id)
    .bind(translation.locale.as_str())
    .bind(&translation.name)
    .bind(translation.description.as_deref())
    .execute(&mut **tx)
    .await?;
    Ok(())
}
