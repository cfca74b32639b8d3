//! Repository for the `venues` and `venue_translations` tables.

use danza_core::locale::Locale;
use danza_core::query::pagination::Page;
use danza_core::query::request::ListRequest;
use danza_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use super::translatable::{
    self, Translated, TranslatableEntity, TranslationJoin, TranslationOpts,
};
use crate::models::venue::{CreateVenue, UpdateVenue, Venue, VenueTranslation, VENUE_FIELDS};
use crate::models::TranslationUpsert;

/// Column list for `venues` queries.
pub(crate) const VENUE_COLUMNS: &str =
    "id, slug, address, city, capacity, created_at, updated_at";

const TRANSLATION_COLUMNS: &str = "id, venue_id, locale, name, description";

/// Facade binding for venues.
pub struct VenueEntity;

impl TranslatableEntity for VenueEntity {
    const ENTITY: &'static str = "Venue";
    const TABLE: &'static str = "venues";
    const COLUMNS: &'static str = VENUE_COLUMNS;
    const TRANSLATION: TranslationJoin = TranslationJoin {
        table: "venue_translations",
        fk: "venue_id",
    };
    const TRANSLATION_COLUMNS: &'static str = TRANSLATION_COLUMNS;

    type Row = Venue;
    type TranslationRow = VenueTranslation;

    fn fields() -> &'static danza_core::query::fields::FieldTable {
        &VENUE_FIELDS
    }
}

/// Provides CRUD and listing operations for venues.
pub struct VenueRepo;

impl VenueRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateVenue,
    ) -> Result<Translated<VenueEntity>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO venues (slug, address, city, capacity) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {VENUE_COLUMNS}"
        );
        let venue: Venue = sqlx::query_as(&query)
            .bind(&input.slug)
            .bind(&input.address)
            .bind(&input.city)
            .bind(input.capacity)
            .fetch_one(&mut *tx)
            .await?;

        for translation in &input.translations {
            upsert_translation(&mut tx, venue.id, translation).await?;
        }
        tx.commit().await?;

        Self::with_all_translations(pool, venue).await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateVenue,
    ) -> Result<Option<Translated<VenueEntity>>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE venues SET \
                 address = COALESCE($2, address), \
                 city = COALESCE($3, city), \
                 capacity = COALESCE($4, capacity), \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {VENUE_COLUMNS}"
        );
        let venue: Option<Venue> = sqlx::query_as(&query)
            .bind(id)
            .bind(input.address.as_deref())
            .bind(input.city.as_deref())
            .bind(input.capacity)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(venue) = venue else {
            return Ok(None);
        };

        for translation in &input.translations {
            upsert_translation(&mut tx, venue.id, translation).await?;
        }
        tx.commit().await?;

        Ok(Some(Self::with_all_translations(pool, venue).await?))
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
        opts: TranslationOpts<'_>,
    ) -> Result<Option<Translated<VenueEntity>>, sqlx::Error> {
        translatable::find_by_id::<VenueEntity>(pool, id, opts).await
    }

    pub async fn paginate(
        pool: &PgPool,
        req: &ListRequest,
        default_locale: &Locale,
    ) -> Result<Page<Translated<VenueEntity>>, sqlx::Error> {
        translatable::paginate::<VenueEntity>(pool, req, default_locale).await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        translatable::delete::<VenueEntity>(pool, id).await
    }

    async fn with_all_translations(
        pool: &PgPool,
        venue: Venue,
    ) -> Result<Translated<VenueEntity>, sqlx::Error> {
        let query =
            format!("SELECT {TRANSLATION_COLUMNS} FROM venue_translations WHERE venue_id = $1");
        let translations: Vec<VenueTranslation> = sqlx::query_as(&query)
            .bind(venue.id)
            .fetch_all(pool)
            .await?;
        Ok(Translated {
            entity: venue,
            translation: None,
            translations: Some(translations),
        })
    }
}

async fn upsert_translation(
    tx: &mut Transaction<'_, Postgres>,
    venue_id: DbId,
    translation: &TranslationUpsert,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO venue_translations (venue_id, locale, name, description) \
         VALUES ($1, $2, $3, $4) \
         ON CONFLICT (venue_id, locale) DO UPDATE \
             SET name = EXCLUDED.name, description = EXCLUDED.description",
    )
    .bind(venue_id)
    .bind(translation.locale.as_str())
    .bind(&translation.name)
    .bind(translation.description.as_deref())
    .execute(&mut **tx)
    .await?;
    Ok(())
}
