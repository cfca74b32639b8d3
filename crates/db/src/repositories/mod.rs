//! Repositories: one module per entity plus the shared query machinery.
//!
//! All repositories speak the normalized [`ListRequest`]
//! (`danza_core::query::request::ListRequest`) dialect and return the
//! standard pagination envelope. Absence is reported as `Option`/row
//! counts; the HTTP layer maps those to not-found responses.

mod sql;

pub mod paginate;
pub mod translatable;

pub mod album_repo;
pub mod artist_repo;
pub mod course_repo;
pub mod enrollment_repo;
pub mod file_repo;
pub mod lesson_repo;
pub mod payment_repo;
pub mod song_repo;
pub mod user_repo;
pub mod venue_repo;

pub use album_repo::AlbumRepo;
pub use artist_repo::{ArtistDetail, ArtistRepo};
pub use course_repo::{CourseDetail, CourseRepo};
pub use enrollment_repo::EnrollmentRepo;
pub use file_repo::FileRepo;
pub use lesson_repo::LessonRepo;
pub use payment_repo::PaymentRepo;
pub use song_repo::SongRepo;
pub use user_repo::UserRepo;
pub use venue_repo::VenueRepo;

pub use translatable::{Translated, TranslatableEntity, TranslationJoin};
