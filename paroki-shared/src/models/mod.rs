/// Database models for the parish portal
///
/// Each model owns its SQL: plain structs deriving `sqlx::FromRow` with
/// associated async functions taking a `&PgPool`.
///
/// # Models
///
/// - `user`: member and administrator accounts
/// - `community`: parish communities (lingkungan)
/// - `announcement`: published/unpublished announcements
/// - `activity`: dated parish activities
/// - `worship_schedule`: worship services assigned to communities
/// - `church_official`: parish officials roster
/// - `user_pdf`: member documents (four slots)
/// - `feedback`: visitor feedback
/// - `finance`: income/expense ledger
///
/// # Example
///
/// ```no_run
/// use paroki_shared::models::announcement::Announcement;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let latest = Announcement::list_published(&pool, 3, 0).await?;
/// # Ok(())
/// # }
/// ```

pub mod activity;
pub mod announcement;
pub mod church_official;
pub mod community;
pub mod feedback;
pub mod finance;
pub mod user;
pub mod user_pdf;
pub mod worship_schedule;
