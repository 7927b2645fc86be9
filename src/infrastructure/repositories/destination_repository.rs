//! Destination Persistence
//!
//! A destination is owned by its trip and has no store of its own. A
//! replaced destination is removed on the connection of the trip write
//! that replaces it, see `PgTripRepository::save_replacing_destination`.

use sqlx::PgConnection;

use crate::domain::Destination;
use crate::shared::error::AppError;

/// Delete a stored destination row.
pub(crate) async fn delete_destination(
    conn: &mut PgConnection,
    destination: &Destination,
) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM destinations WHERE id = $1")
        .bind(destination.id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        tracing::debug!(destination_id = destination.id, "Replaced destination already gone");
    }

    Ok(())
}
