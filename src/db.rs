//! All the db-related functions

use std::path::Path;

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};
use tracing::{debug, info};

use crate::Booking;

#[derive(Debug)]
pub enum DBError {
    CannotCreateDirectory(std::io::Error),
    CannotConnect(sqlx::Error),
    CannotCreateTable(sqlx::Error),
    CannotSelectBookings(sqlx::Error),
    CannotInsertBooking(sqlx::Error),
    CannotDeleteBooking(sqlx::Error),
}
impl std::fmt::Display for DBError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::CannotCreateDirectory(e) => {
                write!(f, "Unable to create the directory for the DB. Inner Error: {e}.")
            }
            Self::CannotConnect(e) => {
                write!(f, "Unable to open the DB. Inner Error: {e}.")
            }
            Self::CannotCreateTable(e) => {
                write!(f, "Unable to create the bookings table. Inner Error: {e}.")
            }
            Self::CannotSelectBookings(e) => {
                write!(f, "Unable to select bookings from the DB. Inner Error: {e}.")
            }
            Self::CannotInsertBooking(e) => {
                write!(f, "Unable to insert bookings into the DB. Inner Error: {e}.")
            }
            Self::CannotDeleteBooking(e) => {
                write!(f, "Unable to delete bookings from the DB. Inner Error: {e}.")
            }
        }
    }
}
impl std::error::Error for DBError {}

/// Open (or create) the database at `db_file` and make sure the bookings table exists.
///
/// The pool holds exactly one connection for the whole lifetime of the process.
pub async fn connect(db_file: &Path) -> Result<Pool<Sqlite>, DBError> {
    if let Some(parent) = db_file.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(DBError::CannotCreateDirectory)?;
        }
    }

    let connect_options = SqliteConnectOptions::new()
        .filename(db_file)
        .create_if_missing(true);
    let db = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(connect_options)
        .await
        .map_err(DBError::CannotConnect)?;
    info!("Opened booking database at {}", db_file.display());

    create_table(&db).await?;
    Ok(db)
}

/// Create the bookings table if it does not exist yet. Never drops or alters it.
pub async fn create_table(db: &Pool<Sqlite>) -> Result<(), DBError> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS bookings ( \
            id INTEGER PRIMARY KEY, \
            customer_name TEXT, \
            date TEXT, \
            service TEXT \
        );",
    )
    .execute(db)
    .await
    .map(|_| ())
    .map_err(DBError::CannotCreateTable)
}

/// All bookings in ascending id order.
pub async fn get_all_bookings(db: &Pool<Sqlite>) -> Result<Vec<Booking>, DBError> {
    sqlx::query_as::<_, Booking>(
        "SELECT id, customer_name, date, service FROM bookings ORDER BY id;",
    )
    .fetch_all(db)
    .await
    .map_err(DBError::CannotSelectBookings)
}

/// Insert a booking and commit. Returns the id assigned by the store.
///
/// `date` must already be in its stored `YY/MM/DD` form.
pub async fn insert_booking(
    db: &Pool<Sqlite>,
    customer_name: &str,
    date: &str,
    service: &str,
) -> Result<i64, DBError> {
    let mut tx = db.begin().await.map_err(DBError::CannotInsertBooking)?;
    let id = sqlx::query("INSERT INTO bookings (customer_name, date, service) VALUES (?, ?, ?);")
        .bind(customer_name)
        .bind(date)
        .bind(service)
        .execute(&mut *tx)
        .await
        .map_err(DBError::CannotInsertBooking)?
        .last_insert_rowid();
    tx.commit().await.map_err(DBError::CannotInsertBooking)?;
    debug!("Inserted booking {id}");
    Ok(id)
}

/// Delete the booking with `id`.
///
/// Returns false if no such booking existed. Only a delete that hit a row is committed.
pub async fn delete_booking(db: &Pool<Sqlite>, id: i64) -> Result<bool, DBError> {
    let mut tx = db.begin().await.map_err(DBError::CannotDeleteBooking)?;
    let affected = sqlx::query("DELETE FROM bookings WHERE id = ?;")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(DBError::CannotDeleteBooking)?
        .rows_affected();
    if affected == 0 {
        tx.rollback().await.map_err(DBError::CannotDeleteBooking)?;
        debug!("No booking with id {id}; nothing deleted");
        return Ok(false);
    }
    tx.commit().await.map_err(DBError::CannotDeleteBooking)?;
    debug!("Deleted booking {id}");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn setup_test() -> (TempDir, Pool<Sqlite>) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let db = connect(&dir.path().join("bookings.db"))
            .await
            .expect("Failed to open test database");
        (dir, db)
    }

    #[tokio::test]
    async fn test_connect_creates_missing_directories() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let db_file = dir.path().join("nested").join("data").join("bookings.db");

        let db = connect(&db_file).await.expect("Failed to open database");
        db.close().await;

        assert!(db_file.exists());
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let (_dir, db) = setup_test().await;

        let first = insert_booking(&db, "Alice", "99/12/31", "Haircut").await.unwrap();
        let second = insert_booking(&db, "Bob", "24/03/15", "Shave").await.unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 2);
    }

    #[tokio::test]
    async fn test_get_all_bookings_in_id_order() {
        let (_dir, db) = setup_test().await;
        insert_booking(&db, "Alice", "99/12/31", "Haircut").await.unwrap();
        insert_booking(&db, "Bob", "24/03/15", "Shave").await.unwrap();

        let bookings = get_all_bookings(&db).await.unwrap();

        assert_eq!(bookings.len(), 2);
        assert_eq!(bookings[0].id, 1);
        assert_eq!(bookings[0].customer_name.as_deref(), Some("Alice"));
        assert_eq!(bookings[0].date.as_deref(), Some("99/12/31"));
        assert_eq!(bookings[0].service.as_deref(), Some("Haircut"));
        assert_eq!(bookings[1].id, 2);
        assert_eq!(bookings[1].customer_name.as_deref(), Some("Bob"));
    }

    #[tokio::test]
    async fn test_delete_booking() {
        let (_dir, db) = setup_test().await;
        let id = insert_booking(&db, "Alice", "99/12/31", "Haircut").await.unwrap();

        assert!(delete_booking(&db, id).await.unwrap());
        assert!(get_all_bookings(&db).await.unwrap().is_empty());
        // second delete of the same id finds nothing
        assert!(!delete_booking(&db, id).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_unknown_id_leaves_table_alone() {
        let (_dir, db) = setup_test().await;
        insert_booking(&db, "Alice", "99/12/31", "Haircut").await.unwrap();

        assert!(!delete_booking(&db, 9999).await.unwrap());
        assert!(!delete_booking(&db, -1).await.unwrap());
        assert_eq!(get_all_bookings(&db).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_bookings_persist_across_connections() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let db_file = dir.path().join("bookings.db");

        let db = connect(&db_file).await.unwrap();
        insert_booking(&db, "Alice", "99/12/31", "Haircut").await.unwrap();
        db.close().await;

        // reopening runs CREATE TABLE IF NOT EXISTS again and must keep the rows
        let db = connect(&db_file).await.unwrap();
        let bookings = get_all_bookings(&db).await.unwrap();
        assert_eq!(bookings.len(), 1);
        assert_eq!(bookings[0].customer_name.as_deref(), Some("Alice"));
    }

    #[tokio::test]
    async fn test_get_all_bookings_reads_null_columns() {
        let (_dir, db) = setup_test().await;
        sqlx::query("INSERT INTO bookings (customer_name, date, service) VALUES (NULL, NULL, NULL);")
            .execute(&db)
            .await
            .unwrap();

        let bookings = get_all_bookings(&db).await.unwrap();

        assert_eq!(bookings.len(), 1);
        assert_eq!(bookings[0].customer_name, None);
        assert_eq!(bookings[0].date, None);
        assert_eq!(bookings[0].service, None);
    }
}
