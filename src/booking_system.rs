//! The booking system: validated access to the bookings stored in the DB.

use sqlx::{Pool, Sqlite};
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    dates::{display_date, to_stored_date},
    db::{self, DBError},
    validate::{validate_date, validate_name},
    Booking,
};

/// What became of a request to make a booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MakeBookingOutcome {
    /// stored under this id
    Created { id: i64 },
    InvalidName,
    InvalidDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    NotFound,
}

/// Shown in place of a column that is NULL in the DB.
pub const MISSING_FIELD: &str = "(missing)";

/// A booking prepared for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingView {
    pub id: i64,
    pub customer_name: String,
    /// e.g. `March 15, 2024`, or the stored text if it is not a valid date
    pub date: String,
    pub service: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingListing {
    Empty,
    Bookings(Vec<BookingView>),
}

/// Owns the one DB handle for the lifetime of the process.
pub struct BookingSystem {
    db: Pool<Sqlite>,
    century_pivot: u8,
}
impl BookingSystem {
    /// Open the DB configured in `config`, creating file and table if needed.
    pub async fn open(config: &Config) -> Result<BookingSystem, DBError> {
        let db = db::connect(&config.db_file).await?;
        Ok(BookingSystem {
            db,
            century_pivot: config.century_pivot,
        })
    }

    /// Store a new booking.
    ///
    /// `customer_name` and `date_raw` are checked again here even though the shell already did;
    /// nothing is written if either check fails. `date_raw` is the `YYMMDD` form.
    pub async fn make_booking(
        &self,
        customer_name: &str,
        date_raw: &str,
        service: &str,
    ) -> Result<MakeBookingOutcome, DBError> {
        if !validate_name(customer_name) {
            debug!("Rejected booking: invalid customer name {customer_name:?}");
            return Ok(MakeBookingOutcome::InvalidName);
        }
        if !validate_date(date_raw) {
            debug!("Rejected booking: invalid date {date_raw:?}");
            return Ok(MakeBookingOutcome::InvalidDate);
        }
        let date = to_stored_date(date_raw);
        let id = db::insert_booking(&self.db, customer_name, &date, service).await?;
        info!("Booking {id} made for {customer_name} on {date}");
        Ok(MakeBookingOutcome::Created { id })
    }

    /// All bookings in the order they were made, with dates ready for display.
    pub async fn view_bookings(&self) -> Result<BookingListing, DBError> {
        let bookings = db::get_all_bookings(&self.db).await?;
        if bookings.is_empty() {
            return Ok(BookingListing::Empty);
        }
        Ok(BookingListing::Bookings(
            bookings
                .into_iter()
                .map(|b| self.to_view(b))
                .collect(),
        ))
    }

    fn to_view(&self, booking: Booking) -> BookingView {
        let date = match booking.date {
            Some(stored) => match display_date(&stored, self.century_pivot) {
                Some(x) => x,
                None => {
                    warn!(
                        "Booking {} has a date that is not a valid YY/MM/DD date: {stored:?}",
                        booking.id
                    );
                    stored
                }
            },
            None => {
                warn!("Booking {} has no date", booking.id);
                MISSING_FIELD.to_owned()
            }
        };
        BookingView {
            id: booking.id,
            customer_name: booking
                .customer_name
                .unwrap_or_else(|| MISSING_FIELD.to_owned()),
            date,
            service: booking.service.unwrap_or_else(|| MISSING_FIELD.to_owned()),
        }
    }

    pub async fn remove_booking(&self, id: i64) -> Result<RemoveOutcome, DBError> {
        if db::delete_booking(&self.db, id).await? {
            info!("Booking {id} removed");
            Ok(RemoveOutcome::Removed)
        } else {
            debug!("Booking {id} not found");
            Ok(RemoveOutcome::NotFound)
        }
    }

    /// Release the DB handle. Consumes the booking system, so this can only happen once.
    pub async fn close_connection(self) {
        self.db.close().await;
        info!("Database connection closed");
    }

    /// Close the DB underneath a live booking system, so every later store call fails.
    #[cfg(test)]
    pub async fn close_db_for_test(&self) {
        self.db.close().await;
    }
}
