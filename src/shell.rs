//! The interactive menu in front of the booking system.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

use crate::{
    booking_system::{BookingListing, BookingSystem, MakeBookingOutcome, RemoveOutcome},
    db::DBError,
    validate::{capitalize, validate_date, validate_name},
};

/// Failures that end the session. Everything else is reported and the menu is shown again.
#[derive(Debug)]
pub enum ShellError {
    /// reading from or writing to the terminal failed
    Io(std::io::Error),
    Db(DBError),
}
impl From<std::io::Error> for ShellError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}
impl From<DBError> for ShellError {
    fn from(value: DBError) -> Self {
        Self::Db(value)
    }
}
impl std::fmt::Display for ShellError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO Error: {e}"),
            Self::Db(e) => write!(f, "DBError: {e}"),
        }
    }
}
impl std::error::Error for ShellError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    MakeBooking,
    ViewBookings,
    RemoveBooking,
    Exit,
}
impl MenuChoice {
    fn parse(input: &str) -> Option<MenuChoice> {
        match input.trim() {
            "1" => Some(Self::MakeBooking),
            "2" => Some(Self::ViewBookings),
            "3" => Some(Self::RemoveBooking),
            "4" => Some(Self::Exit),
            _ => None,
        }
    }
}

const MENU: &str = "1. Make a Booking\n2. View Bookings\n3. Remove a Booking\n4. Exit\n";

pub struct Shell<R, W> {
    input: R,
    output: W,
}
impl<R, W> Shell<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(input: R, output: W) -> Self {
        Shell { input, output }
    }

    /// Run the menu until the user exits or the input ends.
    pub async fn run(&mut self, system: &BookingSystem) -> Result<(), ShellError> {
        info!("Starting interactive session");
        loop {
            self.output.write_all(MENU.as_bytes()).await?;
            let Some(choice) = self.prompt("Enter your choice: ").await? else {
                debug!("Input closed, ending session");
                break;
            };
            match MenuChoice::parse(&choice) {
                Some(MenuChoice::MakeBooking) => {
                    if !self.make_booking(system).await? {
                        break;
                    }
                }
                Some(MenuChoice::ViewBookings) => self.view_bookings(system).await?,
                Some(MenuChoice::RemoveBooking) => {
                    if !self.remove_booking(system).await? {
                        break;
                    }
                }
                Some(MenuChoice::Exit) => break,
                None => {
                    debug!("Invalid menu choice {choice:?}");
                    self.banner("Invalid choice. Please try again").await?;
                }
            }
        }
        info!("Interactive session ended");
        Ok(())
    }

    /// Show `message` and read one line. None once the input is exhausted.
    async fn prompt(&mut self, message: &str) -> Result<Option<String>, ShellError> {
        self.output.write_all(message.as_bytes()).await?;
        self.output.flush().await?;
        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_owned()))
    }

    async fn banner(&mut self, message: &str) -> Result<(), ShellError> {
        self.output
            .write_all(format!("\n------------{message}------------\n").as_bytes())
            .await?;
        self.output.flush().await?;
        Ok(())
    }

    /// Returns false if the input ended halfway through.
    async fn make_booking(&mut self, system: &BookingSystem) -> Result<bool, ShellError> {
        let Some(name) = self.prompt("Enter customer name: ").await? else {
            return Ok(false);
        };
        let name = capitalize(&name);
        if !validate_name(&name) {
            self.banner("Invalid name. Use letters only").await?;
            return Ok(true);
        }
        let Some(date) = self.prompt("Enter booking date (YYMMDD): ").await? else {
            return Ok(false);
        };
        let date = date.trim();
        if !validate_date(date) {
            self.banner("Invalid date. Use the format YYMMDD").await?;
            return Ok(true);
        }
        let Some(service) = self.prompt("Enter service: ").await? else {
            return Ok(false);
        };
        let service = capitalize(&service);

        match system.make_booking(&name, date, &service).await? {
            MakeBookingOutcome::Created { .. } => self.banner("Booking successful!").await?,
            MakeBookingOutcome::InvalidName => {
                self.banner("Invalid name. Use letters only").await?
            }
            MakeBookingOutcome::InvalidDate => {
                self.banner("Invalid date. Use the format YYMMDD").await?
            }
        }
        Ok(true)
    }

    async fn view_bookings(&mut self, system: &BookingSystem) -> Result<(), ShellError> {
        match system.view_bookings().await? {
            BookingListing::Empty => self.banner("No bookings found").await?,
            BookingListing::Bookings(bookings) => {
                let mut text = String::from("\n");
                for b in bookings {
                    text.push_str(&format!(
                        "ID: {}\nCustomer: {}\nDate: {}\nService: {}\n\n",
                        b.id, b.customer_name, b.date, b.service
                    ));
                }
                self.output.write_all(text.as_bytes()).await?;
                self.output.flush().await?;
            }
        }
        Ok(())
    }

    /// Returns false if the input ended before an id was entered.
    async fn remove_booking(&mut self, system: &BookingSystem) -> Result<bool, ShellError> {
        let Some(raw_id) = self.prompt("Enter booking ID to remove: ").await? else {
            return Ok(false);
        };
        let id = match raw_id.trim().parse::<i64>() {
            Ok(x) => x,
            Err(e) => {
                debug!("Booking ID {raw_id:?} is not an integer: {e}");
                self.banner("Invalid booking ID. Please enter a number").await?;
                return Ok(true);
            }
        };
        match system.remove_booking(id).await? {
            RemoveOutcome::Removed => self.banner("Booking removed successfully!").await?,
            RemoveOutcome::NotFound => {
                self.banner("Booking not found. No changes made").await?
            }
        }
        Ok(true)
    }
}
