//! Observability for shelfdb
//!
//! Structured JSON-line logging of typed domain events. Logging is
//! read-only: it never changes the outcome of the operation it describes.
//!
//! ```ignore
//! use shelfdb::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::LoanOpened, &[("loan_id", "3")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity, LOG_LEVEL_ENV};

/// Log a domain event
pub fn log_event(event: Event) {
    log_event_with_fields(event, &[]);
}

/// Log a domain event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    let severity = if event.is_warning() {
        Severity::Warn
    } else {
        Severity::Info
    };
    Logger::log(severity, event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event() {
        log_event(Event::LibraryOpened);
        log_event(Event::ReconcileComplete);
    }

    #[test]
    fn test_log_event_with_fields() {
        log_event_with_fields(Event::BookCreated, &[("book_id", "1"), ("title", "Dune")]);
    }
}
