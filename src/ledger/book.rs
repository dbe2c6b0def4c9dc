//! Book ledger
//!
//! Every lookup is a full scan (first match on identifier); updates
//! rewrite the matched slot in place.

use super::errors::{Entity, LedgerError, LedgerResult};
use super::filter::BookFilter;
use super::loan::LoanLedger;
use crate::model::Book;
use crate::storage::RecordStore;

/// Partial book update; `None` (or an empty string) keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct BookUpdate {
    pub title: Option<String>,
    pub author: Option<String>,
    pub year: Option<u16>,
    pub total: Option<u16>,
}

/// Book ledger over `books.bin`
#[derive(Debug, Clone)]
pub struct BookLedger {
    store: RecordStore<Book>,
}

impl BookLedger {
    pub fn new(store: RecordStore<Book>) -> Self {
        Self { store }
    }

    /// Appends a new active book with `available = total`.
    pub fn create(
        &self,
        title: &str,
        author: &str,
        year: u16,
        total: u16,
        now: u32,
    ) -> LedgerResult<Book> {
        let id = self.store.next_identifier()?;
        let book = Book::new(id, title, author, year, total, now);
        self.store.append(&book)?;
        Ok(book)
    }

    /// Applies a partial update.
    ///
    /// Changing `total` moves `available` by the same delta, clamped at 0:
    /// copies out on loan beyond the new total are not tracked as a deficit.
    pub fn update(&self, id: u32, changes: BookUpdate, now: u32) -> LedgerResult<Book> {
        let (index, current) = self.locate(id)?;

        let total = changes.total.unwrap_or(current.total);
        let delta = i32::from(total) - i32::from(current.total);
        let available = (i32::from(current.available) + delta).clamp(0, i32::from(u16::MAX));

        let updated = Book {
            title: non_empty_or(changes.title, current.title),
            author: non_empty_or(changes.author, current.author),
            year: changes.year.unwrap_or(current.year),
            total,
            available: available as u16,
            last_modified: now,
            ..current
        };
        self.store.write_at(index, &updated)?;
        Ok(updated)
    }

    /// Flips `active` off. Refused while any open loan references the book.
    pub fn soft_delete(&self, id: u32, loans: &LoanLedger, now: u32) -> LedgerResult<Book> {
        let (index, current) = self.locate(id)?;

        if !current.active {
            return Err(LedgerError::precondition(format!(
                "book {} is already deleted",
                id
            )));
        }
        if loans.has_open_for_book(id)? {
            return Err(LedgerError::precondition(format!(
                "book {} has active loans",
                id
            )));
        }

        let deleted = Book {
            active: false,
            last_modified: now,
            ..current
        };
        self.store.write_at(index, &deleted)?;
        Ok(deleted)
    }

    /// Takes one copy off the shelf. The borrow flow checks `available > 0`
    /// before calling.
    pub fn decrement_available(&self, id: u32, now: u32) -> LedgerResult<Book> {
        self.adjust_available(id, now, |n| n.saturating_sub(1))
    }

    /// Puts one copy back on the shelf.
    pub fn increment_available(&self, id: u32, now: u32) -> LedgerResult<Book> {
        self.adjust_available(id, now, |n| n.saturating_add(1))
    }

    /// Overwrites the availability counter; used by reconciliation.
    pub(crate) fn set_available(&self, id: u32, available: u16, now: u32) -> LedgerResult<Book> {
        self.adjust_available(id, now, |_| available)
    }

    fn adjust_available<F>(&self, id: u32, now: u32, f: F) -> LedgerResult<Book>
    where
        F: FnOnce(u16) -> u16,
    {
        let (index, current) = self.locate(id)?;
        let updated = Book {
            available: f(current.available),
            last_modified: now,
            ..current
        };
        self.store.write_at(index, &updated)?;
        Ok(updated)
    }

    /// Book with `id`, active or not.
    pub fn find_by_id(&self, id: u32) -> LedgerResult<Option<Book>> {
        Ok(self.store.find_by_id(id)?.map(|(_, b)| b))
    }

    /// Like `find_by_id`, but a missing book is `NotFound`.
    pub fn get(&self, id: u32) -> LedgerResult<Book> {
        self.find_by_id(id)?
            .ok_or_else(|| LedgerError::not_found(Entity::Book, id))
    }

    /// Active book with `id`; missing or soft-deleted is `NotFound`.
    pub fn get_active(&self, id: u32) -> LedgerResult<Book> {
        self.store
            .find_active(id)?
            .map(|(_, b)| b)
            .ok_or_else(|| LedgerError::not_found(Entity::Book, id))
    }

    pub fn list_all(&self, include_inactive: bool) -> LedgerResult<Vec<Book>> {
        Ok(self.store.list(include_inactive)?)
    }

    pub fn search(&self, filter: &BookFilter) -> LedgerResult<Vec<Book>> {
        Ok(self
            .store
            .list(true)?
            .into_iter()
            .filter(|b| filter.matches(b))
            .collect())
    }

    fn locate(&self, id: u32) -> LedgerResult<(u64, Book)> {
        self.store
            .find_by_id(id)?
            .ok_or_else(|| LedgerError::not_found(Entity::Book, id))
    }
}

fn non_empty_or(value: Option<String>, current: String) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::StatusFilter;
    use crate::storage::RecordStore;
    use tempfile::TempDir;

    fn ledgers(dir: &TempDir) -> (BookLedger, LoanLedger) {
        (
            BookLedger::new(RecordStore::open(dir.path().join("books.bin")).unwrap()),
            LoanLedger::new(RecordStore::open(dir.path().join("loans.bin")).unwrap()),
        )
    }

    #[test]
    fn test_create_assigns_sequential_ids() {
        let dir = TempDir::new().unwrap();
        let (books, _) = ledgers(&dir);

        let a = books.create("Dune", "Herbert", 1965, 2, 10).unwrap();
        let b = books.create("Emma", "Austen", 1815, 1, 11).unwrap();

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(a.available, 2);
        assert_eq!(books.get(1).unwrap(), a);
    }

    #[test]
    fn test_update_keeps_unset_fields() {
        let dir = TempDir::new().unwrap();
        let (books, _) = ledgers(&dir);
        books.create("Dune", "Herbert", 1965, 2, 10).unwrap();

        let updated = books
            .update(
                1,
                BookUpdate {
                    title: Some("Dune (2nd ed.)".into()),
                    author: Some(String::new()),
                    ..Default::default()
                },
                20,
            )
            .unwrap();

        assert_eq!(updated.title, "Dune (2nd ed.)");
        assert_eq!(updated.author, "Herbert");
        assert_eq!(updated.year, 1965);
        assert_eq!(updated.last_modified, 20);
        assert_eq!(books.get(1).unwrap(), updated);
    }

    #[test]
    fn test_growing_total_grows_available() {
        let dir = TempDir::new().unwrap();
        let (books, _) = ledgers(&dir);
        books.create("Dune", "Herbert", 1965, 3, 10).unwrap();
        books.decrement_available(1, 11).unwrap();

        let updated = books
            .update(
                1,
                BookUpdate {
                    total: Some(5),
                    ..Default::default()
                },
                12,
            )
            .unwrap();
        assert_eq!(updated.total, 5);
        assert_eq!(updated.available, 4);
    }

    #[test]
    fn test_shrinking_total_clamps_available_at_zero() {
        let dir = TempDir::new().unwrap();
        let (books, _) = ledgers(&dir);
        books.create("Dune", "Herbert", 1965, 3, 10).unwrap();
        books.decrement_available(1, 11).unwrap();
        books.decrement_available(1, 11).unwrap();

        let updated = books
            .update(
                1,
                BookUpdate {
                    total: Some(1),
                    ..Default::default()
                },
                12,
            )
            .unwrap();
        assert_eq!(updated.total, 1);
        assert_eq!(updated.available, 0);
    }

    #[test]
    fn test_update_missing_book() {
        let dir = TempDir::new().unwrap();
        let (books, _) = ledgers(&dir);
        let err = books.update(3, BookUpdate::default(), 1).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::NotFound {
                entity: Entity::Book,
                id: 3
            }
        ));
    }

    #[test]
    fn test_soft_delete_blocked_by_open_loan() {
        let dir = TempDir::new().unwrap();
        let (books, loans) = ledgers(&dir);
        books.create("Dune", "Herbert", 1965, 1, 10).unwrap();
        loans.open(1, 1, 11).unwrap();

        let err = books.soft_delete(1, &loans, 12).unwrap_err();
        assert!(matches!(err, LedgerError::PreconditionViolated(_)));
        assert!(books.get(1).unwrap().active);
    }

    #[test]
    fn test_soft_delete_keeps_counters() {
        let dir = TempDir::new().unwrap();
        let (books, loans) = ledgers(&dir);
        books.create("Dune", "Herbert", 1965, 2, 10).unwrap();

        let deleted = books.soft_delete(1, &loans, 12).unwrap();
        assert!(!deleted.active);
        assert_eq!(deleted.total, 2);
        assert_eq!(deleted.available, 2);

        assert!(books.list_all(false).unwrap().is_empty());
        assert_eq!(books.list_all(true).unwrap().len(), 1);
        assert!(matches!(
            books.get_active(1),
            Err(LedgerError::NotFound { .. })
        ));
    }

    #[test]
    fn test_soft_delete_twice_is_rejected() {
        let dir = TempDir::new().unwrap();
        let (books, loans) = ledgers(&dir);
        books.create("Dune", "Herbert", 1965, 2, 10).unwrap();
        books.soft_delete(1, &loans, 12).unwrap();

        let err = books.soft_delete(1, &loans, 13).unwrap_err();
        assert!(err.to_string().contains("already deleted"));
    }

    #[test]
    fn test_search() {
        let dir = TempDir::new().unwrap();
        let (books, loans) = ledgers(&dir);
        books.create("Dune", "Herbert", 1965, 1, 10).unwrap();
        books.create("Children of Dune", "Herbert", 1976, 1, 10).unwrap();
        books.create("Emma", "Austen", 1815, 1, 10).unwrap();
        books.soft_delete(2, &loans, 11).unwrap();

        let all_dune = books
            .search(&BookFilter {
                title: Some("dune".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(all_dune.len(), 2);

        let active_dune = books
            .search(&BookFilter {
                title: Some("dune".into()),
                status: StatusFilter::Active,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(active_dune.len(), 1);
        assert_eq!(active_dune[0].id, 1);
    }
}
