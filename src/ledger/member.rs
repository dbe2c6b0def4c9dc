//! Member ledger

use super::errors::{Entity, LedgerError, LedgerResult};
use super::filter::MemberFilter;
use super::loan::LoanLedger;
use crate::model::Member;
use crate::storage::RecordStore;

/// Partial member update; `None` (or an empty string) keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct MemberUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Member ledger over `members.bin`
#[derive(Debug, Clone)]
pub struct MemberLedger {
    store: RecordStore<Member>,
}

impl MemberLedger {
    pub fn new(store: RecordStore<Member>) -> Self {
        Self { store }
    }

    pub fn create(&self, name: &str, phone: &str, address: &str, now: u32) -> LedgerResult<Member> {
        let id = self.store.next_identifier()?;
        let member = Member::new(id, name, phone, address, now);
        self.store.append(&member)?;
        Ok(member)
    }

    pub fn update(&self, id: u32, changes: MemberUpdate, now: u32) -> LedgerResult<Member> {
        let (index, current) = self.locate(id)?;
        let keep = |v: Option<String>, cur: String| v.filter(|s| !s.is_empty()).unwrap_or(cur);

        let updated = Member {
            name: keep(changes.name, current.name),
            phone: keep(changes.phone, current.phone),
            address: keep(changes.address, current.address),
            last_modified: now,
            ..current
        };
        self.store.write_at(index, &updated)?;
        Ok(updated)
    }

    /// Flips `active` off. Refused while the member has any open loan.
    pub fn soft_delete(&self, id: u32, loans: &LoanLedger, now: u32) -> LedgerResult<Member> {
        let (index, current) = self.locate(id)?;

        if !current.active {
            return Err(LedgerError::precondition(format!(
                "member {} is already deleted",
                id
            )));
        }
        if loans.has_open_for_member(id)? {
            return Err(LedgerError::precondition(format!(
                "member {} still has active loans",
                id
            )));
        }

        let deleted = Member {
            active: false,
            last_modified: now,
            ..current
        };
        self.store.write_at(index, &deleted)?;
        Ok(deleted)
    }

    pub fn find_by_id(&self, id: u32) -> LedgerResult<Option<Member>> {
        Ok(self.store.find_by_id(id)?.map(|(_, m)| m))
    }

    pub fn get(&self, id: u32) -> LedgerResult<Member> {
        self.find_by_id(id)?
            .ok_or_else(|| LedgerError::not_found(Entity::Member, id))
    }

    /// Active member with `id`; missing or soft-deleted is `NotFound`.
    pub fn get_active(&self, id: u32) -> LedgerResult<Member> {
        self.store
            .find_active(id)?
            .map(|(_, m)| m)
            .ok_or_else(|| LedgerError::not_found(Entity::Member, id))
    }

    pub fn list_all(&self, include_inactive: bool) -> LedgerResult<Vec<Member>> {
        Ok(self.store.list(include_inactive)?)
    }

    pub fn search(&self, filter: &MemberFilter) -> LedgerResult<Vec<Member>> {
        Ok(self
            .store
            .list(true)?
            .into_iter()
            .filter(|m| filter.matches(m))
            .collect())
    }

    fn locate(&self, id: u32) -> LedgerResult<(u64, Member)> {
        self.store
            .find_by_id(id)?
            .ok_or_else(|| LedgerError::not_found(Entity::Member, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ledgers(dir: &TempDir) -> (MemberLedger, LoanLedger) {
        (
            MemberLedger::new(RecordStore::open(dir.path().join("members.bin")).unwrap()),
            LoanLedger::new(RecordStore::open(dir.path().join("loans.bin")).unwrap()),
        )
    }

    #[test]
    fn test_create_and_get() {
        let dir = TempDir::new().unwrap();
        let (members, _) = ledgers(&dir);

        let ada = members.create("Ada", "555-0100", "London", 5).unwrap();
        assert_eq!(ada.id, 1);
        assert!(ada.active);
        assert_eq!(members.get(1).unwrap(), ada);
        assert_eq!(members.create("Bob", "", "", 6).unwrap().id, 2);
    }

    #[test]
    fn test_partial_update() {
        let dir = TempDir::new().unwrap();
        let (members, _) = ledgers(&dir);
        members.create("Ada", "555-0100", "London", 5).unwrap();

        let updated = members
            .update(
                1,
                MemberUpdate {
                    phone: Some("555-0199".into()),
                    ..Default::default()
                },
                9,
            )
            .unwrap();

        assert_eq!(updated.name, "Ada");
        assert_eq!(updated.phone, "555-0199");
        assert_eq!(updated.address, "London");
        assert_eq!(members.get(1).unwrap().last_modified, 9);
    }

    #[test]
    fn test_soft_delete_blocked_until_loan_closed() {
        let dir = TempDir::new().unwrap();
        let (members, loans) = ledgers(&dir);
        members.create("Ada", "555-0100", "London", 5).unwrap();
        let loan = loans.open(1, 1, 6).unwrap();

        let err = members.soft_delete(1, &loans, 7).unwrap_err();
        assert!(matches!(err, LedgerError::PreconditionViolated(_)));
        assert!(members.get(1).unwrap().active);

        loans.close(loan.id, 8).unwrap();
        let deleted = members.soft_delete(1, &loans, 9).unwrap();
        assert!(!deleted.active);
        assert!(members.list_all(false).unwrap().is_empty());
    }

    #[test]
    fn test_get_active_hides_deleted() {
        let dir = TempDir::new().unwrap();
        let (members, loans) = ledgers(&dir);
        members.create("Ada", "", "", 5).unwrap();
        members.soft_delete(1, &loans, 6).unwrap();

        assert!(members.get(1).is_ok());
        assert!(matches!(
            members.get_active(1),
            Err(LedgerError::NotFound { .. })
        ));
    }
}
