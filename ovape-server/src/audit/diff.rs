//! Customer field diff
//!
//! Compares two customer records over `[name, phone, gender, note]` and
//! keeps only the fields whose value changed.

use shared::models::{Customer, CustomerChanges, FieldChange};

fn change<T: PartialEq + Clone>(old: Option<&T>, new: Option<&T>) -> Option<FieldChange<T>> {
    if old == new {
        return None;
    }
    Some(FieldChange {
        old: old.cloned(),
        new: new.cloned(),
    })
}

/// Changed fields between two versions of the same customer
pub fn customer_diff(old: &Customer, new: &Customer) -> CustomerChanges {
    CustomerChanges {
        name: change(Some(&old.name), Some(&new.name)),
        phone: change(Some(&old.phone), Some(&new.phone)),
        gender: change(Some(&old.gender), Some(&new.gender)),
        note: change(old.note.as_ref(), new.note.as_ref()),
    }
}

/// Every populated field, as a diff against an empty record
pub fn customer_created(customer: &Customer) -> CustomerChanges {
    CustomerChanges {
        name: change(None, Some(&customer.name)),
        phone: change(None, Some(&customer.phone)),
        gender: change(None, Some(&customer.gender)),
        note: change(None, customer.note.as_ref()),
    }
}

/// Snapshot of a deleted customer (`new` is empty)
pub fn customer_deleted(customer: &Customer) -> CustomerChanges {
    CustomerChanges {
        name: change(Some(&customer.name), None),
        phone: change(Some(&customer.phone), None),
        gender: change(Some(&customer.gender), None),
        note: change(customer.note.as_ref(), None),
    }
}
