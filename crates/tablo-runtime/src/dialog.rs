use tablo_types::Record;

/// Transient UI state for create/edit/view/delete actions. Only one
/// dialog is active at a time; opening another replaces it.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DialogState {
    #[default]
    Closed,
    Create,
    Edit(Record),
    View(Record),
    /// Deletion staged, waiting for the user to confirm or cancel.
    ConfirmDelete(Record),
}

impl DialogState {
    pub fn is_open(&self) -> bool {
        !matches!(self, DialogState::Closed)
    }

    /// The record the active dialog is about, when there is one.
    pub fn record(&self) -> Option<&Record> {
        match self {
            DialogState::Edit(record)
            | DialogState::View(record)
            | DialogState::ConfirmDelete(record) => Some(record),
            DialogState::Closed | DialogState::Create => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_one_dialog_at_a_time() {
        let record = Record::new(json!({"id": 1})).unwrap();
        let mut state = DialogState::Create;
        assert!(state.is_open());
        state = DialogState::ConfirmDelete(record.clone());
        assert_eq!(state.record(), Some(&record));
        state = DialogState::Closed;
        assert!(!state.is_open());
        assert_eq!(state.record(), None);
    }
}
