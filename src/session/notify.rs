use time::OffsetDateTime;

use super::workflow::Workflow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub key: Option<Workflow>,
    pub level: Level,
    pub message: String,
    pub at: OffsetDateTime,
}

/// Pending user-facing messages. A keyed message replaces an undelivered
/// one with the same key, so "loading" turns into "done" in place.
#[derive(Debug, Clone, Default)]
pub struct Notifications {
    pending: Vec<Notification>,
}

impl Notifications {
    pub fn push(&mut self, key: Option<Workflow>, level: Level, message: impl Into<String>) {
        let note = Notification {
            key,
            level,
            message: message.into(),
            at: OffsetDateTime::now_utc(),
        };
        let existing = key.and_then(|k| self.pending.iter_mut().find(|n| n.key == Some(k)));
        match existing {
            Some(slot) => *slot = note,
            None => self.pending.push(note),
        }
    }

    /// Drops the undelivered message for `key`, if any.
    pub fn dismiss(&mut self, key: Workflow) {
        self.pending.retain(|n| n.key != Some(key));
    }

    pub fn pending(&self) -> &[Notification] {
        &self.pending
    }

    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyed_messages_replace_in_place() {
        let mut notes = Notifications::default();
        notes.push(Some(Workflow::MealPlan), Level::Loading, "Generating...");
        notes.push(None, Level::Success, "Image selected");
        notes.push(Some(Workflow::MealPlan), Level::Success, "Done");

        let pending = notes.pending();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].level, Level::Success);
        assert_eq!(pending[0].message, "Done");
        assert_eq!(pending[1].key, None);
    }

    #[test]
    fn dismiss_only_removes_the_keyed_message() {
        let mut notes = Notifications::default();
        notes.push(Some(Workflow::PdfExport), Level::Loading, "Generating PDF...");
        notes.push(Some(Workflow::MealPlan), Level::Loading, "Generating...");
        notes.push(None, Level::Success, "Image selected");

        notes.dismiss(Workflow::PdfExport);
        let keys: Vec<_> = notes.pending().iter().map(|n| n.key).collect();
        assert_eq!(keys, vec![Some(Workflow::MealPlan), None]);
    }

    #[test]
    fn unkeyed_messages_accumulate_and_drain_empties() {
        let mut notes = Notifications::default();
        notes.push(None, Level::Error, "a");
        notes.push(None, Level::Error, "a");
        assert_eq!(notes.drain().len(), 2);
        assert!(notes.pending().is_empty());
    }
}
