//! Contact messages with an inbox and an archive.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::storage::{Record, RecordLog, Storage, unique_id};
use crate::error::{PdfOpsError, Result};

/// File name of the inbox.
pub const CONTACTS_FILE: &str = "contacts.json";

/// File name of the archive.
pub const ARCHIVED_CONTACTS_FILE: &str = "contacts_archived.json";

/// A contact form as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    /// Sender's first name.
    pub first_name: String,
    /// Sender's last name.
    pub last_name: String,
    /// Sender's e-mail address.
    pub email: String,
    /// Optional phone number.
    pub phone: Option<String>,
    /// Message subject.
    pub subject: String,
    /// Message body.
    pub message: String,
}

impl ContactForm {
    /// Trim every field, lowercase the e-mail address and drop a blank phone.
    pub fn normalized(self) -> Self {
        Self {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            phone: self
                .phone
                .map(|phone| phone.trim().to_string())
                .filter(|phone| !phone.is_empty()),
            subject: self.subject.trim().to_string(),
            message: self.message.trim().to_string(),
        }
    }

    /// Check required fields on a normalized form.
    ///
    /// # Errors
    ///
    /// Returns [`PdfOpsError::InvalidContact`] naming the first missing or
    /// malformed field.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("first name", &self.first_name),
            ("last name", &self.last_name),
            ("email", &self.email),
            ("subject", &self.subject),
            ("message", &self.message),
        ];

        if let Some((field, _)) = required.iter().find(|(_, value)| value.is_empty()) {
            return Err(PdfOpsError::invalid_contact(format!("{field} is required")));
        }

        if !self.email.contains('@') {
            return Err(PdfOpsError::invalid_contact("email address is invalid"));
        }

        Ok(())
    }
}

/// A stored contact message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    /// Identifier, derived from the submission time.
    pub id: String,
    /// Submitted form, normalized.
    #[serde(flatten)]
    pub form: ContactForm,
    /// Submission time.
    pub timestamp: DateTime<Utc>,
    /// Whether an administrator has read the message.
    #[serde(default)]
    pub seen: bool,
}

impl Record for ContactMessage {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_seen(&self) -> bool {
        self.seen
    }

    fn mark_seen(&mut self) {
        self.seen = true;
    }
}

/// Contact message service.
#[derive(Debug)]
pub struct ContactService<S> {
    inbox: RecordLog<ContactMessage, S>,
    archive: RecordLog<ContactMessage, S>,
}

impl<S: Storage<Vec<ContactMessage>>> ContactService<S> {
    /// Service with separate inbox and archive storage.
    pub fn new(inbox: S, archive: S) -> Self {
        Self {
            inbox: RecordLog::new(inbox),
            archive: RecordLog::new(archive),
        }
    }

    /// Store a message submitted now.
    ///
    /// # Errors
    ///
    /// Returns [`PdfOpsError::InvalidContact`] for an incomplete form, or a
    /// storage error.
    pub fn submit(&self, form: ContactForm) -> Result<ContactMessage> {
        self.submit_at(form, Utc::now())
    }

    /// Store a message submitted at `now`.
    ///
    /// # Errors
    ///
    /// See [`ContactService::submit`].
    pub fn submit_at(&self, form: ContactForm, now: DateTime<Utc>) -> Result<ContactMessage> {
        let form = form.normalized();
        form.validate()?;

        let base_id = format!("msg_{}", now.format("%Y%m%d_%H%M%S%6f"));
        let message = self.inbox.update(|messages| {
            let message = ContactMessage {
                id: unique_id(base_id, messages),
                form,
                timestamp: now,
                seen: false,
            };
            messages.push(message.clone());
            message
        })?;

        info!(id = %message.id, "Contact message stored");
        Ok(message)
    }

    /// Inbox messages, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read.
    pub fn all(&self) -> Result<Vec<ContactMessage>> {
        let mut messages = self.inbox.read_all()?;
        messages.reverse();
        Ok(messages)
    }

    /// Archived messages, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read.
    pub fn archived(&self) -> Result<Vec<ContactMessage>> {
        self.archive.read_all()
    }

    /// Number of unread inbox messages.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read.
    pub fn unseen_count(&self) -> Result<usize> {
        self.inbox.unseen_count()
    }

    /// Flag every inbox message as read. Returns how many were unread.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read or written.
    pub fn mark_all_seen(&self) -> Result<usize> {
        self.inbox.mark_all_seen()
    }

    /// Delete an inbox message. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read or written.
    pub fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.inbox.remove(id)?.is_some())
    }

    /// Move an inbox message to the archive. Returns whether it existed.
    ///
    /// The message is written to the archive before it leaves the inbox.
    ///
    /// # Errors
    ///
    /// Returns an error if either storage cannot be read or written.
    pub fn archive(&self, id: &str) -> Result<bool> {
        let Some(message) = self.inbox.read_all()?.into_iter().find(|m| m.id == id) else {
            return Ok(false);
        };

        self.archive.append(message)?;
        self.inbox.remove(id)?;

        info!(id, "Contact message archived");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::super::storage::{JsonFileStorage, MemoryStorage};
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;
    use tempfile::TempDir;

    fn form() -> ContactForm {
        ContactForm {
            first_name: " Ada ".to_string(),
            last_name: "Lovelace".to_string(),
            email: " Ada@Example.COM ".to_string(),
            phone: Some("   ".to_string()),
            subject: "Merge question".to_string(),
            message: "Can I merge 30 files?".to_string(),
        }
    }

    fn memory_service() -> ContactService<MemoryStorage<Vec<ContactMessage>>> {
        ContactService::new(MemoryStorage::new(), MemoryStorage::new())
    }

    #[test]
    fn test_submit_normalizes() {
        let now = Utc.with_ymd_and_hms(2024, 2, 3, 4, 5, 6).unwrap();
        let message = memory_service().submit_at(form(), now).unwrap();

        assert_eq!(message.id, "msg_20240203_040506000000");
        assert_eq!(message.form.first_name, "Ada");
        assert_eq!(message.form.email, "ada@example.com");
        assert_eq!(message.form.phone, None);
        assert!(!message.seen);
    }

    #[rstest]
    #[case::first_name(ContactForm { first_name: " ".into(), ..form() }, "first name")]
    #[case::last_name(ContactForm { last_name: String::new(), ..form() }, "last name")]
    #[case::subject(ContactForm { subject: String::new(), ..form() }, "subject")]
    #[case::message(ContactForm { message: "\n".into(), ..form() }, "message")]
    #[case::email_missing(ContactForm { email: String::new(), ..form() }, "email")]
    #[case::email_invalid(ContactForm { email: "nobody".into(), ..form() }, "invalid")]
    fn test_submit_rejects_incomplete(#[case] form: ContactForm, #[case] expected: &str) {
        let service = memory_service();
        let err = service.submit(form).unwrap_err();

        assert!(matches!(err, PdfOpsError::InvalidContact { .. }));
        assert!(err.to_string().contains(expected));
        assert!(service.all().unwrap().is_empty());
    }

    #[test]
    fn test_unseen_and_mark_all_seen() {
        let service = memory_service();
        service.submit(form()).unwrap();
        service.submit(form()).unwrap();

        assert_eq!(service.unseen_count().unwrap(), 2);
        assert_eq!(service.mark_all_seen().unwrap(), 2);
        assert_eq!(service.unseen_count().unwrap(), 0);
    }

    #[test]
    fn test_all_is_newest_first() {
        let service = memory_service();
        let older = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let newer = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        service.submit_at(form(), older).unwrap();
        service.submit_at(form(), newer).unwrap();

        let all = service.all().unwrap();
        assert_eq!(all[0].timestamp, newer);
        assert_eq!(all[1].timestamp, older);
    }

    #[test]
    fn test_delete() {
        let service = memory_service();
        let message = service.submit(form()).unwrap();

        assert!(service.delete(&message.id).unwrap());
        assert!(!service.delete(&message.id).unwrap());
        assert!(service.all().unwrap().is_empty());
    }

    #[test]
    fn test_archive_moves_message() {
        let dir = TempDir::new().unwrap();
        let service = ContactService::new(
            JsonFileStorage::new(dir.path().join(CONTACTS_FILE)),
            JsonFileStorage::new(dir.path().join(ARCHIVED_CONTACTS_FILE)),
        );
        let message = service.submit(form()).unwrap();

        assert!(service.archive(&message.id).unwrap());
        assert!(!service.archive(&message.id).unwrap());
        assert!(service.all().unwrap().is_empty());

        let archived = service.archived().unwrap();
        assert_eq!(archived.len(), 1);
        assert_eq!(archived[0].id, message.id);
        assert!(dir.path().join(ARCHIVED_CONTACTS_FILE).exists());
    }
}
