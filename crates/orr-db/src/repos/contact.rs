//! Contact-form message repository.

use chrono::Utc;

use orr_core::entities::ContactMessage;
use orr_core::ids::PREFIX_CONTACT;
use orr_core::inputs::ContactInput;

use crate::error::DatabaseError;
use crate::helpers::{get_bool, parse_datetime};
use crate::service::OrrService;

const SELECT_COLS: &str = "id, name, email, subject, message, is_read, created_at";

fn row_to_message(row: &libsql::Row) -> Result<ContactMessage, DatabaseError> {
    Ok(ContactMessage {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        subject: row.get(3)?,
        message: row.get(4)?,
        is_read: get_bool(row, 5)?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

impl OrrService {
    /// Validate and store a message sent through the contact form.
    pub async fn create_contact_message(
        &self,
        input: ContactInput,
    ) -> Result<ContactMessage, DatabaseError> {
        input.validate()?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_CONTACT).await?;
        let email = input.email.trim().to_string();
        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO contact_messages ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6)"),
                libsql::params![
                    id.as_str(),
                    input.name.as_str(),
                    email.as_str(),
                    input.subject.as_str(),
                    input.message.as_str(),
                    now.to_rfc3339()
                ],
            )
            .await?;
        tracing::debug!(%id, "contact message stored");

        Ok(ContactMessage {
            id,
            name: input.name,
            email,
            subject: input.subject,
            message: input.message,
            is_read: false,
            created_at: now,
        })
    }

    /// All messages, newest first.
    pub async fn list_contact_messages(&self) -> Result<Vec<ContactMessage>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM contact_messages ORDER BY created_at DESC"),
                (),
            )
            .await?;
        let mut messages = Vec::new();
        while let Some(row) = rows.next().await? {
            messages.push(row_to_message(&row)?);
        }
        Ok(messages)
    }

    pub async fn mark_contact_message_read(&self, id: &str) -> Result<(), DatabaseError> {
        let changed = self
            .db()
            .conn()
            .execute("UPDATE contact_messages SET is_read = 1 WHERE id = ?1", [id])
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }
        Ok(())
    }
}
