//! Codec for the flags the storage schema packs into the free-text notes
//! column. Only the persistence boundary should see the raw string.

use serde::{Deserialize, Serialize};

use crate::appointment::Appointment;

pub const JUSTIFICATION_TAG: &str = "LIBERADO COM JUSTIFICATIVA: ";
pub const ONLINE_MARKER: &str = "[ONLINE]";
pub const ARRIVAL_ORDER_MARKER: &str = "[CHEGADA]";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotesFields {
    pub justification: Option<String>,
    pub is_online: bool,
    pub arrival_order: bool,
    pub text: String,
}

impl NotesFields {
    pub fn from_appointment(appointment: &Appointment) -> Self {
        Self {
            justification: appointment.override_justification.clone(),
            is_online: appointment.is_online,
            arrival_order: appointment.is_arrival_order(),
            text: appointment.notes.clone().unwrap_or_default(),
        }
    }

    /// Splits a stored notes string into typed fields.
    ///
    /// The justification block is only recognised at the very start; the
    /// online and arrival-order markers may follow it in either order.
    pub fn parse(raw: &str) -> Self {
        let mut fields = NotesFields::default();
        let mut rest = raw;

        if let Some(after_tag) = rest.strip_prefix(JUSTIFICATION_TAG) {
            let (justification, remainder) = match after_tag.find("\n\n") {
                Some(idx) => (&after_tag[..idx], &after_tag[idx + 2..]),
                None => (after_tag, ""),
            };
            let justification = justification.trim();
            if !justification.is_empty() {
                fields.justification = Some(justification.to_string());
            }
            rest = remainder;
        }

        loop {
            let candidate = rest.trim_start();
            if let Some(after) = candidate.strip_prefix(ONLINE_MARKER) {
                fields.is_online = true;
                rest = after;
            } else if let Some(after) = candidate.strip_prefix(ARRIVAL_ORDER_MARKER) {
                fields.arrival_order = true;
                rest = after;
            } else {
                break;
            }
        }

        fields.text = if fields.is_online || fields.arrival_order {
            rest.trim_start().to_string()
        } else {
            rest.to_string()
        };
        fields
    }

    /// Markers plus free text, without the justification block.
    pub fn body(&self) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(3);
        if self.is_online {
            parts.push(ONLINE_MARKER);
        }
        if self.arrival_order {
            parts.push(ARRIVAL_ORDER_MARKER);
        }
        if !self.text.is_empty() {
            parts.push(&self.text);
        }
        parts.join(" ")
    }

    pub fn render(&self) -> String {
        match &self.justification {
            Some(justification) => compose_override(justification, &self.body()),
            None => self.body(),
        }
    }
}

/// Prefixes `notes` with the override tag. An empty `notes` leaves no
/// trailing blank line.
pub fn compose_override(justification: &str, notes: &str) -> String {
    let justification = normalize_justification(justification);
    if notes.is_empty() {
        format!("{}{}", JUSTIFICATION_TAG, justification)
    } else {
        format!("{}{}\n\n{}", JUSTIFICATION_TAG, justification, notes)
    }
}

/// Trims the text and drops blank lines. A blank line ends the
/// justification block when stored, so it cannot appear inside one.
pub fn normalize_justification(justification: &str) -> String {
    justification
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Notes as shown to people: every marker stripped.
pub fn display_text(raw: &str) -> String {
    NotesFields::parse(raw).text.trim().to_string()
}
