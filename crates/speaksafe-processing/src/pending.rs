use speaksafe_core::models::{ProcessedAttachment, WireAttachment};
use uuid::Uuid;

use crate::wire::encode_for_wire;

/// Processed attachments waiting for submission, in selection order.
#[derive(Clone, Debug, Default)]
pub struct PendingAttachments {
    items: Vec<ProcessedAttachment>,
}

impl PendingAttachments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, batch: impl IntoIterator<Item = ProcessedAttachment>) {
        self.items.extend(batch);
    }

    /// Remove by id; returns the removed attachment, if it was pending.
    pub fn remove(&mut self, id: Uuid) -> Option<ProcessedAttachment> {
        let index = self.items.iter().position(|a| a.id == id)?;
        Some(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProcessedAttachment> {
        self.items.iter()
    }

    pub fn total_size(&self) -> usize {
        self.items.iter().map(ProcessedAttachment::size).sum()
    }

    pub fn to_wire(&self) -> Vec<WireAttachment> {
        self.items.iter().map(encode_for_wire).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use speaksafe_core::models::SanitizationLevel;

    fn attachment(name: &str, payload: &'static [u8]) -> ProcessedAttachment {
        ProcessedAttachment {
            id: Uuid::new_v4(),
            name: name.to_string(),
            original_size: payload.len(),
            content_type: "text/plain".to_string(),
            sanitization: SanitizationLevel::None,
            payload: Bytes::from_static(payload),
        }
    }

    #[test]
    fn remove_only_touches_the_given_id() {
        let a = attachment("a.txt", b"aaa");
        let b = attachment("b.txt", b"bb");
        let c = attachment("c.txt", b"c");
        let b_id = b.id;

        let mut pending = PendingAttachments::new();
        pending.extend([a, b, c]);
        assert_eq!(pending.total_size(), 6);

        let removed = pending.remove(b_id).unwrap();
        assert_eq!(removed.name, "b.txt");
        let names: Vec<_> = pending.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["a.txt", "c.txt"]);
        assert!(pending.remove(b_id).is_none());
    }

    #[test]
    fn to_wire_preserves_order_and_clear_empties() {
        let mut pending = PendingAttachments::new();
        pending.extend([attachment("1.txt", b"one")]);
        pending.extend([attachment("2.txt", b"two")]);

        let wire = pending.to_wire();
        assert_eq!(wire[0].filename, "1.txt");
        assert_eq!(wire[1].content, "dHdv");

        pending.clear();
        assert!(pending.is_empty());
        assert_eq!(pending.len(), 0);
    }
}
