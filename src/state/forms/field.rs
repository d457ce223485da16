//! Form field value objects

use crate::state::TicketPriority;

/// Type-safe field values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Priority(TicketPriority),
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

/// Represents a single form field with its configuration and value
#[derive(Debug, Clone)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub value: FieldValue,
    pub is_multiline: bool,
    /// Rendered as bullets (passwords)
    pub is_secret: bool,
}

impl FormField {
    /// Create a new text field
    pub fn text(name: &str, label: &str, is_multiline: bool) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            value: FieldValue::Text(String::new()),
            is_multiline,
            is_secret: false,
        }
    }

    /// Create a new secret text field
    pub fn secret(name: &str, label: &str) -> Self {
        Self {
            is_secret: true,
            ..Self::text(name, label, false)
        }
    }

    /// Create a new priority field
    pub fn priority(name: &str, label: &str) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            value: FieldValue::Priority(TicketPriority::default()),
            is_multiline: false,
            is_secret: false,
        }
    }

    /// Get the text value (returns empty string for priority fields)
    pub fn as_text(&self) -> &str {
        match &self.value {
            FieldValue::Text(s) => s,
            FieldValue::Priority(_) => "",
        }
    }

    /// Get the priority value (returns the default for text fields)
    pub fn as_priority(&self) -> TicketPriority {
        match &self.value {
            FieldValue::Priority(p) => *p,
            FieldValue::Text(_) => TicketPriority::default(),
        }
    }

    /// Whether the trimmed text is empty
    pub fn is_blank(&self) -> bool {
        self.as_text().trim().is_empty()
    }

    /// Push a character to the field value.
    ///
    /// Priority fields take 1-4 to pick a tier and space to cycle.
    pub fn push_char(&mut self, c: char) {
        match &mut self.value {
            FieldValue::Text(s) => s.push(c),
            FieldValue::Priority(p) => match c {
                ' ' => *p = p.next(),
                _ => {
                    if let Some(picked) = c
                        .to_digit(10)
                        .and_then(|d| (d as usize).checked_sub(1))
                        .and_then(|i| TicketPriority::SELECTABLE.get(i))
                    {
                        *p = *picked;
                    }
                }
            },
        }
    }

    /// Remove the last character from the field value
    pub fn pop_char(&mut self) {
        if let FieldValue::Text(s) = &mut self.value {
            s.pop();
        }
    }

    /// Clear the field value
    pub fn clear(&mut self) {
        match &mut self.value {
            FieldValue::Text(s) => s.clear(),
            FieldValue::Priority(p) => *p = TicketPriority::default(),
        }
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> String {
        match &self.value {
            FieldValue::Text(s) if self.is_secret => "•".repeat(s.chars().count()),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Priority(p) => p.label().to_string(),
        }
    }
}
