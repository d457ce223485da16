//! Form structs for login, registration and standard ticket creation

use super::field::FormField;
use crate::api::{Credentials, NewTicket, Registration};

/// Trait for common form operations
pub trait Form {
    fn field_count(&self) -> usize;
    fn active_field(&self) -> usize;
    fn set_active_field(&mut self, index: usize);
    fn next_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        self.set_active_field((current + 1) % count);
    }
    fn prev_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        if current == 0 {
            self.set_active_field(count - 1);
        } else {
            self.set_active_field(current - 1);
        }
    }
    fn get_active_field_mut(&mut self) -> &mut FormField;
    fn get_field(&self, index: usize) -> Option<&FormField>;
}

// Login Form
#[derive(Debug, Clone)]
pub struct LoginForm {
    pub email: FormField,
    pub password: FormField,
    pub active_field_index: usize,
}

impl LoginForm {
    pub fn new() -> Self {
        Self {
            email: FormField::text("email", "Email", false),
            password: FormField::secret("password", "Password"),
            active_field_index: 0,
        }
    }

    /// Credentials if both fields are filled
    pub fn credentials(&self) -> Result<Credentials, &'static str> {
        if self.email.is_blank() || self.password.as_text().is_empty() {
            return Err("Email and password are required");
        }
        Ok(Credentials {
            email: self.email.as_text().trim().to_string(),
            password: self.password.as_text().to_string(),
        })
    }
}

impl Default for LoginForm {
    fn default() -> Self {
        Self::new()
    }
}

impl Form for LoginForm {
    fn field_count(&self) -> usize {
        2
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(1);
    }
    fn get_active_field_mut(&mut self) -> &mut FormField {
        match self.active_field_index {
            0 => &mut self.email,
            _ => &mut self.password,
        }
    }
    fn get_field(&self, index: usize) -> Option<&FormField> {
        match index {
            0 => Some(&self.email),
            1 => Some(&self.password),
            _ => None,
        }
    }
}

// Register Form
#[derive(Debug, Clone)]
pub struct RegisterForm {
    pub name: FormField,
    pub email: FormField,
    pub password: FormField,
    pub active_field_index: usize,
}

impl RegisterForm {
    pub fn new() -> Self {
        Self {
            name: FormField::text("name", "Name", false),
            email: FormField::text("email", "Email", false),
            password: FormField::secret("password", "Password"),
            active_field_index: 0,
        }
    }

    /// Registration payload if the form is complete
    pub fn registration(&self) -> Result<Registration, &'static str> {
        if self.name.is_blank() || self.email.is_blank() || self.password.as_text().is_empty() {
            return Err("Name, email and password are required");
        }
        if !self.email.as_text().contains('@') {
            return Err("Please enter a valid email address");
        }
        Ok(Registration {
            name: self.name.as_text().trim().to_string(),
            email: self.email.as_text().trim().to_string(),
            password: self.password.as_text().to_string(),
        })
    }
}

impl Default for RegisterForm {
    fn default() -> Self {
        Self::new()
    }
}

impl Form for RegisterForm {
    fn field_count(&self) -> usize {
        3
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(2);
    }
    fn get_active_field_mut(&mut self) -> &mut FormField {
        match self.active_field_index {
            0 => &mut self.name,
            1 => &mut self.email,
            _ => &mut self.password,
        }
    }
    fn get_field(&self, index: usize) -> Option<&FormField> {
        match index {
            0 => Some(&self.name),
            1 => Some(&self.email),
            2 => Some(&self.password),
            _ => None,
        }
    }
}

// Ticket Create Form
#[derive(Debug, Clone)]
pub struct TicketCreateForm {
    pub title: FormField,
    pub description: FormField,
    pub priority: FormField,
    pub location: FormField,
    pub active_field_index: usize,
}

impl TicketCreateForm {
    pub fn new() -> Self {
        Self {
            title: FormField::text("title", "Title", false),
            description: FormField::text("description", "Description", true),
            priority: FormField::priority("priority", "Priority (1-4, Space to cycle)"),
            location: FormField::text("location", "Location", false),
            active_field_index: 0,
        }
    }

    /// Ticket body if the required fields are filled
    pub fn new_ticket(&self) -> Result<NewTicket, &'static str> {
        if self.title.is_blank() || self.description.is_blank() || self.location.is_blank() {
            return Err("Title, description and location are required");
        }
        Ok(NewTicket {
            title: self.title.as_text().trim().to_string(),
            description: self.description.as_text().to_string(),
            priority: self.priority.as_priority(),
            location: self.location.as_text().trim().to_string(),
        })
    }
}

impl Default for TicketCreateForm {
    fn default() -> Self {
        Self::new()
    }
}

impl Form for TicketCreateForm {
    fn field_count(&self) -> usize {
        4
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(3);
    }
    fn get_active_field_mut(&mut self) -> &mut FormField {
        match self.active_field_index {
            0 => &mut self.title,
            1 => &mut self.description,
            2 => &mut self.priority,
            _ => &mut self.location,
        }
    }
    fn get_field(&self, index: usize) -> Option<&FormField> {
        match index {
            0 => Some(&self.title),
            1 => Some(&self.description),
            2 => Some(&self.priority),
            3 => Some(&self.location),
            _ => None,
        }
    }
}
