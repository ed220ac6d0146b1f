use crate::model::{PlayerInput, PlayerStatus, UNKNOWN_BREED};

pub const REQUIRED_FIELDS_MESSAGE: &str = "Please fill in all required fields.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Name,
    ImageUrl,
    Breed,
    Status,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::Name,
        FormField::ImageUrl,
        FormField::Breed,
        FormField::Status,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => "Player Name",
            FormField::ImageUrl => "Image URL",
            FormField::Breed => "Breed",
            FormField::Status => "Status",
        }
    }

    pub fn required(self) -> bool {
        matches!(self, FormField::Name | FormField::ImageUrl)
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingFields {
    pub name: bool,
    pub image_url: bool,
}

/// Data-entry state for a new roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CreateForm {
    pub name: String,
    pub image_url: String,
    pub breed: String,
    pub status: PlayerStatus,
    pub focus: FormField,
}

impl CreateForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trimmed candidate, or which required inputs are blank.
    pub fn submission(&self) -> Result<PlayerInput, MissingFields> {
        let name = self.name.trim();
        let image_url = self.image_url.trim();
        if name.is_empty() || image_url.is_empty() {
            return Err(MissingFields {
                name: name.is_empty(),
                image_url: image_url.is_empty(),
            });
        }
        let breed = match self.breed.trim() {
            "" => UNKNOWN_BREED,
            breed => breed,
        };
        Ok(PlayerInput {
            name: name.to_string(),
            image_url: image_url.to_string(),
            breed: breed.to_string(),
            status: self.status,
        })
    }

    pub fn field_value(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::ImageUrl => &self.image_url,
            FormField::Breed => &self.breed,
            FormField::Status => self.status.as_str(),
        }
    }

    pub fn push_char(&mut self, ch: char) {
        if let Some(buf) = self.focused_text_mut() {
            buf.push(ch);
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(buf) = self.focused_text_mut() {
            buf.pop();
        }
    }

    pub fn toggle_status(&mut self) {
        self.status = self.status.toggle();
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    fn focused_text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            FormField::Name => Some(&mut self.name),
            FormField::ImageUrl => Some(&mut self.image_url),
            FormField::Breed => Some(&mut self.breed),
            FormField::Status => None,
        }
    }
}
