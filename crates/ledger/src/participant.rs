use serde::{Deserialize, Serialize};

use splitledger_core::{DomainError, Entity, ParticipantId, ValueObject};

/// Default display colours, handed out round-robin as participants join.
pub const PALETTE: [&str; 10] = [
    "#ef4444", "#f97316", "#eab308", "#22c55e", "#06b6d4", "#3b82f6", "#8b5cf6", "#ec4899",
    "#f43f5e", "#84cc16",
];

/// Display colour. Cosmetic only.
///
/// New colours go through [`Color::parse`]; stored colours are read back
/// verbatim so an odd value never blocks loading a group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Color(String);

impl Color {
    /// Accepts `#rrggbb` (any case), normalised to lowercase.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let hex = value
            .strip_prefix('#')
            .ok_or_else(|| DomainError::validation(format!("colour must start with '#': {value}")))?;
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(DomainError::validation(format!(
                "colour must be #rrggbb: {value}"
            )));
        }
        Ok(Self(value.to_ascii_lowercase()))
    }

    /// Palette colour for the `index`-th participant (wraps around).
    pub fn from_palette(index: usize) -> Self {
        Self(PALETTE[index % PALETTE.len()].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Color {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.0
    }
}

impl core::fmt::Display for Color {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl ValueObject for Color {}

/// A member of the group who can pay for and share expenses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub color: Color,
}

impl Participant {
    pub fn new(id: ParticipantId, name: impl Into<String>, color: Color) -> Self {
        Self {
            id,
            name: name.into(),
            color,
        }
    }

    /// Case-insensitive name comparison used for uniqueness checks.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }
}

impl Entity for Participant {
    type Id = ParticipantId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
