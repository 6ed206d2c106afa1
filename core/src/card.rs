use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CardColor {
    Red,
    Green,
    Blue,
    Yellow,
}

impl CardColor {
    pub const ALL: [CardColor; 4] = [Self::Red, Self::Green, Self::Blue, Self::Yellow];

    pub const fn name(self) -> &'static str {
        use CardColor::*;
        match self {
            Red => "Red",
            Green => "Green",
            Blue => "Blue",
            Yellow => "Yellow",
        }
    }
}

impl fmt::Display for CardColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CardColor {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|color| color.name() == s)
            .ok_or_else(|| GameError::InvalidCardLabel(s.into()))
    }
}

/// Highest number printed on a card.
pub const MAX_CARD_NUMBER: u8 = 9;

/// Card value. Two cards with the same color and number are interchangeable.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Card {
    color: CardColor,
    number: u8,
}

impl Card {
    pub const fn new_unchecked(color: CardColor, number: u8) -> Self {
        Self { color, number }
    }

    pub fn new(color: CardColor, number: u8) -> Result<Self> {
        if number > MAX_CARD_NUMBER {
            return Err(GameError::InvalidCardNumber(number));
        }
        Ok(Self::new_unchecked(color, number))
    }

    pub const fn color(self) -> CardColor {
        self.color
    }

    pub const fn number(self) -> u8 {
        self.number
    }

    /// Key used by rows to match revealed cards, e.g. `Red_3`.
    pub fn identity(self) -> String {
        self.to_string()
    }

    /// Text printed under a player cell, e.g. `3Red`.
    pub fn label(self) -> String {
        format!("{}{}", self.number, self.color)
    }

    /// Parses the text printed under a player cell back into a card.
    pub fn from_label(label: &str) -> Result<Self> {
        let invalid = || GameError::InvalidCardLabel(label.into());
        let mut chars = label.chars();
        let number = chars
            .next()
            .and_then(|digit| digit.to_digit(10))
            .ok_or_else(invalid)?;
        let color = chars.as_str().parse().map_err(|_| invalid())?;
        Self::new(color, number as u8)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.color, self.number)
    }
}

impl FromStr for Card {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || GameError::InvalidCardLabel(s.into());
        let (color, number) = s.split_once('_').ok_or_else(invalid)?;
        let color = color.parse().map_err(|_| invalid())?;
        let number = number.parse().map_err(|_| invalid())?;
        Self::new(color, number)
    }
}
