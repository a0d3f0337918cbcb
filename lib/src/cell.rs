use std::fmt::{Display, Formatter};

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Cell {
    /// Open ground; the only kind of cell a new wall may land on.
    #[default]
    Grass,
    /// Pre-existing blockage, never open and never wallable.
    Rock,
    /// The horse. Open like grass, but walling it over is not an option.
    Horse,
}

impl TryFrom<char> for Cell {
    /// The offending character.
    type Error = char;

    fn try_from(ch: char) -> Result<Self, char> {
        match ch {
            '.' => Ok(Self::Grass),
            '#' => Ok(Self::Rock),
            'H' => Ok(Self::Horse),
            other => Err(other),
        }
    }
}

impl Cell {
    pub(crate) fn to_char(self) -> char {
        match self {
            Self::Grass => '.',
            Self::Rock => '#',
            Self::Horse => 'H',
        }
    }

    /// Open cells admit the horse's flood fill.
    pub fn is_open(self) -> bool {
        matches!(self, Self::Grass | Self::Horse)
    }

    /// Only grass may receive a new wall.
    pub fn is_wallable(self) -> bool {
        matches!(self, Self::Grass)
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_char())
    }
}
