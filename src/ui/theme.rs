use crate::canvas::{Paint, Role};
use crate::state::NOTE_COLORS;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Theme color palette defining all colors used in the application.
///
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    // Canvas colors
    pub paper: ColorSpec,
    pub ink: ColorSpec,
    pub muted: ColorSpec,
    pub rule: ColorSpec,
    pub accent: ColorSpec,
    pub star: ColorSpec,
    pub caret: ColorSpec,
    pub notes: [ColorSpec; NOTE_COLORS as usize],

    // Panel colors
    pub border: ColorSpec,
    pub text: ColorSpec,
    pub error: ColorSpec,
    pub footer: ColorSpec,
}

/// Color specification that can be serialized/deserialized.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSpec {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorSpec {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        ColorSpec { r, g, b }
    }

    pub fn to_color(&self) -> Color {
        Color::Rgb(self.r, self.g, self.b)
    }

    /// Mix towards `other`; `level` 255 keeps this colour, 0 yields `other`.
    ///
    pub fn blend(&self, other: &ColorSpec, level: u8) -> ColorSpec {
        let mix = |a: u8, b: u8| -> u8 {
            let level = level as u32;
            ((a as u32 * level + b as u32 * (255 - level)) / 255) as u8
        };
        ColorSpec::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl Theme {
    /// Return the palette for the dark or light mode.
    ///
    pub fn for_mode(dark: bool) -> Self {
        if dark {
            Self::dark()
        } else {
            Self::light()
        }
    }

    /// Paper notepad: cream page, blue rules, red margin accents.
    ///
    pub fn light() -> Self {
        Theme {
            name: "light".to_string(),
            paper: ColorSpec::new(253, 250, 236),
            ink: ColorSpec::new(40, 40, 48),
            muted: ColorSpec::new(140, 136, 128),
            rule: ColorSpec::new(170, 200, 230),
            accent: ColorSpec::new(200, 60, 60),
            star: ColorSpec::new(214, 160, 20),
            caret: ColorSpec::new(40, 40, 48),
            notes: [
                ColorSpec::new(255, 238, 128), // Yellow
                ColorSpec::new(255, 188, 210), // Pink
                ColorSpec::new(180, 230, 190), // Green
                ColorSpec::new(175, 210, 250), // Blue
            ],
            border: ColorSpec::new(160, 150, 140),
            text: ColorSpec::new(40, 40, 48),
            error: ColorSpec::new(180, 40, 40),
            footer: ColorSpec::new(100, 96, 90),
        }
    }

    /// Blackboard: slate page, chalk ink, muted notes.
    ///
    pub fn dark() -> Self {
        Theme {
            name: "dark".to_string(),
            paper: ColorSpec::new(34, 36, 42),
            ink: ColorSpec::new(226, 224, 216),
            muted: ColorSpec::new(120, 122, 130),
            rule: ColorSpec::new(58, 70, 92),
            accent: ColorSpec::new(235, 111, 146),
            star: ColorSpec::new(246, 193, 119),
            caret: ColorSpec::new(226, 224, 216),
            notes: [
                ColorSpec::new(150, 130, 40), // Yellow
                ColorSpec::new(150, 70, 100), // Pink
                ColorSpec::new(60, 120, 80),  // Green
                ColorSpec::new(60, 90, 140),  // Blue
            ],
            border: ColorSpec::new(90, 92, 104),
            text: ColorSpec::new(226, 224, 216),
            error: ColorSpec::new(235, 111, 146),
            footer: ColorSpec::new(150, 150, 160),
        }
    }

    pub fn role(&self, role: Role) -> ColorSpec {
        match role {
            Role::Ink => self.ink,
            Role::Muted => self.muted,
            Role::Paper => self.paper,
            Role::Rule => self.rule,
            Role::Accent => self.accent,
            Role::Star => self.star,
            Role::Caret => self.caret,
            Role::Note(index) => self.notes[index as usize % self.notes.len()],
        }
    }

    /// Resolve an item paint to a terminal colour.
    ///
    pub fn resolve(&self, paint: Paint) -> Color {
        match paint {
            Paint::Solid(role) => self.role(role).to_color(),
            Paint::Faded { role, level } => self.role(role).blend(&self.paper, level).to_color(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faded_paint_blends_towards_paper() {
        let theme = Theme::light();
        assert_eq!(theme.resolve(Paint::Faded { role: Role::Ink, level: 255 }), theme.ink.to_color());
        assert_eq!(theme.resolve(Paint::Faded { role: Role::Ink, level: 0 }), theme.paper.to_color());
        let half = theme.role(Role::Ink).blend(&theme.paper, 128);
        assert!(half.r > theme.ink.r && half.r < theme.paper.r);
    }

    #[test]
    fn note_colors_wrap_around() {
        let theme = Theme::dark();
        assert_eq!(theme.role(Role::Note(NOTE_COLORS)), theme.notes[0]);
        assert_eq!(Theme::for_mode(true).name, "dark");
        assert_eq!(Theme::for_mode(false).name, "light");
    }
}
