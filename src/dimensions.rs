use crate::config::DEFAULT_CANVAS_SIZE;

/// Choices offered by the resize dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CanvasSizeChoice {
    Small,
    #[default]
    Medium,
    Large,
    Custom,
}

impl CanvasSizeChoice {
    pub const ALL: [Self; 4] = [Self::Small, Self::Medium, Self::Large, Self::Custom];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Small => "Small (400x300)",
            Self::Medium => "Medium (800x600)",
            Self::Large => "Large (1200x900)",
            Self::Custom => "Custom",
        }
    }

    /// Fixed size of a preset; `None` for `Custom`.
    pub fn preset_size(&self) -> Option<(u32, u32)> {
        match self {
            Self::Small => Some((400, 300)),
            Self::Medium => Some((800, 600)),
            Self::Large => Some((1200, 900)),
            Self::Custom => None,
        }
    }
}

/// Outcome of parsing the custom width/height fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedSize {
    pub width: u32,
    pub height: u32,
    /// The entry did not parse and the default size was used instead
    pub fell_back: bool,
}

/// Parse custom width and height entries.
///
/// Anything that is not a whole non-negative number falls back to 800x600
/// for both axes. Zero parses and is rejected later as an invalid dimension.
pub fn resolve_custom(width_text: &str, height_text: &str) -> ResolvedSize {
    match (width_text.trim().parse::<u32>(), height_text.trim().parse::<u32>()) {
        (Ok(width), Ok(height)) => ResolvedSize {
            width,
            height,
            fell_back: false,
        },
        _ => ResolvedSize {
            width: DEFAULT_CANVAS_SIZE.0,
            height: DEFAULT_CANVAS_SIZE.1,
            fell_back: true,
        },
    }
}

/// Resolve a dialog choice to a size. Custom entries are parsed from the text fields.
pub fn resolve_choice(
    choice: CanvasSizeChoice,
    width_text: &str,
    height_text: &str,
) -> ResolvedSize {
    match choice.preset_size() {
        Some((width, height)) => ResolvedSize {
            width,
            height,
            fell_back: false,
        },
        None => resolve_custom(width_text, height_text),
    }
}
