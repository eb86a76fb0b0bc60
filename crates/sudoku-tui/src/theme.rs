use crossterm::style::Color;

/// Color palette for the solver screen
#[derive(Debug, Clone)]
pub struct Theme {
    /// Background color
    pub bg: Color,
    /// Default text color
    pub fg: Color,
    /// Grid border color
    pub border: Color,
    /// Box border color (3x3 separators)
    pub box_border: Color,
    /// Digit the user entered
    pub entered: Color,
    /// Digit filled in by the solver
    pub solved: Color,
    /// Empty cell placeholder
    pub empty: Color,
    /// Selected cell background
    pub selected_bg: Color,
    /// Same row/column background
    pub highlight_bg: Color,
    /// Button background
    pub button_bg: Color,
    /// Disabled button text
    pub disabled: Color,
    /// Active chooser option and spinner
    pub accent: Color,
    /// Alert modal background
    pub modal_bg: Color,
    /// Alert title color
    pub error: Color,
    /// Secondary text color
    pub info: Color,
    /// Key binding text color
    pub key: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            bg: Color::Rgb { r: 20, g: 22, b: 30 },
            fg: Color::Rgb { r: 230, g: 230, b: 240 },
            border: Color::Rgb { r: 70, g: 75, b: 90 },
            box_border: Color::Rgb { r: 130, g: 140, b: 170 },
            entered: Color::Rgb { r: 255, g: 255, b: 255 },
            solved: Color::Rgb { r: 80, g: 180, b: 255 },
            empty: Color::DarkGrey,
            selected_bg: Color::Rgb { r: 70, g: 90, b: 140 },
            highlight_bg: Color::Rgb { r: 35, g: 40, b: 55 },
            button_bg: Color::Rgb { r: 45, g: 50, b: 68 },
            disabled: Color::Rgb { r: 95, g: 98, b: 110 },
            accent: Color::Rgb { r: 194, g: 65, b: 12 },
            modal_bg: Color::Rgb { r: 30, g: 30, b: 40 },
            error: Color::Rgb { r: 255, g: 90, b: 90 },
            info: Color::Rgb { r: 160, g: 165, b: 185 },
            key: Color::Rgb { r: 255, g: 210, b: 100 },
        }
    }
}
