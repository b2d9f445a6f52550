use ratatui::style::Color;

/// Runtime palette for the carousel
#[derive(Debug, Clone)]
pub struct Theme {
    // Background colors
    pub bg0: Color,
    pub bg1: Color,
    pub bg2: Color,

    // Foreground colors
    pub fg0: Color,
    pub fg1: Color,
    pub grey: Color,

    // Semantic colors
    pub accent: Color,
    pub card_border: Color,
    pub card_hover: Color,
    pub running: Color,
    pub paused: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        // Purple accents on a dark background
        Self {
            bg0: Color::Rgb(0x11, 0x11, 0x1b),
            bg1: Color::Rgb(0x1e, 0x1e, 0x2e),
            bg2: Color::Rgb(0x31, 0x32, 0x44),
            fg0: Color::Rgb(0xcd, 0xd6, 0xf4),
            fg1: Color::Rgb(0xba, 0xc2, 0xde),
            grey: Color::Rgb(0x7f, 0x84, 0x9c),
            accent: Color::Rgb(0xc0, 0x84, 0xfc),
            card_border: Color::Rgb(0x58, 0x5b, 0x70),
            card_hover: Color::Rgb(0xa8, 0x55, 0xf7),
            running: Color::Rgb(0xa6, 0xe3, 0xa1),
            paused: Color::Rgb(0xf9, 0xe2, 0xaf),
            error: Color::Rgb(0xf3, 0x8b, 0xa8),
        }
    }
}
