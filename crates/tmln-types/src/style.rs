//! Colors, named styles and the style table.
//!
//! Events and steps hold shared [`Arc<Style>`] handles handed out by
//! [`Styles`]. A style is never modified after it enters the table, so a
//! handle stays valid regardless of later insertions.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::Arc;

/// Name of the fallback style used for unknown style names.
pub const DEFAULT_STYLE_NAME: &str = "default";

/// A single ARGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    /// Alpha channel (255 is opaque).
    pub a: u8,
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::new(255, 0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    /// Opaque mid grey.
    pub const GREY: Self = Self::new(255, 128, 128, 128);
    /// Opaque red.
    pub const RED: Self = Self::new(255, 255, 0, 0);
    /// Opaque green.
    pub const GREEN: Self = Self::new(255, 0, 255, 0);
    /// Opaque blue.
    pub const BLUE: Self = Self::new(255, 0, 0, 255);

    /// Built-in color names, in the order they seed a [`Styles`] table.
    pub const NAMED: [(&'static str, Self); 6] = [
        ("white", Self::WHITE),
        ("grey", Self::GREY),
        ("black", Self::BLACK),
        ("red", Self::RED),
        ("green", Self::GREEN),
        ("blue", Self::BLUE),
    ];

    /// Create a color from its four channels.
    pub const fn new(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { a, r, g, b }
    }

    /// Parse an opaque `#rrggbb` color. Returns `None` for anything else.
    pub fn from_hex(text: &str) -> Option<Self> {
        let hex = text.strip_prefix('#')?;
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| {
            hex.get(range)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
        };
        Some(Self::new(255, channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Look up one of the built-in color names.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::NAMED
            .iter()
            .find(|(known, _)| *known == name)
            .map(|(_, color)| *color)
    }

    /// Parse `#rrggbb` or a built-in name, defaulting to opaque black.
    pub fn parse(text: &str) -> Self {
        Self::from_hex(text)
            .or_else(|| Self::from_name(text))
            .unwrap_or(Self::BLACK)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Styling of timeline events and steps: a named foreground/background pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Style {
    name: String,
    fg: Color,
    bg: Color,
}

impl Style {
    /// Create a named style.
    pub fn new(name: impl Into<String>, fg: Color, bg: Color) -> Self {
        Self {
            name: name.into(),
            fg,
            bg,
        }
    }

    /// Style name, the key it is registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Foreground color, used to fill shapes.
    pub const fn fg(&self) -> Color {
        self.fg
    }

    /// Background color.
    pub const fn bg(&self) -> Color {
        self.bg
    }
}

/// Table of named styles.
///
/// Seeded with one style per built-in color name (that color on black)
/// plus a black-on-black default. Names of the form `#rrggbb` are
/// registered lazily on first lookup.
#[derive(Debug, Clone)]
pub struct Styles {
    default_style: Arc<Style>,
    styles: BTreeMap<String, Arc<Style>>,
}

impl Styles {
    /// Create a table containing the built-in styles.
    pub fn new() -> Self {
        let styles = Color::NAMED
            .iter()
            .map(|(name, color)| {
                (
                    (*name).to_owned(),
                    Arc::new(Style::new(*name, *color, Color::BLACK)),
                )
            })
            .collect();
        Self {
            default_style: Arc::new(Style::new(DEFAULT_STYLE_NAME, Color::BLACK, Color::BLACK)),
            styles,
        }
    }

    /// The fallback style.
    pub const fn default_style(&self) -> &Arc<Style> {
        &self.default_style
    }

    /// Whether a style of that name is registered.
    pub fn has_style(&self, name: &str) -> bool {
        self.styles.contains_key(name)
    }

    /// Look up a registered style without registering anything.
    pub fn lookup(&self, name: &str) -> Option<&Arc<Style>> {
        self.styles.get(name)
    }

    /// Resolve a style name to a shared handle.
    ///
    /// Unknown `#rrggbb` names are registered as that color on black.
    /// Any other unknown name resolves to the default style.
    pub fn get_style(&mut self, name: &str) -> Arc<Style> {
        if let Some(style) = self.styles.get(name) {
            return Arc::clone(style);
        }
        match Color::from_hex(name) {
            Some(fg) => {
                let style = Arc::new(Style::new(name, fg, Color::BLACK));
                self.styles.insert(name.to_owned(), Arc::clone(&style));
                style
            }
            None => Arc::clone(&self.default_style),
        }
    }

    /// Register a style. The first registration of a name wins; returns
    /// `false` if the name was already taken.
    pub fn add_style(&mut self, style: Style) -> bool {
        match self.styles.entry(style.name().to_owned()) {
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(style));
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    /// Number of registered styles (the default style is not counted).
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Whether no styles are registered.
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

impl Default for Styles {
    fn default() -> Self {
        Self::new()
    }
}
