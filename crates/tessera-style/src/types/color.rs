//! Color values, including a color assembled from reactive channels.

use std::borrow::Cow;
use std::sync::Arc;

use tessera_core::{ConnectionGuard, State};

use super::{ChangeCallback, CssValue};

/// A static CSS color.
///
/// # Example
///
/// ```
/// use tessera_style::prelude::*;
///
/// assert_eq!(Color::RED.description(), "red");
/// assert_eq!(Color::hex(0x007aff).description(), "#007aff");
/// assert_eq!(Color::rgba(0, 0, 0, 0.5).description(), "rgba(0,0,0,0.5)");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Color {
    /// A named color keyword (`red`, `transparent`, `currentcolor`...).
    Named(Cow<'static, str>),
    /// A 24-bit `#rrggbb` color.
    Hex(u32),
    /// `rgb(r,g,b)`
    Rgb(u8, u8, u8),
    /// `rgba(r,g,b,a)` with alpha in `0.0..=1.0`.
    Rgba(u8, u8, u8, f32),
}

impl Color {
    /// `black`
    pub const BLACK: Color = Color::named("black");
    /// `white`
    pub const WHITE: Color = Color::named("white");
    /// `red`
    pub const RED: Color = Color::named("red");
    /// `green`
    pub const GREEN: Color = Color::named("green");
    /// `blue`
    pub const BLUE: Color = Color::named("blue");
    /// `transparent`
    pub const TRANSPARENT: Color = Color::named("transparent");
    /// `currentcolor`
    pub const CURRENT: Color = Color::named("currentcolor");

    /// A named color known at compile time.
    pub const fn named(name: &'static str) -> Self {
        Self::Named(Cow::Borrowed(name))
    }

    /// A `#rrggbb` color. Bits above the low 24 are ignored.
    pub fn hex(rgb: u32) -> Self {
        Self::Hex(rgb & 0x00ff_ffff)
    }

    /// An opaque rgb color.
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::Rgb(r, g, b)
    }

    /// An rgb color with alpha. Alpha is clamped to `0.0..=1.0`.
    pub fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self::Rgba(r, g, b, a.clamp(0.0, 1.0))
    }
}

impl CssValue for Color {
    fn description(&self) -> String {
        match self {
            Color::Named(name) => name.to_string(),
            Color::Hex(rgb) => format!("#{rgb:06x}"),
            Color::Rgb(r, g, b) => format!("rgb({r},{g},{b})"),
            Color::Rgba(r, g, b, a) => format!("rgba({r},{g},{b},{a})"),
        }
    }
}

/// A color whose channels are independent reactive states.
///
/// Changing any channel re-serializes the color wherever it is installed,
/// without the caller re-declaring the property.
///
/// # Example
///
/// ```
/// use tessera_core::State;
/// use tessera_style::prelude::*;
///
/// let red = State::new(255);
/// let color = ReactiveColor::rgb(red.clone(), State::new(0), State::new(0));
/// assert_eq!(color.description(), "rgba(255,0,0,1)");
///
/// red.set(128);
/// assert_eq!(color.description(), "rgba(128,0,0,1)");
/// ```
#[derive(Debug, Clone)]
pub struct ReactiveColor {
    red: State<u8>,
    green: State<u8>,
    blue: State<u8>,
    alpha: State<f32>,
}

impl ReactiveColor {
    /// Build a color from four channel states.
    pub fn new(red: State<u8>, green: State<u8>, blue: State<u8>, alpha: State<f32>) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Build an opaque color from three channel states.
    pub fn rgb(red: State<u8>, green: State<u8>, blue: State<u8>) -> Self {
        Self::new(red, green, blue, State::new(1.0))
    }

    /// The alpha channel.
    pub fn alpha(&self) -> &State<f32> {
        &self.alpha
    }

    /// Snapshot the channels into a static color.
    pub fn current(&self) -> Color {
        Color::rgba(
            self.red.get(),
            self.green.get(),
            self.blue.get(),
            self.alpha.get(),
        )
    }
}

impl CssValue for ReactiveColor {
    fn description(&self) -> String {
        self.current().description()
    }

    fn observe(&self, on_change: ChangeCallback) -> Vec<ConnectionGuard> {
        let mut guards = Vec::with_capacity(4);
        for channel in [&self.red, &self.green, &self.blue] {
            let callback = Arc::clone(&on_change);
            guards.push(channel.subscribe(move |_, _| callback()));
        }
        guards.push(self.alpha.subscribe(move |_, _| on_change()));
        guards
    }
}
