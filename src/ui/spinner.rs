//! Class mapping for the `LoadingSpinner` component.

use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SpinnerSize {
    Sm,
    #[default]
    Md,
    Lg,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SpinnerColor {
    #[default]
    Blue,
    White,
    Gray,
    Green,
}

impl SpinnerSize {
    pub fn class(self) -> &'static str {
        match self {
            SpinnerSize::Sm => "h-4 w-4",
            SpinnerSize::Md => "h-8 w-8",
            SpinnerSize::Lg => "h-12 w-12",
        }
    }
}

impl SpinnerColor {
    pub fn class(self) -> &'static str {
        match self {
            SpinnerColor::Blue => "border-blue-500",
            SpinnerColor::White => "border-white",
            SpinnerColor::Gray => "border-gray-500",
            SpinnerColor::Green => "border-green-500",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownVariant;

impl FromStr for SpinnerSize {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sm" => Ok(SpinnerSize::Sm),
            "md" => Ok(SpinnerSize::Md),
            "lg" => Ok(SpinnerSize::Lg),
            _ => Err(UnknownVariant),
        }
    }
}

impl FromStr for SpinnerColor {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blue" => Ok(SpinnerColor::Blue),
            "white" => Ok(SpinnerColor::White),
            "gray" => Ok(SpinnerColor::Gray),
            "green" => Ok(SpinnerColor::Green),
            _ => Err(UnknownVariant),
        }
    }
}

/// Full class list for the spinner element.
pub fn spinner_classes(size: SpinnerSize, color: SpinnerColor) -> String {
    format!(
        "animate-spin rounded-full border-2 border-t-transparent {} {}",
        size.class(),
        color.class()
    )
}

/// Same as [`spinner_classes`] from raw prop strings; absent or unknown props use the defaults.
pub fn spinner_classes_from_props(size: Option<&str>, color: Option<&str>) -> String {
    let size: SpinnerSize = size.and_then(|s| s.parse().ok()).unwrap_or_default();
    let color: SpinnerColor = color.and_then(|c| c.parse().ok()).unwrap_or_default();
    spinner_classes(size, color)
}
