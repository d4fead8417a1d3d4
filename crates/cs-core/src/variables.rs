//! Display variables: a loosely-typed key/value store written by `SetValue`
//! steps and read by renderers.
//!
//! No schema is enforced. Renderers interpret the keys listed in
//! [`DisplayKey`] through [`DisplayState`] and ignore everything else; unknown
//! keys are kept so that other consumers can still see them.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A value stored in the display variable set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DisplayValue {
    /// A boolean toggle.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A floating-point number.
    Float(f64),
    /// A string.
    Text(String),
}

impl DisplayValue {
    /// Truthiness used when a value gates a visual state: `false`, `0`,
    /// `0.0`, NaN and the empty string are false.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Int(n) => *n != 0,
            Self::Float(x) => *x != 0.0 && !x.is_nan(),
            Self::Text(s) => !s.is_empty(),
        }
    }
}

impl fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => write!(f, "\"{s}\""),
        }
    }
}

impl From<bool> for DisplayValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for DisplayValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for DisplayValue {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<&str> for DisplayValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for DisplayValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// The mutable display variable set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayVariables {
    values: BTreeMap<String, DisplayValue>,
}

impl DisplayVariables {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write every pair, overwriting existing keys and leaving others alone.
    pub fn apply<'a>(&mut self, values: impl IntoIterator<Item = (&'a String, &'a DisplayValue)>) {
        for (key, value) in values {
            self.values.insert(key.clone(), value.clone());
        }
    }

    /// Set a single variable.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<DisplayValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Look up a variable.
    pub fn get(&self, key: &str) -> Option<&DisplayValue> {
        self.values.get(key)
    }

    /// Whether a variable is set and truthy.
    pub fn flag(&self, key: &str) -> bool {
        self.values.get(key).is_some_and(DisplayValue::is_truthy)
    }

    /// Iterate over all variables in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DisplayValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no variable is set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Display variables that renderers recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayKey {
    /// `isMonitorOn`: the CRT screen is powered.
    MonitorOn,
    /// `showCVLoadingAnimation`: the loading bar is shown.
    CvLoadingAnimation,
    /// `showCVContent`: the CV page is shown.
    CvContent,
    /// `isSiteLoaded`: the site finished its boot sequence.
    SiteLoaded,
}

impl DisplayKey {
    /// All recognized keys.
    pub const ALL: [DisplayKey; 4] = [
        DisplayKey::MonitorOn,
        DisplayKey::CvLoadingAnimation,
        DisplayKey::CvContent,
        DisplayKey::SiteLoaded,
    ];

    /// The variable name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MonitorOn => "isMonitorOn",
            Self::CvLoadingAnimation => "showCVLoadingAnimation",
            Self::CvContent => "showCVContent",
            Self::SiteLoaded => "isSiteLoaded",
        }
    }

    /// Map a variable name to a recognized key.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == name)
    }
}

/// Typed view of the recognized display variables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayState {
    /// The CRT screen is powered.
    pub monitor_on: bool,
    /// The loading bar is shown.
    pub show_loading: bool,
    /// The CV page is shown.
    pub show_content: bool,
    /// The site finished its boot sequence.
    pub site_loaded: bool,
}

impl DisplayState {
    /// Read the recognized keys, ignoring all others.
    pub fn from_variables(vars: &DisplayVariables) -> Self {
        Self {
            monitor_on: vars.flag(DisplayKey::MonitorOn.as_str()),
            show_loading: vars.flag(DisplayKey::CvLoadingAnimation.as_str()),
            show_content: vars.flag(DisplayKey::CvContent.as_str()),
            site_loaded: vars.flag(DisplayKey::SiteLoaded.as_str()),
        }
    }
}
