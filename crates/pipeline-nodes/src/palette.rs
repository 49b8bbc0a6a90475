//! Palette models for the builder frontend
//!
//! The frontend asks each node endpoint for a JSON palette describing
//! the node's visual items. Items serialize externally tagged, e.g.
//! `{"text": {"label": ..., "hasHandle": ...}}`, matching the shape the
//! builder canvas consumes.

use serde::Serialize;
use serde_json::Value;

/// A complete node palette: icon, display name, ordered items.
#[derive(Debug, Clone, Serialize)]
pub struct PaletteNode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub name: String,
    pub items: Vec<PaletteItem>,
}

impl PaletteNode {
    pub fn new(icon: impl Into<String>, name: impl Into<String>, items: Vec<PaletteItem>) -> Self {
        Self {
            icon: Some(icon.into()),
            name: name.into(),
            items,
        }
    }
}

/// Connection-handle rendering attributes shared by interactive items.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandleBinding {
    pub has_handle: bool,
    pub handle_type: String,
    pub handle_position: String,
    pub handle_style: Value,
}

impl Default for HandleBinding {
    fn default() -> Self {
        Self {
            has_handle: false,
            handle_type: "target".to_string(),
            handle_position: "left".to_string(),
            handle_style: Value::Object(Default::default()),
        }
    }
}

impl HandleBinding {
    /// A target handle with positioning style.
    pub fn target(style: Value) -> Self {
        Self {
            has_handle: true,
            handle_style: style,
            ..Self::default()
        }
    }
}

/// One visual item of a node palette.
#[derive(Debug, Clone, Serialize)]
pub enum PaletteItem {
    /// Standalone connection point on the node frame
    #[serde(rename = "handle")]
    Handle(HandleSpec),
    /// Non-interactive section label
    #[serde(rename = "text-display")]
    TextDisplay(TextDisplaySpec),
    /// Single-line text entry
    #[serde(rename = "text")]
    Text(TextSpec),
    /// Multi-line text entry
    #[serde(rename = "text-area")]
    TextArea(TextSpec),
    /// Checkbox group
    #[serde(rename = "checkbox")]
    Checkbox(CheckboxSpec),
    /// Value slider
    #[serde(rename = "slider")]
    Slider(SliderSpec),
    /// File picker
    #[serde(rename = "file")]
    File(FileSpec),
}

impl PaletteItem {
    /// Label of the item, if it carries one.
    pub fn label(&self) -> Option<&str> {
        match self {
            PaletteItem::Handle(spec) => Some(&spec.label),
            PaletteItem::TextDisplay(_) => None,
            PaletteItem::Text(spec) | PaletteItem::TextArea(spec) => Some(&spec.label),
            PaletteItem::Checkbox(spec) => Some(&spec.label),
            PaletteItem::Slider(spec) => Some(&spec.label),
            PaletteItem::File(spec) => Some(&spec.label),
        }
    }

    /// Whether the item is a configuration slot the frontend submits
    /// (handles and display text are structural only).
    pub fn is_interactive(&self) -> bool {
        !matches!(self, PaletteItem::Handle(_) | PaletteItem::TextDisplay(_))
    }
}

/// Standalone connection point.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandleSpec {
    pub label: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub position: String,
    pub style: Value,
}

impl HandleSpec {
    pub fn target(label: impl Into<String>, style: Value) -> Self {
        Self {
            label: label.into(),
            kind: "target".to_string(),
            position: "left".to_string(),
            style,
        }
    }

    pub fn source(label: impl Into<String>, style: Value) -> Self {
        Self {
            label: label.into(),
            kind: "source".to_string(),
            position: "right".to_string(),
            style,
        }
    }
}

/// Non-interactive section label.
#[derive(Debug, Clone, Serialize)]
pub struct TextDisplaySpec {
    pub text: String,
}

impl TextDisplaySpec {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Single- or multi-line text entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSpec {
    pub label: String,
    pub required: bool,
    pub placeholder: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub handle: HandleBinding,
}

impl TextSpec {
    pub fn new(label: impl Into<String>, placeholder: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            required: false,
            placeholder: placeholder.into(),
            kind: "text".to_string(),
            handle: HandleBinding::default(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Mask the entry (API keys and other secrets).
    pub fn secret(mut self) -> Self {
        self.kind = "password".to_string();
        self
    }

    pub fn with_handle(mut self, style: Value) -> Self {
        self.handle = HandleBinding::target(style);
        self
    }
}

/// Checkbox group with parallel label/state lists.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckboxSpec {
    pub label: String,
    pub required: bool,
    pub options: CheckboxOptions,
    #[serde(flatten)]
    pub handle: HandleBinding,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckboxOptions {
    pub labels: Vec<String>,
    pub states: Vec<bool>,
}

impl CheckboxSpec {
    /// A single unchecked toggle.
    pub fn toggle(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            required: false,
            options: CheckboxOptions {
                labels: vec!["True".to_string()],
                states: vec![false],
            },
            handle: HandleBinding::default(),
        }
    }
}

/// Value slider.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SliderSpec {
    pub label: String,
    pub required: bool,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub initial: f64,
    #[serde(flatten)]
    pub handle: HandleBinding,
}

impl SliderSpec {
    pub fn new(label: impl Into<String>, min: f64, max: f64, step: f64, initial: f64) -> Self {
        Self {
            label: label.into(),
            required: false,
            min,
            max,
            step,
            initial,
            handle: HandleBinding::default(),
        }
    }

    pub fn with_handle(mut self, style: Value) -> Self {
        self.handle = HandleBinding::target(style);
        self
    }
}

/// File picker.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSpec {
    pub label: String,
    pub required: bool,
    #[serde(flatten)]
    pub handle: HandleBinding,
}

impl FileSpec {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            required: false,
            handle: HandleBinding::default(),
        }
    }
}
