//! Configuration trees, text blobs and capture settings.

use std::time::Duration;

use crate::abilities::CaptureKind;

/// Shape of a configuration widget.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetKind {
    /// Top-level container.
    Window,
    /// Grouping container.
    Section,
    /// Free text entry.
    Text,
    /// Numeric slider.
    Range {
        /// Lowest value.
        min: f32,
        /// Highest value.
        max: f32,
        /// Increment between values.
        step: f32,
    },
    /// On/off switch.
    Toggle,
    /// One of several choices, shown as radio buttons.
    Radio {
        /// Selectable values.
        choices: Vec<String>,
    },
    /// One of several choices, shown as a drop-down.
    Menu {
        /// Selectable values.
        choices: Vec<String>,
    },
    /// Action trigger without a value.
    Button,
    /// Date and time, as a Unix timestamp.
    Date,
}

/// Value held by a widget.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum WidgetValue {
    /// No value set.
    #[default]
    None,
    /// Text and menu selections.
    Text(String),
    /// Range positions.
    Float(f32),
    /// Dates and integer settings.
    Int(i64),
    /// Toggle state.
    Bool(bool),
}

/// Node in a configuration tree.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraWidget {
    kind: WidgetKind,
    name: String,
    label: String,
    info: String,
    value: WidgetValue,
    changed: bool,
    children: Vec<CameraWidget>,
}

impl CameraWidget {
    /// Widget with no value and no children.
    #[must_use]
    pub fn new(kind: WidgetKind, name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            label: label.into(),
            info: String::new(),
            value: WidgetValue::None,
            changed: false,
            children: Vec::new(),
        }
    }

    /// Attach help text.
    #[must_use]
    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = info.into();
        self
    }

    /// Set the initial value without marking the widget as changed.
    #[must_use]
    pub fn with_value(mut self, value: WidgetValue) -> Self {
        self.value = value;
        self
    }

    /// Append a child widget.
    #[must_use]
    pub fn with_child(mut self, child: CameraWidget) -> Self {
        self.children.push(child);
        self
    }

    /// Widget shape.
    #[must_use]
    pub fn kind(&self) -> &WidgetKind {
        &self.kind
    }

    /// Machine name, unique within a tree.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Help text.
    #[must_use]
    pub fn info(&self) -> &str {
        &self.info
    }

    /// Current value.
    #[must_use]
    pub fn value(&self) -> &WidgetValue {
        &self.value
    }

    /// Set the value and mark the widget as changed.
    pub fn set_value(&mut self, value: WidgetValue) {
        self.value = value;
        self.changed = true;
    }

    /// Whether [`set_value`](Self::set_value) has been called.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.changed
    }

    /// Direct children, in insertion order.
    #[must_use]
    pub fn children(&self) -> &[CameraWidget] {
        &self.children
    }

    /// Depth-first search for a descendant (or self) by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&CameraWidget> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }

    /// Mutable variant of [`find`](Self::find).
    pub fn find_mut(&mut self, name: &str) -> Option<&mut CameraWidget> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(name))
    }
}

/// Free-form text produced by summary/manual/about operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CameraText(String);

impl CameraText {
    /// Empty text.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the text.
    pub fn set(&mut self, text: impl Into<String>) {
        self.0 = text.into();
    }

    /// Append to the text.
    pub fn push_str(&mut self, text: &str) {
        self.0.push_str(text);
    }

    /// The text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CameraText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parameters of a capture request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureSetting {
    /// What to capture.
    pub kind: CaptureKind,
    /// Recording length for video/audio captures.
    pub duration: Option<Duration>,
}

impl CaptureSetting {
    /// Still image capture.
    #[must_use]
    pub fn image() -> Self {
        Self {
            kind: CaptureKind::Image,
            duration: None,
        }
    }

    /// Video capture of the given length.
    #[must_use]
    pub fn video(duration: Duration) -> Self {
        Self {
            kind: CaptureKind::Video,
            duration: Some(duration),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_walks_the_tree() {
        let mut tree = CameraWidget::new(WidgetKind::Window, "main", "Camera")
            .with_child(
                CameraWidget::new(WidgetKind::Section, "settings", "Settings").with_child(
                    CameraWidget::new(
                        WidgetKind::Menu {
                            choices: vec!["100".into(), "200".into()],
                        },
                        "iso",
                        "ISO",
                    ),
                ),
            );

        assert_eq!(tree.find("iso").map(|w| w.label()), Some("ISO"));
        assert!(tree.find("missing").is_none());

        let iso = tree.find_mut("iso").unwrap();
        assert!(!iso.changed());
        iso.set_value(WidgetValue::Text("200".into()));
        assert!(tree.find("iso").unwrap().changed());
    }

    #[test]
    fn text_accumulates() {
        let mut text = CameraText::new();
        text.set("Model: X\n");
        text.push_str("Serial: 1");
        assert_eq!(text.to_string(), "Model: X\nSerial: 1");
    }
}
