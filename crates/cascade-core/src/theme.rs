//! Theme provider: colors, typography, sizing and motion timing.
//!
//! [`Theme::default`] is the dark "Laracon" look. Callers customise it with a
//! partial [`ThemeOverride`], merged field by field. Overrides are plain data
//! and can be loaded from YAML or JSON, with colors written as hex strings and
//! curves as CSS timing functions:
//!
//! ```
//! use cascade_core::{Theme, ThemeOverride};
//!
//! let yaml = r##"
//! width: 280
//! colors:
//!   accent: "#6366F1"
//! transitions:
//!   main: "cubic-bezier(0.4, 0, 0.2, 1)"
//! "##;
//! let theme = Theme::from_yaml(yaml).unwrap();
//! assert_eq!(theme.width, 280.0);
//! assert_eq!(theme.colors.accent.to_hex(), "#6366f1");
//! assert_eq!(theme.height, Theme::default().height);
//! ```

use crate::animation::{Easing, Transition};
use crate::color::Color;
use crate::error::{CoreError, CoreResult};
use crate::widget::{FontWeight, TextStyle};
use serde::{Deserialize, Serialize};

/// Text and accent colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeColors {
    /// Option and selected label text
    pub text: Color,
    /// Placeholder text
    pub placeholder: Color,
    /// Checkmark, chevron and focus ring
    pub accent: Color,
    /// Disabled rows and the caption
    pub disabled: Color,
}

/// Typography.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeFont {
    /// Font family
    pub family: String,
    /// Numeric CSS weight
    pub weight: u16,
    /// Label size in pixels
    pub size: f32,
    /// Caption (eyebrow) size in pixels
    pub caption_size: f32,
    /// Letter spacing as a fraction of the font size
    pub letter_spacing: f32,
}

/// Transition timings shared by the widget parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeTransitions {
    /// Main curve for the list fan-out and the chevron morph
    pub main: Easing,
    /// Trigger press scale
    pub scale: Transition,
    /// Checkmark opacity
    pub checkmark: Transition,
    /// Trigger label slide (transform, opacity and blur)
    pub slide: Transition,
    /// Outgoing label fade
    pub crossfade: Transition,
    /// Chevron geometry morph
    pub chevron: Transition,
    /// Per-row opacity
    pub row_opacity: Transition,
    /// Per-row press scale
    pub row_scale: Transition,
}

/// Geometry and sequencing of the list and label animations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    /// Distance from the trigger's top to the first row
    pub list_offset: f32,
    /// Vertical gap between rows
    pub row_gap: f32,
    /// Per-row stagger of the fan-out
    pub row_stagger_ms: u32,
    /// Duration of the per-row transform and blur transition
    pub row_transform_ms: u32,
    /// Extra delay of the per-row opacity transition
    pub row_opacity_delay_ms: u32,
    /// Blur radius of collapsed rows
    pub closed_blur: f32,
    /// Opacity of collapsed rows
    pub closed_opacity: f32,
    /// Horizontal travel of entering and exiting trigger labels
    pub label_shift: f32,
    /// Delay before an entering trigger label animates in
    pub label_delay_ms: u32,
    /// Delay after a commit before the transition flag clears
    pub end_transition_ms: u32,
    /// Delay after a commit before the outgoing value is dropped
    pub clear_previous_ms: u32,
}

/// Complete visual configuration of a select widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    /// Trigger and row width
    pub width: f32,
    /// Trigger and row height
    pub height: f32,
    /// Corner radius
    pub border_radius: f32,
    /// Trigger gradient start
    pub background: Color,
    /// Trigger gradient end
    pub background_end: Color,
    /// Option row fill
    pub row_background: Color,
    /// Border color
    pub border: Color,
    /// Border width
    pub border_width: f32,
    /// Colors
    pub colors: ThemeColors,
    /// Typography
    pub font: ThemeFont,
    /// Transitions
    pub transitions: ThemeTransitions,
    /// List and label motion
    pub motion: Motion,
}

impl Default for Theme {
    fn default() -> Self {
        let main = Easing::CubicBezier(0.23, 1.0, 0.32, 1.0);
        let standard = Easing::CubicBezier(0.4, 0.0, 0.2, 1.0);
        Self {
            width: 336.0,
            height: 48.0,
            border_radius: 12.0,
            background: Color::rgb8(20, 20, 20),
            background_end: Color::rgb8(31, 31, 31),
            row_background: Color::rgb8(0x17, 0x17, 0x17),
            border: Color::rgb8(0x26, 0x26, 0x26),
            border_width: 1.0,
            colors: ThemeColors {
                text: Color::WHITE,
                placeholder: Color::WHITE,
                accent: Color::rgb8(0x10, 0xb9, 0x81),
                disabled: Color::rgb8(0x73, 0x73, 0x73),
            },
            font: ThemeFont {
                family: "Inter".to_string(),
                weight: 600,
                size: 16.0,
                caption_size: 11.0,
                letter_spacing: -0.02,
            },
            transitions: ThemeTransitions {
                main,
                scale: Transition::new(100, main),
                checkmark: Transition::new(200, standard),
                slide: Transition::new(250, standard),
                crossfade: Transition::new(225, Easing::CSS_EASE_IN_OUT),
                chevron: Transition::new(400, main),
                row_opacity: Transition::new(225, Easing::CSS_EASE),
                row_scale: Transition::new(250, standard),
            },
            motion: Motion {
                list_offset: 60.0,
                row_gap: 12.0,
                row_stagger_ms: 60,
                row_transform_ms: 300,
                row_opacity_delay_ms: 75,
                closed_blur: 2.0,
                closed_opacity: 0.05,
                label_shift: 16.0,
                label_delay_ms: 75,
                end_transition_ms: 10,
                clear_previous_ms: 310,
            },
        }
    }
}

impl Theme {
    /// Vertical distance between consecutive rows.
    #[must_use]
    pub fn row_pitch(&self) -> f32 {
        self.height + self.motion.row_gap
    }

    /// Text style for option and selected labels.
    #[must_use]
    pub fn label_style(&self, color: Color) -> TextStyle {
        TextStyle {
            family: self.font.family.clone(),
            size: self.font.size,
            color,
            weight: FontWeight::from_numeric(self.font.weight),
            letter_spacing: self.font.letter_spacing,
        }
    }

    /// Text style for the caption above the selected label.
    #[must_use]
    pub fn caption_style(&self) -> TextStyle {
        TextStyle {
            size: self.font.caption_size,
            ..self.label_style(self.colors.disabled)
        }
    }

    /// Contrast ratio of the label text against the trigger background.
    #[must_use]
    pub fn text_contrast(&self) -> f32 {
        self.colors.text.contrast_ratio(&self.background)
    }

    /// Check sizes and opacities for values that cannot be rendered.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidValue`] naming the first bad field.
    pub fn validate(&self) -> CoreResult<()> {
        let positive = [
            ("width", self.width),
            ("height", self.height),
            ("font.size", self.font.size),
            ("font.caption_size", self.font.caption_size),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(field, format!("must be a positive number, got {value}")));
            }
        }
        let non_negative = [
            ("border_radius", self.border_radius),
            ("border_width", self.border_width),
            ("motion.row_gap", self.motion.row_gap),
            ("motion.closed_blur", self.motion.closed_blur),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(field, format!("must not be negative, got {value}")));
            }
        }
        if !(0.0..=1.0).contains(&self.motion.closed_opacity) {
            return Err(invalid(
                "motion.closed_opacity",
                format!("must be within 0..=1, got {}", self.motion.closed_opacity),
            ));
        }
        if self.motion.end_transition_ms > self.motion.clear_previous_ms {
            return Err(invalid(
                "motion.end_transition_ms",
                "must not exceed motion.clear_previous_ms".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply a partial override on top of this theme.
    ///
    /// # Errors
    ///
    /// Returns an error naming the field if a color or easing string does not
    /// parse, or if the merged theme fails [`Theme::validate`].
    pub fn merged(&self, patch: &ThemeOverride) -> CoreResult<Self> {
        let mut theme = self.clone();

        set(&mut theme.width, patch.width);
        set(&mut theme.height, patch.height);
        set(&mut theme.border_radius, patch.border_radius);
        set(&mut theme.border_width, patch.border_width);
        set_color(&mut theme.background, patch.background.as_deref(), "background")?;
        set_color(
            &mut theme.background_end,
            patch.background_end.as_deref(),
            "background_end",
        )?;
        set_color(
            &mut theme.row_background,
            patch.row_background.as_deref(),
            "row_background",
        )?;
        set_color(&mut theme.border, patch.border.as_deref(), "border")?;

        if let Some(colors) = &patch.colors {
            let c = &mut theme.colors;
            set_color(&mut c.text, colors.text.as_deref(), "colors.text")?;
            set_color(&mut c.placeholder, colors.placeholder.as_deref(), "colors.placeholder")?;
            set_color(&mut c.accent, colors.accent.as_deref(), "colors.accent")?;
            set_color(&mut c.disabled, colors.disabled.as_deref(), "colors.disabled")?;
        }

        if let Some(font) = &patch.font {
            let f = &mut theme.font;
            if let Some(family) = &font.family {
                f.family.clone_from(family);
            }
            set(&mut f.weight, font.weight);
            set(&mut f.size, font.size);
            set(&mut f.caption_size, font.caption_size);
            set(&mut f.letter_spacing, font.letter_spacing);
        }

        if let Some(transitions) = &patch.transitions {
            let t = &mut theme.transitions;
            if let Some(main) = transitions.main.as_deref() {
                let easing = parse_easing(main, "transitions.main")?;
                // parts that follow the main curve keep following it
                for part in [&mut t.scale, &mut t.chevron] {
                    if part.easing == t.main {
                        part.easing = easing;
                    }
                }
                t.main = easing;
            }
            let parts = [
                (&mut t.scale, &transitions.scale, "transitions.scale"),
                (&mut t.checkmark, &transitions.checkmark, "transitions.checkmark"),
                (&mut t.slide, &transitions.slide, "transitions.slide"),
                (&mut t.crossfade, &transitions.crossfade, "transitions.crossfade"),
                (&mut t.chevron, &transitions.chevron, "transitions.chevron"),
                (&mut t.row_opacity, &transitions.row_opacity, "transitions.row_opacity"),
                (&mut t.row_scale, &transitions.row_scale, "transitions.row_scale"),
            ];
            for (target, part, field) in parts {
                if let Some(part) = part {
                    part.apply_to(target, field)?;
                }
            }
        }

        if let Some(motion) = &patch.motion {
            let m = &mut theme.motion;
            set(&mut m.list_offset, motion.list_offset);
            set(&mut m.row_gap, motion.row_gap);
            set(&mut m.row_stagger_ms, motion.row_stagger_ms);
            set(&mut m.row_transform_ms, motion.row_transform_ms);
            set(&mut m.row_opacity_delay_ms, motion.row_opacity_delay_ms);
            set(&mut m.closed_blur, motion.closed_blur);
            set(&mut m.closed_opacity, motion.closed_opacity);
            set(&mut m.label_shift, motion.label_shift);
            set(&mut m.label_delay_ms, motion.label_delay_ms);
            set(&mut m.end_transition_ms, motion.end_transition_ms);
            set(&mut m.clear_previous_ms, motion.clear_previous_ms);
        }

        theme.validate()?;
        Ok(theme)
    }

    /// Default theme merged with an override read from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or the override is invalid.
    pub fn from_yaml(yaml: &str) -> CoreResult<Self> {
        Self::default().merged(&ThemeOverride::from_yaml(yaml)?)
    }

    /// Default theme merged with an override read from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the override is invalid.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        Self::default().merged(&ThemeOverride::from_json(json)?)
    }
}

fn set<T: Copy>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

fn set_color(target: &mut Color, value: Option<&str>, field: &str) -> CoreResult<()> {
    if let Some(hex) = value {
        *target = Color::from_hex(hex).map_err(|source| CoreError::Color {
            field: field.to_string(),
            source,
        })?;
    }
    Ok(())
}

fn parse_easing(value: &str, field: &str) -> CoreResult<Easing> {
    value.parse().map_err(|source| CoreError::Easing {
        field: field.to_string(),
        source,
    })
}

fn invalid(field: &str, message: String) -> CoreError {
    CoreError::InvalidValue {
        field: field.to_string(),
        message,
    }
}

/// Partial theme; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeOverride {
    /// Trigger and row width
    pub width: Option<f32>,
    /// Trigger and row height
    pub height: Option<f32>,
    /// Corner radius
    pub border_radius: Option<f32>,
    /// Border width
    pub border_width: Option<f32>,
    /// Trigger gradient start (hex)
    pub background: Option<String>,
    /// Trigger gradient end (hex)
    pub background_end: Option<String>,
    /// Option row fill (hex)
    pub row_background: Option<String>,
    /// Border color (hex)
    pub border: Option<String>,
    /// Color overrides
    pub colors: Option<ColorsOverride>,
    /// Font overrides
    pub font: Option<FontOverride>,
    /// Transition overrides
    pub transitions: Option<TransitionsOverride>,
    /// Motion overrides
    pub motion: Option<MotionOverride>,
}

impl ThemeOverride {
    /// Parse an override from YAML.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Yaml`] if the document is malformed.
    pub fn from_yaml(yaml: &str) -> CoreResult<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Parse an override from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Json`] if the document is malformed.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Whether the override changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Partial [`ThemeColors`] with hex strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[allow(missing_docs)]
pub struct ColorsOverride {
    pub text: Option<String>,
    pub placeholder: Option<String>,
    pub accent: Option<String>,
    pub disabled: Option<String>,
}

/// Partial [`ThemeFont`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[allow(missing_docs)]
pub struct FontOverride {
    pub family: Option<String>,
    pub weight: Option<u16>,
    pub size: Option<f32>,
    pub caption_size: Option<f32>,
    pub letter_spacing: Option<f32>,
}

/// Partial [`Transition`] with the easing as a CSS string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransitionOverride {
    /// Duration in milliseconds
    pub duration_ms: Option<u32>,
    /// Delay in milliseconds
    pub delay_ms: Option<u32>,
    /// CSS timing function
    pub easing: Option<String>,
}

impl TransitionOverride {
    fn apply_to(&self, target: &mut Transition, field: &str) -> CoreResult<()> {
        set(&mut target.duration_ms, self.duration_ms);
        set(&mut target.delay_ms, self.delay_ms);
        if let Some(easing) = self.easing.as_deref() {
            target.easing = parse_easing(easing, &format!("{field}.easing"))?;
        }
        Ok(())
    }
}

/// Partial [`ThemeTransitions`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[allow(missing_docs)]
pub struct TransitionsOverride {
    pub main: Option<String>,
    pub scale: Option<TransitionOverride>,
    pub checkmark: Option<TransitionOverride>,
    pub slide: Option<TransitionOverride>,
    pub crossfade: Option<TransitionOverride>,
    pub chevron: Option<TransitionOverride>,
    pub row_opacity: Option<TransitionOverride>,
    pub row_scale: Option<TransitionOverride>,
}

/// Partial [`Motion`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[allow(missing_docs)]
pub struct MotionOverride {
    pub list_offset: Option<f32>,
    pub row_gap: Option<f32>,
    pub row_stagger_ms: Option<u32>,
    pub row_transform_ms: Option<u32>,
    pub row_opacity_delay_ms: Option<u32>,
    pub closed_blur: Option<f32>,
    pub closed_opacity: Option<f32>,
    pub label_shift: Option<f32>,
    pub label_delay_ms: Option<u32>,
    pub end_transition_ms: Option<u32>,
    pub clear_previous_ms: Option<u32>,
}
