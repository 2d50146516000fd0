//! Layout registry.
//!
//! A catalogue of named column layouts and predefined templates. The
//! registry is a plain value: start from [`LayoutRegistry::builtin`] or an
//! empty [`LayoutRegistry::new`] and [`register`](LayoutRegistry::register)
//! custom layouts.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::distribute::DistributionStrategy;

/// Name of the layout used for unknown layout names.
pub const DEFAULT_LAYOUT: &str = "single_column";

/// Allowed deviation of summed column widths from 100.
const WIDTH_TOLERANCE: f64 = 0.1;

/// Content role of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnRole {
    /// Primary content
    Main,
    /// Secondary content
    Sidebar,
}

/// One column of a layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Relative width in percent
    pub width: f64,
    /// Content role
    pub role: ColumnRole,
}

impl ColumnSpec {
    /// Create a column spec.
    pub fn new(width: f64, role: ColumnRole) -> Self {
        Self { width, role }
    }

    /// A main-content column.
    pub fn main(width: f64) -> Self {
        Self::new(width, ColumnRole::Main)
    }

    /// A sidebar column.
    pub fn sidebar(width: f64) -> Self {
        Self::new(width, ColumnRole::Sidebar)
    }
}

/// Section spacing applied to the whole layout.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Spacing {
    /// Gap between columns
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_gap: Option<String>,
    /// Section padding
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<String>,
}

/// A named arrangement of columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutDefinition {
    /// Registry key (e.g., "blog_layout")
    pub name: String,
    /// Human-readable name
    pub display_name: String,
    /// One-line description
    pub description: String,
    /// Columns in left-to-right order
    pub columns: Vec<ColumnSpec>,
    /// Optional section spacing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing: Option<Spacing>,
}

impl LayoutDefinition {
    /// Create a layout, checking its invariants.
    ///
    /// # Errors
    /// [`Error::InvalidLayout`] if there are no columns, a width is not
    /// positive, or widths do not sum to 100 (within 0.1).
    pub fn new(name: impl Into<String>, columns: Vec<ColumnSpec>) -> Result<Self> {
        let name = name.into();
        let layout = Self {
            display_name: name.clone(),
            description: String::new(),
            name,
            columns,
            spacing: None,
        };
        layout.validate()?;
        Ok(layout)
    }

    /// Set the display name.
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set section spacing.
    pub fn with_spacing(mut self, column_gap: &str, padding: &str) -> Self {
        self.spacing = Some(Spacing {
            column_gap: Some(column_gap.to_string()),
            padding: Some(padding.to_string()),
        });
        self
    }

    /// Check the layout invariants.
    pub fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(Error::InvalidLayout(format!("{}: no columns", self.name)));
        }
        if let Some(col) = self.columns.iter().find(|c| c.width.is_nan() || c.width <= 0.0) {
            return Err(Error::InvalidLayout(format!(
                "{}: column width {} is not positive",
                self.name, col.width
            )));
        }
        let total: f64 = self.columns.iter().map(|c| c.width).sum();
        if (total - 100.0).abs() > WIDTH_TOLERANCE {
            return Err(Error::InvalidLayout(format!(
                "{}: column widths sum to {}",
                self.name, total
            )));
        }
        Ok(())
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Index of the widest column (first one on ties).
    pub fn main_column(&self) -> usize {
        main_column_index(&self.columns)
    }

    /// Column widths joined for display (e.g., "60/40").
    pub fn width_summary(&self) -> String {
        self.columns
            .iter()
            .map(|c| format_width(c.width))
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Index of the first column with the largest width.
pub fn main_column_index(columns: &[ColumnSpec]) -> usize {
    let mut main = 0;
    let mut max = f64::MIN;
    for (idx, col) in columns.iter().enumerate() {
        if col.width > max {
            max = col.width;
            main = idx;
        }
    }
    main
}

fn format_width(width: f64) -> String {
    if width.fract() == 0.0 {
        format!("{}", width as i64)
    } else {
        format!("{:.2}", width)
    }
}

/// A layout paired with a distribution strategy for a use case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    /// Registry key
    pub name: String,
    /// Human-readable name
    pub display_name: String,
    /// One-line description
    pub description: String,
    /// Layout name
    pub layout: String,
    /// Distribution strategy
    pub strategy: DistributionStrategy,
}

impl Template {
    /// Create a template.
    pub fn new(
        name: &str,
        display_name: &str,
        layout: &str,
        strategy: DistributionStrategy,
        description: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            display_name: display_name.to_string(),
            description: description.to_string(),
            layout: layout.to_string(),
            strategy,
        }
    }
}

/// Catalogue of layouts and templates.
#[derive(Debug, Clone, Default)]
pub struct LayoutRegistry {
    layouts: Vec<LayoutDefinition>,
    templates: Vec<Template>,
}

impl LayoutRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in layouts and templates.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for layout in builtin_layouts() {
            registry.insert(layout);
        }
        registry.templates = builtin_templates();
        registry
    }

    /// Add or replace a layout after validating it.
    pub fn register(&mut self, layout: LayoutDefinition) -> Result<()> {
        layout.validate()?;
        self.insert(layout);
        Ok(())
    }

    /// Add or replace a template. Its layout must be registered.
    pub fn register_template(&mut self, template: Template) -> Result<()> {
        if self.get(&template.layout).is_none() {
            return Err(Error::InvalidLayout(format!(
                "template {} uses unknown layout {}",
                template.name, template.layout
            )));
        }
        self.templates.retain(|t| t.name != template.name);
        self.templates.push(template);
        Ok(())
    }

    fn insert(&mut self, layout: LayoutDefinition) {
        match self.layouts.iter_mut().find(|l| l.name == layout.name) {
            Some(existing) => *existing = layout,
            None => self.layouts.push(layout),
        }
    }

    /// Look up a layout by name.
    pub fn get(&self, name: &str) -> Option<&LayoutDefinition> {
        self.layouts.iter().find(|l| l.name == name)
    }

    /// Look up a layout, falling back to the single-column layout.
    pub fn resolve(&self, name: &str) -> LayoutDefinition {
        if let Some(layout) = self.get(name) {
            return layout.clone();
        }
        log::warn!("Unknown layout '{}', using {}", name, DEFAULT_LAYOUT);
        self.get(DEFAULT_LAYOUT)
            .cloned()
            .unwrap_or_else(single_column)
    }

    /// Layouts in registration order.
    pub fn layouts(&self) -> &[LayoutDefinition] {
        &self.layouts
    }

    /// Layout names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.layouts.iter().map(|l| l.name.as_str()).collect()
    }

    /// Predefined templates.
    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    /// Look up a template by name.
    pub fn template(&self, name: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.name == name)
    }
}

fn single_column() -> LayoutDefinition {
    LayoutDefinition {
        name: DEFAULT_LAYOUT.to_string(),
        display_name: "Single column".to_string(),
        description: "Full-width content, ideal for simple pages".to_string(),
        columns: vec![ColumnSpec::main(100.0)],
        spacing: None,
    }
}

fn layout(
    name: &str,
    display_name: &str,
    description: &str,
    columns: Vec<ColumnSpec>,
) -> LayoutDefinition {
    LayoutDefinition {
        name: name.to_string(),
        display_name: display_name.to_string(),
        description: description.to_string(),
        columns,
        spacing: None,
    }
}

fn builtin_layouts() -> Vec<LayoutDefinition> {
    vec![
        single_column(),
        layout(
            "two_columns_equal",
            "Two equal columns",
            "Content split evenly (50/50)",
            vec![ColumnSpec::main(50.0), ColumnSpec::main(50.0)],
        ),
        layout(
            "two_columns_sidebar_left",
            "Left sidebar",
            "Sidebar 33% + main content 67%",
            vec![ColumnSpec::sidebar(33.33), ColumnSpec::main(66.66)],
        ),
        layout(
            "two_columns_sidebar_right",
            "Right sidebar",
            "Main content 67% + sidebar 33% (classic blog)",
            vec![ColumnSpec::main(66.66), ColumnSpec::sidebar(33.33)],
        ),
        layout(
            "three_columns",
            "Three equal columns",
            "Content in 3 columns, ideal for grids",
            vec![
                ColumnSpec::main(33.33),
                ColumnSpec::main(33.33),
                ColumnSpec::main(33.33),
            ],
        ),
        layout(
            "blog_layout",
            "Blog layout",
            "Article 60% + sidebar 40% with wider spacing",
            vec![ColumnSpec::main(60.0), ColumnSpec::sidebar(40.0)],
        )
        .with_spacing("30", "20px"),
    ]
}

fn builtin_templates() -> Vec<Template> {
    use DistributionStrategy::*;

    vec![
        Template::new(
            "blog_article",
            "Blog article",
            "blog_layout",
            Auto,
            "Classic layout with main content and sidebar",
        ),
        Template::new(
            "landing_page",
            "Landing page",
            "single_column",
            Sequential,
            "Full-width content for maximum impact",
        ),
        Template::new(
            "portfolio",
            "Portfolio",
            "three_columns",
            Balanced,
            "Three-column grid to showcase projects",
        ),
        Template::new(
            "magazine",
            "Magazine",
            "two_columns_sidebar_right",
            Auto,
            "Magazine layout with a widget sidebar",
        ),
        Template::new(
            "documentation",
            "Documentation",
            "two_columns_sidebar_left",
            Sequential,
            "Left sidebar for navigation, content on the right",
        ),
    ]
}
