//! Rendering of distributed content into page-builder JSON.

mod ids;
mod json;
mod options;
mod stats;
mod tree;
mod validate;

pub use ids::{generate_id, is_element_id, ID_LEN};
pub use json::{to_json, to_json_value, JsonFormat};
pub use options::TreeOptions;
pub use stats::ConversionStats;
pub use tree::{
    build_output_tree, Column, ColumnSettings, ImageSettings, OutputTree, Section, TreeBuilder,
    Widget, WidgetSettings, WidgetType, TREE_TYPE, TREE_VERSION,
};
pub use validate::{validate_tree_json, TreeStatistics, ValidationReport, KNOWN_TYPES};
