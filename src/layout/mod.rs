//! Column layouts and content distribution.

mod distribute;
mod registry;

pub use distribute::{
    distribute, distribute_or_first_column, DistributionResult, DistributionStrategy,
};
pub use registry::{
    main_column_index, ColumnRole, ColumnSpec, LayoutDefinition, LayoutRegistry, Spacing,
    Template, DEFAULT_LAYOUT,
};
