//! Content distribution across layout columns.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::ContentNode;

use super::registry::{main_column_index, ColumnSpec};

/// One ordered node list per column, in layout order.
pub type DistributionResult = Vec<Vec<ContentNode>>;

/// Policy for assigning ordered nodes to the columns of a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributionStrategy {
    /// Title and introduction in the main column, the rest balanced
    #[default]
    Auto,
    /// Contiguous runs, first columns take the remainder
    Sequential,
    /// Round-robin
    Alternating,
    /// Equal counts per column (same partition as `Sequential`)
    Balanced,
}

impl DistributionStrategy {
    /// All strategies, in display order.
    pub const ALL: [DistributionStrategy; 4] = [
        DistributionStrategy::Auto,
        DistributionStrategy::Sequential,
        DistributionStrategy::Alternating,
        DistributionStrategy::Balanced,
    ];

    /// Registry name.
    pub fn name(&self) -> &'static str {
        match self {
            DistributionStrategy::Auto => "auto",
            DistributionStrategy::Sequential => "sequential",
            DistributionStrategy::Alternating => "alternating",
            DistributionStrategy::Balanced => "balanced",
        }
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            DistributionStrategy::Auto => "Automatic",
            DistributionStrategy::Sequential => "Sequential",
            DistributionStrategy::Alternating => "Alternating",
            DistributionStrategy::Balanced => "Balanced",
        }
    }

    /// One-line description.
    pub fn description(&self) -> &'static str {
        match self {
            DistributionStrategy::Auto => "Smart placement based on content type",
            DistributionStrategy::Sequential => "Fill column 1, then column 2, and so on",
            DistributionStrategy::Alternating => "Alternate between columns (1-2-1-2...)",
            DistributionStrategy::Balanced => "Same number of elements per column",
        }
    }

    /// Parse a strategy name, falling back to `Auto` for unknown names.
    pub fn from_name_or_auto(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            log::warn!("Unknown distribution strategy '{}', using auto", name);
            DistributionStrategy::Auto
        })
    }
}

impl FromStr for DistributionStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::Distribution(format!("unknown strategy '{}'", s)))
    }
}

impl fmt::Display for DistributionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Partition an ordered node sequence into one list per column.
///
/// A single column is always the identity. Every strategy keeps each node
/// exactly once and preserves relative order inside a column.
///
/// # Errors
/// [`Error::Distribution`] if `columns` is empty or the partition loses or
/// duplicates nodes.
pub fn distribute(
    nodes: &[ContentNode],
    columns: &[ColumnSpec],
    strategy: DistributionStrategy,
) -> Result<DistributionResult> {
    let count = columns.len();
    if count == 0 {
        return Err(Error::Distribution("layout has no columns".into()));
    }
    if count == 1 {
        return Ok(vec![nodes.to_vec()]);
    }

    let result = match strategy {
        DistributionStrategy::Sequential | DistributionStrategy::Balanced => {
            split_contiguous(nodes, count)
        }
        DistributionStrategy::Alternating => round_robin(nodes, count),
        DistributionStrategy::Auto => distribute_auto(nodes, columns),
    };

    let placed: usize = result.iter().map(Vec::len).sum();
    if result.len() != count || placed != nodes.len() {
        return Err(Error::Distribution(format!(
            "{} placed {} of {} nodes into {} columns",
            strategy,
            placed,
            nodes.len(),
            result.len()
        )));
    }

    Ok(result)
}

/// [`distribute`], degrading to "everything in the first column" on error.
pub fn distribute_or_first_column(
    nodes: &[ContentNode],
    columns: &[ColumnSpec],
    strategy: DistributionStrategy,
) -> DistributionResult {
    distribute(nodes, columns, strategy).unwrap_or_else(|e| {
        log::warn!("{}; placing all nodes in the first column", e);
        let mut result = vec![Vec::new(); columns.len().max(1)];
        result[0] = nodes.to_vec();
        result
    })
}

/// Contiguous runs of `floor(n/c)`, the first `n mod c` columns get one more.
fn split_contiguous(nodes: &[ContentNode], count: usize) -> DistributionResult {
    let base = nodes.len() / count;
    let remainder = nodes.len() % count;

    let mut result = Vec::with_capacity(count);
    let mut start = 0;
    for col in 0..count {
        let len = base + usize::from(col < remainder);
        result.push(nodes[start..start + len].to_vec());
        start += len;
    }
    result
}

fn round_robin(nodes: &[ContentNode], count: usize) -> DistributionResult {
    let mut result = vec![Vec::new(); count];
    for (idx, node) in nodes.iter().enumerate() {
        result[idx % count].push(node.clone());
    }
    result
}

fn distribute_auto(nodes: &[ContentNode], columns: &[ColumnSpec]) -> DistributionResult {
    match columns.len() {
        2 => {
            let main = main_column_index(columns);
            let mut result: DistributionResult = vec![Vec::new(), Vec::new()];
            let mut title_found = false;
            let mut intro_added = false;

            for node in nodes {
                if !title_found && node.heading_level() == Some(1) {
                    result[main].push(node.clone());
                    title_found = true;
                } else if title_found && !intro_added && node.is_paragraph() {
                    result[main].push(node.clone());
                    intro_added = true;
                } else {
                    let target = if result[0].len() <= result[1].len() { 0 } else { 1 };
                    result[target].push(node.clone());
                }
            }
            result
        }
        3 => round_robin(nodes, 3),
        count => {
            let mut result = vec![Vec::new(); count];
            result[0] = nodes.to_vec();
            result
        }
    }
}
