//! Document walker.

use crate::error::{Error, Result};
use crate::model::{ContentNode, RefId};

use super::classify::{classify_sized, classify_styled};
use super::options::FontSizeThresholds;
use super::{DocumentSource, ImageHandle, SourceElement};

/// Walk a document's elements in physical order and classify them.
///
/// Returns the node sequence and the final image counter. Each picture
/// element yields exactly one image node numbered by the counter; text
/// elements that trim to nothing yield no node.
///
/// # Errors
/// [`Error::EmptyDocument`] if no node is produced.
pub fn walk<S>(source: &S, thresholds: &FontSizeThresholds) -> Result<(Vec<ContentNode>, u32)>
where
    S: DocumentSource + ?Sized,
{
    let elements = source.elements();
    let mut nodes = Vec::with_capacity(elements.len());
    let mut image_counter = 0u32;

    for element in elements {
        let node = match element {
            SourceElement::Picture { .. } => {
                image_counter += 1;
                Some(ContentNode::image(RefId::new(image_counter)))
            }
            SourceElement::Styled { style, text } => classify_styled(style, text),
            SourceElement::Sized { font_size, lines } => {
                classify_sized(*font_size, lines, thresholds)
            }
        };
        nodes.extend(node);
    }

    log::debug!(
        "Walked {} elements into {} nodes ({} images)",
        elements.len(),
        nodes.len(),
        image_counter
    );

    if nodes.is_empty() {
        return Err(Error::EmptyDocument);
    }

    Ok((nodes, image_counter))
}

/// Image references in walk order, paired with their payload handles.
///
/// Numbering matches [`walk`]: the k-th picture element gets `__IMAGE_k__`.
pub fn picture_refs(elements: &[SourceElement]) -> Vec<(RefId, Option<&ImageHandle>)> {
    elements
        .iter()
        .filter_map(|element| match element {
            SourceElement::Picture { handle } => Some(handle.as_ref()),
            _ => None,
        })
        .enumerate()
        .map(|(idx, handle)| (RefId::new(idx as u32 + 1), handle))
        .collect()
}
