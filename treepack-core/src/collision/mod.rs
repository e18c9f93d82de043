//! Pairwise overlap detection across one group's tree images.

mod index;

pub use index::BoxTree;

use log::debug;

use crate::{error::OverlapDetected, geometry::polygon::Polygon};

/// First pair `(i, j)`, `i < j`, whose interiors overlap.
///
/// Candidate pairs come from a bounding-box tree; each is then tested with
/// the exact predicate, so trees that only touch are never reported.
pub fn find_overlap(images: &[Polygon]) -> Option<(usize, usize)> {
    let tree = BoxTree::new(images.iter().map(|p| *p.bbox()).collect());
    let mut candidates = Vec::new();
    let mut tested = 0usize;
    for (i, image) in images.iter().enumerate() {
        tree.query(image.bbox(), &mut candidates);
        for &j in candidates.iter().filter(|&&j| j > i) {
            tested += 1;
            if image.interiors_overlap(&images[j]) {
                debug!("overlap between {} and {} after {} exact tests", i, j, tested);
                return Some((i, j));
            }
        }
    }
    debug!("no overlap among {} images ({} exact tests)", images.len(), tested);
    None
}

/// [`find_overlap`] as a typed failure, tagged with the group size `group`.
pub fn check_no_overlap(group: usize, images: &[Polygon]) -> Result<(), OverlapDetected> {
    match find_overlap(images) {
        Some((first, second)) => Err(OverlapDetected { group, first, second }),
        None => Ok(()),
    }
}

/// True if any two images overlap with positive area.
pub fn has_illegal_overlap(images: &[Polygon]) -> bool {
    find_overlap(images).is_some()
}
