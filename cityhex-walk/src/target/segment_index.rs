use crate::model::PassabilityFilter;
use cityhex_core::model::LineFeature;
use geo::Line;
use kdam::tqdm;
use rstar::primitives::{GeomWithData, Rectangle};
use rstar::{RTree, AABB};

const ENVELOPE_PADDING_M: f64 = 1e-6;

pub type IndexedSegment = GeomWithData<Rectangle<[f64; 2]>, Line<f64>>;

/// spatial index over the individual segments of the passable line layer.
pub struct SegmentIndex {
    rtree: RTree<IndexedSegment>,
}

impl SegmentIndex {
    pub fn new(lines: &[LineFeature], filter: &PassabilityFilter) -> SegmentIndex {
        let iter = tqdm!(lines.iter(), total = lines.len(), desc = "index passable segments");
        let segments: Vec<IndexedSegment> = iter
            .filter(|f| filter.accept(f))
            .flat_map(|f| f.segments().collect::<Vec<_>>())
            .map(|l| GeomWithData::new(segment_rectangle(&l), l))
            .collect();
        eprintln!();
        SegmentIndex {
            rtree: RTree::bulk_load(segments),
        }
    }

    pub fn len(&self) -> usize {
        self.rtree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.rtree.size() == 0
    }

    /// segments whose bounding box intersects the bounding box of the query segment.
    pub fn candidates<'a>(&'a self, query: &Line<f64>) -> impl Iterator<Item = &'a Line<f64>> + 'a {
        let envelope = segment_envelope(query);
        self.rtree
            .locate_in_envelope_intersecting(&envelope)
            .map(|obj| &obj.data)
    }
}

fn segment_rectangle(line: &Line<f64>) -> Rectangle<[f64; 2]> {
    Rectangle::from_corners([line.start.x, line.start.y], [line.end.x, line.end.y])
}

/// query envelope, padded so that segments touching only at a corner are found.
fn segment_envelope(line: &Line<f64>) -> AABB<[f64; 2]> {
    let min_x = line.start.x.min(line.end.x) - ENVELOPE_PADDING_M;
    let min_y = line.start.y.min(line.end.y) - ENVELOPE_PADDING_M;
    let max_x = line.start.x.max(line.end.x) + ENVELOPE_PADDING_M;
    let max_y = line.start.y.max(line.end.y) + ENVELOPE_PADDING_M;
    AABB::from_corners([min_x, min_y], [max_x, max_y])
}
