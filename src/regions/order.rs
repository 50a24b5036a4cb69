//! Reading-order arrangement of emitted regions.

use crate::types::Region;

/// Fraction of the pivot's height two regions must share vertically to be
/// considered part of the same row.
const ROW_OVERLAP: f64 = 0.5;

/// Sort regions top-to-bottom, left-to-right.
///
/// Rows are formed greedily: the topmost (then leftmost) remaining region
/// anchors a row, every remaining region overlapping it vertically by at
/// least half the anchor's height joins, and the row is ordered by `x`
/// with `y` breaking ties. Regions with identical coordinates keep their
/// input order.
pub fn sort_reading_order(regions: &mut Vec<Region>) {
    let mut start = 0;
    while start < regions.len() {
        let mut anchor = start;
        for i in (start + 1)..regions.len() {
            let (a, b) = (&regions[i], &regions[anchor]);
            if a.y < b.y || (a.y == b.y && a.x < b.x) {
                anchor = i;
            }
        }
        regions.swap(start, anchor);

        let (ry, rh) = (regions[start].y, regions[start].h);
        let same_row = |s: &Region| {
            let top = ry.max(s.y);
            let bottom = (ry + rh).min(s.y + s.h);
            bottom - top >= ROW_OVERLAP * rh
        };

        // Stable partition of the remainder into this row and the rest.
        let (mut row, rest): (Vec<Region>, Vec<Region>) =
            regions[start + 1..].iter().copied().partition(same_row);
        row.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));

        let row_len = row.len();
        regions.splice(start + 1.., row.into_iter().chain(rest));
        start += 1 + row_len;
    }
}
