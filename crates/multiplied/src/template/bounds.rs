//! Per-tag boundary coordinates of an annotated grid.

use std::collections::BTreeMap;

use crate::cell::{Grid, Slot, Tag};

/// Boundary points per tag, keyed by tag identity (`None` collects the
/// empty stretches).
///
/// Each row is scanned left to right. The row's first cell opens a span,
/// every change of tag closes one span and opens the next, and the last
/// cell closes the final span, so a span contributes exactly two
/// `(col, row)` points: entry then exit. Points are listed row-major.
///
/// ```text
/// __AaAa__   None: (0,0) (1,0) (6,0) (7,0)
///            A:    (2,0) (5,0)
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundingBox {
    points: BTreeMap<Option<Tag>, Vec<(usize, usize)>>,
}

impl BoundingBox {
    /// Scan a template grid.
    #[must_use]
    pub fn find(grid: &Grid<Slot>) -> Self {
        let mut points: BTreeMap<Option<Tag>, Vec<(usize, usize)>> = BTreeMap::new();
        let mut record = |key: Option<Tag>, col: usize, row: usize| {
            points.entry(key).or_default().push((col, row));
        };
        for (row, cells) in grid.iter_rows().enumerate() {
            let Some(first) = cells.first() else {
                continue;
            };
            record(first.tag(), 0, row);
            for (col, pair) in cells.windows(2).enumerate() {
                let (curr, next) = (pair[0].tag(), pair[1].tag());
                if curr != next {
                    record(curr, col, row);
                    record(next, col + 1, row);
                }
            }
            record(cells[cells.len() - 1].tag(), cells.len() - 1, row);
        }
        Self { points }
    }

    /// Points recorded for `key`.
    #[must_use]
    pub fn get(&self, key: Option<Tag>) -> Option<&[(usize, usize)]> {
        self.points.get(&key).map(Vec::as_slice)
    }

    /// Tags present in the grid, in alphabetical order.
    pub fn tags(&self) -> impl Iterator<Item = Tag> + '_ {
        self.points.keys().filter_map(|key| *key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(text: &str) -> Grid<Slot> {
        Grid::parse_text(text).unwrap().1
    }

    fn tag(c: char) -> Option<Tag> {
        Tag::from_char(c)
    }

    #[test]
    fn each_span_has_entry_and_exit() {
        let bounds = BoundingBox::find(&grid("____AaAa\n___aAaA_\n__BbBb__\n_bBbB___"));
        assert_eq!(
            bounds.get(tag('a')).unwrap(),
            &[(4, 0), (7, 0), (3, 1), (6, 1)]
        );
        assert_eq!(
            bounds.get(tag('b')).unwrap(),
            &[(2, 2), (5, 2), (1, 3), (4, 3)]
        );
        assert_eq!(bounds.get(None).unwrap()[..4], [(0, 0), (3, 0), (0, 1), (2, 1)]);
        assert_eq!(bounds.tags().count(), 2);
    }

    #[test]
    fn adjacent_tags_share_a_transition() {
        let bounds = BoundingBox::find(&grid("AaAaBbBb\n________\n________\n________"));
        assert_eq!(bounds.get(tag('a')).unwrap(), &[(0, 0), (3, 0)]);
        assert_eq!(bounds.get(tag('b')).unwrap(), &[(4, 0), (7, 0)]);
    }

    #[test]
    fn single_cell_spans_repeat_the_point() {
        let bounds = BoundingBox::find(&grid("_______A\n________\n________\n________"));
        assert_eq!(bounds.get(tag('a')).unwrap(), &[(7, 0), (7, 0)]);
    }

    #[test]
    fn split_spans_show_up_as_extra_points() {
        let bounds = BoundingBox::find(&grid("_AA__AA_\n________\n________\n________"));
        assert_eq!(bounds.get(tag('a')).unwrap().len(), 4);
    }
}
