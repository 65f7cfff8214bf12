use sceneflow_api_core::{CoreError, ObjectCategory, ObjectId};
use sceneflow_layout_core::{CanvasConfig, Cell, PlacementItem, PlacementMap, SearchStrategy};

fn map() -> PlacementMap {
    PlacementMap::new(CanvasConfig::default())
}

fn obj(n: u32) -> ObjectId {
    ObjectId(n)
}

/// Occupied rectangles expanded by their margin ring never reach into each
/// other's occupied cells.
fn assert_margin_respecting(map: &PlacementMap) {
    let items: Vec<&PlacementItem> = map.items().collect();
    for (i, a) in items.iter().enumerate() {
        for b in items.iter().skip(i + 1) {
            let expanded_a = (
                a.row.saturating_sub(1),
                a.col.saturating_sub(1),
                a.row + a.height + 1,
                a.col + a.width + 1,
            );
            let disjoint = b.row >= expanded_a.2
                || b.row + b.height <= expanded_a.0
                || b.col >= expanded_a.3
                || b.col + b.width <= expanded_a.1;
            assert!(
                disjoint,
                "{:?} and {:?} violate the margin ring",
                a.object, b.object
            );
        }
    }
}

/// Every row touched by an object holds only free, margin or same-category
/// cells.
fn assert_category_rows(map: &PlacementMap) {
    for item in map.items() {
        for row in item.row..item.row + item.height {
            for col in 0..map.grid().width() {
                if let Cell::Occupied(cat) = map.grid().cell(row, col) {
                    assert_eq!(cat, item.category, "row {row} mixes categories");
                }
            }
        }
    }
}

#[test]
fn beside_first_packs_rows_before_advancing() {
    let mut m = map();
    let first = m.place(obj(0), ObjectCategory::Row, 5, 1, None).unwrap();
    let second = m.place(obj(1), ObjectCategory::Row, 3, 1, None).unwrap();
    assert_eq!(first, (1, 1));
    // Same row, one shared margin column between the rectangles.
    assert_eq!(second, (1, 7));
    assert_margin_respecting(&m);
}

#[test]
fn below_first_prefers_new_rows() {
    let mut m = PlacementMap::new(CanvasConfig {
        strategy: SearchStrategy::BelowFirst,
        ..CanvasConfig::default()
    });
    m.place(obj(0), ObjectCategory::Row, 5, 1, None).unwrap();
    let second = m.place(obj(1), ObjectCategory::Row, 5, 1, None).unwrap();
    assert_eq!(second, (3, 1));
}

#[test]
fn scenario_d_growth_preserves_aspect() {
    // 5x1 then 9x4 fit the initial 16x9 grid without growth; a 20x4 request
    // forces six +1/+1 growth steps (16x9 -> 17x10 -> ... -> 22x15).
    let mut m = map();
    let a = m.place(obj(0), ObjectCategory::Row, 5, 1, None).unwrap();
    let b = m.place(obj(1), ObjectCategory::Row, 9, 4, None).unwrap();
    assert_eq!(a, (1, 1));
    assert_eq!(b, (3, 1));
    assert_eq!(m.grid_size(), (16, 9));
    assert_margin_respecting(&m);

    let c = m.place(obj(2), ObjectCategory::Row, 20, 4, None).unwrap();
    assert_eq!(m.grid_size(), (22, 15));
    assert_eq!(c, (8, 1));
    assert_margin_respecting(&m);
    assert_category_rows(&m);
}

#[test]
fn categories_never_share_rows() {
    let mut m = map();
    m.place(obj(0), ObjectCategory::Row, 4, 1, None).unwrap();
    let block = m.place(obj(1), ObjectCategory::Block, 4, 3, None).unwrap();
    // The block cannot join row 1 even though there is free space there.
    assert_eq!(block, (3, 1));
    assert_category_rows(&m);
    assert_margin_respecting(&m);
}

#[test]
fn alignment_restricts_to_target_row() {
    // Under below-first an unaligned 4x1 would land at (3, 1); alignment
    // forces it onto the target's row instead.
    let mut m = PlacementMap::new(CanvasConfig {
        strategy: SearchStrategy::BelowFirst,
        ..CanvasConfig::default()
    });
    m.place(obj(0), ObjectCategory::Row, 4, 1, None).unwrap();
    let aligned = m
        .place(obj(1), ObjectCategory::Row, 4, 1, Some(obj(0)))
        .unwrap();
    assert_eq!(aligned, (1, 6));
    assert_margin_respecting(&m);
}

#[test]
fn alignment_offers_every_row_of_a_tall_target() {
    let mut m = map();
    let target = m.place(obj(0), ObjectCategory::Block, 2, 3, None).unwrap();
    assert_eq!(target, (1, 1));
    // Blocks the remainder of the target's top row for a wide rectangle.
    m.place(obj(1), ObjectCategory::Block, 2, 1, None).unwrap();

    // 10 cells wide: no room left in row 1, but row 3 of the target still
    // has space. The aligned search must offer it instead of growing.
    let aligned = m
        .place(obj(2), ObjectCategory::Block, 10, 1, Some(obj(0)))
        .unwrap();
    assert_eq!(aligned, (3, 4));
    assert_eq!(m.grid_size(), (16, 9));
    assert_margin_respecting(&m);
    assert_category_rows(&m);
}

#[test]
fn alignment_category_mismatch_is_fatal() {
    let mut m = map();
    m.place(obj(0), ObjectCategory::Row, 4, 1, None).unwrap();
    let err = m
        .place(obj(1), ObjectCategory::Block, 4, 3, Some(obj(0)))
        .unwrap_err();
    assert_eq!(
        err,
        CoreError::InvalidAlignment {
            target: obj(0),
            target_category: ObjectCategory::Row,
            category: ObjectCategory::Block,
        }
    );
}

#[test]
fn oversized_requests_exhaust_the_cap() {
    let mut m = PlacementMap::new(CanvasConfig {
        growth_cap: 4,
        ..CanvasConfig::default()
    });
    let err = m.place(obj(0), ObjectCategory::Bulk, 100, 2, None).unwrap_err();
    assert!(matches!(err, CoreError::PlacementExhausted { .. }));
}

#[test]
fn group_arrangement_matches_canvas_aspect() {
    // Four 3x1 items: one column is too tall (3/7 aspect), two columns beat
    // the 16:9 canvas aspect (7/3), so the group lands as a 2x2 sub-grid.
    let mut m = map();
    let members = [
        (obj(0), 3, 1),
        (obj(1), 3, 1),
        (obj(2), 3, 1),
        (obj(3), 3, 1),
    ];
    let origins = m
        .place_group(ObjectCategory::Row, &members, None)
        .unwrap();
    assert_eq!(origins, vec![(1, 1), (1, 5), (3, 1), (3, 5)]);
    assert_margin_respecting(&m);
    assert_category_rows(&m);
}

#[test]
fn group_split_stops_at_exact_aspect_parity() {
    // On a square canvas, two 1x1 items per row give the group aspect 3/3,
    // exactly the canvas aspect. Doubling must stop there, not push on to a
    // single row.
    let mut m = PlacementMap::new(CanvasConfig {
        width: 8,
        height: 8,
        ..CanvasConfig::default()
    });
    let members = [
        (obj(0), 1, 1),
        (obj(1), 1, 1),
        (obj(2), 1, 1),
        (obj(3), 1, 1),
    ];
    let origins = m
        .place_group(ObjectCategory::Row, &members, None)
        .unwrap();
    assert_eq!(origins, vec![(1, 1), (1, 3), (3, 1), (3, 3)]);
}

#[test]
fn forced_single_column_group() {
    let mut m = map();
    let members = [
        (obj(0), 3, 1),
        (obj(1), 3, 1),
        (obj(2), 3, 1),
        (obj(3), 3, 1),
    ];
    let origins = m
        .place_group(ObjectCategory::Row, &members, Some(1))
        .unwrap();
    assert_eq!(origins, vec![(1, 1), (3, 1), (5, 1), (7, 1)]);
    assert_eq!(m.grid_size(), (16, 9));
}

#[test]
fn reset_keeps_retained_objects() {
    let mut m = map();
    m.place(obj(0), ObjectCategory::Row, 5, 1, None).unwrap();
    m.place(obj(1), ObjectCategory::Row, 9, 4, None).unwrap();

    m.reset(&[obj(1)], true).unwrap();
    assert_eq!(m.len(), 1);
    assert!(!m.contains(obj(0)));
    // Pinned: identical coordinates survive the reset.
    assert_eq!(m.get(obj(1)).unwrap().row, 3);
    assert_eq!(m.get(obj(1)).unwrap().col, 1);

    // Without pinning, the kept object is re-placed by search and moves up.
    m.place(obj(2), ObjectCategory::Row, 2, 1, None).unwrap();
    m.reset(&[obj(1)], false).unwrap();
    assert_eq!(m.get(obj(1)).unwrap().row, 1);
    assert_eq!(m.get(obj(1)).unwrap().col, 1);
}

#[test]
fn viewport_queries_track_used_region() {
    let mut m = map();
    assert_eq!(m.used_width(), 1);
    assert_eq!(m.used_height(), 1);

    m.place(obj(0), ObjectCategory::Row, 5, 1, None).unwrap();
    // Rect spans cols 1..=5 plus margin col 6 -> width 7; rows 0..=2 -> 3.
    assert_eq!(m.used_width(), 7);
    assert_eq!(m.used_height(), 3);
    assert_eq!(m.origin(), (3.5, 1.5));
    let scale = m.fit_scale(16.0, 9.0);
    assert!((scale - 0.5).abs() < 1e-6);
}

#[test]
fn dump_is_row_major_ascii() {
    let mut m = PlacementMap::new(CanvasConfig {
        width: 6,
        height: 4,
        ..CanvasConfig::default()
    });
    m.place(obj(0), ObjectCategory::Row, 2, 1, None).unwrap();
    let dump = m.dump();
    let rows: Vec<&str> = dump.lines().collect();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0], "****  ");
    assert_eq!(rows[1], "*OO*  ");
    assert_eq!(rows[2], "****  ");
    assert_eq!(rows[3], "      ");
}
