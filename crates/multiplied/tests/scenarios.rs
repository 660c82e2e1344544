//! End-to-end scenarios covering construction, compilation, maps, and
//! execution through the public API only.

use multiplied::{
    build_dadda_map, hoist, Algorithm, AlgorithmConfig, Ambiguity, Bitwidth, Error, Map,
    Matrix, Pattern, Tag, Template, ZeroOperandPolicy,
};

// ============================================================================
// Matrix Construction
// ============================================================================

#[test]
fn operand_rows_follow_the_multiplier_bits() {
    let m = Matrix::from_operands(4, 5, 4).unwrap();
    assert_eq!(m.checksum(), &[false, false, true, false]);
    assert_eq!(m.value(), 20);
    assert_eq!(m.to_string(), "____0000\n___0000_\n__0101__\n_0000___");

    let mut algorithm = Algorithm::new(4).unwrap();
    algorithm.auto_resolve_stage(true).unwrap();
    let trace = algorithm.exec(5, 4).unwrap();
    assert_eq!(trace.values().last().unwrap().row_value(0), 20);
}

#[test]
fn zero_operands_give_the_zero_shape() {
    for (a, b) in [(0, 0), (0, 7), (7, 0)] {
        let m = Matrix::from_operands(4, a, b).unwrap();
        assert_eq!(m, Matrix::zero(Bitwidth::Four));
        assert_eq!(m.checksum(), &[false; 4]);
        assert_eq!(m.value(), 0);
    }
}

#[test]
fn out_of_range_operands_are_rejected() {
    assert_eq!(
        Matrix::from_operands(4, 16, 0).unwrap_err(),
        Error::OperandOutOfRange { operand: 16, bits: 4 }
    );
    assert_eq!(
        Matrix::from_operands(6, 1, 1).unwrap_err(),
        Error::UnsupportedBitwidth { bits: 6 }
    );
}

// ============================================================================
// Template Compilation
// ============================================================================

#[test]
fn paired_adders_reduce_full_operands() {
    let mut algorithm = Algorithm::new(4).unwrap();
    algorithm.push("aabb".parse::<Pattern>().unwrap(), None).unwrap();
    assert_eq!(
        algorithm.stages()[0].template().grid().to_string(),
        "____AaAa\n___aAaA_\n__BbBb__\n_bBbB___"
    );
    algorithm.auto_resolve_stage(true).unwrap();

    let trace = algorithm.exec(15, 15).unwrap();
    let last = trace.values().last().unwrap();
    assert_eq!(last.row_value(0), 225);
}

#[test]
fn units_reproduce_the_pattern_layout() {
    let seed = Matrix::seed(8).unwrap();
    let pattern: Pattern = "aaabbbcd".parse().unwrap();
    let template = Template::from_pattern(&pattern, &seed).unwrap();

    let bounds = template.find_bounding_box();
    assert_eq!(bounds.tags().count(), 4);

    let units = template.collect_template_units().unwrap();
    let layout: Vec<_> = units.iter().map(|unit| (unit.tag(), unit.rows())).collect();
    let expected: Vec<_> = pattern
        .runs()
        .into_iter()
        .filter_map(|run| run.tag.map(|tag| (tag, run.rows())))
        .collect();
    assert_eq!(layout, expected);
    for unit in &units {
        for row in unit.rows() {
            assert!(unit.grid().row_active(row));
        }
    }
}

#[test]
fn runs_longer_than_three_do_not_compile() {
    let seed = Matrix::seed(4).unwrap();
    let pattern: Pattern = "aaaa".parse().unwrap();
    assert_eq!(
        Template::from_pattern(&pattern, &seed).unwrap_err(),
        Error::UnsupportedRunLength {
            tag: Tag::FIRST,
            row: 0,
            run: 4
        }
    );
}

#[test]
fn reused_tags_are_ambiguous() {
    let mut algorithm = Algorithm::new(4).unwrap();
    let err = algorithm.push("abab".parse::<Pattern>().unwrap(), None).unwrap_err();
    assert!(matches!(
        err,
        Error::StructuralAmbiguity(Ambiguity::NonAdjacentRows { .. })
    ));
    assert!(algorithm.is_empty());
}

#[test]
fn untagged_rows_must_be_empty() {
    let seed = Matrix::seed(4).unwrap();
    let pattern: Pattern = "aab_".parse().unwrap();
    assert_eq!(
        Template::from_pattern(&pattern, &seed).unwrap_err(),
        Error::UntaggedActiveRow { row: 3 }
    );
}

// ============================================================================
// Maps
// ============================================================================

#[test]
fn hoisting_the_seed_reproduces_the_dadda_table() {
    for bits in [4, 8] {
        let mut seed = Matrix::seed(bits).unwrap();
        let checksum = seed.checksum().to_vec();
        let map = hoist(&mut seed, &checksum, false).unwrap();
        assert_eq!(map, build_dadda_map(bits).unwrap(), "{bits}-bit");
    }
}

#[test]
fn zero_rows_can_be_packed_as_empty() {
    let mut m = Matrix::from_operands(4, 5, 10).unwrap();
    let map = m.resolve_rmap(false);
    assert_eq!(map.render_rows(), vec!["00", "FF", "00", "FE"]);
    m.apply_map(&map).unwrap();
    // Row 1 lands on the all-zero row 0; the zero row 2 stays put.
    assert_eq!(m.to_string(), "___0101_\n_0101___\n__0000__\n________");
    assert_eq!(m.checksum(), &[true, true, true, false]);
    assert_eq!(m.value(), 50);
}

#[test]
fn hex_row_maps_round_trip_through_text() {
    let map = Map::from_hex_rows(&["00", "FF", "FF", "FE"]).unwrap();
    assert_eq!(map.row_offsets(), Some(&[0, -1, -1, -2][..]));
    assert_eq!(map.to_string(), "00\nFF\nFF\nFE");
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn replay_runs_stages_on_the_zero_shape() {
    let config = AlgorithmConfig {
        zero_operands: ZeroOperandPolicy::Replay,
        ..AlgorithmConfig::default()
    };
    let mut algorithm = Algorithm::with_config(8, config).unwrap();
    algorithm.auto_resolve_stage(true).unwrap();
    let trace = algorithm.exec(0, 200).unwrap();
    assert_eq!(trace.len(), algorithm.len() + 1);
    assert!(trace.values().all(|m| m.value() == 0));
}

#[test]
fn stage_ceiling_stops_runaway_plans() {
    let config = AlgorithmConfig {
        max_stages: 1,
        ..AlgorithmConfig::default()
    };
    let mut algorithm = Algorithm::with_config(4, config).unwrap();
    assert_eq!(
        algorithm.auto_resolve_stage(true).unwrap_err(),
        Error::RunawayReduction { limit: 1 }
    );
}
