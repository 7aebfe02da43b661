//! Integration tests for the distribution and setup calculators working
//! against the stock design catalog.

use opsdeck::calc::{compute_distribution, compute_setup, SetupParams};
use opsdeck::models::{AdjustmentType, Design, PieceColor};

fn palette(n: usize) -> Vec<PieceColor> {
    (0..n)
        .map(|i| PieceColor {
            r: i as u8,
            g: 0,
            b: 0,
        })
        .collect()
}

#[test]
fn test_even_split_no_adjustments() {
    let d = compute_distribution(&palette(4), 12).unwrap();
    assert_eq!(d.base_pieces_per_color, 3);
    assert_eq!(d.adjustment_count, 0);
    assert!(d.distribution.iter().all(|s| s.count == 3));
}

#[test]
fn test_add_and_subtract_selection() {
    // 14 over 4: adding 2 beats subtracting 2 on the tie
    let d = compute_distribution(&palette(4), 14).unwrap();
    assert_eq!(d.adjustment_type, AdjustmentType::Add);
    let counts: Vec<u32> = d.distribution.iter().map(|s| s.count).collect();
    assert_eq!(counts, vec![4, 3, 4, 3]);

    // 11 over 4: subtracting 1 beats adding 3
    let d = compute_distribution(&palette(4), 11).unwrap();
    assert_eq!(d.adjustment_type, AdjustmentType::Subtract);
    assert_eq!(d.sum(), 11);
}

#[test]
fn test_every_stock_design_covers_any_grid() {
    for design in Design::stock_catalog() {
        for total in [0, 1, 7, 48, 100, 999] {
            let d = compute_distribution(design.colors(), total).unwrap();
            assert_eq!(d.sum(), total, "design {} total {total}", design.name);
            assert_eq!(d.color_count as usize, design.color_count());

            let max = d.distribution.iter().map(|s| s.count).max().unwrap();
            let min = d.distribution.iter().map(|s| s.count).min().unwrap();
            assert!(max - min <= 1, "deviation above 1 for {}", design.name);
        }
    }
}

#[test]
fn test_distribution_preserves_palette_order() {
    let design = &Design::stock_catalog()[0];
    let d = compute_distribution(design.colors(), 137).unwrap();
    let palette: Vec<_> = d.distribution.iter().map(|s| s.color).collect();
    assert_eq!(palette, design.colors());
}

#[test]
fn test_distribution_feeds_setup() {
    // A full order flow: distribute a 25x20 grid, then stage materials
    let design = &Design::stock_catalog()[1];
    let d = compute_distribution(design.colors(), 500).unwrap();
    assert_eq!(d.sum(), 500);

    let plan = compute_setup(d.total_pieces, &SetupParams::default()).unwrap();
    assert_eq!(plan.sheets, 11); // 11 * 48 = 528 >= 500
    assert_eq!(plan.boxes, 5);
    assert_eq!(plan.cartons, 1);
}

#[test]
fn test_empty_palette_is_rejected() {
    assert!(compute_distribution(&[], 10).is_err());
}
