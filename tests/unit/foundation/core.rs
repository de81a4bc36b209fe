use super::*;

#[test]
fn extent_clamps_into_texture_limits() {
    assert_eq!(Extent::new(0, 9000).clamp_to_limits(), Extent::new(1, MAX_EXTENT));
    assert_eq!(Extent::new(64, 32).clamp_to_limits(), Extent::new(64, 32));
}

#[test]
fn extent_non_empty_rejects_zero_axis() {
    assert!(Extent::non_empty(0, 4).is_err());
    assert!(Extent::non_empty(4, 0).is_err());
    assert_eq!(Extent::non_empty(4, 2).unwrap().area(), 8);
}

#[test]
fn swapping_exchanges_axes() {
    assert_eq!(Extent::new(3, 7).swapped(), Extent::new(7, 3));
    assert_eq!(Grid::new(2, 5).swapped(), Grid::new(5, 2));
    assert_eq!(Grid::default(), Grid::SINGLE);
}

#[test]
fn clamp_index_handles_bounds_and_empty() {
    assert_eq!(clamp_index(-4, 10), 0);
    assert_eq!(clamp_index(4, 10), 4);
    assert_eq!(clamp_index(42, 10), 9);
    assert_eq!(clamp_index(3, 0), 0);
}
