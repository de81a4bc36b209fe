use super::*;

#[test]
fn quarter_turns_swap_extent_and_grid() {
    let r = Rotate::new(Rotation::Rotate90);
    assert_eq!(r.output_size(Extent::new(4, 2)), Extent::new(2, 4));
    assert_eq!(r.output_grid(Grid::new(5, 1)), Grid::new(1, 5));

    let r = Rotate::new(Rotation::Rotate180);
    assert_eq!(r.output_size(Extent::new(4, 2)), Extent::new(4, 2));
    assert_eq!(r.output_grid(Grid::new(5, 1)), Grid::new(5, 1));
    assert_eq!(r.label(), "Rotate (Rotate180)");
}
