use super::*;

#[test]
fn default_runs_from_transparent_black_to_white() {
    let g = Gradient::default();
    assert_eq!(g.evaluate(-1.0), [0.0; 4]);
    assert_eq!(g.evaluate(0.5), [0.5; 4]);
    assert_eq!(g.evaluate(2.0), [1.0; 4]);
}

#[test]
fn bake_hits_both_ends() {
    let lut = Gradient::default().bake(5);
    assert_eq!(lut.len(), 5);
    assert_eq!(lut[0], [0.0; 4]);
    assert_eq!(lut[2], [0.5; 4]);
    assert_eq!(lut[4], [1.0; 4]);
}

#[test]
fn validation_rejects_bad_stops() {
    assert!(Gradient::new(vec![]).is_err());
    let unsorted = vec![
        GradientKey {
            time: 1.0,
            color: [1.0; 4],
        },
        GradientKey {
            time: 0.0,
            color: [0.0; 4],
        },
    ];
    assert!(Gradient::new(unsorted).is_err());
    let nan = GradientKey {
        time: 0.0,
        color: [f32::NAN, 0.0, 0.0, 1.0],
    };
    assert!(Gradient::new(vec![nan]).is_err());
}
