use common::shapes::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_new_and_getters() {
    let rect = Rectangle::new(2.0, 3.0, 4.0, 6.0);
    assert_eq!(rect.width(), 4.0);
    assert_eq!(rect.height(), 6.0);
    assert_eq!(rect.left(), 2.0);
    assert_eq!(rect.right(), 6.0);
    assert_eq!(rect.top(), 3.0);
    assert_eq!(rect.bottom(), 9.0);
    assert_eq!(rect.center_x(), 4.0);
    assert_eq!(rect.center_y(), 6.0);
    assert_eq!(rect.top_left(), (2.0, 3.0));
    assert_eq!(rect.bottom_right(), (6.0, 9.0));
}

#[test]
fn test_from_min_max() {
    let rect = Rectangle::from_min_max(-1.0, -2.0, 3.0, 4.0);
    assert_eq!(rect, Rectangle::new(-1.0, -2.0, 4.0, 6.0));
}

#[test]
fn test_normalized_flips_negative_extents() {
    let rect = Rectangle::new(10.0, 10.0, -4.0, -2.0).normalized();
    assert_eq!(rect, Rectangle::new(6.0, 8.0, 4.0, 2.0));

    let untouched = Rectangle::new(1.0, 1.0, 0.0, 3.0);
    assert_eq!(untouched.normalized(), untouched);
}

#[test]
fn test_contains_point() {
    let rect = Rectangle::new(2.0, 3.0, 4.0, 6.0);
    assert!(rect.contains_point(2.0, 3.0));
    assert!(rect.contains_point(6.0, 9.0));
    assert!(!rect.contains_point(6.5, 3.0));
    assert!(!rect.contains_point(2.0, 9.5));
}

#[test]
fn test_contains_rectangle_allows_touching_edges() {
    let outer = Rectangle::new(0.0, 0.0, 10.0, 10.0);
    assert!(outer.contains_rectangle(&Rectangle::new(0.0, 0.0, 10.0, 10.0)));
    assert!(outer.contains_rectangle(&Rectangle::new(5.0, 5.0, 0.0, 0.0)));
    assert!(!outer.contains_rectangle(&Rectangle::new(5.0, 5.0, 6.0, 1.0)));
    assert!(!outer.contains_rectangle(&Rectangle::new(-1.0, 5.0, 2.0, 1.0)));
}

#[test]
fn test_intersects() {
    let a = Rectangle::new(0.0, 0.0, 10.0, 10.0);
    assert!(a.intersects(&Rectangle::new(5.0, 5.0, 10.0, 10.0)));
    assert!(a.intersects(&Rectangle::new(10.0, 10.0, 5.0, 5.0)));
    assert!(a.intersects(&Rectangle::new(3.0, 3.0, 0.0, 0.0)));
    assert!(!a.intersects(&Rectangle::new(10.5, 0.0, 5.0, 5.0)));
    assert!(!a.intersects(&Rectangle::new(0.0, -6.0, 5.0, 5.0)));
}

#[test]
fn test_expand_to_include() {
    let mut rect = Rectangle::new(2.0, 3.0, 4.0, 6.0);
    let other_rect = Rectangle::new(-2.0, 5.0, 4.0, 8.0);
    rect.expand_to_include(&other_rect);
    assert_eq!(rect.left(), -2.0);
    assert_eq!(rect.right(), 6.0);
    assert_eq!(rect.top(), 3.0);
    assert_eq!(rect.bottom(), 13.0);
    assert_eq!(rect, other_rect.union(&Rectangle::new(2.0, 3.0, 4.0, 6.0)));
}

#[test]
fn test_union_reaches_far_edges_exactly() {
    let a = Rectangle::new(158.82475, -259.4389, 5.0, 5.0);
    let b = Rectangle::new(280.73187, 205.04861, 29.889519, 8.474164);
    let union = a.union(&b);
    assert!(union.contains_rectangle(&a));
    assert!(union.contains_rectangle(&b));
    assert!(union.bottom() >= b.bottom());

    let covering = Rectangle::covering(a.left(), a.top(), b.right(), b.bottom());
    assert!(covering.contains_rectangle(&a));
    assert!(covering.contains_rectangle(&b));
    assert_eq!(covering.top_left(), (a.left(), a.top()));
}

#[test]
fn test_covering_keeps_exact_extents() {
    assert_eq!(
        Rectangle::covering(-1.0, -2.0, 3.0, 4.0),
        Rectangle::new(-1.0, -2.0, 4.0, 6.0)
    );
    assert_eq!(
        Rectangle::covering(5.0, 5.0, 5.0, 5.0),
        Rectangle::new(5.0, 5.0, 0.0, 0.0)
    );
}

#[test]
fn test_get_random_rectangle_inside() {
    let rect = Rectangle::new(2.0, 3.0, 60.0, 80.0);

    // Use a fixed seed for reproducibility.
    let mut rng: StdRng = SeedableRng::seed_from_u64(123);

    for _ in 0..10 {
        let inner = rect.get_random_rectangle_inside(5.0, 7.0, &mut rng);
        assert!(rect.contains_rectangle(&inner));
    }
}

#[test]
fn test_get_random_rectangle_inside_small_rectangle() {
    let rect = Rectangle::new(2.0, 3.0, 2.0, 2.0);

    let mut rng: StdRng = SeedableRng::seed_from_u64(123);

    let inner = rect.get_random_rectangle_inside(4.0, 4.0, &mut rng);
    // Too large to fit, so it is pinned to the top-left corner.
    assert_eq!(inner.top_left(), rect.top_left());
}
