//! Property-based invariant tests for geometry primitives.
//!
//! 1. Intersection is commutative.
//! 2. Intersection fits within both inputs.
//! 3. Outset grows each edge by exactly the margin.
//! 4. `clamp_low_wins` stays in range whenever the range is non-empty.

use guidepost_core::geometry::{Rect, Sides, clamp_low_wins};
use proptest::prelude::*;

fn rect_strategy() -> impl Strategy<Value = Rect> {
    (0u32..=2000, 0u32..=2000, 0u32..=800, 0u32..=800).prop_map(|(x, y, w, h)| {
        Rect::new(f64::from(x), f64::from(y), f64::from(w), f64::from(h))
    })
}

proptest! {
    #[test]
    fn intersection_commutative(a in rect_strategy(), b in rect_strategy()) {
        prop_assert_eq!(a.intersection_opt(&b), b.intersection_opt(&a));
    }

    #[test]
    fn intersection_fits_within_both(a in rect_strategy(), b in rect_strategy()) {
        if let Some(inter) = a.intersection_opt(&b) {
            prop_assert!(inter.left() >= a.left() && inter.left() >= b.left());
            prop_assert!(inter.top() >= a.top() && inter.top() >= b.top());
            prop_assert!(inter.right() <= a.right() && inter.right() <= b.right());
            prop_assert!(inter.bottom() <= a.bottom() && inter.bottom() <= b.bottom());
        }
    }

    #[test]
    fn outset_moves_each_edge(r in rect_strategy(), m in 0u32..64) {
        let m = f64::from(m);
        let grown = r.outset(Sides::all(m));
        prop_assert_eq!(grown.left(), r.left() - m);
        prop_assert_eq!(grown.top(), r.top() - m);
        prop_assert_eq!(grown.right(), r.right() + m);
        prop_assert_eq!(grown.bottom(), r.bottom() + m);
    }

    #[test]
    fn clamp_low_wins_in_range(v in -5000i32..5000, lo in -100i32..100, span in 0i32..1000) {
        let lo = f64::from(lo);
        let hi = lo + f64::from(span);
        let out = clamp_low_wins(f64::from(v), lo, hi);
        prop_assert!(out >= lo);
        prop_assert!(out <= hi);
    }
}
