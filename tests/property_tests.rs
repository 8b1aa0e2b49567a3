use proptest::prelude::*;
use risk_insight_engine::core::position::Position;
use risk_insight_engine::engine::compute_snapshot;
use risk_insight_engine::greeks::aggregator::aggregate;
use risk_insight_engine::insight::generator::generate_insights;
use risk_insight_engine::insight::rules::InsightRule;
use risk_insight_engine::scenario::curve::{generate_curve, CurveParams};

/// Generate a random valid position (call, put or future).
fn arb_position() -> impl Strategy<Value = Position> {
    (
        0u8..3,
        4000.0f64..5000.0,
        0.0f64..200.0,
        1.0f64..100.0,
        any::<bool>(),
        0.0f64..80.0,
    )
        .prop_map(|(kind, strike, premium, quantity, is_long, iv)| match kind {
            0 => Position::call("C", strike, premium, quantity, is_long, iv).unwrap(),
            1 => Position::put("P", strike, premium, quantity, is_long, iv).unwrap(),
            _ => Position::future("F", quantity, is_long).unwrap(),
        })
}

/// Generate a random book of 0..30 positions.
fn arb_book() -> impl Strategy<Value = Vec<Position>> {
    prop::collection::vec(arb_position(), 0..30)
}

fn arb_price() -> impl Strategy<Value = f64> {
    1000.0f64..9000.0
}

/// Generate range/step pairs where step divides range evenly.
fn arb_symmetric_params() -> impl Strategy<Value = CurveParams> {
    (1u32..20, 1u32..40).prop_map(|(step, multiple)| CurveParams {
        range: step * multiple,
        step,
    })
}

proptest! {
    // ===================================================================
    // Snapshots are a pure function of their inputs.
    // ===================================================================
    #[test]
    fn snapshot_is_deterministic(book in arb_book(), price in arb_price()) {
        let a = compute_snapshot(&book, price).unwrap();
        let b = compute_snapshot(&book, price).unwrap();
        prop_assert!(a.same_outcome(&b));
    }

    // ===================================================================
    // The always-on signal appears exactly once, whatever the book.
    // ===================================================================
    #[test]
    fn alpha_signal_always_present_once(book in arb_book(), price in arb_price()) {
        let snapshot = compute_snapshot(&book, price).unwrap();
        let count = snapshot
            .findings()
            .filter(|i| i.rule == InsightRule::AlphaSignal)
            .count();
        prop_assert_eq!(count, 1);
    }

    // ===================================================================
    // Insights keep rule-table order and carry confidence in [0, 1].
    // ===================================================================
    #[test]
    fn insights_follow_rule_order(book in arb_book(), price in arb_price()) {
        let greeks = aggregate(&book, price).unwrap();
        let insights = generate_insights(&greeks, book.len());
        let order = |rule: InsightRule| rule as usize;
        prop_assert!(insights.windows(2).all(|w| order(w[0].rule) < order(w[1].rule)));
        prop_assert!(insights.iter().all(|i| (0.0..=1.0).contains(&i.confidence_score)));
        prop_assert_eq!(
            insights.iter().any(|i| i.rule == InsightRule::BookComplexity),
            book.len() > 10
        );
    }

    // ===================================================================
    // Curve length is 2 * range / step + 1 and prices ascend.
    // ===================================================================
    #[test]
    fn curve_shape(book in arb_book(), price in arb_price(), params in arb_symmetric_params()) {
        let curve = generate_curve(&book, price, params).unwrap();
        prop_assert_eq!(curve.len(), (2 * params.range / params.step) as usize + 1);
        prop_assert!(curve.points().windows(2).all(|w| w[0].underlying_price < w[1].underlying_price));
        prop_assert_eq!(curve.points().first().unwrap().underlying_price, price - params.range as f64);
        prop_assert_eq!(curve.points().last().unwrap().underlying_price, price + params.range as f64);
    }

    // ===================================================================
    // Weights peak at the reference price and mirror around it.
    // ===================================================================
    #[test]
    fn probability_symmetric(price in arb_price(), params in arb_symmetric_params()) {
        let curve = generate_curve(&[], price, params).unwrap();
        let points = curve.points();
        let n = points.len();
        for k in 0..n {
            prop_assert_eq!(points[k].probability, points[n - 1 - k].probability);
            prop_assert!(points[k].probability <= points[n / 2].probability);
        }
    }

    // ===================================================================
    // A book plus its mirror image (same legs, opposite direction)
    // has zero first-order Greeks and a flat curve.
    // ===================================================================
    #[test]
    fn mirrored_book_is_flat(book in arb_book(), price in arb_price()) {
        let mirrored: Vec<Position> = book
            .iter()
            .flat_map(|p| {
                let opposite = Position::new(
                    p.id().clone(),
                    p.instrument_type(),
                    p.strike(),
                    p.premium(),
                    p.quantity(),
                    !p.is_long(),
                    p.implied_volatility_pct(),
                )
                .unwrap();
                [p.clone(), opposite]
            })
            .collect();

        let greeks = aggregate(&mirrored, price).unwrap();
        prop_assert!(greeks.delta.abs() < 1e-9);
        prop_assert!(greeks.gamma.abs() < 1e-9);
        prop_assert!(greeks.vega.abs() < 1e-9);

        let curve = generate_curve(&mirrored, price, CurveParams::default()).unwrap();
        prop_assert!(curve.iter().all(|p| p.pnl.abs() < 0.01));
    }

    // ===================================================================
    // Aggregation does not depend on position order (within tolerance).
    // ===================================================================
    #[test]
    fn aggregation_order_independent(book in arb_book(), price in arb_price()) {
        let mut reversed = book.clone();
        reversed.reverse();
        let a = aggregate(&book, price).unwrap();
        let b = aggregate(&reversed, price).unwrap();
        let tolerance = |x: f64| 1e-9 * x.abs().max(1.0);
        prop_assert!((a.delta - b.delta).abs() <= tolerance(a.delta));
        prop_assert!((a.theta - b.theta).abs() <= tolerance(a.theta));
        prop_assert!((a.emergent_index - b.emergent_index).abs() <= tolerance(a.emergent_index));
    }
}
