//! Basic risk snapshot example.
//!
//! Builds a small index-options book, computes a snapshot, and shows how
//! the insight set changes as the book grows.

use risk_insight_engine::core::book::PositionBook;
use risk_insight_engine::core::error::RiskError;
use risk_insight_engine::core::position::{InstrumentType, Position};
use risk_insight_engine::engine::{compute_snapshot, EngineConfig, RiskEngine};
use risk_insight_engine::greeks::sensitivity::UnsupportedInstrumentPolicy;
use risk_insight_engine::scenario::curve::CurveParams;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("╔══════════════════════════════════════════════╗");
    println!("║  risk-insight-engine: Basic Snapshot Example ║");
    println!("╚══════════════════════════════════════════════╝\n");

    // --- Scenario 1: a covered call-spread book ---
    println!("━━━ Scenario 1: Call Spread + Short Put ━━━\n");

    let mut book = PositionBook::new();
    book.add(Position::call("ES-C-4500", 4500.0, 100.0, 10.0, true, 15.0)?);
    book.add(Position::call("ES-C-4650", 4650.0, 35.0, 10.0, false, 14.0)?);
    book.add(Position::put("ES-P-4350", 4350.0, 40.0, 5.0, false, 21.0)?);

    let snapshot = compute_snapshot(book.positions(), 4500.0)?;
    println!("{}", snapshot);

    // --- Scenario 2: a narrow sweep around the money ---
    println!("━━━ Scenario 2: Narrow Sweep (±30, step 10) ━━━\n");

    let engine = RiskEngine::default();
    let narrow = engine.compute_snapshot_with(book.positions(), 4500.0, CurveParams::new(30, 10)?)?;
    println!("  {:>10} {:>12} {:>10}", "Price", "P&L", "Weight");
    for point in &narrow.curve {
        println!(
            "  {:>10.2} {:>12.2} {:>10.4}",
            point.underlying_price, point.pnl, point.probability
        );
    }
    println!();

    // --- Scenario 3: an unsupported instrument ---
    println!("━━━ Scenario 3: Swap Leg ━━━\n");

    book.add(Position::new("IRS-5Y", InstrumentType::Swap, None, 0.0, 3.0, true, 0.0)?);
    match compute_snapshot(book.positions(), 4500.0) {
        Ok(_) => println!("  unexpected: swap accepted"),
        Err(e) => println!("  Rejected: {}", e),
    }

    let lenient = RiskEngine::new(EngineConfig {
        unsupported_instruments: UnsupportedInstrumentPolicy::TreatAsLinear,
        ..EngineConfig::default()
    });
    let degraded = lenient.compute_snapshot(book.positions(), 4500.0)?;
    println!("  Degraded to linear: delta {:.2}\n", degraded.greeks.delta);

    // --- Scenario 4: a crowded directional book ---
    println!("━━━ Scenario 4: Crowded Futures Book ━━━\n");

    let crowded: PositionBook = (0..12)
        .map(|i| Position::future(format!("ES-FUT-{:02}", i), 50.0, true))
        .collect::<Result<_, RiskError>>()?;
    let snapshot = compute_snapshot(crowded.positions(), 4500.0)?;
    for insight in snapshot.findings() {
        println!("  [{}] {}: {}", insight.severity, insight.title, insight.message);
    }

    Ok(())
}
