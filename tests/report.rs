use flightdelay::io::csv::parse;
use flightdelay::report::{round_half_up, SCALE};
use flightdelay::testing::{csv_table, sample_csv, SAMPLE_HEADER};
use flightdelay::{aggregate, finalize, AverageDelay, Query};
use num_bigint::{BigInt, BigUint};

fn avg(sum: i64, count: u32) -> String {
    AverageDelay::from_hundredths(round_half_up(&BigInt::from(sum), &BigUint::from(count), SCALE))
        .to_string()
}

#[test]
fn zero_valid_records_average_is_zero() {
    assert_eq!(avg(0, 0), "0.00");
    assert_eq!(avg(42, 0), "0.00");
}

#[test]
fn exact_quotients_keep_two_digits() {
    assert_eq!(avg(6, 2), "3.00");
    assert_eq!(avg(7, 1), "7.00");
    assert_eq!(avg(-9, 3), "-3.00");
    assert_eq!(avg(1, 4), "0.25");
    assert_eq!(avg(-1, 20), "-0.05");
}

#[test]
fn ties_round_away_from_zero() {
    // 1.005 and -1.005
    assert_eq!(avg(201, 200), "1.01");
    assert_eq!(avg(-201, 200), "-1.01");
    // 0.125 and -0.125
    assert_eq!(avg(1, 8), "0.13");
    assert_eq!(avg(-1, 8), "-0.13");
}

#[test]
fn non_ties_round_to_nearest() {
    assert_eq!(avg(1, 3), "0.33");
    assert_eq!(avg(2, 3), "0.67");
    assert_eq!(avg(-2, 3), "-0.67");
    assert_eq!(avg(10, 7), "1.43");
    // -0.004 rounds to zero without a sign
    assert_eq!(avg(-1, 250), "0.00");
}

#[test]
fn average_to_f64_matches_display() {
    let a = AverageDelay::from_hundredths(-305);
    assert_eq!(a.to_string(), "-3.05");
    assert!((a.to_f64() + 3.05).abs() < f64::EPSILON);
}

#[test]
fn finalize_builds_report_for_query() -> anyhow::Result<()> {
    let q = Query::new(1995, "LAX")?;
    let state = aggregate(parse(sample_csv().as_bytes())?, &q)?;
    let report = finalize(state, &q);
    assert_eq!(report.year, 1995);
    assert_eq!(report.airport_code, "LAX");
    assert_eq!(report.all_records, BigUint::from(4u32));
    assert_eq!(report.valid_records, BigUint::from(2u32));
    assert_eq!(report.average_delay.to_string(), "3.00");
    Ok(())
}

#[test]
fn report_serializes_exact_decimal_strings() -> anyhow::Result<()> {
    let q = Query::new(2003, "ORD")?;
    let text = csv_table(SAMPLE_HEADER, &["ORD,0,1", "ORD,0,2", "ORD,0,2"]);
    let report = finalize(aggregate(parse(text.as_bytes())?, &q)?, &q);
    let json = serde_json::to_value(&report)?;
    assert_eq!(
        json,
        serde_json::json!({
            "year": 2003,
            "airport_code": "ORD",
            "all_records": "3",
            "valid_records": "3",
            "average_delay": "1.67",
        })
    );
    Ok(())
}

#[test]
fn report_display_lists_every_field() -> anyhow::Result<()> {
    let q = Query::new(1987, "LAX")?;
    let report = finalize(aggregate(parse(sample_csv().as_bytes())?, &q)?, &q);
    let text = report.to_string();
    for needle in ["1987", "LAX", "4", "2", "3.00"] {
        assert!(text.contains(needle), "{needle} missing from {text}");
    }
    Ok(())
}
