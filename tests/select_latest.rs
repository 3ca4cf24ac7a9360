use gini_rs::interpret::{parse, select_latest};
use gini_rs::models::CodeName;
use gini_rs::{FetchOutcome, IndicatorRecord, ObservedValue};

fn rec(period: Option<&str>, value: Option<ObservedValue>) -> IndicatorRecord {
    IndicatorRecord {
        country_code: Some("ARG".into()),
        period: period.map(Into::into),
        value,
        ..Default::default()
    }
}

fn text(s: &str) -> Option<ObservedValue> {
    Some(ObservedValue::Text(s.into()))
}

fn num(x: f64) -> Option<ObservedValue> {
    Some(ObservedValue::Number(x))
}

#[test]
fn empty_input_has_no_latest() {
    assert_eq!(select_latest(&[]), None);
}

#[test]
fn null_values_are_skipped_and_older_years_lose() {
    let records = vec![
        rec(Some("2015"), text("30.1")),
        rec(Some("2018"), None),
        rec(Some("2012"), text("28.0")),
    ];
    let latest = select_latest(&records).unwrap();
    assert_eq!(latest.period.as_deref(), Some("2015"));
    assert_eq!(latest.numeric_value(), Some(30.1));
}

#[test]
fn country_name_comes_from_nested_country_object() {
    let body = r#"[{"page":1,"total":1},[{"countryiso3code":"ARG","date":"2018","value":40.7,"country":{"value":"Argentina"}}]]"#;
    let FetchOutcome::Success(records) = parse(body, "application/json", 200) else {
        panic!("expected success");
    };
    assert_eq!(records.len(), 1);
    let latest = select_latest(&records).unwrap();
    assert_eq!(latest.country_name.as_deref(), Some("Argentina"));
    assert_eq!(latest.period.as_deref(), Some("2018"));
    assert_eq!(latest.numeric_value(), Some(40.7));
}

#[test]
fn country_name_falls_back_to_code() {
    let mut r = rec(Some("2019"), num(42.0));
    r.country = Some(CodeName {
        id: Some("AR".into()),
        value: Some("  ".into()),
    });
    let latest = select_latest(&[r]).unwrap();
    assert_eq!(latest.country_name.as_deref(), Some("ARG"));
}

#[test]
fn ties_on_year_keep_the_last_record() {
    let records = vec![
        rec(Some("2018"), num(40.0)),
        rec(Some("2016"), num(39.0)),
        rec(Some("2018"), num(41.5)),
    ];
    let latest = select_latest(&records).unwrap();
    assert_eq!(latest.numeric_value(), Some(41.5));
}

#[test]
fn malformed_records_never_panic_and_are_skipped() {
    let records = vec![
        rec(Some("20x8"), num(40.0)),
        rec(None, num(41.0)),
        rec(Some("2019"), text("n/a")),
        rec(Some("2020"), text("NaN")),
        rec(Some("2020"), num(f64::INFINITY)),
        rec(Some(""), text("")),
        IndicatorRecord::default(),
    ];
    assert_eq!(select_latest(&records), None);

    let mut with_one_valid = records.clone();
    with_one_valid.push(rec(Some(" 2011 "), text(" 35.5 ")));
    let latest = select_latest(&with_one_valid).unwrap();
    assert_eq!(latest.year(), Some(2011));
    assert_eq!(latest.numeric_value(), Some(35.5));
}

#[test]
fn input_records_are_left_untouched() {
    let mut r = rec(Some("2019"), num(42.0));
    r.country = Some(CodeName {
        id: None,
        value: Some("Argentina".into()),
    });
    let records = vec![r];
    let latest = select_latest(&records).unwrap();
    assert_eq!(latest.country_name.as_deref(), Some("Argentina"));
    assert_eq!(records[0].country_name, None);
}
