use flightdelay::query::{FIRST_YEAR, LAST_YEAR};
use flightdelay::{locate, ErrorKind, Query, SUPPORTED_YEARS};

#[test]
fn accepts_every_supported_year() {
    for year in SUPPORTED_YEARS {
        let q = Query::new(i64::from(year), "LAX").unwrap();
        assert_eq!(q.year(), year);
    }
    assert_eq!(SUPPORTED_YEARS.count(), 22);
}

#[test]
fn rejects_years_outside_range() {
    for year in [i64::from(FIRST_YEAR) - 1, i64::from(LAST_YEAR) + 1, 0, -1987, 70_000] {
        let err = Query::new(year, "LAX").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument, "year {year}");
        assert!(err.to_string().contains("out of range"));
    }
}

#[test]
fn rejects_empty_airport_code() {
    for code in ["", "   ", "\t\n"] {
        let err = Query::new(1990, code).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}

#[test]
fn trims_but_keeps_case_of_airport_code() {
    let q = Query::new(2001, "  lax ").unwrap();
    assert_eq!(q.airport_code(), "lax");
    assert_eq!(q.to_string(), "2001 into lax");
}

#[test]
fn parse_handles_missing_and_non_numeric_input() {
    assert_eq!(
        Query::parse(None, Some("LAX")).unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );
    assert_eq!(
        Query::parse(Some("1990"), None).unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );
    let err = Query::parse(Some("19x0"), Some("LAX")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert!(err.to_string().contains("not a number"));

    let q = Query::parse(Some(" 2008 "), Some("ORD")).unwrap();
    assert_eq!((q.year(), q.airport_code()), (2008, "ORD"));
}

#[test]
fn locate_builds_yearly_archive_address() {
    assert_eq!(
        locate("http://stat-computing.org/dataexpo/2009", 1987),
        "http://stat-computing.org/dataexpo/2009/1987.csv.bz2"
    );
    assert_eq!(
        locate("http://mirror.example/data//", 2008),
        "http://mirror.example/data/2008.csv.bz2"
    );
}
