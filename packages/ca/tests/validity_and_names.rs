//! Tests for time strings, SAN parsing and subject name parsing

use chrono::{TimeZone, Utc};
use cleanroom_ca::{
    compute_cert_valid_to_string, parse_subject_name, parse_x509_time_string,
    sans_from_string_list, to_x509_time_string, CaError, SubjectAltName,
};
use proptest::prelude::*;

#[test]
fn test_x509_time_string_is_generalized_time() {
    let instant = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 1).unwrap();

    assert_eq!(to_x509_time_string(instant), "20240307090501Z");
}

#[test]
fn test_valid_to_is_inclusive_of_last_second() {
    let valid_to = compute_cert_valid_to_string("20240101000000Z", 1).unwrap();

    assert_eq!(valid_to, "20240101235959Z");
}

#[test]
fn test_valid_to_crosses_leap_day() {
    let valid_to = compute_cert_valid_to_string("20240228120000Z", 2).unwrap();

    assert_eq!(valid_to, "20240301115959Z");
}

#[test]
fn test_valid_to_rejects_zero_days() {
    let result = compute_cert_valid_to_string("20240101000000Z", 0);

    assert!(matches!(result, Err(CaError::InvalidValidity(_))));
}

#[test]
fn test_valid_to_stays_within_generalized_time() {
    let last = compute_cert_valid_to_string("99991230000000Z", 2).unwrap();
    assert_eq!(last, "99991231235959Z");
    assert!(parse_x509_time_string(&last).is_ok());

    let result = compute_cert_valid_to_string("20240101000000Z", 3_000_000);
    let err = result.unwrap_err();
    assert!(matches!(err, CaError::InvalidValidity(_)));
    assert_eq!(err.kind(), "invalid_validity");
}

#[test]
fn test_time_string_rejects_garbage() {
    assert!(matches!(
        parse_x509_time_string("yesterday"),
        Err(CaError::InvalidTime(_))
    ));
    assert!(matches!(
        parse_x509_time_string("20241341000000Z"),
        Err(CaError::InvalidTime(_))
    ));
}

#[test]
fn test_utc_time_is_accepted() {
    let parsed = parse_x509_time_string("240101000000Z").unwrap();

    assert_eq!(to_x509_time_string(parsed), "20240101000000Z");
}

#[test]
fn test_sans_keep_order_and_duplicates() {
    let input = vec![
        "host.example".to_string(),
        "iPAddress:10.0.0.1".to_string(),
        "dNSName:host.example".to_string(),
        "::1".to_string(),
    ];

    let sans = sans_from_string_list(&input).unwrap();

    assert_eq!(
        sans,
        vec![
            SubjectAltName::Dns("host.example".to_string()),
            SubjectAltName::Ip("10.0.0.1".parse().unwrap()),
            SubjectAltName::Dns("host.example".to_string()),
            SubjectAltName::Ip("::1".parse().unwrap()),
        ]
    );
}

#[test]
fn test_san_display_uses_prefixes() {
    let dns = SubjectAltName::parse("example.com").unwrap();
    let ip = SubjectAltName::parse("127.0.0.1").unwrap();

    assert_eq!(dns.to_string(), "dNSName:example.com");
    assert_eq!(ip.to_string(), "iPAddress:127.0.0.1");
}

#[test]
fn test_san_rejects_bad_ip_and_empty_dns() {
    assert!(matches!(
        SubjectAltName::parse("iPAddress:not-an-ip"),
        Err(CaError::InvalidSubjectAltName(_))
    ));
    assert!(matches!(
        SubjectAltName::parse("dNSName:"),
        Err(CaError::InvalidSubjectAltName(_))
    ));
    assert!(matches!(
        SubjectAltName::parse(""),
        Err(CaError::InvalidSubjectAltName(_))
    ));
}

#[test]
fn test_subject_name_parsing() {
    assert!(parse_subject_name("CN=test").is_ok());
    assert!(
        parse_subject_name("CN=leaf, O=Contoso, OU=Clean Room, C=US, ST=WA, L=Redmond").is_ok()
    );
    assert!(parse_subject_name("cn=lowercase").is_ok());
}

#[test]
fn test_subject_name_rejections() {
    for bad in ["", "   ", "test", "CN=", "XX=unknown", "CN=ok,"] {
        assert!(
            matches!(parse_subject_name(bad), Err(CaError::InvalidSubjectName(_))),
            "expected rejection for {bad:?}"
        );
    }
}

proptest! {
    #[test]
    fn prop_valid_to_spans_requested_days(days in 1u32..20_000, offset in 0i64..2_000_000_000) {
        let from = Utc.timestamp_opt(offset, 0).unwrap();
        let from_str = to_x509_time_string(from);

        let to_str = compute_cert_valid_to_string(&from_str, days).unwrap();
        let to = parse_x509_time_string(&to_str).unwrap();

        prop_assert_eq!((to - from).num_seconds() + 1, i64::from(days) * 86_400);
    }
}
