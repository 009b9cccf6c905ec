use dnsproxy_domain::{Authority, AuthoritySelector, DomainError};
use std::time::Duration;

fn authority(addr: &str, suffix: Option<&str>) -> Authority {
    Authority::new(addr.parse().unwrap(), suffix, Duration::from_secs(2))
}

fn addresses(list: &[Authority]) -> Vec<String> {
    list.iter().map(|a| a.address.to_string()).collect()
}

#[test]
fn test_suffix_matches_returned_in_config_order() {
    let selector = AuthoritySelector::new(vec![
        authority("8.8.8.8:53", None),
        authority("10.0.0.1:53", Some("corp.local")),
        authority("1.1.1.1:53", None),
        authority("10.0.0.2:53", Some("corp.local.")),
    ]);

    let lead = selector.lead_authority("db.corp.local.").unwrap();

    assert_eq!(addresses(&lead), vec!["10.0.0.1:53", "10.0.0.2:53"]);
}

#[test]
fn test_suffix_match_never_includes_default_tier() {
    let selector = AuthoritySelector::new(vec![
        authority("8.8.8.8:53", None),
        authority("10.0.0.1:53", Some("lan")),
    ]);

    let lead = selector.lead_authority("printer.lan.").unwrap();

    assert_eq!(lead.len(), 1);
    assert!(lead.iter().all(|a| !a.is_default()));
}

#[test]
fn test_all_matching_suffixes_are_returned_together() {
    let selector = AuthoritySelector::new(vec![
        authority("10.0.0.1:53", Some("example.com")),
        authority("10.0.0.2:53", Some("sub.example.com")),
    ]);

    let lead = selector.lead_authority("a.sub.example.com.").unwrap();

    assert_eq!(addresses(&lead), vec!["10.0.0.1:53", "10.0.0.2:53"]);
}

#[test]
fn test_default_tier_when_no_suffix_matches() {
    let selector = AuthoritySelector::new(vec![
        authority("8.8.8.8:53", None),
        authority("10.0.0.1:53", Some("lan")),
        authority("1.1.1.1:53", None),
    ]);

    let lead = selector.lead_authority("www.example.com.").unwrap();

    assert_eq!(addresses(&lead), vec!["8.8.8.8:53", "1.1.1.1:53"]);
}

#[test]
fn test_matching_is_case_insensitive() {
    let selector = AuthoritySelector::new(vec![
        authority("8.8.8.8:53", None),
        authority("10.0.0.1:53", Some("LAN")),
    ]);

    let lead = selector.lead_authority("NAS.Lan").unwrap();

    assert_eq!(addresses(&lead), vec!["10.0.0.1:53"]);
}

#[test]
fn test_no_authority_error_without_default_tier() {
    let selector = AuthoritySelector::new(vec![authority("10.0.0.1:53", Some("lan"))]);

    let result = selector.lead_authority("www.example.com.");

    assert_eq!(
        result,
        Err(DomainError::NoAuthority("www.example.com.".to_string()))
    );
}

#[test]
fn test_no_authority_error_when_empty() {
    let selector = AuthoritySelector::new(vec![]);

    assert!(matches!(
        selector.lead_authority("example.com."),
        Err(DomainError::NoAuthority(_))
    ));
}
