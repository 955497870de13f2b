use uuid::Uuid;

use super::*;

fn member(name: &str) -> Member {
    Member { id: Uuid::new_v4(), display_name: name.to_string() }
}

#[test]
fn query_at_end_of_text() {
    let text = "hey @ann";
    assert_eq!(active_mention_query(text, text.len()), Some("ann"));
    assert_eq!(mention_trigger(text, text.len()), Some(4));
}

#[test]
fn query_stops_at_cursor() {
    assert_eq!(active_mention_query("hey @annabel", 7), Some("an"));
}

#[test]
fn bare_at_gives_empty_query() {
    assert_eq!(active_mention_query("@", 1), Some(""));
    assert_eq!(active_mention_query("look @", 6), Some(""));
}

#[test]
fn at_start_of_text_counts() {
    assert_eq!(active_mention_query("@bo", 3), Some("bo"));
}

#[test]
fn email_address_does_not_trigger() {
    assert_eq!(active_mention_query("mail me@host", 12), None);
}

#[test]
fn whitespace_ends_the_scan() {
    assert_eq!(active_mention_query("@ann lee", 8), None);
    assert_eq!(active_mention_query("hey @ann ", 9), None);
}

#[test]
fn no_at_means_no_query() {
    assert_eq!(active_mention_query("plain words", 11), None);
    assert_eq!(active_mention_query("", 0), None);
}

#[test]
fn newline_counts_as_whitespace() {
    assert_eq!(active_mention_query("line\n@jo", 8), Some("jo"));
}

#[test]
fn out_of_range_cursor_is_none() {
    assert_eq!(active_mention_query("@ann", 99), None);
}

#[test]
fn non_boundary_cursor_is_none() {
    // 'é' is two bytes; offset 3 splits it.
    assert_eq!(active_mention_query("@ré", 3), None);
    assert_eq!(active_mention_query("@ré", 4), Some("ré"));
}

#[test]
fn filter_is_case_insensitive_substring() {
    let members = vec![member("Ann Lee"), member("Bob Stone"), member("Joanna")];
    let names: Vec<_> = filter_members(&members, "ANN").iter().map(|m| m.display_name.as_str()).collect();
    assert_eq!(names, vec!["Ann Lee", "Joanna"]);
}

#[test]
fn empty_filter_returns_everyone() {
    let members = vec![member("Ann Lee"), member("Bob Stone")];
    assert_eq!(filter_members(&members, "").len(), 2);
}
