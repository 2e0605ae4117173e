//! Tests for querying and combining error snapshots.

use inquest::{ErrorBuilder, ErrorList, Violation};
use stillwater::prelude::*;
use stillwater::Validation;

fn collect(build: impl FnOnce(&mut ErrorBuilder)) -> ErrorList {
    let mut errors = ErrorBuilder::new();
    build(&mut errors);
    errors.errors()
}

#[test]
fn test_entries_keep_every_path() {
    let list = collect(|e| {
        e.add_result(Violation::new("dates overlap", ["From", "To"]))
            .unwrap();
    });

    let entry = &list[0];
    assert!(entry.is_at("From"));
    assert!(entry.is_at("To"));
    assert!(!entry.is_root_level());
    assert_eq!(list.lookup("From"), list.lookup("To"));
}

#[test]
fn test_root_path_entry_is_headline() {
    let list = collect(|e| {
        e.add_keyed("name missing", "", "Name").unwrap();
        e.add_result(Violation::new("whole request invalid", [""]))
            .unwrap();
    });

    assert_eq!(list.error_message(), "whole request invalid");
    assert_eq!(list.to_string(), "whole request invalid");
    assert_eq!(list.lookup(""), Some("whole request invalid"));
}

#[test]
fn test_combine_accumulates_in_order() {
    let request = collect(|e| {
        e.add_keyed("{1} is required", "", "Email").unwrap();
    });
    let body = collect(|e| {
        e.add("body is malformed").unwrap();
        e.add_keyed("{1} is too long", "", "Title").unwrap();
    });

    let combined = request.combine(body);
    let messages: Vec<_> = combined.iter().map(|e| e.message()).collect();
    assert_eq!(
        messages,
        vec!["Email is required", "body is malformed", "Title is too long"]
    );
    assert_eq!(combined.error_message(), "body is malformed");
}

#[test]
fn test_builder_validations_accumulate() {
    let first = ErrorBuilder::from_keyed("{1} must be set", "", "Host")
        .unwrap()
        .into_validation(());
    let second = ErrorBuilder::from_keyed("{1} must be set", "", "Port")
        .unwrap()
        .into_validation(());

    let errors = match (first, second) {
        (Validation::Failure(a), Validation::Failure(b)) => a.combine(b),
        _ => panic!("both validations should fail"),
    };
    assert_eq!(errors.len(), 2);
    assert_eq!(errors.lookup("Port"), Some("Port must be set"));
}

#[test]
fn test_owned_iteration() {
    let list = collect(|e| {
        e.add("a").unwrap();
        e.add("b").unwrap();
    });

    let messages: Vec<String> = list
        .into_iter()
        .map(|entry| entry.message().to_string())
        .collect();
    assert_eq!(messages, vec!["a", "b"]);
}

#[test]
fn test_error_list_is_std_error() {
    fn describe(err: &dyn std::error::Error) -> String {
        err.to_string()
    }

    let list = collect(|e| {
        e.add("rejected").unwrap();
    });
    assert_eq!(describe(&list), "rejected");
}
