use super::*;

#[test]
fn timeout_retries_on_both_backends() {
    let t = ClassificationTable::standard();
    assert_eq!(t.classify(Backend::Directory, Signal::Timeout), Action::Retry);
    assert_eq!(t.classify(Backend::Authenticator, Signal::Timeout), Action::Retry);
}

#[test]
fn communication_depends_on_backend() {
    let t = ClassificationTable::standard();
    assert_eq!(t.classify(Backend::Directory, Signal::Communication), Action::DropNoteworthy);
    assert_eq!(t.classify(Backend::Authenticator, Signal::Communication), Action::Retry);
}

#[test]
fn authenticator_terminals() {
    let t = ClassificationTable::standard();
    assert_eq!(t.classify(Backend::Authenticator, Signal::Success), Action::TerminalTrue);
    assert_eq!(t.classify(Backend::Authenticator, Signal::PasswordAuthFailed), Action::TerminalFalse);
    assert!(Action::TerminalTrue.is_terminal());
    assert!(Action::TerminalFalse.is_terminal());
    assert!(!Action::Retry.is_terminal());
}

#[test]
fn user_not_found_is_quiet_and_generic_is_recorded() {
    let t = ClassificationTable::standard();
    assert_eq!(t.classify(Backend::Authenticator, Signal::UserNotFound), Action::DropSilent);
    assert_eq!(t.classify(Backend::Authenticator, Signal::Generic), Action::DropNoteworthy);
    assert_eq!(t.classify(Backend::Directory, Signal::Generic), Action::DropNoteworthy);
}

#[test]
fn missing_rows_fall_back_to_noteworthy_drop() {
    let t = ClassificationTable::standard();
    // Directories never report password failures; an unexpected one is not trusted.
    assert_eq!(t.classify(Backend::Directory, Signal::PasswordAuthFailed), Action::DropNoteworthy);
    let empty = ClassificationTable::from_rules(&[]);
    assert_eq!(empty.classify(Backend::Authenticator, Signal::Timeout), Action::DropNoteworthy);
}

#[test]
fn with_rule_overrides_one_row() {
    let t = ClassificationTable::standard().with_rule(Backend::Directory, Signal::Communication, Action::Retry);
    assert_eq!(t.classify(Backend::Directory, Signal::Communication), Action::Retry);
    assert_eq!(t.classify(Backend::Directory, Signal::Generic), Action::DropNoteworthy);
    assert_eq!(ClassificationTable::default(), ClassificationTable::standard());
}
