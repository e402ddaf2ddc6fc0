use proptest::prelude::*;
use std::str::FromStr;

use invoicebot::gate::{AuthorizationPolicy, Decision, Trigger, authorize};
use invoicebot::types::EventKind;

fn policy() -> AuthorizationPolicy {
    AuthorizationPolicy::new(["SarveshK16"])
}

#[test]
fn manual_trigger_by_allowed_actor_is_allowed() {
    let decision = authorize(&Trigger::manual("SarveshK16"), &policy());
    assert_eq!(decision, Decision::Allow);
}

#[test]
fn manual_trigger_by_other_actor_is_denied_with_reason() {
    match authorize(&Trigger::manual("eve"), &policy()) {
        Decision::Deny { reason } => assert!(reason.contains("eve")),
        Decision::Allow => panic!("eve must not be allowed"),
    }
}

#[test]
fn actor_comparison_is_case_sensitive() {
    let decision = authorize(&Trigger::manual("sarveshk16"), &policy());
    assert!(!decision.is_allowed());
}

#[test]
fn empty_allow_list_denies_every_manual_trigger() {
    let empty = AuthorizationPolicy::new(Vec::<String>::new());
    assert!(!authorize(&Trigger::manual("SarveshK16"), &empty).is_allowed());
    assert!(authorize(&Trigger::scheduled("SarveshK16"), &empty).is_allowed());
}

#[test]
fn allow_list_may_hold_several_actors() {
    let policy = AuthorizationPolicy::new(["SarveshK16", "accounts-bot"]);
    assert!(authorize(&Trigger::manual("accounts-bot"), &policy).is_allowed());
    assert!(!authorize(&Trigger::manual("eve"), &policy).is_allowed());
}

#[test]
fn event_names_map_to_kinds() {
    assert_eq!(EventKind::from_str("schedule"), Ok(EventKind::Scheduled));
    assert_eq!(EventKind::from_str("workflow_dispatch"), Ok(EventKind::Manual));
    assert_eq!(EventKind::from_str(" Manual "), Ok(EventKind::Manual));
    assert_eq!(
        EventKind::from_str("push"),
        Ok(EventKind::Other("push".to_string()))
    );
    assert!(EventKind::from_str("  ").is_err());
}

#[test]
fn non_manual_other_events_pass_the_gate() {
    let trigger = Trigger::new(EventKind::Other("repository_dispatch".into()), "eve");
    assert!(authorize(&trigger, &policy()).is_allowed());
}

proptest! {
    #[test]
    fn scheduled_triggers_always_pass(actor in ".*") {
        prop_assert!(authorize(&Trigger::scheduled(actor), &policy()).is_allowed());
    }

    #[test]
    fn manual_triggers_by_strangers_are_denied(actor in "[a-zA-Z0-9_-]{0,24}") {
        prop_assume!(actor != "SarveshK16");
        let denied = matches!(
            authorize(&Trigger::manual(actor), &policy()),
            Decision::Deny { .. }
        );
        prop_assert!(denied);
    }
}
