use gatehouse_authz::{
    AuthorizationDecision, Authorizer, Claim, ClaimSet, DenialReason,
    PermissionAuthorizationHandler, PermissionPolicyProvider, PermissionRequirement, Principal,
};
use proptest::prelude::*;
use std::sync::Arc;

fn permission_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_-]{0,8}(\\.[a-z][a-z0-9_-]{0,8}){1,3}"
}

fn claim_pairs() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec(
        (
            prop_oneof![
                Just("permission".to_string()),
                Just("role".to_string()),
                Just("sub".to_string()),
            ],
            prop_oneof![permission_name(), "[A-Za-z.*]{0,12}"],
        ),
        0..8,
    )
}

fn to_claims(pairs: &[(String, String)]) -> ClaimSet {
    pairs
        .iter()
        .map(|(claim_type, value)| Claim::new(claim_type.clone(), value.clone()))
        .collect()
}

proptest! {
    /// Resolving the same name twice yields structurally equal policies.
    #[test]
    fn resolution_is_pure(name in "\\PC{0,24}") {
        let provider = PermissionPolicyProvider::default();
        let first = provider.get_policy(&name).ok();
        let second = provider.get_policy(&name).ok();
        prop_assert_eq!(first, second);
    }

    /// Convention names always resolve to a policy named after the permission.
    #[test]
    fn permission_names_always_resolve(name in permission_name()) {
        let provider = PermissionPolicyProvider::default();
        let policy = provider.get_policy(&name).expect("permission-style name");
        prop_assert_eq!(policy.name(), name.as_str());
        prop_assert_eq!(policy.requirements().len(), 1);
    }

    /// Evaluation grants iff a permission claim equals the requirement exactly.
    #[test]
    fn evaluate_grants_iff_exact_claim(required in permission_name(), pairs in claim_pairs()) {
        let handler = PermissionAuthorizationHandler::default();
        let claims = to_claims(&pairs);
        let expected = pairs
            .iter()
            .any(|(claim_type, value)| claim_type == "permission" && *value == required);
        let outcome = handler.evaluate(&PermissionRequirement::new(required.clone()), &claims);
        prop_assert_eq!(outcome.is_satisfied(), expected);
    }

    /// Upper-casing a granted permission never grants the original.
    #[test]
    fn matching_is_case_sensitive(required in permission_name()) {
        let handler = PermissionAuthorizationHandler::default();
        let claims: ClaimSet = vec![Claim::new("permission", required.to_uppercase())].into();
        let outcome = handler.evaluate(&PermissionRequirement::new(required), &claims);
        prop_assert!(!outcome.is_satisfied());
    }
}

#[test]
fn unknown_policy_denies_without_panicking() {
    let authorizer = Authorizer::default();
    let principal = Principal::authenticated(vec![Claim::new("permission", "Administrators")]);
    for name in ["", "Administrators", "orders", "orders.*", " orders.read"] {
        let decision = authorizer.authorize(name, &principal);
        assert!(
            matches!(
                decision,
                AuthorizationDecision::Denied(DenialReason::PolicyNotFound { .. })
            ),
            "{name:?} -> {decision:?}"
        );
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_evaluations_do_not_cross_contaminate() {
    let authorizer = Arc::new(Authorizer::default());
    let mut tasks = Vec::new();
    for idx in 0..64 {
        let authorizer = authorizer.clone();
        tasks.push(tokio::spawn(async move {
            let own = format!("tenant{idx}.read");
            let other = format!("tenant{}.read", (idx + 1) % 64);
            let principal = Principal::authenticated(vec![Claim::new("permission", own.clone())]);
            let mut results = Vec::new();
            for _ in 0..50 {
                results.push((
                    authorizer.authorize(&own, &principal).is_granted(),
                    authorizer.authorize(&other, &principal).is_granted(),
                ));
                tokio::task::yield_now().await;
            }
            results
        }));
    }
    for task in tasks {
        for (own, other) in task.await.expect("task") {
            assert!(own);
            assert!(!other);
        }
    }
}
