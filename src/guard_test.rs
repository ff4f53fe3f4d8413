use super::*;

const ALL_ROLES: [Role; 3] = [Role::User, Role::Store, Role::Admin];

const ALLOWED_SETS: [&[Role]; 7] = [
    &[Role::User],
    &[Role::Store],
    &[Role::Admin],
    &[Role::User, Role::Store],
    &[Role::User, Role::Admin],
    &[Role::Store, Role::Admin],
    &[Role::User, Role::Store, Role::Admin],
];

fn snapshot(hydrated: bool, authenticated: bool, role: Option<Role>) -> SessionSnapshot {
    SessionSnapshot { hydrated, authenticated, role }
}

// =============================================================================
// RENDER LAW
// =============================================================================

#[test]
fn renders_iff_authenticated_role_is_allowed() {
    for role in ALL_ROLES {
        for allowed in ALLOWED_SETS {
            let outcome = evaluate(allowed, &snapshot(true, true, Some(role)), None);
            if allowed.contains(&role) {
                assert_eq!(outcome, GuardOutcome::Render, "{role:?} should render for {allowed:?}");
            } else {
                assert_eq!(
                    outcome,
                    GuardOutcome::Redirect(role.home_route().to_owned()),
                    "{role:?} should bounce home for {allowed:?}"
                );
            }
        }
    }
}

#[test]
fn disallowed_role_goes_to_its_own_home() {
    let outcome = evaluate(&[Role::Admin], &snapshot(true, true, Some(Role::Store)), None);
    assert_eq!(outcome, GuardOutcome::Redirect("/store/dashboard".to_owned()));

    let outcome = evaluate(&[Role::Store], &snapshot(true, true, Some(Role::User)), None);
    assert_eq!(outcome, GuardOutcome::Redirect("/".to_owned()));
}

// =============================================================================
// HYDRATION
// =============================================================================

#[test]
fn never_redirects_before_hydration() {
    let roles = [None, Some(Role::User), Some(Role::Store), Some(Role::Admin)];
    for authenticated in [false, true] {
        for role in roles {
            for allowed in ALLOWED_SETS {
                let outcome = evaluate(allowed, &snapshot(false, authenticated, role), None);
                assert_eq!(outcome, GuardOutcome::Loading, "pre-hydration must hold, not redirect");
            }
        }
    }
}

#[test]
fn loading_page_is_not_a_redirect() {
    let resp = loading_page();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get(axum::http::header::LOCATION).is_none());
}

// =============================================================================
// AUTHENTICATION
// =============================================================================

#[test]
fn unauthenticated_redirects_to_login() {
    for role in [None, Some(Role::Admin)] {
        let outcome = evaluate(&[Role::Admin], &snapshot(true, false, role), None);
        assert_eq!(outcome, GuardOutcome::Redirect(LOGIN_ROUTE.to_owned()));
    }
}

#[test]
fn authenticated_without_role_redirects_to_login() {
    // Degenerate input: the store's invariant keeps user and token together,
    // so a missing role is treated as not signed in.
    let outcome = evaluate(&[Role::User], &snapshot(true, true, None), None);
    assert_eq!(outcome, GuardOutcome::Redirect(LOGIN_ROUTE.to_owned()));
}

// =============================================================================
// REDIRECT OVERRIDE
// =============================================================================

#[test]
fn override_replaces_home_redirect() {
    let outcome = evaluate(&[Role::Admin], &snapshot(true, true, Some(Role::User)), Some("/denied"));
    assert_eq!(outcome, GuardOutcome::Redirect("/denied".to_owned()));
}

#[test]
fn override_does_not_affect_rendering() {
    let outcome = evaluate(&[Role::User], &snapshot(true, true, Some(Role::User)), Some("/denied"));
    assert_eq!(outcome, GuardOutcome::Render);
}

#[test]
fn override_does_not_apply_to_login_redirect() {
    let outcome = evaluate(&[Role::User], &snapshot(true, false, None), Some("/denied"));
    assert_eq!(outcome, GuardOutcome::Redirect(LOGIN_ROUTE.to_owned()));
}
