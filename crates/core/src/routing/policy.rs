//! Route policies and the guard decision function

use serde::{Deserialize, Serialize};
use wildwelcome_domain::constants::{LANDLORD_HOME_PATH, LOGIN_PATH, TENANT_HOME_PATH};
use wildwelcome_domain::{SessionSnapshot, UserType};

/// Access rules for one view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutePolicy {
    pub require_auth: bool,
    /// Account types allowed to render the view; empty means any.
    pub allowed_user_types: Vec<UserType>,
    /// Where anonymous visitors are sent.
    pub redirect_to: String,
}

impl Default for RoutePolicy {
    fn default() -> Self {
        Self { require_auth: true, allowed_user_types: Vec::new(), redirect_to: LOGIN_PATH.to_string() }
    }
}

impl RoutePolicy {
    /// Renders for everyone.
    pub fn public() -> Self {
        Self { require_auth: false, ..Self::default() }
    }

    /// Requires a signed-in user of any account type.
    pub fn authenticated() -> Self {
        Self::default()
    }

    /// Requires a signed-in user of one of `user_types`.
    pub fn for_user_types(user_types: &[UserType]) -> Self {
        Self { allowed_user_types: user_types.to_vec(), ..Self::default() }
    }

    pub fn tenant_only() -> Self {
        Self::for_user_types(&[UserType::Tenant])
    }

    pub fn landlord_only() -> Self {
        Self::for_user_types(&[UserType::Landlord])
    }

    #[must_use]
    pub fn with_redirect(mut self, path: impl Into<String>) -> Self {
        self.redirect_to = path.into();
        self
    }
}

/// Outcome of a guard check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GuardDecision {
    /// Startup resolution is still running; show a placeholder.
    Loading,
    Render,
    Redirect {
        to: String,
        /// Location to come back to after signing in. Only set for
        /// authentication redirects.
        return_to: Option<String>,
    },
}

/// Decides whether `requested` may render under `policy`.
///
/// Checks run in a fixed order: loading, public view, authentication, then
/// account type.
pub fn evaluate(snapshot: &SessionSnapshot, policy: &RoutePolicy, requested: &str) -> GuardDecision {
    if snapshot.is_loading() {
        return GuardDecision::Loading;
    }

    if !policy.require_auth {
        return GuardDecision::Render;
    }

    if !snapshot.is_authenticated() {
        return GuardDecision::Redirect {
            to: policy.redirect_to.clone(),
            return_to: Some(requested.to_string()),
        };
    }

    if !policy.allowed_user_types.is_empty() {
        let user_type = snapshot.user_type().unwrap_or_default();
        if !policy.allowed_user_types.contains(&user_type) {
            let home = match user_type {
                UserType::Landlord => LANDLORD_HOME_PATH,
                UserType::Tenant => TENANT_HOME_PATH,
            };
            return GuardDecision::Redirect { to: home.to_string(), return_to: None };
        }
    }

    GuardDecision::Render
}

#[cfg(test)]
mod tests {
    use wildwelcome_domain::{PartialProfile, SessionPhase, UserProfile};

    use super::*;

    fn signed_in(user_type: UserType) -> SessionSnapshot {
        SessionSnapshot {
            access_token: Some("T1".into()),
            user: Some(UserProfile::new("u@example.com", user_type).into()),
            phase: SessionPhase::Authenticated,
            ..SessionSnapshot::default()
        }
    }

    fn anonymous() -> SessionSnapshot {
        SessionSnapshot { phase: SessionPhase::Anonymous, ..SessionSnapshot::default() }
    }

    #[test]
    fn loading_wins_over_everything() {
        let resolving = SessionSnapshot { phase: SessionPhase::Resolving, ..SessionSnapshot::default() };
        assert_eq!(evaluate(&resolving, &RoutePolicy::public(), "/"), GuardDecision::Loading);
        assert_eq!(
            evaluate(&resolving, &RoutePolicy::landlord_only(), "/landlord"),
            GuardDecision::Loading
        );
    }

    #[test]
    fn public_views_render_for_anyone() {
        assert_eq!(evaluate(&anonymous(), &RoutePolicy::public(), "/signup"), GuardDecision::Render);
    }

    #[test]
    fn anonymous_visitor_is_sent_to_login_with_return_location() {
        let decision = evaluate(&anonymous(), &RoutePolicy::tenant_only(), "/user/account?tab=2");
        assert_eq!(
            decision,
            GuardDecision::Redirect {
                to: "/login".into(),
                return_to: Some("/user/account?tab=2".into())
            }
        );
    }

    #[test]
    fn custom_redirect_target_is_honoured() {
        let policy = RoutePolicy::authenticated().with_redirect("/signup");
        let decision = evaluate(&anonymous(), &policy, "/user");
        assert!(matches!(decision, GuardDecision::Redirect { ref to, .. } if to == "/signup"));
    }

    #[test]
    fn landlord_on_tenant_route_goes_to_dashboard() {
        let decision = evaluate(&signed_in(UserType::Landlord), &RoutePolicy::tenant_only(), "/user");
        assert_eq!(
            decision,
            GuardDecision::Redirect { to: "/landlord/dashboard".into(), return_to: None }
        );
    }

    #[test]
    fn tenant_on_landlord_route_goes_home() {
        let decision =
            evaluate(&signed_in(UserType::Tenant), &RoutePolicy::landlord_only(), "/landlord/calendar");
        assert_eq!(decision, GuardDecision::Redirect { to: "/user".into(), return_to: None });
    }

    #[test]
    fn partial_profile_is_routed_as_tenant() {
        let snapshot = SessionSnapshot {
            access_token: Some("T1".into()),
            user: Some(PartialProfile { email: "a@b.com".into(), subject: None }.into()),
            phase: SessionPhase::Authenticated,
            ..SessionSnapshot::default()
        };
        assert_eq!(evaluate(&snapshot, &RoutePolicy::tenant_only(), "/user"), GuardDecision::Render);
        assert_eq!(
            evaluate(&snapshot, &RoutePolicy::landlord_only(), "/landlord"),
            GuardDecision::Redirect { to: "/user".into(), return_to: None }
        );
    }

    #[test]
    fn matching_user_type_renders() {
        let policy = RoutePolicy::for_user_types(&[UserType::Tenant, UserType::Landlord]);
        assert_eq!(evaluate(&signed_in(UserType::Landlord), &policy, "/x"), GuardDecision::Render);
        assert_eq!(
            evaluate(&signed_in(UserType::Tenant), &RoutePolicy::authenticated(), "/x"),
            GuardDecision::Render
        );
    }

    #[test]
    fn decision_serializes_with_kind_tag() {
        let json = serde_json::to_string(&GuardDecision::Loading).unwrap();
        assert_eq!(json, r#"{"kind":"loading"}"#);
    }
}
