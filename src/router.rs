use crate::error::{Error, Result};
use crate::model::user::User;

/// The named screens of the application shell.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum View {
    Login,
    Register,
    Dashboard,
    Voting,
    Results,
}

/// Who is driving the navigation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Role {
    Anonymous,
    Student,
    Admin,
}

impl Role {
    pub fn of(user: Option<&User>) -> Self {
        match user {
            None => Self::Anonymous,
            Some(user) if user.is_admin => Self::Admin,
            Some(_) => Self::Student,
        }
    }
}

/// An explicit state machine over the views.
///
/// Each transition is checked against the caller's role: students cannot
/// reach the results screen, admins cannot reach the voting screen, and
/// nobody skips login. Rejected moves leave the current view in place.
#[derive(Debug, Default)]
pub struct Router {
    current: View,
}

impl Default for View {
    fn default() -> Self {
        Self::Login
    }
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> View {
        self.current
    }

    /// Attempt to move to `target` as `role`.
    pub fn navigate(&mut self, target: View, role: Role) -> Result<View> {
        if allowed(self.current, target, role) {
            self.current = target;
            Ok(target)
        } else {
            Err(Error::Unauthorized(format!(
                "cannot move from {:?} to {target:?} as {role:?}",
                self.current
            )))
        }
    }
}

fn allowed(from: View, to: View, role: Role) -> bool {
    use View::*;
    match (from, to) {
        // Before login, only the two auth screens are reachable.
        (Login, Register) | (Register, Login) => role == Role::Anonymous,
        (Login, Dashboard) => role != Role::Anonymous,
        // Role-gated screens off the dashboard.
        (Dashboard, Voting) => role == Role::Student,
        (Dashboard, Results) => role == Role::Admin,
        (Voting, Dashboard) | (Results, Dashboard) => role != Role::Anonymous,
        // Logout from any authed screen.
        (Dashboard | Voting | Results, Login) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_flow_between_auth_screens() {
        let mut router = Router::new();
        assert_eq!(router.current(), View::Login);
        router.navigate(View::Register, Role::Anonymous).unwrap();
        router.navigate(View::Login, Role::Anonymous).unwrap();
        assert!(router.navigate(View::Dashboard, Role::Anonymous).is_err());
    }

    #[test]
    fn student_can_vote_but_not_view_results() {
        let mut router = Router::new();
        router.navigate(View::Dashboard, Role::Student).unwrap();
        assert!(router.navigate(View::Results, Role::Student).is_err());
        router.navigate(View::Voting, Role::Student).unwrap();
        router.navigate(View::Dashboard, Role::Student).unwrap();
    }

    #[test]
    fn admin_can_view_results_but_not_vote() {
        let mut router = Router::new();
        router.navigate(View::Dashboard, Role::Admin).unwrap();
        assert!(router.navigate(View::Voting, Role::Admin).is_err());
        router.navigate(View::Results, Role::Admin).unwrap();
        router.navigate(View::Dashboard, Role::Admin).unwrap();
    }

    #[test]
    fn rejected_moves_keep_the_current_view() {
        let mut router = Router::new();
        router.navigate(View::Dashboard, Role::Student).unwrap();
        let err = router.navigate(View::Results, Role::Student).unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)));
        assert_eq!(router.current(), View::Dashboard);
    }

    #[test]
    fn logout_is_always_allowed_from_authed_screens() {
        let mut router = Router::new();
        router.navigate(View::Dashboard, Role::Admin).unwrap();
        router.navigate(View::Results, Role::Admin).unwrap();
        router.navigate(View::Login, Role::Admin).unwrap();
        assert_eq!(router.current(), View::Login);
    }

    #[test]
    fn role_derives_from_the_user_record() {
        assert_eq!(Role::of(None), Role::Anonymous);
        assert_eq!(Role::of(Some(&User::example())), Role::Student);
        assert_eq!(Role::of(Some(&User::example_admin())), Role::Admin);
    }
}
