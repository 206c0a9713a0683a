//! Which section and which auth form are showing

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    #[default]
    Dashboard,
    Notebook,
    Planning,
    Calendar,
    Tests,
    Reference,
    Support,
    Profile,
}

impl Section {
    pub const ALL: [Section; 8] = [
        Section::Dashboard,
        Section::Notebook,
        Section::Planning,
        Section::Calendar,
        Section::Tests,
        Section::Reference,
        Section::Support,
        Section::Profile,
    ];

    /// Unknown keys land on the dashboard.
    pub fn parse(key: &str) -> Self {
        match key.trim().to_ascii_lowercase().as_str() {
            "notebook" => Section::Notebook,
            "planning" => Section::Planning,
            "calendar" => Section::Calendar,
            "tests" => Section::Tests,
            "reference" | "vademecum" => Section::Reference,
            "support" => Section::Support,
            "profile" => Section::Profile,
            _ => Section::Dashboard,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Section::Dashboard => "dashboard",
            Section::Notebook => "notebook",
            Section::Planning => "planning",
            Section::Calendar => "calendar",
            Section::Tests => "tests",
            Section::Reference => "reference",
            Section::Support => "support",
            Section::Profile => "profile",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthView {
    #[default]
    Login,
    Register,
    ResetPassword,
}

impl AuthView {
    pub fn parse(key: &str) -> Self {
        match key.trim() {
            "register" => AuthView::Register,
            "reset-password" | "forgot-password" => AuthView::ResetPassword,
            _ => AuthView::Login,
        }
    }
}

/// Current section and auth form. Any transition is allowed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Navigator {
    section: Section,
    auth_view: AuthView,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn auth_view(&self) -> AuthView {
        self.auth_view
    }

    pub fn go(&mut self, section: Section) {
        self.section = section;
    }

    pub fn go_to_key(&mut self, key: &str) {
        self.section = Section::parse(key);
    }

    pub fn show_auth(&mut self, view: AuthView) {
        self.auth_view = view;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("notebook", Section::Notebook)]
    #[case("vademecum", Section::Reference)]
    #[case("Tests", Section::Tests)]
    #[case("nowhere", Section::Dashboard)]
    #[case("", Section::Dashboard)]
    fn parse_section(#[case] key: &str, #[case] expected: Section) {
        assert_eq!(Section::parse(key), expected);
    }

    #[test]
    fn keys_round_trip() {
        for section in Section::ALL {
            assert_eq!(Section::parse(section.key()), section);
        }
    }

    #[test]
    fn navigator_switches_freely() {
        let mut nav = Navigator::new();
        assert_eq!(nav.section(), Section::Dashboard);
        nav.go(Section::Profile);
        nav.go_to_key("bogus");
        assert_eq!(nav.section(), Section::Dashboard);
        nav.show_auth(AuthView::parse("forgot-password"));
        assert_eq!(nav.auth_view(), AuthView::ResetPassword);
        nav.show_auth(AuthView::Login);
        assert_eq!(nav.auth_view(), AuthView::Login);
    }
}
