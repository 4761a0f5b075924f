// src/config/state.rs
use super::consts::{DEFAULT_FIELD, KNOWN_FIELDS};
use super::options::AppOptions;
use crate::request::Target;

/// Remembered credential. Lives in memory only; never written to disk.
#[derive(Clone, Debug, Default)]
pub struct Session {
    token: Option<String>,
    pub remember: bool,
}

impl Session {
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Keep the token only if the user asked us to.
    pub fn after_fetch(&mut self, used: &str) {
        self.token = self.remember.then(|| s!(used));
    }

    pub fn forget(&mut self) {
        self.token = None;
    }
}

/// What the form holds between frames.
#[derive(Clone, Debug)]
pub struct FormState {
    pub token: String,
    pub all_users: bool,
    pub user_id: u64,
    /// One flag per `KNOWN_FIELDS` entry, same order.
    pub known: Vec<bool>,
    /// Comma-separated extra field names.
    pub extra_fields: String,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            token: s!(),
            all_users: false,
            user_id: 1,
            known: KNOWN_FIELDS.iter().map(|f| *f == DEFAULT_FIELD).collect(),
            extra_fields: s!(),
        }
    }
}

impl FormState {
    pub fn target(&self) -> Target {
        if self.all_users { Target::AllUsers } else { Target::User(self.user_id.max(1)) }
    }

    /// Checked known fields first (in vocabulary order), then the extras as typed.
    pub fn selected_fields(&self) -> Vec<String> {
        let mut out: Vec<String> = KNOWN_FIELDS
            .iter()
            .zip(&self.known)
            .filter(|(_, on)| **on)
            .map(|(f, _)| s!(*f))
            .collect();
        out.extend(
            self.extra_fields
                .split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(String::from),
        );
        out
    }
}

#[derive(Clone, Debug)]
pub struct GuiState {
    pub form: FormState,
    pub session: Session,
    pub out_dir_text: String,
    pub show_help: bool,
}

impl Default for GuiState {
    fn default() -> Self {
        Self {
            form: FormState::default(),
            session: Session::default(),
            out_dir_text: s!(),
            show_help: false,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub options: AppOptions,
    pub gui: GuiState,
}

impl AppState {
    pub fn new(options: AppOptions) -> Self {
        let gui = GuiState {
            out_dir_text: options.export.out_dir().to_string_lossy().into_owned(),
            ..GuiState::default()
        };
        Self { options, gui }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_form_selects_user_data_only() {
        let form = FormState::default();
        assert_eq!(form.selected_fields(), vec![s!("user_data")]);
        assert_eq!(form.target(), Target::User(1));
    }

    #[test]
    fn extras_follow_known_fields() {
        let mut form = FormState::default();
        form.known[1] = true; // followers
        form.extra_fields = s!(" posts, ,albums ");
        assert_eq!(
            form.selected_fields(),
            vec![s!("user_data"), s!("followers"), s!("posts"), s!("albums")]
        );
    }

    #[test]
    fn session_forgets_unless_remembered() {
        let mut session = Session::default();
        session.after_fetch("tok");
        assert_eq!(session.token(), None);

        session.remember = true;
        session.after_fetch("tok");
        assert_eq!(session.token(), Some("tok"));

        session.forget();
        assert_eq!(session.token(), None);
    }
}
