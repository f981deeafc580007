use crate::error::CommandError;
use crate::route::PageVariant;
use crate::store::PostStatus;
use std::time::Duration;

/// Transitions requested by a child view. Each one maps to a canonical
/// location; the controller pushes it and rebroadcasts location-changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildIntent {
    // Admin login form
    LoginSucceeded,
    // Admin header
    LoggedOut,
    OpenContacts,
    OpenSite,

    // Dashboard
    CreatePost,
    EditPost { post_id: String },

    // Post editor
    PostSaved,
    EditCancelled,

    // Contacts view
    BackToDashboard,
}

impl ChildIntent {
    /// The variant this intent leads to.
    pub fn target(&self) -> PageVariant {
        match self {
            ChildIntent::LoginSucceeded
            | ChildIntent::PostSaved
            | ChildIntent::EditCancelled
            | ChildIntent::BackToDashboard => PageVariant::Admin,
            ChildIntent::LoggedOut => PageVariant::AdminLogin,
            ChildIntent::OpenContacts => PageVariant::AdminContacts,
            ChildIntent::OpenSite => PageVariant::Home,
            ChildIntent::CreatePost => PageVariant::AdminEdit { post_id: None },
            ChildIntent::EditPost { post_id } => PageVariant::AdminEdit {
                post_id: Some(post_id.clone()),
            },
        }
    }

    fn parse(name: &str, arg: Option<&str>) -> Result<Self, CommandError> {
        let intent = match name {
            "login-succeeded" => ChildIntent::LoginSucceeded,
            "logged-out" => ChildIntent::LoggedOut,
            "open-contacts" => ChildIntent::OpenContacts,
            "open-site" => ChildIntent::OpenSite,
            "create-post" => ChildIntent::CreatePost,
            "edit-post" => ChildIntent::EditPost {
                post_id: required(arg, "edit-post", "a post id")?.to_string(),
            },
            "post-saved" => ChildIntent::PostSaved,
            "edit-cancelled" => ChildIntent::EditCancelled,
            "back-to-dashboard" => ChildIntent::BackToDashboard,
            other => {
                return Err(CommandError::InvalidValue {
                    command: "intent",
                    value: other.to_string(),
                })
            }
        };
        Ok(intent)
    }
}

/// One line of a navigation script replayed by the binary.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Follow a link: push the href and rebroadcast.
    Open(String),
    /// Programmatic navigation to whatever the path resolves to.
    Go(String),
    Back,
    Forward,
    Scroll(f64),
    Wait(Duration),
    Category(String),
    Section(String),
    Login,
    Logout,
    Intent(ChildIntent),
    /// List posts; `None` lists every status.
    Posts(Option<PostStatus>),
    State,
}

impl Command {
    /// Parse a script line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let mut words = line.split_whitespace();
        let name = words.next().unwrap_or_default();
        let arg = words.next();

        let command = match name {
            "open" => Command::Open(required(arg, "open", "an href")?.to_string()),
            "go" => Command::Go(required(arg, "go", "a path")?.to_string()),
            "back" => Command::Back,
            "forward" => Command::Forward,
            "scroll" => Command::Scroll(number(required(arg, "scroll", "an offset")?)?),
            "wait" => {
                let raw = required(arg, "wait", "milliseconds")?;
                let ms = raw
                    .parse::<u64>()
                    .map_err(|_| CommandError::InvalidNumber(raw.to_string()))?;
                Command::Wait(Duration::from_millis(ms))
            }
            "category" => Command::Category(required(arg, "category", "a category id")?.to_string()),
            "section" => Command::Section(required(arg, "section", "a section id")?.to_string()),
            "login" => Command::Login,
            "logout" => Command::Logout,
            "intent" => {
                let intent_name = required(arg, "intent", "an intent name")?;
                Command::Intent(ChildIntent::parse(intent_name, words.next())?)
            }
            "posts" => match arg {
                None | Some("all") => Command::Posts(None),
                Some(status) => Command::Posts(Some(status.parse().map_err(|value| {
                    CommandError::InvalidValue {
                        command: "posts",
                        value,
                    }
                })?)),
            },
            "state" => Command::State,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }
}

fn required<'a>(
    arg: Option<&'a str>,
    command: &'static str,
    argument: &'static str,
) -> Result<&'a str, CommandError> {
    arg.ok_or(CommandError::MissingArgument { command, argument })
}

fn number(raw: &str) -> Result<f64, CommandError> {
    raw.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| CommandError::InvalidNumber(raw.to_string()))
}
