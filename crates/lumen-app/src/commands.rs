//! Command trait, registry, and dispatch for the terminal driver.
//!
//! Each command exercises one piece of the session contract: window
//! lifecycle, VFS edits, app locks, identity changes.

use std::collections::HashMap;

use lumen_core::LockChallenge;
use lumen_core::error::{LumenError, Result};
use lumen_core::profile::Identity;
use lumen_core::session::{OpenOutcome, Session};
use lumen_core::vfs::NodePayload;
use lumen_core::vfs::path::split_parent;

/// Output produced by a command.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutput {
    /// Plain text lines.
    Text(String),
    /// Command produced no visible output.
    None,
    /// Signal to the driver to exit.
    Exit,
    /// Signal to the driver to switch identity (logout + login).
    Login(Identity),
}

/// A single executable command.
pub trait Command {
    /// The command name (what the user types).
    fn name(&self) -> &str;

    /// One-line description for `help`.
    fn description(&self) -> &str;

    /// Usage string (e.g. "open <app> [file]").
    fn usage(&self) -> &str;

    /// Execute the command against the live session.
    fn execute(&self, args: &[&str], session: &mut Session) -> Result<CommandOutput>;
}

/// Registry of available commands with dispatch.
pub struct CommandRegistry {
    commands: HashMap<String, Box<dyn Command>>,
}

impl CommandRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// Register a command. Replaces any existing command with the same name.
    pub fn register(&mut self, cmd: Box<dyn Command>) {
        self.commands.insert(cmd.name().to_string(), cmd);
    }

    /// Parse and execute a command line.
    pub fn execute(&self, line: &str, session: &mut Session) -> Result<CommandOutput> {
        let mut parts = line.split_whitespace();
        let Some(name) = parts.next() else {
            return Ok(CommandOutput::None);
        };
        let args: Vec<&str> = parts.collect();
        match self.commands.get(&name.to_lowercase()) {
            Some(cmd) => cmd.execute(&args, session),
            None => Err(LumenError::Command(format!("unknown command: {name}"))),
        }
    }

    /// Help text: every command with its usage and description.
    pub fn help(&self) -> String {
        let mut entries: Vec<(&str, &str)> = self
            .commands
            .values()
            .map(|c| (c.usage(), c.description()))
            .collect();
        entries.sort_unstable();
        entries
            .iter()
            .map(|(usage, desc)| format!("  {usage:<28} {desc}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        register_builtins(&mut registry);
        registry
    }
}

/// Register the full command set.
pub fn register_builtins(registry: &mut CommandRegistry) {
    registry.register(Box::new(OpenCmd));
    registry.register(Box::new(WindowsCmd));
    registry.register(Box::new(FocusCmd));
    registry.register(Box::new(MinimizeCmd));
    registry.register(Box::new(MaximizeCmd));
    registry.register(Box::new(CloseCmd));
    registry.register(Box::new(DockCmd));
    registry.register(Box::new(SearchCmd));
    registry.register(Box::new(LsCmd));
    registry.register(Box::new(CatCmd));
    registry.register(Box::new(MkdirCmd));
    registry.register(Box::new(WriteCmd));
    registry.register(Box::new(RenameCmd));
    registry.register(Box::new(RmCmd));
    registry.register(Box::new(LockCmd));
    registry.register(Box::new(UnlockCmd));
    registry.register(Box::new(PasscodeCmd));
    registry.register(Box::new(AppsCmd));
    registry.register(Box::new(NotificationsCmd));
    registry.register(Box::new(LoginCmd));
    registry.register(Box::new(PromoteCmd));
    registry.register(Box::new(ExitCmd));
}

fn describe_open(outcome: OpenOutcome) -> CommandOutput {
    match outcome {
        OpenOutcome::Opened { window_id } => CommandOutput::Text(format!("opened {window_id}")),
        OpenOutcome::ChallengeIssued(LockChallenge::SetPasscode { app_id }) => {
            CommandOutput::Text(format!(
                "{app_id} is locked and no passcode is set -- choose one with: passcode <code>"
            ))
        }
        OpenOutcome::ChallengeIssued(LockChallenge::EnterPasscode { app_id }) => {
            CommandOutput::Text(format!("{app_id} is locked -- unlock with: passcode <code>"))
        }
        OpenOutcome::Installed { app_id } => {
            CommandOutput::Text(format!("installed {app_id}"))
        }
        OpenOutcome::Rejected => CommandOutput::Text("rejected (see notifications)".to_string()),
    }
}

// ---------------------------------------------------------------------------
// open
// ---------------------------------------------------------------------------

struct OpenCmd;
impl Command for OpenCmd {
    fn name(&self) -> &str {
        "open"
    }
    fn description(&self) -> &str {
        "Open an app, optionally with a file"
    }
    fn usage(&self) -> &str {
        "open <app> [file]"
    }
    fn execute(&self, args: &[&str], session: &mut Session) -> Result<CommandOutput> {
        if args.is_empty() {
            return Err(LumenError::Command("usage: open <app> [file]".to_string()));
        }
        let outcome = session.open_app(args[0], args.get(1).copied());
        Ok(describe_open(outcome))
    }
}

// ---------------------------------------------------------------------------
// windows
// ---------------------------------------------------------------------------

struct WindowsCmd;
impl Command for WindowsCmd {
    fn name(&self) -> &str {
        "windows"
    }
    fn description(&self) -> &str {
        "List open windows, front-most first"
    }
    fn usage(&self) -> &str {
        "windows"
    }
    fn execute(&self, _args: &[&str], session: &mut Session) -> Result<CommandOutput> {
        let windows = session.mission_control();
        if windows.is_empty() {
            return Ok(CommandOutput::Text("no open windows".to_string()));
        }
        let active = session.windows().active_id().map(str::to_string);
        let lines: Vec<String> = windows
            .iter()
            .map(|w| {
                let marker = if active.as_deref() == Some(w.id.as_str()) {
                    "*"
                } else if w.minimized {
                    "_"
                } else {
                    " "
                };
                format!(
                    "{marker} {:<20} {:>4}x{:<4} z={} [{}]",
                    w.id, w.size.width, w.size.height, w.z_index, w.title
                )
            })
            .collect();
        Ok(CommandOutput::Text(lines.join("\n")))
    }
}

// ---------------------------------------------------------------------------
// focus / minimize / maximize / close
// ---------------------------------------------------------------------------

struct FocusCmd;
impl Command for FocusCmd {
    fn name(&self) -> &str {
        "focus"
    }
    fn description(&self) -> &str {
        "Bring a window to the front"
    }
    fn usage(&self) -> &str {
        "focus <window>"
    }
    fn execute(&self, args: &[&str], session: &mut Session) -> Result<CommandOutput> {
        let id = args
            .first()
            .ok_or_else(|| LumenError::Command("usage: focus <window>".to_string()))?;
        session.focus_window(id);
        Ok(CommandOutput::None)
    }
}

struct MinimizeCmd;
impl Command for MinimizeCmd {
    fn name(&self) -> &str {
        "minimize"
    }
    fn description(&self) -> &str {
        "Minimize a window"
    }
    fn usage(&self) -> &str {
        "minimize <window>"
    }
    fn execute(&self, args: &[&str], session: &mut Session) -> Result<CommandOutput> {
        let id = args
            .first()
            .ok_or_else(|| LumenError::Command("usage: minimize <window>".to_string()))?;
        session.minimize_window(id);
        Ok(CommandOutput::None)
    }
}

struct MaximizeCmd;
impl Command for MaximizeCmd {
    fn name(&self) -> &str {
        "maximize"
    }
    fn description(&self) -> &str {
        "Toggle a window between maximized and restored"
    }
    fn usage(&self) -> &str {
        "maximize <window>"
    }
    fn execute(&self, args: &[&str], session: &mut Session) -> Result<CommandOutput> {
        let id = args
            .first()
            .ok_or_else(|| LumenError::Command("usage: maximize <window>".to_string()))?;
        session.toggle_maximize_window(id);
        Ok(CommandOutput::None)
    }
}

struct CloseCmd;
impl Command for CloseCmd {
    fn name(&self) -> &str {
        "close"
    }
    fn description(&self) -> &str {
        "Close a window"
    }
    fn usage(&self) -> &str {
        "close <window>"
    }
    fn execute(&self, args: &[&str], session: &mut Session) -> Result<CommandOutput> {
        let id = args
            .first()
            .ok_or_else(|| LumenError::Command("usage: close <window>".to_string()))?;
        session.close_window(id);
        Ok(CommandOutput::None)
    }
}

// ---------------------------------------------------------------------------
// dock / search / apps
// ---------------------------------------------------------------------------

struct DockCmd;
impl Command for DockCmd {
    fn name(&self) -> &str {
        "dock"
    }
    fn description(&self) -> &str {
        "Show the dock"
    }
    fn usage(&self) -> &str {
        "dock"
    }
    fn execute(&self, _args: &[&str], session: &mut Session) -> Result<CommandOutput> {
        let lines: Vec<String> = session
            .dock()
            .iter()
            .map(|item| {
                let state = if item.active {
                    "active"
                } else if item.running {
                    "running"
                } else {
                    ""
                };
                format!("  {:<14} {state}", item.app_id)
            })
            .collect();
        Ok(CommandOutput::Text(lines.join("\n")))
    }
}

struct SearchCmd;
impl Command for SearchCmd {
    fn name(&self) -> &str {
        "search"
    }
    fn description(&self) -> &str {
        "Spotlight search over apps and files"
    }
    fn usage(&self) -> &str {
        "search <query>"
    }
    fn execute(&self, args: &[&str], session: &mut Session) -> Result<CommandOutput> {
        if args.is_empty() {
            return Err(LumenError::Command("usage: search <query>".to_string()));
        }
        let query = args.join(" ");
        let hits = session.spotlight(&query, 10);
        if hits.is_empty() {
            return Ok(CommandOutput::Text("no results".to_string()));
        }
        let lines: Vec<String> = hits
            .iter()
            .map(|hit| match hit {
                lumen_core::shell::SpotlightHit::App { app_id, title } => {
                    format!("  app   {title} ({app_id})")
                }
                lumen_core::shell::SpotlightHit::File { path, .. } => {
                    format!("  file  {path}")
                }
            })
            .collect();
        Ok(CommandOutput::Text(lines.join("\n")))
    }
}

struct AppsCmd;
impl Command for AppsCmd {
    fn name(&self) -> &str {
        "apps"
    }
    fn description(&self) -> &str {
        "List every launchable app"
    }
    fn usage(&self) -> &str {
        "apps"
    }
    fn execute(&self, _args: &[&str], session: &mut Session) -> Result<CommandOutput> {
        let locked = &session.profile().locked_apps;
        let lines: Vec<String> = session
            .registry()
            .apps()
            .iter()
            .map(|app| {
                let lock = if locked.iter().any(|id| id == app.id()) {
                    " [locked]"
                } else {
                    ""
                };
                format!("  {:<14} {}{lock}", app.id(), app.title())
            })
            .collect();
        Ok(CommandOutput::Text(lines.join("\n")))
    }
}

// ---------------------------------------------------------------------------
// filesystem: ls, cat, mkdir, write, rename, rm
// ---------------------------------------------------------------------------

struct LsCmd;
impl Command for LsCmd {
    fn name(&self) -> &str {
        "ls"
    }
    fn description(&self) -> &str {
        "List directory contents"
    }
    fn usage(&self) -> &str {
        "ls [path]"
    }
    fn execute(&self, args: &[&str], session: &mut Session) -> Result<CommandOutput> {
        let path = args.first().copied().unwrap_or("/");
        let nodes = session.vfs().list(path)?;
        let lines: Vec<String> = nodes
            .iter()
            .map(|node| {
                if node.is_directory() {
                    format!("  {}/", node.name)
                } else {
                    format!("  {}", node.name)
                }
            })
            .collect();
        Ok(CommandOutput::Text(lines.join("\n")))
    }
}

struct CatCmd;
impl Command for CatCmd {
    fn name(&self) -> &str {
        "cat"
    }
    fn description(&self) -> &str {
        "Print file contents"
    }
    fn usage(&self) -> &str {
        "cat <file>"
    }
    fn execute(&self, args: &[&str], session: &mut Session) -> Result<CommandOutput> {
        let path = args
            .first()
            .ok_or_else(|| LumenError::Command("usage: cat <file>".to_string()))?;
        Ok(CommandOutput::Text(session.read_file(path)?))
    }
}

struct MkdirCmd;
impl Command for MkdirCmd {
    fn name(&self) -> &str {
        "mkdir"
    }
    fn description(&self) -> &str {
        "Create a directory"
    }
    fn usage(&self) -> &str {
        "mkdir <path>"
    }
    fn execute(&self, args: &[&str], session: &mut Session) -> Result<CommandOutput> {
        let path = args
            .first()
            .ok_or_else(|| LumenError::Command("usage: mkdir <path>".to_string()))?;
        let (parent, name) = split_parent(path)
            .ok_or_else(|| LumenError::Command("cannot create root".to_string()))?;
        session.create_node(&parent, &name, NodePayload::Directory)?;
        Ok(CommandOutput::None)
    }
}

struct WriteCmd;
impl Command for WriteCmd {
    fn name(&self) -> &str {
        "write"
    }
    fn description(&self) -> &str {
        "Write text to a file (creating it if needed)"
    }
    fn usage(&self) -> &str {
        "write <file> <text...>"
    }
    fn execute(&self, args: &[&str], session: &mut Session) -> Result<CommandOutput> {
        if args.len() < 2 {
            return Err(LumenError::Command(
                "usage: write <file> <text...>".to_string(),
            ));
        }
        let path = args[0];
        let text = args[1..].join(" ");
        if session.vfs().resolve(path).is_some() {
            session.write_file(path, &text)?;
        } else {
            let (parent, name) = split_parent(path)
                .ok_or_else(|| LumenError::Command("cannot write to root".to_string()))?;
            session.create_node(&parent, &name, NodePayload::File { content: text.clone() })?;
        }
        Ok(CommandOutput::Text(format!(
            "wrote {} bytes to {path}",
            text.len()
        )))
    }
}

struct RenameCmd;
impl Command for RenameCmd {
    fn name(&self) -> &str {
        "rename"
    }
    fn description(&self) -> &str {
        "Rename a file or directory in place"
    }
    fn usage(&self) -> &str {
        "rename <path> <new-name>"
    }
    fn execute(&self, args: &[&str], session: &mut Session) -> Result<CommandOutput> {
        if args.len() != 2 {
            return Err(LumenError::Command(
                "usage: rename <path> <new-name>".to_string(),
            ));
        }
        session.rename_node(args[0], args[1])?;
        Ok(CommandOutput::None)
    }
}

struct RmCmd;
impl Command for RmCmd {
    fn name(&self) -> &str {
        "rm"
    }
    fn description(&self) -> &str {
        "Delete a file or directory (recursively)"
    }
    fn usage(&self) -> &str {
        "rm <path>"
    }
    fn execute(&self, args: &[&str], session: &mut Session) -> Result<CommandOutput> {
        let path = args
            .first()
            .ok_or_else(|| LumenError::Command("usage: rm <path>".to_string()))?;
        session.delete_node(path)?;
        Ok(CommandOutput::None)
    }
}

// ---------------------------------------------------------------------------
// app lock: lock, unlock, passcode
// ---------------------------------------------------------------------------

struct LockCmd;
impl Command for LockCmd {
    fn name(&self) -> &str {
        "lock"
    }
    fn description(&self) -> &str {
        "Put an app behind the passcode gate"
    }
    fn usage(&self) -> &str {
        "lock <app>"
    }
    fn execute(&self, args: &[&str], session: &mut Session) -> Result<CommandOutput> {
        let app_id = args
            .first()
            .ok_or_else(|| LumenError::Command("usage: lock <app>".to_string()))?;
        session.lock_app(app_id);
        Ok(CommandOutput::Text(format!("{app_id} locked")))
    }
}

struct UnlockCmd;
impl Command for UnlockCmd {
    fn name(&self) -> &str {
        "unlock"
    }
    fn description(&self) -> &str {
        "Remove an app from the passcode gate"
    }
    fn usage(&self) -> &str {
        "unlock <app>"
    }
    fn execute(&self, args: &[&str], session: &mut Session) -> Result<CommandOutput> {
        let app_id = args
            .first()
            .ok_or_else(|| LumenError::Command("usage: unlock <app>".to_string()))?;
        session.unlock_app(app_id);
        Ok(CommandOutput::Text(format!("{app_id} unlocked")))
    }
}

struct PasscodeCmd;
impl Command for PasscodeCmd {
    fn name(&self) -> &str {
        "passcode"
    }
    fn description(&self) -> &str {
        "Answer an outstanding passcode challenge"
    }
    fn usage(&self) -> &str {
        "passcode <code>"
    }
    fn execute(&self, args: &[&str], session: &mut Session) -> Result<CommandOutput> {
        let code = args
            .first()
            .ok_or_else(|| LumenError::Command("usage: passcode <code>".to_string()))?;
        if session.pending_challenge().is_none() {
            return Ok(CommandOutput::Text("no challenge outstanding".to_string()));
        }
        Ok(describe_open(session.submit_passcode(code)))
    }
}

// ---------------------------------------------------------------------------
// notifications
// ---------------------------------------------------------------------------

struct NotificationsCmd;
impl Command for NotificationsCmd {
    fn name(&self) -> &str {
        "notifications"
    }
    fn description(&self) -> &str {
        "Show the notification feed"
    }
    fn usage(&self) -> &str {
        "notifications"
    }
    fn execute(&self, _args: &[&str], session: &mut Session) -> Result<CommandOutput> {
        let items = session.notifications().items();
        if items.is_empty() {
            return Ok(CommandOutput::Text("no notifications".to_string()));
        }
        let lines: Vec<String> = items
            .iter()
            .map(|n| format!("  [{}] {}: {}", n.id, n.title, n.body))
            .collect();
        Ok(CommandOutput::Text(lines.join("\n")))
    }
}

// ---------------------------------------------------------------------------
// identity: login, promote
// ---------------------------------------------------------------------------

struct LoginCmd;
impl Command for LoginCmd {
    fn name(&self) -> &str {
        "login"
    }
    fn description(&self) -> &str {
        "Switch identity (guest, admin, or a name)"
    }
    fn usage(&self) -> &str {
        "login <name|guest|admin>"
    }
    fn execute(&self, args: &[&str], _session: &mut Session) -> Result<CommandOutput> {
        let name = args
            .first()
            .ok_or_else(|| LumenError::Command("usage: login <name|guest|admin>".to_string()))?;
        let identity = if *name == "guest" {
            Identity::Guest
        } else {
            Identity::from_login(Some(*name))
        };
        Ok(CommandOutput::Login(identity))
    }
}

struct PromoteCmd;
impl Command for PromoteCmd {
    fn name(&self) -> &str {
        "promote"
    }
    fn description(&self) -> &str {
        "Promote the guest session to a named account"
    }
    fn usage(&self) -> &str {
        "promote <name>"
    }
    fn execute(&self, args: &[&str], session: &mut Session) -> Result<CommandOutput> {
        let name = args
            .first()
            .ok_or_else(|| LumenError::Command("usage: promote <name>".to_string()))?;
        if session.promote_guest(name) {
            Ok(CommandOutput::Text(format!("signed in as {name}")))
        } else {
            Ok(CommandOutput::Text("promotion failed (see notifications)".to_string()))
        }
    }
}

// ---------------------------------------------------------------------------
// exit
// ---------------------------------------------------------------------------

struct ExitCmd;
impl Command for ExitCmd {
    fn name(&self) -> &str {
        "exit"
    }
    fn description(&self) -> &str {
        "Save and quit"
    }
    fn usage(&self) -> &str {
        "exit"
    }
    fn execute(&self, _args: &[&str], _session: &mut Session) -> Result<CommandOutput> {
        Ok(CommandOutput::Exit)
    }
}
