use crate::{
    config::Config,
    controller::{
        ActionOutcome, SubmitOutcome, UserFormController, ADD_PROPERTY_BUTTON, CANCEL_BUTTON,
        SUBMIT_BUTTON,
    },
    form::{ErrorRegion, FormRow, UserForm, PROPERTY_MARKER, USER_ID_INPUT},
    page::{Page, PageContext},
    record::UserId,
    rules,
    store::HttpUserStore,
};
use anyhow::{anyhow, Result};
use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(name = "userform", about = "Create or edit a user record")]
pub struct Args {
    /// Base URL of the administration application
    #[arg(long)]
    pub base_url: Option<String>,

    /// Identifier of the user to edit; negative for a new user
    #[arg(long, default_value = "-1", allow_hyphen_values = true)]
    pub user_id: String,

    /// Path to config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Preset a field, e.g. --set email=a@example.com (repeatable)
    #[arg(long = "set", value_parser = parse_assignment)]
    pub set: Vec<(String, String)>,

    /// Check the administrator box
    #[arg(long)]
    pub admin: bool,

    /// Fetch the existing user and prefill the form
    #[arg(long)]
    pub load: bool,

    /// Submit once and exit instead of starting the interactive editor
    #[arg(long)]
    pub submit: bool,

    /// Default log filter when RUST_LOG is unset
    #[arg(long)]
    pub log_level: Option<String>,
}

fn parse_assignment(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected name=value, got '{}'", s)),
    }
}

/// Get the path to the history file
fn history_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".userform")
        .join("history")
}

/// Page rendered on the terminal. Alerts go to stderr; the first redirect
/// ends the session.
#[derive(Clone, Default)]
pub struct TerminalPage {
    redirected: Arc<Mutex<Option<String>>>,
}

impl TerminalPage {
    pub fn redirected(&self) -> Option<String> {
        self.redirected.lock().ok().and_then(|r| r.clone())
    }
}

impl Page for TerminalPage {
    fn alert(&self, message: &str) {
        eprintln!("[alert] {}", message);
    }

    fn redirect(&self, url: &str) {
        println!("Redirect: {}", url);
        if let Ok(mut r) = self.redirected.lock() {
            r.get_or_insert_with(|| url.to_string());
        }
    }
}

pub type TerminalController = UserFormController<HttpUserStore, TerminalPage>;

pub struct Context {
    pub runtime: tokio::runtime::Runtime,
    pub controller: TerminalController,
}

impl Context {
    pub fn new(args: &Args, cfg: &Config) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let base_url = args.base_url.clone().unwrap_or_else(|| cfg.base_url.clone());
        let ctx = PageContext::init(&base_url);
        let store = HttpUserStore::new(&ctx, Duration::from_secs(cfg.request_timeout_secs))?;

        let mut controller =
            UserFormController::new(ctx, UserForm::standard(&args.user_id), store, TerminalPage::default())
                .with_rules(rules::from_config(&cfg.password_rules));
        controller.populate();

        if args.load {
            let id = UserId::parse(&args.user_id)
                .existing()
                .ok_or_else(|| anyhow!("--load needs a non-negative --user-id"))?;
            runtime.block_on(controller.load(id))?;
        }

        for (name, value) in &args.set {
            if !controller.form_mut().set_value(name, value) {
                return Err(anyhow!("Unknown field: {}", name));
            }
        }
        if args.admin {
            controller.form_mut().set_admin(true);
        }

        Ok(Self { runtime, controller })
    }

    fn click(&mut self, element_id: &str) -> Vec<ActionOutcome> {
        self.runtime.block_on(self.controller.dispatch(element_id))
    }
}

/// Submit once; succeeds only if the user was saved.
pub fn run_once(mut ctx: Context) -> Result<()> {
    for outcome in ctx.click(SUBMIT_BUTTON) {
        match outcome {
            ActionOutcome::Submitted(SubmitOutcome::Saved(_)) => return Ok(()),
            ActionOutcome::Submitted(SubmitOutcome::Blocked(report)) => {
                for region in [ErrorRegion::Email, ErrorRegion::Password] {
                    if let Some(msg) = report.message(region) {
                        eprintln!("{}: {}", region.element_id(), msg);
                    }
                }
                return Err(anyhow!("User not saved: validation failed"));
            }
            ActionOutcome::Submitted(SubmitOutcome::Failed(e)) => {
                return Err(anyhow!("User not saved: {}", e));
            }
            _ => {}
        }
    }
    Err(anyhow!("Submit button is not bound"))
}

pub fn run_repl(mut ctx: Context) -> Result<()> {
    let mut rl = DefaultEditor::new()?;

    let history_file = history_path();
    let _ = rl.load_history(&history_file);

    println!("userform - type /help for commands, /exit to quit");

    loop {
        match rl.readline(">>> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                rl.add_history_entry(line)?;

                if handle_command(&mut ctx, &mut rl, line) {
                    break;
                }
                if ctx.controller.page().redirected().is_some() {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Error: {}", e);
                break;
            }
        }
    }

    if let Some(parent) = history_file.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let _ = rl.save_history(&history_file);
    Ok(())
}

/// Returns true when the session should end.
fn handle_command(ctx: &mut Context, rl: &mut DefaultEditor, line: &str) -> bool {
    let (cmd, rest) = match line.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (line, ""),
    };

    match cmd {
        "/exit" | "/quit" => return true,
        "/help" => print_help(),
        "/show" => print_form(&ctx.controller, rest == "html"),
        "/set" => {
            let (name, value) = match rest.split_once(char::is_whitespace) {
                Some((name, value)) => (name, value.trim()),
                None => (rest, ""),
            };
            if name.is_empty() {
                eprintln!("Usage: /set <field> <value>");
            } else if !ctx.controller.form_mut().set_value(name, value) {
                eprintln!("Unknown field: {}", name);
            }
        }
        "/id" => ctx.controller.form_mut().set_user_id_input(rest),
        "/admin" => match rest {
            "on" => ctx.controller.form_mut().set_admin(true),
            "off" => ctx.controller.form_mut().set_admin(false),
            _ => eprintln!("Usage: /admin on|off"),
        },
        "/add-property" => {
            for outcome in ctx.click(ADD_PROPERTY_BUTTON) {
                if let ActionOutcome::PropertyPrompt(prompt) = outcome {
                    let input = match rl.readline(&format!("{}: ", prompt)) {
                        Ok(name) => Some(name),
                        Err(_) => None,
                    };
                    if let Ok(field) = ctx.controller.complete_add_property(input.as_deref()) {
                        println!("Added {} ({})", field.label, field.element_id);
                    }
                }
            }
        }
        "/submit" => {
            for outcome in ctx.click(SUBMIT_BUTTON) {
                if let ActionOutcome::Submitted(SubmitOutcome::Blocked(_)) = outcome {
                    print_errors(&ctx.controller);
                }
            }
        }
        "/cancel" => {
            ctx.click(CANCEL_BUTTON);
        }
        _ => eprintln!("Unknown command: {} (try /help)", cmd),
    }
    false
}

fn print_help() {
    println!("Commands:");
    println!("  /show [html]          Show the form (html: custom rows as markup)");
    println!("  /set <field> <value>  Set a field value");
    println!("  /id <value>           Set the user identifier input");
    println!("  /admin on|off         Check or uncheck the administrator box");
    println!("  /add-property         Add a custom property");
    println!("  /submit               Validate and save");
    println!("  /cancel               Leave without saving");
    println!("  /exit                 Quit");
}

fn print_errors(controller: &TerminalController) {
    for region in [ErrorRegion::Email, ErrorRegion::Password] {
        let text = controller.form().error_text(region);
        if !text.is_empty() {
            eprintln!("  {}: {}", region.element_id(), text);
        }
    }
}

fn print_form(controller: &TerminalController, html: bool) {
    let form = controller.form();
    println!("{} = {}", USER_ID_INPUT, form.user_id_input());
    let mut custom = false;
    for row in form.rows() {
        match row {
            FormRow::Marker => {
                custom = true;
                println!("  -- {} --", PROPERTY_MARKER);
            }
            FormRow::Field(field) if html && custom => println!("  {}", field.render_row()),
            FormRow::Field(field) => {
                let value = if field.name == crate::record::ADMIN_ROLE {
                    if form.admin_checked() { "[x]" } else { "[ ]" }
                } else {
                    form.value(&field.name).unwrap_or("")
                };
                println!("  {:<18} {:<24} {}", field.label, field.element_id, value);
            }
        }
    }
    print_errors(controller);
}
