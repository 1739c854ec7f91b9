//! NarrativeIQ CLI
//!
//! Command-line front end over the same session and page controllers the
//! browser app uses:
//! - Sign in, sign up, sign out
//! - Enhance and analyze text
//! - Generate mindmaps and complete stories
//! - Browse documents and history, manage credits and profile

use anyhow::{anyhow, bail, Context};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::api::{ApiGateway, FilePart, HttpClient};
use crate::auth::AuthSession;
use crate::config::{generate_default_config, Config};
use crate::controllers::{
    self, credits::purchase_notice, history, workspace, AnalysisKind, CreditsController,
    DocumentsController, HistoryController, MindmapController, ProfileController,
    StoryController, WorkspaceController, CREDIT_PACKS,
};
use crate::error::ClientError;
use crate::guard::{self, GuardDecision, Route};
use crate::session::FileSessionStore;
use crate::views::{analysis::format_score, diff, layout, text, AnalysisView};

#[derive(Parser, Debug)]
#[command(name = "narrativeiq")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "AI-powered narrative intelligence from the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend base URL (overrides config and NARRATIVEIQ_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Where to read narrative text from
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// File to read; `-` reads stdin
    pub file: Option<PathBuf>,

    /// Inline text instead of a file
    #[arg(short, long, conflicts_with = "file")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AnalyzeKind {
    Consistency,
    Structure,
    Character,
    DeepScan,
}

impl From<AnalyzeKind> for AnalysisKind {
    fn from(kind: AnalyzeKind) -> Self {
        match kind {
            AnalyzeKind::Consistency => AnalysisKind::Consistency,
            AnalyzeKind::Structure => AnalysisKind::Structure,
            AnalyzeKind::Character => AnalysisKind::Character,
            AnalyzeKind::DeepScan => AnalysisKind::DeepScan,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and remember the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Create an account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Forget the saved session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// List enhancement personas
    Personas,

    /// Rewrite text in a persona's voice (1 credit)
    Enhance {
        #[command(flatten)]
        input: InputArgs,
        #[arg(short, long, default_value = workspace::DEFAULT_PERSONA)]
        persona: String,
        #[arg(long)]
        title: Option<String>,
    },

    /// Run an analysis (1 credit, deep-scan 2)
    Analyze {
        #[arg(value_enum)]
        kind: AnalyzeKind,
        #[command(flatten)]
        input: InputArgs,
        /// Character to track (character analysis)
        #[arg(long)]
        character: Option<String>,
    },

    /// Generate a narrative mindmap (2 credits)
    Mindmap {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long)]
        title: Option<String>,
        /// Image path (default: <title>_mindmap.png)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print the graph data instead of rendering an image
        #[arg(long)]
        data: bool,
    },

    /// Complete a story from an opening (2 credits)
    Story {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long, default_value = "general")]
        genre: String,
        #[arg(long, default_value = "narrative")]
        style: String,
        #[arg(long, default_value = "medium")]
        length: String,
        #[arg(long)]
        title: Option<String>,
    },

    /// Saved documents
    Documents {
        #[command(subcommand)]
        action: DocumentsCommand,
    },

    /// Past operations
    History {
        /// Show at most this many entries
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Credit balance, pricing and top-ups
    Credits {
        #[command(subcommand)]
        action: CreditsCommand,
    },

    /// Profile and password
    Profile {
        #[command(subcommand)]
        action: ProfileCommand,
    },

    /// Extract text from a PDF, TXT or Markdown file
    Upload { file: PathBuf },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum DocumentsCommand {
    List,
    Show { id: String },
    Save {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long)]
        title: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum CreditsCommand {
    Balance,
    Pricing,
    /// Buy a pack by name (starter, writer, author)
    Buy { pack: String },
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    Password {
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
    },
}

impl Commands {
    /// Route whose guard governs this command
    fn route(&self) -> Route {
        match self {
            Commands::Login { .. } | Commands::Register { .. } => Route::Auth,
            Commands::Logout | Commands::Config { .. } => Route::Index,
            Commands::Whoami | Commands::Profile { .. } => Route::Profile,
            Commands::Personas
            | Commands::Enhance { .. }
            | Commands::Analyze { .. }
            | Commands::Upload { .. } => Route::Dashboard,
            Commands::Mindmap { .. } => Route::Mindmap,
            Commands::Story { .. } => Route::Story,
            Commands::Documents { .. } => Route::Documents,
            Commands::History { .. } => Route::History,
            Commands::Credits { .. } => Route::Credits,
        }
    }
}

impl InputArgs {
    fn read(&self) -> anyhow::Result<String> {
        if let Some(text) = &self.text {
            return Ok(text.clone());
        }
        match self.file.as_deref() {
            Some(path) if path == Path::new("-") => read_stdin(),
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {:?}", path)),
            None => read_stdin(),
        }
    }
}

fn read_stdin() -> anyhow::Result<String> {
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("Failed to read stdin")?;
    Ok(buf)
}

fn mime_for(path: &Path) -> Option<&'static str> {
    match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
        "pdf" => Some("application/pdf"),
        "txt" => Some("text/plain"),
        "md" | "markdown" => Some("text/markdown"),
        _ => None,
    }
}

fn read_upload(path: &Path) -> anyhow::Result<FilePart> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {:?}", path))?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "upload".to_string());

    let mut part = FilePart::new(filename, bytes);
    if let Some(mime) = mime_for(path) {
        part = part.content_type(mime);
    }
    Ok(part)
}

/// Stdout writer honoring `--format`
struct Output {
    format: OutputFormat,
}

impl Output {
    /// Confirmation text; kept off stdout in JSON mode
    fn notice(&self, message: &str) {
        match self.format {
            OutputFormat::Text => println!("{}", message),
            OutputFormat::Json => eprintln!("{}", message),
        }
    }

    fn value<T: Serialize>(
        &self,
        value: &T,
        render: impl FnOnce(&T) -> String,
    ) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
            OutputFormat::Text => print!("{}", render(value)),
        }
        Ok(())
    }
}

/// Attach the credits hint to errors that redirect there
fn explain(e: ClientError) -> anyhow::Error {
    match e.redirect() {
        Some(Route::Credits) => anyhow!("{}\nTop up with `narrativeiq credits buy starter`", e),
        _ => anyhow::Error::new(e),
    }
}

/// Parse a pack by label (case-insensitive) or 1-based position
fn parse_pack(value: &str) -> Option<usize> {
    if let Ok(n) = value.parse::<usize>() {
        return (1..=CREDIT_PACKS.len()).contains(&n).then(|| n - 1);
    }
    CREDIT_PACKS
        .iter()
        .position(|p| p.label.eq_ignore_ascii_case(value))
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load_default();
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }
    crate::logging::init(&config.logging);

    let out = Output { format: cli.format };

    if let Commands::Config { output } = &cli.command {
        let content = generate_default_config();
        match output {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(path, &content)?;
                println!("Config written to {:?}", path);
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    let store = Arc::new(FileSessionStore::new(config.session.data_path()));
    let transport = Arc::new(HttpClient::new(config.api.timeout())?);
    let gateway = ApiGateway::new(&config.api.base_url, transport, store);
    let auth = Arc::new(AuthSession::new(gateway));
    let state = auth.initialize().await;

    match guard::resolve(cli.command.route(), &state) {
        GuardDecision::Render => {}
        GuardDecision::Redirect(Route::Auth) => {
            bail!("Not signed in. Run `narrativeiq login` first.")
        }
        GuardDecision::Redirect(_) => {
            let email = auth.user().map(|u| u.email).unwrap_or_default();
            out.notice(&format!(
                "Already signed in as {}. Run `narrativeiq logout` to switch accounts.",
                email
            ));
            return Ok(());
        }
        GuardDecision::Placeholder | GuardDecision::Nothing => {
            bail!("Session could not be resolved")
        }
    }

    dispatch(cli.command, auth, &out).await
}

async fn dispatch(command: Commands, auth: Arc<AuthSession>, out: &Output) -> anyhow::Result<()> {
    match command {
        Commands::Login { email, password } => {
            let form = controllers::AuthFormController::new(auth);
            form.set_email(email);
            form.set_password(password);
            let (user, _) = form.submit().await?;
            out.notice(form.snapshot().mode.success_notice());
            out.value(&user, |u| format!("{} <{}>: {} credits\n", u.name, u.email, u.credits))?;
        }

        Commands::Register {
            name,
            email,
            password,
        } => {
            let form = controllers::AuthFormController::new(auth);
            form.set_mode(controllers::AuthMode::SignUp);
            form.set_name(name);
            form.set_email(email);
            form.set_password(password);
            let (user, _) = form.submit().await?;
            out.notice(form.snapshot().mode.success_notice());
            out.value(&user, |u| format!("{} <{}>: {} credits\n", u.name, u.email, u.credits))?;
        }

        Commands::Logout => {
            auth.logout();
            out.notice("Signed out");
        }

        Commands::Whoami => {
            let user = auth
                .user()
                .ok_or_else(|| anyhow!("Not signed in"))?;
            out.value(&user, |u| {
                format!(
                    "{} ({}) <{}>\n{}\n",
                    u.name,
                    layout::avatar_initial(u),
                    u.email,
                    layout::credits_badge(Some(u))
                )
            })?;
        }

        Commands::Personas => {
            let ws = WorkspaceController::new(auth);
            if let Err(e) = ws.load_personas().await {
                tracing::warn!("Falling back to built-in personas: {}", e);
            }
            let options = ws.snapshot().persona_options();
            out.value(&options, |opts| {
                opts.iter()
                    .map(|(key, label)| format!("{:<12} {}\n", key, label))
                    .collect()
            })?;
        }

        Commands::Enhance {
            input,
            persona,
            title,
        } => {
            let ws = WorkspaceController::new(auth);
            ws.set_text(input.read()?);
            ws.set_persona(persona);
            if let Some(title) = title {
                ws.set_title(title);
            }
            let res = ws.enhance().await.map_err(explain)?;
            out.notice(&workspace::enhanced_notice(&res));
            out.value(&res, |r| {
                let mut s = format!("{}\n", r.enhanced_text);
                if !r.diff.is_empty() {
                    s.push_str(&format!(
                        "\nDiff ({}% similar):\n{}\n",
                        format_score(r.similarity_score),
                        diff::render_text(&r.diff)
                    ));
                }
                if !r.changes.is_empty() {
                    s.push_str("\nKey changes:\n");
                    for c in &r.changes {
                        s.push_str(&format!("- {} -> {} ({})\n", c.original, c.enhanced, c.reason));
                    }
                }
                s
            })?;
        }

        Commands::Analyze {
            kind,
            input,
            character,
        } => {
            let ws = WorkspaceController::new(auth);
            ws.set_text(input.read()?);
            if let Some(name) = character {
                ws.set_character_name(name);
            }
            let kind = AnalysisKind::from(kind);
            ws.analyze(kind).await.map_err(explain)?;
            out.notice(workspace::ANALYSIS_COMPLETE);

            let state = ws.snapshot();
            let views: Vec<AnalysisView> = match kind {
                AnalysisKind::Consistency => {
                    state.consistency.map(AnalysisView::Consistency).into_iter().collect()
                }
                AnalysisKind::Structure => {
                    state.structure.map(AnalysisView::Structure).into_iter().collect()
                }
                AnalysisKind::Character => {
                    state.character.map(AnalysisView::Character).into_iter().collect()
                }
                AnalysisKind::DeepScan => state
                    .consistency
                    .map(AnalysisView::Consistency)
                    .into_iter()
                    .chain(state.structure.map(AnalysisView::Structure))
                    .collect(),
            };

            match out.format {
                OutputFormat::Json => {
                    let json = views
                        .iter()
                        .map(|v| match v {
                            AnalysisView::Consistency(c) => serde_json::to_value(c),
                            AnalysisView::Structure(s) => serde_json::to_value(s),
                            AnalysisView::Character(c) => serde_json::to_value(c),
                        })
                        .collect::<Result<Vec<_>, _>>()?;
                    println!("{}", serde_json::to_string_pretty(&json)?);
                }
                OutputFormat::Text => {
                    if let Some(score) = state.combined_score {
                        println!("Combined score: {}\n", format_score(score));
                    }
                    for view in &views {
                        println!("{}", view.render_text());
                    }
                }
            }
        }

        Commands::Mindmap {
            input,
            title,
            output,
            data,
        } => {
            let mm = MindmapController::new(auth);
            mm.set_text(input.read()?);
            if let Some(title) = title {
                mm.set_title(title);
            }

            if data {
                let graph = mm.generate_graph().await.map_err(explain)?;
                out.value(&graph, |g| {
                    let mut s = format!(
                        "{} characters, {} locations, {} themes, {} relationships\n",
                        g.summary.character_count,
                        g.summary.location_count,
                        g.summary.theme_count,
                        g.summary.relationship_count
                    );
                    for r in &g.relationships {
                        s.push_str(&format!("{} -[{}]-> {}\n", r.from, r.kind, r.to));
                    }
                    s
                })?;
            } else {
                let bytes = mm.generate_image().await.map_err(explain)?;
                let path = output.unwrap_or_else(|| PathBuf::from(mm.snapshot().download_name()));
                std::fs::write(&path, &bytes)
                    .with_context(|| format!("Failed to write {:?}", path))?;
                out.notice(controllers::mindmap::GENERATED_NOTICE);
                out.notice(&format!("Saved to {}", path.display()));
            }
        }

        Commands::Story {
            input,
            genre,
            style,
            length,
            title,
        } => {
            let story = StoryController::new(auth);
            story.set_text(input.read()?);
            story.set_genre(&genre)?;
            story.set_style(&style)?;
            story.set_length(&length)?;
            if let Some(title) = title {
                story.set_title(title);
            }
            let res = story.complete().await.map_err(explain)?;
            out.notice(controllers::story::COMPLETED_NOTICE);
            out.value(&res, |r| {
                let mut s = String::new();
                if !r.title.is_empty() {
                    s.push_str(&format!("# {}\n\n", r.title));
                }
                s.push_str(&format!("{}\n", r.completed_story));
                if let Some(structure) = &r.story_structure {
                    s.push('\n');
                    for (act, summary) in structure.acts() {
                        s.push_str(&format!("{:<11} {}\n", act, summary));
                    }
                }
                s
            })?;
        }

        Commands::Documents { action } => match action {
            DocumentsCommand::List => {
                let docs = DocumentsController::new(auth);
                let list = docs
                    .load()
                    .await
                    .map_err(|e| anyhow!("{}: {}", controllers::documents::LIST_FAILED, e))?;
                out.value(&list, |list| {
                    if list.is_empty() {
                        return "No documents yet. Enhance some text to get started.\n".to_string();
                    }
                    list.iter()
                        .map(|d| {
                            let date = text::format_date(&d.created_at);
                            format!("{:<26} {:<12} {}\n", d.id, date, d.title)
                        })
                        .collect()
                })?;
            }
            DocumentsCommand::Show { id } => {
                let docs = DocumentsController::new(auth);
                let doc = docs
                    .open(&id)
                    .await
                    .map_err(|e| anyhow!("{}: {}", controllers::documents::OPEN_FAILED, e))?;
                out.value(&doc, |d| {
                    format!(
                        "{}\n{}\n\n{}\n",
                        d.title,
                        text::format_date(&d.created_at),
                        d.content.as_deref().unwrap_or_default()
                    )
                })?;
            }
            DocumentsCommand::Save { input, title } => {
                let ws = WorkspaceController::new(auth);
                ws.set_text(input.read()?);
                if let Some(title) = title {
                    ws.set_title(title);
                }
                let doc_id = ws.save().await?;
                out.notice(workspace::SAVED_NOTICE);
                out.value(&serde_json::json!({ "doc_id": doc_id }), |_| format!("{}\n", doc_id))?;
            }
        },

        Commands::History { limit } => {
            let hist = HistoryController::new(auth);
            let mut entries = hist
                .load()
                .await
                .map_err(|e| anyhow!("{}: {}", history::LOAD_FAILED, e))?;
            if let Some(limit) = limit {
                entries.truncate(limit);
            }
            out.value(&entries, |entries| {
                if entries.is_empty() {
                    return "No activity yet.\n".to_string();
                }
                entries
                    .iter()
                    .map(|e| {
                        let mut line = format!(
                            "{:<16} {:<22} {} credits",
                            text::format_datetime(&e.created_at),
                            history::operation_label(&e.operation),
                            e.credits_used
                        );
                        if let Some(persona) = &e.persona {
                            line.push_str(&format!(" ({})", persona));
                        }
                        format!("{}\n  {}\n", line, history::input_excerpt(e).replace('\n', " "))
                    })
                    .collect()
            })?;
        }

        Commands::Credits { action } => {
            let credits = CreditsController::new(auth);
            match action {
                CreditsCommand::Balance => {
                    let balance = credits.balance().await?;
                    out.value(&serde_json::json!({ "credits": balance }), |_| {
                        format!("{} credits\n", balance)
                    })?;
                    if balance == 0 {
                        out.notice(
                            "You're out of credits! Buy a pack with `narrativeiq credits buy starter`",
                        );
                    }
                }
                CreditsCommand::Pricing => {
                    let pricing = credits.pricing().await?;
                    out.value(&pricing, |table| {
                        let mut s = String::from("Operation costs:\n");
                        for (key, feature) in table {
                            let label = if feature.label.is_empty() {
                                key.as_str()
                            } else {
                                feature.label.as_str()
                            };
                            s.push_str(&format!("  {:<24} {}\n", label, feature.cost));
                        }
                        s.push_str("\nPacks:\n");
                        for (i, pack) in CREDIT_PACKS.iter().enumerate() {
                            let mark = if pack.highlight { "*" } else { " " };
                            s.push_str(&format!(
                                "{} {}. {:<8} {:>4} credits  {:<7} {}\n",
                                mark,
                                i + 1,
                                pack.label,
                                pack.amount,
                                pack.price,
                                pack.description
                            ));
                        }
                        s
                    })?;
                }
                CreditsCommand::Buy { pack } => {
                    let index = parse_pack(&pack).ok_or_else(|| {
                        anyhow!("Unknown pack '{}'. Choose starter, writer or author", pack)
                    })?;
                    let res = credits
                        .buy(index)
                        .await
                        .map_err(|e| anyhow!("{}: {}", controllers::credits::BUY_FAILED, e))?;
                    out.notice(&purchase_notice(&CREDIT_PACKS[index], &res));
                    if out.format == OutputFormat::Json {
                        let balance = serde_json::json!({ "new_balance": res.new_balance });
                        out.value(&balance, |_| String::new())?;
                    }
                }
            }
        }

        Commands::Profile { action } => {
            let profile = ProfileController::new(auth);
            match action {
                ProfileCommand::Update { name, email } => {
                    if name.is_none() && email.is_none() {
                        bail!("Nothing to update: pass --name and/or --email");
                    }
                    if let Some(name) = name {
                        profile.set_name(name);
                    }
                    if let Some(email) = email {
                        profile.set_email(email);
                    }
                    let user = profile.save_profile().await?;
                    out.notice(controllers::profile::PROFILE_UPDATED);
                    out.value(&user, |u| format!("{} <{}>\n", u.name, u.email))?;
                }
                ProfileCommand::Password { current, new } => {
                    profile.set_passwords(current, new);
                    profile.change_password().await?;
                    out.notice(controllers::profile::PASSWORD_CHANGED);
                }
            }
        }

        Commands::Upload { file } => {
            let ws = WorkspaceController::new(auth);
            let res = ws
                .upload(read_upload(&file)?)
                .await
                .map_err(|e| anyhow!("{}: {}", controllers::UPLOAD_FAILED, e))?;
            out.notice(&controllers::extracted_notice(&res));
            out.value(&res, |r| format!("{}\n", r.text))?;
        }

        // Written out before the session is resolved
        Commands::Config { .. } => {}
    }

    Ok(())
}
