use std::error::Error;

use chrono::Local;
use chrono::NaiveDate;
use chrono::Utc;
use clap::Parser;
use listshare_auth::AuthExecutor;
use listshare_auth::LoginDriver;
use listshare_auth::LoginRequest;
use listshare_auth::RegistrationRequest;
use listshare_auth::SimulatedAuthExecutor;
use listshare_core::config::Config;
use listshare_core::parse_due_date;
use listshare_core::persistence::export_snapshot;
use listshare_core::persistence::ExportFormat;
use listshare_core::persistence::JsonFileStorage;
use listshare_core::share::EmailInvite;
use listshare_core::share::ShareRequest;
use listshare_core::validation::validate_list_form;
use listshare_core::validation::validate_profile_form;
use listshare_core::validation::validate_todo_title;
use listshare_core::views::list_progress;
use listshare_core::views::ListQuery;
use listshare_core::views::TodoQuery;
use listshare_core::App;
use listshare_core::Credentials;
use listshare_core::ListId;
use listshare_core::ListPatch;
use listshare_core::NewList;
use listshare_core::NewTodo;
use listshare_core::NotificationKind;
use listshare_core::ProfilePatch;
use listshare_core::TodoId;
use listshare_core::TodoPatch;
use tracing::debug;
use tracing::info;
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod cli;
mod settings;

use cli::Cli;
use cli::Command;
use cli::ListCommand;
use cli::ListsArgs;
use cli::ShareCommand;
use cli::TodoCommand;

type CliResult = Result<(), Box<dyn Error>>;

struct Context {
    app: App<JsonFileStorage>,
    config: Config,
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> CliResult {
    let config_path = settings::config_path(cli.config);
    let config = settings::load_config(&config_path)?;
    let store_path = settings::store_path(cli.store, &config);

    let storage = JsonFileStorage::open(&store_path)?;
    let app = App::open(storage, Utc::now())?;
    info!(
        config = %config_path.display(),
        store = %app.port().path().display(),
        "starting"
    );
    let mut ctx = Context { app, config };

    let result = match cli.command {
        Command::Login { username, password } => cmd_login(&mut ctx, username, password),
        Command::Register {
            name,
            username,
            email,
            password,
            confirm,
        } => cmd_register(
            &mut ctx,
            RegistrationRequest {
                full_name: name,
                username,
                email,
                password,
                confirm_password: confirm,
            },
        ),
        Command::Logout => cmd_logout(&mut ctx),
        Command::Whoami => cmd_whoami(&ctx),
        Command::Profile {
            name,
            email,
            username,
        } => cmd_profile(
            &mut ctx,
            ProfilePatch {
                username,
                email,
                full_name: name,
            },
        ),
        Command::Lists(args) => cmd_lists(&ctx, args),
        Command::List { command } => cmd_list(&mut ctx, command),
        Command::Todo { command } => cmd_todo(&mut ctx, command),
        Command::Share { command } => cmd_share(&ctx, command),
        Command::Stats => cmd_stats(&ctx),
        Command::Export { format } => cmd_export(&ctx, format),
    };
    print_notifications(&mut ctx.app);
    result
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn require_session(ctx: &Context) -> CliResult {
    if ctx.app.user().is_none() {
        return Err("not signed in; run `listshare login USERNAME --password PASSWORD`".into());
    }
    Ok(())
}

fn print_notifications(app: &mut App<JsonFileStorage>) {
    for note in app.drain_notifications() {
        // Failures already surface as the command's error.
        match note.kind {
            NotificationKind::Success => println!("{}", note.message),
            NotificationKind::Error => {
                debug!(kind = note.kind.label(), message = %note.message, "notification")
            }
        }
    }
}

fn sign_in(ctx: &mut Context, credentials: Credentials) -> CliResult {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let ticket = ctx.app.begin_login(Utc::now())?;
    let mut driver = LoginDriver::new(ctx.config.session.login_delay());
    debug!(ticket = %ticket, delay = ?driver.delay(), "waiting for login");
    println!("Signing in...");
    let completion = runtime.block_on(async {
        driver.begin(ticket, credentials);
        driver.wait().await
    })?;
    let Some(completion) = completion else {
        return Err("login attempt did not complete".into());
    };
    let applied = ctx
        .app
        .complete_login(completion.ticket, completion.credentials, Utc::now())?;
    if !applied {
        return Err("login attempt was superseded".into());
    }
    Ok(())
}

fn cmd_login(ctx: &mut Context, username: String, password: String) -> CliResult {
    let request = LoginRequest { username, password };
    let credentials = SimulatedAuthExecutor.login(&request)?;
    sign_in(ctx, credentials)
}

fn cmd_register(ctx: &mut Context, request: RegistrationRequest) -> CliResult {
    let credentials = SimulatedAuthExecutor.register(&request)?;
    sign_in(ctx, credentials)
}

fn cmd_logout(ctx: &mut Context) -> CliResult {
    require_session(ctx)?;
    ctx.app.logout(Utc::now())?;
    Ok(())
}

fn cmd_whoami(ctx: &Context) -> CliResult {
    match ctx.app.user() {
        Some(user) => {
            println!("{} ({})", user.full_name, user.username);
            println!("email: {}", user.email);
            println!(
                "signed in: {}",
                user.login_time.with_timezone(&Local).format("%Y-%m-%d %H:%M")
            );
        }
        None => println!("not signed in"),
    }
    Ok(())
}

fn cmd_profile(ctx: &mut Context, patch: ProfilePatch) -> CliResult {
    require_session(ctx)?;
    if patch == ProfilePatch::default() {
        return cmd_whoami(ctx);
    }
    let Some(user) = ctx.app.user() else {
        return Ok(());
    };
    let full_name = patch.full_name.as_deref().unwrap_or(&user.full_name);
    let email = patch.email.as_deref().unwrap_or(&user.email);
    validate_profile_form(full_name, email)?;
    ctx.app.update_profile(patch, Utc::now())?;
    Ok(())
}

fn cmd_lists(ctx: &Context, args: ListsArgs) -> CliResult {
    require_session(ctx)?;
    let query = ListQuery {
        search_term: args.search,
        filter: args.filter,
        sort: args.sort.unwrap_or_else(|| ctx.config.list_sort()),
    };
    let lists = ctx.app.lists_view(&query);
    if lists.is_empty() {
        println!("no lists");
        return Ok(());
    }
    println!(
        "{} lists ({}, by {})",
        lists.len(),
        query.filter.label(),
        query.sort.label()
    );
    for list in lists {
        let progress = list_progress(list, ctx.app.todos());
        println!(
            "{:>14}  {:<24}  {:<7}  {}/{} done ({}%)",
            list.id,
            list.title,
            if list.is_shared() { "shared" } else { "private" },
            progress.completed,
            progress.total,
            progress.percent()
        );
    }
    Ok(())
}

fn cmd_list(ctx: &mut Context, command: ListCommand) -> CliResult {
    require_session(ctx)?;
    let now = Utc::now();
    match command {
        ListCommand::Add { title, description } => {
            validate_list_form(&title)?;
            let new = NewList {
                description,
                ..NewList::new(title)
            };
            let id = ctx.app.add_list(new, now)?;
            println!("id: {id}");
            Ok(())
        }
        ListCommand::Update {
            id,
            title,
            description,
            shared,
        } => {
            let patch = ListPatch {
                title,
                description,
                shared,
            };
            if patch.is_empty() {
                return Err("nothing to update".into());
            }
            ctx.app.update_list(ListId(id), patch, now)?;
            Ok(())
        }
        ListCommand::Delete { id } => {
            ctx.app.delete_list(ListId(id), now)?;
            Ok(())
        }
        ListCommand::Show {
            id,
            search,
            filter,
            sort,
        } => {
            let id = ListId(id);
            let Some(list) = ctx.app.lists().iter().find(|list| list.id == id) else {
                return Err(format!("list {id} not found").into());
            };
            println!("{}", list.title);
            if !list.description.is_empty() {
                println!("{}", list.description);
            }
            let query = TodoQuery {
                search_term: search,
                filter,
                sort: sort.unwrap_or_else(|| ctx.config.todo_sort()),
                selected_list: Some(id),
                ..TodoQuery::new(today())
            };
            print_todos(ctx, &query);
            Ok(())
        }
    }
}

fn print_todos(ctx: &Context, query: &TodoQuery) {
    let todos = ctx.app.todos_view(query);
    if todos.is_empty() {
        println!("  no tasks");
        return;
    }
    println!("  ({}, by {})", query.filter.label(), query.sort.label());
    for todo in todos {
        let due = todo
            .due_date
            .map(|date| date.to_string())
            .unwrap_or_else(|| "-".to_string());
        let overdue = if todo.is_overdue(query.today) { " (overdue)" } else { "" };
        println!(
            "  [{}] {:>14}  {:<28}  {:<6}  due {}{}  @{}",
            if todo.completed { "x" } else { " " },
            todo.id,
            todo.title,
            todo.priority.label(),
            due,
            overdue,
            todo.assignee
        );
    }
}

/// Empty text means no due date.
fn parse_due(text: &str) -> Result<Option<NaiveDate>, String> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    parse_due_date(text.trim())
        .map(Some)
        .map_err(|err| format!("invalid due date '{text}': {err}"))
}

fn cmd_todo(ctx: &mut Context, command: TodoCommand) -> CliResult {
    require_session(ctx)?;
    let now = Utc::now();
    match command {
        TodoCommand::Add {
            list_id,
            title,
            description,
            due,
            priority,
            assignee,
        } => {
            let list_id = ListId(list_id);
            validate_todo_title(&title)?;
            let new = NewTodo {
                description,
                due_date: due.as_deref().map(parse_due).transpose()?.flatten(),
                priority,
                assignee,
                ..NewTodo::new(list_id, title)
            };
            match ctx.app.add_todo(new, now)? {
                Some(id) => println!("id: {id}"),
                None => return Err(format!("list {list_id} not found").into()),
            }
            Ok(())
        }
        TodoCommand::Toggle { id } => {
            ctx.app.toggle_todo(TodoId(id), now)?;
            Ok(())
        }
        TodoCommand::Update {
            id,
            title,
            description,
            due,
            priority,
            assignee,
            completed,
        } => {
            if let Some(title) = &title {
                validate_todo_title(title)?;
            }
            let patch = TodoPatch {
                title,
                description,
                completed,
                due_date: due.as_deref().map(parse_due).transpose()?,
                priority,
                assignee,
            };
            if patch.is_empty() {
                return Err("nothing to update".into());
            }
            ctx.app.update_todo(TodoId(id), patch, now)?;
            Ok(())
        }
        TodoCommand::Delete { id } => {
            ctx.app.delete_todo(TodoId(id), now)?;
            Ok(())
        }
    }
}

fn cmd_share(ctx: &Context, command: ShareCommand) -> CliResult {
    require_session(ctx)?;
    let list_id = match &command {
        ShareCommand::Link { list_id, .. } | ShareCommand::Email { list_id, .. } => {
            ListId(*list_id)
        }
    };
    let Some(list) = ctx.app.lists().iter().find(|list| list.id == list_id) else {
        return Err(format!("list {list_id} not found").into());
    };

    match command {
        ShareCommand::Link {
            permission, copy, ..
        } => {
            let request = ShareRequest::link(&ctx.config.share.origin, list, permission, Utc::now());
            info!(list_id = %request.list_id(), "share link created");
            if let ShareRequest::Link { share_link, .. } = &request {
                println!("{share_link}");
                println!("permission: {}", permission.label());
                if copy {
                    copy_to_clipboard(share_link);
                }
            }
            Ok(())
        }
        ShareCommand::Email {
            to,
            message,
            permission,
            ..
        } => {
            let invite = EmailInvite::parse(list, &to, message.as_deref(), permission)?;
            let request = ShareRequest::Email(invite);
            info!(list_id = %request.list_id(), "email invite prepared");
            println!("{}", serde_json::to_string_pretty(&request)?);
            println!("List shared successfully!");
            Ok(())
        }
    }
}

fn copy_to_clipboard(text: &str) {
    match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text)) {
        Ok(()) => println!("Link copied to clipboard!"),
        Err(err) => warn!(error = %err, "clipboard unavailable"),
    }
}

fn cmd_stats(ctx: &Context) -> CliResult {
    require_session(ctx)?;
    let stats = ctx.app.stats(today());
    println!("lists:     {}", stats.lists);
    println!("tasks:     {}", stats.total);
    println!("completed: {}", stats.completed);
    println!("due today: {}", stats.due_today);
    Ok(())
}

fn cmd_export(ctx: &Context, format: ExportFormat) -> CliResult {
    print!("{}", export_snapshot(&ctx.app.snapshot(), format)?);
    if format == ExportFormat::Json {
        println!();
    }
    Ok(())
}
