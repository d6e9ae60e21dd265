use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use forum_client::config::{ClientConfig, ConfigError};
use forum_client::guard::{Navigation, Navigator};
use forum_client::notice::{Notice, NoticeMessages, Notifier};
use forum_client::posts::{PostDetail, PostPage, PostsApi, PostsError};
use forum_client::session::{Credentials, SessionState, SessionStore};
use forum_client::transport::{HttpTransport, TransportError};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("transport setup failed: {0}")]
    Transport(#[from] TransportError),
    #[error("{0}")]
    Posts(#[from] PostsError),
    #[error("stdin read failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("{action} failed")]
    AuthFailed { action: &'static str },
}

#[derive(Parser, Debug)]
#[command(name = "forum", about = "Forum client: posts, threads and account session")]
struct Cli {
    /// Backend origin; overrides `FORUM_BASE_URL`.
    #[arg(long)]
    base_url: Option<String>,

    /// Use the Chinese notice texts of the web client.
    #[arg(long, default_value_t = false)]
    zh: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ask the backend whether this client holds a session.
    Status,
    /// List posts.
    Posts {
        #[arg(long)]
        timestamp: Option<String>,
    },
    /// Show one thread.
    Post {
        post_id: String,
        #[arg(long)]
        timestamp: Option<String>,
    },
    /// Log in once. The session cookie is discarded when the process exits;
    /// use `shell` to keep it.
    Login(AuthArgs),
    /// Register and sign in once. The session cookie is discarded when the
    /// process exits; use `shell` to keep it.
    Register(AuthArgs),
    /// Ask the backend to end its session. A one-shot process holds no
    /// cookie, so this only ends sessions the backend tracks without one.
    Logout,
    /// Interactive session; keeps cookies between commands.
    Shell,
}

#[derive(Args, Debug)]
struct AuthArgs {
    #[arg(long, env = "FORUM_EMAIL")]
    email: String,
    #[arg(long, env = "FORUM_PASSWORD", hide_env_values = true)]
    password: String,
}

/// Prints notices to stderr as they happen.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        eprintln!("{notice}");
    }
}

struct Client {
    session: SessionStore<Arc<HttpTransport>>,
    posts: PostsApi<Arc<HttpTransport>>,
    navigator: Navigator,
}

impl Client {
    fn new(config: &ClientConfig, messages: NoticeMessages) -> Result<Self, CliError> {
        let transport = Arc::new(HttpTransport::new(config)?);
        let session = SessionStore::new(Arc::clone(&transport), Arc::new(ConsoleNotifier)).with_messages(messages);
        Ok(Self { session, posts: PostsApi::new(transport), navigator: Navigator::default() })
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = cli.base_url.as_deref() {
        config = config.with_base_url(url)?;
    }
    let messages = if cli.zh { NoticeMessages::zh() } else { NoticeMessages::default() };
    let mut client = Client::new(&config, messages)?;
    tracing::debug!(base_url = %config.base_url, "client configured");

    match cli.command {
        Command::Status => {
            print_session(&client.session.check_status().await);
            Ok(())
        }
        Command::Posts { timestamp } => {
            print_page(&client.posts.list(timestamp.as_deref()).await?);
            Ok(())
        }
        Command::Post { post_id, timestamp } => {
            print_detail(&client.posts.detail(&post_id, timestamp.as_deref()).await?);
            Ok(())
        }
        Command::Login(args) => {
            let credentials = Credentials::new(args.email, args.password);
            if client.session.login(&credentials).await {
                Ok(())
            } else {
                Err(CliError::AuthFailed { action: "login" })
            }
        }
        Command::Register(args) => {
            let credentials = Credentials::new(args.email, args.password);
            if client.session.register(&credentials).await {
                Ok(())
            } else {
                Err(CliError::AuthFailed { action: "register" })
            }
        }
        Command::Logout => {
            if client.session.logout().await {
                Ok(())
            } else {
                Err(CliError::AuthFailed { action: "logout" })
            }
        }
        Command::Shell => run_shell(&mut client).await,
    }
}

// =============================================================================
// SHELL
// =============================================================================

const SHELL_HELP: &str = "\
commands:
  status                      resynchronize with the backend
  whoami                      show local session state
  login <email> <password>
  register <email> <password>
  logout
  posts [timestamp]
  post <id> [timestamp]
  open <path>                 navigate through the route guard
  help
  quit";

async fn run_shell(client: &mut Client) -> Result<(), CliError> {
    // Bootstrap: derive the session from the backend before the first prompt.
    print_session(&client.session.check_status().await);
    println!("type `help` for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => {}
            ["quit" | "exit"] => break,
            ["help"] => println!("{SHELL_HELP}"),
            ["status"] => print_session(&client.session.check_status().await),
            ["whoami"] => print_session(&client.session.snapshot()),
            ["login", email, password] => {
                client.session.login(&Credentials::new(*email, *password)).await;
            }
            ["register", email, password] => {
                client.session.register(&Credentials::new(*email, *password)).await;
            }
            ["logout"] => {
                client.session.logout().await;
            }
            ["posts"] => report(client.posts.list(None).await.map(|p| print_page(&p))),
            ["posts", ts] => report(client.posts.list(Some(*ts)).await.map(|p| print_page(&p))),
            ["post", id] => report(client.posts.detail(id, None).await.map(|d| print_detail(&d))),
            ["post", id, ts] => report(client.posts.detail(id, Some(*ts)).await.map(|d| print_detail(&d))),
            ["open", path] => {
                let session = client.session.snapshot();
                match client.navigator.navigate(path, &session) {
                    Navigation::Allow => println!("at {}", client.navigator.location()),
                    Navigation::Redirect(to) => println!("login required; redirected to {to}"),
                }
            }
            _ => println!("unrecognized command; type `help`"),
        }
    }
    Ok(())
}

fn report(result: Result<(), PostsError>) {
    if let Err(e) = result {
        eprintln!("[error] {e}");
    }
}

// =============================================================================
// OUTPUT
// =============================================================================

fn print_session(state: &SessionState) {
    if state.is_authenticated() {
        println!("logged in as {}", state.identity());
    } else {
        println!("not logged in");
    }
}

fn print_page(page: &PostPage) {
    for post in &page.posts {
        let author = post.author.as_deref().unwrap_or("?");
        let when = post.create_time.formatted.as_deref().unwrap_or("");
        match (&post.replies_count, &post.last_reply) {
            (Some(count), Some(last)) => println!(
                "{:>8}  {}  [{author} {when}; {count} replies, last by {}]",
                post.post_id, post.title, last.author
            ),
            _ => println!("{:>8}  {}  [{author} {when}]", post.post_id, post.title),
        }
    }
    if let Some(next) = page.next_cursor() {
        println!("next page: --timestamp {next}");
    }
}

fn print_detail(detail: &PostDetail) {
    println!("thread {}", detail.id);
    for reply in &detail.posts {
        let when = reply.time.formatted.as_deref().unwrap_or("");
        println!("--- #{} {} {when}", reply.id, reply.author.name);
        if let Some(quote) = &reply.quote {
            println!("> {quote}");
        }
        println!("{}", reply.content);
    }
    if let Some(prev) = detail.pagination.prev_timestamp.as_deref() {
        println!("previous page: --timestamp {prev}");
    }
    if let Some(next) = detail.pagination.next_timestamp.as_deref() {
        println!("next page: --timestamp {next}");
    }
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
