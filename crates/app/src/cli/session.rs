use clap::{Args, Subcommand};
use larder_app::{
    context::AppContext,
    session::{self, FileSessionStore, SessionError, SessionStore},
};

#[derive(Debug, Args)]
pub(crate) struct SessionCommand {
    #[command(subcommand)]
    command: SessionSubcommand,
}

#[derive(Debug, Subcommand)]
enum SessionSubcommand {
    /// Sign in and remember the session
    Login(LoginArgs),
    /// Forget the stored session
    Logout,
    /// Show who is signed in
    Show,
}

#[derive(Debug, Args)]
struct LoginArgs {
    /// Account email
    #[arg(long)]
    email: String,

    /// Account password
    #[arg(long, env = "LARDER_PASSWORD", hide_env_values = true)]
    password: String,
}

pub(crate) async fn run(
    command: SessionCommand,
    ctx: &AppContext,
    store: &FileSessionStore,
) -> Result<(), String> {
    match command.command {
        SessionSubcommand::Login(args) => {
            let session = session::login(ctx.accounts.as_ref(), store, &args.email, &args.password)
                .await
                .map_err(|error| match error {
                    SessionError::Login(error) => {
                        format!("sign in failed: {}", error.detail_or("check your email and password"))
                    }
                    error => format!("sign in failed: {error}"),
                })?;

            println!("signed in as {}", <&str>::from(session.role()));
            println!("session saved to {}", store.path().display());

            Ok(())
        }
        SessionSubcommand::Logout => {
            session::logout(store).map_err(|error| format!("sign out failed: {error}"))?;

            println!("signed out");

            Ok(())
        }
        SessionSubcommand::Show => {
            let Some(session) = store
                .load()
                .map_err(|error| format!("failed to read session: {error}"))?
            else {
                println!("not signed in");
                return Ok(());
            };

            println!("role: {}", <&str>::from(session.role()));
            println!(
                "user_id: {}",
                session
                    .user_id()
                    .map_or_else(|| "unknown".to_string(), |id| id.to_string())
            );

            if let Some(branch) = session.branch_id() {
                println!("branch_id: {branch}");
            }

            Ok(())
        }
    }
}
