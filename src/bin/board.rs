use activity_board::{
    config::{resolve_api_url, BoardConfig},
    ActionOutcome, ActivityBoard, HttpActivityApi, LoadOutcome,
};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(about = "Browse and manage extracurricular activity signups")]
struct Cli {
    /// Base URL of the activities API (defaults to $BOARD_API_URL).
    #[arg(long)]
    url: Option<String>,
    /// Print the board as an HTML page instead of plain text.
    #[arg(long)]
    html: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show every activity and its participants.
    List,
    /// Sign a student up for an activity.
    Signup { activity: String, email: String },
    /// Remove a student from an activity.
    Remove {
        activity: String,
        email: String,
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },
}

fn prompt_on_stdin(prompt: &str) -> bool {
    print!("{prompt} [y/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse()?))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let url = cli.url.unwrap_or_else(resolve_api_url);
    let api = HttpActivityApi::new(&url)?;
    let board = ActivityBoard::new(Arc::new(api), BoardConfig::default());

    if board.load_catalog().await == LoadOutcome::Failed {
        eprintln!("{}", board.render_text().await);
        std::process::exit(1);
    }

    let outcome = match cli.command {
        Command::List => None,
        Command::Signup { activity, email } => {
            board.set_email(email).await;
            if !board.select_activity(&activity).await {
                return Err(format!("unknown activity: {activity}").into());
            }
            Some(board.submit_signup().await)
        }
        Command::Remove {
            activity,
            email,
            yes,
        } => {
            let target = activity_board::view::RowTarget::new(activity, email);
            let outcome = if yes {
                board.click(&target, &|_: &str| true).await
            } else {
                board.click(&target, &prompt_on_stdin).await
            };
            if outcome == ActionOutcome::Ignored {
                return Err(format!("{} is not listed under {}", target.email, target.activity).into());
            }
            Some(outcome)
        }
    };

    let rendered = if cli.html {
        board.render_html().await?
    } else {
        board.render_text().await
    };
    println!("{rendered}");

    if outcome == Some(ActionOutcome::Failed) {
        std::process::exit(1);
    }
    Ok(())
}
