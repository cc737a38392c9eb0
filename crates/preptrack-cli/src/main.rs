//! preptrack CLI: take exams and manage a preptrack account from the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "preptrack", version, about = "Exam preparation in the terminal")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take an exam question by question
    Take {
        /// Exam to take
        #[arg(long)]
        exam_id: String,

        /// Mark this run as the placement attempt
        #[arg(long)]
        init: bool,
    },

    /// Log in and cache the session locally
    Login {
        #[arg(long)]
        email: String,

        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Create an account and log in
    Signup {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// End the session and forget the cached profile
    Logout,

    /// Show the profile, or update it when a field is given
    Profile {
        /// New display name
        #[arg(long)]
        name: Option<String>,

        /// New target exam
        #[arg(long)]
        target_exam: Option<String>,
    },

    /// List study guides for an exam, or show one guide
    StudyGuide {
        /// Exam whose guides to list
        #[arg(long, required_unless_present = "id")]
        exam_id: Option<String>,

        /// Guide to show
        #[arg(long, conflicts_with = "exam_id")]
        id: Option<String>,
    },

    /// Show the test path for an exam
    TestPath {
        /// Defaults to the target exam on the cached profile
        #[arg(long)]
        exam_id: Option<String>,
    },

    /// Show a past evaluation
    Result {
        /// Evaluation id
        #[arg(long)]
        id: String,

        /// Print the raw JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Create a starter preptrack.toml
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("preptrack_cli=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Take { exam_id, init } => commands::take::execute(exam_id, init, config).await,
        Commands::Login { email, password } => {
            commands::auth::login(email, password, config).await
        }
        Commands::Signup {
            name,
            email,
            password,
        } => commands::auth::signup(name, email, password, config).await,
        Commands::Logout => commands::auth::logout(config).await,
        Commands::Profile { name, target_exam } => {
            commands::profile::execute(name, target_exam, config).await
        }
        Commands::StudyGuide { exam_id, id } => {
            commands::study_guide::execute(exam_id, id, config).await
        }
        Commands::TestPath { exam_id } => commands::test_path::execute(exam_id, config).await,
        Commands::Result { id, json } => commands::result::execute(id, json, config).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
