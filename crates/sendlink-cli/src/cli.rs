use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use sendlink_core::VERSION;

/// Sendlink - share ephemeral, end-to-end encrypted secrets
#[derive(Parser)]
#[command(name = "sendlink")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Server base URL
    #[arg(short, long, global = true, env = "SENDLINK_SERVER")]
    pub server: Option<String>,

    /// API access token for owner operations
    #[arg(long, global = true, env = "SENDLINK_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Arguments for the `create` command
#[derive(Args)]
pub struct CreateArgs {
    /// Send body as JSON (inline, or base64-encoded with --base64)
    #[arg(value_name = "BODY")]
    pub body: String,

    /// Treat BODY as base64-encoded JSON
    #[arg(long)]
    pub base64: bool,

    /// Gate access behind an emailed one-time code (repeatable)
    #[arg(long = "email", value_name = "ADDRESS")]
    pub emails: Vec<String>,

    /// Gate access behind a password
    #[arg(long, value_name = "VALUE")]
    pub password: Option<String>,

    /// Output the created Send as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `edit` command
#[derive(Args)]
pub struct EditArgs {
    /// Id of the Send to edit
    #[arg(value_name = "ID")]
    pub id: String,

    /// Replacement body as JSON (inline, or base64-encoded with --base64)
    #[arg(value_name = "BODY")]
    pub body: String,

    /// Treat BODY as base64-encoded JSON
    #[arg(long)]
    pub base64: bool,

    /// Gate access behind an emailed one-time code (repeatable)
    #[arg(long = "email", value_name = "ADDRESS")]
    pub emails: Vec<String>,

    /// Gate access behind a password
    #[arg(long, value_name = "VALUE")]
    pub password: Option<String>,

    /// Output the edited Send as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `get` command
#[derive(Args)]
pub struct GetArgs {
    /// Send id
    #[arg(value_name = "ID")]
    pub id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `list` command
#[derive(Args)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `receive` command
#[derive(Args)]
pub struct ReceiveArgs {
    /// Share link (full URL or <accessId>/<key>)
    #[arg(value_name = "LINK")]
    pub link: String,

    /// Password for a password-gated Send (prompted if omitted)
    #[arg(long, value_name = "VALUE")]
    pub password: Option<String>,

    /// One-time code for an email-gated Send
    #[arg(long, value_name = "CODE")]
    pub otp: Option<String>,

    /// Write a file Send's content to this path
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<String>,
}

/// Arguments for the `delete` command
#[derive(Args)]
pub struct DeleteArgs {
    /// Send id
    #[arg(value_name = "ID")]
    pub id: String,
}

/// Arguments for the `remove-password` command
#[derive(Args)]
pub struct RemovePasswordArgs {
    /// Send id
    #[arg(value_name = "ID")]
    pub id: String,

    /// Output the updated Send as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new Send and print its share link
    Create(CreateArgs),

    /// Edit an existing Send (re-encrypts content, keeps the link valid)
    Edit(EditArgs),

    /// Show one of your Sends
    Get(GetArgs),

    /// List your Sends
    List(ListArgs),

    /// Open a share link as an anonymous recipient
    Receive(ReceiveArgs),

    /// Delete a Send
    Delete(DeleteArgs),

    /// Remove the password gate from a Send
    #[command(name = "remove-password")]
    RemovePassword(RemovePasswordArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}
