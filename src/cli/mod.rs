//! CLI module for caseflow
//!
//! Provides the command-line interface using clap.

pub mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;

use crate::schemas::{DocStatus, Priority, UserRole};
use crate::workflow::BoardSet;

/// caseflow - Case, document and task workflow for a small legal practice
#[derive(Parser, Debug)]
#[command(name = "caseflow")]
#[command(version)]
#[command(about = "Case, document and task workflow for a small legal practice")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// User id of the staff member acting
    #[arg(long, global = true)]
    pub actor: Option<String>,

    /// Override the working directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a caseflow workspace in the current directory
    Init {
        /// Reinitialize even if .caseflow already exists
        #[arg(long)]
        force: bool,

        /// Seed the staff roster, as id=role (repeatable)
        #[arg(long = "staff", value_name = "ID=ROLE")]
        staff: Vec<String>,
    },

    /// Open, assign and resolve cases
    #[command(subcommand)]
    Case(CaseCommand),

    /// Add and move documents and tasks
    #[command(subcommand)]
    Doc(DocCommand),

    /// Show or change who is an Admin or a Lawyer
    #[command(subcommand)]
    Roles(RolesCommand),

    /// Print the due date a task of the given priority would get
    Due {
        priority: Priority,

        /// Compute from this RFC 3339 moment instead of now
        #[arg(long)]
        from: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum CaseCommand {
    /// Open a new pending case
    Open {
        case_id: String,
        title: String,

        /// Pipeline tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Agreed fee
        #[arg(long)]
        fee: Option<Decimal>,

        /// Balance still owed (requires --fee; defaults to the full fee)
        #[arg(long, requires = "fee")]
        balance: Option<Decimal>,
    },

    /// Show a case and its documents
    Show {
        case_id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Assign a lawyer to a case
    Assign { case_id: String, lawyer_id: String },

    /// Close a case with a verdict
    Close {
        case_id: String,

        #[arg(long)]
        verdict: String,
    },

    Dismiss { case_id: String },

    Archive { case_id: String },

    /// Restore an archived case (always as completed)
    Unarchive { case_id: String },
}

#[derive(Args, Debug)]
pub struct AddDocArgs {
    pub case_id: String,
    pub doc_id: String,
    pub name: String,

    /// Create a task instead of a support document
    #[arg(long)]
    pub task: bool,

    /// Task priority (low, mid, high)
    #[arg(long)]
    pub priority: Option<Priority>,

    /// Staff member the task is assigned to
    #[arg(long = "to")]
    pub tasked_to: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Reference file (repeatable)
    #[arg(long = "reference")]
    pub references: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum DocCommand {
    /// Add a support document or task to a case
    Add(AddDocArgs),

    /// Open a document; starts a todo task for Paralegals and Staff
    View {
        doc_id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Turn in finished work with a file
    TurnIn { doc_id: String, file: PathBuf },

    Approve { doc_id: String },

    /// Send a submission back with a reason
    Reject {
        doc_id: String,

        #[arg(long)]
        reason: String,
    },

    /// Move a card on the kanban board (todo, in_progress, done)
    Move { doc_id: String, status: DocStatus },

    /// Change a task's priority and recompute its due date
    Priority { doc_id: String, priority: Priority },

    Delete { doc_id: String },
}

#[derive(Subcommand, Debug)]
pub enum RolesCommand {
    /// List the Admin and Lawyer columns
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Move a member between the Admins and Lawyers columns
    Reclassify {
        user_id: String,
        from: BoardSet,
        to: BoardSet,
    },
}

/// Parse an `id=role` roster entry
pub fn parse_staff_entry(entry: &str) -> std::result::Result<(String, UserRole), String> {
    let (id, role) = entry
        .split_once('=')
        .ok_or_else(|| format!("expected ID=ROLE, got {:?}", entry))?;
    let id = id.trim();
    if id.is_empty() {
        return Err(format!("missing user id in {:?}", entry));
    }
    Ok((id.to_string(), role.parse()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_reclassify() {
        let cli = Cli::parse_from([
            "caseflow", "--actor", "a1", "roles", "reclassify", "l1", "lawyers", "admins",
        ]);
        assert_eq!(cli.actor.as_deref(), Some("a1"));
        match cli.command {
            Some(Commands::Roles(RolesCommand::Reclassify { user_id, from, to })) => {
                assert_eq!(user_id, "l1");
                assert_eq!(from, BoardSet::Lawyers);
                assert_eq!(to, BoardSet::Admins);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_doc_move_status() {
        let cli = Cli::parse_from(["caseflow", "doc", "move", "d1", "in_progress"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Doc(DocCommand::Move { status: DocStatus::InProgress, .. }))
        ));
    }

    #[test]
    fn test_balance_requires_fee() {
        let without_fee = Cli::try_parse_from(["caseflow", "case", "open", "7", "Doe v. Roe", "--balance", "500"]);
        assert!(without_fee.is_err());

        let cli = Cli::parse_from([
            "caseflow", "case", "open", "7", "Doe v. Roe", "--fee", "1000", "--balance", "500",
        ]);
        match cli.command {
            Some(Commands::Case(CaseCommand::Open { fee, balance, .. })) => {
                assert_eq!(fee, Some(Decimal::new(1000, 0)));
                assert_eq!(balance, Some(Decimal::new(500, 0)));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_staff_entry() {
        assert_eq!(parse_staff_entry("l1=lawyer").unwrap(), ("l1".to_string(), UserRole::Lawyer));
        assert!(parse_staff_entry("l1").is_err());
        assert!(parse_staff_entry("=admin").is_err());
        assert!(parse_staff_entry("l1=judge").is_err());
    }
}
