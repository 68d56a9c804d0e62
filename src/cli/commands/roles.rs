//! Role board commands

use std::path::Path;

use serde::Serialize;

use crate::cli::RolesCommand;
use crate::errors::Result;
use crate::schemas::StaffUser;
use crate::workflow::RoleBoard;

use super::{print_json, Workspace};

#[derive(Serialize)]
struct BoardView<'a> {
    admins: &'a [StaffUser],
    lawyers: &'a [StaffUser],
}

pub async fn run(cwd: Option<&Path>, actor_id: Option<&str>, command: RolesCommand) -> Result<()> {
    let ws = Workspace::open(cwd)?;
    let mut board = RoleBoard::load(ws.store.clone()).await?;

    match command {
        RolesCommand::List { json } => {
            if json {
                return print_json(&BoardView {
                    admins: board.admins(),
                    lawyers: board.lawyers(),
                });
            }
            print_column("Admins", board.admins());
            print_column("Lawyers", board.lawyers());
        }
        RolesCommand::Reclassify { user_id, from, to } => {
            let actor = ws.actor(actor_id).await?;
            board.reclassify(&user_id, from, to, &actor).await?;
            println!("Moved {} from {} to {}", user_id, from, to);
        }
    }
    Ok(())
}

fn print_column(title: &str, members: &[StaffUser]) {
    println!("{} ({})", title, members.len());
    for member in members {
        println!("  {}  {}", member.user_id, member.user_name);
    }
}
