//! Case commands

use std::path::Path;

use serde::Serialize;

use crate::cli::CaseCommand;
use crate::errors::Result;
use crate::schemas::{Case, Document};
use crate::store::{CaseStore, DocumentStore};

use super::{print_json, Workspace};

#[derive(Serialize)]
struct CaseView<'a> {
    case: &'a Case,
    documents: &'a [Document],
}

pub async fn run(cwd: Option<&Path>, actor_id: Option<&str>, command: CaseCommand) -> Result<()> {
    let ws = Workspace::open(cwd)?;

    if let CaseCommand::Show { case_id, json } = &command {
        return show(&ws, case_id, *json).await;
    }

    let actor = ws.actor(actor_id).await?;
    let workflow = ws.cases();

    if let CaseCommand::Open { case_id, title, tags, fee, balance } = command {
        let mut draft = Case::new(case_id, title).with_tags(tags);
        if let Some(fee) = fee {
            draft = draft.with_fee(fee, balance.unwrap_or(fee));
        }
        let case = workflow.open(draft, &actor).await?;
        println!("Opened case {} ({})", case.case_id, case.case_status);
        return Ok(());
    }

    let case_id = match &command {
        CaseCommand::Assign { case_id, .. }
        | CaseCommand::Close { case_id, .. }
        | CaseCommand::Dismiss { case_id }
        | CaseCommand::Archive { case_id }
        | CaseCommand::Unarchive { case_id } => case_id.clone(),
        CaseCommand::Open { .. } | CaseCommand::Show { .. } => return Ok(()),
    };
    let mut case = ws.store.get_case(&case_id).await?;

    match command {
        CaseCommand::Assign { lawyer_id, .. } => workflow.assign(&mut case, &lawyer_id, &actor).await?,
        CaseCommand::Close { verdict, .. } => workflow.close(&mut case, &verdict, &actor).await?,
        CaseCommand::Dismiss { .. } => workflow.dismiss(&mut case, &actor).await?,
        CaseCommand::Archive { .. } => workflow.archive(&mut case, &actor).await?,
        CaseCommand::Unarchive { .. } => workflow.unarchive(&mut case, &actor).await?,
        CaseCommand::Open { .. } | CaseCommand::Show { .. } => {}
    }

    println!("Case {} is now {}", case.case_id, case.case_status);
    Ok(())
}

async fn show(ws: &Workspace, case_id: &str, json: bool) -> Result<()> {
    let case = ws.store.get_case(case_id).await?;
    let documents = ws.store.list_documents(case_id).await?;

    if json {
        return print_json(&CaseView {
            case: &case,
            documents: &documents,
        });
    }

    println!("{}  {}", case.case_id, case.case_title);
    println!("  status:   {}", case.case_status);
    if let Some(verdict) = &case.case_verdict {
        println!("  verdict:  {}", verdict);
    }
    if let Some(lawyer) = &case.user_id {
        println!("  lawyer:   {}", lawyer);
    }
    println!("  tags:     {}", case.display_tags(&ws.config.case_tags).join(", "));
    if let Some(balance) = case.remaining_balance() {
        println!("  balance:  {} of {}", balance, case.case_fee);
    }
    for doc in &documents {
        let due = doc
            .doc_due_date
            .map(|d| format!("  due {}", d.format("%Y-%m-%d")))
            .unwrap_or_default();
        println!("  - [{}] {} {}{}", doc.doc_status, doc.doc_id, doc.doc_name, due);
    }
    Ok(())
}
