//! Document and task commands

use std::path::Path;

use crate::cli::{AddDocArgs, DocCommand};
use crate::errors::{CaseflowError, Result};
use crate::schemas::{DocType, Document, NewDocument, UploadedFile};
use crate::store::DocumentStore;

use super::{print_json, Workspace};

pub async fn run(cwd: Option<&Path>, actor_id: Option<&str>, command: DocCommand) -> Result<()> {
    let ws = Workspace::open(cwd)?;
    let actor = ws.actor(actor_id).await?;
    let workflow = ws.documents()?;

    if let DocCommand::Add(args) = command {
        let doc = workflow.create(new_document(args), &actor).await?;
        print_summary("Added", &doc);
        return Ok(());
    }

    let doc_id = match &command {
        DocCommand::View { doc_id, .. }
        | DocCommand::TurnIn { doc_id, .. }
        | DocCommand::Approve { doc_id }
        | DocCommand::Reject { doc_id, .. }
        | DocCommand::Move { doc_id, .. }
        | DocCommand::Priority { doc_id, .. }
        | DocCommand::Delete { doc_id } => doc_id.clone(),
        DocCommand::Add(_) => return Ok(()),
    };
    let mut doc = ws.store.get_document(&doc_id).await?;

    match command {
        DocCommand::View { json, .. } => {
            workflow.auto_advance_on_view(&mut doc, &actor).await?;
            if json {
                return print_json(&doc);
            }
            print_details(&doc);
            return Ok(());
        }
        DocCommand::TurnIn { file, .. } => {
            let upload = read_upload(&file)?;
            workflow.turn_in(&mut doc, Some(&upload), &actor).await?;
        }
        DocCommand::Approve { .. } => workflow.approve(&mut doc, &actor).await?,
        DocCommand::Reject { reason, .. } => workflow.reject(&mut doc, &reason, &actor).await?,
        DocCommand::Move { status, .. } => {
            if !workflow.move_to(&mut doc, status, &actor).await? {
                println!("{} is already {}", doc.doc_id, doc.doc_status);
                return Ok(());
            }
        }
        DocCommand::Priority { priority, .. } => {
            workflow.change_priority(&mut doc, priority, &actor).await?
        }
        DocCommand::Delete { .. } => {
            workflow.delete(&doc, &actor).await?;
            println!("Deleted {}", doc.doc_id);
            return Ok(());
        }
        DocCommand::Add(_) => {}
    }

    print_summary("Updated", &doc);
    Ok(())
}

fn new_document(args: AddDocArgs) -> NewDocument {
    NewDocument {
        doc_id: args.doc_id,
        case_id: args.case_id,
        doc_name: args.name,
        doc_description: args.description,
        doc_type: Some(if args.task { DocType::Task } else { DocType::Support }),
        doc_prio_level: args.priority,
        doc_tasked_to: args.tasked_to,
        doc_reference_files: args.references,
        doc_file: None,
    }
}

fn read_upload(path: &Path) -> Result<UploadedFile> {
    let content = std::fs::read(path)
        .map_err(|e| CaseflowError::wrap(e, format!("reading {}", path.display())))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| CaseflowError::validation(format!("invalid file name: {}", path.display())))?;
    Ok(UploadedFile::new(file_name, content))
}

fn print_summary(verb: &str, doc: &Document) {
    println!("{} {} ({})", verb, doc.doc_id, doc.doc_status);
}

fn print_details(doc: &Document) {
    println!("{}  {}", doc.doc_id, doc.doc_name);
    println!("  case:     {}", doc.case_id);
    println!("  status:   {}", doc.doc_status);
    if let Some(description) = &doc.doc_description {
        println!("  about:    {}", description);
    }
    if let (Some(priority), Some(due)) = (doc.doc_prio_level, doc.doc_due_date) {
        println!("  priority: {} (due {})", priority, due.to_rfc3339());
    }
    if let Some(to) = &doc.doc_tasked_to {
        println!("  assignee: {}", to);
    }
    if let Some(file) = &doc.doc_file {
        println!("  file:     {}", file);
    }
    if let Some(tag) = &doc.doc_tag {
        println!("  note:     {}", tag);
    }
}
