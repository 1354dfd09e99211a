//! notes subcommands

use docudesk_lib::model::format_timestamp;
use docudesk_lib::page::NoteEntry;
use docudesk_lib::page::NotesThread;

use super::Context;
use crate::cli::NoteCommand;

pub async fn run(ctx: &Context, command: NoteCommand) -> anyhow::Result<()> {
    match command {
        NoteCommand::List { call } => {
            let mut thread = NotesThread::new(call);
            thread.load(&ctx.client).await?;
            print!("{}", thread_text(&thread));
            Ok(())
        }
        NoteCommand::Add { call, content } => {
            let mut thread = NotesThread::new(call);
            if let Err(e) = thread.add(&ctx.client, &content).await {
                if let Some(NoteEntry::Failed { temp_id, .. }) = thread.entries().last().cloned()
                    && let Some(unsent) = thread.take_failed_content(temp_id)
                {
                    eprintln!("note not saved:\n{unsent}");
                }
                return Err(e.into());
            }
            println!("Note added to call {call}.");
            Ok(())
        }
        NoteCommand::Edit { id, content } => {
            ctx.client.update_note(id, &content).await?;
            println!("Updated note {id}.");
            Ok(())
        }
        NoteCommand::Delete { id } => {
            ctx.client.delete_note(id).await?;
            println!("Deleted note {id}.");
            Ok(())
        }
    }
}

fn thread_text(thread: &NotesThread) -> String {
    if thread.entries().is_empty() {
        return "No notes\n".to_string();
    }
    let mut out = String::new();
    for entry in thread.entries() {
        let header = match entry {
            NoteEntry::Committed(note) => {
                let mut header = format!("#{}", note.id);
                if let Some(author) = &note.author {
                    header.push_str(&format!(" {author}"));
                }
                if let Some(at) = format_timestamp(note.created_at.as_ref()) {
                    header.push_str(&format!(" · {at}"));
                }
                header
            }
            NoteEntry::Pending { .. } => "(sending)".to_string(),
            NoteEntry::Failed { error, .. } => format!("(not saved: {error})"),
        };
        out.push_str(&format!("{header}\n{}\n\n", entry.content()));
    }
    out
}
