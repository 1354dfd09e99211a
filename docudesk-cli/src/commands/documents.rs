//! documents subcommands

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use docudesk_lib::api::ExportFormat;
use docudesk_lib::api::ExportRequest;
use docudesk_lib::model::AMOUNT_FIELDS;
use docudesk_lib::model::Document;
use docudesk_lib::model::DocumentId;
use docudesk_lib::model::DocumentType;
use docudesk_lib::model::JobStatus;
use docudesk_lib::model::format_timestamp;
use docudesk_lib::page::DocumentsPage;
use docudesk_lib::page::FolderDocuments;
use docudesk_lib::polling::PollEvent;
use docudesk_lib::polling::PollingController;
use docudesk_lib::query::ListParams;
use serde_json::Value;

use super::Context;
use super::folders::document_columns;
use super::location;
use super::page_failure;
use crate::cli::DocumentCommand;
use crate::render;

pub async fn run(ctx: &Context, command: DocumentCommand) -> anyhow::Result<()> {
    match command {
        DocumentCommand::Show { id } => {
            let document = ctx.client.get_document(id).await?;
            print!("{}", document_details(&document)?);
            Ok(())
        }
        DocumentCommand::Rename { id, name } => {
            let document = ctx.client.rename_document(id, &name).await?;
            println!("Renamed document {} to {}.", document.id, document.name);
            Ok(())
        }
        DocumentCommand::Correct { id, json, file } => {
            let text = match (json, file) {
                (Some(json), _) => json,
                (None, Some(path)) => tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("reading {}", path.display()))?,
                (None, None) => anyhow::bail!("pass --json or --file"),
            };
            let data: Value = serde_json::from_str(&text).context("corrected data is not JSON")?;
            ctx.client.update_corrected_data(id, &data).await?;
            println!("Saved corrections for document {id}.");
            Ok(())
        }
        DocumentCommand::Delete { id } => {
            ctx.client.delete_document(id).await?;
            println!("Deleted document {id}.");
            Ok(())
        }
        DocumentCommand::Process {
            folder,
            ids,
            interval_ms,
            retries,
        } => process(ctx, folder, &ids, Duration::from_millis(interval_ms), retries).await,
        DocumentCommand::Export {
            ids,
            format,
            fields,
            document_type,
            out,
        } => {
            let request = export_request(ids, format, fields, document_type);
            let file = ctx.client.export_documents(&request).await?;
            let path = file
                .save_in(&out)
                .await
                .with_context(|| format!("saving export into {}", out.display()))?;
            println!("Saved {} ({} bytes).", path.display(), file.bytes.len());
            Ok(())
        }
    }
}

fn export_request(
    ids: Vec<DocumentId>,
    format: ExportFormat,
    fields: Vec<String>,
    document_type: Option<DocumentType>,
) -> ExportRequest {
    let mut request = ExportRequest::new(ids, format);
    if !fields.is_empty() {
        request = request.fields(fields);
    }
    if let Some(document_type) = document_type {
        request = request.document_type(document_type);
    }
    request
}

/// Submits `ids`, prints status changes until every document is done, then
/// prints the folder's documents.
async fn process(
    ctx: &Context,
    folder: i64,
    ids: &[DocumentId],
    interval: Duration,
    mut retries: u32,
) -> anyhow::Result<()> {
    let (controller, events) = PollingController::new(Arc::new(ctx.client.clone()));
    let controller = controller.with_interval(interval);
    let mut page = DocumentsPage::with_controller(
        FolderDocuments::new(ctx.client.clone(), folder),
        controller,
        events,
        location(&format!("folders/{folder}/documents"), &ListParams::default())?,
    );
    page.list_mut().refresh().await.map_err(page_failure)?;

    page.process(ids).await?;
    println!("Processing {} document(s), Ctrl+C to stop following.", ids.len());

    let mut last: HashMap<DocumentId, JobStatus> = HashMap::new();
    loop {
        let event = tokio::select! {
            event = page.next_event() => event,
            _ = tokio::signal::ctrl_c() => {
                println!("Stopped following; processing continues on the server.");
                return Ok(());
            }
        };
        match event {
            Some(PollEvent::Status(update)) => {
                if last.get(&update.id) != Some(&update.status) {
                    println!("{:>8}  {}", update.id, update.status);
                    last.insert(update.id, update.status);
                }
            }
            Some(PollEvent::Finished) | None => break,
            Some(PollEvent::Failed { error, stuck }) => {
                if retries > 0 && page.resume_polling() {
                    retries -= 1;
                    log::warn!("status check failed, resuming: {error}");
                    continue;
                }
                eprintln!("still processing: {stuck:?}");
                return Err(error.into());
            }
        }
    }

    print!("{}", render::table(&page.list().table(document_columns()).view()));
    Ok(())
}

fn document_details(document: &Document) -> anyhow::Result<String> {
    let mut fields = vec![
        ("ID", Some(document.id.to_string())),
        ("Name", Some(document.name.clone())),
        ("Folder", document.folder_id.map(|id| id.to_string())),
        ("Status", Some(document.status.to_string())),
        ("Type", document.document_type.map(|t| t.to_string())),
        ("MIME type", document.mime_type.clone()),
        ("File", document.file_url.clone()),
        ("Corrected", Some(String::from(if document.is_corrected() { "yes" } else { "no" }))),
        ("Created", format_timestamp(document.created_at.as_ref())),
    ];
    for field in AMOUNT_FIELDS {
        if let Some(amount) = document.amount(field) {
            fields.push((*field, Some(amount.to_string())));
        }
    }

    let mut out = render::details(&fields);
    if let Some(data) = document.data() {
        out.push('\n');
        out.push_str(&serde_json::to_string_pretty(data)?);
        out.push('\n');
    }
    Ok(out)
}
