//! folders subcommands

use docudesk_lib::model::Document;
use docudesk_lib::model::DocumentField;
use docudesk_lib::model::Folder;
use docudesk_lib::model::FolderField;
use docudesk_lib::model::FolderPayload;
use docudesk_lib::model::format_timestamp;
use docudesk_lib::page::FolderDocuments;
use docudesk_lib::page::FolderList;
use docudesk_lib::page::ListPage;
use docudesk_lib::page::ListSource;
use docudesk_lib::table::Column;

use super::Context;
use super::location;
use super::page_failure;
use crate::cli::FolderCommand;
use crate::cli::ListArgs;
use crate::render;

pub async fn run(ctx: &Context, command: FolderCommand) -> anyhow::Result<()> {
    match command {
        FolderCommand::List(list) => {
            let page = ListPage::new(
                FolderList::new(ctx.client.clone()),
                location("folders", &list.params())?,
            );
            show_list(page, folder_columns(), &list).await
        }
        FolderCommand::Show { id } => {
            let folder = ctx.client.get_folder(id).await?;
            print!("{}", folder_details(&folder));
            Ok(())
        }
        FolderCommand::Create {
            name,
            document_type,
            description,
            status,
        } => {
            let mut payload = FolderPayload::create(name, document_type).status(status);
            if let Some(description) = description {
                payload = payload.description(description);
            }
            let folder = ctx.client.save_folder(payload).await?;
            println!("Created folder {} ({}).", folder.id, folder.name);
            Ok(())
        }
        FolderCommand::Update {
            id,
            name,
            document_type,
            description,
            status,
        } => {
            let current = ctx.client.get_folder(id).await?;
            let mut payload = FolderPayload::from(&current);
            if let Some(name) = name {
                payload.name = name;
            }
            if let Some(document_type) = document_type {
                payload.document_type = document_type;
            }
            if let Some(description) = description {
                payload.description = Some(description);
            }
            if let Some(status) = status {
                payload.status = status;
            }
            let folder = ctx.client.save_folder(payload).await?;
            println!("Updated folder {} ({}).", folder.id, folder.name);
            Ok(())
        }
        FolderCommand::Delete { id } => {
            ctx.client.delete_folder(id).await?;
            println!("Deleted folder {id}.");
            Ok(())
        }
        FolderCommand::Documents { id, list } => {
            let page = ListPage::new(
                FolderDocuments::new(ctx.client.clone(), id),
                location(&format!("folders/{id}/documents"), &list.params())?,
            );
            show_list(page, document_columns(), &list).await
        }
    }
}

/// Fetches one page and prints it as a table.
pub(super) async fn show_list<S>(
    mut page: ListPage<S>,
    columns: Vec<Column<S::Record>>,
    list: &ListArgs,
) -> anyhow::Result<()>
where
    S: ListSource,
    S::Record: Clone,
{
    page.refresh().await.map_err(page_failure)?;
    let mut table = page.table(columns);
    if let Some(filter) = &list.filter {
        table.set_search_term(filter.clone());
    }
    print!("{}", render::table(&table.view()));
    Ok(())
}

fn folder_columns() -> Vec<Column<Folder>> {
    vec![
        Column::rendered("ID", |f: &Folder| f.id.to_string()),
        Column::field("Name", FolderField::Name),
        Column::field("Type", FolderField::DocumentType),
        Column::field("Status", FolderField::Status),
        Column::field("Documents", FolderField::DocumentCount),
        Column::field("Created", FolderField::CreatedAt),
    ]
}

pub(super) fn document_columns() -> Vec<Column<Document>> {
    vec![
        Column::rendered("ID", |d: &Document| d.id.to_string()),
        Column::field("Name", DocumentField::Name),
        Column::field("Status", DocumentField::Status),
        Column::field("Type", DocumentField::DocumentType),
        Column::rendered("Corrected", |d: &Document| {
            String::from(if d.is_corrected() { "yes" } else { "" })
        }),
        Column::field("Created", DocumentField::CreatedAt),
    ]
}

fn folder_details(folder: &Folder) -> String {
    render::details(&[
        ("ID", Some(folder.id.to_string())),
        ("Name", Some(folder.name.clone())),
        ("Description", folder.description.clone()),
        ("Type", Some(folder.document_type.to_string())),
        ("Status", Some(folder.status.to_string())),
        ("Documents", folder.document_count.map(|n| n.to_string())),
        ("Created", format_timestamp(folder.created_at.as_ref())),
        ("Updated", format_timestamp(folder.updated_at.as_ref())),
    ])
}
