//! calls subcommands

use docudesk_lib::model::CallLog;
use docudesk_lib::model::CallLogField;
use docudesk_lib::model::CallLogUpdate;
use docudesk_lib::model::format_timestamp;
use docudesk_lib::page::ClinicCallLogs;
use docudesk_lib::page::ListPage;
use docudesk_lib::query::ListParams;
use docudesk_lib::table::Column;

use super::Context;
use super::location;
use super::page_failure;
use crate::cli::CallCommand;
use crate::render;

pub async fn run(ctx: &Context, command: CallCommand) -> anyhow::Result<()> {
    match command {
        CallCommand::List {
            clinic,
            page,
            limit,
        } => {
            let params = ListParams {
                page: page.max(1),
                limit: limit.max(1),
                ..ListParams::default()
            };
            let mut list = ListPage::new(
                ClinicCallLogs::new(ctx.client.clone(), clinic.clone()),
                location(&format!("clinics/{clinic}/calls"), &params)?,
            );
            list.refresh().await.map_err(page_failure)?;
            print!("{}", render::table(&list.table(call_columns()).view()));
            Ok(())
        }
        CallCommand::Show { id } => {
            let call = ctx.client.get_call_log(id).await?;
            print!("{}", call_details(&call));
            Ok(())
        }
        CallCommand::Update {
            id,
            status,
            reason,
            summary,
        } => {
            let mut update = CallLogUpdate::default();
            if let Some(status) = status {
                update = update.status(status);
            }
            if let Some(reason) = reason {
                update = update.reason(reason);
            }
            if let Some(summary) = summary {
                update = update.summary(summary);
            }
            if update.is_empty() {
                anyhow::bail!("nothing to update; pass --status, --reason or --summary");
            }
            let call = ctx.client.update_call_log(id, &update).await?;
            println!("Updated call {} ({}).", call.id, call.status);
            Ok(())
        }
    }
}

fn call_columns() -> Vec<Column<CallLog>> {
    vec![
        Column::rendered("ID", |c: &CallLog| c.id.to_string()),
        Column::field("Caller", CallLogField::CallerName),
        Column::field("Phone", CallLogField::CallerPhone),
        Column::field("Reason", CallLogField::Reason),
        Column::field("Status", CallLogField::Status),
        Column::field("Duration", CallLogField::Duration),
        Column::field("Received", CallLogField::CreatedAt),
    ]
}

fn call_details(call: &CallLog) -> String {
    let mut out = render::details(&[
        ("ID", Some(call.id.to_string())),
        ("Clinic", Some(call.clinic_id.clone())),
        ("Caller", call.caller_name.clone()),
        ("Phone", call.caller_phone.clone()),
        ("Reason", call.reason.clone()),
        ("Status", Some(call.status.to_string())),
        ("Duration", call.duration_label()),
        ("Audio", call.has_audio().then(|| "available".to_string())),
        ("Received", format_timestamp(call.created_at.as_ref())),
    ]);
    for (title, text) in [("Summary", &call.summary), ("Transcript", &call.transcript)] {
        if let Some(text) = text {
            out.push_str(&format!("\n{title}\n{text}\n"));
        }
    }
    out
}
