//! Page containers wired to the real client and a stub API.

mod support;

use std::sync::Arc;
use std::time::Duration;

use docudesk_lib::ConsoleClient;
use docudesk_lib::model::Document;
use docudesk_lib::model::DocumentField;
use docudesk_lib::model::FolderField;
use docudesk_lib::model::JobStatus;
use docudesk_lib::page::DocumentsPage;
use docudesk_lib::page::FolderDocuments;
use docudesk_lib::page::FolderList;
use docudesk_lib::page::ListPage;
use docudesk_lib::page::NoteEntry;
use docudesk_lib::page::NotesThread;
use docudesk_lib::polling::PollEvent;
use docudesk_lib::polling::PollingController;
use docudesk_lib::query::LocationSync;
use docudesk_lib::query::PageLink;
use docudesk_lib::table::Column;
use docudesk_lib::table::TableBody;
use docudesk_lib::table::TableView;
use serde_json::json;
use url::Url;

fn location(path_and_query: &str) -> LocationSync {
    LocationSync::new(Url::parse(&format!("https://console.example.com{path_and_query}")).unwrap())
}

#[tokio::test]
async fn folder_list_renders_through_the_table() {
    let (_stub, base) = support::start().await;
    let mut page = ListPage::new(
        FolderList::new(support::client(&base)),
        location("/folders?page=2&tab=all"),
    );
    page.refresh().await.unwrap();

    let mut table = page
        .table(vec![
            Column::field("Name", FolderField::Name),
            Column::field("Status", FolderField::Status),
        ])
        .with_search_term("alp");

    let TableView::Table(content) = table.view() else {
        panic!("expected a table");
    };
    let footer = content.footer.unwrap();
    assert_eq!(footer.links, vec![PageLink::Page(1), PageLink::Page(2), PageLink::Page(3)]);
    assert_eq!(footer.summary, "Showing 21 to 40 of 47 results");
    match content.body {
        TableBody::Rows(rows) => {
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].cells, vec!["Alpha", "active"]);
        }
        other => panic!("expected rows, got {other:?}"),
    }

    let action = table.click_page(3).unwrap();
    page.apply_table_action(action);
    assert_eq!(page.params().page, 3);
    let query = page.location().location().query().unwrap().to_string();
    assert!(query.starts_with("page=3"));
    assert!(query.contains("tab=all"));
}

#[tokio::test]
async fn document_processing_updates_the_list() {
    let (stub, base) = support::start().await;
    let client = support::client(&base);
    stub.push_status_reply(json!({"documents": [
        {"id": 5, "status": "processed"},
        {"id": 9, "status": "pending"}
    ]}));
    stub.push_status_reply(json!({"documents": [{"id": 9, "status": "failed"}]}));

    let (controller, events) = PollingController::new(Arc::new(client.clone()));
    let controller = controller.with_interval(Duration::from_millis(20));
    let mut page = DocumentsPage::with_controller(
        FolderDocuments::new(client, 1),
        controller,
        events,
        location("/folders/1"),
    );
    page.list_mut().refresh().await.unwrap();
    assert_eq!(page.list().records().len(), 2);

    page.process(&[5, 9]).await.unwrap();
    assert!(page.is_processing(5) && page.is_processing(9));

    let finished = tokio::time::timeout(Duration::from_secs(5), async {
        while let Some(event) = page.next_event().await {
            if matches!(event, PollEvent::Finished) {
                return true;
            }
        }
        false
    })
    .await
    .unwrap();
    assert!(finished);

    let status = |page: &DocumentsPage<FolderDocuments, ConsoleClient>, id| {
        page.list()
            .records()
            .iter()
            .find(|d: &&Document| d.id == id)
            .map(|d| d.status.clone())
    };
    assert_eq!(status(&page, 5), Some(JobStatus::Processed));
    assert_eq!(status(&page, 9), Some(JobStatus::Failed));
    assert!(!page.is_processing(9));
    assert_eq!(stub.hits_to("POST", "/api/documents/process/status").len(), 2);

    page.list_mut().sort_by(DocumentField::Name);
    assert_eq!(page.list().params().order_by, "name");
}

#[tokio::test]
async fn rejected_note_is_restorable() {
    let (_stub, base) = support::start().await;
    let client = support::client(&base);
    let mut thread = NotesThread::new(3);

    thread.load(&client).await.unwrap();
    assert_eq!(thread.entries().len(), 2);

    thread.add(&client, "call back tomorrow").await.unwrap();
    assert!(matches!(thread.entries().last(), Some(NoteEntry::Committed(n)) if n.id == 7));

    assert!(thread.add(&client, "reject me").await.is_err());
    let Some(NoteEntry::Failed { temp_id, .. }) = thread.entries().last().cloned() else {
        panic!("expected a failed entry");
    };
    assert_eq!(thread.take_failed_content(temp_id).as_deref(), Some("reject me"));
    assert_eq!(thread.entries().len(), 3);
}
