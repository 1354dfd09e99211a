//! List sources backed by the console API

use async_trait::async_trait;

use super::ListSource;
use crate::ConsoleClient;
use crate::error::Error;
use crate::model::CallLog;
use crate::model::Document;
use crate::model::Folder;
use crate::model::FolderId;
use crate::query::ListParams;
use crate::query::PageData;

/// All folders.
#[derive(Debug, Clone)]
pub struct FolderList {
    client: ConsoleClient,
}

impl FolderList {
    pub fn new(client: ConsoleClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ListSource for FolderList {
    type Record = Folder;

    async fn fetch(&self, params: &ListParams) -> Result<PageData<Folder>, Error> {
        self.client.list_folders(params).await
    }
}

/// The documents of one folder.
#[derive(Debug, Clone)]
pub struct FolderDocuments {
    client: ConsoleClient,
    folder_id: FolderId,
}

impl FolderDocuments {
    pub fn new(client: ConsoleClient, folder_id: FolderId) -> Self {
        Self { client, folder_id }
    }

    pub fn folder_id(&self) -> FolderId {
        self.folder_id
    }
}

#[async_trait]
impl ListSource for FolderDocuments {
    type Record = Document;

    async fn fetch(&self, params: &ListParams) -> Result<PageData<Document>, Error> {
        self.client.list_folder_documents(self.folder_id, params).await
    }
}

/// The calls received by one clinic.
#[derive(Debug, Clone)]
pub struct ClinicCallLogs {
    client: ConsoleClient,
    clinic_id: String,
}

impl ClinicCallLogs {
    pub fn new(client: ConsoleClient, clinic_id: impl Into<String>) -> Self {
        Self {
            client,
            clinic_id: clinic_id.into(),
        }
    }
}

#[async_trait]
impl ListSource for ClinicCallLogs {
    type Record = CallLog;

    async fn fetch(&self, params: &ListParams) -> Result<PageData<CallLog>, Error> {
        self.client.list_call_logs(&self.clinic_id, params).await
    }
}
