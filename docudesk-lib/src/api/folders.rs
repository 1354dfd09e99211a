//! Folder endpoints

use reqwest::Method;
use serde::Deserialize;

use super::into_page;
use crate::ConsoleClient;
use crate::error::Error;
use crate::model::Document;
use crate::model::Folder;
use crate::model::FolderId;
use crate::model::FolderPayload;
use crate::query::ListParams;
use crate::query::PageData;
use crate::query::Pagination;

#[derive(Deserialize)]
struct FolderList {
    #[serde(default)]
    folders: Vec<Folder>,
    #[serde(default)]
    pagination: Option<Pagination>,
}

#[derive(Deserialize)]
struct DocumentList {
    #[serde(default)]
    documents: Vec<Document>,
    #[serde(default)]
    pagination: Option<Pagination>,
}

/// Single folder, either wrapped as `{"folder": ..}` or bare.
#[derive(Deserialize)]
#[serde(untagged)]
enum FolderBody {
    Wrapped { folder: Folder },
    Bare(Folder),
}

impl From<FolderBody> for Folder {
    fn from(body: FolderBody) -> Self {
        match body {
            FolderBody::Wrapped { folder } | FolderBody::Bare(folder) => folder,
        }
    }
}

impl ConsoleClient {
    /// Lists folders matching the search, filter, page and sort in `params`.
    ///
    /// `GET /folders`
    pub async fn list_folders(&self, params: &ListParams) -> Result<PageData<Folder>, Error> {
        let url = self.endpoint_with_query(&["folders"], params.api_query())?;
        let body: FolderList = self.get_json(url).await?;
        Ok(into_page(body.folders, body.pagination, params))
    }

    /// `GET /folders/:id`
    pub async fn get_folder(&self, id: FolderId) -> Result<Folder, Error> {
        let url = self.endpoint(&["folders", &id.to_string()])?;
        let body: FolderBody = self.get_json(url).await?;
        Ok(body.into())
    }

    /// Creates or updates a folder.
    ///
    /// The payload is validated first; an invalid payload is never sent.
    ///
    /// `POST /folders/`
    pub async fn save_folder(&self, payload: FolderPayload) -> Result<Folder, Error> {
        let payload = payload.validate()?;
        let url = self.endpoint(&["folders", ""])?;
        let body: FolderBody = self.send_json(Method::POST, url, &payload).await?;
        Ok(body.into())
    }

    /// `DELETE /folders/:id`
    pub async fn delete_folder(&self, id: FolderId) -> Result<(), Error> {
        let url = self.endpoint(&["folders", &id.to_string()])?;
        self.send_empty::<()>(Method::DELETE, url, None).await
    }

    /// Lists the documents of a folder.
    ///
    /// `GET /folders/:id/documents`
    pub async fn list_folder_documents(
        &self,
        folder_id: FolderId,
        params: &ListParams,
    ) -> Result<PageData<Document>, Error> {
        let url = self.endpoint_with_query(
            &["folders", &folder_id.to_string(), "documents"],
            params.api_query(),
        )?;
        let body: DocumentList = self.get_json(url).await?;
        Ok(into_page(body.documents, body.pagination, params))
    }
}
