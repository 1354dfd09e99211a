//! Call log endpoints

use reqwest::Method;
use serde::Deserialize;

use crate::ConsoleClient;
use crate::error::Error;
use crate::error::ValidationError;
use crate::model::CallLog;
use crate::model::CallLogId;
use crate::model::CallLogUpdate;
use crate::query::ListParams;
use crate::query::PageData;
use crate::query::Pagination;

/// `{ items, total, page, limit, pages }`
#[derive(Deserialize)]
struct CallLogList {
    #[serde(default)]
    items: Vec<CallLog>,
    total: u64,
    page: u32,
    limit: u32,
    #[serde(default)]
    pages: Option<u32>,
}

impl From<CallLogList> for PageData<CallLog> {
    fn from(body: CallLogList) -> Self {
        let mut pagination = Pagination::new(body.total, body.limit, body.page);
        if let Some(pages) = body.pages {
            pagination.total_pages = pages;
            pagination = pagination.go_to(body.page.max(1));
        }
        PageData::new(body.items, pagination)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CallLogBody {
    Wrapped {
        #[serde(alias = "call_log")]
        call: CallLog,
    },
    Bare(CallLog),
}

impl From<CallLogBody> for CallLog {
    fn from(body: CallLogBody) -> Self {
        match body {
            CallLogBody::Wrapped { call } | CallLogBody::Bare(call) => call,
        }
    }
}

impl ConsoleClient {
    /// Lists the calls received by a clinic. Only the page and page size
    /// of `params` are used.
    ///
    /// `GET /call-logs/by-clinic/:clinicId`
    pub async fn list_call_logs(
        &self,
        clinic_id: &str,
        params: &ListParams,
    ) -> Result<PageData<CallLog>, Error> {
        let url = self.endpoint_with_query(
            &["call-logs", "by-clinic", clinic_id],
            [
                ("page", params.page.to_string()),
                ("limit", params.limit.to_string()),
            ],
        )?;
        let body: CallLogList = self.get_json(url).await?;
        Ok(body.into())
    }

    /// `GET /call-logs/:id`
    pub async fn get_call_log(&self, id: CallLogId) -> Result<CallLog, Error> {
        let url = self.endpoint(&["call-logs", &id.to_string()])?;
        let body: CallLogBody = self.get_json(url).await?;
        Ok(body.into())
    }

    /// `PATCH /call-logs/:id`
    pub async fn update_call_log(
        &self,
        id: CallLogId,
        update: &CallLogUpdate,
    ) -> Result<CallLog, Error> {
        if update.is_empty() {
            return Err(ValidationError::single("update", "Nothing to update").into());
        }
        let url = self.endpoint(&["call-logs", &id.to_string()])?;
        let body: CallLogBody = self.send_json(Method::PATCH, url, update).await?;
        Ok(body.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_body_maps_to_pagination() {
        let body: CallLogList = serde_json::from_str(
            r#"{"items":[],"total":45,"page":2,"limit":20,"pages":3}"#,
        )
        .unwrap();
        let page = PageData::from(body);
        assert_eq!(page.pagination, Pagination::new(45, 20, 2));
    }
}
