//! Intern use-case service.
//!
//! # Responsibility
//! - Provide stable create/update/delete/list entry points for UI layers.
//! - Project list views and exports from repository reads.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.
//! - Mutations return the updated record; callers decide when to refresh.

use crate::export::{render_csv, render_table};
use crate::model::intern::{AttachmentKind, InternFields, InternPatch, InternRecord};
use crate::repo::intern_repo::{InternRepository, RepoResult};
use crate::service::list_view::{apply_list_view, filter_and_sort, InternListPage, InternListQuery};

/// History description used by full-form edits.
pub const FORM_UPDATE_DESCRIPTION: &str = "information updated";

/// Use-case service wrapper over an intern repository.
pub struct InternService<R: InternRepository> {
    repo: R,
}

impl<R: InternRepository> InternService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_intern(&self, fields: InternFields) -> RepoResult<InternRecord> {
        self.repo.create(fields)
    }

    /// Applies a partial update with a caller-chosen history description.
    pub fn update_intern(
        &self,
        id: &str,
        patch: InternPatch,
        change_description: &str,
    ) -> RepoResult<InternRecord> {
        self.repo.update(id, patch, change_description)
    }

    /// Applies a partial update coming from the edit form.
    pub fn save_form(&self, id: &str, patch: InternPatch) -> RepoResult<InternRecord> {
        self.repo.update(id, patch, FORM_UPDATE_DESCRIPTION)
    }

    pub fn delete_intern(&self, id: &str) -> RepoResult<()> {
        self.repo.delete(id)
    }

    pub fn clear_attachment(&self, id: &str, kind: AttachmentKind) -> RepoResult<InternRecord> {
        self.repo.clear_attachment(id, kind)
    }

    pub fn get_intern(&self, id: &str) -> RepoResult<Option<InternRecord>> {
        self.repo.get(id)
    }

    /// Full collection in persisted order.
    pub fn list_interns(&self) -> RepoResult<Vec<InternRecord>> {
        self.repo.list()
    }

    /// One page of the searched/sorted list.
    pub fn list_page(&self, query: &InternListQuery) -> RepoResult<InternListPage> {
        Ok(apply_list_view(self.repo.list()?, query))
    }

    /// CSV export of the whole collection in persisted order.
    pub fn export_csv(&self) -> RepoResult<String> {
        Ok(render_csv(&self.repo.list()?))
    }

    /// Table document for the current view (search and sort, no paging).
    pub fn export_table(&self, query: &InternListQuery) -> RepoResult<String> {
        let view = filter_and_sort(self.repo.list()?, query);
        Ok(render_table(&view))
    }
}
