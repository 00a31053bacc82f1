use super::common::{build_url, build_url_with_query, require_segment};
use super::executor::json_body;
use super::options::ListOptions;
use super::pagination::collect_pages;
use super::AdminClient;
use crate::error::Error;
use crate::models::{Admin, AdminsPage, CreateAdminRequest, UpdateAdminRequest};
use reqwest::Method;

impl AdminClient {
    /// Fetches a single admin by id.
    pub fn get_admin(&self, id: &str) -> Result<Admin, Error> {
        let url = build_url(&self.endpoint, &["admins", require_segment("admin id", id)?])?;
        self.execute(Method::GET, &url, None)
    }

    /// Fetches one page of admins.
    pub fn get_admins_page(&self, options: &ListOptions) -> Result<AdminsPage, Error> {
        let url = build_url_with_query(&self.endpoint, &["admins"], options.to_query_pairs())?;
        self.execute(Method::GET, &url, None)
    }

    /// Fetches every admin, following page cursors until the last page.
    pub fn get_admins(&self) -> Result<Vec<Admin>, Error> {
        collect_pages(self.page_size, |options| {
            let page = self.get_admins_page(options)?;
            Ok((page.admins, page.next_cursor))
        })
    }

    pub fn create_admin(&self, request: &CreateAdminRequest) -> Result<Admin, Error> {
        let body = json_body(request)?;
        let url = build_url(&self.endpoint, &["admins"])?;
        self.execute(Method::POST, &url, Some(body))
    }

    /// Changes the type of an existing admin.
    pub fn update_admin(&self, id: &str, request: &UpdateAdminRequest) -> Result<Admin, Error> {
        let body = json_body(request)?;
        let url = build_url(&self.endpoint, &["admins", require_segment("admin id", id)?])?;
        self.execute(Method::PATCH, &url, Some(body))
    }

    pub fn remove_admin(&self, id: &str) -> Result<(), Error> {
        let url = build_url(&self.endpoint, &["admins", require_segment("admin id", id)?])?;
        self.execute_no_content(Method::DELETE, &url, None)
    }
}
