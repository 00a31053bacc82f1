use super::common::{build_url, build_url_with_query, require_segment};
use super::executor::json_body;
use super::options::{ListOptions, ProvisionerSelector, ProvisionerTarget};
use super::pagination::collect_pages;
use super::AdminClient;
use crate::error::Error;
use crate::models::{Provisioner, ProvisionersPage};
use reqwest::Method;
use url::Url;

impl AdminClient {
    /// Fetches a provisioner by id or name. Fails locally, without a request,
    /// when the selector names neither.
    pub fn get_provisioner(&self, selector: &ProvisionerSelector) -> Result<Provisioner, Error> {
        let url = self.provisioner_url(selector)?;
        self.execute(Method::GET, &url, None)
    }

    pub fn get_provisioners_page(&self, options: &ListOptions) -> Result<ProvisionersPage, Error> {
        let url =
            build_url_with_query(&self.endpoint, &["provisioners"], options.to_query_pairs())?;
        self.execute(Method::GET, &url, None)
    }

    /// Fetches every provisioner, following page cursors until the last page.
    pub fn get_provisioners(&self) -> Result<Vec<Provisioner>, Error> {
        collect_pages(self.page_size, |options| {
            let page = self.get_provisioners_page(options)?;
            Ok((page.provisioners, page.next_cursor))
        })
    }

    pub fn create_provisioner(&self, provisioner: &Provisioner) -> Result<Provisioner, Error> {
        let body = json_body(provisioner)?;
        let url = build_url(&self.endpoint, &["provisioners"])?;
        self.execute(Method::POST, &url, Some(body))
    }

    /// Replaces the provisioner currently registered under `name`.
    pub fn update_provisioner(&self, name: &str, provisioner: &Provisioner) -> Result<(), Error> {
        let body = json_body(provisioner)?;
        let url = build_url(
            &self.endpoint,
            &["provisioners", require_segment("provisioner name", name)?],
        )?;
        self.execute_no_content(Method::PUT, &url, Some(body))
    }

    pub fn remove_provisioner(&self, selector: &ProvisionerSelector) -> Result<(), Error> {
        let url = self.provisioner_url(selector)?;
        self.execute_no_content(Method::DELETE, &url, None)
    }

    fn provisioner_url(&self, selector: &ProvisionerSelector) -> Result<Url, Error> {
        match selector.target()? {
            ProvisionerTarget::Id(id) => build_url_with_query(
                &self.endpoint,
                &["provisioners", "id"],
                vec![("id", id.to_string())],
            ),
            ProvisionerTarget::Name(name) => build_url(&self.endpoint, &["provisioners", name]),
        }
    }
}
